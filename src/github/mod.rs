pub mod client;
pub mod models;

pub use client::{GithubClient, DEFAULT_API_URL};
pub use models::{Action, Feature, Repository};
