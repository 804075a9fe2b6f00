use crate::github::{Feature, Repository};
use http::{Method, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GithubVulError {
    #[error("missing org")]
    MissingOrg,

    #[error("missing action")]
    MissingAction,

    #[error("action must be of value 'enable' or 'disable', got '{0}'")]
    InvalidAction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("{method} {path} failed: {status}")]
    HttpStatus {
        method: Method,
        path: String,
        status: StatusCode,
    },

    #[error("unexpected status {0}")]
    UnexpectedStatus(StatusCode),

    #[error("failed to parse repositories: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to get repositories (page {page}): {source}")]
    ListRepositories {
        page: u32,
        fetched: Vec<Repository>,
        #[source]
        source: Box<GithubVulError>,
    },

    #[error("failed to check vulnerability alerts config for repo {repo}: {source}")]
    CheckAlerts {
        repo: String,
        #[source]
        source: Box<GithubVulError>,
    },

    #[error("failed to update {feature} for repo {repo}: {source}")]
    Reconcile {
        feature: Feature,
        repo: String,
        updated: usize,
        #[source]
        source: Box<GithubVulError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl GithubVulError {
    /// Number of repositories already updated when a reconciliation pass aborted.
    pub fn partial_count(&self) -> Option<usize> {
        match self {
            GithubVulError::Reconcile { updated, .. } => Some(*updated),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GithubVulError::HttpStatus { status, .. } | GithubVulError::UnexpectedStatus(status) => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<octocrab::Error> for GithubVulError {
    fn from(err: octocrab::Error) -> Self {
        GithubVulError::GitHub(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GithubVulError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_error_names_repo_and_keeps_count() {
        let err = GithubVulError::Reconcile {
            feature: Feature::VulnerabilityAlerts,
            repo: "widgets".to_string(),
            updated: 3,
            source: Box::new(GithubVulError::UnexpectedStatus(StatusCode::BAD_GATEWAY)),
        };
        assert_eq!(err.partial_count(), Some(3));
        let message = err.to_string();
        assert!(message.contains("vulnerability alerts"));
        assert!(message.contains("widgets"));
        assert!(message.contains("502"));
    }

    #[test]
    fn http_status_is_inspectable() {
        let err = GithubVulError::HttpStatus {
            method: Method::GET,
            path: "/repos/acme/widgets/vulnerability-alerts".to_string(),
            status: StatusCode::NOT_FOUND,
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.partial_count(), None);
    }
}
