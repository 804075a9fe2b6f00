pub mod alerts;
pub mod fixes;

use crate::config::Config;
use crate::display;
use crate::error::{GithubVulError, Result};
use crate::github::{Action, Feature, GithubClient, Repository};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub org: String,
    pub repositories: usize,
    pub alerts_updated: usize,
    pub fixes_updated: usize,
    pub dry_run: bool,
}

/// Reconciles vulnerability alerts, then automated security fixes, for the
/// configured org (or the single repository override).
pub async fn run(client: &GithubClient, config: &Config) -> Result<RunSummary> {
    let org = non_empty(config.org.as_deref()).ok_or(GithubVulError::MissingOrg)?;
    let action: Action = non_empty(config.action.as_deref())
        .ok_or(GithubVulError::MissingAction)?
        .parse()?;

    let repositories =
        resolve_repositories(client, org, non_empty(config.repo.as_deref())).await?;

    let alerts_updated =
        alerts::update_vulnerability_alerts(client, action, &repositories).await?;
    display::total("alerts", alerts_updated);

    let fixes_updated =
        fixes::update_security_fixes(client, Action::from(config.fixes), &repositories).await?;
    display::total("security fixes", fixes_updated);

    Ok(RunSummary {
        org: org.to_string(),
        repositories: repositories.len(),
        alerts_updated,
        fixes_updated,
        dry_run: client.is_dry_run(),
    })
}

pub async fn resolve_repositories(
    client: &GithubClient,
    org: &str,
    repo_override: Option<&str>,
) -> Result<Vec<Repository>> {
    if let Some(name) = repo_override {
        return Ok(vec![Repository::named(org, name)]);
    }
    client.list_org_repos(org).await
}

/// Wraps a per-repository failure, keeping the count reached before the pass stopped.
fn abort(
    feature: Feature,
    repo: &Repository,
    updated: usize,
    source: GithubVulError,
) -> GithubVulError {
    GithubVulError::Reconcile {
        feature,
        repo: repo.name.clone(),
        updated,
        source: Box::new(source),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
