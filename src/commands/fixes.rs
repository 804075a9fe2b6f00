use crate::commands::abort;
use crate::display;
use crate::error::Result;
use crate::github::{Action, Feature, GithubClient, Repository};

/// Sets automated security fixes on every repository, archived ones included.
///
/// The endpoint is idempotent, so no current state is read first.
pub async fn update_security_fixes(
    client: &GithubClient,
    action: Action,
    repositories: &[Repository],
) -> Result<usize> {
    let feature = Feature::AutomatedSecurityFixes;
    let mut updated = 0usize;

    for repo in repositories {
        if client.is_dry_run() {
            display::would_update(action, feature, repo);
            continue;
        }

        client
            .set_feature(repo, feature, action)
            .await
            .map_err(|e| abort(feature, repo, updated, e))?;

        display::updated(feature, repo);
        updated += 1;
    }

    Ok(updated)
}
