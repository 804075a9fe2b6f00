use crate::commands::abort;
use crate::display;
use crate::error::Result;
use crate::github::{Action, Feature, GithubClient, Repository};

/// Brings vulnerability alerts of every non-archived repository to `action`.
///
/// Returns how many repositories were actually changed. Repositories already in
/// the desired state, and every repository in dry-run mode, are not counted. The
/// first failure aborts the pass; the error carries the count reached so far.
pub async fn update_vulnerability_alerts(
    client: &GithubClient,
    action: Action,
    repositories: &[Repository],
) -> Result<usize> {
    let feature = Feature::VulnerabilityAlerts;
    let mut updated = 0usize;

    for repo in repositories {
        if repo.archived {
            display::skipped_archived(repo);
            continue;
        }

        let enabled = client
            .vulnerability_alerts_enabled(repo)
            .await
            .map_err(|e| abort(feature, repo, updated, e))?;

        if !action.needs_change(enabled) {
            tracing::debug!(repo = %repo.name, enabled, "already in desired state");
            continue;
        }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GithubVulError;
    use crate::github::testing::{client_for, expect_mutation, mount_alerts_state};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEGMENT: &str = "vulnerability-alerts";

    #[tokio::test]
    async fn enables_only_repositories_that_are_off() {
        let server = MockServer::start().await;
        mount_alerts_state(&server, "acme", "off", false).await;
        mount_alerts_state(&server, "acme", "on", true).await;
        expect_mutation(&server, "PUT", "acme", "off", SEGMENT, 1).await;
        expect_mutation(&server, "PUT", "acme", "on", SEGMENT, 0).await;

        let client = client_for(&server, false);
        let repos = vec![
            Repository::named("acme", "off"),
            Repository::named("acme", "on"),
        ];
        let count = update_vulnerability_alerts(&client, Action::Enable, &repos)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn disables_only_repositories_that_are_on() {
        let server = MockServer::start().await;
        mount_alerts_state(&server, "acme", "off", false).await;
        mount_alerts_state(&server, "acme", "on", true).await;
        expect_mutation(&server, "DELETE", "acme", "on", SEGMENT, 1).await;
        expect_mutation(&server, "DELETE", "acme", "off", SEGMENT, 0).await;

        let client = client_for(&server, false);
        let repos = vec![
            Repository::named("acme", "off"),
            Repository::named("acme", "on"),
        ];
        let count = update_vulnerability_alerts(&client, Action::Disable, &repos)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn archived_repositories_are_never_touched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/old/vulnerability-alerts"))
            .respond_with(ResponseTemplate::new(404))
            .expect(0)
            .mount(&server)
            .await;
        expect_mutation(&server, "PUT", "acme", "old", SEGMENT, 0).await;
        expect_mutation(&server, "DELETE", "acme", "old", SEGMENT, 0).await;

        let client = client_for(&server, false);
        let mut old = Repository::named("acme", "old");
        old.archived = true;
        let repos = vec![old];

        for action in [Action::Enable, Action::Disable] {
            let count = update_vulnerability_alerts(&client, action, &repos)
                .await
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[tokio::test]
    async fn dry_run_checks_state_but_never_mutates() {
        let server = MockServer::start().await;
        mount_alerts_state(&server, "acme", "a", false).await;
        mount_alerts_state(&server, "acme", "b", true).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, true);
        let repos = vec![Repository::named("acme", "a"), Repository::named("acme", "b")];

        for action in [Action::Enable, Action::Disable] {
            let count = update_vulnerability_alerts(&client, action, &repos)
                .await
                .unwrap();
            assert_eq!(count, 0);
        }
        let checks = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.method.as_str() == "GET")
            .count();
        assert_eq!(checks, 4);
    }

    #[tokio::test]
    async fn failed_check_aborts_with_partial_count() {
        let server = MockServer::start().await;
        mount_alerts_state(&server, "acme", "first", false).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/second/vulnerability-alerts"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        expect_mutation(&server, "PUT", "acme", "first", SEGMENT, 1).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/third/vulnerability-alerts"))
            .respond_with(ResponseTemplate::new(404))
            .expect(0)
            .mount(&server)
            .await;
        expect_mutation(&server, "PUT", "acme", "third", SEGMENT, 0).await;

        let client = client_for(&server, false);
        let repos = vec![
            Repository::named("acme", "first"),
            Repository::named("acme", "second"),
            Repository::named("acme", "third"),
        ];
        let err = update_vulnerability_alerts(&client, Action::Enable, &repos)
            .await
            .unwrap_err();

        assert_eq!(err.partial_count(), Some(1));
        assert!(err.to_string().contains("second"));
    }

    #[tokio::test]
    async fn failed_update_aborts_with_partial_count() {
        let server = MockServer::start().await;
        mount_alerts_state(&server, "acme", "first", false).await;
        Mock::given(method("PUT"))
            .and(path("/repos/acme/first/vulnerability-alerts"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/second/vulnerability-alerts"))
            .respond_with(ResponseTemplate::new(404))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, false);
        let repos = vec![
            Repository::named("acme", "first"),
            Repository::named("acme", "second"),
        ];
        let err = update_vulnerability_alerts(&client, Action::Enable, &repos)
            .await
            .unwrap_err();

        assert_eq!(err.partial_count(), Some(0));
        match err {
            GithubVulError::Reconcile { repo, feature, .. } => {
                assert_eq!(repo, "first");
                assert_eq!(feature, Feature::VulnerabilityAlerts);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
