use crate::error::{GithubVulError, Result};
use crate::github::models::{Action, Feature, Repository};
use http::{header, Method, StatusCode};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: u32 = 100;

#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

pub struct GithubClient {
    octocrab: Octocrab,
    dry_run: bool,
}

impl GithubClient {
    /// Builds a client for `api_url`. Plain `http://` URLs are only meant for
    /// local test servers.
    pub fn new(token: Option<&str>, api_url: &str, dry_run: bool) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .base_uri(api_url)
            .map_err(|e| GithubVulError::Config(format!("invalid API URL {api_url}: {e}")))?
            .add_retry_config(RetryConfig::None);
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }
        let octocrab = builder
            .build()
            .map_err(|e| GithubVulError::GitHub(e.to_string()))?;
        Ok(Self { octocrab, dry_run })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Sends one request. Any status >= 400 is returned as
    /// [`GithubVulError::HttpStatus`] so callers can still look at the code.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        accept: Option<&str>,
    ) -> Result<ApiResponse> {
        tracing::debug!(%method, path, "sending request");

        let mut builder = http::Request::builder().method(method.clone()).uri(path);
        if let Some(accept) = accept {
            builder = builder.header(header::ACCEPT, accept);
        }
        let request = self.octocrab.build_request(builder, None::<&()>)?;
        let response = self.octocrab.execute(request).await?;
        let status = response.status();
        let body = self.octocrab.body_to_string(response).await?;

        tracing::debug!(%method, path, %status, "received response");

        if status.as_u16() >= 400 {
            return Err(GithubVulError::HttpStatus {
                method,
                path: path.to_string(),
                status,
            });
        }
        Ok(ApiResponse { status, body })
    }

    /// Lists every repository of `org`, least recently updated first. Pages are
    /// requested until one comes back empty.
    pub async fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>> {
        let mut all_repos = Vec::new();
        let mut page = 1u32;
        loop {
            let repos = match self.fetch_repo_page(org, page).await {
                Ok(repos) => repos,
                Err(source) => {
                    return Err(GithubVulError::ListRepositories {
                        page,
                        fetched: all_repos,
                        source: Box::new(source),
                    })
                }
            };
            if repos.is_empty() {
                break;
            }
            all_repos.extend(repos);
            page += 1;
        }
        tracing::debug!(org, count = all_repos.len(), "listed repositories");
        Ok(all_repos)
    }

    async fn fetch_repo_page(&self, org: &str, page: u32) -> Result<Vec<Repository>> {
        let path = format!(
            "/orgs/{org}/repos?type=all&sort=updated&direction=asc&per_page={PER_PAGE}&page={page}"
        );
        let response = self.request(Method::GET, &path, None).await?;
        // A `null` body counts as an empty page.
        let repos: Option<Vec<Repository>> = serde_json::from_str(&response.body)?;
        Ok(repos.unwrap_or_default())
    }

    /// GitHub answers 204 when alerts are on and 404 when they are off.
    pub async fn vulnerability_alerts_enabled(&self, repo: &Repository) -> Result<bool> {
        let feature = Feature::VulnerabilityAlerts;
        let result = self
            .request(
                Method::GET,
                &repo.endpoint(feature),
                Some(feature.preview_media_type()),
            )
            .await;

        let source = match result {
            Ok(response) if response.status == StatusCode::NO_CONTENT => return Ok(true),
            Ok(response) => GithubVulError::UnexpectedStatus(response.status),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => return Ok(false),
            Err(e) => e,
        };
        Err(GithubVulError::CheckAlerts {
            repo: repo.name.clone(),
            source: Box::new(source),
        })
    }

    /// Issues the mutating call for `feature`. Dry-run gating is the caller's job.
    pub async fn set_feature(
        &self,
        repo: &Repository,
        feature: Feature,
        action: Action,
    ) -> Result<()> {
        self.request(
            action.method(),
            &repo.endpoint(feature),
            Some(feature.preview_media_type()),
        )
        .await?;
        Ok(())
    }
}
