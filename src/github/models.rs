use crate::error::GithubVulError;
use http::Method;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// A repository as returned by `GET /orgs/{org}/repos`. Only the fields the
/// reconcilers need are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    pub owner: Owner,
}

impl Repository {
    /// A repository named on the command line. Never treated as archived.
    pub fn named(org: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            archived: false,
            owner: Owner {
                login: org.to_string(),
            },
        }
    }

    pub fn endpoint(&self, feature: Feature) -> String {
        format!(
            "/repos/{}/{}/{}",
            self.owner.login,
            self.name,
            feature.path_segment()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Enable,
    Disable,
}

impl Action {
    pub fn method(self) -> Method {
        match self {
            Action::Enable => Method::PUT,
            Action::Disable => Method::DELETE,
        }
    }

    /// Whether a repository currently in state `enabled` needs a call to reach this action.
    pub fn needs_change(self, enabled: bool) -> bool {
        match self {
            Action::Enable => !enabled,
            Action::Disable => enabled,
        }
    }
}

impl FromStr for Action {
    type Err = GithubVulError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enable" => Ok(Action::Enable),
            "disable" => Ok(Action::Disable),
            other => Err(GithubVulError::InvalidAction(other.to_string())),
        }
    }
}

impl From<bool> for Action {
    fn from(enable: bool) -> Self {
        if enable {
            Action::Enable
        } else {
            Action::Disable
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Enable => f.write_str("enable"),
            Action::Disable => f.write_str("disable"),
        }
    }
}

/// Per-repository security settings managed by this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    VulnerabilityAlerts,
    AutomatedSecurityFixes,
}

impl Feature {
    pub fn path_segment(self) -> &'static str {
        match self {
            Feature::VulnerabilityAlerts => "vulnerability-alerts",
            Feature::AutomatedSecurityFixes => "automated-security-fixes",
        }
    }

    /// Preview media type required while these endpoints are outside the stable API.
    pub fn preview_media_type(self) -> &'static str {
        match self {
            Feature::VulnerabilityAlerts => "application/vnd.github.dorian-preview+json",
            Feature::AutomatedSecurityFixes => "application/vnd.github.london-preview+json",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::VulnerabilityAlerts => f.write_str("vulnerability alerts"),
            Feature::AutomatedSecurityFixes => f.write_str("automated security fixes"),
        }
    }
}
