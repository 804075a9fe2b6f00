use crate::error::{GithubVulError, Result};
use crate::github::DEFAULT_API_URL;
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Token variables, in precedence order.
pub const TOKEN_VARS: [&str; 2] = ["GITHUB_VUL_TOKEN", "GITHUB_TOKEN"];
pub const ORG_VAR: &str = "GITHUB_VUL_ORG";
pub const ACTION_VAR: &str = "GITHUB_VUL_ACTION";
pub const DRY_VAR: &str = "GITHUB_VUL_DRY";
pub const FIXES_VAR: &str = "GITHUB_VUL_FIXES";
pub const API_URL_VAR: &str = "GITHUB_VUL_API_URL";

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: Option<String>,
    pub org: Option<String>,
    pub action: Option<String>,
    pub repo: Option<String>,
    pub fixes: bool,
    pub dry: bool,
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            org: None,
            action: None,
            repo: None,
            fixes: false,
            dry: false,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Command-line flags. Unset flags fall back to the environment, then the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct FlagConfig {
    /// GitHub API token (GITHUB_VUL_TOKEN, GITHUB_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// GitHub org (GITHUB_VUL_ORG)
    #[arg(long)]
    pub org: Option<String>,

    /// Action to perform on vulnerability alerts [enable|disable] (GITHUB_VUL_ACTION)
    #[arg(long)]
    pub action: Option<String>,

    /// Only process this repository instead of listing the whole org
    #[arg(long)]
    pub repo: Option<String>,

    /// Enable automated security fixes; false disables them (GITHUB_VUL_FIXES)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub fixes: Option<bool>,

    /// Dry run: check state but do not change anything (GITHUB_VUL_DRY)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub dry: Option<bool>,

    /// Base URL of the GitHub API (GITHUB_VUL_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub token: Option<String>,
    pub org: Option<String>,
    pub action: Option<String>,
    pub fixes: Option<bool>,
    pub dry: Option<bool>,
    pub api_url: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Empty values count as unset and boolean
    /// values that do not parse are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            token: TOKEN_VARS.iter().find_map(|&key| get(key)),
            org: get(ORG_VAR),
            action: get(ACTION_VAR),
            fixes: get(FIXES_VAR).and_then(|v| parse_bool(&v)),
            dry: get(DRY_VAR).and_then(|v| parse_bool(&v)),
            api_url: get(API_URL_VAR),
        }
    }
}

/// Accepts the usual spellings: `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DefaultsConfig {
    pub org: Option<String>,
    pub action: Option<String>,
    pub fixes: Option<bool>,
    pub dry: Option<bool>,
    pub api_url: Option<String>,
}

/// Merges the three sources field by field.
///
/// | field   | 1st    | 2nd                                   | 3rd                 | default                  |
/// |---------|--------|---------------------------------------|---------------------|--------------------------|
/// | token   | --token| GITHUB_VUL_TOKEN, then GITHUB_TOKEN   | [auth] token        | none                     |
/// | org     | --org  | GITHUB_VUL_ORG                        | [defaults] org      | none                     |
/// | action  | --action | GITHUB_VUL_ACTION                   | [defaults] action   | none                     |
/// | repo    | --repo | -                                     | -                   | none                     |
/// | fixes   | --fixes| GITHUB_VUL_FIXES                      | [defaults] fixes    | false                    |
/// | dry     | --dry  | GITHUB_VUL_DRY                        | [defaults] dry      | false                    |
/// | api_url | --api-url | GITHUB_VUL_API_URL                 | [defaults] api_url  | https://api.github.com   |
///
/// Empty strings never win over a lower-precedence value.
pub fn merge_config(flags: &FlagConfig, env: &EnvConfig, file: &FileConfig) -> Config {
    Config {
        token: first_set([&flags.token, &env.token, &file.auth.token]),
        org: first_set([&flags.org, &env.org, &file.defaults.org]),
        action: first_set([&flags.action, &env.action, &file.defaults.action]),
        repo: first_set([&flags.repo]),
        fixes: flags
            .fixes
            .or(env.fixes)
            .or(file.defaults.fixes)
            .unwrap_or(false),
        dry: flags.dry.or(env.dry).or(file.defaults.dry).unwrap_or(false),
        api_url: first_set([&flags.api_url, &env.api_url, &file.defaults.api_url])
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
    }
}

fn first_set<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .cloned()
}

pub fn config_path() -> Result<PathBuf> {
    config_path_from(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// `$XDG_CONFIG_HOME/github-vul/config.toml`, else `~/.config/github-vul/config.toml`.
pub fn config_path_from(xdg_config_home: Option<String>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join("github-vul").join("config.toml"));
    }

    let home =
        home.ok_or_else(|| GithubVulError::Config("Cannot find home directory".into()))?;
    Ok(home.join(".config").join("github-vul").join("config.toml"))
}

pub fn load_file_config() -> Result<FileConfig> {
    read_file_config(&config_path()?)
}

/// A missing file is an empty configuration.
pub fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&contents)?;
    Ok(config)
}
