use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Runtime configuration for GitHub API clients.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` means anonymous access (60 requests/hour on github.com).
    pub token: Option<String>,
    pub api_url: String,
    pub graphql_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - GITHUB_TOKEN (or GH_TOKEN) [optional; anonymous when unset]
    /// - GITHUB_API_URL (default: https://api.github.com)
    /// - GITHUB_GRAPHQL_URL (default: <GITHUB_API_URL>/graphql)
    /// - GITHUB_API_VERSION (default: 2022-11-28)
    /// - GITHUB_HTTP_TIMEOUT_SECS (default: 30)
    /// - GITHUB_HTTP_MAX_RETRIES (default: 5)
    /// - GITHUB_USER_AGENT (default: gh-repo-stats/<version>)
    pub fn from_env() -> Result<Self> {
        let token = env::var("GITHUB_TOKEN")
            .or_else(|_| env::var("GH_TOKEN"))
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let api_url = env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string())
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&api_url)
            .map_err(|e| Error::Config(format!("invalid GITHUB_API_URL {api_url}: {e}")))?;

        let graphql_url =
            env::var("GITHUB_GRAPHQL_URL").unwrap_or_else(|_| format!("{api_url}/graphql"));
        let api_version =
            env::var("GITHUB_API_VERSION").unwrap_or_else(|_| "2022-11-28".to_string());
        let timeout_secs = env::var("GITHUB_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        let max_retries = env::var("GITHUB_HTTP_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5);
        let user_agent = env::var("GITHUB_USER_AGENT")
            .unwrap_or_else(|_| format!("gh-repo-stats/{}", env!("CARGO_PKG_VERSION")));

        Ok(Self {
            token,
            api_url,
            graphql_url,
            api_version,
            user_agent,
            timeout_secs,
            max_retries,
        })
    }

    /// Replace the token with the contents of an OAuth token file.
    /// Trailing newlines are not allowed in the Authorization header, so the
    /// contents are trimmed.
    pub fn with_token_file(mut self, path: &Path) -> Result<Self> {
        let path = expand_home(path);
        let raw = std::fs::read_to_string(&path)?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(Error::Config(format!(
                "token file {} is empty",
                path.display()
            )));
        }
        self.token = Some(token.to_string());
        Ok(self)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}
