//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Candidate filtering rules
    #[serde(default)]
    pub filters: FilterConfig,

    /// Feeds to fetch, in order
    #[serde(default)]
    pub fetches: Vec<FetchConfig>,

    /// License screening of new repositories
    #[serde(default)]
    pub license: LicenseConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }

        for pattern in self
            .filters
            .repo_patterns
            .iter()
            .chain(&self.filters.description_patterns)
        {
            Regex::new(pattern)
                .map_err(|e| AppError::validation(format!("filter /{pattern}/: {e}")))?;
        }

        let mut keys = HashSet::new();
        for fetch in &self.fetches {
            if fetch.key.trim().is_empty() {
                return Err(AppError::validation("fetch key is empty"));
            }
            if !keys.insert(fetch.key.as_str()) {
                return Err(AppError::validation(format!(
                    "duplicate fetch key '{}'",
                    fetch.key
                )));
            }
            fetch.kind.validate(&fetch.key)?;
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Token for the GitHub API, sent as a bearer token
    #[serde(default)]
    pub github_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            github_token: None,
        }
    }
}

/// Candidate filtering rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Languages to keep; `"All"` keeps everything
    #[serde(default = "defaults::accept_languages")]
    pub accept_languages: Vec<String>,

    /// Regexes matched against the repository name
    #[serde(default)]
    pub repo_patterns: Vec<String>,

    /// Regexes matched against the description
    #[serde(default)]
    pub description_patterns: Vec<String>,
}

impl FilterConfig {
    /// Whether every language is accepted.
    pub fn accepts_all_languages(&self) -> bool {
        self.accept_languages.iter().any(|l| l == defaults::ALL_LANGUAGES)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            accept_languages: defaults::accept_languages(),
            repo_patterns: Vec::new(),
            description_patterns: Vec::new(),
        }
    }
}

/// License screening settings.
///
/// When enabled, every new repository is looked up with GitHub code search
/// and repositories without any license-like file are recorded as skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// A single configured fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Unique name, used to track the fetch interval
    pub key: String,

    /// Minimum seconds between fetches (0 = every run)
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    #[serde(flatten)]
    pub kind: FetchKind,
}

/// Feed-specific fetch parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchKind {
    /// GitHub repository search
    Search {
        query: String,
        #[serde(default)]
        sort: Option<String>,
        #[serde(default = "defaults::per_page")]
        per_page: u32,
    },
    /// Trending repositories RSS, one feed per language
    Trend {
        /// Empty means the accepted languages from the filter config
        #[serde(default)]
        languages: Vec<String>,
        #[serde(default = "defaults::period")]
        period: String,
    },
    /// Subreddit listing of new posts
    Forum {
        #[serde(default = "defaults::subreddit")]
        subreddit: String,
    },
}

impl FetchKind {
    fn validate(&self, key: &str) -> Result<()> {
        match self {
            FetchKind::Search {
                query, per_page, ..
            } => {
                if query.trim().is_empty() {
                    return Err(AppError::validation(format!("fetch '{key}': query is empty")));
                }
                if !(1..=100).contains(per_page) {
                    return Err(AppError::validation(format!(
                        "fetch '{key}': per_page must be in 1..=100"
                    )));
                }
            }
            FetchKind::Trend { period, .. } => {
                if period.trim().is_empty() {
                    return Err(AppError::validation(format!("fetch '{key}': period is empty")));
                }
            }
            FetchKind::Forum { subreddit } => {
                if subreddit.trim().is_empty() {
                    return Err(AppError::validation(format!(
                        "fetch '{key}': subreddit is empty"
                    )));
                }
            }
        }
        Ok(())
    }
}

mod defaults {
    pub const ALL_LANGUAGES: &str = "All";

    // HTTP defaults
    pub fn user_agent() -> String {
        concat!("gh-watch/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        10
    }

    // Filter defaults
    pub fn accept_languages() -> Vec<String> {
        vec![ALL_LANGUAGES.into()]
    }

    // Fetch defaults
    pub fn interval() -> u64 {
        86_400
    }
    pub fn per_page() -> u32 {
        100
    }
    pub fn period() -> String {
        "daily".into()
    }
    pub fn subreddit() -> String {
        "coolgithubprojects".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[http]
timeout_secs = 5
github_token = "secret"

[filters]
accept_languages = ["Rust", "Go"]
repo_patterns = ["^awesome-"]

[license]
enabled = true

[[fetches]]
key = "new-rust"
type = "search"
query = "language:rust"
sort = "stars"

[[fetches]]
key = "trends"
type = "trend"
interval_secs = 3600

[[fetches]]
key = "cghp"
type = "forum"
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = toml::from_str(SAMPLE).unwrap();

        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent, defaults::user_agent());
        assert_eq!(config.http.github_token.as_deref(), Some("secret"));
        assert!(!config.filters.accepts_all_languages());
        assert!(config.license.enabled);
        assert_eq!(config.fetches.len(), 3);

        assert_eq!(config.fetches[0].interval_secs, 86_400);
        assert_eq!(
            config.fetches[0].kind,
            FetchKind::Search {
                query: "language:rust".into(),
                sort: Some("stars".into()),
                per_page: 100,
            }
        );
        assert_eq!(
            config.fetches[1].kind,
            FetchKind::Trend {
                languages: vec![],
                period: "daily".into(),
            }
        );
        assert_eq!(config.fetches[1].interval_secs, 3600);
        assert_eq!(
            config.fetches[2].kind,
            FetchKind::Forum {
                subreddit: "coolgithubprojects".into(),
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.filters.accepts_all_languages());
        assert!(config.fetches.is_empty());
        assert!(!config.license.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_keys() {
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config.fetches[2].key = "trends".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_pattern() {
        let mut config = Config::default();
        config.filters.description_patterns.push("(unclosed".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_per_page_range() {
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config.fetches[0].kind = FetchKind::Search {
            query: "x".into(),
            sort: None,
            per_page: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(tmp.path().join("config.toml"));
        assert!(config.fetches.is_empty());
    }
}
