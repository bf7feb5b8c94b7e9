//! Candidate repository record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RepoId;

/// Which kind of feed produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// GitHub repository search API
    Search,
    /// Trending repositories RSS feed
    Trend,
    /// Discussion forum listing
    Forum,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Search => "search",
            SourceTag::Trend => "trend",
            SourceTag::Forum => "forum",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository discovered by a source in the current run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Repository full name
    pub id: RepoId,

    /// Feed kind that produced this record
    pub source: SourceTag,

    /// Configured fetch key that produced this record
    pub source_key: String,

    /// When the source reported it
    pub discovered_at: DateTime<Utc>,

    /// Link to the repository
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub language: Option<String>,

    /// Stargazer count (search API only)
    #[serde(default)]
    pub stars: Option<u64>,

    /// Fork count (search API only)
    #[serde(default)]
    pub forks: Option<u64>,

    #[serde(default)]
    pub homepage: Option<String>,
}

impl CandidateRecord {
    /// Create a record with only the required fields set.
    pub fn new(id: RepoId, source: SourceTag, source_key: impl Into<String>) -> Self {
        let url = format!("https://github.com/{id}");
        Self {
            id,
            source,
            source_key: source_key.into(),
            discovered_at: Utc::now(),
            url,
            description: None,
            language: None,
            stars: None,
            forks: None,
            homepage: None,
        }
    }

    /// Format the record for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{owner}`, `{name}`, `{source}`, `{url}`
    /// - `{language}`, `{stars}`, `{forks}`, `{description}`, `{homepage}`
    ///
    /// Missing optional values render as `-`, except `{description}` and
    /// `{homepage}` which render empty.
    pub fn format(&self, template: &str) -> String {
        let count = |n: Option<u64>| n.map_or_else(|| "-".to_string(), |n| n.to_string());

        template
            .replace("{id}", self.id.as_str())
            .replace("{owner}", self.id.owner())
            .replace("{name}", self.id.name())
            .replace("{source}", self.source.as_str())
            .replace("{url}", &self.url)
            .replace("{language}", self.language.as_deref().unwrap_or("-"))
            .replace("{stars}", &count(self.stars))
            .replace("{forks}", &count(self.forks))
            .replace("{description}", self.description.as_deref().unwrap_or(""))
            .replace("{homepage}", self.homepage.as_deref().unwrap_or(""))
    }
}
