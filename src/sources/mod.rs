//! Source adapters.
//!
//! Each adapter turns one configured feed into normalized
//! [`CandidateRecord`]s:
//! - `SearchSource`: GitHub repository search API
//! - `TrendSource`: trending repositories RSS feeds
//! - `ForumSource`: subreddit listing of new posts
//!
//! `CodeSearchChecker` is not a feed: it screens new repositories for a
//! license when that step is enabled.

mod forum;
mod license;
mod search;
mod trend;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{CandidateRecord, Config, FetchConfig, FetchKind, SourceTag};

pub use forum::ForumSource;
pub use license::{CodeSearchChecker, LicenseChecker};
pub use search::SearchSource;
pub use trend::TrendSource;

/// A feed that produces candidate repositories.
#[async_trait]
pub trait Source: Send + Sync {
    /// Configured fetch key, unique per source.
    fn key(&self) -> &str;

    /// Which kind of feed this is.
    fn tag(&self) -> SourceTag;

    /// Minimum seconds between fetches (0 = every run).
    fn interval_secs(&self) -> u64;

    /// Fetch the current candidates.
    async fn fetch(&self) -> Result<Vec<CandidateRecord>>;
}

/// Build one source per configured fetch, in configuration order.
pub fn build_sources(config: &Config, client: &Client) -> Vec<Box<dyn Source>> {
    config
        .fetches
        .iter()
        .map(|fetch| build_source(config, fetch, client.clone()))
        .collect()
}

fn build_source(config: &Config, fetch: &FetchConfig, client: Client) -> Box<dyn Source> {
    match &fetch.kind {
        FetchKind::Search {
            query,
            sort,
            per_page,
        } => Box::new(SearchSource::new(
            fetch.key.clone(),
            fetch.interval_secs,
            client,
            query.clone(),
            sort.clone(),
            *per_page,
            config.http.github_token.clone(),
        )),
        FetchKind::Trend { languages, period } => {
            let languages = if languages.is_empty() {
                config.filters.accept_languages.clone()
            } else {
                languages.clone()
            };
            Box::new(TrendSource::new(
                fetch.key.clone(),
                fetch.interval_secs,
                client,
                languages,
                period.clone(),
            ))
        }
        FetchKind::Forum { subreddit } => Box::new(ForumSource::new(
            fetch.key.clone(),
            fetch.interval_secs,
            client,
            subreddit.clone(),
        )),
    }
}
