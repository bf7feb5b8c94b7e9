// src/sources/trend.rs

//! Trending repositories RSS source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{CandidateRecord, RepoId, SourceTag};
use crate::sources::Source;
use crate::utils::http::fetch_bytes;

const RSS_URL_BASE: &str = "http://github-trends.ryotarai.info/rss";

/// Fetches trending repositories for each configured language.
pub struct TrendSource {
    key: String,
    interval_secs: u64,
    client: Client,
    languages: Vec<String>,
    period: String,
}

impl TrendSource {
    pub fn new(
        key: String,
        interval_secs: u64,
        client: Client,
        languages: Vec<String>,
        period: String,
    ) -> Self {
        Self {
            key,
            interval_secs,
            client,
            languages,
            period,
        }
    }

    /// Feed URL for one language slug.
    fn feed_url(&self, language: &str) -> String {
        format!(
            "{}/github_trends_{}_{}.rss",
            RSS_URL_BASE,
            language_slug(language),
            self.period
        )
    }

    async fn fetch_language(&self, language: &str) -> Result<Vec<CandidateRecord>> {
        let url = self.feed_url(language);
        log::debug!("Requesting {}...", url);
        let bytes = fetch_bytes(&self.key, self.client.get(&url)).await?;
        self.parse_feed(&bytes, Utc::now())
    }

    /// Turn an RSS document into candidates.
    fn parse_feed(&self, bytes: &[u8], now: DateTime<Utc>) -> Result<Vec<CandidateRecord>> {
        let feed = feed_rs::parser::parse(bytes)
            .map_err(|e| AppError::adapter(&self.key, format!("Failed to parse feed: {e}")))?;
        log::debug!("{} repositories returned", feed.entries.len());

        let mut records = Vec::with_capacity(feed.entries.len());
        for entry in feed.entries {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let Some((id, language)) = parse_title(&title) else {
                log::warn!("[{}] Unrecognized trend title '{}', skipped", self.key, title);
                continue;
            };

            let mut record = CandidateRecord::new(id, SourceTag::Trend, self.key.clone());
            if let Some(link) = entry.links.first() {
                record.url = link.href.clone();
            }
            record.discovered_at = entry.published.unwrap_or(now);
            record.description = entry
                .summary
                .map(|s| s.content.trim_end_matches('\n').to_string())
                .filter(|s| !s.trim().is_empty());
            record.language = language;
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl Source for TrendSource {
    fn key(&self) -> &str {
        &self.key
    }

    fn tag(&self) -> SourceTag {
        SourceTag::Trend
    }

    fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    async fn fetch(&self) -> Result<Vec<CandidateRecord>> {
        log::info!(
            "Fetching {} trends for {} language(s)...",
            self.period,
            self.languages.len()
        );

        let mut results = Vec::with_capacity(self.languages.len());
        for language in &self.languages {
            results.push((language.clone(), self.fetch_language(language).await));
        }
        collect_language_results(&self.key, results)
    }
}

/// Combine per-language feed results.
///
/// Failed languages are logged and dropped; the whole fetch fails only when
/// no language succeeded, with the last error seen.
fn collect_language_results(
    key: &str,
    results: Vec<(String, Result<Vec<CandidateRecord>>)>,
) -> Result<Vec<CandidateRecord>> {
    let mut records = Vec::new();
    let mut last_error = None;
    let mut succeeded = 0;
    for (language, result) in results {
        match result {
            Ok(found) => {
                succeeded += 1;
                records.extend(found);
            }
            Err(e) => {
                log::warn!("[{}] Trend feed for '{}' failed: {}", key, language, e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if succeeded == 0 => Err(e),
        _ => Ok(records),
    }
}

/// Normalize a language name into the feed's URL slug.
fn language_slug(language: &str) -> String {
    let language = language.trim();
    if language.is_empty() {
        return "unknown".to_string();
    }
    language.to_lowercase().replace("c++", "cpp")
}

/// Split an entry title of the form `owner/name (… - Language)`.
fn parse_title(title: &str) -> Option<(RepoId, Option<String>)> {
    let title = title.trim();
    let (name, rest) = title.split_once(' ').unwrap_or((title, ""));
    let id: RepoId = name.parse().ok()?;

    let language = rest
        .split(" - ")
        .nth(1)
        .map(|l| l.trim().trim_end_matches(')').trim().to_string())
        .filter(|l| !l.is_empty());
    Some((id, language))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>GitHub Trends - rust daily</title>
    <link>http://github-trends.ryotarai.info/</link>
    <description>Trending repositories</description>
    <item>
      <title>owner/tool (123 stars today - Rust)</title>
      <link>https://github.com/owner/tool</link>
      <description>A fast tool
</description>
    </item>
    <item>
      <title>nonsense</title>
      <link>https://github.com/</link>
    </item>
    <item>
      <title>other/lib</title>
      <link>https://github.com/other/lib</link>
    </item>
  </channel>
</rss>"#;

    fn source() -> TrendSource {
        TrendSource::new(
            "trends".into(),
            0,
            Client::new(),
            vec!["Rust".into(), "C++".into(), "".into()],
            "daily".into(),
        )
    }

    #[test]
    fn test_feed_url() {
        let source = source();
        assert_eq!(
            source.feed_url("C++"),
            "http://github-trends.ryotarai.info/rss/github_trends_cpp_daily.rss"
        );
        assert_eq!(
            source.feed_url(""),
            "http://github-trends.ryotarai.info/rss/github_trends_unknown_daily.rss"
        );
    }

    #[test]
    fn test_parse_title() {
        let (id, language) = parse_title("owner/tool (12 stars today - Go)").unwrap();
        assert_eq!(id.as_str(), "owner/tool");
        assert_eq!(language.as_deref(), Some("Go"));

        let (id, language) = parse_title("owner/tool").unwrap();
        assert_eq!(id.as_str(), "owner/tool");
        assert_eq!(language, None);

        assert!(parse_title("not-a-repo (Rust)").is_none());
    }

    #[test]
    fn test_parse_feed() {
        let now = Utc::now();
        let records = source().parse_feed(FEED.as_bytes(), now).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "owner/tool");
        assert_eq!(records[0].source, SourceTag::Trend);
        assert_eq!(records[0].language.as_deref(), Some("Rust"));
        assert_eq!(records[0].description.as_deref(), Some("A fast tool"));
        assert_eq!(records[0].url, "https://github.com/owner/tool");
        assert_eq!(records[1].id.as_str(), "other/lib");
        assert_eq!(records[1].description, None);
    }

    fn record(id: &str) -> CandidateRecord {
        CandidateRecord::new(id.parse().unwrap(), SourceTag::Trend, "trends")
    }

    #[test]
    fn test_one_failed_language_keeps_the_others() {
        let results = vec![
            ("Rust".to_string(), Ok(vec![record("a/b"), record("c/d")])),
            ("Go".to_string(), Err(AppError::adapter("trends", "HTTP 503"))),
        ];
        let records = collect_language_results("trends", results).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a/b", "c/d"]);
    }

    #[test]
    fn test_every_language_failed_is_error() {
        let results = vec![
            ("Rust".to_string(), Err(AppError::adapter("trends", "HTTP 500"))),
            ("Go".to_string(), Err(AppError::adapter("trends", "HTTP 503"))),
        ];
        let err = collect_language_results("trends", results).unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn test_no_languages_is_empty() {
        let records = collect_language_results("trends", Vec::new()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(source().parse_feed(b"<html>oops</html>", Utc::now()).is_err());
    }
}
