// src/sources/search.rs

//! GitHub repository search source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{CandidateRecord, RepoId, SourceTag};
use crate::sources::Source;
use crate::utils::http::fetch_text;

const SEARCH_REPO_URL: &str = "https://api.github.com/search/repositories";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    full_name: String,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: Option<u64>,
    #[serde(default)]
    forks_count: Option<u64>,
    #[serde(default)]
    homepage: Option<String>,
}

/// Runs one repository search query.
pub struct SearchSource {
    key: String,
    interval_secs: u64,
    client: Client,
    query: String,
    sort: Option<String>,
    per_page: u32,
    token: Option<String>,
}

impl SearchSource {
    pub fn new(
        key: String,
        interval_secs: u64,
        client: Client,
        query: String,
        sort: Option<String>,
        per_page: u32,
        token: Option<String>,
    ) -> Self {
        Self {
            key,
            interval_secs,
            client,
            query,
            sort,
            per_page,
            token,
        }
    }

    /// Turn a search API response body into candidates.
    ///
    /// Items with a malformed `full_name` are skipped with a warning.
    fn parse_response(&self, body: &str, now: DateTime<Utc>) -> Result<Vec<CandidateRecord>> {
        let response: SearchResponse = serde_json::from_str(body)?;
        log::debug!(
            "{} repositories matched in total, {} returned",
            response.total_count,
            response.items.len()
        );

        let mut records = Vec::with_capacity(response.items.len());
        for item in response.items {
            let id: RepoId = match item.full_name.parse() {
                Ok(id) => id,
                Err(e) => {
                    log::warn!("[{}] {}", self.key, e);
                    continue;
                }
            };
            records.push(CandidateRecord {
                discovered_at: now,
                url: item.html_url,
                description: non_empty(item.description),
                language: non_empty(item.language),
                stars: item.stargazers_count,
                forks: item.forks_count,
                homepage: non_empty(item.homepage),
                ..CandidateRecord::new(id, SourceTag::Search, self.key.clone())
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl Source for SearchSource {
    fn key(&self) -> &str {
        &self.key
    }

    fn tag(&self) -> SourceTag {
        SourceTag::Search
    }

    fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    async fn fetch(&self) -> Result<Vec<CandidateRecord>> {
        log::info!("Searching for [{}]...", self.query);

        let per_page = self.per_page.to_string();
        let mut params = vec![("q", self.query.as_str()), ("per_page", per_page.as_str())];
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.as_str()));
        }

        let mut request = self
            .client
            .get(SEARCH_REPO_URL)
            .query(&params)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body = fetch_text(&self.key, request).await?;
        self.parse_response(&body, Utc::now())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
