// src/sources/forum.rs

//! Subreddit listing source.
//!
//! Every post linking to a GitHub repository becomes a candidate; the post
//! title serves as the description and the link flair as the language.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{CandidateRecord, RepoId, SourceTag};
use crate::sources::Source;
use crate::utils::github_repo_from_url;
use crate::utils::http::fetch_text;

const REDDIT_BASE_URL: &str = "https://www.reddit.com/r";

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<ListingData>,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    link_flair_text: Option<String>,
    #[serde(default)]
    created_utc: Option<f64>,
}

/// Reads new posts from one subreddit.
pub struct ForumSource {
    key: String,
    interval_secs: u64,
    client: Client,
    subreddit: String,
}

impl ForumSource {
    pub fn new(key: String, interval_secs: u64, client: Client, subreddit: String) -> Self {
        Self {
            key,
            interval_secs,
            client,
            subreddit,
        }
    }

    fn listing_url(&self) -> String {
        format!("{}/{}/new/.json", REDDIT_BASE_URL, self.subreddit)
    }

    /// Turn a listing body into candidates.
    fn parse_listing(&self, body: &str, now: DateTime<Utc>) -> Result<Vec<CandidateRecord>> {
        let listing: Listing = serde_json::from_str(body)?;
        if let Some(error) = listing.error {
            return Err(AppError::adapter(
                &self.key,
                format!(
                    "{}: {}",
                    error,
                    listing.message.as_deref().unwrap_or("no message")
                ),
            ));
        }
        let posts = listing
            .data
            .ok_or_else(|| AppError::adapter(&self.key, "listing has no data"))?
            .children;
        log::debug!("{} posts returned", posts.len());

        let mut records = Vec::new();
        for Child { data: post } in posts {
            let Some(id) = github_repo_from_url(&post.url)
                .and_then(|(owner, name)| RepoId::from_parts(&owner, &name).ok())
            else {
                log::debug!("[{}] {} is not a repository link, skipped", self.key, post.url);
                continue;
            };

            let discovered_at = post
                .created_utc
                .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single())
                .unwrap_or(now);

            let mut record = CandidateRecord::new(id, SourceTag::Forum, self.key.clone());
            record.url = post.url;
            record.discovered_at = discovered_at;
            record.description = Some(post.title).filter(|t| !t.trim().is_empty());
            record.language = post.link_flair_text.as_deref().and_then(flair_language);
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl Source for ForumSource {
    fn key(&self) -> &str {
        &self.key
    }

    fn tag(&self) -> SourceTag {
        SourceTag::Forum
    }

    fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    async fn fetch(&self) -> Result<Vec<CandidateRecord>> {
        log::info!("Searching in r/{}...", self.subreddit);
        let body = fetch_text(&self.key, self.client.get(self.listing_url())).await?;
        self.parse_listing(&body, Utc::now())
    }
}

/// Map a post flair such as `CPP` or `rust` to a language name.
fn flair_language(flair: &str) -> Option<String> {
    let flair = flair.trim();
    if flair.is_empty() {
        return None;
    }
    let flair = flair.replace("CPP", "C++");

    // Title case: first letter of each word upper, the rest lower.
    let titled = flair
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");
    Some(titled)
}
