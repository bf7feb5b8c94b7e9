// src/sources/license.rs

//! License lookup through GitHub code search.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;
use crate::models::RepoId;
use crate::utils::http::fetch_text;

const SEARCH_CODE_URL: &str = "https://api.github.com/search/code";
const LICENSE_QUERY: &str = r#"license OR copying OR copyright OR "public domain""#;
const CHECKER_KEY: &str = "license";

/// Decides whether a repository carries a license.
#[async_trait]
pub trait LicenseChecker: Send + Sync {
    async fn has_license(&self, id: &RepoId) -> Result<bool>;
}

#[derive(Debug, Deserialize)]
struct CodeSearchResponse {
    total_count: u64,
}

/// Looks for license-like files with a per-repository code search.
pub struct CodeSearchChecker {
    client: Client,
    token: Option<String>,
}

impl CodeSearchChecker {
    pub fn new(client: Client, token: Option<String>) -> Self {
        Self { client, token }
    }
}

/// Code search query restricted to one repository.
fn license_query(id: &RepoId) -> String {
    format!("{LICENSE_QUERY} repo:{id}")
}

/// Whether a code search response found any match.
fn parse_code_search(body: &str) -> Result<bool> {
    let response: CodeSearchResponse = serde_json::from_str(body)?;
    Ok(response.total_count > 0)
}

#[async_trait]
impl LicenseChecker for CodeSearchChecker {
    async fn has_license(&self, id: &RepoId) -> Result<bool> {
        log::debug!("Checking {} for license...", id);

        let query = license_query(id);
        let mut request = self
            .client
            .get(SEARCH_CODE_URL)
            .query(&[("q", query.as_str()), ("per_page", "1")])
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body = fetch_text(CHECKER_KEY, request).await?;
        parse_code_search(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUND: &str = r#"{
        "total_count": 3,
        "incomplete_results": false,
        "items": [
            {
                "name": "LICENSE",
                "path": "LICENSE",
                "repository": { "full_name": "owner/tool" }
            }
        ]
    }"#;

    const NOTHING: &str = r#"{"total_count": 0, "incomplete_results": false, "items": []}"#;

    #[test]
    fn test_parse_code_search() {
        assert!(parse_code_search(FOUND).unwrap());
        assert!(!parse_code_search(NOTHING).unwrap());
    }

    #[test]
    fn test_parse_code_search_error_body() {
        let body = r#"{"message": "Validation Failed", "errors": []}"#;
        assert!(parse_code_search(body).is_err());
    }

    #[test]
    fn test_license_query_targets_repo() {
        let id: RepoId = "Owner/Tool".parse().unwrap();
        assert_eq!(
            license_query(&id),
            r#"license OR copying OR copyright OR "public domain" repo:Owner/Tool"#
        );
    }
}
