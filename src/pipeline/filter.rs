//! Candidate filtering by name, description and language.

use regex::Regex;

use crate::error::Result;
use crate::models::{CandidateRecord, FilterConfig};

const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Repository name matched a pattern
    RepoPattern(String),
    /// Description matched a pattern
    DescriptionPattern(String),
    /// Language not in the accepted list
    Language(String),
}

/// Compiled candidate filter.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    repo_patterns: Vec<Regex>,
    description_patterns: Vec<Regex>,
    /// Lower-cased accepted languages; `None` accepts everything
    languages: Option<Vec<String>>,
}

impl CandidateFilter {
    /// Compile a filter from configuration.
    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        let compile = |patterns: &[String]| -> Result<Vec<Regex>> {
            patterns
                .iter()
                .map(|p| Regex::new(p).map_err(Into::into))
                .collect()
        };

        let languages = if config.accepts_all_languages() {
            None
        } else {
            Some(
                config
                    .accept_languages
                    .iter()
                    .map(|l| l.trim().to_lowercase())
                    .collect(),
            )
        };

        Ok(Self {
            repo_patterns: compile(&config.repo_patterns)?,
            description_patterns: compile(&config.description_patterns)?,
            languages,
        })
    }

    /// Check a single candidate.
    pub fn check(&self, record: &CandidateRecord) -> Option<Rejection> {
        let name = record.id.name();
        if let Some(p) = self.repo_patterns.iter().find(|p| p.is_match(name)) {
            return Some(Rejection::RepoPattern(p.as_str().to_string()));
        }

        if let Some(description) = &record.description {
            if let Some(p) = self.description_patterns.iter().find(|p| p.is_match(description)) {
                return Some(Rejection::DescriptionPattern(p.as_str().to_string()));
            }
        }

        if let Some(languages) = &self.languages {
            let language = record.language.as_deref().unwrap_or(UNKNOWN_LANGUAGE);
            if !languages.contains(&language.to_lowercase()) {
                return Some(Rejection::Language(language.to_string()));
            }
        }
        None
    }

    /// Keep accepted candidates in order, returning them with the rejected count.
    pub fn apply(&self, records: Vec<CandidateRecord>) -> (Vec<CandidateRecord>, usize) {
        let total = records.len();
        let kept: Vec<CandidateRecord> = records
            .into_iter()
            .filter(|record| match self.check(record) {
                Some(rejection) => {
                    log::debug!("{} filtered out: {:?}", record.id, rejection);
                    false
                }
                None => true,
            })
            .collect();
        let rejected = total - kept.len();
        (kept, rejected)
    }
}
