//! Merge of fetched candidates against persisted state.
//!
//! Computes the delta between what the sources report now and what the user
//! has already seen or dismissed:
//!
//! - duplicates across sources collapse to their first occurrence
//! - ids with a user decision are dropped
//! - ids already in the seen cache are dropped, their first-seen time kept
//! - everything else is new: added to the cache and returned as the delta

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CandidateRecord, DecisionBook, RepoId, SeenCache};

/// Counters describing one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Candidates handed to the merge
    pub candidates: usize,
    /// Repeated ids dropped in favor of their first occurrence
    pub duplicates: usize,
    /// Known ids dropped because of a user decision
    pub decided: usize,
    /// Known ids dropped because they were already seen
    pub cached: usize,
    /// New ids, equal to the delta length
    pub added: usize,
}

/// Result of merging candidates into state.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// New candidates in input order
    pub delta: Vec<CandidateRecord>,
    /// Seen cache including the delta, ready to persist
    pub cache: SeenCache,
    pub stats: MergeStats,
}

impl MergeOutcome {
    /// Whether the cache differs from the one handed in.
    pub fn cache_changed(&self) -> bool {
        self.stats.added > 0
    }
}

/// Merge engine over an in-memory copy of the persisted state.
#[derive(Debug, Clone, Copy)]
pub struct MergeEngine<'a> {
    cache: &'a SeenCache,
    decisions: &'a DecisionBook,
}

impl<'a> MergeEngine<'a> {
    pub fn new(cache: &'a SeenCache, decisions: &'a DecisionBook) -> Self {
        Self { cache, decisions }
    }

    /// Merge candidates, stamping new cache entries with `now`.
    pub fn merge(&self, candidates: Vec<CandidateRecord>, now: DateTime<Utc>) -> MergeOutcome {
        let mut stats = MergeStats {
            candidates: candidates.len(),
            ..MergeStats::default()
        };
        let mut cache = self.cache.clone();
        let mut seen: HashSet<RepoId> = HashSet::with_capacity(candidates.len());
        let mut delta = Vec::new();

        for candidate in candidates {
            if !seen.insert(candidate.id.clone()) {
                stats.duplicates += 1;
                continue;
            }

            if self.decisions.contains(&candidate.id) {
                log::debug!("{} already {}", candidate.id, self.decision_label(&candidate.id));
                stats.decided += 1;
                continue;
            }

            if self.cache.contains(&candidate.id) {
                stats.cached += 1;
                continue;
            }

            cache.insert(candidate.id.clone(), now);
            delta.push(candidate);
        }

        stats.added = delta.len();
        MergeOutcome {
            delta,
            cache,
            stats,
        }
    }

    fn decision_label(&self, id: &RepoId) -> &'static str {
        self.decisions.get(id).map_or("decided", |d| d.as_str())
    }
}

/// Convenience function to merge candidates against state.
pub fn merge_candidates(
    candidates: Vec<CandidateRecord>,
    cache: &SeenCache,
    decisions: &DecisionBook,
    now: DateTime<Utc>,
) -> MergeOutcome {
    MergeEngine::new(cache, decisions).merge(candidates, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Decision, SourceTag};
    use chrono::Duration;

    fn id(s: &str) -> RepoId {
        s.parse().unwrap()
    }

    fn candidate(repo: &str, source: SourceTag) -> CandidateRecord {
        CandidateRecord::new(id(repo), source, source.as_str())
    }

    fn ids(records: &[CandidateRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_state_everything_new() {
        let now = Utc::now();
        let outcome = merge_candidates(
            vec![candidate("a/b", SourceTag::Search), candidate("c/d", SourceTag::Trend)],
            &SeenCache::new(),
            &DecisionBook::new(),
            now,
        );

        assert_eq!(ids(&outcome.delta), vec!["a/b", "c/d"]);
        assert_eq!(outcome.cache.len(), 2);
        assert_eq!(outcome.cache.first_seen(&id("a/b")), Some(now));
        assert!(outcome.cache_changed());
    }

    #[test]
    fn test_cached_ids_are_suppressed() {
        let earlier = Utc::now() - Duration::days(7);
        let cache: SeenCache = [(id("a/b"), earlier)].into_iter().collect();

        let outcome = merge_candidates(
            vec![candidate("a/b", SourceTag::Search), candidate("c/d", SourceTag::Search)],
            &cache,
            &DecisionBook::new(),
            Utc::now(),
        );

        assert_eq!(ids(&outcome.delta), vec!["c/d"]);
        assert_eq!(outcome.cache.first_seen(&id("a/b")), Some(earlier));
        assert_eq!(outcome.stats.cached, 1);
    }

    #[test]
    fn test_decided_ids_are_dropped_and_not_cached() {
        let mut decisions = DecisionBook::new();
        decisions.mark(id("a/b"), Decision::Zapped);
        let cache = SeenCache::new();

        let outcome =
            merge_candidates(vec![candidate("a/b", SourceTag::Forum)], &cache, &decisions, Utc::now());

        assert!(outcome.delta.is_empty());
        assert_eq!(outcome.cache, cache);
        assert!(!outcome.cache_changed());
        assert_eq!(outcome.stats.decided, 1);
    }

    #[test]
    fn test_skipped_and_zapped_suppress_alike() {
        let mut decisions = DecisionBook::new();
        decisions.mark(id("a/b"), Decision::Skipped);
        decisions.mark(id("c/d"), Decision::Zapped);

        let outcome = merge_candidates(
            vec![
                candidate("a/b", SourceTag::Search),
                candidate("c/d", SourceTag::Search),
                candidate("a/b", SourceTag::Trend),
            ],
            &SeenCache::new(),
            &decisions,
            Utc::now(),
        );
        assert!(outcome.delta.is_empty());
    }

    #[test]
    fn test_duplicates_keep_first_source() {
        let mut first = candidate("a/b", SourceTag::Trend);
        first.description = Some("from trends".into());
        let mut second = candidate("a/b", SourceTag::Search);
        second.description = Some("from search".into());

        let outcome = merge_candidates(
            vec![first, second, candidate("c/d", SourceTag::Forum)],
            &SeenCache::new(),
            &DecisionBook::new(),
            Utc::now(),
        );

        assert_eq!(ids(&outcome.delta), vec!["a/b", "c/d"]);
        assert_eq!(outcome.delta[0].source, SourceTag::Trend);
        assert_eq!(outcome.delta[0].description.as_deref(), Some("from trends"));
        assert_eq!(outcome.stats.duplicates, 1);
    }

    #[test]
    fn test_ids_match_regardless_of_case() {
        let cache: SeenCache = [(id("Seen/Repo"), Utc::now())].into_iter().collect();
        let outcome = merge_candidates(
            vec![
                candidate("Owner/Tool", SourceTag::Trend),
                candidate("owner/tool", SourceTag::Search),
                candidate("seen/repo", SourceTag::Forum),
            ],
            &cache,
            &DecisionBook::new(),
            Utc::now(),
        );

        assert_eq!(ids(&outcome.delta), vec!["Owner/Tool"]);
        assert_eq!(outcome.stats.duplicates, 1);
        assert_eq!(outcome.stats.cached, 1);
    }

    #[test]
    fn test_second_merge_is_empty() {
        let candidates = vec![candidate("a/b", SourceTag::Search), candidate("c/d", SourceTag::Forum)];
        let decisions = DecisionBook::new();

        let first = merge_candidates(candidates.clone(), &SeenCache::new(), &decisions, Utc::now());
        let second = merge_candidates(candidates, &first.cache, &decisions, Utc::now());

        assert_eq!(first.delta.len(), 2);
        assert!(second.delta.is_empty());
        assert_eq!(second.cache, first.cache);
        assert_eq!(second.stats.cached, 2);
    }

    #[test]
    fn test_empty_input_leaves_state_unchanged() {
        let cache: SeenCache = [(id("a/b"), Utc::now())].into_iter().collect();
        let outcome = merge_candidates(Vec::new(), &cache, &DecisionBook::new(), Utc::now());

        assert!(outcome.delta.is_empty());
        assert_eq!(outcome.cache, cache);
        assert_eq!(outcome.stats, MergeStats::default());
    }
}
