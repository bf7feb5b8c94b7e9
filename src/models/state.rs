//! Persisted state: seen cache, user decisions and fetch log.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::RepoId;
use crate::error::AppError;

/// Repositories already presented, keyed by id with their first-seen time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenCache {
    entries: BTreeMap<RepoId, DateTime<Utc>>,
}

impl SeenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &RepoId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn first_seen(&self, id: &RepoId) -> Option<DateTime<Utc>> {
        self.entries.get(id).copied()
    }

    /// Record an id as seen. An existing first-seen time is never replaced.
    ///
    /// Returns `true` when the id was not yet in the cache.
    pub fn insert(&mut self, id: RepoId, seen_at: DateTime<Utc>) -> bool {
        match self.entries.entry(id) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(seen_at);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(RepoId, DateTime<Utc>)> for SeenCache {
    fn from_iter<I: IntoIterator<Item = (RepoId, DateTime<Utc>)>>(iter: I) -> Self {
        let mut cache = Self::new();
        for (id, seen_at) in iter {
            cache.insert(id, seen_at);
        }
        cache
    }
}

/// A user's dismissal of a repository.
///
/// Both tags suppress the repository identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Skipped,
    Zapped,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Skipped => "skipped",
            Decision::Zapped => "zapped",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skipped" | "skip" => Ok(Decision::Skipped),
            "zapped" | "zap" => Ok(Decision::Zapped),
            other => Err(AppError::validation(format!("unknown decision '{other}'"))),
        }
    }
}

/// User decisions keyed by repository id. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionBook {
    entries: BTreeMap<RepoId, Decision>,
}

impl DecisionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &RepoId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &RepoId) -> Option<Decision> {
        self.entries.get(id).copied()
    }

    /// Record a decision, returning the one it replaced.
    pub fn mark(&mut self, id: RepoId, decision: Decision) -> Option<Decision> {
        self.entries.insert(id, decision)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RepoId, &Decision)> {
        self.entries.iter()
    }

    /// Count entries carrying the given tag.
    pub fn count(&self, decision: Decision) -> usize {
        self.entries.values().filter(|d| **d == decision).count()
    }
}

/// Last successful fetch time per fetch key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchLog {
    entries: BTreeMap<String, DateTime<Utc>>,
}

impl FetchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fetched(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.get(key).copied()
    }

    /// Whether a fetch with the given interval should run at `now`.
    pub fn is_due(&self, key: &str, interval_secs: u64, now: DateTime<Utc>) -> bool {
        if interval_secs == 0 {
            return true;
        }
        match self.last_fetched(key) {
            Some(last) => i64::try_from(interval_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|interval| last.checked_add_signed(interval))
                .is_some_and(|next| next <= now),
            None => true,
        }
    }

    pub fn record(&mut self, key: impl Into<String>, at: DateTime<Utc>) {
        self.entries.insert(key.into(), at);
    }
}
