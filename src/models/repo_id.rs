//! Repository identifier.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A GitHub repository full name, `owner/name`.
///
/// GitHub names are case-insensitive, so equality, ordering and hashing use
/// the lower-cased name while display keeps the spelling first reported.
/// Serialized as a plain string so it can key JSON objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoId {
    name: String,
    key: String,
}

impl RepoId {
    /// Build an id from separate owner and name parts.
    pub fn from_parts(owner: &str, name: &str) -> Result<Self, AppError> {
        format!("{owner}/{name}").parse()
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        self.split().0
    }

    pub fn name(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        // Validated on construction, so the separator is always present.
        self.name.split_once('/').unwrap_or((&self.name, ""))
    }
}

impl FromStr for RepoId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = match s.split_once('/') {
            Some((owner, name)) => {
                !owner.is_empty()
                    && !name.is_empty()
                    && !name.contains('/')
                    && !s.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if valid {
            Ok(Self {
                name: s.to_string(),
                key: s.to_lowercase(),
            })
        } else {
            Err(AppError::InvalidRepoId(s.to_string()))
        }
    }
}

impl TryFrom<String> for RepoId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoId> for String {
    fn from(id: RepoId) -> Self {
        id.name
    }
}

impl PartialEq for RepoId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for RepoId {}

impl PartialOrd for RepoId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RepoId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for RepoId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
