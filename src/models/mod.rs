// src/models/mod.rs

//! Domain models for gh-watch.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod candidate;
mod config;
mod repo_id;
mod state;

// Re-export all public types
pub use candidate::{CandidateRecord, SourceTag};
pub use config::{Config, FetchConfig, FetchKind, FilterConfig, HttpConfig, LicenseConfig};
pub use repo_id::RepoId;
pub use state::{Decision, DecisionBook, FetchLog, SeenCache};
