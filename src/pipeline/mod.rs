//! Pipeline entry points for watch operations.
//!
//! - `run_watch`: Fetch, filter, merge against state, screen licenses, persist
//! - `mark`: Record skip/zap decisions

pub mod decide;
pub mod fetch;
pub mod filter;
pub mod license;
pub mod merge;
pub mod watch;

pub use decide::mark;
pub use fetch::{FetchOutcome, fetch_all};
pub use filter::{CandidateFilter, Rejection};
pub use license::{LicenseScreen, screen_licenses};
pub use merge::{MergeEngine, MergeOutcome, MergeStats, merge_candidates};
pub use watch::{WatchOptions, WatchReport, run_watch};
