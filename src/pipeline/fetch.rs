// src/pipeline/fetch.rs

//! Sequential candidate collection from all sources.

use chrono::{DateTime, Utc};

use crate::models::{CandidateRecord, FetchLog};
use crate::sources::Source;

/// Summary of a fetch pass.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Candidates from every successful source, in source order
    pub records: Vec<CandidateRecord>,
    pub source_total: usize,
    pub source_failures: usize,
    pub source_not_due: usize,
}

/// Fetch from each due source in turn.
///
/// A failing source contributes no candidates and is not recorded in the
/// fetch log, so it is retried on the next invocation. Successful sources
/// have their fetch time recorded in `fetch_log`.
pub async fn fetch_all(
    sources: &[Box<dyn Source>],
    fetch_log: &mut FetchLog,
    force: bool,
    now: DateTime<Utc>,
) -> FetchOutcome {
    let mut outcome = FetchOutcome {
        source_total: sources.len(),
        ..FetchOutcome::default()
    };

    for source in sources {
        if !force && !fetch_log.is_due(source.key(), source.interval_secs(), now) {
            outcome.source_not_due += 1;
            log::info!(
                "[{}] Not due yet (last fetched {})",
                source.key(),
                fetch_log
                    .last_fetched(source.key())
                    .map_or_else(|| "never".to_string(), |t| t.to_rfc3339())
            );
            continue;
        }

        match source.fetch().await {
            Ok(records) => {
                log::info!(
                    "[{}] {} candidates from {}",
                    source.key(),
                    records.len(),
                    source.tag()
                );
                outcome.records.extend(records);
                fetch_log.record(source.key(), now);
            }
            Err(error) => {
                outcome.source_failures += 1;
                log::warn!("[{}] Fetch failed: {}", source.key(), error);
            }
        }
    }

    outcome
}
