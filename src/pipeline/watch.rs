// src/pipeline/watch.rs

//! Fetch–merge–persist cycle.

use chrono::Utc;

use crate::error::Result;
use crate::models::{CandidateRecord, Config};
use crate::pipeline::fetch::fetch_all;
use crate::pipeline::filter::CandidateFilter;
use crate::pipeline::license::screen_licenses;
use crate::pipeline::merge::{MergeEngine, MergeStats};
use crate::sources::{LicenseChecker, Source};
use crate::storage::StateStore;

/// Options for a watch run.
#[derive(Clone, Copy, Default)]
pub struct WatchOptions<'a> {
    /// Fetch every source regardless of its interval
    pub force: bool,
    /// Screen new repositories for a license
    pub license: Option<&'a dyn LicenseChecker>,
}

/// What a watch run produced.
#[derive(Debug, Default)]
pub struct WatchReport {
    /// Candidates not seen or dismissed before, in source order
    pub delta: Vec<CandidateRecord>,
    pub source_total: usize,
    pub source_failures: usize,
    pub source_not_due: usize,
    pub fetched: usize,
    pub filtered: usize,
    pub merge: MergeStats,
    /// New repositories recorded as skipped for lacking a license
    pub unlicensed: usize,
}

impl WatchReport {
    fn log_summary(&self) {
        log::info!("Summary:");
        log::info!(
            "    Sources: {} total, {} failed, {} not due",
            self.source_total,
            self.source_failures,
            self.source_not_due
        );
        log::info!(
            "    Candidates: {} fetched, {} filtered, {} duplicates",
            self.fetched,
            self.filtered,
            self.merge.duplicates
        );
        log::info!(
            "    Known: {} seen before, {} skipped/zapped",
            self.merge.cached,
            self.merge.decided
        );
        if self.unlicensed > 0 {
            log::info!("    Unlicensed: {} skipped", self.unlicensed);
        }
        log::info!("    New: {}", self.delta.len());
    }
}

/// Run one watch cycle.
///
/// State is loaded before any network access so a broken state file fails
/// fast. Decisions and the seen cache are written before the report is
/// returned; a failed save leaves the previous file in place and the error
/// propagates. The fetch log is written last and a failure there only costs
/// an early refetch, so it is logged and the run still succeeds.
pub async fn run_watch(
    config: &Config,
    store: &dyn StateStore,
    sources: &[Box<dyn Source>],
    options: WatchOptions<'_>,
) -> Result<WatchReport> {
    let filter = CandidateFilter::from_config(&config.filters)?;
    let mut state = store.load().await?;
    log::info!(
        "Loaded {} seen and {} decided repositories",
        state.cache.len(),
        state.decisions.len()
    );

    let now = Utc::now();
    let fetched = fetch_all(sources, &mut state.fetch_log, options.force, now).await;
    let fetched_count = fetched.records.len();

    let (candidates, filtered) = filter.apply(fetched.records);
    let outcome = MergeEngine::new(&state.cache, &state.decisions).merge(candidates, now);
    let cache_changed = outcome.cache_changed();

    let mut delta = outcome.delta;
    let mut unlicensed = 0;
    if let Some(checker) = options.license {
        let screen = screen_licenses(checker, delta, &mut state.decisions).await;
        delta = screen.kept;
        unlicensed = screen.unlicensed;
        if unlicensed > 0 {
            store.save_decisions(&state.decisions).await?;
        }
    }

    if cache_changed {
        store.save_cache(&outcome.cache).await?;
    }
    if let Err(e) = store.save_fetch_log(&state.fetch_log).await {
        log::warn!("Fetch times not saved, sources will be refetched next run: {}", e);
    }

    let report = WatchReport {
        delta,
        source_total: fetched.source_total,
        source_failures: fetched.source_failures,
        source_not_due: fetched.source_not_due,
        fetched: fetched_count,
        filtered,
        merge: outcome.stats,
        unlicensed,
    };
    report.log_summary();
    Ok(report)
}
