// src/pipeline/license.rs

//! License screening of newly discovered repositories.

use crate::models::{CandidateRecord, Decision, DecisionBook};
use crate::sources::LicenseChecker;

/// Result of screening a delta.
#[derive(Debug, Default)]
pub struct LicenseScreen {
    /// Repositories still to be shown, in input order
    pub kept: Vec<CandidateRecord>,
    /// Repositories recorded as skipped for lacking a license
    pub unlicensed: usize,
    /// Repositories kept because the lookup failed
    pub unchecked: usize,
}

/// Check every record in `delta` for a license.
///
/// Unlicensed repositories get a `skipped` decision and are dropped. A failed
/// lookup keeps the repository so it is shown rather than silently lost.
pub async fn screen_licenses(
    checker: &dyn LicenseChecker,
    delta: Vec<CandidateRecord>,
    decisions: &mut DecisionBook,
) -> LicenseScreen {
    let mut screen = LicenseScreen {
        kept: Vec::with_capacity(delta.len()),
        ..Default::default()
    };

    for record in delta {
        match checker.has_license(&record.id).await {
            Ok(true) => screen.kept.push(record),
            Ok(false) => {
                log::info!("No possible license found in {}, skipped", record.id);
                decisions.mark(record.id, Decision::Skipped);
                screen.unlicensed += 1;
            }
            Err(e) => {
                log::warn!("License check for {} failed: {}", record.id, e);
                screen.unchecked += 1;
                screen.kept.push(record);
            }
        }
    }
    screen
}
