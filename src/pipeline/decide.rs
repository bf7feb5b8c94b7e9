// src/pipeline/decide.rs

//! Recording user decisions.

use crate::error::Result;
use crate::models::{Decision, RepoId};
use crate::storage::StateStore;

/// Mark repositories with a decision and persist the decision file.
///
/// Returns the number of ids whose entry was added or changed. The file is
/// only rewritten when something changed.
pub async fn mark(store: &dyn StateStore, ids: &[RepoId], decision: Decision) -> Result<usize> {
    let mut decisions = store.load_decisions().await?;

    let mut changed = 0;
    for id in ids {
        match decisions.mark(id.clone(), decision) {
            Some(previous) if previous == decision => {
                log::info!("{} already {}", id, decision);
            }
            Some(previous) => {
                log::info!("{} changed from {} to {}", id, previous, decision);
                changed += 1;
            }
            None => {
                log::info!("{} {}", id, decision);
                changed += 1;
            }
        }
    }

    if changed > 0 {
        store.save_decisions(&decisions).await?;
    }
    Ok(changed)
}
