//! Writes computed diffs back to the remote API.
//!
//! Diffs are applied in the order given, one write per diff, and never
//! batched even when several diffs target the same repository. The first
//! failing write stops the run. Writes that succeeded before it stay in
//! effect; there is no rollback.

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::{Phase, PropertyDiff, ReconcileError, RepositoryClient};

/// Applies `diffs` in order and returns how many were written.
///
/// On failure the error carries the failing diff and the number of diffs
/// already written. An empty slice is a successful no-op. The cancellation
/// token is checked before each write; a cancelled run reports how many diffs
/// were written before it stopped.
#[instrument(skip_all, fields(diffs = diffs.len()))]
pub async fn apply_diffs(
    diffs: &[PropertyDiff],
    client: &dyn RepositoryClient,
    cancel: &CancellationToken,
) -> Result<usize, ReconcileError> {
    for (applied, diff) in diffs.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!(applied, remaining = diffs.len() - applied, "Apply cancelled");
            return Err(ReconcileError::Cancelled {
                phase: Phase::Apply,
                applied,
            });
        }

        let repo = diff.repo();
        let update = BTreeMap::from([(diff.property_name.clone(), diff.new_value.clone())]);

        if let Err(cause) = client.write_custom_properties(&repo, &update).await {
            error!(
                repository = %repo,
                property = %diff.property_name,
                applied,
                error = %cause,
                "Property write failed"
            );
            return Err(ReconcileError::Apply {
                diff: Box::new(diff.clone()),
                applied,
                cause,
            });
        }

        info!(
            repository = %repo,
            property = %diff.property_name,
            value = %diff.new_value,
            "Applied property change"
        );
    }

    Ok(diffs.len())
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod tests;
