//! State owned by a single reconciliation run.

use std::io::Read;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use crate::{
    apply, diff, resolver, ConfigEntry, ConfigStore, PropertyDiff, ReconcileError,
    RepositoryClient, RunId, SnapshotCache,
};

/// Everything one `plan` or `apply` invocation accumulates.
///
/// Construct a fresh context per run. The context owns the [`ConfigStore`] and
/// the [`SnapshotCache`] exclusively and is not meant to be shared between
/// tasks; callers that need that must wrap it in their own lock.
pub struct ReconcileContext {
    run_id: RunId,
    client: Arc<dyn RepositoryClient>,
    store: ConfigStore,
    snapshots: SnapshotCache,
}

impl ReconcileContext {
    pub fn new(client: Arc<dyn RepositoryClient>) -> Self {
        Self {
            run_id: RunId::new_random(),
            client,
            store: ConfigStore::new(),
            snapshots: SnapshotCache::new(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn snapshots(&self) -> &SnapshotCache {
        &self.snapshots
    }

    /// Loads one property document. See [`ConfigStore::load_str`].
    pub fn load_str(&mut self, text: &str) -> Result<&ConfigEntry, ReconcileError> {
        self.store.load_str(text)
    }

    /// Loads one property document from a reader. See [`ConfigStore::load_reader`].
    pub fn load_reader(&mut self, reader: impl Read) -> Result<&ConfigEntry, ReconcileError> {
        self.store.load_reader(reader)
    }

    /// Fetches every repository the loaded documents reference.
    pub async fn resolve(&mut self, cancel: &CancellationToken) -> Result<(), ReconcileError> {
        let span = info_span!("resolve", run_id = %self.run_id);
        resolver::resolve_repositories(&self.store, &mut self.snapshots, self.client.as_ref(), cancel)
            .instrument(span)
            .await
    }

    /// Diffs the resolved snapshots against the desired state.
    pub fn diff(&self) -> Result<Vec<PropertyDiff>, ReconcileError> {
        let _guard = info_span!("diff", run_id = %self.run_id).entered();
        diff::compute_diffs(&self.snapshots, &self.store)
    }

    /// Resolves and diffs. Issues no writes.
    pub async fn plan(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Vec<PropertyDiff>, ReconcileError> {
        self.resolve(cancel).await?;
        let diffs = self.diff()?;
        info!(run_id = %self.run_id, diffs = diffs.len(), "Plan complete");
        Ok(diffs)
    }

    /// Applies `diffs` in order. See [`apply::apply_diffs`].
    pub async fn apply(
        &self,
        diffs: &[PropertyDiff],
        cancel: &CancellationToken,
    ) -> Result<usize, ReconcileError> {
        let span = info_span!("apply", run_id = %self.run_id);
        apply::apply_diffs(diffs, self.client.as_ref(), cancel)
            .instrument(span)
            .await
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
