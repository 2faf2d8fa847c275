//! Resolves the repositories referenced by the desired state.
//!
//! Every repository token in the [`ConfigStore`] is parsed into a [`RepoRef`],
//! duplicates are collapsed, and each distinct repository is fetched exactly
//! once. Resolution is all-or-nothing: a malformed token or a missing
//! repository fails the whole call and leaves the snapshot cache unchanged.

use std::collections::{BTreeMap, HashSet};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{ConfigStore, Phase, ReconcileError, RepoRef, RepositoryClient, RepositorySnapshot};

/// Snapshots fetched during one run, at most one per [`RepoRef`].
#[derive(Debug, Default)]
pub struct SnapshotCache {
    snapshots: BTreeMap<RepoRef, RepositorySnapshot>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, repo: &RepoRef) -> Option<&RepositorySnapshot> {
        self.snapshots.get(repo)
    }

    pub fn contains(&self, repo: &RepoRef) -> bool {
        self.snapshots.contains_key(repo)
    }

    /// Iterates over snapshots in [`RepoRef`] order.
    pub fn iter(&self) -> impl Iterator<Item = &RepositorySnapshot> {
        self.snapshots.values()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Adds a snapshot unless one for the same repository is already cached.
    fn insert(&mut self, snapshot: RepositorySnapshot) {
        self.snapshots
            .entry(snapshot.repo().clone())
            .or_insert(snapshot);
    }
}

/// Parses every repository token in `store`, in load order, without duplicates.
///
/// Fails with [`ReconcileError::EmptyInput`] when no document has been loaded
/// and with [`ReconcileError::Format`] on the first malformed token.
pub fn referenced_repositories(store: &ConfigStore) -> Result<Vec<RepoRef>, ReconcileError> {
    if store.is_empty() {
        return Err(ReconcileError::EmptyInput);
    }

    let mut seen = HashSet::new();
    let mut repos = Vec::new();
    for entry in store.entries() {
        for (token, _) in entry.pairs() {
            let repo = RepoRef::parse(token)?;
            if seen.insert(repo.clone()) {
                repos.push(repo);
            }
        }
    }
    Ok(repos)
}

/// Fetches every repository referenced by `store` that `cache` does not hold yet.
///
/// Fetches are issued one at a time. The cancellation token is checked before
/// each fetch. New snapshots are committed to `cache` only once every fetch
/// has succeeded.
#[instrument(skip_all, fields(documents = store.len()))]
pub async fn resolve_repositories(
    store: &ConfigStore,
    cache: &mut SnapshotCache,
    client: &dyn RepositoryClient,
    cancel: &CancellationToken,
) -> Result<(), ReconcileError> {
    let repos = referenced_repositories(store)?;

    let mut fetched = Vec::new();
    for repo in repos.iter().filter(|repo| !cache.contains(repo)) {
        if cancel.is_cancelled() {
            warn!(repository = %repo, "Resolution cancelled");
            return Err(ReconcileError::Cancelled {
                phase: Phase::Resolve,
                applied: 0,
            });
        }

        debug!(repository = %repo, "Fetching repository");
        let snapshot = match client.fetch_repository(repo).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                return Err(not_found(repo, None));
            }
            Err(cause) => {
                warn!(repository = %repo, error = %cause, "Repository fetch failed");
                return Err(not_found(repo, Some(cause)));
            }
        };

        // Keyed by the reference as written, whatever casing the API echoes back.
        fetched.push(RepositorySnapshot::new(
            repo.clone(),
            snapshot.custom_properties().clone(),
        ));
    }

    let fetched_count = fetched.len();
    for snapshot in fetched {
        cache.insert(snapshot);
    }

    info!(
        referenced = repos.len(),
        fetched = fetched_count,
        "Resolved repositories"
    );
    Ok(())
}

fn not_found(repo: &RepoRef, cause: Option<crate::ClientError>) -> ReconcileError {
    ReconcileError::NotFound {
        organization: repo.organization().clone(),
        repository: repo.repository().clone(),
        cause,
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
