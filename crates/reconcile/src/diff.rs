//! Computes property diffs between desired and observed state.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, instrument};

use crate::{ConfigStore, PropertyDiff, PropertyName, ReconcileError, RepoRef, SnapshotCache};

/// Desired values grouped by repository, built once per diff.
#[derive(Debug, Default)]
pub struct DesiredIndex {
    by_repo: HashMap<RepoRef, BTreeMap<PropertyName, String>>,
}

impl DesiredIndex {
    /// Indexes every assignment in `store`.
    ///
    /// The store guarantees each `(repository, property)` pair has a single
    /// value, so repeated references collapse into one index entry.
    pub fn build(store: &ConfigStore) -> Result<Self, ReconcileError> {
        let mut by_repo: HashMap<RepoRef, BTreeMap<PropertyName, String>> = HashMap::new();
        for entry in store.entries() {
            for (token, value) in entry.pairs() {
                by_repo
                    .entry(RepoRef::parse(token)?)
                    .or_default()
                    .insert(entry.property_name.clone(), value.to_string());
            }
        }
        Ok(Self { by_repo })
    }

    /// Desired `(property, value)` pairs for `repo`, ordered by property name.
    pub fn desired_for(&self, repo: &RepoRef) -> Option<&BTreeMap<PropertyName, String>> {
        self.by_repo.get(repo)
    }
}

/// Produces one [`PropertyDiff`] per property whose coerced observed value
/// differs from its desired value.
///
/// The result is sorted by organization, repository, then property name, so it
/// does not depend on document load order or fetch order. An empty result is
/// not an error. Fails with [`ReconcileError::EmptyState`] when `snapshots` is
/// empty.
#[instrument(skip_all, fields(repositories = snapshots.len()))]
pub fn compute_diffs(
    snapshots: &SnapshotCache,
    store: &ConfigStore,
) -> Result<Vec<PropertyDiff>, ReconcileError> {
    if snapshots.is_empty() {
        return Err(ReconcileError::EmptyState);
    }

    let index = DesiredIndex::build(store)?;

    let mut diffs = Vec::new();
    for snapshot in snapshots.iter() {
        let Some(desired) = index.desired_for(snapshot.repo()) else {
            continue;
        };

        for (property, new_value) in desired {
            let old_value = snapshot.observed(property);
            if old_value == new_value.as_str() {
                continue;
            }
            diffs.push(PropertyDiff {
                organization: snapshot.repo().organization().clone(),
                repository: snapshot.repo().repository().clone(),
                property_name: property.clone(),
                old_value: old_value.to_string(),
                new_value: new_value.clone(),
            });
        }
    }

    diffs.sort();
    debug!(diffs = diffs.len(), "Computed property diffs");
    Ok(diffs)
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
