//! Accumulates property documents into one conflict-free desired state.

use std::collections::HashMap;
use std::io::Read;

use tracing::debug;

use crate::{document, ConfigEntry, ReconcileError};

/// The union of every loaded [`ConfigEntry`].
///
/// Every `load_*` call either commits the whole document or rejects it and
/// leaves the store untouched. After any sequence of successful loads, each
/// `(property, repository)` pair maps to exactly one desired value, and the
/// accept/reject outcome does not depend on load order.
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: Vec<ConfigEntry>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a whole document from `reader` and loads it.
    pub fn load_reader(&mut self, mut reader: impl Read) -> Result<&ConfigEntry, ReconcileError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.load_str(&text)
    }

    /// Parses and loads one document.
    ///
    /// Fails with [`ReconcileError::Parse`] for a malformed document and with
    /// [`ReconcileError::Conflict`] when the document contradicts itself or a
    /// previously loaded document for the same property.
    pub fn load_str(&mut self, text: &str) -> Result<&ConfigEntry, ReconcileError> {
        let entry = document::parse_document(text)?;
        self.insert(entry)
    }

    /// Validates `entry` against itself and the current union, then commits it.
    pub fn insert(&mut self, entry: ConfigEntry) -> Result<&ConfigEntry, ReconcileError> {
        {
            let desired = desired_values(&entry)?;
            self.check_cross_document(&entry, &desired)?;
        }

        debug!(
            property = %entry.property_name,
            assignments = entry.assignments.len(),
            "Accepted property document"
        );
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Entries in load order.
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_cross_document(
        &self,
        entry: &ConfigEntry,
        desired: &HashMap<&str, &str>,
    ) -> Result<(), ReconcileError> {
        let same_property = self
            .entries
            .iter()
            .filter(|existing| existing.property_name == entry.property_name);

        for existing in same_property {
            for (token, existing_value) in existing.pairs() {
                if let Some(&new_value) = desired.get(token) {
                    if new_value != existing_value {
                        return Err(ReconcileError::Conflict {
                            property: entry.property_name.clone(),
                            repository: token.to_string(),
                            existing_value: existing_value.to_string(),
                            conflicting_value: new_value.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Maps each repository token in `entry` to its desired value, rejecting a
/// token assigned two different values within the same document.
fn desired_values(entry: &ConfigEntry) -> Result<HashMap<&str, &str>, ReconcileError> {
    let mut desired: HashMap<&str, &str> = HashMap::new();
    for (token, value) in entry.pairs() {
        match desired.insert(token, value) {
            Some(previous) if previous != value => {
                return Err(ReconcileError::Conflict {
                    property: entry.property_name.clone(),
                    repository: token.to_string(),
                    existing_value: previous.to_string(),
                    conflicting_value: value.to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(desired)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
