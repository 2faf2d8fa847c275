//! Shared value types for the reconciliation domain.
//!
//! [`ConfigEntry`] is the desired side, [`RepositorySnapshot`] the observed
//! side, and [`PropertyDiff`] the difference between them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{OrganizationName, PropertyName, RepoRef, RepositoryName};

// ---------------------------------------------------------------------------
// Desired state
// ---------------------------------------------------------------------------

/// One desired value and the repositories it is assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The desired property value.
    pub value: String,

    /// Repository tokens in `organization/repository` form, as written in the
    /// document. Tokens are validated during resolution, not at load time.
    pub repositories: Vec<String>,
}

/// The desired state declared by one property document.
///
/// Created once per loaded document and never mutated. Several entries may
/// share a [`PropertyName`]; the [`crate::ConfigStore`] treats them as one
/// logical group for conflict checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// The property every assignment in this entry sets.
    pub property_name: PropertyName,

    /// Assignments in document order.
    pub assignments: Vec<Assignment>,
}

impl ConfigEntry {
    /// Iterates over every `(repository token, desired value)` pair in document order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assignments.iter().flat_map(|assignment| {
            assignment
                .repositories
                .iter()
                .map(move |token| (token.as_str(), assignment.value.as_str()))
        })
    }
}

// ---------------------------------------------------------------------------
// Observed state
// ---------------------------------------------------------------------------

/// An observed custom property value.
///
/// The remote API may return any JSON type for a property. Only strings are
/// meaningful for comparison; everything else is [`PropertyValue::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// A string-typed value.
    Text(String),
    /// Any non-string value: null, number, boolean, array, or object.
    Other,
}

impl PropertyValue {
    /// Returns the value used for diffing.
    ///
    /// Strings are used verbatim; every other type compares as the empty
    /// string, i.e. as if the property were unset.
    pub fn coerce(&self) -> &str {
        match self {
            PropertyValue::Text(text) => text.as_str(),
            PropertyValue::Other => "",
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => PropertyValue::Text(text),
            _ => PropertyValue::Other,
        }
    }
}

/// The observed custom properties of one repository at fetch time.
///
/// Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    repo: RepoRef,
    custom_properties: BTreeMap<String, PropertyValue>,
}

impl RepositorySnapshot {
    pub fn new(repo: RepoRef, custom_properties: BTreeMap<String, PropertyValue>) -> Self {
        Self {
            repo,
            custom_properties,
        }
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn custom_properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.custom_properties
    }

    /// Returns the coerced observed value of `property`; absent properties are `""`.
    pub fn observed(&self, property: &PropertyName) -> &str {
        self.custom_properties
            .get(property.as_str())
            .map_or("", PropertyValue::coerce)
    }
}

// ---------------------------------------------------------------------------
// Diffs
// ---------------------------------------------------------------------------

/// A single property on a single repository whose desired value differs from
/// its observed value.
///
/// The derived ordering compares `organization`, then `repository`, then
/// `property_name`, which is the order diffs are reported and applied in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyDiff {
    pub organization: OrganizationName,
    pub repository: RepositoryName,
    pub property_name: PropertyName,
    /// Coerced observed value; `""` when unset or non-string.
    pub old_value: String,
    pub new_value: String,
}

impl PropertyDiff {
    /// Returns the repository this diff targets.
    pub fn repo(&self) -> RepoRef {
        RepoRef::new(self.organization.clone(), self.repository.clone())
    }
}

impl std::fmt::Display for PropertyDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}: {} '{}' -> '{}'",
            self.organization, self.repository, self.property_name, self.old_value, self.new_value
        )
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
