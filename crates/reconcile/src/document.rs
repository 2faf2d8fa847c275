//! YAML schema for property documents.
//!
//! One document declares the desired values of one property:
//!
//! ```yaml
//! property_name: team
//! values:
//!   - value: backend
//!     repositories:
//!       - name: org1/repo1
//!       - name: org1/repo2
//!   - value: frontend
//!     repositories:
//!       - name: org2/web
//! ```

use serde::Deserialize;

use crate::{Assignment, ConfigEntry, PropertyName, ReconcileError};

#[derive(Debug, Deserialize)]
struct PropertyDocument {
    property_name: String,
    values: Vec<ValueDocument>,
}

#[derive(Debug, Deserialize)]
struct ValueDocument {
    value: String,
    #[serde(default)]
    repositories: Vec<RepositoryDocument>,
}

#[derive(Debug, Deserialize)]
struct RepositoryDocument {
    name: String,
}

/// Parses one property document into a [`ConfigEntry`].
///
/// Fails with [`ReconcileError::Parse`] when the YAML is malformed, a required
/// key is missing, or `property_name` is empty. Repository tokens are kept
/// verbatim; their format is checked during resolution.
pub fn parse_document(text: &str) -> Result<ConfigEntry, ReconcileError> {
    let document: PropertyDocument =
        serde_yaml::from_str(text).map_err(|e| ReconcileError::Parse {
            message: e.to_string(),
        })?;

    let property_name =
        PropertyName::new(document.property_name).ok_or_else(|| ReconcileError::Parse {
            message: "property_name must not be empty".to_string(),
        })?;

    let assignments = document
        .values
        .into_iter()
        .map(|value| Assignment {
            value: value.value,
            repositories: value.repositories.into_iter().map(|r| r.name).collect(),
        })
        .collect();

    Ok(ConfigEntry {
        property_name,
        assignments,
    })
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
