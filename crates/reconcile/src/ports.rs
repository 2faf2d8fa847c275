//! Port trait for the remote repository API.
//!
//! Infrastructure crates implement [`RepositoryClient`]; the engine only ever
//! sees this trait. Authentication, transport, and any retry policy belong to
//! the implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{ClientError, PropertyName, RepoRef, RepositorySnapshot};

/// Read and write access to repository custom properties.
///
/// The engine calls these methods one at a time and never concurrently.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Fetches the current state of `repo`.
    ///
    /// Returns `Ok(None)` when the repository does not exist or is not visible
    /// to the caller. That is an expected outcome, not a failure.
    async fn fetch_repository(
        &self,
        repo: &RepoRef,
    ) -> Result<Option<RepositorySnapshot>, ClientError>;

    /// Creates or updates the given custom property values on `repo`.
    async fn write_custom_properties(
        &self,
        repo: &RepoRef,
        properties: &BTreeMap<PropertyName, String>,
    ) -> Result<(), ClientError>;
}
