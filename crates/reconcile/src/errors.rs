//! Error types for the reconciliation domain.
//!
//! [`ReconcileError`] covers every condition that stops a reconciliation phase
//! (load, resolve, diff, apply). [`ClientError`] is the opaque cause reported by
//! a [`crate::RepositoryClient`] implementation and forwarded verbatim.
//!
//! No error is retried inside the engine. Every error aborts the remainder of
//! the phase that produced it.

use thiserror::Error;

use crate::{OrganizationName, PropertyDiff, PropertyName, RepositoryName};

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// The reconciliation phase that issues external calls.
///
/// Only these phases check for cancellation, because only they suspend on the
/// remote client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fetching repository snapshots.
    Resolve,
    /// Writing property values.
    Apply,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Resolve => write!(f, "resolve"),
            Phase::Apply => write!(f, "apply"),
        }
    }
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

/// Failure reported by a [`crate::RepositoryClient`].
///
/// The engine never inspects these beyond logging; they are carried as the
/// `source` of the [`ReconcileError`] they caused.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The remote API answered with an unexpected status code.
    #[error("unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the API.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Reconciliation errors
// ---------------------------------------------------------------------------

/// Errors that stop a reconciliation phase.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A property document could not be read from its source.
    #[error("failed to read property document")]
    Io(#[from] std::io::Error),

    /// A property document is malformed.
    ///
    /// Produced by: [`crate::ConfigStore::load_str`].
    #[error("failed to parse property document: {message}")]
    Parse {
        /// Description of the problem, including the YAML location when known.
        message: String,
    },

    /// Two assignments disagree on the value of the same property for the
    /// same repository, either within one document or across documents.
    #[error(
        "conflicting values for property '{property}' on repository '{repository}': \
         '{existing_value}' and '{conflicting_value}'"
    )]
    Conflict {
        /// The property both assignments target.
        property: PropertyName,
        /// The repository token both assignments reference.
        repository: String,
        /// The value that was accepted first.
        existing_value: String,
        /// The value that contradicts it.
        conflicting_value: String,
    },

    /// Resolution was requested before any document was loaded.
    #[error("no property documents loaded")]
    EmptyInput,

    /// A repository token is not in `organization/repository` form.
    #[error("repository name '{token}' is not in the format 'org/repo'")]
    Format {
        /// The offending token, verbatim.
        token: String,
    },

    /// A referenced repository does not exist or is not accessible.
    #[error("repository {repository} not found in organization {organization}")]
    NotFound {
        /// Organization of the missing repository.
        organization: OrganizationName,
        /// Name of the missing repository.
        repository: RepositoryName,
        /// Client failure that made the repository inaccessible, if any.
        #[source]
        cause: Option<ClientError>,
    },

    /// A diff was requested with no resolved repositories.
    #[error("no repositories found")]
    EmptyState,

    /// A remote write failed.
    ///
    /// Writes issued before the failing one remain in effect; `applied` is how
    /// many of them there were.
    #[error("failed to apply {diff} ({applied} earlier change(s) remain applied)")]
    Apply {
        /// The diff whose write failed.
        diff: Box<PropertyDiff>,
        /// Number of diffs written successfully before this one.
        applied: usize,
        /// The client's failure, forwarded verbatim.
        #[source]
        cause: ClientError,
    },

    /// The run was cancelled before an external call.
    ///
    /// Writes issued before the cancellation remain in effect; `applied` is
    /// how many of them there were. Always zero during resolution.
    #[error("reconciliation cancelled during {phase} after {applied} write(s)")]
    Cancelled {
        /// The phase that observed the cancellation.
        phase: Phase,
        /// Number of diffs written before the cancellation was observed.
        applied: usize,
    },
}
