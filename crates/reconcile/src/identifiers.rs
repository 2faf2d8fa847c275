//! Newtype domain identifiers.
//!
//! Organization logins, repository names, and property names are all plain
//! strings on the wire. Wrapping each in its own newtype prevents accidentally
//! passing a repository name where a property name is expected.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ReconcileError;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// The login of the GitHub organization (or user) that owns a repository.
    OrganizationName
}

string_id! {
    /// The name of a repository within its organization.
    RepositoryName
}

string_id! {
    /// The name of a repository custom property (e.g. `"team"`, `"environment"`).
    PropertyName
}

// ---------------------------------------------------------------------------
// Repository references
// ---------------------------------------------------------------------------

/// Identifies one repository by organization and name.
///
/// Parsed from a single `"organization/repository"` token. Ordering is
/// lexicographic by organization, then repository, which is the order diffs
/// are reported in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    organization: OrganizationName,
    repository: RepositoryName,
}

impl RepoRef {
    /// Creates a reference from already-validated parts.
    pub fn new(organization: OrganizationName, repository: RepositoryName) -> Self {
        Self {
            organization,
            repository,
        }
    }

    /// Parses an `"organization/repository"` token.
    ///
    /// The token must contain exactly one `/` with a non-empty segment on
    /// either side; anything else is a [`ReconcileError::Format`].
    pub fn parse(token: &str) -> Result<Self, ReconcileError> {
        let format_error = || ReconcileError::Format {
            token: token.to_string(),
        };

        let mut parts = token.split('/');
        let (Some(org), Some(repo), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format_error());
        };

        let organization = OrganizationName::new(org).ok_or_else(format_error)?;
        let repository = RepositoryName::new(repo).ok_or_else(format_error)?;
        Ok(Self::new(organization, repository))
    }

    pub fn organization(&self) -> &OrganizationName {
        &self.organization
    }

    pub fn repository(&self) -> &RepositoryName {
        &self.repository
    }
}

impl FromStr for RepoRef {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.organization, self.repository)
    }
}

// ---------------------------------------------------------------------------
// Run identifiers
// ---------------------------------------------------------------------------

/// Identifies a single reconciliation run (one `plan` or `apply` invocation).
///
/// Generated fresh for every run and recorded on the run's tracing span so
/// all fetches and writes from one invocation can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;
