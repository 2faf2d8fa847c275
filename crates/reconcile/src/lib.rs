//! Reconciliation domain for repository custom properties.
//!
//! Loads desired-state property documents into one conflict-free union,
//! resolves the repositories they reference, diffs desired against observed
//! values, and applies the resulting changes in a deterministic order.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate performs no network I/O.
//! The remote API is reached only through the [`RepositoryClient`] trait,
//! implemented by the `github` crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`PropertyName`, `RepoRef`, `RunId`, etc.) |
//! | [`types`] | Desired/observed value types and `PropertyDiff` |
//! | [`errors`] | `ReconcileError` and `ClientError` |
//! | [`ports`] | The `RepositoryClient` trait |
//! | [`document`] | YAML property document schema |
//! | [`store`] | `ConfigStore` with conflict validation |
//! | [`resolver`] | Repository resolution and the snapshot cache |
//! | [`diff`] | Diff computation |
//! | [`apply`] | Sequential, stop-on-first-failure apply |
//! | [`context`] | `ReconcileContext`, the per-run owner of all state |

pub mod apply;
pub mod context;
pub mod diff;
pub mod document;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod resolver;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use apply::apply_diffs;
pub use context::ReconcileContext;
pub use diff::{compute_diffs, DesiredIndex};
pub use errors::{ClientError, Phase, ReconcileError};
pub use identifiers::{OrganizationName, PropertyName, RepoRef, RepositoryName, RunId};
pub use ports::RepositoryClient;
pub use resolver::{referenced_repositories, resolve_repositories, SnapshotCache};
pub use store::ConfigStore;
pub use types::{Assignment, ConfigEntry, PropertyDiff, PropertyValue, RepositorySnapshot};

pub use tokio_util::sync::CancellationToken;
