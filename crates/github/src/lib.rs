//! GitHub infrastructure adapter.
//!
//! Implements [`reconcile::RepositoryClient`] over the GitHub REST API.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Authentication,
//! request headers, and status-code mapping live here; the [`reconcile`] crate
//! never sees them.
//!
//! ## Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | Fetch repository | `GET /repos/{owner}/{repo}` |
//! | Write custom properties | `PATCH /repos/{owner}/{repo}/properties/values` |

pub mod client;

pub use client::{GithubClient, GithubClientError, DEFAULT_API_URL};
