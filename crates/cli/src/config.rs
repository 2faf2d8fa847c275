//! Pre-flight validation of command-line input.
//!
//! Everything here fails before any document is read or any request is sent.

use std::path::PathBuf;

use thiserror::Error;

use crate::cli::{OutputFormat, RunArgs};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN environment variable is not set (or pass --token)")]
    MissingToken,

    #[error("no configuration files specified; use --config to specify one or more property documents")]
    NoDocuments,
}

/// Validated settings for one `plan` or `apply` run.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub token: String,
    pub api_url: String,
    pub documents: Vec<PathBuf>,
    pub output: OutputFormat,
}

impl CliConfig {
    pub fn new(token: Option<&str>, api_url: &str, args: &RunArgs) -> Result<Self, ConfigError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        if args.configs.is_empty() {
            return Err(ConfigError::NoDocuments);
        }

        Ok(Self {
            token: token.to_string(),
            api_url: api_url.to_string(),
            documents: args.configs.clone(),
            output: args.output,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
