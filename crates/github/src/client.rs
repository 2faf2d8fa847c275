//! REST client for repository custom properties.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use reconcile::{ClientError, PropertyName, PropertyValue, RepoRef, RepositoryClient, RepositorySnapshot};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("gh-property-manager/", env!("CARGO_PKG_VERSION"));

/// Errors raised while constructing a [`GithubClient`].
#[derive(Debug, Error)]
pub enum GithubClientError {
    #[error("GitHub token must not be empty")]
    MissingToken,

    #[error("invalid GitHub API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client")]
    Http(#[from] reqwest::Error),
}

/// Authenticated client for one GitHub API root.
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GithubClient {
    /// Creates a client for `base_url` (e.g. [`DEFAULT_API_URL`] or a GitHub
    /// Enterprise Server `/api/v3` root) authenticating with `token`.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, GithubClientError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(GithubClientError::MissingToken);
        }

        let parsed = Url::parse(base_url).map_err(|e| GithubClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GithubClientError::InvalidUrl {
                url: base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn repo_url(&self, repo: &RepoRef, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url,
            repo.organization(),
            repo.repository(),
            suffix
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    #[serde(default)]
    custom_properties: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct CustomPropertyValues<'a> {
    properties: Vec<CustomPropertyValue<'a>>,
}

#[derive(Debug, Serialize)]
struct CustomPropertyValue<'a> {
    property_name: &'a str,
    value: &'a str,
}

#[async_trait]
impl RepositoryClient for GithubClient {
    #[instrument(skip_all, fields(repository = %repo))]
    async fn fetch_repository(
        &self,
        repo: &RepoRef,
    ) -> Result<Option<RepositorySnapshot>, ClientError> {
        let url = self.repo_url(repo, "");
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Repository not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(resp).await);
        }

        let body: RepositoryResponse = resp.json().await.map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })?;
        let properties: BTreeMap<String, PropertyValue> = body
            .custom_properties
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name, PropertyValue::from(value)))
            .collect();

        debug!(properties = properties.len(), "Fetched repository");
        Ok(Some(RepositorySnapshot::new(repo.clone(), properties)))
    }

    #[instrument(skip_all, fields(repository = %repo, count = properties.len()))]
    async fn write_custom_properties(
        &self,
        repo: &RepoRef,
        properties: &BTreeMap<PropertyName, String>,
    ) -> Result<(), ClientError> {
        let url = self.repo_url(repo, "/properties/values");
        let body = CustomPropertyValues {
            properties: properties
                .iter()
                .map(|(name, value)| CustomPropertyValue {
                    property_name: name.as_str(),
                    value,
                })
                .collect(),
        };

        let resp = self
            .request(reqwest::Method::PATCH, &url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> ClientError {
    ClientError::Transport {
        message: e.to_string(),
    }
}

async fn status_error(resp: reqwest::Response) -> ClientError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    ClientError::Status { status, body }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
