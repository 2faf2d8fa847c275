//! In-memory [`RepositoryClient`] for engine tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{ClientError, PropertyName, PropertyValue, RepoRef, RepositoryClient, RepositorySnapshot};

/// Records every fetch and write; serves repositories registered with
/// [`FakeClient::with_repository`].
#[derive(Default)]
pub(crate) struct FakeClient {
    repositories: HashMap<RepoRef, RepositorySnapshot>,
    failing_fetches: HashSet<RepoRef>,
    failing_writes: HashSet<(RepoRef, String)>,
    cancel_on_fetch: Option<CancellationToken>,
    cancel_on_write: Option<CancellationToken>,
    fetches: Mutex<Vec<RepoRef>>,
    writes: Mutex<Vec<(RepoRef, BTreeMap<PropertyName, String>)>>,
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_repository(mut self, token: &str, properties: &[(&str, Value)]) -> Self {
        let repo = RepoRef::parse(token).unwrap();
        let properties = properties
            .iter()
            .map(|(name, value)| (name.to_string(), PropertyValue::from(value.clone())))
            .collect();
        self.repositories
            .insert(repo.clone(), RepositorySnapshot::new(repo, properties));
        self
    }

    pub(crate) fn failing_fetch(mut self, token: &str) -> Self {
        self.failing_fetches.insert(RepoRef::parse(token).unwrap());
        self
    }

    pub(crate) fn failing_write(mut self, token: &str, property: &str) -> Self {
        self.failing_writes
            .insert((RepoRef::parse(token).unwrap(), property.to_string()));
        self
    }

    pub(crate) fn cancelling_on_fetch(mut self, token: CancellationToken) -> Self {
        self.cancel_on_fetch = Some(token);
        self
    }

    pub(crate) fn cancelling_on_write(mut self, token: CancellationToken) -> Self {
        self.cancel_on_write = Some(token);
        self
    }

    pub(crate) fn fetches(&self) -> Vec<RepoRef> {
        self.fetches.lock().unwrap().clone()
    }

    pub(crate) fn writes(&self) -> Vec<(RepoRef, BTreeMap<PropertyName, String>)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryClient for FakeClient {
    async fn fetch_repository(
        &self,
        repo: &RepoRef,
    ) -> Result<Option<RepositorySnapshot>, ClientError> {
        self.fetches.lock().unwrap().push(repo.clone());
        if let Some(token) = &self.cancel_on_fetch {
            token.cancel();
        }
        if self.failing_fetches.contains(repo) {
            return Err(ClientError::Transport {
                message: "connection reset".to_string(),
            });
        }
        Ok(self.repositories.get(repo).cloned())
    }

    async fn write_custom_properties(
        &self,
        repo: &RepoRef,
        properties: &BTreeMap<PropertyName, String>,
    ) -> Result<(), ClientError> {
        if let Some(token) = &self.cancel_on_write {
            token.cancel();
        }
        let fails = properties
            .keys()
            .any(|name| self.failing_writes.contains(&(repo.clone(), name.to_string())));
        if fails {
            return Err(ClientError::Status {
                status: 422,
                body: "validation failed".to_string(),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((repo.clone(), properties.clone()));
        Ok(())
    }
}
