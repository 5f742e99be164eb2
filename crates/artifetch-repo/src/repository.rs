//! Built credentials, one per account
//!
//! Loaded once from configuration through the registry, then used to route
//! artifact requests to the account that can serve them.

use indexmap::IndexMap;
use std::sync::Arc;

use artifetch_core::{AccountDefinition, Artifact, ArtifactsConfig};

use crate::credentials::ArtifactCredentials;
use crate::error::{ArtifactError, Result};
use crate::registry::CredentialsTypeRegistry;
use crate::transport::{ByteStream, Transport};

/// Credentials of every configured account, keyed by account name
#[derive(Clone, Default)]
pub struct CredentialsRepository {
    accounts: IndexMap<String, Arc<dyn ArtifactCredentials>>,
}

impl CredentialsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build credentials for every definition
    pub fn load(
        registry: &CredentialsTypeRegistry,
        definitions: impl IntoIterator<Item = AccountDefinition>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let mut repository = Self::new();
        for definition in definitions {
            let credentials = registry.build(&definition, Arc::clone(&transport))?;
            repository.insert(credentials)?;
        }
        tracing::debug!(accounts = repository.len(), "loaded artifact accounts");
        Ok(repository)
    }

    /// Build credentials for every enabled account in a configuration
    pub fn from_config(
        registry: &CredentialsTypeRegistry,
        config: &ArtifactsConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        Self::load(registry, config.account_definitions()?, transport)
    }

    /// Add credentials; account names are unique
    pub fn insert(&mut self, credentials: Arc<dyn ArtifactCredentials>) -> Result<()> {
        let name = credentials.name().to_string();
        if self.accounts.contains_key(&name) {
            return Err(ArtifactError::DuplicateAccount { account: name });
        }
        self.accounts.insert(name, credentials);
        Ok(())
    }

    pub fn get(&self, account: &str) -> Option<&Arc<dyn ArtifactCredentials>> {
        self.accounts.get(account)
    }

    /// Get credentials by account name or fail
    pub fn require(&self, account: &str) -> Result<&Arc<dyn ArtifactCredentials>> {
        self.get(account).ok_or_else(|| ArtifactError::AccountNotFound {
            account: account.to_string(),
        })
    }

    /// All credentials, in load order
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn ArtifactCredentials>> {
        self.accounts.values()
    }

    /// Credentials able to serve an artifact type
    pub fn handling(&self, artifact_type: &str) -> Vec<&Arc<dyn ArtifactCredentials>> {
        self.all()
            .filter(|c| c.handles_type(artifact_type))
            .collect()
    }

    /// Pick the credentials for a request
    ///
    /// With an account name, that account is used as-is and its `download`
    /// decides whether the type is served. Without one, the first account
    /// handling the artifact type is used.
    pub fn select(
        &self,
        account: Option<&str>,
        artifact: &Artifact,
    ) -> Result<&Arc<dyn ArtifactCredentials>> {
        match account {
            Some(account) => self.require(account),
            None => self
                .handling(&artifact.artifact_type)
                .into_iter()
                .next()
                .ok_or_else(|| ArtifactError::NoCredentialsForType {
                    artifact_type: artifact.artifact_type.clone(),
                }),
        }
    }

    /// Select credentials and download
    pub async fn download(&self, account: Option<&str>, artifact: &Artifact) -> Result<ByteStream> {
        self.select(account, artifact)?.download(artifact).await
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
