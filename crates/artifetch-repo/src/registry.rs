//! Credentials type registry
//!
//! Maps a provider type to the shape its account definitions must have and to
//! the builder that turns a definition into credentials. Providers are
//! registered once at startup; afterwards the registry is only read.

use std::collections::HashMap;
use std::sync::Arc;

use artifetch_core::{AccountDefinition, ProviderType};

use crate::credentials::ArtifactCredentials;
use crate::error::{ArtifactError, Result};
use crate::fetch::parse_fetch_url;
use crate::transport::Transport;

/// Builds credentials for one account
pub type CredentialsBuilder = Box<
    dyn Fn(&AccountDefinition, Arc<dyn Transport>) -> Result<Arc<dyn ArtifactCredentials>>
        + Send
        + Sync,
>;

/// Expected shape of a provider's account definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountShape {
    /// Whether `repository` must be set
    pub requires_repository: bool,
    /// Whether username/password material is accepted
    pub basic_auth: bool,
    /// Whether token material is accepted
    pub token_auth: bool,
}

impl Default for AccountShape {
    fn default() -> Self {
        Self {
            requires_repository: true,
            basic_auth: true,
            token_auth: true,
        }
    }
}

impl AccountShape {
    /// Check a definition against this shape
    pub fn validate(&self, definition: &AccountDefinition) -> Result<()> {
        let invalid = |message: String| ArtifactError::InvalidAccountConfig {
            account: definition.name.clone(),
            message,
        };

        if definition.name.trim().is_empty() {
            return Err(invalid("account name is empty".to_string()));
        }

        match &definition.repository {
            Some(repository) => {
                parse_fetch_url(repository)
                    .map_err(|e| invalid(format!("invalid repository URL: {}", e.cause)))?;
            }
            None if self.requires_repository => {
                return Err(invalid("repository is required".to_string()));
            }
            None => {}
        }

        if definition.auth.has_basic() && !self.basic_auth {
            return Err(invalid(format!(
                "{} accounts do not accept username/password",
                definition.provider_type
            )));
        }
        if definition.auth.has_token() && !self.token_auth {
            return Err(invalid(format!(
                "{} accounts do not accept tokens",
                definition.provider_type
            )));
        }

        Ok(())
    }
}

struct CredentialsType {
    shape: AccountShape,
    builder: CredentialsBuilder,
}

/// Catalog of credentials provider types
#[derive(Default)]
pub struct CredentialsTypeRegistry {
    types: HashMap<ProviderType, CredentialsType>,
}

impl CredentialsTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in Helm and Bitbucket providers
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        crate::helm::register(&mut registry)?;
        crate::bitbucket::register(&mut registry)?;
        Ok(registry)
    }

    /// Register a provider type
    pub fn register<F>(
        &mut self,
        provider_type: ProviderType,
        shape: AccountShape,
        builder: F,
    ) -> Result<()>
    where
        F: Fn(&AccountDefinition, Arc<dyn Transport>) -> Result<Arc<dyn ArtifactCredentials>>
            + Send
            + Sync
            + 'static,
    {
        if self.types.contains_key(&provider_type) {
            return Err(ArtifactError::DuplicateProvider {
                provider_type: provider_type.to_string(),
            });
        }

        tracing::debug!(provider_type = %provider_type, "registered credentials provider");
        self.types.insert(
            provider_type,
            CredentialsType {
                shape,
                builder: Box::new(builder),
            },
        );
        Ok(())
    }

    /// Build credentials for an account definition
    ///
    /// Any failure of the provider's builder is reported as
    /// `InvalidAccountConfig` for that account.
    pub fn build(
        &self,
        definition: &AccountDefinition,
        transport: Arc<dyn Transport>,
    ) -> Result<Arc<dyn ArtifactCredentials>> {
        let credentials_type = self.types.get(&definition.provider_type).ok_or_else(|| {
            ArtifactError::UnknownProvider {
                provider_type: definition.provider_type.to_string(),
            }
        })?;

        credentials_type.shape.validate(definition)?;

        (credentials_type.builder)(definition, transport).map_err(|e| match e {
            ArtifactError::InvalidAccountConfig { .. } => e,
            other => ArtifactError::InvalidAccountConfig {
                account: definition.name.clone(),
                message: other.to_string(),
            },
        })
    }

    /// Account shape of a provider type
    pub fn shape(&self, provider_type: &ProviderType) -> Option<&AccountShape> {
        self.types.get(provider_type).map(|t| &t.shape)
    }

    pub fn contains(&self, provider_type: &ProviderType) -> bool {
        self.types.contains_key(provider_type)
    }

    /// Registered provider types, sorted
    pub fn provider_types(&self) -> Vec<&ProviderType> {
        let mut types: Vec<_> = self.types.keys().collect();
        types.sort();
        types
    }
}
