//! Bitbucket file credentials
//!
//! Downloads `bitbucket/file` artifacts straight from their reference URL.
//! There is exactly one target per artifact, so a failed fetch is final.

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use artifetch_core::{AccountDefinition, Artifact, ProviderType};

use crate::auth::ResolvedAuth;
use crate::credentials::ArtifactCredentials;
use crate::error::{ArtifactError, Result};
use crate::fetch::{HttpFetcher, parse_base_url, resolve_reference};
use crate::registry::{AccountShape, CredentialsTypeRegistry};
use crate::transport::{ByteStream, Transport};

pub const BITBUCKET_FILE: &str = "bitbucket/file";

/// Base URL used when an account does not set `repository`
pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org";

const TYPES: &[&str] = &[BITBUCKET_FILE];

/// Register the Bitbucket provider
pub fn register(registry: &mut CredentialsTypeRegistry) -> Result<()> {
    registry.register(
        ProviderType::BITBUCKET,
        BitbucketCredentials::shape(),
        |account, transport| {
            let credentials: Arc<dyn ArtifactCredentials> =
                Arc::new(BitbucketCredentials::new(account, transport)?);
            Ok(credentials)
        },
    )
}

/// Credentials for one Bitbucket account
pub struct BitbucketCredentials {
    name: String,
    provider_type: ProviderType,
    base: Url,
    fetcher: HttpFetcher,
}

impl BitbucketCredentials {
    /// Repository is optional; both basic and token auth are accepted
    pub fn shape() -> AccountShape {
        AccountShape {
            requires_repository: false,
            basic_auth: true,
            token_auth: true,
        }
    }

    pub fn new(account: &AccountDefinition, transport: Arc<dyn Transport>) -> Result<Self> {
        let repository = account.repository.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base = parse_base_url(repository).map_err(|e| ArtifactError::InvalidAccountConfig {
            account: account.name.clone(),
            message: format!("invalid repository URL: {}", e.cause),
        })?;
        let auth = ResolvedAuth::resolve(account)?;

        Ok(Self {
            name: account.name.clone(),
            provider_type: account.provider_type.clone(),
            base,
            fetcher: HttpFetcher::new(transport, auth.as_ref()),
        })
    }

    /// Base URL references are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl ArtifactCredentials for BitbucketCredentials {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider_type(&self) -> &ProviderType {
        &self.provider_type
    }

    fn types(&self) -> &[&'static str] {
        TYPES
    }

    async fn download(&self, artifact: &Artifact) -> Result<ByteStream> {
        self.ensure_handles(artifact)?;

        let reference =
            artifact
                .reference
                .as_deref()
                .ok_or_else(|| ArtifactError::InvalidArtifact {
                    account: self.name.clone(),
                    artifact: artifact.to_string(),
                    reason: "artifact has no reference".to_string(),
                })?;

        let url = resolve_reference(&self.base, reference);
        self.fetcher
            .fetch(&url)
            .await
            .map_err(|e| ArtifactError::FailedDownload {
                account: self.name.clone(),
                artifact: artifact.to_string(),
                message: "file fetch failed".to_string(),
                source: Some(Box::new(e.into())),
            })
    }
}
