//! Artifact credentials contract
//!
//! Every provider binds one account to the shared transport and implements
//! [`ArtifactCredentials`]. Providers that resolve artifacts through an index
//! also implement [`ArtifactLister`] and expose it through
//! [`ArtifactCredentials::lister`].

use async_trait::async_trait;

use artifetch_core::{Artifact, ProviderType};

use crate::error::{ArtifactError, Result};
use crate::transport::ByteStream;

/// Resolve/download capability of one account
#[async_trait]
pub trait ArtifactCredentials: Send + Sync {
    /// Account name
    fn name(&self) -> &str;

    /// Provider type that built these credentials
    fn provider_type(&self) -> &ProviderType;

    /// Artifact types this provider serves
    fn types(&self) -> &[&'static str];

    fn handles_type(&self, artifact_type: &str) -> bool {
        self.types().contains(&artifact_type)
    }

    /// Download the artifact content
    ///
    /// Fails with `InvalidArtifact` before any network call when the
    /// artifact type is not handled.
    async fn download(&self, artifact: &Artifact) -> Result<ByteStream>;

    /// Listing operations, for index-backed providers
    fn lister(&self) -> Option<&dyn ArtifactLister> {
        None
    }

    /// Reject artifacts whose type is not handled
    fn ensure_handles(&self, artifact: &Artifact) -> Result<()> {
        if self.handles_type(&artifact.artifact_type) {
            Ok(())
        } else {
            Err(ArtifactError::InvalidArtifact {
                account: self.name().to_string(),
                artifact: artifact.to_string(),
                reason: format!(
                    "type '{}' is not one of [{}]",
                    artifact.artifact_type,
                    self.types().join(", ")
                ),
            })
        }
    }
}

/// Enumeration of the artifacts an account knows about
#[async_trait]
pub trait ArtifactLister: Send + Sync {
    /// All artifact names
    async fn artifact_names(&self) -> Result<Vec<String>>;

    /// All versions of one artifact
    async fn artifact_versions(&self, name: &str) -> Result<Vec<String>>;
}
