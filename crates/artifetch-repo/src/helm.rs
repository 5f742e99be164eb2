//! Helm repository credentials
//!
//! Resolves `helm/chart` artifacts through the repository's `index.yaml` and
//! serves the index itself as `helm/index`. The index is fetched on every
//! call; nothing is cached between calls.

use async_trait::async_trait;
use std::sync::Arc;

use artifetch_core::{AccountDefinition, Artifact, ProviderType};

use crate::auth::ResolvedAuth;
use crate::credentials::{ArtifactCredentials, ArtifactLister};
use crate::error::{ArtifactError, CandidatePolicy, Result};
use crate::fetch::{HttpFetcher, parse_base_url, resolve_reference};
use crate::index::{HelmIndex, index_url};
use crate::registry::{AccountShape, CredentialsTypeRegistry};
use crate::transport::{ByteStream, Transport, read_to_end};

pub const HELM_CHART: &str = "helm/chart";
pub const HELM_INDEX: &str = "helm/index";

const TYPES: &[&str] = &[HELM_CHART, HELM_INDEX];

/// Register the Helm provider
pub fn register(registry: &mut CredentialsTypeRegistry) -> Result<()> {
    registry.register(
        ProviderType::HELM,
        HelmCredentials::shape(),
        |account, transport| {
            let credentials: Arc<dyn ArtifactCredentials> =
                Arc::new(HelmCredentials::new(account, transport)?);
            Ok(credentials)
        },
    )
}

/// Credentials for one Helm repository
pub struct HelmCredentials {
    name: String,
    provider_type: ProviderType,
    repository: String,
    index_url: String,
    fetcher: HttpFetcher,
}

impl HelmCredentials {
    /// Helm accounts need a repository and accept username/password only
    pub fn shape() -> AccountShape {
        AccountShape {
            requires_repository: true,
            basic_auth: true,
            token_auth: false,
        }
    }

    pub fn new(account: &AccountDefinition, transport: Arc<dyn Transport>) -> Result<Self> {
        let repository = account
            .repository
            .clone()
            .ok_or_else(|| ArtifactError::InvalidAccountConfig {
                account: account.name.clone(),
                message: "repository is required".to_string(),
            })?;
        let auth = ResolvedAuth::resolve(account)?;

        Ok(Self {
            name: account.name.clone(),
            provider_type: account.provider_type.clone(),
            index_url: index_url(&repository),
            repository,
            fetcher: HttpFetcher::new(transport, auth.as_ref()),
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    fn failed(
        &self,
        artifact: &Artifact,
        message: impl Into<String>,
        source: Option<ArtifactError>,
    ) -> ArtifactError {
        ArtifactError::FailedDownload {
            account: self.name.clone(),
            artifact: artifact.to_string(),
            message: message.into(),
            source: source.map(Box::new),
        }
    }

    /// Fetch, read and parse the index
    async fn load_index(&self) -> Result<HelmIndex> {
        let body = self.fetcher.fetch(&self.index_url).await?;
        let data = read_to_end(body).await?;
        HelmIndex::from_bytes(&data)
    }

    /// Fetch a pre-resolved chart reference, bypassing the index
    async fn download_reference(&self, artifact: &Artifact, reference: &str) -> Result<ByteStream> {
        let url = match parse_base_url(&self.repository) {
            Ok(base) => resolve_reference(&base, reference),
            Err(_) => reference.to_string(),
        };
        self.fetcher
            .fetch(&url)
            .await
            .map_err(|e| self.failed(artifact, "reference fetch failed", Some(e.into())))
    }

    /// Try candidate URLs in order; the first success wins
    async fn download_candidates(&self, artifact: &Artifact, urls: &[String]) -> Result<ByteStream> {
        for url in urls {
            match self.fetcher.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => match e.candidate_policy() {
                    CandidatePolicy::Skip => {
                        tracing::warn!(account = %self.name, "Invalid url: {}", e);
                    }
                    CandidatePolicy::Abort => {
                        return Err(self.failed(
                            artifact,
                            "Unable to download the contents of artifact",
                            Some(e.into()),
                        ));
                    }
                },
            }
        }

        Err(self.failed(artifact, "no candidate URL succeeded", None))
    }
}

#[async_trait]
impl ArtifactCredentials for HelmCredentials {
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

        if let (HELM_CHART, Some(reference)) =
            (artifact.artifact_type.as_str(), artifact.reference.as_deref())
        {
            return self.download_reference(artifact, reference).await;
        }

        let index = self
            .fetcher
            .fetch(&self.index_url)
            .await
            .map_err(|e| self.failed(artifact, "index fetch failed", Some(e.into())))?;

        if artifact.artifact_type == HELM_INDEX {
            return Ok(index);
        }

        let data = read_to_end(index)
            .await
            .map_err(|e| self.failed(artifact, "index read failed", Some(e.into())))?;
        let urls = match HelmIndex::from_bytes(&data)
            .and_then(|index| index.find_urls(&artifact.name, &artifact.version))
        {
            Ok(urls) => urls,
            Err(e) if e.is_not_found() => {
                return Err(ArtifactError::NotFound {
                    message: format!(
                        "Artifact {} not found in '{}' account ({})",
                        artifact, self.name, self.index_url
                    ),
                    source: Some(Box::new(e)),
                });
            }
            Err(e) => return Err(self.failed(artifact, "index is not valid", Some(e))),
        };

        self.download_candidates(artifact, &urls).await
    }

    fn lister(&self) -> Option<&dyn ArtifactLister> {
        Some(self)
    }
}

#[async_trait]
impl ArtifactLister for HelmCredentials {
    async fn artifact_names(&self) -> Result<Vec<String>> {
        self.load_index()
            .await
            .map(|index| index.names())
            .map_err(|e| ArtifactError::NotFound {
                message: format!("Failed to download chart names for '{}' account", self.name),
                source: Some(Box::new(e)),
            })
    }

    async fn artifact_versions(&self, name: &str) -> Result<Vec<String>> {
        let index = self.load_index().await.map_err(|e| ArtifactError::NotFound {
            message: format!(
                "Failed to download chart versions for '{}' account",
                self.name
            ),
            source: Some(Box::new(e)),
        })?;

        index.versions(name).map_err(|e| ArtifactError::NotFound {
            message: format!("Chart '{}' not found in '{}' account", name, self.name),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    const REPO: &str = "https://charts.example.com";

    fn credentials(transport: &MockTransport) -> HelmCredentials {
        let account = AccountDefinition::new("stable", ProviderType::HELM).with_repository(REPO);
        HelmCredentials::new(&account, Arc::new(transport.clone())).unwrap()
    }

    #[test]
    fn test_index_url() {
        let creds = credentials(&MockTransport::new());
        assert_eq!(creds.index_url(), "https://charts.example.com/index.yaml");
        assert_eq!(creds.repository(), REPO);
    }

    #[test]
    fn test_handles_type() {
        let creds = credentials(&MockTransport::new());
        assert!(creds.handles_type(HELM_CHART));
        assert!(creds.handles_type(HELM_INDEX));
        assert!(!creds.handles_type("bitbucket/file"));
        assert!(!creds.handles_type("helm"));
    }

    #[tokio::test]
    async fn test_reference_bypasses_index() {
        let transport =
            MockTransport::new().with_body("https://charts.example.com/nginx-1.0.0.tgz", "chart");
        let creds = credentials(&transport);

        let artifact = Artifact::new(HELM_CHART, "nginx", "1.0.0").with_reference("nginx-1.0.0.tgz");
        let body = creds.download(&artifact).await.unwrap();

        assert_eq!(read_to_end(body).await.unwrap(), b"chart");
        assert_eq!(
            transport.requested_urls(),
            vec!["https://charts.example.com/nginx-1.0.0.tgz"]
        );
    }

    #[tokio::test]
    async fn test_names_fetch_index_every_call() {
        let transport = MockTransport::new().with_body(
            "https://charts.example.com/index.yaml",
            "entries:\n  nginx:\n    - version: 1.0.0\n",
        );
        let creds = credentials(&transport);

        assert_eq!(creds.artifact_names().await.unwrap(), vec!["nginx"]);
        assert_eq!(creds.artifact_names().await.unwrap(), vec!["nginx"]);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_names_index_unavailable() {
        let transport = MockTransport::new().with_status("https://charts.example.com/index.yaml", 500);
        let creds = credentials(&transport);

        let err = creds.artifact_names().await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("'stable' account"));
        assert!(err.fetch_error().is_some());
    }

    #[tokio::test]
    async fn test_index_failure_on_download_carries_fetch_error() {
        let transport = MockTransport::new().with_status("https://charts.example.com/index.yaml", 503);
        let creds = credentials(&transport);

        let Err(err) = creds
            .download(&Artifact::new(HELM_CHART, "nginx", "1.0.0"))
            .await
        else {
            panic!("expected failed download");
        };
        match &err {
            ArtifactError::FailedDownload {
                source: Some(inner),
                ..
            } => assert!(matches!(**inner, ArtifactError::Fetch(_))),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_chart_names_account() {
        let transport = MockTransport::new().with_body(
            "https://charts.example.com/index.yaml",
            "entries:\n  nginx:\n    - version: 1.0.0\n",
        );
        let creds = credentials(&transport);

        let Err(err) = creds
            .download(&Artifact::new(HELM_CHART, "nginx", "9.9"))
            .await
        else {
            panic!("expected not found");
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("'stable' account"));

        let err = creds.artifact_versions("redis").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("'stable' account"));
        assert!(err.fetch_error().is_none());

        transport.reset_calls();
        creds.artifact_versions("nginx").await.unwrap();
        assert_eq!(transport.call_count(), 1);
    }
}
