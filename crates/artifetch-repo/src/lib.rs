//! Artifetch artifact credentials
//!
//! This crate resolves and downloads artifacts from remote repositories:
//!
//! - **Credentials registry**: maps a provider type to an account shape and a builder
//! - **Helm repositories**: charts resolved through `index.yaml`, with ordered URL fallback
//! - **Bitbucket files**: direct downloads of referenced files
//! - **Shared transport**: one pooled HTTP client for every account
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use artifetch_core::{Artifact, ArtifactsConfig};
//! use artifetch_repo::{CredentialsRepository, CredentialsTypeRegistry, HttpTransport, read_to_end};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArtifactsConfig::load()?;
//! let transport = Arc::new(HttpTransport::new(&config.http)?);
//! let registry = CredentialsTypeRegistry::with_defaults()?;
//! let accounts = CredentialsRepository::from_config(&registry, &config, transport)?;
//!
//! let chart = Artifact::new("helm/chart", "nginx", "15.0.0");
//! let body = accounts.download(Some("stable"), &chart).await?;
//! let data = read_to_end(body).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Candidate fallback
//!
//! Index entries may list several URLs for one chart version. They are tried
//! in order and the first success wins. Only malformed URLs are skipped; any
//! other failure stops the download.

pub mod auth;
pub mod bitbucket;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod helm;
pub mod index;
pub mod mock;
pub mod registry;
pub mod repository;
pub mod transport;

// Re-exports for convenience
pub use auth::ResolvedAuth;
pub use bitbucket::{BITBUCKET_FILE, BitbucketCredentials};
pub use credentials::{ArtifactCredentials, ArtifactLister};
pub use error::{ArtifactError, CandidatePolicy, FetchError, FetchFailure, Result};
pub use fetch::HttpFetcher;
pub use helm::{HELM_CHART, HELM_INDEX, HelmCredentials};
pub use index::{HelmIndex, IndexEntry};
pub use registry::{AccountShape, CredentialsBuilder, CredentialsTypeRegistry};
pub use repository::CredentialsRepository;
pub use transport::{
    ByteStream, HttpTransport, Transport, TransportError, TransportResponse, read_to_end,
};
