//! CLI commands

pub mod accounts;
pub mod download;
pub mod list;

use std::path::Path;
use std::sync::Arc;

use artifetch_core::ArtifactsConfig;
use artifetch_repo::{CredentialsRepository, CredentialsTypeRegistry, HttpTransport, Transport};

use crate::error::{CliError, Result};

/// Load configuration and build every enabled account
pub fn load_accounts(config_path: Option<&Path>) -> Result<CredentialsRepository> {
    let config = match config_path {
        Some(path) => ArtifactsConfig::load_from(path)?,
        None => ArtifactsConfig::load()?,
    };

    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(&config.http).map_err(|e| CliError::Config {
            message: e.to_string(),
            help: None,
        })?);
    let registry = CredentialsTypeRegistry::with_defaults()?;

    Ok(CredentialsRepository::from_config(
        &registry, &config, transport,
    )?)
}
