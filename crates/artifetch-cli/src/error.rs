//! CLI error types with exit code handling
//!
//! Library errors are flattened into a [`CliError`] carrying the full cause
//! chain, so miette renders one readable message and the process exits with a
//! code that reflects the failure class.

use std::error::Error as StdError;

use miette::Diagnostic;
use thiserror::Error;

use artifetch_core::CoreError;
use artifetch_repo::ArtifactError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Configuration file missing or invalid
    #[error("Configuration error: {message}")]
    #[diagnostic(code(artifetch::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Account, artifact or version does not exist
    #[error("{message}")]
    #[diagnostic(code(artifetch::cli::not_found))]
    NotFound {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid command-line input
    #[error("{message}")]
    #[diagnostic(code(artifetch::cli::usage))]
    Usage { message: String },

    /// Download or listing failed
    #[error("{message}")]
    #[diagnostic(code(artifetch::cli::download))]
    Download { message: String },

    /// IO error (output file, stdout)
    #[error("IO error: {message}")]
    #[diagnostic(code(artifetch::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } | CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::Download { .. } => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

/// Render an error followed by its sources, separated by `: `
fn chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Transparent wrappers repeat their inner message
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let help = match &err {
            CoreError::ConfigNotFound { .. } => {
                Some("Create the file or pass a different one with --config".to_string())
            }
            _ => None,
        };
        CliError::Config {
            message: chain(&err),
            help,
        }
    }
}

impl From<ArtifactError> for CliError {
    fn from(err: ArtifactError) -> Self {
        let message = chain(&err);
        match err {
            ArtifactError::NotFound { .. } => CliError::NotFound {
                message,
                help: None,
            },
            ArtifactError::AccountNotFound { .. } => CliError::NotFound {
                message,
                help: Some("Run `artifetch accounts` to see configured accounts".to_string()),
            },
            ArtifactError::NoCredentialsForType { .. } => CliError::NotFound {
                message,
                help: Some("Enable a provider section that serves this type".to_string()),
            },
            ArtifactError::Config(core) => core.into(),
            ArtifactError::DuplicateProvider { .. }
            | ArtifactError::UnknownProvider { .. }
            | ArtifactError::InvalidAccountConfig { .. }
            | ArtifactError::DuplicateAccount { .. } => CliError::Config {
                message,
                help: None,
            },
            ArtifactError::InvalidArtifact { .. } => CliError::Usage { message },
            ArtifactError::Io(_) => CliError::Io { message },
            ArtifactError::Fetch(_)
            | ArtifactError::FailedDownload { .. }
            | ArtifactError::IndexParse { .. } => CliError::Download { message },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use artifetch_repo::FetchError;

    #[test]
    fn test_exit_codes() {
        let not_found: CliError = ArtifactError::AccountNotFound {
            account: "stable".to_string(),
        }
        .into();
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);

        let config: CliError = CoreError::ConfigNotFound {
            path: "/tmp/missing.yaml".to_string(),
        }
        .into();
        assert_eq!(config.exit_code(), exit_codes::USAGE_ERROR);

        let io: CliError = std::io::Error::other("disk full").into();
        assert_eq!(io.exit_code(), exit_codes::IO_ERROR);
    }

    #[test]
    fn test_failed_download_keeps_cause() {
        let err: CliError = ArtifactError::FailedDownload {
            account: "stable".to_string(),
            artifact: "helm/chart nginx@1.0.0".to_string(),
            message: "Unable to download the contents of artifact".to_string(),
            source: Some(Box::new(
                FetchError::status("http://mirror/nginx-1.0.0.tgz", 503).into(),
            )),
        }
        .into();

        assert_eq!(err.exit_code(), exit_codes::ERROR);
        let message = err.to_string();
        assert!(message.contains("nginx@1.0.0"));
        assert!(message.contains("HTTP status 503"));
    }
}
