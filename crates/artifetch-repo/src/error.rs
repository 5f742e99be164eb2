//! Error types for artifact resolution
//!
//! `FetchError` describes one failed HTTP attempt. Its
//! [`candidate_policy`](FetchError::candidate_policy) is the single place that
//! decides whether a failed candidate URL may be skipped.

use thiserror::Error;

use crate::transport::TransportError;

/// Artifact credentials errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    // ============ Registry Errors ============
    #[error("Credentials provider already registered: {provider_type}")]
    DuplicateProvider { provider_type: String },

    #[error("No credentials provider registered for type: {provider_type}")]
    UnknownProvider { provider_type: String },

    #[error("Invalid configuration for account '{account}': {message}")]
    InvalidAccountConfig { account: String, message: String },

    // ============ Account Lookup Errors ============
    #[error("Account already configured: {account}")]
    DuplicateAccount { account: String },

    #[error("Account not found: {account}")]
    AccountNotFound { account: String },

    #[error("No configured account handles artifact type: {artifact_type}")]
    NoCredentialsForType { artifact_type: String },

    // ============ Download Errors ============
    #[error("Account '{account}' cannot download {artifact}: {reason}")]
    InvalidArtifact {
        account: String,
        artifact: String,
        reason: String,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{message}")]
    NotFound {
        message: String,
        #[source]
        source: Option<Box<ArtifactError>>,
    },

    #[error("Failed to download {artifact} from account '{account}': {message}")]
    FailedDownload {
        account: String,
        artifact: String,
        message: String,
        #[source]
        source: Option<Box<ArtifactError>>,
    },

    // ============ Index Errors ============
    #[error("Index parse error: {message}")]
    IndexParse { message: String },

    // ============ Other ============
    #[error(transparent)]
    Config(#[from] artifetch_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for artifact operations
pub type Result<T> = std::result::Result<T, ArtifactError>;

impl ArtifactError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ArtifactError::NotFound {
            message: message.into(),
            source: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtifactError::NotFound { .. })
    }

    /// The fetch failure at the root of this error, if any
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            ArtifactError::Fetch(e) => Some(e),
            ArtifactError::NotFound {
                source: Some(inner),
                ..
            }
            | ArtifactError::FailedDownload {
                source: Some(inner),
                ..
            } => inner.fetch_error(),
            _ => None,
        }
    }
}

/// One failed HTTP attempt
#[derive(Debug, Clone, Error)]
#[error("Fetching {url} failed: {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: FetchFailure,
}

/// Why an HTTP attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("malformed URL ({reason})")]
    MalformedUrl { reason: String },

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("{message}")]
    Transport { message: String },
}

/// What the candidate loop does after a failed candidate URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidatePolicy {
    /// Log and try the next candidate
    Skip,
    /// Stop and surface the failure
    Abort,
}

impl FetchError {
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cause: FetchFailure::MalformedUrl {
                reason: reason.into(),
            },
        }
    }

    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            cause: FetchFailure::Status { status },
        }
    }

    pub fn transport(url: impl Into<String>, error: TransportError) -> Self {
        let cause = match error {
            TransportError::Timeout => FetchFailure::Timeout,
            other => FetchFailure::Transport {
                message: other.to_string(),
            },
        };
        Self {
            url: url.into(),
            cause,
        }
    }

    /// Only a URL rejected before any request is made may be stepped over;
    /// anything the server answered, redirects included, stops the loop.
    pub fn candidate_policy(&self) -> CandidatePolicy {
        match self.cause {
            FetchFailure::MalformedUrl { .. } => CandidatePolicy::Skip,
            FetchFailure::Status { .. } | FetchFailure::Timeout | FetchFailure::Transport { .. } => {
                CandidatePolicy::Abort
            }
        }
    }
}

impl From<serde_yaml::Error> for ArtifactError {
    fn from(e: serde_yaml::Error) -> Self {
        ArtifactError::IndexParse {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_policy_table() {
        assert_eq!(
            FetchError::malformed("bad-url", "relative URL without a base").candidate_policy(),
            CandidatePolicy::Skip
        );
        assert_eq!(
            FetchError::status("http://a/x.tgz", 404).candidate_policy(),
            CandidatePolicy::Abort
        );
        assert_eq!(
            FetchError::transport("http://a/x.tgz", TransportError::Timeout).candidate_policy(),
            CandidatePolicy::Abort
        );
        assert_eq!(
            FetchError::transport(
                "http://a/x.tgz",
                TransportError::Connect {
                    message: "refused".to_string()
                }
            )
            .candidate_policy(),
            CandidatePolicy::Abort
        );
    }

    #[test]
    fn test_bad_redirect_aborts() {
        let err = FetchError::transport(
            "http://a/x.tgz",
            TransportError::InvalidRedirect {
                location: "http://[bad".to_string(),
            },
        );
        assert!(matches!(err.cause, FetchFailure::Transport { .. }));
        assert_eq!(err.candidate_policy(), CandidatePolicy::Abort);
    }

    #[test]
    fn test_timeout_maps_to_fetch_timeout() {
        let err = FetchError::transport("http://a/index.yaml", TransportError::Timeout);
        assert_eq!(err.cause, FetchFailure::Timeout);
        assert_eq!(err.url, "http://a/index.yaml");
    }

    #[test]
    fn test_fetch_error_is_reachable_through_wrappers() {
        let inner = ArtifactError::from(FetchError::status("http://a/x.tgz", 500));
        let err = ArtifactError::FailedDownload {
            account: "stable".to_string(),
            artifact: "helm/chart x@1.0".to_string(),
            message: "candidate fetch failed".to_string(),
            source: Some(Box::new(inner)),
        };

        let fetch = err.fetch_error().unwrap();
        assert_eq!(fetch.cause, FetchFailure::Status { status: 500 });
        assert!(err.to_string().contains("stable"));
    }
}
