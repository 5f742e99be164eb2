//! Artifact requests

use serde::{Deserialize, Serialize};
use std::fmt;

/// An artifact request: what to resolve and download
///
/// `artifact_type` selects the credentials that can serve the request
/// (`helm/chart`, `helm/index`, `bitbucket/file`, ...). `reference` is an
/// optional pre-resolved URL that bypasses any index lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact type
    #[serde(rename = "type")]
    pub artifact_type: String,

    /// Artifact name (e.g. chart name)
    #[serde(default)]
    pub name: String,

    /// Artifact version; empty means "latest" for index-backed providers
    #[serde(default)]
    pub version: String,

    /// Direct URL of the artifact content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Artifact {
    /// Create a named, versioned artifact request
    pub fn new(
        artifact_type: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            artifact_type: artifact_type.into(),
            name: name.into(),
            version: version.into(),
            reference: None,
        }
    }

    /// Create an artifact request that only carries a reference
    pub fn from_reference(artifact_type: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            artifact_type: artifact_type.into(),
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    /// Attach a direct reference URL
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.version.is_empty(), &self.reference) {
            (false, false, _) => write!(f, "{} {}@{}", self.artifact_type, self.name, self.version),
            (false, true, _) => write!(f, "{} {}", self.artifact_type, self.name),
            (true, _, Some(reference)) => write!(f, "{} {}", self.artifact_type, reference),
            (true, _, None) => write!(f, "{}", self.artifact_type),
        }
    }
}
