//! Helm repository index parsing
//!
//! Maps the `entries` section of a Helm `index.yaml` to artifact names,
//! versions and ordered candidate download URLs. Document order is kept
//! everywhere: the order of `urls` is a fallback priority, first is preferred.

use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ArtifactError, Result};

/// Repository index (Helm-compatible)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmIndex {
    /// API version
    #[serde(default)]
    pub api_version: Option<String>,

    /// Chart versions indexed by chart name
    #[serde(default)]
    pub entries: IndexMap<String, Vec<IndexEntry>>,
}

/// One chart version in the index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    #[serde(default)]
    pub name: String,

    #[serde(deserialize_with = "scalar_string")]
    pub version: String,

    /// Candidate download URLs, in priority order
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub digest: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// URL of the index document for a repository base URL
pub fn index_url(repository: &str) -> String {
    format!("{}/index.yaml", repository.trim_end_matches('/'))
}

impl HelmIndex {
    /// Parse index from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ArtifactError::IndexParse {
            message: e.to_string(),
        })
    }

    /// Parse index from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let yaml = std::str::from_utf8(bytes).map_err(|e| ArtifactError::IndexParse {
            message: format!("Invalid UTF-8: {}", e),
        })?;
        Self::from_yaml(yaml)
    }

    /// All artifact names
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// All known versions of an artifact
    pub fn versions(&self, name: &str) -> Result<Vec<String>> {
        Ok(self
            .entries_for(name)?
            .iter()
            .map(|e| e.version.clone())
            .collect())
    }

    /// Ordered candidate URLs for `(name, version)`, exactly as listed
    ///
    /// An empty `version` selects the highest version.
    pub fn find_urls(&self, name: &str, version: &str) -> Result<Vec<String>> {
        let entries = self.entries_for(name)?;

        let entry = if version.is_empty() {
            latest(entries)
        } else {
            entries.iter().find(|e| e.version == version)
        };

        entry.map(|e| e.urls.clone()).ok_or_else(|| {
            ArtifactError::not_found(format!(
                "Failed to find version '{}' of artifact '{}' in index",
                version, name
            ))
        })
    }

    fn entries_for(&self, name: &str) -> Result<&[IndexEntry]> {
        self.entries
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                ArtifactError::not_found(format!("Failed to find artifact '{}' in index", name))
            })
    }
}

/// Highest semver version; unparseable versions rank below parseable ones
fn latest(entries: &[IndexEntry]) -> Option<&IndexEntry> {
    entries.iter().max_by(|a, b| {
        let va = Version::parse(&a.version).ok();
        let vb = Version::parse(&b.version).ok();
        match (va, vb) {
            (Some(va), Some(vb)) => va.cmp(&vb),
            (Some(_), None) => std::cmp::Ordering::Greater,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (None, None) => a.version.cmp(&b.version),
        }
    })
}

/// Accept unquoted YAML versions such as `1.0` or `2`
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar version, found {:?}",
            other
        ))),
    }
}
