//! Account configuration
//!
//! Stores account configuration in `~/.config/artifetch/artifacts.yaml`.
//! Each provider gets its own section with an `enabled` switch and a list of
//! accounts; sections that are not enabled contribute no accounts.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::account::{AccountAuth, AccountDefinition, ProviderType};
use crate::error::{CoreError, Result};

/// Account configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactsConfig {
    /// Shared HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Helm repositories
    #[serde(default)]
    pub helm: ProviderSection,

    /// Bitbucket accounts
    #[serde(default)]
    pub bitbucket: ProviderSection,

    /// Sections for additional provider types, keyed by provider type
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSection>,
}

impl ArtifactsConfig {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.http.validate()?;
        Ok(config)
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| CoreError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("artifetch").join("artifacts.yaml"))
    }

    /// All provider sections with the provider type they configure
    pub fn sections(&self) -> Vec<(ProviderType, &ProviderSection)> {
        let mut sections = vec![
            (ProviderType::HELM, &self.helm),
            (ProviderType::BITBUCKET, &self.bitbucket),
        ];
        sections.extend(
            self.providers
                .iter()
                .map(|(name, section)| (ProviderType::new(name.clone()), section)),
        );
        sections
    }

    /// Account definitions of every enabled section
    ///
    /// Account names must be non-empty and unique within a provider type.
    pub fn account_definitions(&self) -> Result<Vec<AccountDefinition>> {
        let mut definitions = Vec::new();

        for (provider_type, section) in self.sections() {
            if !section.enabled {
                continue;
            }

            let mut seen = HashSet::new();
            for entry in &section.accounts {
                if entry.name.trim().is_empty() {
                    return Err(CoreError::InvalidConfig {
                        message: format!("{} account without a name", provider_type),
                    });
                }
                if !seen.insert(entry.name.as_str()) {
                    return Err(CoreError::InvalidConfig {
                        message: format!(
                            "{} account '{}' is defined more than once",
                            provider_type, entry.name
                        ),
                    });
                }
                definitions.push(entry.to_definition(provider_type.clone()));
            }
        }

        Ok(definitions)
    }
}

/// Shared HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    /// Per-request timeout
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,

    /// Maximum number of redirects followed per request
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_redirects() -> u32 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl HttpConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(CoreError::InvalidConfig {
                message: "http.timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration of one provider type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
}

/// One account as written in the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(flatten)]
    pub auth: AccountAuth,
}

impl AccountEntry {
    fn to_definition(&self, provider_type: ProviderType) -> AccountDefinition {
        AccountDefinition {
            name: self.name.clone(),
            repository: self.repository.clone(),
            provider_type,
            auth: self.auth.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
http:
  timeout: 5s
  maxRedirects: 3
helm:
  enabled: true
  accounts:
    - name: stable
      repository: https://charts.example.com/stable
    - name: private
      repository: https://charts.example.com/private
      username: deploy
      password: hunter2
bitbucket:
  enabled: false
  accounts:
    - name: bb
      token: abc
providers:
  gitlab:
    enabled: true
    accounts:
      - name: gl
        repository: https://gitlab.example.com
"#;

    #[test]
    fn test_parse_config() {
        let config = ArtifactsConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.http.max_redirects, 3);
        assert!(config.helm.enabled);
        assert_eq!(config.helm.accounts.len(), 2);
        assert_eq!(
            config.helm.accounts[1].auth.username.as_deref(),
            Some("deploy")
        );
    }

    #[test]
    fn test_account_definitions_skip_disabled_sections() {
        let config = ArtifactsConfig::from_yaml(SAMPLE).unwrap();
        let defs = config.account_definitions().unwrap();

        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["stable", "private", "gl"]);
        assert_eq!(defs[0].provider_type, ProviderType::HELM);
        assert_eq!(defs[2].provider_type, ProviderType::new("gitlab"));
    }

    #[test]
    fn test_defaults() {
        let config = ArtifactsConfig::from_yaml("{}").unwrap();
        assert_eq!(config.http.timeout, Duration::from_secs(30));
        assert_eq!(config.http.max_redirects, 10);
        assert!(!config.helm.enabled);
        assert!(config.account_definitions().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_account_in_section() {
        let yaml = r#"
helm:
  enabled: true
  accounts:
    - name: stable
      repository: https://a.example.com
    - name: stable
      repository: https://b.example.com
"#;
        let config = ArtifactsConfig::from_yaml(yaml).unwrap();
        let err = config.account_definitions().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_empty_account_name() {
        let yaml = r#"
bitbucket:
  enabled: true
  accounts:
    - name: "  "
"#;
        let config = ArtifactsConfig::from_yaml(yaml).unwrap();
        assert!(config.account_definitions().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ArtifactsConfig::from_yaml("http:\n  timeout: 0s\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = ArtifactsConfig::load_from(&path).unwrap();
        assert_eq!(config.helm.accounts.len(), 2);

        let missing = ArtifactsConfig::load_from(&dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(CoreError::ConfigNotFound { .. })));
    }
}
