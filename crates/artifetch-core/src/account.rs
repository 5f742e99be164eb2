//! Account definitions
//!
//! An account names one repository endpoint and the provider type that knows
//! how to talk to it. Definitions are immutable once loaded.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

/// Identifier of a credentials provider type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderType(Cow<'static, str>);

impl ProviderType {
    /// Helm-style repositories resolved through `index.yaml`
    pub const HELM: ProviderType = ProviderType(Cow::Borrowed("helm"));

    /// Bitbucket file references
    pub const BITBUCKET: ProviderType = ProviderType(Cow::Borrowed("bitbucket"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ProviderType {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

/// Authentication material attached to an account
///
/// Opaque to the resolution core: it is only turned into an
/// `Authorization` header for the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// File holding `username:password` on its first line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_password_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// File holding a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

impl AccountAuth {
    /// Basic credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Bearer token credentials
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Whether any username/password material is configured
    pub fn has_basic(&self) -> bool {
        self.username.is_some() || self.password.is_some() || self.username_password_file.is_some()
    }

    /// Whether any token material is configured
    pub fn has_token(&self) -> bool {
        self.token.is_some() || self.token_file.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_basic() && !self.has_token()
    }
}

/// One configured repository endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDefinition {
    /// Account name, unique across the process
    pub name: String,

    /// Base URL of the repository
    pub repository: Option<String>,

    /// Provider type that builds credentials for this account
    pub provider_type: ProviderType,

    /// Authentication material
    pub auth: AccountAuth,
}

impl AccountDefinition {
    pub fn new(name: impl Into<String>, provider_type: ProviderType) -> Self {
        Self {
            name: name.into(),
            repository: None,
            provider_type,
            auth: AccountAuth::default(),
        }
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_auth(mut self, auth: AccountAuth) -> Self {
        self.auth = auth;
        self
    }
}
