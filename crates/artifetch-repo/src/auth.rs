//! Account authentication resolution
//!
//! Turns the authentication fields of an account definition into the
//! `Authorization` header value handed to the transport. File-based secrets
//! are read once, when the credentials are built.

use std::fmt;
use std::path::Path;

use artifetch_core::{AccountAuth, AccountDefinition};

use crate::error::{ArtifactError, Result};

/// Resolved credentials ready for use
#[derive(Clone, PartialEq, Eq)]
pub enum ResolvedAuth {
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl ResolvedAuth {
    /// Resolve the authentication material of an account
    ///
    /// Returns `None` for anonymous accounts. Mixing username/password with a
    /// token is rejected.
    pub fn resolve(account: &AccountDefinition) -> Result<Option<Self>> {
        let auth = &account.auth;
        let invalid = |message: String| ArtifactError::InvalidAccountConfig {
            account: account.name.clone(),
            message,
        };

        if auth.has_basic() && auth.has_token() {
            return Err(invalid(
                "configure either username/password or a token, not both".to_string(),
            ));
        }

        if auth.has_token() {
            return resolve_token(auth).map(Some).map_err(invalid);
        }

        if auth.has_basic() {
            return resolve_basic(auth).map(Some).map_err(invalid);
        }

        Ok(None)
    }

    /// Authorization header value
    pub fn header_value(&self) -> String {
        match self {
            ResolvedAuth::Basic { username, password } => {
                let encoded = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    format!("{}:{}", username, password),
                );
                format!("Basic {}", encoded)
            }
            ResolvedAuth::Bearer { token } => format!("Bearer {}", token),
        }
    }
}

impl fmt::Debug for ResolvedAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedAuth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            ResolvedAuth::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

fn resolve_token(auth: &AccountAuth) -> std::result::Result<ResolvedAuth, String> {
    let token = match (&auth.token, &auth.token_file) {
        (Some(_), Some(_)) => return Err("configure either token or tokenFile, not both".to_string()),
        (Some(token), None) => token.clone(),
        (None, Some(path)) => read_secret(path)?,
        (None, None) => return Err("missing token".to_string()),
    };

    if token.is_empty() {
        return Err("token is empty".to_string());
    }
    Ok(ResolvedAuth::Bearer { token })
}

fn resolve_basic(auth: &AccountAuth) -> std::result::Result<ResolvedAuth, String> {
    if let Some(path) = &auth.username_password_file {
        if auth.username.is_some() || auth.password.is_some() {
            return Err(
                "configure either username/password or usernamePasswordFile, not both".to_string(),
            );
        }
        let content = read_secret(path)?;
        let (username, password) = content.split_once(':').ok_or_else(|| {
            format!(
                "{} must contain 'username:password' on its first line",
                path.display()
            )
        })?;
        return Ok(ResolvedAuth::Basic {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    match (&auth.username, &auth.password) {
        (Some(username), Some(password)) => Ok(ResolvedAuth::Basic {
            username: username.clone(),
            password: password.clone(),
        }),
        (Some(_), None) => Err("username configured without a password".to_string()),
        (None, _) => Err("password configured without a username".to_string()),
    }
}

/// First line of a secret file, trimmed
fn read_secret(path: &Path) -> std::result::Result<String, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(content.lines().next().unwrap_or_default().trim().to_string())
}
