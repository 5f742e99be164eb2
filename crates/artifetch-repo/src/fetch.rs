//! Single-attempt HTTP fetching shared by all providers

use std::sync::Arc;
use url::Url;

use crate::auth::ResolvedAuth;
use crate::error::FetchError;
use crate::transport::{ByteStream, Transport};

/// Fetches URLs through the shared transport with one account's credentials
#[derive(Clone)]
pub struct HttpFetcher {
    transport: Arc<dyn Transport>,
    authorization: Option<String>,
}

impl HttpFetcher {
    pub fn new(transport: Arc<dyn Transport>, auth: Option<&ResolvedAuth>) -> Self {
        Self {
            transport,
            authorization: auth.map(ResolvedAuth::header_value),
        }
    }

    /// Perform a single GET
    ///
    /// Malformed URLs fail before the transport is touched. Transport errors
    /// and non-2xx responses are reported with the attempted URL.
    pub async fn fetch(&self, url: &str) -> Result<ByteStream, FetchError> {
        let parsed = parse_fetch_url(url)?;

        tracing::debug!(url = %parsed, "fetching");
        let response = self
            .transport
            .get(&parsed, self.authorization.as_deref())
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        if !response.is_success() {
            return Err(FetchError::status(url, response.status));
        }

        Ok(response.body)
    }
}

/// Parse an absolute `http`/`https` URL
pub fn parse_fetch_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::malformed(url, e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::malformed(
            url,
            format!("unsupported scheme '{}'", other),
        )),
    }
}

/// Parse a repository base URL so relative references join below it
pub fn parse_base_url(repository: &str) -> Result<Url, FetchError> {
    let mut base = parse_fetch_url(repository)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Resolve a reference against a repository base; absolute references win
///
/// A reference that cannot be joined is returned unchanged so the fetch
/// reports it as malformed.
pub fn resolve_reference(base: &Url, reference: &str) -> String {
    base.join(reference)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| reference.to_string())
}
