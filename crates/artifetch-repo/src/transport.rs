//! Shared HTTP transport
//!
//! One transport is created at startup and shared by every credentials
//! instance. It owns connection pooling, TLS, timeouts and redirects; callers
//! hand it a parsed URL and an opaque `Authorization` header value.
//!
//! Redirects are followed manually so the `Authorization` header is never
//! sent to a different origin than the one it was issued for.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use artifetch_core::HttpConfig;

/// Lazily-read artifact content
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Response of a single GET
pub struct TransportResponse {
    /// Final URL after redirects
    pub url: Url,
    pub status: u16,
    pub body: ByteStream,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("too many redirects (max {max})")]
    TooManyRedirects { max: u32 },

    #[error("invalid redirect location: {location}")]
    InvalidRedirect { location: String },

    #[error("network error: {message}")]
    Network { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect {
                message: e.to_string(),
            }
        } else {
            TransportError::Network {
                message: e.to_string(),
            }
        }
    }
}

/// Thread-safe HTTP GET capability shared by all credentials
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one GET; non-2xx statuses are returned, not raised
    async fn get(
        &self,
        url: &Url,
        authorization: Option<&str>,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    max_redirects: u32,
}

impl HttpTransport {
    /// Create a transport from configuration
    pub fn new(config: &HttpConfig) -> std::result::Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            // Redirects are handled in `get` to keep credentials same-origin
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
        })
    }

    /// Transport with a custom timeout and default redirect limit
    pub fn with_timeout(timeout: Duration) -> std::result::Result<Self, TransportError> {
        Self::new(&HttpConfig {
            timeout,
            ..HttpConfig::default()
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &Url,
        authorization: Option<&str>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut current = url.clone();
        let mut redirects = 0;

        loop {
            let mut request = self.client.get(current.clone());

            if let Some(auth) = authorization {
                if same_origin(url, &current) {
                    request = request.header(reqwest::header::AUTHORIZATION, auth);
                } else {
                    tracing::warn!(
                        "Cross-origin redirect from {} to {} - credentials not forwarded",
                        url,
                        current
                    );
                }
            }

            let response = request.send().await?;
            let status = response.status();

            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            if let (true, Some(location)) = (status.is_redirection(), location) {
                redirects += 1;
                if redirects > self.max_redirects {
                    return Err(TransportError::TooManyRedirects {
                        max: self.max_redirects,
                    });
                }
                current = current
                    .join(&location)
                    .map_err(|_| TransportError::InvalidRedirect { location })?;
                continue;
            }

            let body = response
                .bytes_stream()
                .map_err(std::io::Error::other)
                .boxed();

            return Ok(TransportResponse {
                url: current,
                status: status.as_u16(),
                body,
            });
        }
    }
}

/// Check if two URLs share scheme, host and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host() == b.host()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Wrap in-memory content as a byte stream
pub fn stream_from_bytes(data: impl Into<Bytes>) -> ByteStream {
    let data = data.into();
    stream::once(async move { Ok::<_, std::io::Error>(data) }).boxed()
}

/// Drain a byte stream into memory
pub async fn read_to_end(mut body: ByteStream) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = body.try_next().await? {
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
