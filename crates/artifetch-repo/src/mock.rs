//! Mock transport for testing
//!
//! Serves canned responses from memory and records every request, so tests
//! can assert on call order and call counts without a network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

use crate::transport::{Transport, TransportError, TransportResponse, stream_from_bytes};

/// Canned outcome for a URL
#[derive(Debug, Clone)]
pub enum MockResponse {
    Body { status: u16, body: Vec<u8> },
    Error(TransportError),
}

/// A request seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub url: String,
    pub authorization: Option<String>,
}

/// In-memory transport for testing
///
/// URLs without a canned response answer `404`.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<String, MockResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `200` with `body`
    pub fn with_body(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.respond(
            url,
            MockResponse::Body {
                status: 200,
                body: body.into(),
            },
        )
    }

    /// Answer with an empty body and `status`
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.respond(
            url,
            MockResponse::Body {
                status,
                body: Vec::new(),
            },
        )
    }

    /// Fail at the transport level
    pub fn with_error(self, url: &str, error: TransportError) -> Self {
        self.respond(url, MockResponse::Error(error))
    }

    pub fn respond(self, url: &str, response: MockResponse) -> Self {
        lock(&self.routes).insert(url.to_string(), response);
        self
    }

    /// Every request in the order it was made
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Requested URLs in order
    pub fn requested_urls(&self) -> Vec<String> {
        lock(&self.calls).iter().map(|c| c.url.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        url: &Url,
        authorization: Option<&str>,
    ) -> Result<TransportResponse, TransportError> {
        lock(&self.calls).push(RecordedCall {
            url: url.to_string(),
            authorization: authorization.map(String::from),
        });

        let response = lock(&self.routes).get(url.as_str()).cloned();
        match response {
            Some(MockResponse::Body { status, body }) => Ok(TransportResponse {
                url: url.clone(),
                status,
                body: stream_from_bytes(body),
            }),
            Some(MockResponse::Error(e)) => Err(e),
            None => Ok(TransportResponse {
                url: url.clone(),
                status: 404,
                body: stream_from_bytes(Vec::new()),
            }),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
