//! Transport seam between the controller and the network
//!
//! The controller never talks HTTP directly. It hands an encoded envelope to a
//! `Transport`, which POSTs it and reports back the status and raw body. The
//! controller decides what counts as success.
//!
//! `HttpTransport` is the production implementation. Tests and alternative
//! front ends inject their own.
//!
//! # Request Shape
//!
//! - Method: `POST`
//! - Header: `Content-Type: application/json`
//! - No credentials: no cookie store, no authorization header
//! - No timeout unless one is configured

use async_trait::async_trait;
use microvac_core::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

impl TransportReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True only for `200 OK`
    ///
    /// The Microvac bridge answers every handled call with 200; any other
    /// status, including the rest of the 2xx range, is not a delivered result.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Sends one encoded JSON-RPC envelope to an endpoint
///
/// Implementations must not retry. A reply with any status is `Ok`; only a
/// failure to complete the exchange is `Err(Error::Transport)`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, endpoint: &str, body: String) -> Result<TransportReply>;
}

/// `Transport` over HTTP using `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with no request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Create a transport, optionally bounding each request
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest::Client`
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, endpoint: &str, body: String) -> Result<TransportReply> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(TransportReply { status, body })
    }
}
