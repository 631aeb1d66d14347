//! Common test utilities for microvac-client integration tests
//!
//! Provides an in-memory transport and a counting diagnostics sink so the
//! controller can be exercised without a robot or an HTTP server.

#![allow(dead_code)]

use async_trait::async_trait;
use microvac_client::{Diagnostic, DiagnosticSink, Transport, TransportReply};
use microvac_core::Result;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A request as seen by the transport
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub endpoint: String,
    pub body: String,
}

impl SentRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Responder = dyn Fn(&serde_json::Value) -> TransportReply + Send + Sync;

/// In-memory transport that records every request and answers with a
/// caller-supplied responder
pub struct MockTransport {
    sent: Mutex<Vec<SentRequest>>,
    responder: Box<Responder>,
    delay: Option<std::time::Duration>,
    sent_tx: mpsc::UnboundedSender<SentRequest>,
    sent_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<SentRequest>>,
}

impl MockTransport {
    /// Transport answering `200 {"result": true}` to everything
    pub fn new() -> Arc<Self> {
        Self::with_responder(|_| TransportReply::new(200, r#"{"result": true}"#))
    }

    /// Transport answering every request with `status` and an empty body
    pub fn with_status(status: u16) -> Arc<Self> {
        Self::with_responder(move |_| TransportReply::new(status, ""))
    }

    /// Transport answering with a custom responder
    ///
    /// The responder receives the parsed request envelope.
    pub fn with_responder<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&serde_json::Value) -> TransportReply + Send + Sync + 'static,
    {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            delay: None,
            sent_tx,
            sent_rx: tokio::sync::Mutex::new(sent_rx),
        })
    }

    /// Transport answering `200 {"result": true}` after `delay`
    ///
    /// A request is only recorded once its reply is ready, so `sent()` lists
    /// completed exchanges.
    pub fn with_delay(delay: std::time::Duration) -> Arc<Self> {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            responder: Box::new(|_| TransportReply::new(200, r#"{"result": true}"#)),
            delay: Some(delay),
            sent_tx,
            sent_rx: tokio::sync::Mutex::new(sent_rx),
        })
    }

    /// Every request sent so far, in arrival order
    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait for the next request to reach the transport
    ///
    /// Returns None if nothing arrives within 5 seconds.
    pub async fn wait_for_request(&self) -> Option<SentRequest> {
        let mut rx = self.sent_rx.lock().await;
        tokio::time::timeout(tokio::time::Duration::from_secs(5), rx.recv())
            .await
            .ok()
            .flatten()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, endpoint: &str, body: String) -> Result<TransportReply> {
        let request = SentRequest {
            endpoint: endpoint.to_string(),
            body,
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = (self.responder)(&request.json());
        self.sent.lock().unwrap().push(request.clone());
        let _ = self.sent_tx.send(request);
        Ok(reply)
    }
}

/// Diagnostics sink that keeps every report
#[derive(Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reports(&self) -> Vec<Diagnostic> {
        self.reports.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.reports.lock().unwrap().push(diagnostic);
    }
}

/// Helper to create a mock JSON-RPC response body
pub fn mock_response(id: i64, result: serde_json::Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id
    })
    .to_string()
}

/// Helper to create a mock JSON-RPC error response body
pub fn mock_error_response(id: i64, code: i32, message: &str) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": {
            "code": code,
            "message": message
        },
        "id": id
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_records() {
        let transport = MockTransport::new();
        let reply = transport
            .post_json("http://robot/jsonrpc", r#"{"method":"stop"}"#.to_string())
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(transport.sent()[0].endpoint, "http://robot/jsonrpc");
    }

    #[test]
    fn test_mock_response_format() {
        let response = mock_response(0, serde_json::json!({"success": "OK"}));
        assert!(response.contains("\"jsonrpc\":\"2.0\""));
        assert!(response.contains("\"id\":0"));
        assert!(response.contains("\"result\""));
    }

    #[test]
    fn test_mock_error_response_format() {
        let response = mock_error_response(0, -32601, "Method not found");
        assert!(response.contains("\"error\""));
        assert!(response.contains("-32601"));
    }
}
