//! JSON-RPC 2.0 envelope types used by the Microvac server
//!
//! The robot's HTTP bridge speaks a narrow dialect of JSON-RPC 2.0: every call
//! is a request object with positional parameters, POSTed on its own HTTP
//! exchange. This module holds the request envelope sent for every command and
//! the response shape the bridge answers with.
//!
//! # Field Order
//!
//! `JsonRpcRequest` serializes its fields as `method`, `params`, `id`,
//! `jsonrpc`, in that order. The bridge does not care, but the byte-exact
//! envelope is what the original control panel sends, and keeping it makes
//! captured traffic directly comparable.
//!
//! # Request IDs
//!
//! The panel always sends `id: 0`. Because each request travels on its own
//! HTTP exchange, the transport already pairs a response with its request and
//! the id is only carried for protocol conformance. See
//! `microvac_client::IdStrategy` for the sequential alternative.

use crate::error::JsonRpcErrorData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol version string carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request ID
///
/// JSON-RPC 2.0 allows string, number, or null IDs. The Microvac panel only ever
/// sends numbers, but responses from other bridges may echo any of the three.
///
/// This enum uses `#[serde(untagged)]` to serialize directly as the inner value
/// without a type discriminator.
///
/// # Examples
///
/// ```rust
/// use microvac_core::Id;
///
/// let id: Id = 0i64.into();
/// assert_eq!(id.to_string(), "0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),
    /// Numeric identifier
    Number(i64),
    /// Null identifier, used by servers that could not read the request id
    Null,
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<u64> for Id {
    /// Convert from u64 to Id
    ///
    /// Note: This casts to i64, so values > i64::MAX will wrap around.
    fn from(n: u64) -> Self {
        Id::Number(n as i64)
    }
}

/// The RPC envelope sent for every remote command
///
/// Unlike a general JSON-RPC request, `params` is always present and always a
/// positional array (possibly empty): the Microvac bridge dispatches by
/// position and the panel never omits the field.
///
/// # Examples
///
/// ```rust
/// use microvac_core::{JsonRpcRequest, Id};
/// use serde_json::json;
///
/// let req = JsonRpcRequest::new("displayExpression", vec![json!("2")], Id::Number(0));
/// assert_eq!(
///     serde_json::to_string(&req).unwrap(),
///     r#"{"method":"displayExpression","params":["2"],"id":0,"jsonrpc":"2.0"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Name of the remote method to invoke
    pub method: String,
    /// Positional parameters, in order
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
    /// Correlation identifier
    pub id: Id,
    /// JSON-RPC version - always "2.0"
    pub jsonrpc: String,
}

impl JsonRpcRequest {
    /// Create a new request envelope
    ///
    /// The `jsonrpc` field is automatically set to "2.0".
    pub fn new(method: impl Into<String>, params: Vec<serde_json::Value>, id: Id) -> Self {
        Self {
            method: method.into(),
            params,
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
        }
    }
}

/// JSON-RPC 2.0 response message
///
/// Only used when a caller asks for the decoded `result` of a call; the
/// raw-body path hands the parsed JSON to the caller untouched.
///
/// The bridge answers with exactly one of `result` or `error`.
///
/// # Examples
///
/// ```rust
/// use microvac_core::{JsonRpcResponse, Id};
/// use serde_json::json;
///
/// let success = JsonRpcResponse::success(json!({"success": "OK"}), Id::Number(0));
/// assert!(success.is_success());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version - always "2.0"
    pub jsonrpc: String,
    /// The result of the method invocation (present only on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error information (present only on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorData>,
    /// Request ID from the original request
    pub id: Id,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(result: serde_json::Value, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    pub fn error(error: JsonRpcErrorData, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Check if the response represents a successful result
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Check if the response represents an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
