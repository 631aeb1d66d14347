//! Error types for microvac
//!
//! Two error types live here:
//!
//! - **Error**: Application-level errors returned by the controller (uses thiserror)
//! - **JsonRpcErrorData**: Wire-format error objects as defined in the JSON-RPC 2.0 spec
//!
//! # Error Categories
//!
//! - **Configuration**: `EndpointNotSet`, `MissingControl`, `UnknownTrigger`
//! - **Input**: `InvalidParams`
//! - **Transport**: `Transport`, `HttpStatus`
//! - **Protocol**: `JsonRpc`, `Serialization`
//! - **Runtime**: `Internal`
//!
//! # Examples
//!
//! ```rust
//! use microvac_core::{Error, JsonRpcErrorData};
//!
//! let error = Error::HttpStatus(500);
//! assert_eq!(error.to_string(), "HTTP status 500");
//!
//! let json_error = JsonRpcErrorData::method_not_found("dance");
//! assert_eq!(json_error.code, -32601);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for microvac operations
pub type Result<T> = std::result::Result<T, Error>;

/// Application-level error type for microvac operations
///
/// `Clone` so that a single failure can be handed to both a waiting caller
/// and the metrics/diagnostic path.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// JSON-RPC error object returned by the bridge
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcErrorData),

    /// Serialization or deserialization error
    ///
    /// Raised when the request cannot be encoded, or when the response body
    /// is not valid JSON (or not the expected shape).
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The HTTP request could not be completed
    ///
    /// Covers unreachable hosts, refused connections, malformed endpoint URLs
    /// and bodies that could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success HTTP status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// A command was issued before any endpoint was configured
    #[error("The JSON-RPC endpoint is not set yet")]
    EndpointNotSet,

    /// The control panel lacks a control the controller must bind
    #[error("Missing control: {0}")]
    MissingControl(String),

    /// A control id or trigger name that maps to no trigger
    #[error("Unknown trigger: {0}")]
    UnknownTrigger(String),

    /// A command parameter that has no JSON representation
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Internal error
    ///
    /// Used for failures of the runtime itself, such as a request task that
    /// panicked or was aborted.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short, stable label used as a metrics attribute
    pub fn kind(&self) -> &'static str {
        match self {
            Error::JsonRpc(_) => "json_rpc",
            Error::Serialization(_) => "serialization",
            Error::Transport(_) => "transport",
            Error::HttpStatus(_) => "http_status",
            Error::EndpointNotSet => "endpoint_not_set",
            Error::MissingControl(_) => "missing_control",
            Error::UnknownTrigger(_) => "unknown_trigger",
            Error::InvalidParams(_) => "invalid_params",
            Error::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// JSON-RPC 2.0 error data as carried in a response
///
/// This structure is the exact wire format for JSON-RPC errors. It appears in
/// the `error` field of a `JsonRpcResponse`.
///
/// # Standard Error Codes
///
/// - `-32700`: Parse error
/// - `-32600`: Invalid Request
/// - `-32601`: Method not found
/// - `-32602`: Invalid params
/// - `-32603`: Internal error
/// - `-32000 to -32099`: Server error
///
/// The Microvac bridge reports robot-side failures (a NACK from the robot, a
/// dropped socket) as `-32000` server errors with the robot's message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Numeric error code indicating the error type
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Optional additional error information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcErrorData {
    /// Create a new JSON-RPC error with code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new JSON-RPC error with additional data
    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a parse error (-32700)
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// Create an invalid request error (-32600)
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(-32600, msg)
    }

    /// Create a method not found error (-32601)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use microvac_core::JsonRpcErrorData;
    ///
    /// let error = JsonRpcErrorData::method_not_found("dance");
    /// assert_eq!(error.message, "Method not found: dance");
    /// ```
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(-32601, format!("Method not found: {}", method.into()))
    }

    /// Create an invalid params error (-32602)
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(-32602, msg)
    }

    /// Create an internal error (-32603)
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(-32603, msg)
    }

    /// Create a server error (-32000)
    pub fn server_error(msg: impl Into<String>) -> Self {
        Self::new(-32000, msg)
    }
}

impl std::fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message", e.g. "[-32601] Method not found: dance"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}
