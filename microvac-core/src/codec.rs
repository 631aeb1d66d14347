//! Codec for the Microvac JSON-RPC envelope
//!
//! Encoding turns a `JsonRpcRequest` into the exact request body POSTed to the
//! bridge. Decoding comes in two strengths:
//!
//! - `decode_body`: parse the response body as arbitrary JSON and nothing
//!   more. This is what response handlers receive.
//! - `decode_response` / `into_result`: read the body as a JSON-RPC response
//!   and unwrap its `result`, surfacing a returned error object as
//!   `Error::JsonRpc`.
//!
//! # Examples
//!
//! ```rust
//! use microvac_core::{codec, JsonRpcRequest, Id};
//!
//! let request = JsonRpcRequest::new("stop", vec![], Id::Number(0));
//! let body = codec::encode_request(&request).unwrap();
//! assert_eq!(body, r#"{"method":"stop","params":[],"id":0,"jsonrpc":"2.0"}"#);
//!
//! let parsed = codec::decode_body(r#"{"result": true}"#).unwrap();
//! assert_eq!(parsed["result"], true);
//! ```

use crate::error::{Error, Result};
use crate::types::{JsonRpcRequest, JsonRpcResponse};
use serde::{de::DeserializeOwned, Serialize};

/// Encode any serializable message to a JSON string
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a request envelope to its wire body
pub fn encode_request(req: &JsonRpcRequest) -> Result<String> {
    encode(req)
}

/// Parse a response body as arbitrary JSON
///
/// Partial or truncated bodies fail here with `Error::Serialization`.
pub fn decode_body(data: &str) -> Result<serde_json::Value> {
    serde_json::from_str(data).map_err(|e| Error::Serialization(e.to_string()))
}

/// Parse a response body as a JSON-RPC response object
pub fn decode_response(data: &str) -> Result<JsonRpcResponse> {
    serde_json::from_str(data).map_err(|e| Error::Serialization(e.to_string()))
}

/// Unwrap a JSON-RPC response into its `result`, or its error object
///
/// A success response without a `result` field yields `Value::Null`.
pub fn into_result(response: JsonRpcResponse) -> Result<serde_json::Value> {
    if let Some(error) = response.error {
        return Err(Error::JsonRpc(error));
    }
    Ok(response.result.unwrap_or(serde_json::Value::Null))
}

/// Decode the `result` of a JSON-RPC response body into `R`
pub fn decode_result<R: DeserializeOwned>(data: &str) -> Result<R> {
    let result = into_result(decode_response(data)?)?;
    serde_json::from_value(result).map_err(|e| Error::Serialization(e.to_string()))
}
