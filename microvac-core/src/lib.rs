//! Core JSON-RPC 2.0 envelope, codec and command catalogue for microvac
//!
//! This crate holds everything about talking to the Microvac bridge that does
//! not depend on a transport:
//!
//! - **Types**: the request envelope and response shape
//! - **Codec**: encoding request bodies and decoding response bodies
//! - **Command**: the robot's remote methods and their positional parameters
//! - **Error handling**: the error taxonomy shared by every crate
//! - **Observability**: `tracing` subscriber and OpenTelemetry setup
//!
//! # Example
//!
//! ```rust
//! use microvac_core::{codec, Command, Id, JsonRpcRequest};
//!
//! let cmd = Command::expression("2");
//! let request = JsonRpcRequest::new(cmd.method(), cmd.params(), Id::Number(0));
//!
//! let body = codec::encode_request(&request).unwrap();
//! assert_eq!(body, r#"{"method":"displayExpression","params":["2"],"id":0,"jsonrpc":"2.0"}"#);
//! ```

pub mod codec;
pub mod command;
pub mod error;
pub mod observability;
pub mod types;

pub use command::{AngleUnit, Command, MotionTime, TimeUnit};
pub use error::{Error, JsonRpcErrorData, Result};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{Id, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
