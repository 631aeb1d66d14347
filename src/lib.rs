//! Microvac Remote - drive the Microvac robot over JSON-RPC
//!
//! This is the convenience crate that re-exports the Microvac sub-crates.
//! Use it if you want a single dependency for the controller and its types.
//!
//! # Architecture
//!
//! - **microvac-core**: JSON-RPC envelope types, codec, command catalogue, errors, observability
//! - **microvac-client**: `RemoteController`, trigger panel binding, HTTP transport, diagnostics
//!
//! The `microvac` binary in this package wraps both as a command-line remote
//! with one-shot commands and an interactive keyboard panel.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use microvac_remote::{Command, RemoteController, StaticPanel, Trigger};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut controller = RemoteController::builder().bind(&StaticPanel::microvac())?;
//!     controller.set_endpoint("http://localhost:4000/jsonrpc");
//!
//!     // Panel trigger, fire and forget
//!     controller.fire(Trigger::Expression2);
//!
//!     // Catalogue command, waiting for the decoded result
//!     let distance: serde_json::Value = controller.request(&Command::GetDistance).await?;
//!     println!("distance: {}", distance);
//!
//!     Ok(())
//! }
//! ```

pub use microvac_client as client;
pub use microvac_core as core;

pub use microvac_client::{
    ControlPanel, ControllerBuilder, Diagnostic, DiagnosticSink, HttpTransport, IdStrategy,
    Invocation, LogDiagnostics, RemoteController, StaticPanel, Transport, TransportReply, Trigger,
};
pub use microvac_core::{
    init_observability, shutdown_observability, AngleUnit, Command, Error, MotionTime,
    ObservabilityConfig, Result, TimeUnit,
};

/// Endpoint of the bridge in the stock Microvac setup
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/jsonrpc";
