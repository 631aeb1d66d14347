//! Remote controller for the Microvac robot
//!
//! This crate binds the eight buttons of the Microvac control panel to
//! JSON-RPC 2.0 calls POSTed over HTTP to the robot's bridge.
//!
//! # Core Features
//!
//! - **Trigger binding**: the drive pad and expression buttons, fail-fast on a missing control
//! - **Fire and forget**: every trigger spawns an independent request and returns at once
//! - **Typed outcomes**: each request resolves to its parsed body or a typed `Error`
//! - **Injected collaborators**: transport, diagnostics sink and id strategy
//! - **Observability**: `tracing` throughout, optional OpenTelemetry metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use microvac_client::{RemoteController, StaticPanel, Trigger};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut controller = RemoteController::builder().bind(&StaticPanel::microvac())?;
//!     controller.set_endpoint("http://localhost:4000/jsonrpc");
//!
//!     // Fire and forget
//!     controller.fire(Trigger::Forward);
//!
//!     // Fire with a response handler, then wait for the outcome
//!     if let Some(invocation) = controller.fire_with(Trigger::Stop, |body| {
//!         println!("stopped: {}", body);
//!     }) {
//!         invocation.outcome().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod controller;
mod controller_builder;
mod correlation;
mod diagnostics;
mod metrics;
mod transport;
mod trigger;

pub use controller::{Invocation, RemoteController, ResultHandler};
pub use controller_builder::ControllerBuilder;
pub use correlation::{IdGenerator, IdStrategy};
pub use diagnostics::{Diagnostic, DiagnosticSink, LogDiagnostics};
pub use metrics::ClientMetrics;
pub use transport::{HttpTransport, Transport, TransportReply};
pub use trigger::{ControlPanel, StaticPanel, Trigger};
