//! Developer-facing diagnostics channel
//!
//! Some failures are recovered locally instead of being returned to whoever
//! pressed the button: firing a trigger before an endpoint is configured is
//! one. Those are reported here as typed `Diagnostic` values so a UI can
//! surface them and tests can count them.
//!
//! `LogDiagnostics`, the default sink, writes each report as a
//! `tracing::error!` event. Any `Fn(Diagnostic) + Send + Sync` closure is also
//! a sink.

use std::sync::Arc;

/// A locally recovered failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    /// A command was dropped because no endpoint is configured
    #[error("The JSON-RPC endpoint is not set yet; `{method}` was not sent")]
    EndpointNotSet { method: String },
}

impl Diagnostic {
    /// Short, stable label used as a log field and metrics attribute
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::EndpointNotSet { .. } => "endpoint_not_set",
        }
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Sink that logs every diagnostic at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::error!(kind = diagnostic.kind(), "{}", diagnostic);
    }
}

pub(crate) fn default_sink() -> Arc<dyn DiagnosticSink> {
    Arc::new(LogDiagnostics)
}
