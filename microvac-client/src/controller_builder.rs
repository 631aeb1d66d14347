//! Builder for configuring and binding a `RemoteController`
//!
//! Every collaborator of the controller is injected here instead of being
//! looked up globally:
//! - the transport (defaults to `HttpTransport`)
//! - the diagnostics sink (defaults to `LogDiagnostics`)
//! - the request id strategy (defaults to `IdStrategy::Fixed(0)`)
//! - OpenTelemetry observability (off by default)
//! - metrics instruments alone, for callers that installed telemetry themselves
//!
//! # Examples
//!
//! ```rust,no_run
//! use microvac_client::{ControllerBuilder, StaticPanel};
//!
//! # fn example() -> microvac_core::Result<()> {
//! let mut controller = ControllerBuilder::new()
//!     .endpoint("http://localhost:4000/jsonrpc")
//!     .bind(&StaticPanel::microvac())?;
//!
//! controller.set_endpoint("http://192.168.1.200:4000/jsonrpc");
//! # Ok(())
//! # }
//! ```

use crate::correlation::{IdGenerator, IdStrategy};
use crate::diagnostics::{default_sink, DiagnosticSink};
use crate::transport::{HttpTransport, Transport};
use crate::trigger::{bind_triggers, ControlPanel};
use crate::{ClientMetrics, RemoteController};
use microvac_core::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring and creating a `RemoteController`
pub struct ControllerBuilder {
    endpoint: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    id_strategy: IdStrategy,
    request_timeout: Option<Duration>,
    observability_config: Option<microvac_core::ObservabilityConfig>,
    enable_metrics: bool,
    service_name: Option<String>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            transport: None,
            diagnostics: None,
            id_strategy: IdStrategy::default(),
            request_timeout: None,
            observability_config: None,
            enable_metrics: false,
            service_name: None,
        }
    }

    /// Start with an endpoint already set
    pub fn endpoint(mut self, address: impl Into<String>) -> Self {
        self.endpoint = Some(address.into());
        self
    }

    /// Send through a custom transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Report diagnostics to a custom sink
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Choose how request ids are assigned
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Bound each HTTP request (default transport only)
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enable OpenTelemetry observability with custom configuration
    pub fn with_observability(mut self, config: microvac_core::ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Enable OpenTelemetry observability with default configuration
    pub fn with_default_observability(mut self) -> Self {
        self.observability_config = Some(microvac_core::ObservabilityConfig::default());
        self
    }

    /// Record `ClientMetrics` on the global meter provider
    ///
    /// Unlike `with_observability`, installs nothing: use it when
    /// `init_observability` (or another OpenTelemetry setup) already ran.
    pub fn with_metrics(mut self) -> Self {
        self.enable_metrics = true;
        self
    }

    /// Set service name for observability (used if observability is enabled)
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Bind the triggers on `panel` and build the controller
    ///
    /// Fails with `Error::MissingControl` before anything else is set up if
    /// the panel lacks a control.
    pub fn bind<P: ControlPanel + ?Sized>(self, panel: &P) -> Result<RemoteController> {
        let bindings = bind_triggers(panel)?;

        let metrics = if let Some(mut config) = self.observability_config {
            if let Some(name) = self.service_name {
                config.service_name = name;
            }

            microvac_core::init_observability(config.clone())
                .map_err(|e| Error::Internal(format!("Failed to initialize observability: {}", e)))?;

            Some(Arc::new(ClientMetrics::new(config.service_name)))
        } else if self.enable_metrics {
            let name = self
                .service_name
                .unwrap_or_else(|| microvac_core::ObservabilityConfig::default().service_name);
            Some(Arc::new(ClientMetrics::new(name)))
        } else {
            None
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::with_timeout(self.request_timeout)?),
        };

        tracing::info!(
            controls = bindings.len(),
            endpoint = self.endpoint.as_deref().unwrap_or("<unset>"),
            "Panel bound"
        );

        Ok(RemoteController {
            endpoint: self.endpoint,
            bindings,
            transport,
            diagnostics: self.diagnostics.unwrap_or_else(default_sink),
            ids: IdGenerator::new(self.id_strategy),
            metrics,
        })
    }
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
