//! The Microvac remote controller
//!
//! `RemoteController` ties the panel's triggers to outbound JSON-RPC calls.
//! It holds the endpoint, builds the request envelope, and hands it to the
//! injected `Transport`.
//!
//! # Invocation Lifecycle
//!
//! 1. **Check endpoint**: no endpoint means a diagnostic and nothing sent
//! 2. **Envelope**: `{method, params, id, jsonrpc}` with an id from the `IdGenerator`
//! 3. **Spawn**: the POST runs on its own Tokio task; `invoke` returns at once
//! 4. **Complete**: a `200` status with a JSON body is a success
//! 5. **Deliver**: the optional handler runs once with the parsed body, and
//!    the `Invocation` resolves with the same value or a typed error
//!
//! Rapid triggers produce independent, concurrent requests. Nothing is
//! de-duplicated, ordered, retried or cancelled.
//!
//! # Failures
//!
//! Only the missing-endpoint case reaches the diagnostics sink. Transport
//! failures, non-success statuses and unparsable bodies never call the
//! handler and report no diagnostic; they are visible only as the `Err`
//! outcome of the `Invocation` (or of `call`).

use crate::correlation::IdGenerator;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::metrics::ClientMetrics;
use crate::transport::Transport;
use crate::trigger::{ControlPanel, Trigger};
use crate::ControllerBuilder;
use microvac_core::{codec, Command, Error, Id, JsonRpcRequest, JsonRpcResponse, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handler receiving the parsed body of a successful response
pub type ResultHandler = Box<dyn FnOnce(Value) + Send + 'static>;

/// An in-flight request started by `invoke`
///
/// Dropping it does not cancel the request.
#[derive(Debug)]
pub struct Invocation {
    method: String,
    id: Id,
    handle: JoinHandle<Result<Value>>,
}

impl Invocation {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Whether the request has completed (either way)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the request to complete
    ///
    /// With no timeout configured on the transport, this waits as long as the
    /// endpoint takes to answer.
    pub async fn outcome(self) -> Result<Value> {
        self.handle
            .await
            .map_err(|e| Error::Internal(format!("Request task failed: {}", e)))?
    }
}

/// Remote controller for the Microvac robot
pub struct RemoteController {
    pub(crate) endpoint: Option<String>,
    pub(crate) bindings: HashMap<String, Trigger>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) diagnostics: Arc<dyn DiagnosticSink>,
    pub(crate) ids: IdGenerator,
    pub(crate) metrics: Option<Arc<ClientMetrics>>,
}

impl RemoteController {
    /// Bind all eight triggers on `panel`, sending through `transport`
    ///
    /// Fails with `Error::MissingControl` if the panel lacks any control.
    /// Use `ControllerBuilder` for the other options.
    pub fn bind<P: ControlPanel + ?Sized>(panel: &P, transport: Arc<dyn Transport>) -> Result<Self> {
        ControllerBuilder::new().transport(transport).bind(panel)
    }

    /// Start configuring a controller
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::new()
    }

    /// Set the address every request is POSTed to
    ///
    /// The address is not validated; a bad one shows up as `Error::Transport`
    /// on the first request.
    pub fn set_endpoint(&mut self, address: impl Into<String>) -> &mut Self {
        let address = address.into();
        tracing::info!(endpoint = %address, "Endpoint set");
        self.endpoint = Some(address);
        self
    }

    /// The configured endpoint, if any
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// The trigger bound to a panel control
    pub fn binding(&self, control_id: &str) -> Option<Trigger> {
        self.bindings.get(control_id).copied()
    }

    /// Send `method` with `params`, without waiting for the response
    ///
    /// Returns `None` (and reports `Diagnostic::EndpointNotSet`) if no
    /// endpoint is configured. Must be called from within a Tokio runtime.
    pub fn invoke(&self, method: impl Into<String>, params: Vec<Value>) -> Option<Invocation> {
        self.dispatch(method.into(), params, None)
    }

    /// Like `invoke`, calling `on_result` with the parsed body on success
    ///
    /// `on_result` is never called for failed requests.
    pub fn invoke_with<F>(
        &self,
        method: impl Into<String>,
        params: Vec<Value>,
        on_result: F,
    ) -> Option<Invocation>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        self.dispatch(method.into(), params, Some(Box::new(on_result)))
    }

    /// Send a catalogue command without waiting
    ///
    /// A command whose params fail `Command::validate` is logged and not sent.
    pub fn send(&self, command: &Command) -> Option<Invocation> {
        self.checked(command)?;
        self.invoke(command.method(), command.params())
    }

    /// Send a catalogue command, calling `on_result` on success
    pub fn send_with<F>(&self, command: &Command, on_result: F) -> Option<Invocation>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        self.checked(command)?;
        self.invoke_with(command.method(), command.params(), on_result)
    }

    /// Fire a panel trigger
    pub fn fire(&self, trigger: Trigger) -> Option<Invocation> {
        tracing::debug!(trigger = %trigger, "Trigger fired");
        self.send(&trigger.command())
    }

    /// Fire a panel trigger, calling `on_result` on success
    pub fn fire_with<F>(&self, trigger: Trigger, on_result: F) -> Option<Invocation>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        tracing::debug!(trigger = %trigger, "Trigger fired");
        self.send_with(&trigger.command(), on_result)
    }

    /// Send `method` and wait for the parsed response body
    #[tracing::instrument(skip(self, params))]
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let endpoint = self.require_endpoint(method)?;
        let request = JsonRpcRequest::new(method, params, self.ids.next_id());
        post(self.transport.as_ref(), &endpoint, &request, self.metrics.as_deref()).await
    }

    /// Send a catalogue command and decode the JSON-RPC `result` as `R`
    ///
    /// A response carrying an error object yields `Error::JsonRpc`.
    pub async fn request<R: DeserializeOwned>(&self, command: &Command) -> Result<R> {
        command.validate()?;
        let body = self.call(command.method(), command.params()).await?;
        let response: JsonRpcResponse = serde_json::from_value(body)?;
        let result = codec::into_result(response)?;
        Ok(serde_json::from_value(result)?)
    }

    /// Panel event loop
    ///
    /// Fires the bound trigger for every control id received on `clicks`,
    /// without waiting for responses. Clicks on unbound controls are logged
    /// and skipped.
    ///
    /// Once the sending side closes, waits for every request still in flight
    /// and returns the number of triggers fired. A process that exits after
    /// `run` resolves therefore never cuts off the last click.
    pub async fn run(&self, mut clicks: mpsc::Receiver<String>) -> usize {
        let mut fired = 0;
        let mut in_flight: Vec<Invocation> = Vec::new();
        while let Some(control) = clicks.recv().await {
            match self.binding(&control) {
                Some(trigger) => {
                    in_flight.retain(|invocation| !invocation.is_finished());
                    in_flight.extend(self.fire(trigger));
                    fired += 1;
                }
                None => tracing::warn!(control = %control, "Click on unbound control ignored"),
            }
        }

        tracing::debug!(fired, pending = in_flight.len(), "Panel closed, draining requests");
        for invocation in in_flight {
            let method = invocation.method().to_string();
            if let Err(e) = invocation.outcome().await {
                tracing::debug!(method = %method, error = %e, "Drained request failed");
            }
        }
        fired
    }

    /// Instruments recorded for each request, if enabled
    pub fn metrics(&self) -> Option<&ClientMetrics> {
        self.metrics.as_deref()
    }

    fn checked(&self, command: &Command) -> Option<()> {
        match command.validate() {
            Ok(()) => Some(()),
            Err(e) => {
                tracing::warn!(method = command.method(), error = %e, "Command not sent");
                None
            }
        }
    }

    fn dispatch(
        &self,
        method: String,
        params: Vec<Value>,
        on_result: Option<ResultHandler>,
    ) -> Option<Invocation> {
        let endpoint = self.require_endpoint(&method).ok()?;
        let id = self.ids.next_id();
        let request = JsonRpcRequest::new(method.clone(), params, id.clone());

        let transport = self.transport.clone();
        let metrics = self.metrics.clone();
        let handle = tokio::spawn(async move {
            let outcome = post(transport.as_ref(), &endpoint, &request, metrics.as_deref()).await;
            if let (Ok(body), Some(on_result)) = (&outcome, on_result) {
                on_result(body.clone());
            }
            outcome
        });

        Some(Invocation { method, id, handle })
    }

    fn require_endpoint(&self, method: &str) -> Result<String> {
        match &self.endpoint {
            Some(endpoint) => Ok(endpoint.clone()),
            None => {
                let diagnostic = Diagnostic::EndpointNotSet {
                    method: method.to_string(),
                };
                if let Some(ref m) = self.metrics {
                    m.record_diagnostic(diagnostic.kind());
                }
                self.diagnostics.report(diagnostic);
                Err(Error::EndpointNotSet)
            }
        }
    }
}

/// POST one envelope and parse the reply body
async fn post(
    transport: &dyn Transport,
    endpoint: &str,
    request: &JsonRpcRequest,
    metrics: Option<&ClientMetrics>,
) -> Result<Value> {
    let start = Instant::now();

    let outcome = async {
        let body = codec::encode_request(request)?;
        tracing::debug!(method = %request.method, id = %request.id, endpoint, "Request sent");
        let reply = transport.post_json(endpoint, body).await?;
        if !reply.is_success() {
            return Err(Error::HttpStatus(reply.status));
        }
        codec::decode_body(&reply.body)
    }
    .await;

    let duration = start.elapsed().as_secs_f64();
    match &outcome {
        Ok(_) => {
            if let Some(m) = metrics {
                m.record_request(&request.method, "success", duration);
            }
            tracing::debug!(method = %request.method, duration_secs = duration, "Request completed");
        }
        Err(e) => {
            if let Some(m) = metrics {
                m.record_request(&request.method, "error", duration);
                m.record_error(e.kind());
            }
            tracing::debug!(method = %request.method, error = %e, "Request failed");
        }
    }

    outcome
}
