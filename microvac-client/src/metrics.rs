//! Controller metrics definitions
//!
//! OpenTelemetry instruments recorded by the controller when observability is
//! enabled through `ControllerBuilder::with_observability()` or
//! `ControllerBuilder::with_metrics()`.
//!
//! # Metrics Collected
//!
//! - **requests_total**: Requests completed, by method and status (counter)
//! - **request_duration**: Request latency distribution in seconds (histogram)
//! - **errors_total**: Failed requests, by error kind (counter)
//! - **diagnostics_total**: Diagnostics reported, by kind (counter)

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Controller metrics for monitoring
pub struct ClientMetrics {
    /// Total number of requests completed
    pub requests_total: Counter<u64>,
    /// Request duration in seconds
    pub request_duration: Histogram<f64>,
    /// Total number of failed requests
    pub errors_total: Counter<u64>,
    /// Total number of diagnostics reported
    pub diagnostics_total: Counter<u64>,
}

impl ClientMetrics {
    /// Create a new ClientMetrics instance on the global meter provider
    pub fn new(service_name: impl Into<String>) -> Self {
        let name: &'static str = Box::leak(service_name.into().into_boxed_str());
        let meter = global::meter(name);
        Self::new_with_meter(&meter)
    }

    /// Create a new ClientMetrics instance with a custom meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("microvac.client.requests.total")
                .with_description("Total number of requests completed")
                .build(),
            request_duration: meter
                .f64_histogram("microvac.client.request.duration")
                .with_description("Request duration in seconds")
                .build(),
            errors_total: meter
                .u64_counter("microvac.client.errors.total")
                .with_description("Total number of failed requests")
                .build(),
            diagnostics_total: meter
                .u64_counter("microvac.client.diagnostics.total")
                .with_description("Total number of diagnostics reported")
                .build(),
        }
    }

    /// Record a completed request
    pub fn record_request(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    /// Record a failed request
    pub fn record_error(&self, error_kind: &str) {
        let attributes = &[KeyValue::new("error_kind", error_kind.to_string())];
        self.errors_total.add(1, attributes);
    }

    /// Record a diagnostic report
    pub fn record_diagnostic(&self, kind: &str) {
        let attributes = &[KeyValue::new("kind", kind.to_string())];
        self.diagnostics_total.add(1, attributes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = ClientMetrics::new("test-controller");

        metrics.record_request("forwards", "success", 0.05);
        metrics.record_error("http_status");
        metrics.record_diagnostic("endpoint_not_set");
    }

    #[test]
    fn test_request_metrics() {
        let metrics = ClientMetrics::new("test-controller-req");

        metrics.record_request("stop", "success", 0.02);
        metrics.record_request("displayExpression", "success", 0.03);
        metrics.record_request("turnLeft", "error", 0.01);
        metrics.record_error("transport");
    }
}
