//! Diagnostics collaborator
//!
//! Fire-and-forget trace events. Delivery failures must never fail or
//! block the conversation, so the trait is synchronous and infallible at
//! the call site; implementations swallow their own transport problems.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Severity of a trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Information => "INFORMATION",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// A recorded trace event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub name: String,
    pub properties: HashMap<String, String>,
    pub severity: &'static str,
}

/// Diagnostics collaborator seam.
pub trait TelemetryClient: Send + Sync {
    /// Record a named trace event with string properties.
    fn track_trace(&self, name: &str, properties: HashMap<String, String>, severity: Severity);
}

/// Telemetry sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetryClient;

impl TelemetryClient for NullTelemetryClient {
    fn track_trace(&self, _name: &str, _properties: HashMap<String, String>, _severity: Severity) {}
}

/// Telemetry sink that forwards events to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetryClient;

impl TelemetryClient for TracingTelemetryClient {
    fn track_trace(&self, name: &str, properties: HashMap<String, String>, severity: Severity) {
        match severity {
            Severity::Information => tracing::info!(event = %name, ?properties, "trace event"),
            Severity::Warning => tracing::warn!(event = %name, ?properties, "trace event"),
            Severity::Error => tracing::error!(event = %name, ?properties, "trace event"),
        }
    }
}

/// Telemetry sink that keeps events in memory for later inspection.
#[derive(Debug, Default)]
pub struct MemoryTelemetryClient {
    events: Mutex<Vec<TraceEvent>>,
}

impl MemoryTelemetryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().clone()
    }
}

impl TelemetryClient for MemoryTelemetryClient {
    fn track_trace(&self, name: &str, properties: HashMap<String, String>, severity: Severity) {
        self.events.lock().push(TraceEvent {
            name: name.to_string(),
            properties,
            severity: severity.as_str(),
        });
    }
}
