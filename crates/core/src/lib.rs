//! Core types and collaborator traits for the booking agent
//!
//! This crate provides the foundational pieces shared by all other crates:
//! - The `BookingRequest` aggregate filled by the dialog state machine
//! - Timex (temporal expression) parsing and category labels
//! - The `Recognizer` trait (NLU collaborator seam)
//! - The `TelemetryClient` trait (diagnostics collaborator seam)
//! - Error types

pub mod booking;
pub mod error;
pub mod recognizer;
pub mod telemetry;
pub mod timex;

pub use booking::BookingRequest;
pub use error::{CoreError, Result};
pub use recognizer::{BookingEntities, BookingIntent, Recognizer, RecognizerResult};
pub use telemetry::{
    MemoryTelemetryClient, NullTelemetryClient, Severity, TelemetryClient, TraceEvent,
    TracingTelemetryClient,
};
pub use timex::{TimexError, TimexExpression, TimexLabel};
