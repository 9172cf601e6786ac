//! NLU collaborator seam
//!
//! The dialog never talks to a concrete NLU service; it receives a
//! `Recognizer` trait object and is told whether the recognizer is
//! configured at all. Unconfigured recognizers are not an error: every
//! slot that consults NLU falls back to the raw user answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Intents the booking NLU model can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingIntent {
    /// The user wants to book a flight
    Book,
    /// The user wants to abandon the current request
    Cancel,
    /// Nothing the model understands
    None,
}

impl BookingIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingIntent::Book => "book",
            BookingIntent::Cancel => "cancel",
            BookingIntent::None => "none",
        }
    }
}

/// Booking entities extracted from one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingEntities {
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub budget: Option<String>,
    #[serde(default)]
    pub unsupported_airports: Vec<String>,
}

impl BookingEntities {
    pub fn is_empty(&self) -> bool {
        self.destination.is_none()
            && self.origin.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.budget.is_none()
    }
}

/// One recognition pass over an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    pub intent: BookingIntent,
    pub score: f32,
    pub entities: BookingEntities,
}

impl RecognizerResult {
    /// A result carrying no intent and no entities.
    pub fn none() -> Self {
        Self {
            intent: BookingIntent::None,
            score: 0.0,
            entities: BookingEntities::default(),
        }
    }
}

/// External natural-language-understanding collaborator.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Whether the recognizer has the configuration it needs to be called.
    /// When false, callers must use raw-text answers instead.
    fn is_configured(&self) -> bool;

    /// Extract intent and booking entities from free text.
    async fn recognize(&self, utterance: &str) -> Result<RecognizerResult>;
}
