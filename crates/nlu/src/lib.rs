//! NLU recognizers for the booking agent
//!
//! Two implementations of the core `Recognizer` trait:
//! - `LuisRecognizer`: calls a LUIS v2-style HTTP endpoint
//! - `KeywordRecognizer`: offline regex extraction for local development
//!   and tests

pub mod keyword;
pub mod luis;

pub use keyword::KeywordRecognizer;
pub use luis::{LuisConfig, LuisRecognizer};

use thiserror::Error;

/// NLU errors. Converted to `CoreError::Recognizer` at the trait seam.
#[derive(Error, Debug)]
pub enum NluError {
    #[error("recognizer is not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(String),

    #[error("service error {status}: {message}")]
    Service { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for NluError {
    fn from(err: reqwest::Error) -> Self {
        NluError::Network(err.to_string())
    }
}

impl From<NluError> for booking_agent_core::CoreError {
    fn from(err: NluError) -> Self {
        match err {
            NluError::NotConfigured => booking_agent_core::CoreError::RecognizerNotConfigured,
            other => booking_agent_core::CoreError::Recognizer(other.to_string()),
        }
    }
}
