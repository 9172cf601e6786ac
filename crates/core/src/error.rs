//! Core error types

use thiserror::Error;

use crate::timex::TimexError;

/// Errors surfaced by core types and collaborator traits.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("temporal expression error: {0}")]
    Timex(#[from] TimexError),

    #[error("recognizer error: {0}")]
    Recognizer(String),

    #[error("recognizer is not configured")]
    RecognizerNotConfigured,
}

pub type Result<T> = std::result::Result<T, CoreError>;
