//! Slot-filling booking dialog
//!
//! Features:
//! - `BookingDialog`: explicit state machine driving destination, origin,
//!   start date, end date, budget and confirmation
//! - Nested resolution flows for cities, dates and budget
//! - Budget format classification and date ambiguity checking
//! - Cancel/help interruptions composed into the driver

pub mod ambiguity;
pub mod booking;
pub mod budget;
pub mod flows;
pub mod interruption;
pub mod resolver;

pub use ambiguity::is_ambiguous;
pub use booking::{BookingDialog, BookingState, DialogOutcome, DialogTurn};
pub use budget::{classify, validate, BudgetFormat};
pub use interruption::Interruption;
pub use resolver::{ChronoDateResolver, DateResolver};

use thiserror::Error;

use booking_agent_core::{CoreError, TimexError};

/// Dialog errors. Anything surfacing here ends the current turn; the
/// transport layer translates it before the user sees it.
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("temporal expression error: {0}")]
    Timex(#[from] TimexError),

    #[error("recognizer error: {0}")]
    Recognizer(String),

    #[error("dialog already ended")]
    Ended,
}

impl From<CoreError> for DialogError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Timex(e) => DialogError::Timex(e),
            other => DialogError::Recognizer(other.to_string()),
        }
    }
}
