//! Cancel/help interruption handling
//!
//! Composed into the dialog driver: every user turn is screened for an
//! interruption keyword before the active slot flow sees it. Help leaves
//! the machine where it is; cancel ends the transaction with no result
//! and no diagnostic event.

/// An interruption detected in a user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// Abandon the booking
    Cancel,
    /// Show help and keep waiting for the current answer
    Help,
}

/// Help text shown on a help interruption.
pub const HELP_TEXT: &str =
    "I can book a flight for you. I will ask for your destination, origin, \
     travel dates and budget. Say \"cancel\" at any point to stop.";

/// Message sent when the user cancels.
pub const CANCEL_TEXT: &str = "Cancelling your booking request.";

/// Screen a user turn for an interruption keyword.
pub fn detect(input: &str) -> Option<Interruption> {
    match input.trim().to_lowercase().as_str() {
        "cancel" | "quit" => Some(Interruption::Cancel),
        "help" | "?" => Some(Interruption::Help),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_keywords() {
        assert_eq!(detect("cancel"), Some(Interruption::Cancel));
        assert_eq!(detect("  QUIT "), Some(Interruption::Cancel));
    }

    #[test]
    fn test_help_keywords() {
        assert_eq!(detect("help"), Some(Interruption::Help));
        assert_eq!(detect("?"), Some(Interruption::Help));
    }

    #[test]
    fn test_ordinary_answers_pass_through() {
        assert_eq!(detect("Paris"), None);
        assert_eq!(detect("I would like to cancel my gym membership"), None);
    }
}
