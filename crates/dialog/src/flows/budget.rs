//! Budget flow
//!
//! Short answers must pass the format gate; longer ones are handed to the
//! recognizer, which may hand back a normalized "amount currency" value.

use booking_agent_core::Recognizer;

use crate::budget;
use crate::flows::FlowTurn;
use crate::DialogError;

/// Opening prompt for the budget question.
pub const PROMPT_TEXT: &str = "What is your budget?";

/// Retry prompt when the answer fails the format gate.
pub const REPROMPT_TEXT: &str = "I'm sorry, please enter your budget as an \
amount with an optional currency.";

/// Nested flow asking for the trip budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetFlow;

impl BudgetFlow {
    pub fn new() -> Self {
        Self
    }

    pub fn prompt(&self) -> &'static str {
        PROMPT_TEXT
    }

    /// Resolve the user's answer. Well-formed short answers are taken raw;
    /// free-form answers go to the recognizer when one is configured.
    pub async fn handle(
        &self,
        answer: &str,
        recognizer: &dyn Recognizer,
    ) -> Result<FlowTurn, DialogError> {
        let answer = answer.trim();

        if !budget::validate(answer) {
            return Ok(FlowTurn::Prompt(REPROMPT_TEXT.to_string()));
        }

        // Two tokens or fewer passed the gate well-formed; keep them as-is.
        if answer.split_whitespace().count() <= 2 {
            return Ok(FlowTurn::Done(answer.to_string()));
        }

        if !recognizer.is_configured() {
            return Ok(FlowTurn::Done(answer.to_string()));
        }

        let extracted = match recognizer.recognize(answer).await {
            Ok(result) => result.entities.budget,
            Err(e) => {
                tracing::warn!(error = %e, "budget recognition failed, using raw answer");
                None
            }
        };

        Ok(FlowTurn::Done(extracted.unwrap_or_else(|| answer.to_string())))
    }
}
