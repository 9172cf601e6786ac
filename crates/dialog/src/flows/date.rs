//! Travel date flow
//!
//! Resolves an answer to a temporal expression and keeps asking until the
//! expression pins down a concrete day, month and year.

use crate::flows::FlowTurn;
use crate::resolver::DateResolver;
use crate::DialogError;

/// Which travel date this flow collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSlot {
    Start,
    End,
}

/// Nested flow asking for one definite travel date.
#[derive(Debug, Clone, Copy)]
pub struct DateFlow {
    slot: DateSlot,
}

/// Retry prompt when the answer does not resolve to a definite date.
pub const REPROMPT_TEXT: &str = "I'm sorry, for best results, please enter your \
travel date including the day, month and year.";

impl DateFlow {
    pub fn new(slot: DateSlot) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> DateSlot {
        self.slot
    }

    /// Opening prompt for this slot.
    pub fn prompt(&self) -> &'static str {
        match self.slot {
            DateSlot::Start => "On what date would you like to travel?",
            DateSlot::End => "On what date would you like to return?",
        }
    }

    /// Resolve the user's answer. Anything short of a definite date is a
    /// retry, never an error.
    pub fn handle(
        &self,
        answer: &str,
        resolver: &dyn DateResolver,
    ) -> Result<FlowTurn, DialogError> {
        match resolver.resolve(answer) {
            Some(timex) if timex.is_definite() => Ok(FlowTurn::Done(timex.as_str().to_string())),
            _ => Ok(FlowTurn::Prompt(REPROMPT_TEXT.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ChronoDateResolver;

    #[test]
    fn test_definite_date_accepted() {
        let flow = DateFlow::new(DateSlot::Start);
        let turn = flow.handle("august 18 2022", &ChronoDateResolver).unwrap();
        assert_eq!(turn, FlowTurn::Done("2022-08-18".to_string()));
    }

    #[test]
    fn test_missing_year_reprompts() {
        let flow = DateFlow::new(DateSlot::Start);
        let turn = flow.handle("august 18", &ChronoDateResolver).unwrap();
        assert_eq!(turn, FlowTurn::Prompt(REPROMPT_TEXT.to_string()));
    }

    #[test]
    fn test_unparseable_answer_reprompts() {
        let flow = DateFlow::new(DateSlot::End);
        let turn = flow.handle("whenever is cheapest", &ChronoDateResolver).unwrap();
        assert_eq!(turn, FlowTurn::Prompt(REPROMPT_TEXT.to_string()));
    }

    #[test]
    fn test_prompts_differ_per_slot() {
        assert_ne!(
            DateFlow::new(DateSlot::Start).prompt(),
            DateFlow::new(DateSlot::End).prompt()
        );
    }
}
