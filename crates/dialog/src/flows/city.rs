//! City resolution flow
//!
//! One-word answers are taken at face value. Longer answers go through the
//! recognizer when one is configured, falling back to the raw answer when
//! it is not, when it errors, or when it finds no city for this slot.

use booking_agent_core::Recognizer;

use crate::flows::FlowTurn;
use crate::DialogError;

/// Which city slot this flow resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitySlot {
    Destination,
    Origin,
}

/// Nested flow asking for one city.
#[derive(Debug, Clone, Copy)]
pub struct CityFlow {
    slot: CitySlot,
}

impl CityFlow {
    pub fn new(slot: CitySlot) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> CitySlot {
        self.slot
    }

    /// Opening prompt for this slot.
    pub fn prompt(&self) -> &'static str {
        match self.slot {
            CitySlot::Destination => "To what city would you like to travel?",
            CitySlot::Origin => "From what city will you be travelling?",
        }
    }

    /// Resolve the user's answer, consulting the recognizer for multi-word
    /// answers.
    pub async fn handle(
        &self,
        answer: &str,
        recognizer: &dyn Recognizer,
    ) -> Result<FlowTurn, DialogError> {
        let answer = answer.trim();

        if answer.split_whitespace().count() == 1 {
            return Ok(FlowTurn::Done(answer.to_string()));
        }

        if !recognizer.is_configured() {
            return Ok(FlowTurn::Done(answer.to_string()));
        }

        let extracted = match recognizer.recognize(answer).await {
            Ok(result) => match self.slot {
                CitySlot::Destination => result.entities.destination,
                CitySlot::Origin => result.entities.origin,
            },
            Err(e) => {
                // Treated as "NLU unavailable": fall back to the raw answer
                // rather than surfacing a technical error mid-conversation.
                tracing::warn!(error = %e, "city recognition failed, using raw answer");
                None
            }
        };

        Ok(FlowTurn::Done(extracted.unwrap_or_else(|| answer.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::test_support::{ScriptedRecognizer, UnconfiguredRecognizer};
    use booking_agent_core::BookingEntities;

    #[tokio::test]
    async fn test_single_word_answer_taken_raw() {
        let flow = CityFlow::new(CitySlot::Destination);
        let recognizer = UnconfiguredRecognizer;

        let turn = flow.handle("Roma", &recognizer).await.unwrap();
        assert_eq!(turn, FlowTurn::Done("Roma".to_string()));
    }

    #[tokio::test]
    async fn test_multi_word_answer_without_nlu_taken_raw() {
        let flow = CityFlow::new(CitySlot::Origin);
        let recognizer = UnconfiguredRecognizer;

        let turn = flow.handle("the city of Paris", &recognizer).await.unwrap();
        assert_eq!(turn, FlowTurn::Done("the city of Paris".to_string()));
    }

    #[tokio::test]
    async fn test_multi_word_answer_resolved_by_nlu() {
        let flow = CityFlow::new(CitySlot::Destination);
        let recognizer = ScriptedRecognizer::with_entities(BookingEntities {
            destination: Some("Roma".to_string()),
            ..Default::default()
        });

        let turn = flow.handle("I would love to go to Roma", &recognizer).await.unwrap();
        assert_eq!(turn, FlowTurn::Done("Roma".to_string()));
    }

    #[tokio::test]
    async fn test_nlu_without_entity_falls_back_to_raw() {
        let flow = CityFlow::new(CitySlot::Origin);
        let recognizer = ScriptedRecognizer::with_entities(BookingEntities::default());

        let turn = flow.handle("somewhere in Italy", &recognizer).await.unwrap();
        assert_eq!(turn, FlowTurn::Done("somewhere in Italy".to_string()));
    }

    #[test]
    fn test_prompts() {
        assert!(CityFlow::new(CitySlot::Destination).prompt().contains("To what city"));
        assert!(CityFlow::new(CitySlot::Origin).prompt().contains("From what city"));
    }
}
