//! Nested slot-resolution flows
//!
//! Each flow owns one question: it exposes an opening prompt and turns a
//! user answer into either a resolved value or a retry prompt. Collaborators
//! (recognizer, date resolver) are passed in explicitly per call; flows keep
//! no references to them.

pub mod budget;
pub mod city;
pub mod date;

pub use budget::BudgetFlow;
pub use city::{CityFlow, CitySlot};
pub use date::{DateFlow, DateSlot};

/// Result of feeding one answer to a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowTurn {
    /// Ask again (retry or clarification)
    Prompt(String),
    /// Slot resolved with this value
    Done(String),
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use booking_agent_core::{
        BookingEntities, BookingIntent, CoreError, Recognizer, RecognizerResult,
    };

    /// Recognizer that always reports itself unconfigured.
    pub struct UnconfiguredRecognizer;

    #[async_trait]
    impl Recognizer for UnconfiguredRecognizer {
        fn is_configured(&self) -> bool {
            false
        }

        async fn recognize(&self, _utterance: &str) -> Result<RecognizerResult, CoreError> {
            Err(CoreError::RecognizerNotConfigured)
        }
    }

    /// Recognizer returning a fixed result for every utterance.
    pub struct ScriptedRecognizer {
        result: RecognizerResult,
    }

    impl ScriptedRecognizer {
        pub fn with_entities(entities: BookingEntities) -> Self {
            Self {
                result: RecognizerResult {
                    intent: BookingIntent::Book,
                    score: 0.9,
                    entities,
                },
            }
        }
    }

    #[async_trait]
    impl Recognizer for ScriptedRecognizer {
        fn is_configured(&self) -> bool {
            true
        }

        async fn recognize(&self, _utterance: &str) -> Result<RecognizerResult, CoreError> {
            Ok(self.result.clone())
        }
    }
}
