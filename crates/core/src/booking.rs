//! Booking request aggregate
//!
//! One `BookingRequest` exists per conversation. The dialog state machine
//! owns it, fills it slot by slot, and hands it back on confirmation. It is
//! never persisted; the record dies with the conversation.

use serde::{Deserialize, Serialize};

use crate::recognizer::BookingEntities;

/// The booking under construction for a single conversation.
///
/// Fields move monotonically from unset to set; the state machine never
/// clears a filled slot within the same transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Utterance that started the booking, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<String>,
    /// Destination city
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Origin city
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Travel start date as a timex string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Travel end date as a timex string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Normalized "amount currency" budget text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    /// Validation warnings collected upstream (e.g. cities with no airport)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsupported_airports: Vec<String>,
}

impl BookingRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a request from an NLU pass over the opening utterance.
    ///
    /// Entities the recognizer did not find stay unset and are collected
    /// by the dialog one prompt at a time.
    pub fn from_entities(initial_message: impl Into<String>, entities: &BookingEntities) -> Self {
        Self {
            initial_message: Some(initial_message.into()),
            destination: entities.destination.clone(),
            origin: entities.origin.clone(),
            start_date: entities.start_date.clone(),
            end_date: entities.end_date.clone(),
            budget: entities.budget.clone(),
            unsupported_airports: entities.unsupported_airports.clone(),
        }
    }

    /// True once every slot required for confirmation is filled.
    pub fn is_complete(&self) -> bool {
        self.destination.is_some()
            && self.origin.is_some()
            && self.start_date.is_some()
            && self.end_date.is_some()
            && self.budget.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let request = BookingRequest::new();
        assert!(request.destination.is_none());
        assert!(request.unsupported_airports.is_empty());
        assert!(!request.is_complete());
    }

    #[test]
    fn test_from_entities_prefills() {
        let entities = BookingEntities {
            destination: Some("Roma".to_string()),
            origin: Some("Paris".to_string()),
            budget: Some("500 $".to_string()),
            ..Default::default()
        };

        let request = BookingRequest::from_entities("I want to travel to Roma", &entities);

        assert_eq!(request.initial_message.as_deref(), Some("I want to travel to Roma"));
        assert_eq!(request.destination.as_deref(), Some("Roma"));
        assert_eq!(request.origin.as_deref(), Some("Paris"));
        assert!(request.start_date.is_none());
        assert!(!request.is_complete());
    }

    #[test]
    fn test_is_complete() {
        let request = BookingRequest {
            destination: Some("Roma".to_string()),
            origin: Some("Paris".to_string()),
            start_date: Some("2022-08-18".to_string()),
            end_date: Some("2022-08-29".to_string()),
            budget: Some("500 $".to_string()),
            ..Default::default()
        };
        assert!(request.is_complete());
    }
}
