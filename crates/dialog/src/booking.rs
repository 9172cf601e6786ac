//! Booking dialog driver
//!
//! An explicit state machine owning the `BookingRequest` under
//! construction. Each call to `advance` walks the slot order and opens the
//! first nested flow whose slot is unfilled (or, for dates, ambiguous);
//! each user turn is screened for interruptions, routed to the active flow
//! and committed back before advancing again. Collaborators are injected
//! once at construction and handed to flows per call.

use std::collections::HashMap;
use std::sync::Arc;

use booking_agent_core::{BookingRequest, Recognizer, Severity, TelemetryClient};

use crate::ambiguity::is_ambiguous;
use crate::flows::{BudgetFlow, CityFlow, CitySlot, DateFlow, DateSlot, FlowTurn};
use crate::interruption::{self, Interruption, CANCEL_TEXT, HELP_TEXT};
use crate::resolver::DateResolver;
use crate::DialogError;

/// Telemetry event recorded when the user declines the summary.
pub const NOT_CONFIRMED_EVENT: &str = "booking_not_confirmed";

const DECLINED_TEXT: &str = "Sorry we couldn't book your trip. Feel free to come back any time.";
const CONFIRM_RETRY_TEXT: &str = "Please answer yes or no.";

/// Where the machine is in the slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    Destination,
    Origin,
    StartDate,
    EndDate,
    Budget,
    Confirm,
    Done,
}

/// How a finished dialog ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    /// The user confirmed the summary; the completed request is returned
    Confirmed(BookingRequest),
    /// The user declined the summary
    Declined,
    /// The user cancelled mid-dialog
    Cancelled,
}

/// One turn of output from the dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogTurn {
    /// A question for the user; the dialog is waiting for an answer
    Prompt(String),
    /// The dialog is over
    Ended {
        message: String,
        outcome: DialogOutcome,
    },
}

#[derive(Clone, Copy)]
enum ActiveFlow {
    City(CityFlow),
    Date(DateFlow),
    Budget(BudgetFlow),
}

/// Slot-filling dialog for one booking conversation.
pub struct BookingDialog {
    state: BookingState,
    details: BookingRequest,
    active: Option<ActiveFlow>,
    recognizer: Arc<dyn Recognizer>,
    resolver: Arc<dyn DateResolver>,
    telemetry: Arc<dyn TelemetryClient>,
}

impl BookingDialog {
    pub fn new(
        details: BookingRequest,
        recognizer: Arc<dyn Recognizer>,
        resolver: Arc<dyn DateResolver>,
        telemetry: Arc<dyn TelemetryClient>,
    ) -> Self {
        Self {
            state: BookingState::Destination,
            details,
            active: None,
            recognizer,
            resolver,
            telemetry,
        }
    }

    pub fn state(&self) -> BookingState {
        self.state
    }

    /// The request as filled so far.
    pub fn details(&self) -> &BookingRequest {
        &self.details
    }

    pub fn is_ended(&self) -> bool {
        self.state == BookingState::Done
    }

    /// Start the dialog: emit the first prompt (possibly the confirmation
    /// summary when every slot arrived pre-filled).
    pub fn begin(&mut self) -> Result<DialogTurn, DialogError> {
        self.advance()
    }

    /// Walk the slot order from the current state and open the first flow
    /// that still has work, or move to confirmation.
    fn advance(&mut self) -> Result<DialogTurn, DialogError> {
        loop {
            match self.state {
                BookingState::Destination => {
                    if self.details.destination.is_none() {
                        let flow = CityFlow::new(CitySlot::Destination);
                        let prompt = flow.prompt().to_string();
                        self.active = Some(ActiveFlow::City(flow));
                        return Ok(DialogTurn::Prompt(prompt));
                    }
                    self.state = BookingState::Origin;
                }
                BookingState::Origin => {
                    if self.details.origin.is_none() {
                        let flow = CityFlow::new(CitySlot::Origin);
                        let prompt = flow.prompt().to_string();
                        self.active = Some(ActiveFlow::City(flow));
                        return Ok(DialogTurn::Prompt(prompt));
                    }
                    self.state = BookingState::StartDate;
                }
                BookingState::StartDate => {
                    if let Some(turn) = self.open_date_flow(DateSlot::Start)? {
                        return Ok(turn);
                    }
                    self.state = BookingState::EndDate;
                }
                BookingState::EndDate => {
                    if let Some(turn) = self.open_date_flow(DateSlot::End)? {
                        return Ok(turn);
                    }
                    self.state = BookingState::Budget;
                }
                BookingState::Budget => {
                    if self.details.budget.is_none() {
                        let flow = BudgetFlow::new();
                        let prompt = flow.prompt().to_string();
                        self.active = Some(ActiveFlow::Budget(flow));
                        return Ok(DialogTurn::Prompt(prompt));
                    }
                    self.state = BookingState::Confirm;
                }
                BookingState::Confirm => {
                    self.active = None;
                    return Ok(DialogTurn::Prompt(self.summary()));
                }
                BookingState::Done => return Err(DialogError::Ended),
            }
        }
    }

    /// Open a date flow when the slot is unset or holds an ambiguous
    /// expression. A malformed stored expression is a hard error.
    fn open_date_flow(&mut self, slot: DateSlot) -> Result<Option<DialogTurn>, DialogError> {
        let stored = match slot {
            DateSlot::Start => self.details.start_date.as_deref(),
            DateSlot::End => self.details.end_date.as_deref(),
        };

        let turn = match stored {
            None => {
                let flow = DateFlow::new(slot);
                let prompt = flow.prompt().to_string();
                self.active = Some(ActiveFlow::Date(flow));
                Some(DialogTurn::Prompt(prompt))
            }
            Some(timex) if is_ambiguous(timex)? => {
                // Pre-filled but not pinned to a day: re-ask with the
                // clarification wording rather than the opening question.
                self.active = Some(ActiveFlow::Date(DateFlow::new(slot)));
                Some(DialogTurn::Prompt(
                    crate::flows::date::REPROMPT_TEXT.to_string(),
                ))
            }
            Some(_) => None,
        };
        Ok(turn)
    }

    /// Feed one user turn to the dialog.
    pub async fn handle(&mut self, input: &str) -> Result<DialogTurn, DialogError> {
        if self.state == BookingState::Done {
            return Err(DialogError::Ended);
        }

        match interruption::detect(input) {
            Some(Interruption::Cancel) => {
                self.state = BookingState::Done;
                self.active = None;
                return Ok(DialogTurn::Ended {
                    message: CANCEL_TEXT.to_string(),
                    outcome: DialogOutcome::Cancelled,
                });
            }
            Some(Interruption::Help) => {
                // State untouched; the pending question stays pending.
                return Ok(DialogTurn::Prompt(HELP_TEXT.to_string()));
            }
            None => {}
        }

        if self.state == BookingState::Confirm {
            return self.handle_confirmation(input);
        }

        let turn = match self.active {
            Some(ActiveFlow::City(flow)) => flow.handle(input, self.recognizer.as_ref()).await?,
            Some(ActiveFlow::Date(flow)) => flow.handle(input, self.resolver.as_ref())?,
            Some(ActiveFlow::Budget(flow)) => flow.handle(input, self.recognizer.as_ref()).await?,
            None => return self.advance(),
        };

        match turn {
            FlowTurn::Prompt(prompt) => Ok(DialogTurn::Prompt(prompt)),
            FlowTurn::Done(value) => {
                self.commit(value);
                self.active = None;
                self.advance()
            }
        }
    }

    /// Write a resolved value into the slot the active flow was filling.
    fn commit(&mut self, value: String) {
        match self.active {
            Some(ActiveFlow::City(flow)) => match flow.slot() {
                CitySlot::Destination => self.details.destination = Some(value),
                CitySlot::Origin => self.details.origin = Some(value),
            },
            Some(ActiveFlow::Date(flow)) => match flow.slot() {
                DateSlot::Start => self.details.start_date = Some(value),
                DateSlot::End => self.details.end_date = Some(value),
            },
            Some(ActiveFlow::Budget(_)) => self.details.budget = Some(value),
            None => {}
        }
    }

    fn handle_confirmation(&mut self, input: &str) -> Result<DialogTurn, DialogError> {
        match input.trim().to_lowercase().as_str() {
            "yes" | "y" | "yep" | "sure" | "ok" | "okay" | "confirm" => {
                self.state = BookingState::Done;
                Ok(DialogTurn::Ended {
                    message: self.booked_message(),
                    outcome: DialogOutcome::Confirmed(self.details.clone()),
                })
            }
            "no" | "n" | "nope" => {
                self.record_not_confirmed();
                self.state = BookingState::Done;
                Ok(DialogTurn::Ended {
                    message: DECLINED_TEXT.to_string(),
                    outcome: DialogOutcome::Declined,
                })
            }
            _ => Ok(DialogTurn::Prompt(CONFIRM_RETRY_TEXT.to_string())),
        }
    }

    fn summary(&self) -> String {
        format!(
            "Please confirm, I have you traveling to: {} from: {} on date from: {} to: {} \
             with a budget of: {}.",
            self.details.destination.as_deref().unwrap_or_default(),
            self.details.origin.as_deref().unwrap_or_default(),
            self.details.start_date.as_deref().unwrap_or_default(),
            self.details.end_date.as_deref().unwrap_or_default(),
            self.details.budget.as_deref().unwrap_or_default(),
        )
    }

    fn booked_message(&self) -> String {
        format!(
            "I have you booked to {} from {}, departing {} and returning {}. \
             Have a great trip!",
            self.details.destination.as_deref().unwrap_or_default(),
            self.details.origin.as_deref().unwrap_or_default(),
            self.details.start_date.as_deref().unwrap_or_default(),
            self.details.end_date.as_deref().unwrap_or_default(),
        )
    }

    /// Diagnostic event for a declined summary. Carries every slot so the
    /// operator can see what the user walked away from.
    fn record_not_confirmed(&self) {
        let mut properties = HashMap::new();
        properties.insert(
            "initial_message".to_string(),
            self.details.initial_message.clone().unwrap_or_default(),
        );
        properties.insert(
            "destination".to_string(),
            self.details.destination.clone().unwrap_or_default(),
        );
        properties.insert(
            "origin".to_string(),
            self.details.origin.clone().unwrap_or_default(),
        );
        properties.insert(
            "start_date".to_string(),
            self.details.start_date.clone().unwrap_or_default(),
        );
        properties.insert(
            "end_date".to_string(),
            self.details.end_date.clone().unwrap_or_default(),
        );
        properties.insert(
            "budget".to_string(),
            self.details.budget.clone().unwrap_or_default(),
        );

        self.telemetry
            .track_trace(NOT_CONFIRMED_EVENT, properties, Severity::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::test_support::{ScriptedRecognizer, UnconfiguredRecognizer};
    use crate::resolver::ChronoDateResolver;
    use booking_agent_core::{BookingEntities, MemoryTelemetryClient};

    fn dialog_with(
        details: BookingRequest,
        telemetry: Arc<MemoryTelemetryClient>,
    ) -> BookingDialog {
        BookingDialog::new(
            details,
            Arc::new(UnconfiguredRecognizer),
            Arc::new(ChronoDateResolver),
            telemetry,
        )
    }

    fn prompt(turn: DialogTurn) -> String {
        match turn {
            DialogTurn::Prompt(p) => p,
            other => panic!("expected prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_full_confirmed_booking() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let mut dialog = dialog_with(BookingRequest::new(), telemetry.clone());

        let first = prompt(dialog.begin().unwrap());
        assert!(first.contains("To what city"));

        let p = prompt(dialog.handle("Roma").await.unwrap());
        assert!(p.contains("From what city"));

        let p = prompt(dialog.handle("Paris").await.unwrap());
        assert!(p.contains("like to travel"));

        let p = prompt(dialog.handle("august 18 2022").await.unwrap());
        assert!(p.contains("like to return"));

        let p = prompt(dialog.handle("2022-08-29").await.unwrap());
        assert_eq!(p, "What is your budget?");

        let p = prompt(dialog.handle("500 $").await.unwrap());
        assert!(p.contains("Please confirm"));
        assert!(p.contains("Roma"));
        assert!(p.contains("2022-08-18"));

        match dialog.handle("yes").await.unwrap() {
            DialogTurn::Ended {
                outcome: DialogOutcome::Confirmed(request),
                ..
            } => {
                assert_eq!(request.destination.as_deref(), Some("Roma"));
                assert_eq!(request.origin.as_deref(), Some("Paris"));
                assert_eq!(request.start_date.as_deref(), Some("2022-08-18"));
                assert_eq!(request.end_date.as_deref(), Some("2022-08-29"));
                assert_eq!(request.budget.as_deref(), Some("500 $"));
                assert!(request.is_complete());
            }
            other => panic!("expected confirmed end, got {other:?}"),
        }

        assert!(dialog.is_ended());
        assert!(telemetry.events().is_empty());
    }

    #[tokio::test]
    async fn test_declined_booking_records_one_event() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let details = BookingRequest::from_entities(
            "book me a flight",
            &BookingEntities {
                destination: Some("Roma".to_string()),
                origin: Some("Paris".to_string()),
                start_date: Some("2022-08-18".to_string()),
                end_date: Some("2022-08-29".to_string()),
                budget: Some("500 $".to_string()),
                ..Default::default()
            },
        );
        let mut dialog = dialog_with(details, telemetry.clone());

        // Every slot pre-filled and definite: straight to confirmation.
        let p = prompt(dialog.begin().unwrap());
        assert!(p.contains("Please confirm"));

        match dialog.handle("no").await.unwrap() {
            DialogTurn::Ended {
                outcome: DialogOutcome::Declined,
                message,
            } => assert!(message.contains("Sorry")),
            other => panic!("expected declined end, got {other:?}"),
        }

        let events = telemetry.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, NOT_CONFIRMED_EVENT);
        assert_eq!(events[0].severity, "ERROR");
        assert_eq!(events[0].properties["initial_message"], "book me a flight");
        assert_eq!(events[0].properties["destination"], "Roma");
        assert_eq!(events[0].properties["origin"], "Paris");
        assert_eq!(events[0].properties["start_date"], "2022-08-18");
        assert_eq!(events[0].properties["end_date"], "2022-08-29");
        assert_eq!(events[0].properties["budget"], "500 $");
    }

    #[tokio::test]
    async fn test_cancel_ends_without_event() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let mut dialog = dialog_with(BookingRequest::new(), telemetry.clone());

        dialog.begin().unwrap();
        dialog.handle("Roma").await.unwrap();

        match dialog.handle("cancel").await.unwrap() {
            DialogTurn::Ended {
                outcome: DialogOutcome::Cancelled,
                message,
            } => assert_eq!(message, CANCEL_TEXT),
            other => panic!("expected cancelled end, got {other:?}"),
        }

        assert!(dialog.is_ended());
        assert!(telemetry.events().is_empty());
        assert!(dialog.handle("Paris").await.is_err());
    }

    #[tokio::test]
    async fn test_help_preserves_state() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let mut dialog = dialog_with(BookingRequest::new(), telemetry);

        dialog.begin().unwrap();
        let p = prompt(dialog.handle("help").await.unwrap());
        assert_eq!(p, HELP_TEXT);
        assert_eq!(dialog.state(), BookingState::Destination);

        // The pending destination question still accepts an answer.
        let p = prompt(dialog.handle("Roma").await.unwrap());
        assert!(p.contains("From what city"));
        assert_eq!(dialog.details().destination.as_deref(), Some("Roma"));
    }

    #[tokio::test]
    async fn test_ambiguous_prefilled_date_is_reasked() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let details = BookingRequest::from_entities(
            "flight to Roma from Paris on august 18",
            &BookingEntities {
                destination: Some("Roma".to_string()),
                origin: Some("Paris".to_string()),
                start_date: Some("XXXX-08-18".to_string()),
                ..Default::default()
            },
        );
        let mut dialog = dialog_with(details, telemetry);

        let p = prompt(dialog.begin().unwrap());
        assert!(p.contains("day, month and year"));

        let p = prompt(dialog.handle("august 18 2022").await.unwrap());
        assert!(p.contains("like to return"));
        assert_eq!(dialog.details().start_date.as_deref(), Some("2022-08-18"));
    }

    #[tokio::test]
    async fn test_malformed_prefilled_date_is_an_error() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let details = BookingRequest {
            destination: Some("Roma".to_string()),
            origin: Some("Paris".to_string()),
            start_date: Some("whenever works".to_string()),
            ..Default::default()
        };
        let mut dialog = dialog_with(details, telemetry);

        assert!(matches!(dialog.begin(), Err(DialogError::Timex(_))));
    }

    #[tokio::test]
    async fn test_confirmation_retries_on_unclear_answer() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let details = BookingRequest {
            destination: Some("Roma".to_string()),
            origin: Some("Paris".to_string()),
            start_date: Some("2022-08-18".to_string()),
            end_date: Some("2022-08-29".to_string()),
            budget: Some("500 $".to_string()),
            ..Default::default()
        };
        let mut dialog = dialog_with(details, telemetry.clone());

        dialog.begin().unwrap();
        let p = prompt(dialog.handle("maybe").await.unwrap());
        assert_eq!(p, CONFIRM_RETRY_TEXT);

        // Still at confirmation, still answerable.
        match dialog.handle("yes").await.unwrap() {
            DialogTurn::Ended {
                outcome: DialogOutcome::Confirmed(_),
                ..
            } => {}
            other => panic!("expected confirmed end, got {other:?}"),
        }
        assert!(telemetry.events().is_empty());
    }

    #[tokio::test]
    async fn test_nlu_resolves_multi_word_city() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let recognizer = ScriptedRecognizer::with_entities(BookingEntities {
            destination: Some("New York".to_string()),
            ..Default::default()
        });
        let mut dialog = BookingDialog::new(
            BookingRequest::new(),
            Arc::new(recognizer),
            Arc::new(ChronoDateResolver),
            telemetry,
        );

        dialog.begin().unwrap();
        let p = prompt(dialog.handle("the big apple please").await.unwrap());
        assert!(p.contains("From what city"));
        assert_eq!(dialog.details().destination.as_deref(), Some("New York"));
    }

    #[tokio::test]
    async fn test_budget_retry_then_accept() {
        let telemetry = Arc::new(MemoryTelemetryClient::new());
        let details = BookingRequest {
            destination: Some("Roma".to_string()),
            origin: Some("Paris".to_string()),
            start_date: Some("2022-08-18".to_string()),
            end_date: Some("2022-08-29".to_string()),
            ..Default::default()
        };
        let mut dialog = dialog_with(details, telemetry);

        let p = prompt(dialog.begin().unwrap());
        assert_eq!(p, "What is your budget?");

        let p = prompt(dialog.handle("$").await.unwrap());
        assert!(p.contains("amount with an optional currency"));

        let p = prompt(dialog.handle("500 dollars").await.unwrap());
        assert!(p.contains("Please confirm"));
        assert_eq!(dialog.details().budget.as_deref(), Some("500 dollars"));
    }
}
