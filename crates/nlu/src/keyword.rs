//! Offline keyword recognizer
//!
//! Compiled-once regex extraction for local development and tests, where
//! no LUIS endpoint is available. Coverage is intentionally narrow: the
//! phrasings the booking model is trained on ("travel from X to Y",
//! "budget of 500$", month-name dates).

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use booking_agent_core::{
    BookingEntities, BookingIntent, Recognizer, RecognizerResult, Result,
};

// Cities are required to be capitalized so "I want to travel to London"
// does not capture "travel".
static ORIGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:from|From|leaving)\s+([A-Z][A-Za-z-]*)").unwrap());

static DESTINATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:to|To|toward|towards)\s+([A-Z][A-Za-z-]*)").unwrap());

static MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

static BUDGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(\$|€|dollars?|euros?|pounds?)").unwrap()
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)\b(
            (?:january|february|march|april|may|june|july|august
              |september|october|november|december)
            \s+\d{1,2}(?:\s+\d{4})?
        )\b",
    )
    .unwrap()
});

static BOOK_KEYWORDS: &[&str] = &["book", "travel", "flight", "trip", "fly", "go"];
static CANCEL_KEYWORDS: &[&str] = &["cancel", "quit", "stop", "abort"];

/// Regex-backed recognizer usable without network access.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordRecognizer;

impl KeywordRecognizer {
    pub fn new() -> Self {
        Self
    }

    fn detect_intent(text: &str) -> (BookingIntent, f32) {
        if CANCEL_KEYWORDS.iter().any(|k| text.contains(k)) {
            return (BookingIntent::Cancel, 0.9);
        }
        if BOOK_KEYWORDS.iter().any(|k| text.contains(k)) {
            return (BookingIntent::Book, 0.8);
        }
        (BookingIntent::None, 0.0)
    }

    fn extract_entities(utterance: &str) -> BookingEntities {
        let mut entities = BookingEntities::default();

        // "from X" also matches "from August 18" date ranges; month names
        // are skipped so the first real city wins.
        entities.origin = first_city(&ORIGIN_RE, utterance);
        entities.destination = first_city(&DESTINATION_RE, utterance);

        if let Some(captures) = BUDGET_RE.captures(utterance) {
            let amount = captures[1].to_string();
            let currency = captures[2].to_string();
            entities.budget = Some(format!("{amount} {currency}"));
        }

        let mut dates = DATE_RE.find_iter(utterance).map(|m| m.as_str().to_lowercase());
        entities.start_date = dates.next();
        entities.end_date = dates.next();

        entities
    }
}

#[async_trait]
impl Recognizer for KeywordRecognizer {
    fn is_configured(&self) -> bool {
        true
    }

    async fn recognize(&self, utterance: &str) -> Result<RecognizerResult> {
        let lowered = utterance.to_lowercase();
        let (intent, score) = Self::detect_intent(&lowered);
        let entities = Self::extract_entities(utterance);

        Ok(RecognizerResult { intent, score, entities })
    }
}

fn first_city(pattern: &Regex, utterance: &str) -> Option<String> {
    pattern
        .captures_iter(utterance)
        .map(|c| c[1].to_string())
        .find(|word| !MONTHS.contains(&word.to_lowercase().as_str()))
}
