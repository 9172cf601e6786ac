//! Natural-language date resolution
//!
//! Turns a user's date answer into a timex expression. The trait stands in
//! for the framework date prompt the original system leaned on; the
//! default implementation covers the formats the booking flow actually
//! sees. `None` means "no date found" and the prompt retries; it is not
//! an error.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use booking_agent_core::TimexExpression;

/// Resolves free text to a temporal expression.
pub trait DateResolver: Send + Sync {
    /// Resolve an utterance to a timex expression, or `None` when no date
    /// can be found in it.
    fn resolve(&self, utterance: &str) -> Option<TimexExpression>;
}

// "august 18 2022", "august 18, 2022", "august 18"
static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^
            (january|february|march|april|may|june|july|august
             |september|october|november|december)
            \s+(\d{1,2})
            (?:,?\s+(\d{4}))?
        $",
    )
    .unwrap()
});

// "18/08/2022" (day first)
static SLASH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());

/// Chrono-backed resolver for canonical and common verbose date formats.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChronoDateResolver;

impl ChronoDateResolver {
    pub fn new() -> Self {
        Self
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn from_parts(year: i32, month: u32, day: u32) -> Option<TimexExpression> {
        // Validates the calendar date before emitting a timex.
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        TimexExpression::parse(&format!("{date}")).ok()
    }
}

impl DateResolver for ChronoDateResolver {
    fn resolve(&self, utterance: &str) -> Option<TimexExpression> {
        let text = utterance.trim();
        if text.is_empty() {
            return None;
        }

        // Already a timex (or a plain ISO date, which is valid timex).
        if let Ok(timex) = TimexExpression::parse(text) {
            return Some(timex);
        }

        let lowered = text.to_lowercase();

        match lowered.as_str() {
            "today" => {
                let today = Self::today();
                return Self::from_parts(today.year(), today.month(), today.day());
            }
            "tomorrow" => {
                let tomorrow = Self::today() + Duration::days(1);
                return Self::from_parts(tomorrow.year(), tomorrow.month(), tomorrow.day());
            }
            _ => {}
        }

        if let Some(captures) = MONTH_DAY_RE.captures(&lowered) {
            let month = month_number(&captures[1])?;
            let day: u32 = captures[2].parse().ok()?;
            return match captures.get(3) {
                Some(year) => Self::from_parts(year.as_str().parse().ok()?, month, day),
                // No year: a partial timex, deliberately not definite.
                None => TimexExpression::parse(&format!("XXXX-{month:02}-{day:02}")).ok(),
            };
        }

        if let Some(captures) = SLASH_DATE_RE.captures(&lowered) {
            let day: u32 = captures[1].parse().ok()?;
            let month: u32 = captures[2].parse().ok()?;
            let year: i32 = captures[3].parse().ok()?;
            return Self::from_parts(year, month, day);
        }

        None
    }
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(month)
}
