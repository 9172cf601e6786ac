//! Temporal expressions (timex)
//!
//! Dates travel through the dialog as timex strings ("2022-08-18",
//! "XXXX-08-18", "(2022-08-18,2022-08-29,P11D)", "P11D", ...). The dialog
//! only ever asks one question of them: does the expression pin down a
//! single calendar date, i.e. does its label set contain `Definite`?

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from timex parsing. Unparseable expressions are fatal for the
/// current turn; callers do not recover locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimexError {
    #[error("empty temporal expression")]
    Empty,

    #[error("unrecognized temporal expression: {0}")]
    UnrecognizedFormat(String),
}

/// Category labels a timex expression can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimexLabel {
    /// A calendar date (possibly partial, e.g. "XXXX-08-18")
    Date,
    /// A time of day component is present
    Time,
    /// A date range
    DateRange,
    /// A duration ("P11D")
    Duration,
    /// Reference to the present moment
    Present,
    /// Fully resolved: concrete year, month and day
    Definite,
}

// Date token: year or XXXX, month or XX, optional day or XX.
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}|XXXX)-(\d{2}|XX)(?:-(\d{2}|XX))?$").unwrap());

// ISO week token, e.g. "XXXX-WXX-3" (next Wednesday) or "2022-W33".
static WEEK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}|XXXX)-W(\d{2}|XX)(?:-(\d|WE))?$").unwrap());

// Duration token, e.g. "P11D", "PT2H", "P1M".
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^P(T?\d+(\.\d+)?[YMWDHS])+$").unwrap());

/// A parsed temporal expression: the raw timex text plus its labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimexExpression {
    raw: String,
    labels: HashSet<TimexLabel>,
}

impl TimexExpression {
    /// Parse a timex string into its category labels.
    pub fn parse(raw: &str) -> Result<Self, TimexError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimexError::Empty);
        }

        let mut labels = HashSet::new();

        if trimmed == "PRESENT_REF" {
            labels.insert(TimexLabel::Present);
            return Ok(Self { raw: trimmed.to_string(), labels });
        }

        // Range form: (start,end,duration)
        if let Some(inner) = trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(TimexError::UnrecognizedFormat(raw.to_string()));
            }
            let start = Self::parse(parts[0])?;
            let end = Self::parse(parts[1])?;
            if !DURATION_RE.is_match(parts[2]) {
                return Err(TimexError::UnrecognizedFormat(raw.to_string()));
            }
            labels.insert(TimexLabel::DateRange);
            if start.is_definite() && end.is_definite() {
                labels.insert(TimexLabel::Definite);
            }
            return Ok(Self { raw: trimmed.to_string(), labels });
        }

        if DURATION_RE.is_match(trimmed) {
            labels.insert(TimexLabel::Duration);
            return Ok(Self { raw: trimmed.to_string(), labels });
        }

        // Optional time-of-day component after 'T'
        let (date_part, time_part) = match trimmed.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (trimmed, None),
        };

        if let Some(captures) = DATE_RE.captures(date_part) {
            labels.insert(TimexLabel::Date);
            let concrete = captures
                .iter()
                .skip(1)
                .flatten()
                .all(|m| !m.as_str().contains('X'));
            // Definite needs the day present as well as everything concrete
            if concrete && captures.get(3).is_some() {
                labels.insert(TimexLabel::Definite);
            }
        } else if WEEK_RE.is_match(date_part) {
            labels.insert(TimexLabel::Date);
        } else {
            return Err(TimexError::UnrecognizedFormat(raw.to_string()));
        }

        if time_part.is_some() {
            labels.insert(TimexLabel::Time);
        }

        Ok(Self { raw: trimmed.to_string(), labels })
    }

    /// The raw timex text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The category labels.
    pub fn labels(&self) -> &HashSet<TimexLabel> {
        &self.labels
    }

    /// Does this expression denote one concrete calendar date (or range of
    /// concrete dates)?
    pub fn is_definite(&self) -> bool {
        self.labels.contains(&TimexLabel::Definite)
    }
}

impl fmt::Display for TimexExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
