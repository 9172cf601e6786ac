//! Budget answer classification
//!
//! Decides whether a free-text budget answer is already an unambiguous
//! "amount + currency" pair or needs NLU disambiguation. Accepted shapes:
//! "100", "$100", "100$", "€100", "100€", "100 dollars", "euros 100".
//!
//! Two layers guard the budget slot:
//! - `validate` is the prompt-level gate: answers longer than two tokens
//!   are let through for NLU to untangle, shorter answers must classify
//!   as well-formed or the prompt retries.
//! - `classify` is the classifier itself, also used on its own.

/// Outcome of classifying a budget answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetFormat {
    /// A bare amount, or an amount plus exactly one currency marker
    WellFormed,
    /// Anything else; defer to NLU if available
    NeedsDisambiguation,
}

/// Classify a raw budget answer.
pub fn classify(text: &str) -> BudgetFormat {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    // Too free-form to parse directly.
    if tokens.len() > 2 {
        return BudgetFormat::NeedsDisambiguation;
    }

    let mut number = 0usize;
    let mut alpha = 0usize;
    let mut symbol = 0usize;
    let mut elements = tokens.len();

    for token in &tokens {
        if is_numeric(token) {
            number += 1;
        }
        if is_alphabetic(token) {
            alpha += 1;
        }
        if *token == "€" || *token == "$" {
            // Bare symbol: one currency marker, no extra logical element.
            // With no number alongside it the counts never add up, so a
            // lone "$" answer falls through to NeedsDisambiguation.
            symbol += 1;
        } else {
            // Affixed symbol: symbol+number glued together counts as two
            // logical elements. The two checks are independent; a token
            // wrapped in symbols ("$100$") trips both and is rejected.
            if let Some(rest) = strip_leading_symbol(token) {
                symbol += 1;
                elements += 1;
                if is_alphabetic(rest) {
                    alpha += 1;
                }
                if is_numeric(rest) {
                    number += 1;
                }
            }
            if let Some(rest) = strip_trailing_symbol(token) {
                symbol += 1;
                elements += 1;
                if is_alphabetic(rest) {
                    alpha += 1;
                }
                if is_numeric(rest) {
                    number += 1;
                }
            }
        }
    }

    let devise = alpha == 1 || symbol == 1;

    let well_formed = (elements == 1 && number == 1)
        || (elements == 2 && number == 1 && devise);

    if well_formed {
        BudgetFormat::WellFormed
    } else {
        BudgetFormat::NeedsDisambiguation
    }
}

/// Prompt-level format gate for the budget question.
///
/// Answers with more than two tokens pass so the budget flow can hand
/// them to NLU; everything else must classify as well-formed.
pub fn validate(text: &str) -> bool {
    if text.split_whitespace().count() > 2 {
        return true;
    }
    classify(text) == BudgetFormat::WellFormed
}

// Digits with at most one decimal separator, comma accepted for the dot:
// first ',' becomes '.', first '.' is dropped, rest must be digits.
fn is_numeric(token: &str) -> bool {
    let normalized = token.replacen(',', ".", 1);
    let stripped = normalized.replacen('.', "", 1);
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

fn strip_leading_symbol(token: &str) -> Option<&str> {
    token.strip_prefix('€').or_else(|| token.strip_prefix('$'))
}

fn strip_trailing_symbol(token: &str) -> Option<&str> {
    token.strip_suffix('€').or_else(|| token.strip_suffix('$'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_amount() {
        assert_eq!(classify("100"), BudgetFormat::WellFormed);
        assert_eq!(classify("1500"), BudgetFormat::WellFormed);
        assert_eq!(classify("99.50"), BudgetFormat::WellFormed);
        assert_eq!(classify("99,50"), BudgetFormat::WellFormed);
    }

    #[test]
    fn test_amount_with_currency_word() {
        assert_eq!(classify("100 dollars"), BudgetFormat::WellFormed);
        assert_eq!(classify("euros 100"), BudgetFormat::WellFormed);
        assert_eq!(classify("100 pounds"), BudgetFormat::WellFormed);
    }

    #[test]
    fn test_amount_with_separate_symbol() {
        assert_eq!(classify("100 $"), BudgetFormat::WellFormed);
        assert_eq!(classify("€ 100"), BudgetFormat::WellFormed);
    }

    #[test]
    fn test_symbol_affixed() {
        assert_eq!(classify("$100"), BudgetFormat::WellFormed);
        assert_eq!(classify("100$"), BudgetFormat::WellFormed);
        assert_eq!(classify("€100"), BudgetFormat::WellFormed);
        assert_eq!(classify("100€"), BudgetFormat::WellFormed);
    }

    #[test]
    fn test_more_than_two_tokens() {
        assert_eq!(classify("100 US dollars"), BudgetFormat::NeedsDisambiguation);
        assert_eq!(
            classify("around five hundred dollars"),
            BudgetFormat::NeedsDisambiguation
        );
    }

    #[test]
    fn test_gibberish() {
        assert_eq!(classify("ljflgjldfk"), BudgetFormat::NeedsDisambiguation);
    }

    #[test]
    fn test_bare_symbol_needs_disambiguation() {
        // A lone symbol has no amount, so the counts never add up.
        assert_eq!(classify("$"), BudgetFormat::NeedsDisambiguation);
        assert_eq!(classify("€"), BudgetFormat::NeedsDisambiguation);
    }

    #[test]
    fn test_two_numbers() {
        assert_eq!(classify("100 200"), BudgetFormat::NeedsDisambiguation);
    }

    #[test]
    fn test_two_currency_markers() {
        assert_eq!(classify("$ dollars"), BudgetFormat::NeedsDisambiguation);
        assert_eq!(classify("$100$"), BudgetFormat::NeedsDisambiguation);
    }

    #[test]
    fn test_validate_passes_long_answers_through() {
        // Prompt-level gate: >2 tokens are deferred to NLU, not rejected.
        assert!(validate("100 US dollars"));
        assert!(validate("my budget is about 500 dollars"));
    }

    #[test]
    fn test_validate_rejects_short_malformed_answers() {
        assert!(!validate("ljflgjldfk"));
        assert!(!validate("$"));
        assert!(validate("100"));
        assert!(validate("100 $"));
    }

    #[test]
    fn test_classify_is_idempotent() {
        assert_eq!(classify("500 $"), classify("500 $"));
        assert_eq!(classify("nonsense input here"), classify("nonsense input here"));
    }
}
