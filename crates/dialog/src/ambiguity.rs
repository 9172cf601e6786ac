//! Date ambiguity checking
//!
//! A slot value is usable only when its temporal expression pins down a
//! concrete calendar date. Parse failures are fatal for the turn and
//! propagate unchanged.

use booking_agent_core::{TimexError, TimexExpression};

/// True when the expression does not denote a single definite date.
pub fn is_ambiguous(timex: &str) -> Result<bool, TimexError> {
    Ok(!TimexExpression::parse(timex)?.is_definite())
}
