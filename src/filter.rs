//! Attachment-name eligibility filters.
//!
//! A skipped name is a deliberate silent success ("nothing to do"), not a
//! failure: the decision is returned up the pipeline and only the top
//! level turns it into exit code 0.

use regex::Regex;

use crate::error::{MailpostError, Result};

/// Outcome of the name filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The name is eligible; the pipeline continues.
    Proceed,
    /// The run has nothing to do. Carries the reason for logging.
    Skip(String),
}

/// Evaluate `match_name` then `skip_name` against the attachment name.
///
/// An empty name disables filtering entirely. An empty pattern means "no
/// constraint". A pattern that fails to compile is a fatal configuration
/// error, never a skip.
pub fn evaluate(name: &str, match_name: &str, skip_name: &str) -> Result<Decision> {
    if name.is_empty() {
        return Ok(Decision::Proceed);
    }

    if !match_name.is_empty() {
        let re = compile("match_name", match_name)?;
        if !re.is_match(name) {
            return Ok(Decision::Skip(format!(
                "name '{name}' does not match match_name '{match_name}'"
            )));
        }
    }

    if !skip_name.is_empty() {
        let re = compile("skip_name", skip_name)?;
        if re.is_match(name) {
            return Ok(Decision::Skip(format!(
                "name '{name}' matches skip_name '{skip_name}'"
            )));
        }
    }

    Ok(Decision::Proceed)
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| MailpostError::BadPattern {
        field,
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
