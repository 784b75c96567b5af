use crate::error::Result;
use crate::types::CheckSummary;

/// Single-line JSON rendering, so stdout still carries exactly one line.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn format(summary: &CheckSummary) -> Result<String> {
    Ok(serde_json::to_string(summary)?)
}
