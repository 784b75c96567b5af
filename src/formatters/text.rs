use crate::types::{CheckSummary, Verdict};

/// Formats a percentage the way every output line shows it, e.g. `81.82 %`.
pub fn format_percentage(p: f64) -> String {
    format!("{p:.2} %")
}

/// Renders the single result line for a finished check.
pub fn format(summary: &CheckSummary, only_percentage: bool) -> String {
    let pct = format_percentage(summary.percentage);
    if only_percentage {
        return pct;
    }
    match summary.verdict {
        Verdict::BelowThreshold => format!(
            "Total code coverage is {pct} which is below the accepted {}%",
            summary.threshold
        ),
        Verdict::Passed => format!("Total code coverage is {pct} - OK!"),
    }
}
