use crate::error::{CheckError, Result};
use crate::types::{CoverageMode, MetricCounts, Verdict};

/// Covered and total element counts that feed the percentage for `mode`.
///
/// Sums saturate at `u64::MAX`, so a total never wraps to zero.
pub fn covered_and_total(totals: &MetricCounts, mode: CoverageMode) -> (u64, u64) {
    let mut covered = totals.coveredstatements;
    let mut total = totals.statements;
    if mode == CoverageMode::Blended {
        covered = covered
            .saturating_add(totals.coveredmethods)
            .saturating_add(totals.coveredconditionals);
        total = total
            .saturating_add(totals.methods)
            .saturating_add(totals.conditionals);
    }
    (covered, total)
}

/// Computes the coverage percentage of the aggregated counters.
///
/// # Errors
/// Returns [`CheckError::InsufficientData`] when there is nothing to divide by.
#[allow(clippy::cast_precision_loss)]
pub fn percentage(totals: &MetricCounts, mode: CoverageMode) -> Result<f64> {
    let (covered, total) = covered_and_total(totals, mode);
    if total == 0 {
        return Err(CheckError::InsufficientData);
    }
    Ok(covered as f64 / total as f64 * 100.0)
}

pub fn judge(percentage: f64, threshold: f64) -> Verdict {
    if percentage < threshold {
        Verdict::BelowThreshold
    } else {
        Verdict::Passed
    }
}

/// Per-dimension percentages for diagnostics; `None` where a dimension is empty.
#[allow(clippy::cast_precision_loss)]
pub fn breakdown(totals: &MetricCounts) -> [(&'static str, Option<f64>); 3] {
    let ratio = |covered: u64, total: u64| {
        (total > 0).then(|| covered as f64 / total as f64 * 100.0)
    };
    [
        ("statements", ratio(totals.coveredstatements, totals.statements)),
        ("methods", ratio(totals.coveredmethods, totals.methods)),
        ("conditionals", ratio(totals.coveredconditionals, totals.conditionals)),
    ]
}
