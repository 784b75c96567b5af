use indexmap::IndexMap;

use crate::error::Result;
use crate::types::{CheckSummary, MetricCounts, Verdict};
use crate::{coverage, formatters, report};

use super::Invocation;

/// Loads, aggregates and evaluates the report named by `inv`.
///
/// # Errors
/// Returns an error if the report cannot be read or parsed, a filtered file
/// is missing, or there is nothing to compute a percentage from.
pub fn check(inv: &Invocation) -> Result<CheckSummary> {
    if inv.verbose > 0 {
        eprintln!("Reading coverage report: {}", inv.report.display());
        if !inv.file_filter.is_empty() {
            eprintln!("File filter: {}", inv.file_filter.join(", "));
        }
    }
    let xml = report::read_report(&inv.report)?;
    let records = report::load_metrics(&xml, &inv.file_filter)?;
    if inv.verbose > 0 {
        eprintln!(
            "Selected {} metrics node(s), mode: {:?}",
            records.len(),
            inv.mode
        );
    }

    let totals = MetricCounts::sum(&records);
    if inv.verbose > 1 {
        eprintln!(
            "Totals: statements={}/{}, methods={}/{}, conditionals={}/{}",
            totals.coveredstatements,
            totals.statements,
            totals.coveredmethods,
            totals.methods,
            totals.coveredconditionals,
            totals.conditionals
        );
        for (name, pct) in coverage::breakdown(&totals) {
            match pct {
                Some(p) => eprintln!("  {name}: {}", formatters::text::format_percentage(p)),
                None => eprintln!("  {name}: n/a"),
            }
        }
    }

    let percentage = coverage::percentage(&totals, inv.mode)?;
    let verdict = coverage::judge(percentage, inv.threshold);

    // Filter names may repeat; the map keeps the first position.
    let files: IndexMap<String, MetricCounts> = inv
        .file_filter
        .iter()
        .cloned()
        .zip(records)
        .collect();

    Ok(CheckSummary {
        percentage,
        threshold: inv.threshold,
        verdict,
        mode: inv.mode,
        totals,
        files,
    })
}

/// Runs the check and prints its single output line.
///
/// # Errors
/// Propagates any error from [`check`] or from JSON rendering.
pub fn run_with_args(inv: &Invocation) -> Result<Verdict> {
    let summary = check(inv)?;
    let line = if inv.json {
        formatters::json::format(&summary)?
    } else {
        formatters::text::format(&summary, inv.only_percentage)
    };
    println!("{line}");
    Ok(summary.verdict)
}
