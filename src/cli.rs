use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use crate::error::{CheckError, Result};
use crate::types::{CoverageMode, Verdict};

mod run_impl;

pub use run_impl::{check, run_with_args};

pub const ONLY_PERCENTAGE_FLAG: &str = "--only-percentage";
pub const COVERAGE_BY_LINES_FLAG: &str = "--coverage-by-lines";
pub const JSON_FLAG: &str = "--json";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "coverage-check",
    version,
    about = "Fail the build when Clover coverage drops below a threshold",
    long_about = None
)]
pub struct Args {
    /// Clover XML coverage report
    #[arg(value_name = "REPORT", value_hint = ValueHint::FilePath)]
    pub report: Option<PathBuf>,

    /// Minimum accepted coverage percentage (clamped to 0..=100)
    #[arg(value_name = "THRESHOLD", allow_negative_numbers = true)]
    pub threshold: Option<String>,

    /// Only aggregate these file entries (exact `name` match)
    #[arg(value_name = "FILE", allow_hyphen_values = true)]
    pub files: Vec<String>,

    /// Print only the percentage
    #[arg(long = "only-percentage", action = ArgAction::SetTrue)]
    pub only_percentage: bool,

    /// Compute coverage from statements only
    #[arg(long = "coverage-by-lines", action = ArgAction::SetTrue)]
    pub coverage_by_lines: bool,

    /// Print a JSON summary instead of the text line
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Verbose diagnostics on stderr
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

/// A validated command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub report: PathBuf,
    pub threshold: f64,
    pub file_filter: Vec<String>,
    pub only_percentage: bool,
    pub mode: CoverageMode,
    pub json: bool,
    pub verbose: u8,
}

impl Invocation {
    /// Validates parsed arguments.
    ///
    /// Flag tokens that ended up among the positional file names are pulled
    /// out again, so `--only-percentage` works wherever it appears.
    ///
    /// # Errors
    /// Returns [`CheckError::InvalidInputFile`] when the report is missing or
    /// not a file and [`CheckError::MissingThreshold`] when no threshold was
    /// given.
    pub fn from_args(args: Args) -> Result<Self> {
        let report = match args.report {
            Some(path) if path.is_file() => path,
            other => {
                return Err(CheckError::InvalidInputFile {
                    path: other.map(|p| p.display().to_string()).unwrap_or_default(),
                });
            }
        };

        let raw = args.threshold.ok_or(CheckError::MissingThreshold)?;
        let threshold = parse_threshold(&raw);

        let mut only_percentage = args.only_percentage;
        let mut by_lines = args.coverage_by_lines;
        let mut json = args.json;
        let mut file_filter = Vec::with_capacity(args.files.len());
        for token in args.files {
            match token.as_str() {
                ONLY_PERCENTAGE_FLAG => only_percentage = true,
                COVERAGE_BY_LINES_FLAG => by_lines = true,
                JSON_FLAG => json = true,
                _ => file_filter.push(token),
            }
        }

        Ok(Self {
            report,
            threshold,
            file_filter,
            only_percentage,
            mode: if by_lines {
                CoverageMode::Lines
            } else {
                CoverageMode::Blended
            },
            json,
            verbose: args.verbose,
        })
    }
}

/// Reads a threshold and clamps it into `0..=100`.
///
/// Only the leading decimal number counts (`"80%"` is 80); input without
/// one reads as 0.
pub fn parse_threshold(raw: &str) -> f64 {
    let s = raw.trim_start();
    let len = numeric_prefix_len(s.as_bytes());
    s[..len].parse::<f64>().unwrap_or(0.0).clamp(0.0, 100.0)
}

/// Length of the longest `[+-]digits[.digits][(e|E)[+-]digits]` prefix.
fn numeric_prefix_len(b: &[u8]) -> usize {
    let digits = |from: usize| b[from..].iter().take_while(|c| c.is_ascii_digit()).count();

    let mut i = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let int_digits = digits(i);
    i += int_digits;
    let mut frac_digits = 0;
    if b.get(i) == Some(&b'.') {
        frac_digits = digits(i + 1);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(b.get(i + 1), Some(b'+' | b'-')));
        let exp_digits = digits(i + 1 + sign);
        if exp_digits > 0 {
            i += 1 + sign + exp_digits;
        }
    }
    i
}

/// Runs the CLI application against an explicit argument list.
///
/// Prints the single result line and returns the verdict; error messages are
/// left to the caller. `--help` and `--version` print their text and pass.
///
/// # Errors
/// Returns an error if the command line is invalid or the check cannot
/// produce a percentage.
pub fn run_from<I, T>(argv: I) -> Result<Verdict>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => {
            print!("{}", err.render());
            return Ok(Verdict::Passed);
        }
        Err(err) => return Err(err.into()),
    };
    let invocation = Invocation::from_args(args)?;
    run_with_args(&invocation)
}

/// Runs the CLI application.
///
/// # Errors
/// Returns an error if command execution fails.
pub fn run() -> Result<Verdict> {
    run_from(std::env::args_os())
}
