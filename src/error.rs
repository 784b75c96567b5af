use thiserror::Error;

/// Every way a coverage check can stop short of a verdict.
///
/// Each variant renders as the single line printed before exiting with
/// status 1.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid input file {path} provided.")]
    InvalidInputFile { path: String },

    #[error("An integer checked percentage must be given as second parameter.")]
    MissingThreshold,

    #[error("Unable to read coverage report: {0:#}")]
    ReadReport(#[source] anyhow::Error),

    #[error(
        "The following file names were not found in the coverage report: {}",
        .0.join(", ")
    )]
    FileFilterNotFound(Vec<String>),

    #[error("Malformed coverage report: {0}")]
    MalformedReport(#[from] roxmltree::Error),

    #[error("Malformed coverage report: content is not valid {encoding}")]
    Undecodable { encoding: String },

    #[error("Insufficient data for calculation. Please add more code.")]
    InsufficientData,

    #[error("Unable to render JSON summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{}", .0.to_string().trim_end())]
    Usage(#[from] clap::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;
