pub mod cli;
pub mod coverage;
pub mod error;
pub mod formatters;
pub mod report;
pub mod types;
