//! Report-level failures.

use std::io;

use thiserror::Error;

use crate::conformance::ConformanceFailure;
use crate::logging::DiagnosticsError;
use crate::reader::ReadError;
use crate::schema::SchemaError;

/// Result type for report-level operations.
pub type ReportResult<T> = Result<T, ReportFailure>;

#[derive(Debug, Error)]
pub enum ReportFailure {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Read(#[from] ReadError),

    /// Errors were logged during the run, or a fail-fast logger aborted.
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticsError),

    #[error(transparent)]
    Conformance(#[from] ConformanceFailure),

    /// Body block numbers must be unique across the whole report.
    #[error(
        "The block number {number} is not unique. It appears in files number: {first_file} \
         and {second_file}."
    )]
    DuplicateBlockNumber { number: u64, first_file: u64, second_file: u64 },

    /// Writing to the output sink or opening the log file failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(
        "The profile {requested} does not exist in the schema document. Valid profiles: \
         {available:?}."
    )]
    UnknownProfile { requested: String, available: Vec<String> },
}
