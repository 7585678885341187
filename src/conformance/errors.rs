//! Block conformance failures.

use thiserror::Error;

/// A body block whose row sequence is not generated by the profile's
/// content model. Carries the full structural context; whether the run
/// aborts or continues with the next block is the caller's decision.
#[derive(Debug, Clone, Error)]
#[error(
    "Block {block_number} in file number {file_number} is non-conformant at row {row_number}.\n\
     Expected structure:\n{expected}\n\
     Actual structure:\n{actual:?}"
)]
pub struct ConformanceFailure {
    pub block_number: u64,
    pub file_number: u64,
    /// Line number of the first row the grammar could not consume.
    pub row_number: u64,
    /// The rendered content model.
    pub expected: String,
    /// The block's actual row-type sequence.
    pub actual: Vec<String>,
}
