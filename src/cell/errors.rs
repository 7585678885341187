//! Cell validation failures.

use std::fmt;

use thiserror::Error;

/// Where a failing cell was found. Block number is absent for header and
/// footer rows.
#[derive(Debug, Clone)]
pub struct CellLocation {
    pub row_number: u64,
    pub file_name: String,
    pub block_number: Option<u64>,
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(block) = self.block_number {
            write!(f, "Block: {}, ", block)?;
        }
        write!(f, "Row: {}, file={}", self.row_number, self.file_name)
    }
}

/// A row-local validation failure for one cell. Logged by the caller and
/// never propagated; the offending cell is omitted from its row.
#[derive(Debug, Clone, Error)]
pub enum CellFailure {
    #[error("Cell \"{cell_name}\" contains invalid value \"{value}\". Value was expected to be {expected}. [{location}].")]
    InvalidValue {
        cell_name: String,
        value: String,
        expected: String,
        location: CellLocation,
    },

    #[error("Cell \"{cell_name}\" contained a non-utf8 value. Error detail: \"{detail}\". [{location}].")]
    BadEncoding {
        cell_name: String,
        detail: String,
        location: CellLocation,
    },

    #[error("Cell \"{cell_name}\" is required. Value was expected to be {expected}. [{location}].")]
    RequiredMissing {
        cell_name: String,
        expected: String,
        location: CellLocation,
    },
}
