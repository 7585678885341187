//! Block reader failures.

use std::io;

use thiserror::Error;

use crate::logging::DiagnosticsError;
use crate::schema::SchemaError;

/// A row-local structural failure: logged, the row is skipped and the
/// file continues.
#[derive(Debug, Clone, Error)]
#[error("Row number {row_number} (file={file_name}) is invalid (error={detail}).")]
pub struct RowFailure {
    pub row_number: u64,
    pub file_name: String,
    pub detail: String,
}

/// A failure that ends the block stream.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A row arrived before any schema was resolved.
    #[error(
        "No row schema is available for {file}. The file must begin with a HEAD record or a \
         compiled schema must be supplied."
    )]
    SchemaUnresolved { file: String },

    /// A fail-fast logger turned a row-local error into an abort.
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticsError),
}
