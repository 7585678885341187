//! Schema compilation failures.
//!
//! Compilation failures are always fatal: a partial schema is never
//! usable.

use std::io;

use thiserror::Error;

use crate::logging::DiagnosticsError;

/// Result type for schema compilation.
pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// A structurally invalid or inconsistent schema document.
    #[error("Unexpected error while parsing the schema document {file} (error = {detail}).")]
    Parse { file: String, detail: String },

    #[error("Failed to read the schema document {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed XML in the schema document {file}: {source}")]
    Xml {
        file: String,
        #[source]
        source: roxmltree::Error,
    },

    /// Errors were logged while compiling row declarations, or a fail-fast
    /// logger aborted the compile.
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticsError),
}

impl SchemaError {
    pub(crate) fn parse(file: impl Into<String>, detail: impl Into<String>) -> Self {
        SchemaError::Parse { file: file.into(), detail: detail.into() }
    }
}
