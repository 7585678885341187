//! Schema compiler.
//!
//! Turns the two declarative schema documents into executable artifacts:
//! the allowed-value document becomes an [`EnumerationTable`], the
//! row/profile document becomes a [`RowSchema`] (one ordered validator
//! list per row type) and, for a selected profile, a
//! [`GrammarNode`](crate::conformance::GrammarNode) content-model tree.
//!
//! Compilation runs once per file/profile, before any row is read; the
//! compiled artifacts are immutable and freely shared afterwards.

mod compiler;
mod enums;
mod errors;
mod profile;
mod types;
mod xsd;

pub use compiler::SchemaCompiler;
pub use enums::EnumerationTable;
pub use errors::{SchemaError, SchemaResult};
pub use profile::{compile_profile, ProfileLookup};
pub use types::RowSchema;
