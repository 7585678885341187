//! Block reader.
//!
//! Streams a (possibly gzip-compressed) flat file into a lazy sequence of
//! typed [`Block`](crate::record::Block) records. Rows are tokenized,
//! classified by their row-type code and validated cell by cell against
//! the resolved row schema; runs of header, body and footer rows become
//! blocks. The consumer pulls one block at a time; dropping the stream
//! closes the file.

mod errors;
mod stream;
mod tokenizer;

pub use errors::{ReadError, RowFailure};
pub use stream::{BlockReader, BlockStream, SchemaSource};
