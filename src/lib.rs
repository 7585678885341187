//! flatreport - strict validation and decoding for block-structured
//! flat-file sales reports
//!
//! A report is one or more tab-delimited text files, each partitioned into
//! a header block, numbered body blocks and a terminal footer block. The
//! layout of every record type, the allowed value sets and the per-profile
//! content model are declared in two XML schema documents. This crate
//! compiles those documents into executable validators, decodes the flat
//! files into typed block records and checks each body block against the
//! profile's content model.

pub mod cell;
pub mod cli;
pub mod conformance;
pub mod constants;
pub mod logging;
pub mod reader;
pub mod record;
pub mod report;
pub mod schema;
