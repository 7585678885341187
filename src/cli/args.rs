//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// flatreport - strict validation and decoding for block-structured
/// flat-file sales reports
#[derive(Parser, Debug)]
#[command(name = "flatreport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a report into block records, written to stdout as JSON lines
    Decode {
        /// The report files, in report order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// The row/profile schema document
        #[arg(long)]
        schema: PathBuf,

        /// The allowed-value schema document; resolved from the schema
        /// document's import when omitted
        #[arg(long)]
        enums: Option<PathBuf>,

        /// Where the run's diagnostics are written
        #[arg(long, default_value = "flatreport.log")]
        log_file: PathBuf,

        /// Abort on the first logged error instead of continuing
        #[arg(long)]
        fail_fast: bool,

        /// Do not forward header blocks to the output
        #[arg(long)]
        skip_head: bool,
    },

    /// Check the report's body blocks against a profile's content model
    Conformance {
        /// The report files, in report order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// The row/profile schema document
        #[arg(long)]
        schema: PathBuf,

        /// The allowed-value schema document; resolved from the schema
        /// document's import when omitted
        #[arg(long)]
        enums: Option<PathBuf>,

        /// The name of the profile to check against
        #[arg(long)]
        profile: String,

        /// Where the run's diagnostics are written
        #[arg(long, default_value = "flatreport.log")]
        log_file: PathBuf,

        /// Abort on the first logged error instead of continuing
        #[arg(long)]
        fail_fast: bool,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
