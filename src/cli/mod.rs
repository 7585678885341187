//! CLI command dispatch.

mod args;

pub use args::{Cli, Command};

use std::io;

use crate::conformance::QUANTIFIER_LEGEND;
use crate::logging::ReportLogger;
use crate::report::{JsonLinesSink, ReportFailure, ReportManager};

/// Parses the command line and runs the selected command.
pub fn run() -> Result<(), ReportFailure> {
    match Cli::parse_args().command {
        Command::Decode { files, schema, enums, log_file, fail_fast, skip_head } => {
            let logger = ReportLogger::to_file(&log_file, fail_fast)?;
            let stdout = io::stdout();
            let mut sink = JsonLinesSink::new(stdout.lock());
            ReportManager::new(&logger).parse_report(
                &files,
                &schema,
                enums.as_deref(),
                &mut sink,
                !skip_head,
            )
        }
        Command::Conformance { files, schema, enums, profile, log_file, fail_fast } => {
            let logger = ReportLogger::to_file(&log_file, fail_fast)?;
            let manager = ReportManager::new(&logger);
            match manager.check_conformance(&files, &schema, enums.as_deref(), &profile) {
                Ok(totals) => {
                    println!(
                        "The conformance validation passed. Validated {} blocks ({} rows).",
                        totals.blocks_checked, totals.rows_matched
                    );
                    Ok(())
                }
                Err(e) => {
                    if matches!(e, ReportFailure::Conformance(_)) {
                        eprintln!("{}", QUANTIFIER_LEGEND);
                    }
                    Err(e)
                }
            }
        }
    }
}
