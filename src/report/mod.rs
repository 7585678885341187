//! Report manager.
//!
//! Drives the block reader over the files of one report: compiles the
//! schema once, streams every file's blocks, enforces report-wide
//! block-number uniqueness, hands blocks to the output sink and surfaces
//! the end-of-run summary failure when row-level errors were logged along
//! the way.

mod errors;
mod sink;

pub use errors::{ReportFailure, ReportResult};
pub use sink::{BlockSink, JsonLinesSink};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::conformance::Checker;
use crate::logging::ReportLogger;
use crate::reader::{BlockReader, SchemaSource};
use crate::record::BlockKind;
use crate::schema::{compile_profile, ProfileLookup, SchemaCompiler};

/// Totals of a conformance run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConformanceTotals {
    pub blocks_checked: u64,
    pub rows_matched: u64,
}

/// Parses and validates one report, file by file.
pub struct ReportManager<'a> {
    logger: &'a ReportLogger,
}

impl<'a> ReportManager<'a> {
    pub fn new(logger: &'a ReportLogger) -> Self {
        Self { logger }
    }

    /// Decodes the report's files into blocks and hands them to the sink.
    ///
    /// Body blocks are checked for report-wide block-number uniqueness;
    /// footer blocks are not forwarded, header blocks only when
    /// `write_head` is set. Row-level errors accumulate on the logger and
    /// fail the run collectively once the stream completes.
    pub fn parse_report(
        &self,
        files: &[PathBuf],
        schema_path: &Path,
        enums_path: Option<&Path>,
        sink: &mut dyn BlockSink,
        write_head: bool,
    ) -> ReportResult<()> {
        let schema = Arc::new(
            SchemaCompiler::new(schema_path, enums_path.map(Path::to_path_buf))
                .compile(self.logger)?,
        );
        let mut seen: HashMap<u64, HashSet<u64>> = HashMap::new();
        for (index, path) in files.iter().enumerate() {
            let file_number = index as u64 + 1;
            self.logger.info(format!("Start parsing file number {}.", file_number));
            let stream = BlockReader::new(path, SchemaSource::Compiled(schema.clone()))
                .blocks(file_number, self.logger)?;
            for block in stream {
                let block = block?;
                match block.kind {
                    BlockKind::Body => {
                        if let Some(number) = block.number {
                            check_unique(&mut seen, file_number, number)?;
                        }
                        sink.write_block(&block)?;
                    }
                    BlockKind::Head => {
                        if write_head {
                            sink.write_block(&block)?;
                        }
                    }
                    BlockKind::Foot => {}
                }
            }
        }
        self.logger.raise_if_fatal_errors_found()?;
        Ok(())
    }

    /// Checks every body block of the report against the named profile's
    /// content model, aborting on the first non-conformant block.
    pub fn check_conformance(
        &self,
        files: &[PathBuf],
        schema_path: &Path,
        enums_path: Option<&Path>,
        profile_name: &str,
    ) -> ReportResult<ConformanceTotals> {
        let grammar = match compile_profile(schema_path, profile_name)? {
            ProfileLookup::Found(node) => node,
            ProfileLookup::Missing { requested, available } => {
                return Err(ReportFailure::UnknownProfile { requested, available })
            }
        };
        let checker = Checker::new(grammar);
        let schema = Arc::new(
            SchemaCompiler::new(schema_path, enums_path.map(Path::to_path_buf))
                .compile(self.logger)?,
        );
        let mut totals = ConformanceTotals::default();
        for (index, path) in files.iter().enumerate() {
            let file_number = index as u64 + 1;
            self.logger.info(format!("Start parsing file number {}.", file_number));
            let stream = BlockReader::new(path, SchemaSource::Compiled(schema.clone()))
                .blocks(file_number, self.logger)?;
            for block in stream {
                let block = block?;
                if block.kind != BlockKind::Body {
                    continue;
                }
                totals.rows_matched += checker.check_block(&block)? as u64;
                totals.blocks_checked += 1;
            }
        }
        self.logger.raise_if_fatal_errors_found()?;
        Ok(totals)
    }
}

/// Block numbers are unique within a file and across the whole report;
/// the first duplicate is fatal.
fn check_unique(
    seen: &mut HashMap<u64, HashSet<u64>>,
    file_number: u64,
    number: u64,
) -> ReportResult<()> {
    for (&other_file, numbers) in seen.iter() {
        if numbers.contains(&number) {
            return Err(ReportFailure::DuplicateBlockNumber {
                number,
                first_file: other_file.min(file_number),
                second_file: other_file.max(file_number),
            });
        }
    }
    seen.entry(file_number).or_default().insert(number);
    Ok(())
}
