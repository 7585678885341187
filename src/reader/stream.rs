//! The block stream and its state machine.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;

use crate::cell::CellContext;
use crate::constants;
use crate::logging::ReportLogger;
use crate::record::{Block, BlockKind, Cell, Row};
use crate::schema::{RowSchema, SchemaCompiler};

use super::errors::{ReadError, RowFailure};
use super::tokenizer;

/// Where the reader obtains its row schema.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// A schema compiled ahead of time, shared read-only.
    Compiled(Arc<RowSchema>),
    /// Compile the given documents when the file's HEAD record arrives,
    /// using the profile named in that record for diagnostics.
    Documents { schema_path: PathBuf, enums_path: Option<PathBuf> },
}

/// Reader state. Schema resolution is an explicit step of the header
/// phase: it must have happened before any body row is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    AwaitingHeader,
    InHeader,
    InBody(u64),
    InFooter,
    Done,
}

/// Reads one report file into blocks.
pub struct BlockReader {
    file_path: PathBuf,
    source: SchemaSource,
}

impl BlockReader {
    pub fn new(file_path: impl Into<PathBuf>, source: SchemaSource) -> Self {
        Self { file_path: file_path.into(), source }
    }

    /// Opens the file and returns the lazy block sequence.
    ///
    /// `file_number` is the file's 1-based number within the report, used
    /// in diagnostics and recorded on every block.
    pub fn blocks(self, file_number: u64, logger: &ReportLogger) -> Result<BlockStream<'_>, ReadError> {
        let file_name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string());
        let lines = open_lines(&self.file_path, &file_name)?;
        let schema = match &self.source {
            SchemaSource::Compiled(schema) => Some(schema.clone()),
            SchemaSource::Documents { .. } => None,
        };
        logger.info(format!("Start parsing the HEAD block in file number {}.", file_number));
        Ok(BlockStream {
            logger,
            lines,
            source: self.source,
            schema,
            state: ReaderState::AwaitingHeader,
            current: None,
            row_number: 0,
            file_name,
            file_number,
        })
    }
}

/// A gzip suffix on the file name selects transparent decompression; the
/// tokenizer is the same either way.
fn open_lines(path: &Path, file_name: &str) -> Result<Box<dyn BufRead>, ReadError> {
    let file = File::open(path)
        .map_err(|e| ReadError::Io { file: file_name.to_string(), source: e })?;
    if file_name.ends_with(constants::GZIP_SUFFIX) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// The lazy, forward-only block sequence of one file.
///
/// Yields one block at a time; at most one in-progress block is buffered.
/// The stream is not restartable; a fresh read starts a fresh state
/// machine. Dropping the stream closes the file.
pub struct BlockStream<'a> {
    logger: &'a ReportLogger,
    lines: Box<dyn BufRead>,
    source: SchemaSource,
    schema: Option<Arc<RowSchema>>,
    state: ReaderState,
    current: Option<Block>,
    row_number: u64,
    file_name: String,
    file_number: u64,
}

impl Iterator for BlockStream<'_> {
    type Item = Result<Block, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => None,
            Err(e) => {
                self.state = ReaderState::Done;
                Some(Err(e))
            }
        }
    }
}

impl BlockStream<'_> {
    /// Consumes lines until a block completes. End of input flushes the
    /// open block and the sequence ends.
    fn advance(&mut self) -> Result<Option<Block>, ReadError> {
        loop {
            if self.state == ReaderState::Done {
                return Ok(None);
            }
            let mut raw = Vec::new();
            let read = self
                .lines
                .read_until(b'\n', &mut raw)
                .map_err(|e| ReadError::Io { file: self.file_name.clone(), source: e })?;
            if read == 0 {
                self.state = ReaderState::Done;
                return Ok(self.current.take());
            }
            self.row_number += 1;
            tokenizer::strip_line_ending(&mut raw);
            if raw.first() == Some(&constants::COMMENT_MARKER) {
                continue;
            }
            let fields = tokenizer::split_fields(&raw);
            if let Some(block) = self.process_row(fields)? {
                return Ok(Some(block));
            }
        }
    }

    /// Runs one row through the state machine; returns a block when the
    /// row closed one.
    fn process_row(&mut self, fields: Vec<Vec<u8>>) -> Result<Option<Block>, ReadError> {
        let code = match self.row_code(&fields) {
            Ok(code) => code,
            Err(failure) => {
                self.logger.error(&failure)?;
                return Ok(None);
            }
        };
        let is_foot = constants::FOOTER_ROW_TYPES.contains(&code.as_str());
        let is_header = constants::header_row_pattern().is_match(&code);

        match self.state {
            ReaderState::AwaitingHeader => {
                if is_foot {
                    self.start_block(BlockKind::Foot, &fields, &code)?;
                    self.state = ReaderState::InFooter;
                } else if is_header {
                    self.start_block(BlockKind::Head, &fields, &code)?;
                    self.state = ReaderState::InHeader;
                } else {
                    self.begin_body(&fields, &code)?;
                }
                Ok(None)
            }
            ReaderState::InHeader => {
                if is_header && !is_foot {
                    if code == constants::FILE_HEADER_ROW_TYPE {
                        self.annotate_header(&fields)?;
                    }
                    let row = self.build_row(&fields, &code, None)?;
                    self.push_row(row);
                    return Ok(None);
                }
                // The first row not matching the header pattern closes the
                // header block.
                let closed = self.current.take();
                if is_foot {
                    self.start_block(BlockKind::Foot, &fields, &code)?;
                    self.state = ReaderState::InFooter;
                } else {
                    self.state = ReaderState::AwaitingHeader;
                    self.begin_body(&fields, &code)?;
                }
                Ok(closed)
            }
            ReaderState::InBody(open_number) => {
                if is_foot {
                    let closed = self.current.take();
                    self.start_block(BlockKind::Foot, &fields, &code)?;
                    self.state = ReaderState::InFooter;
                    return Ok(closed);
                }
                let number = match self.block_number(&fields) {
                    Ok(number) => number,
                    Err(failure) => {
                        self.logger.error(&failure)?;
                        return Ok(None);
                    }
                };
                if number != open_number {
                    let closed = self.current.take();
                    self.open_body_block(number, &fields, &code)?;
                    return Ok(closed);
                }
                let row = self.build_row(&fields, &code, Some(number))?;
                self.push_row(row);
                Ok(None)
            }
            ReaderState::InFooter => {
                if is_foot {
                    let row = self.build_row(&fields, &code, None)?;
                    self.push_row(row);
                } else {
                    self.logger.error(&RowFailure {
                        row_number: self.row_number,
                        file_name: self.file_name.clone(),
                        detail: format!(
                            "It is not permissible to include a {} record after the FOOT block.",
                            code
                        ),
                    })?;
                }
                Ok(None)
            }
            ReaderState::Done => Ok(None),
        }
    }

    /// Extracts and normalizes the row-type code from the first field.
    fn row_code(&self, fields: &[Vec<u8>]) -> Result<String, RowFailure> {
        if fields.is_empty() {
            return Err(self.row_failure("It is not permissible to include empty Records."));
        }
        let code = std::str::from_utf8(&fields[0])
            .map_err(|_| self.row_failure("The record type is not valid UTF-8."))?;
        let mut code = code.to_uppercase();
        if constants::versioned_row_type_pattern().is_match(&code) {
            // "SY02.01" normalizes to "SY0201".
            code = code.replace('.', "");
        }
        if let Some(schema) = &self.schema {
            if !schema.contains(&code) {
                return Err(self.row_failure(format!(
                    "Row type {} does not exist in the schema document. Valid row types are: {:?}.",
                    code,
                    schema.row_types()
                )));
            }
        }
        Ok(code)
    }

    /// The explicit block-number field of a body row.
    fn block_number(&self, fields: &[Vec<u8>]) -> Result<u64, RowFailure> {
        let raw = fields.get(1).map(|f| String::from_utf8_lossy(f)).unwrap_or_default();
        raw.parse::<u64>().map_err(|_| {
            self.row_failure(format!(
                "The block id \"{}\" in line number {} was expected to be an integer.",
                raw.to_uppercase(),
                self.row_number
            ))
        })
    }

    fn row_failure(&self, detail: impl Into<String>) -> RowFailure {
        RowFailure {
            row_number: self.row_number,
            file_name: self.file_name.clone(),
            detail: detail.into(),
        }
    }

    /// Opens a header or footer block with this row.
    fn start_block(
        &mut self,
        kind: BlockKind,
        fields: &[Vec<u8>],
        code: &str,
    ) -> Result<(), ReadError> {
        if kind == BlockKind::Foot {
            self.logger
                .info(format!("Start parsing the FOOT block in file number {}.", self.file_number));
        }
        let mut block = Block::new(kind, self.file_number);
        if code == constants::FILE_HEADER_ROW_TYPE {
            self.resolve_schema(fields)?;
            block.version = fields.get(1).map(|f| String::from_utf8_lossy(f).into_owned());
            block.file_name = Some(self.file_name.clone());
        }
        let row = self.build_row(fields, code, None)?;
        block.rows.push(row);
        self.current = Some(block);
        Ok(())
    }

    /// A HEAD record arriving while the header block is already open:
    /// resolve the schema if that has not happened and record the version.
    fn annotate_header(&mut self, fields: &[Vec<u8>]) -> Result<(), ReadError> {
        self.resolve_schema(fields)?;
        if let Some(block) = self.current.as_mut() {
            block.version = fields.get(1).map(|f| String::from_utf8_lossy(f).into_owned());
            block.file_name = Some(self.file_name.clone());
        }
        Ok(())
    }

    /// Opens a body block after parsing the row's block-number field; a
    /// number that fails to parse skips the row.
    fn begin_body(&mut self, fields: &[Vec<u8>], code: &str) -> Result<(), ReadError> {
        let number = match self.block_number(fields) {
            Ok(number) => number,
            Err(failure) => {
                self.logger.error(&failure)?;
                return Ok(());
            }
        };
        self.open_body_block(number, fields, code)
    }

    fn open_body_block(
        &mut self,
        number: u64,
        fields: &[Vec<u8>],
        code: &str,
    ) -> Result<(), ReadError> {
        self.logger.info(format!(
            "Start parsing block number {} in file number {}.",
            number, self.file_number
        ));
        let mut block = Block::new(BlockKind::Body, self.file_number);
        block.number = Some(number);
        let row = self.build_row(fields, code, Some(number))?;
        block.rows.push(row);
        self.current = Some(block);
        self.state = ReaderState::InBody(number);
        Ok(())
    }

    fn push_row(&mut self, row: Row) {
        if let Some(block) = self.current.as_mut() {
            block.rows.push(row);
        }
    }

    /// Resolves the row schema from the HEAD record when none was
    /// pre-supplied. The profile name and version are embedded in the
    /// record's own fields.
    fn resolve_schema(&mut self, fields: &[Vec<u8>]) -> Result<(), ReadError> {
        if self.schema.is_some() {
            return Ok(());
        }
        let (schema_path, enums_path) = match &self.source {
            SchemaSource::Compiled(schema) => {
                self.schema = Some(schema.clone());
                return Ok(());
            }
            SchemaSource::Documents { schema_path, enums_path } => {
                (schema_path.clone(), enums_path.clone())
            }
        };
        let profile = fields.get(2).map(|f| String::from_utf8_lossy(f).into_owned());
        let version = fields.get(3).map(|f| String::from_utf8_lossy(f).into_owned());
        match (profile, version) {
            (Some(profile), Some(version)) => {
                self.logger
                    .info(format!("Detected profile and version from HEAD: {} ({})", profile, version));
            }
            _ => {
                self.logger.warning(format!(
                    "The HEAD record in file number {} does not carry the profile name and \
                     version fields.",
                    self.file_number
                ));
            }
        }
        self.logger.info(format!("Schema document location: {}", schema_path.display()));
        let schema = SchemaCompiler::new(schema_path, enums_path).compile(self.logger)?;
        self.schema = Some(Arc::new(schema));
        Ok(())
    }

    /// Zips the row's fields against its validators; cells that fail or
    /// are empty optionals are omitted.
    fn build_row(
        &self,
        fields: &[Vec<u8>],
        code: &str,
        block_number: Option<u64>,
    ) -> Result<Row, ReadError> {
        let schema = self
            .schema
            .as_ref()
            .ok_or_else(|| ReadError::SchemaUnresolved { file: self.file_name.clone() })?;
        let mut row = Row::new(code, self.row_number);
        if let Some(validators) = schema.validators(code) {
            let ctx = CellContext {
                file_name: &self.file_name,
                row_number: self.row_number,
                block_number,
            };
            for (validator, raw) in validators.iter().zip(fields) {
                if let Some(data) = validator.validate(raw, ctx, self.logger)? {
                    row.cells.push(Cell { name: validator.name().to_string(), data });
                }
            }
        }
        Ok(row)
    }
}
