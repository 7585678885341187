//! Decoded records: cells, rows and blocks.
//!
//! Instances are built by the block reader and are read-only once yielded.
//! Cells that failed validation or were empty optionals are omitted from
//! their row, never null-filled.

use serde::Serialize;

/// The typed payload of a cell. A repeated field simply carries more than
/// one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellData {
    Strings(Vec<String>),
    Integers(Vec<i64>),
    Decimals(Vec<f64>),
    Booleans(Vec<bool>),
}

impl CellData {
    /// Number of values in the payload.
    pub fn len(&self) -> usize {
        match self {
            CellData::Strings(v) => v.len(),
            CellData::Integers(v) => v.len(),
            CellData::Decimals(v) => v.len(),
            CellData::Booleans(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, typed value extracted from one field position of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub name: String,
    pub data: CellData,
}

/// An ordered record: the row-type code, the 1-based line number in the
/// source file and the cells that validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub row_type: String,
    pub line_number: u64,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(row_type: impl Into<String>, line_number: u64) -> Self {
        Self { row_type: row_type.into(), line_number, cells: Vec::new() }
    }

    /// The first cell with the given name, if it validated.
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name == name)
    }
}

/// The kind of a block: header, numbered body block or terminal footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockKind {
    Head,
    Body,
    Foot,
}

/// A maximal run of rows of one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    /// The file's 1-based number within the report.
    pub file_number: u64,
    /// The block number carried by body rows. Unique within the report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    /// The document version from the file header record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// The originating file name, recorded on header blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub rows: Vec<Row>,
}

impl Block {
    pub fn new(kind: BlockKind, file_number: u64) -> Self {
        Self { kind, file_number, number: None, version: None, file_name: None, rows: Vec::new() }
    }

    /// The row types of the block, in order.
    pub fn row_types(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.row_type.as_str()).collect()
    }
}
