//! The compiled row schema.

use std::collections::HashMap;

use crate::cell::CellValidator;

/// Maps each row-type code to the ordered validators of its fields.
///
/// The validator order is positional and matches the physical field order
/// declared in the schema document; the block reader zips each row's
/// fields against it. Built once per file and immutable thereafter.
#[derive(Debug, Clone, Default)]
pub struct RowSchema {
    rows: HashMap<String, Vec<CellValidator>>,
}

impl RowSchema {
    pub(crate) fn new(rows: HashMap<String, Vec<CellValidator>>) -> Self {
        Self { rows }
    }

    /// The field validators of a row type, in physical field order.
    pub fn validators(&self, row_type: &str) -> Option<&[CellValidator]> {
        self.rows.get(row_type).map(|v| v.as_slice())
    }

    pub fn contains(&self, row_type: &str) -> bool {
        self.rows.contains_key(row_type)
    }

    /// All declared row types, sorted for stable diagnostics.
    pub fn row_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.rows.keys().map(|k| k.as_str()).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
