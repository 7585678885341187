//! Grammar matching engine.
//!
//! A profile's content model is compiled (by the schema module) into a
//! [`GrammarNode`] tree. The [`Checker`] verifies that the row-type
//! sequence of each body block is generated by that grammar, greedily and
//! without backtracking, and raises a [`ConformanceFailure`] carrying the
//! expected and actual structure when it is not.

mod errors;
mod matcher;
mod node;

pub use errors::ConformanceFailure;
pub use node::{GrammarNode, MaxOccurs, Occurs};

use crate::record::{Block, BlockKind};

/// Legend for the quantifier symbols used in rendered grammars.
pub const QUANTIFIER_LEGEND: &str = "\nQuantifiers:\n\
    \t* Zero or more occurrences\n\
    \t+ One or more occurrences\n\
    \t? Zero or one occurrences\n";

/// Checks blocks against one profile's content model.
pub struct Checker {
    root: GrammarNode,
}

impl Checker {
    pub fn new(root: GrammarNode) -> Self {
        Self { root }
    }

    /// The grammar this checker matches against.
    pub fn grammar(&self) -> &GrammarNode {
        &self.root
    }

    /// Matches one block's row sequence against the grammar.
    ///
    /// Header and footer blocks are not covered by the content model and
    /// count zero rows. For a body block the whole row sequence must be
    /// consumed; the number of matched rows is returned.
    pub fn check_block(&self, block: &Block) -> Result<usize, ConformanceFailure> {
        if block.kind != BlockKind::Body {
            return Ok(0);
        }
        let consumed = matcher::match_node(&self.root, &block.rows, 0);
        if !block.rows.is_empty() && consumed != block.rows.len() {
            return Err(ConformanceFailure {
                block_number: block.number.unwrap_or(0),
                file_number: block.file_number,
                row_number: block.rows[consumed].line_number,
                expected: self.root.to_string(),
                actual: block.rows.iter().map(|r| r.row_type.clone()).collect(),
            });
        }
        Ok(consumed)
    }
}
