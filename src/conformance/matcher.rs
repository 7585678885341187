//! Greedy matching of row sequences against the content model.
//!
//! The matcher never backtracks: once a choice alternative has consumed
//! rows it is final, and a sequence never retries an earlier child with
//! fewer repetitions when a later child fails. Inputs a full context-free
//! match would accept can therefore be rejected; downstream diagnostics
//! depend on these exact failure points.

use crate::record::Row;

use super::node::GrammarNode;

/// Matches `node` at `rows[index..]`, returning the number of rows
/// consumed. Zero signals failure for nodes with a non-zero minimum.
pub(crate) fn match_node(node: &GrammarNode, rows: &[Row], index: usize) -> usize {
    match node {
        GrammarNode::Leaf { row_type, occurs } => {
            let mut taken: u32 = 0;
            while occurs.max.allows(taken) {
                let at = index + taken as usize;
                if rows.get(at).map(|r| r.row_type == *row_type).unwrap_or(false) {
                    taken += 1;
                } else {
                    break;
                }
            }
            if taken < occurs.min {
                0
            } else {
                taken as usize
            }
        }
        GrammarNode::Choice { children, occurs } => {
            let mut repetitions: u32 = 0;
            let mut consumed = 0;
            while occurs.max.allows(repetitions) {
                let n = single_choice(children, rows, index + consumed);
                if n == 0 {
                    break;
                }
                consumed += n;
                repetitions += 1;
            }
            if repetitions < occurs.min {
                0
            } else {
                consumed
            }
        }
        GrammarNode::Sequence { children, occurs } => {
            let mut repetitions: u32 = 0;
            let mut consumed = 0;
            while occurs.max.allows(repetitions) {
                let n = single_sequence(children, rows, index + consumed);
                if n == 0 {
                    break;
                }
                consumed += n;
                repetitions += 1;
            }
            if repetitions < occurs.min {
                0
            } else {
                consumed
            }
        }
        GrammarNode::Root { child } => match_node(child, rows, index),
    }
}

/// One repetition of a choice: the first alternative that consumes rows
/// wins; alternatives are never compared for a better match.
fn single_choice(children: &[GrammarNode], rows: &[Row], index: usize) -> usize {
    for child in children {
        let n = match_node(child, rows, index);
        if n > 0 {
            return n;
        }
    }
    0
}

/// One repetition of a sequence: children in order, bailing on the first
/// required child that consumes nothing. Optional children may consume
/// zero rows without failing the repetition.
fn single_sequence(children: &[GrammarNode], rows: &[Row], index: usize) -> usize {
    let mut position = index;
    let mut total = 0;
    for child in children {
        let n = match_node(child, rows, position);
        if n == 0 && child.occurs().min > 0 {
            return 0;
        }
        position += n;
        total += n;
    }
    total
}
