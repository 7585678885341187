//! The content-model tree.

use std::fmt;

/// Upper occurrence bound of a grammar node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl MaxOccurs {
    /// Whether another repetition is allowed after `taken` repetitions.
    pub fn allows(&self, taken: u32) -> bool {
        match self {
            MaxOccurs::Bounded(max) => taken < *max,
            MaxOccurs::Unbounded => true,
        }
    }
}

/// Occurrence bounds of a grammar node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    pub min: u32,
    pub max: MaxOccurs,
}

impl Occurs {
    /// Exactly one occurrence.
    pub const ONE: Occurs = Occurs { min: 1, max: MaxOccurs::Bounded(1) };

    pub fn new(min: u32, max: MaxOccurs) -> Self {
        Self { min, max }
    }

    /// The quantifier symbol for the canonical bound shapes. Other bound
    /// combinations render without a symbol, even where that understates
    /// the true cardinality.
    fn quantifier(&self) -> &'static str {
        match (self.min, self.max) {
            (0, MaxOccurs::Bounded(1)) => "?",
            (0, MaxOccurs::Unbounded) => "*",
            (1, MaxOccurs::Unbounded) => "+",
            _ => "",
        }
    }
}

/// One node of a profile's content model. The set of node kinds is closed;
/// the matcher dispatches over it with a `match`.
#[derive(Debug, Clone)]
pub enum GrammarNode {
    /// A run of rows of one type.
    Leaf { row_type: String, occurs: Occurs },
    /// Children matched in order.
    Sequence { children: Vec<GrammarNode>, occurs: Occurs },
    /// The first child that matches wins.
    Choice { children: Vec<GrammarNode>, occurs: Occurs },
    /// The top of a profile's tree; demands that the whole row sequence
    /// of a block is consumed.
    Root { child: Box<GrammarNode> },
}

impl GrammarNode {
    /// The node's occurrence bounds; the root is matched exactly once.
    pub fn occurs(&self) -> Occurs {
        match self {
            GrammarNode::Leaf { occurs, .. }
            | GrammarNode::Sequence { occurs, .. }
            | GrammarNode::Choice { occurs, .. } => *occurs,
            GrammarNode::Root { .. } => Occurs::ONE,
        }
    }
}

impl fmt::Display for GrammarNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarNode::Leaf { row_type, occurs } => {
                write!(f, "{}{}", row_type, occurs.quantifier())
            }
            GrammarNode::Sequence { children, occurs } => {
                write!(f, "Sequence ({}){}", join(children, " and "), occurs.quantifier())
            }
            GrammarNode::Choice { children, occurs } => {
                write!(f, "[{}]{}", join(children, " or "), occurs.quantifier())
            }
            GrammarNode::Root { child } => write!(f, "{}", child),
        }
    }
}

fn join(children: &[GrammarNode], separator: &str) -> String {
    children.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(row_type: &str, min: u32, max: MaxOccurs) -> GrammarNode {
        GrammarNode::Leaf { row_type: row_type.to_string(), occurs: Occurs::new(min, max) }
    }

    #[test]
    fn test_quantifier_symbols() {
        assert_eq!(leaf("AS01", 0, MaxOccurs::Bounded(1)).to_string(), "AS01?");
        assert_eq!(leaf("AS01", 0, MaxOccurs::Unbounded).to_string(), "AS01*");
        assert_eq!(leaf("AS01", 1, MaxOccurs::Unbounded).to_string(), "AS01+");
        assert_eq!(leaf("AS01", 1, MaxOccurs::Bounded(1)).to_string(), "AS01");
    }

    #[test]
    fn test_non_canonical_bounds_render_without_symbol() {
        assert_eq!(leaf("AS01", 0, MaxOccurs::Bounded(5)).to_string(), "AS01");
        assert_eq!(leaf("AS01", 2, MaxOccurs::Unbounded).to_string(), "AS01");
        assert_eq!(leaf("AS01", 1, MaxOccurs::Bounded(3)).to_string(), "AS01");
    }

    #[test]
    fn test_sequence_and_choice_rendering() {
        let tree = GrammarNode::Root {
            child: Box::new(GrammarNode::Sequence {
                children: vec![
                    GrammarNode::Choice {
                        children: vec![
                            leaf("AS01", 1, MaxOccurs::Bounded(1)),
                            leaf("AS02", 1, MaxOccurs::Bounded(1)),
                        ],
                        occurs: Occurs::new(1, MaxOccurs::Unbounded),
                    },
                    leaf("RU01", 0, MaxOccurs::Unbounded),
                ],
                occurs: Occurs::ONE,
            }),
        };
        assert_eq!(tree.to_string(), "Sequence ([AS01 or AS02]+ and RU01*)");
    }
}
