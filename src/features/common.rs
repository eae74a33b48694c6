use std::fmt;
use std::sync::OnceLock;

use crate::syntax::symbol::Symbol;
use crate::syntax::tree::{NodeId, ParseTree};

macro_rules! marker {
    ($name:ident, $text:expr) => {
        pub fn $name() -> Symbol {
            static SYM: OnceLock<Symbol> = OnceLock::new();
            *SYM.get_or_init(|| Symbol::intern($text))
        }
    };
}

marker!(end_marker, "_");
marker!(child_marker, "*CHILD*");
marker!(adjunct_marker, "*ADJ*");
marker!(conjunct_marker, "*CONJ*");
marker!(head_marker, "*HEAD*");
marker!(last_adjunct_marker, "*LASTADJ*");
marker!(last_conjunct_marker, "*LASTCONJ*");
marker!(nonroot_marker, "*NONROOT*");
marker!(posthead_marker, "*POSTHEAD*");
marker!(prehead_marker, "*PREHEAD*");
marker!(zero_marker, "0");

/// Map a non-negative count onto the discrete scale {0, 1, 2, 4, 5}.
pub fn quantize(v: usize) -> i64 {
    match v {
        0 => 0,
        1 => 1,
        2 => 2,
        3 | 4 => 4,
        _ => 5,
    }
}

pub fn symbol_quantize(v: usize) -> Symbol {
    static SYMS: OnceLock<[Symbol; 4]> = OnceLock::new();
    let syms = SYMS.get_or_init(|| {
        [
            Symbol::intern("1"),
            Symbol::intern("2"),
            Symbol::intern("4"),
            Symbol::intern("5"),
        ]
    });
    match v {
        0 => zero_marker(),
        1 => syms[0],
        2 => syms[1],
        3 | 4 => syms[2],
        _ => syms[3],
    }
}

/// True of clause-ish categories that bound a "root context" (NP, ROOT, S,
/// SBAR).
pub fn is_bounding_node(tree: &ParseTree, id: NodeId) -> bool {
    static CATS: OnceLock<[Symbol; 4]> = OnceLock::new();
    let cats = CATS.get_or_init(|| {
        [
            Symbol::intern("NP"),
            Symbol::intern("ROOT"),
            Symbol::intern("S"),
            Symbol::intern("SBAR"),
        ]
    });
    cats.contains(&tree.node(id).category)
}

/// How much lexical annotation a rule-like feature carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LexLevel {
    None,
    Pos,
    Lexical,
}

impl fmt::Display for LexLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexLevel::None => "none",
            LexLevel::Pos => "pos",
            LexLevel::Lexical => "lexical",
        })
    }
}

/// Granularity of a head-dependency endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoLevel {
    Pos,
    ClosedClass,
    Lexical,
}

impl fmt::Display for InfoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfoLevel::Pos => "pos",
            InfoLevel::ClosedClass => "closedclass",
            InfoLevel::Lexical => "lexical",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_scale() {
        assert_eq!(quantize(0), 0);
        assert_eq!(quantize(1), 1);
        assert_eq!(quantize(2), 2);
        assert_eq!(quantize(3), 4);
        assert_eq!(quantize(4), 4);
        assert_eq!(quantize(17), 5);
        assert_eq!(symbol_quantize(3).as_str(), "4");
        assert_eq!(symbol_quantize(0).as_str(), "0");
    }
}
