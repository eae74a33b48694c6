use std::fmt;

use anyhow::{anyhow, bail, Result};

use crate::syntax::symbol::Symbol;

/// A feature key. Every extractor produces keys of exactly one shape; the
/// shape also drives parsing when feature definitions are reloaded, so the
/// printed text of a key must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKey {
    /// A single small integer (probability bins, branch flags).
    Bin(i64),
    /// A sequence of category/word symbols and markers.
    Syms(Vec<Symbol>),
    /// Two small integers (coordination features).
    IntPair(i64, i64),
    /// A fixed-length integer prefix followed by symbols (length-binned
    /// context features).
    IntsSyms(Vec<i64>, Vec<Symbol>),
    /// The serialized text of a tree fragment.
    Fragment(String),
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::Bin(n) => write!(f, "{}", n),
            FeatureKey::Syms(syms) => {
                for (i, s) in syms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", s)?;
                }
                Ok(())
            }
            FeatureKey::IntPair(a, b) => write!(f, "{} {}", a, b),
            FeatureKey::IntsSyms(ints, syms) => {
                for (i, n) in ints.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", n)?;
                }
                for s in syms {
                    write!(f, " {}", s)?;
                }
                Ok(())
            }
            FeatureKey::Fragment(text) => f.write_str(text),
        }
    }
}

/// The key shape an extractor produces; directs definition-file parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    Bin,
    Syms,
    IntPair,
    IntsSyms { num_ints: usize },
    Fragment,
}

impl KeyShape {
    /// Parse the feature-specific remainder of a definition line. Everything
    /// the shape does not consume is discarded.
    pub fn parse(&self, text: &str) -> Result<FeatureKey> {
        let text = text.trim();
        match self {
            KeyShape::Bin => {
                let tok = text
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| anyhow!("Empty bin feature text"))?;
                Ok(FeatureKey::Bin(
                    tok.parse()
                        .map_err(|_| anyhow!("Bad bin feature text: {:?}", text))?,
                ))
            }
            KeyShape::Syms => {
                let syms: Vec<Symbol> =
                    text.split_whitespace().map(Symbol::intern).collect();
                if syms.is_empty() {
                    bail!("Empty symbol feature text");
                }
                Ok(FeatureKey::Syms(syms))
            }
            KeyShape::IntPair => {
                let mut toks = text.split_whitespace();
                let a = toks
                    .next()
                    .and_then(|t| t.parse().ok())
                    .ok_or_else(|| anyhow!("Bad integer-pair feature text: {:?}", text))?;
                let b = toks
                    .next()
                    .and_then(|t| t.parse().ok())
                    .ok_or_else(|| anyhow!("Bad integer-pair feature text: {:?}", text))?;
                Ok(FeatureKey::IntPair(a, b))
            }
            KeyShape::IntsSyms { num_ints } => {
                let mut toks = text.split_whitespace();
                let mut ints = Vec::with_capacity(*num_ints);
                for _ in 0..*num_ints {
                    let n = toks
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or_else(|| anyhow!("Bad length-binned feature text: {:?}", text))?;
                    ints.push(n);
                }
                let syms: Vec<Symbol> = toks.map(Symbol::intern).collect();
                Ok(FeatureKey::IntsSyms(ints, syms))
            }
            KeyShape::Fragment => {
                if text.is_empty() {
                    bail!("Empty fragment feature text");
                }
                Ok(FeatureKey::Fragment(text.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_shapes() {
        let cases = vec![
            (KeyShape::Bin, FeatureKey::Bin(-3)),
            (
                KeyShape::Syms,
                FeatureKey::Syms(vec![
                    Symbol::intern("NP"),
                    Symbol::intern("*HEAD*"),
                    Symbol::intern("NN"),
                ]),
            ),
            (KeyShape::IntPair, FeatureKey::IntPair(3, -1)),
            (
                KeyShape::IntsSyms { num_ints: 2 },
                FeatureKey::IntsSyms(
                    vec![2, 5],
                    vec![Symbol::intern("VP"), Symbol::intern("_")],
                ),
            ),
            (
                KeyShape::Fragment,
                FeatureKey::Fragment("(NP (DT the) NN)".to_string()),
            ),
        ];
        for (shape, key) in cases {
            let text = key.to_string();
            let reparsed = shape.parse(&text).unwrap();
            assert_eq!(reparsed, key, "round trip failed for {:?}", text);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(KeyShape::Bin.parse("").is_err());
        assert!(KeyShape::Bin.parse("abc").is_err());
        assert!(KeyShape::IntPair.parse("1").is_err());
        assert!(KeyShape::Syms.parse("   ").is_err());
    }
}
