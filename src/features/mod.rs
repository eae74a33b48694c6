//! The feature-extractor catalog.
//!
//! Every extractor kind is a struct carrying its configuration plus a
//! precomputed identifier string; [`Extractor`] is the closed sum over all
//! kinds, dispatched by pattern match. An extractor maps one parse to a
//! multiset of [`FeatureKey`]s.

pub mod branch;
pub mod common;
pub mod coord;
pub mod edges;
pub mod fragment;
pub mod heads;
pub mod key;
pub mod prob;
pub mod rule;
pub mod sets;
pub mod word;

use std::collections::HashMap;

pub use common::{InfoLevel, LexLevel};
pub use key::{FeatureKey, KeyShape};
pub use sets::extractor_set;

use crate::syntax::tree::Parse;

/// Raw per-parse feature counts.
pub type FeatureCounts = HashMap<FeatureKey, f64>;

/// One configured feature extractor.
#[derive(Debug, Clone)]
pub enum Extractor {
    NegLogProb(prob::NegLogProb),
    NegLogCondProb(prob::NegLogCondProb),
    BinnedLogCondProb(prob::BinnedLogCondProb),
    InterpLogCondProb(prob::InterpLogCondProb),
    Rule(rule::Rule),
    NGram(rule::NGram),
    NNGram(rule::NNGram),
    Word(word::Word),
    WordProjection(word::WordProjection),
    SubjVerbAgreement(word::SubjVerbAgreement),
    SynSemHeads(word::SynSemHeads),
    RightBranch(branch::RightBranch),
    LeftBranchLength(branch::LeftBranchLength),
    RightBranchLength(branch::RightBranchLength),
    RuleContext(branch::RuleContext),
    Heads(heads::Heads),
    WordHeads(heads::WordHeads),
    Neighbours(edges::Neighbours),
    Edges(edges::Edges),
    WordEdges(edges::WordEdges),
    WordNeighbours(edges::WordNeighbours),
    WideEdges(edges::WideEdges),
    ContextEdges(edges::ContextEdges),
    Heavy(edges::Heavy),
    NGramTree(fragment::NGramTree),
    HeadTree(fragment::HeadTree),
    CoordParallelism(coord::CoordParallelism),
    CoordLenParallelism(coord::CoordLenParallelism),
}

impl Extractor {
    /// The unique colon-separated configuration string; the join key between
    /// feature-definition files and the compiled-in catalog.
    pub fn identifier(&self) -> &str {
        match self {
            Extractor::NegLogProb(e) => e.identifier(),
            Extractor::NegLogCondProb(e) => e.identifier(),
            Extractor::BinnedLogCondProb(e) => e.identifier(),
            Extractor::InterpLogCondProb(e) => e.identifier(),
            Extractor::Rule(e) => e.identifier(),
            Extractor::NGram(e) => e.identifier(),
            Extractor::NNGram(e) => e.identifier(),
            Extractor::Word(e) => e.identifier(),
            Extractor::WordProjection(e) => e.identifier(),
            Extractor::SubjVerbAgreement(e) => e.identifier(),
            Extractor::SynSemHeads(e) => e.identifier(),
            Extractor::RightBranch(e) => e.identifier(),
            Extractor::LeftBranchLength(e) => e.identifier(),
            Extractor::RightBranchLength(e) => e.identifier(),
            Extractor::RuleContext(e) => e.identifier(),
            Extractor::Heads(e) => e.identifier(),
            Extractor::WordHeads(e) => e.identifier(),
            Extractor::Neighbours(e) => e.identifier(),
            Extractor::Edges(e) => e.identifier(),
            Extractor::WordEdges(e) => e.identifier(),
            Extractor::WordNeighbours(e) => e.identifier(),
            Extractor::WideEdges(e) => e.identifier(),
            Extractor::ContextEdges(e) => e.identifier(),
            Extractor::Heavy(e) => e.identifier(),
            Extractor::NGramTree(e) => e.identifier(),
            Extractor::HeadTree(e) => e.identifier(),
            Extractor::CoordParallelism(e) => e.identifier(),
            Extractor::CoordLenParallelism(e) => e.identifier(),
        }
    }

    /// The key shape this extractor produces (and parses from definition
    /// files).
    pub fn key_shape(&self) -> KeyShape {
        match self {
            Extractor::NegLogProb(_)
            | Extractor::NegLogCondProb(_)
            | Extractor::BinnedLogCondProb(_)
            | Extractor::InterpLogCondProb(_)
            | Extractor::RightBranch(_)
            | Extractor::LeftBranchLength(_)
            | Extractor::RightBranchLength(_) => KeyShape::Bin,
            Extractor::Rule(_)
            | Extractor::NGram(_)
            | Extractor::NNGram(_)
            | Extractor::Word(_)
            | Extractor::WordProjection(_)
            | Extractor::SubjVerbAgreement(_)
            | Extractor::SynSemHeads(_)
            | Extractor::RuleContext(_)
            | Extractor::Heads(_)
            | Extractor::WordHeads(_)
            | Extractor::Edges(_)
            | Extractor::WordEdges(_)
            | Extractor::WordNeighbours(_)
            | Extractor::WideEdges(_)
            | Extractor::ContextEdges(_) => KeyShape::Syms,
            Extractor::Neighbours(_) => KeyShape::IntsSyms { num_ints: 1 },
            Extractor::Heavy(_) => KeyShape::IntsSyms { num_ints: 2 },
            Extractor::CoordParallelism(_) | Extractor::CoordLenParallelism(_) => {
                KeyShape::IntPair
            }
            Extractor::NGramTree(_) | Extractor::HeadTree(_) => KeyShape::Fragment,
        }
    }

    /// Compute the raw feature multiset of one parse.
    pub fn count_features(&self, parse: &Parse) -> FeatureCounts {
        let mut counts = FeatureCounts::new();
        match self {
            Extractor::NegLogProb(e) => e.count(parse, &mut counts),
            Extractor::NegLogCondProb(e) => e.count(parse, &mut counts),
            Extractor::BinnedLogCondProb(e) => e.count(parse, &mut counts),
            Extractor::InterpLogCondProb(e) => e.count(parse, &mut counts),
            Extractor::Rule(e) => e.count(parse, &mut counts),
            Extractor::NGram(e) => e.count(parse, &mut counts),
            Extractor::NNGram(e) => e.count(parse, &mut counts),
            Extractor::Word(e) => e.count(parse, &mut counts),
            Extractor::WordProjection(e) => e.count(parse, &mut counts),
            Extractor::SubjVerbAgreement(e) => e.count(parse, &mut counts),
            Extractor::SynSemHeads(e) => e.count(parse, &mut counts),
            Extractor::RightBranch(e) => e.count(parse, &mut counts),
            Extractor::LeftBranchLength(e) => e.count(parse, &mut counts),
            Extractor::RightBranchLength(e) => e.count(parse, &mut counts),
            Extractor::RuleContext(e) => e.count(parse, &mut counts),
            Extractor::Heads(e) => e.count(parse, &mut counts),
            Extractor::WordHeads(e) => e.count(parse, &mut counts),
            Extractor::Neighbours(e) => e.count(parse, &mut counts),
            Extractor::Edges(e) => e.count(parse, &mut counts),
            Extractor::WordEdges(e) => e.count(parse, &mut counts),
            Extractor::WordNeighbours(e) => e.count(parse, &mut counts),
            Extractor::WideEdges(e) => e.count(parse, &mut counts),
            Extractor::ContextEdges(e) => e.count(parse, &mut counts),
            Extractor::Heavy(e) => e.count(parse, &mut counts),
            Extractor::NGramTree(e) => e.count(parse, &mut counts),
            Extractor::HeadTree(e) => e.count(parse, &mut counts),
            Extractor::CoordParallelism(e) => e.count(parse, &mut counts),
            Extractor::CoordLenParallelism(e) => e.count(parse, &mut counts),
        }
        counts
    }
}
