//! Named extractor catalogs. A set name selects which extractors run, in a
//! fixed registration order that also fixes feature-id assignment order.

use anyhow::{bail, Result};

use crate::features::branch::{LeftBranchLength, RightBranch, RightBranchLength, RuleContext};
use crate::features::common::{InfoLevel, LexLevel};
use crate::features::coord::{CoordLenParallelism, CoordParallelism};
use crate::features::edges::{
    ContextEdges, EdgeContext, Edges, Heavy, Neighbours, WideEdges, WordEdges, WordNeighbours,
};
use crate::features::fragment::{HeadTree, Lexicalize, NGramTree};
use crate::features::heads::{Heads, WordHeads};
use crate::features::prob::{BinnedLogCondProb, InterpLogCondProb, NegLogCondProb, NegLogProb};
use crate::features::rule::{NGram, NNGram, Rule};
use crate::features::word::{SubjVerbAgreement, SynSemAnnotation, SynSemHeads, Word, WordProjection};
use crate::features::Extractor;
use crate::syntax::tree::HeadType;

use HeadType::{Semantic, Syntactic};
use InfoLevel::{ClosedClass as CcInfo, Lexical as LexInfo, Pos as PosInfo};
use LexLevel::{Lexical as Lex, None as NoLex};

/// Build the extractor catalog for a set name (`None` selects the default).
pub fn extractor_set(name: Option<&str>) -> Result<Vec<Extractor>> {
    let name = name.unwrap_or("nfeatures");
    let set = match name {
        "nfeatures" => nfeatures(),
        "sfeatures" => sfeatures(),
        "conll" => conll(),
        "splh" => splh(false, false),
        "splhnn" => splh(false, true),
        "splhlocal" => splh(true, false),
        "splhsuffix0" => splh_suffix(0, false),
        "splhsuffix1" => splh_suffix(1, false),
        "splhsuffix3" => splh_suffix(3, false),
        "wedges" => wedges(),
        "wshead" => ws(true, 0, false, false, false),
        "ws" | "wsedge" => ws(false, 3, false, false, false),
        "wsedge0" => ws(false, 1, false, false, false),
        "wsedge1" => ws(false, 2, false, false, false),
        "wsngram" => ws(false, 0, true, false, false),
        "wsngramtree" => ws(false, 0, false, true, false),
        "wsrbcontext" => ws(false, 0, false, false, true),
        "wsall" => ws(true, 3, true, true, true),
        "all" => all_kinds(),
        other => bail!("Unknown feature set name: {:?}", other),
    };
    log::info!("feature set {:?}: {} extractors", name, set.len());
    Ok(set)
}

#[allow(clippy::too_many_arguments)]
fn rule(
    anc_trees: usize,
    anc_cats: usize,
    root: bool,
    conj: bool,
    head: LexLevel,
    functional: LexLevel,
    all: LexLevel,
    head_type: HeadType,
) -> Extractor {
    Extractor::Rule(Rule::new(
        anc_trees, anc_cats, root, conj, head, functional, all, head_type,
    ))
}

fn rule_plain(anc_trees: usize, anc_cats: usize) -> Extractor {
    rule(anc_trees, anc_cats, false, false, NoLex, NoLex, NoLex, Syntactic)
}

#[allow(clippy::too_many_arguments)]
fn ngram(
    frag_len: usize,
    anc_cats: usize,
    root: bool,
    conj: bool,
    head: LexLevel,
    functional: LexLevel,
) -> Extractor {
    Extractor::NGram(NGram::new(
        frag_len, anc_cats, root, conj, head, functional, NoLex, Syntactic,
    ))
}

fn nngram_dirdist(frag_len: usize, root: bool, conj: bool, head: LexLevel, functional: LexLevel) -> Extractor {
    Extractor::NNGram(NNGram::new(
        frag_len, 1, root, conj, head, functional, NoLex, Syntactic, true, true,
    ))
}

fn rbcontext(conjunct: bool, parent: bool, governor: bool, head_type: HeadType) -> Extractor {
    Extractor::RuleContext(RuleContext::new(conjunct, parent, governor, head_type))
}

fn wsheads(
    num_suffix: usize,
    num_heads: usize,
    governor: InfoLevel,
    dependent: InfoLevel,
    head_type: HeadType,
) -> Extractor {
    Extractor::WordHeads(WordHeads::new(
        num_suffix, true, num_heads, governor, dependent, head_type,
    ))
}

fn heads(num_heads: usize, governor_lex: bool, dependent_lex: bool, head_type: HeadType) -> Extractor {
    Extractor::Heads(Heads::new(num_heads, governor_lex, dependent_lex, head_type))
}

fn ngram_tree(ngram: usize, lexicalize: Lexicalize) -> Extractor {
    Extractor::NGramTree(NGramTree::new(ngram, lexicalize, true, 0))
}

fn head_tree(lexicalize: bool, head_type: HeadType) -> Extractor {
    Extractor::HeadTree(HeadTree::new(true, lexicalize, 0, head_type))
}

fn ws_edges(
    ll: EdgeContext,
    lr: EdgeContext,
    rl: EdgeContext,
    rr: EdgeContext,
    binned: bool,
) -> Extractor {
    Extractor::ContextEdges(ContextEdges::new(ll, lr, rl, rr, binned))
}

/// The probability feature, the full rule/ngram/head batteries, both edge
/// context families, the coordination features, and the tree fragments. The
/// default set.
fn nfeatures() -> Vec<Extractor> {
    let mut out = vec![
        Extractor::NegLogProb(NegLogProb),
        Extractor::RightBranch(RightBranch),
        Extractor::Heavy(Heavy),
        Extractor::CoordParallelism(CoordParallelism::new(false)),
        Extractor::CoordParallelism(CoordParallelism::new(true)),
        Extractor::CoordLenParallelism(CoordLenParallelism),
        Extractor::Word(Word::new(1)),
        Extractor::Word(Word::new(2)),
        Extractor::WordProjection(WordProjection::new(Semantic, false, 1)),
    ];

    out.push(wsheads(0, 2, PosInfo, PosInfo, Syntactic));
    out.push(wsheads(0, 2, PosInfo, CcInfo, Syntactic));
    out.push(wsheads(0, 2, CcInfo, PosInfo, Syntactic));
    out.push(wsheads(0, 2, CcInfo, CcInfo, Syntactic));
    out.push(wsheads(0, 2, LexInfo, CcInfo, Syntactic));
    out.push(wsheads(0, 2, CcInfo, LexInfo, Syntactic));
    out.push(wsheads(0, 2, LexInfo, LexInfo, Syntactic));
    out.push(wsheads(0, 2, LexInfo, LexInfo, Semantic));
    out.push(wsheads(0, 3, PosInfo, PosInfo, Syntactic));
    out.push(wsheads(0, 3, PosInfo, PosInfo, Semantic));
    out.push(wsheads(0, 3, PosInfo, CcInfo, Syntactic));
    out.push(wsheads(0, 3, CcInfo, PosInfo, Syntactic));
    out.push(wsheads(0, 3, CcInfo, CcInfo, Syntactic));

    out.push(rbcontext(false, false, false, Syntactic));
    out.push(rbcontext(false, true, false, Syntactic));
    out.push(rbcontext(false, true, true, Syntactic));
    out.push(rbcontext(true, false, false, Syntactic));
    out.push(rbcontext(true, true, false, Syntactic));
    out.push(rbcontext(true, true, true, Syntactic));
    out.push(rbcontext(false, false, false, Semantic));
    out.push(rbcontext(true, false, false, Semantic));
    out.push(rbcontext(true, true, true, Semantic));

    out.push(rule_plain(0, 1));
    out.push(rule_plain(1, 0));
    out.push(rule_plain(1, 1));
    out.push(rule_plain(0, 2));
    out.push(rule(0, 0, true, false, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, true, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, NoLex, Lex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, Lex, NoLex, Syntactic));

    out.push(ngram(1, 1, false, true, NoLex, NoLex));
    out.push(ngram(2, 1, false, false, NoLex, NoLex));
    out.push(ngram(2, 1, true, true, NoLex, NoLex));
    out.push(ngram(3, 1, false, false, NoLex, NoLex));
    out.push(ngram(3, 1, true, true, NoLex, NoLex));
    out.push(ngram(4, 1, false, false, NoLex, NoLex));
    out.push(ngram(2, 1, false, false, Lex, NoLex));
    out.push(ngram(2, 1, false, false, NoLex, Lex));

    out.push(ngram_tree(2, Lexicalize::None));
    out.push(ngram_tree(2, Lexicalize::Functional));
    out.push(ngram_tree(2, Lexicalize::All));
    out.push(ngram_tree(3, Lexicalize::None));
    out.push(ngram_tree(3, Lexicalize::Functional));

    out.push(head_tree(false, Syntactic));
    out.push(head_tree(false, Semantic));
    out.push(head_tree(true, Semantic));

    let empty = EdgeContext::default();
    let punct1 = EdgeContext::new(1, 0, 0, 0, 0);
    let pos1 = EdgeContext::new(1, 1, 0, 0, 0);
    let closed1 = EdgeContext::new(1, 1, 1, 0, 0);
    let word1 = EdgeContext::new(1, 1, 1, 1, 0);
    let punct2 = EdgeContext::new(2, 0, 0, 0, 0);
    let pos2 = EdgeContext::new(2, 1, 0, 0, 0);
    let closed2 = EdgeContext::new(2, 1, 1, 0, 0);
    let word2 = EdgeContext::new(2, 1, 1, 1, 0);

    out.push(ws_edges(punct1, empty, empty, empty, false));
    out.push(ws_edges(pos1, empty, empty, empty, false));
    out.push(ws_edges(closed1, empty, empty, empty, false));
    out.push(ws_edges(punct1, empty, punct1, punct1, false));
    out.push(ws_edges(punct1, empty, punct1, punct1, true));
    out.push(ws_edges(closed1, closed1, empty, empty, false));
    out.push(ws_edges(closed1, closed1, empty, empty, true));
    out.push(ws_edges(closed1, closed1, punct1, punct1, false));
    out.push(ws_edges(word1, word1, empty, empty, false));

    out.push(ws_edges(empty, punct1, empty, empty, false));
    out.push(ws_edges(empty, pos1, empty, empty, false));
    out.push(ws_edges(empty, closed1, empty, empty, false));
    out.push(ws_edges(empty, word1, empty, empty, false));
    out.push(ws_edges(empty, punct2, empty, empty, false));
    out.push(ws_edges(empty, pos2, empty, empty, false));
    out.push(ws_edges(empty, closed2, empty, empty, false));
    out.push(ws_edges(empty, punct1, empty, punct1, false));
    out.push(ws_edges(empty, pos1, empty, punct1, false));
    out.push(ws_edges(empty, closed1, empty, punct1, false));
    out.push(ws_edges(empty, punct1, empty, pos1, false));
    out.push(ws_edges(empty, pos1, empty, pos1, false));
    out.push(ws_edges(empty, closed1, empty, pos1, false));
    out.push(ws_edges(empty, punct1, empty, closed1, false));
    out.push(ws_edges(empty, pos1, empty, closed1, false));
    out.push(ws_edges(empty, closed1, empty, closed1, false));

    out.push(ws_edges(empty, empty, punct1, empty, false));
    out.push(ws_edges(empty, empty, pos1, empty, false));
    out.push(ws_edges(empty, empty, closed1, empty, false));
    out.push(ws_edges(empty, empty, word1, empty, false));
    out.push(ws_edges(empty, empty, punct2, empty, false));
    out.push(ws_edges(empty, empty, pos2, empty, false));
    out.push(ws_edges(empty, empty, closed2, empty, false));
    out.push(ws_edges(empty, empty, punct1, punct1, false));
    out.push(ws_edges(empty, empty, pos1, punct1, false));
    out.push(ws_edges(empty, empty, closed1, punct1, false));
    out.push(ws_edges(empty, empty, punct1, pos1, false));
    out.push(ws_edges(empty, empty, pos1, pos1, false));
    out.push(ws_edges(empty, empty, closed1, pos1, false));
    out.push(ws_edges(empty, empty, punct1, closed1, false));
    out.push(ws_edges(empty, empty, pos1, closed1, false));
    out.push(ws_edges(empty, empty, closed1, closed1, false));

    out.push(ws_edges(empty, empty, empty, punct1, false));
    out.push(ws_edges(empty, empty, empty, punct1, true));
    out.push(ws_edges(empty, empty, empty, punct2, false));
    out.push(ws_edges(empty, empty, empty, pos1, false));
    out.push(ws_edges(empty, empty, empty, pos1, true));
    out.push(ws_edges(empty, empty, empty, pos2, false));
    out.push(ws_edges(empty, empty, empty, closed1, false));
    out.push(ws_edges(empty, empty, empty, closed1, true));
    out.push(ws_edges(empty, empty, empty, closed2, false));
    out.push(ws_edges(empty, empty, empty, word1, false));
    out.push(ws_edges(empty, empty, empty, word1, true));
    out.push(ws_edges(empty, empty, empty, word2, false));

    out
}

/// A small hand-picked selection of the strongest features.
fn sfeatures() -> Vec<Extractor> {
    let mut out = vec![
        Extractor::NegLogProb(NegLogProb),
        Extractor::RightBranch(RightBranch),
        Extractor::Heavy(Heavy),
        Extractor::CoordParallelism(CoordParallelism::new(false)),
    ];

    out.push(rbcontext(false, true, false, Syntactic));
    out.push(rbcontext(false, true, true, Syntactic));
    out.push(rbcontext(true, false, false, Syntactic));
    out.push(rbcontext(true, true, false, Syntactic));
    out.push(rbcontext(true, true, true, Syntactic));

    out.push(rule(0, 0, true, false, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, Lex, NoLex, Syntactic));

    out.push(ngram(2, 1, false, false, NoLex, NoLex));
    out.push(ngram(2, 1, false, false, NoLex, Lex));

    out.push(Extractor::WordProjection(WordProjection::new(
        Semantic, false, 1,
    )));

    out.push(ngram_tree(2, Lexicalize::All));

    out.push(head_tree(false, Syntactic));

    out.push(wsheads(0, 2, LexInfo, LexInfo, Semantic));
    out.push(wsheads(0, 3, PosInfo, PosInfo, Semantic));
    out.push(wsheads(0, 3, CcInfo, CcInfo, Syntactic));

    let empty = EdgeContext::default();
    let punct1 = EdgeContext::new(1, 0, 0, 0, 0);
    let pos1 = EdgeContext::new(1, 1, 0, 0, 0);
    let closed1 = EdgeContext::new(1, 1, 1, 0, 0);
    let word1 = EdgeContext::new(1, 1, 1, 1, 0);
    let punct2 = EdgeContext::new(2, 0, 0, 0, 0);
    let closed2 = EdgeContext::new(2, 1, 1, 0, 0);

    out.push(ws_edges(closed1, empty, empty, empty, false));
    out.push(ws_edges(punct1, empty, punct1, punct1, false));
    out.push(ws_edges(punct1, empty, punct1, punct1, true));
    out.push(ws_edges(closed1, closed1, empty, empty, false));
    out.push(ws_edges(closed1, closed1, empty, empty, true));
    out.push(ws_edges(word1, word1, empty, empty, false));

    out.push(ws_edges(empty, closed1, empty, empty, false));
    out.push(ws_edges(empty, word1, empty, empty, false));
    out.push(ws_edges(empty, punct2, empty, empty, false));
    out.push(ws_edges(empty, closed1, empty, punct1, false));
    out.push(ws_edges(empty, punct1, empty, closed1, false));

    out.push(ws_edges(empty, empty, punct1, empty, false));
    out.push(ws_edges(empty, empty, punct2, empty, false));
    out.push(ws_edges(empty, empty, punct1, punct1, false));
    out.push(ws_edges(empty, empty, punct1, closed1, false));
    out.push(ws_edges(empty, empty, pos1, closed1, false));

    out.push(ws_edges(empty, empty, empty, punct1, false));
    out.push(ws_edges(empty, empty, empty, punct2, false));
    out.push(ws_edges(empty, empty, empty, pos1, false));
    out.push(ws_edges(empty, empty, empty, pos1, true));
    out.push(ws_edges(empty, empty, empty, closed1, false));
    out.push(ws_edges(empty, empty, empty, closed2, false));

    out
}

/// The shared-task selection: rule, ngram, word, head and neighbour features.
fn conll() -> Vec<Extractor> {
    let mut out = vec![Extractor::NegLogProb(NegLogProb)];

    out.push(rule_plain(0, 0));
    out.push(rule_plain(0, 1));
    out.push(rule(0, 0, true, false, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, true, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, NoLex, Lex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, Lex, NoLex, Syntactic));
    out.push(rule_plain(1, 0));
    out.push(rule_plain(1, 1));

    out.push(ngram(1, 1, false, true, NoLex, NoLex));
    out.push(ngram(2, 1, true, true, NoLex, NoLex));
    out.push(ngram(3, 1, true, true, NoLex, NoLex));
    out.push(ngram(2, 1, false, false, Lex, NoLex));
    out.push(ngram(2, 1, false, false, NoLex, Lex));

    out.push(Extractor::Word(Word::new(1)));
    out.push(Extractor::Word(Word::new(2)));
    out.push(Extractor::WordProjection(WordProjection::new(
        Semantic, false, 1,
    )));
    out.push(Extractor::RightBranch(RightBranch));
    out.push(Extractor::Heavy(Heavy));

    out.push(ngram_tree(2, Lexicalize::None));
    out.push(ngram_tree(2, Lexicalize::All));
    out.push(ngram_tree(3, Lexicalize::Functional));

    out.push(head_tree(false, Syntactic));
    out.push(head_tree(false, Semantic));
    out.push(head_tree(true, Semantic));

    out.push(heads(2, false, false, Syntactic));
    out.push(heads(2, true, true, Syntactic));
    out.push(heads(2, true, true, Semantic));
    out.push(heads(3, false, false, Syntactic));

    out.push(Extractor::Neighbours(Neighbours::new(0, 0)));
    out.push(Extractor::Neighbours(Neighbours::new(0, 1)));
    out.push(Extractor::Neighbours(Neighbours::new(1, 0)));

    out.push(Extractor::CoordParallelism(CoordParallelism::new(false)));
    out.push(Extractor::CoordLenParallelism(CoordLenParallelism));

    out
}

/// The revised selection with plain `Edges`/`WordEdges` context grids.
fn splh(local: bool, with_nngram: bool) -> Vec<Extractor> {
    let mut out = vec![
        Extractor::NegLogProb(NegLogProb),
        Extractor::RightBranch(RightBranch),
        Extractor::Heavy(Heavy),
    ];

    out.push(rbcontext(false, false, false, Syntactic));
    out.push(rbcontext(false, true, false, Syntactic));
    out.push(rbcontext(false, true, true, Syntactic));
    out.push(rbcontext(true, false, false, Syntactic));
    out.push(rbcontext(true, true, false, Syntactic));
    out.push(rbcontext(true, true, true, Syntactic));

    out.push(rule_plain(0, 0));
    out.push(rule_plain(1, 0));
    out.push(rule(1, 1, true, false, NoLex, NoLex, NoLex, Syntactic));

    out.push(rule_plain(0, 1));
    out.push(rule(0, 0, true, false, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, true, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, NoLex, Lex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, Lex, NoLex, Syntactic));

    out.push(ngram(1, 1, false, true, NoLex, NoLex));
    out.push(ngram(2, 1, true, true, NoLex, NoLex));
    out.push(ngram(3, 1, true, true, NoLex, NoLex));
    out.push(ngram(2, 1, false, false, Lex, NoLex));
    out.push(ngram(2, 1, false, false, NoLex, Lex));

    if with_nngram {
        out.push(nngram_dirdist(1, false, true, NoLex, NoLex));
        out.push(nngram_dirdist(2, true, true, NoLex, NoLex));
        out.push(nngram_dirdist(3, true, true, NoLex, NoLex));
        out.push(nngram_dirdist(2, false, false, Lex, NoLex));
        out.push(nngram_dirdist(2, false, false, Lex, Lex));
    }

    out.push(Extractor::Word(Word::new(1)));
    out.push(Extractor::Word(Word::new(2)));
    out.push(Extractor::WordProjection(WordProjection::new(
        Semantic, false, 1,
    )));

    out.push(head_tree(false, Syntactic));
    out.push(head_tree(false, Semantic));
    out.push(head_tree(true, Semantic));

    out.push(heads(2, false, false, Syntactic));
    out.push(heads(2, true, true, Syntactic));
    out.push(heads(2, true, true, Semantic));
    out.push(heads(3, false, false, Syntactic));

    let max_width = 2;
    let max_sum_width = 3;
    for binned in [false, true] {
        for nlp in 0..=max_width {
            for nls in 0..=max_width {
                for nrp in 0..=max_width {
                    for nrs in 0..=max_width {
                        if nlp + nls + nrp + nrs <= max_sum_width {
                            out.push(Extractor::Edges(Edges::new(binned, nlp, nls, nrp, nrs)));
                        }
                    }
                }
            }
        }
    }
    for binned in [false, true] {
        for nlp in 0..=max_width {
            for nls in 0..=max_width {
                for nrp in 0..=max_width {
                    for nrs in 0..=max_width {
                        if nlp + nls + nrp + nrs <= max_sum_width {
                            out.push(Extractor::WordEdges(WordEdges::new(
                                binned, nlp, nls, nrp, nrs,
                            )));
                        }
                    }
                }
            }
        }
    }

    if !local {
        out.push(ngram_tree(2, Lexicalize::None));
        out.push(ngram_tree(2, Lexicalize::All));
        out.push(ngram_tree(3, Lexicalize::Functional));
        out.push(Extractor::CoordParallelism(CoordParallelism::new(false)));
        out.push(Extractor::CoordLenParallelism(CoordLenParallelism));
    }

    out
}

/// `splh` with suffix-truncated head and edge variants.
fn splh_suffix(num_suffix: usize, local: bool) -> Vec<Extractor> {
    let mut out = vec![
        Extractor::NegLogProb(NegLogProb),
        Extractor::RightBranch(RightBranch),
        Extractor::Heavy(Heavy),
    ];

    out.push(rbcontext(false, false, false, Syntactic));
    out.push(rbcontext(false, true, false, Syntactic));
    out.push(rbcontext(false, true, true, Syntactic));
    out.push(rbcontext(true, false, false, Syntactic));
    out.push(rbcontext(true, true, false, Syntactic));
    out.push(rbcontext(true, true, true, Syntactic));

    out.push(rule_plain(0, 0));
    out.push(rule_plain(1, 0));
    out.push(rule(1, 1, true, false, NoLex, NoLex, NoLex, Syntactic));

    out.push(rule_plain(0, 1));
    out.push(rule(0, 0, true, false, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, true, NoLex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, NoLex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, NoLex, Lex, NoLex, Syntactic));
    out.push(rule(0, 0, false, false, Lex, Lex, NoLex, Syntactic));

    out.push(ngram(1, 1, false, true, NoLex, NoLex));
    out.push(ngram(2, 1, true, true, NoLex, NoLex));
    out.push(ngram(3, 1, true, true, NoLex, NoLex));
    out.push(ngram(2, 1, false, false, Lex, NoLex));
    out.push(ngram(2, 1, false, false, NoLex, Lex));

    out.push(Extractor::Word(Word::new(1)));
    out.push(Extractor::Word(Word::new(2)));
    out.push(Extractor::WordProjection(WordProjection::new(
        Semantic, false, 1,
    )));

    out.push(head_tree(false, Syntactic));
    out.push(head_tree(false, Semantic));
    out.push(head_tree(true, Semantic));

    out.push(wsheads(0, 2, PosInfo, PosInfo, Syntactic));
    out.push(wsheads(0, 2, LexInfo, LexInfo, Syntactic));
    out.push(wsheads(0, 2, LexInfo, LexInfo, Semantic));
    out.push(wsheads(0, 3, PosInfo, PosInfo, Syntactic));
    if num_suffix > 0 {
        out.push(wsheads(num_suffix, 2, LexInfo, LexInfo, Syntactic));
    }

    let max_width = 2;
    let max_sum_width = 3;
    for binned in [false, true] {
        for nlp in 0..=max_width {
            for nls in 0..=max_width {
                for nrp in 0..=max_width {
                    for nrs in 0..=max_width {
                        let sum = nlp + nls + nrp + nrs;
                        if sum > max_sum_width {
                            continue;
                        }
                        out.push(ws_edges(
                            EdgeContext::new(0, nlp, 0, 0, 0),
                            EdgeContext::new(0, nls, 0, 0, 0),
                            EdgeContext::new(0, nrp, 0, 0, 0),
                            EdgeContext::new(0, nrs, 0, 0, 0),
                            binned,
                        ));
                        if sum > 0 {
                            out.push(ws_edges(
                                EdgeContext::new(0, nlp, 0, nlp, 0),
                                EdgeContext::new(0, nls, 0, nls, 0),
                                EdgeContext::new(0, nrp, 0, nrp, 0),
                                EdgeContext::new(0, nrs, 0, nrs, 0),
                                binned,
                            ));
                        }
                        if sum > 0 && num_suffix > 0 {
                            out.push(ws_edges(
                                EdgeContext::new(0, nlp, 0, nlp, num_suffix),
                                EdgeContext::new(0, nls, 0, nls, num_suffix),
                                EdgeContext::new(0, nrp, 0, nrp, num_suffix),
                                EdgeContext::new(0, nrs, 0, nrs, num_suffix),
                                binned,
                            ));
                        }
                    }
                }
            }
        }
    }

    if !local {
        out.push(ngram_tree(2, Lexicalize::None));
        out.push(ngram_tree(2, Lexicalize::All));
        out.push(ngram_tree(3, Lexicalize::Functional));
        out.push(Extractor::CoordParallelism(CoordParallelism::new(false)));
        out.push(Extractor::CoordLenParallelism(CoordLenParallelism));
    }

    out
}

/// The `WEdges` grid with POS and word widths varied independently.
fn wedges() -> Vec<Extractor> {
    let mut out = vec![
        Extractor::NegLogProb(NegLogProb),
        Extractor::RightBranch(RightBranch),
        Extractor::Heavy(Heavy),
    ];

    let max_width = 1;
    let max_sum_width = 2;
    for binned in [false, true] {
        for nlp in 0..=max_width {
            for nls in 0..=max_width {
                for nrp in 0..=max_width {
                    for nrs in 0..=max_width {
                        if nlp + nls + nrp + nrs > max_sum_width {
                            continue;
                        }
                        for nlpw in 0..=nlp {
                            for nlsw in 0..=nls {
                                for nrpw in 0..=nrp {
                                    for nrsw in 0..=nrs {
                                        out.push(Extractor::WideEdges(WideEdges::new(
                                            binned,
                                            [nlp, nlpw, nls, nlsw, nrp, nrpw, nrs, nrsw],
                                        )));
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    out
}

/// Combinations of head and edge features.
fn ws(
    head_features: bool,
    edge_features: i32,
    with_ngram: bool,
    with_ngram_tree: bool,
    with_rbcontext: bool,
) -> Vec<Extractor> {
    let mut out = vec![
        Extractor::NegLogProb(NegLogProb),
        Extractor::RightBranch(RightBranch),
        Extractor::Heavy(Heavy),
    ];

    if head_features {
        out.push(wsheads(0, 2, PosInfo, PosInfo, Syntactic));
        out.push(wsheads(0, 2, PosInfo, CcInfo, Syntactic));
        out.push(wsheads(0, 2, CcInfo, PosInfo, Syntactic));
        out.push(wsheads(0, 2, CcInfo, CcInfo, Syntactic));
        out.push(wsheads(0, 2, LexInfo, CcInfo, Syntactic));
        out.push(wsheads(0, 2, CcInfo, LexInfo, Syntactic));
        out.push(wsheads(0, 2, LexInfo, LexInfo, Syntactic));
        out.push(wsheads(0, 2, LexInfo, LexInfo, Semantic));
        out.push(wsheads(0, 3, PosInfo, PosInfo, Syntactic));
        out.push(wsheads(0, 3, PosInfo, PosInfo, Semantic));
        out.push(wsheads(0, 3, PosInfo, CcInfo, Syntactic));
        out.push(wsheads(0, 3, CcInfo, PosInfo, Syntactic));
        out.push(wsheads(0, 3, CcInfo, CcInfo, Syntactic));
    }

    if edge_features != 0 {
        let empty = EdgeContext::default();
        let punct1 = EdgeContext::new(1, 0, 0, 0, 0);
        let pos1 = EdgeContext::new(1, 1, 0, 0, 0);
        let closed1 = EdgeContext::new(1, 1, 1, 0, 0);
        let word1 = EdgeContext::new(1, 1, 1, 1, 0);
        let punct2 = EdgeContext::new(2, 0, 0, 0, 0);

        let contexts = [
            punct1,
            pos1,
            closed1,
            word1,
            punct2,
            EdgeContext::new(2, 1, 0, 0, 0),
            EdgeContext::new(2, 1, 1, 0, 0),
        ];

        for binned in [false, true] {
            if (binned && edge_features == 1) || (!binned && edge_features == 2) {
                continue;
            }
            out.push(ws_edges(empty, empty, empty, empty, binned));
            // punctuation surrounding the whole constituent
            out.push(ws_edges(punct2, empty, empty, punct2, binned));

            for e in contexts {
                out.push(ws_edges(e, empty, empty, empty, binned));
                out.push(ws_edges(empty, e, empty, empty, binned));
                out.push(ws_edges(empty, empty, e, empty, binned));
                out.push(ws_edges(empty, empty, empty, e, binned));

                out.push(ws_edges(e, empty, empty, punct1, binned));
                out.push(ws_edges(empty, e, empty, punct1, binned));
                out.push(ws_edges(empty, empty, e, punct1, binned));

                out.push(ws_edges(e, empty, empty, pos1, binned));
                out.push(ws_edges(empty, e, empty, pos1, binned));
                out.push(ws_edges(empty, empty, e, pos1, binned));

                out.push(ws_edges(e, empty, empty, closed1, binned));
                out.push(ws_edges(empty, e, empty, closed1, binned));
                out.push(ws_edges(empty, empty, e, closed1, binned));
            }
        }
    }

    if with_ngram {
        out.push(ngram(1, 1, false, false, NoLex, NoLex));
        out.push(ngram(1, 1, false, true, NoLex, NoLex));
        out.push(ngram(1, 1, true, false, NoLex, NoLex));
        out.push(ngram(1, 1, true, true, NoLex, NoLex));
        out.push(ngram(2, 1, true, true, NoLex, NoLex));
        out.push(ngram(3, 1, true, true, NoLex, NoLex));
        out.push(ngram(1, 1, false, false, Lex, NoLex));
        out.push(ngram(1, 1, false, false, NoLex, Lex));
        out.push(ngram(1, 1, false, false, Lex, Lex));
        out.push(ngram(2, 1, false, false, Lex, NoLex));
        out.push(ngram(2, 1, false, false, NoLex, Lex));
        out.push(ngram(1, 1, true, false, Lex, NoLex));
        out.push(ngram(1, 1, true, false, NoLex, Lex));
        out.push(ngram(1, 1, true, false, Lex, Lex));
        out.push(ngram(2, 1, true, false, Lex, NoLex));
        out.push(ngram(2, 1, true, false, NoLex, Lex));
        out.push(ngram(1, 1, false, true, Lex, NoLex));
        out.push(ngram(1, 1, false, true, NoLex, Lex));
        out.push(ngram(1, 1, false, true, Lex, Lex));
        out.push(ngram(2, 1, false, true, Lex, NoLex));
        out.push(ngram(2, 1, false, true, NoLex, Lex));
    }

    if with_ngram_tree {
        out.push(ngram_tree(2, Lexicalize::None));
        out.push(ngram_tree(2, Lexicalize::Functional));
        out.push(ngram_tree(2, Lexicalize::All));
        out.push(ngram_tree(3, Lexicalize::None));
        out.push(ngram_tree(3, Lexicalize::Functional));
        out.push(ngram_tree(3, Lexicalize::All));
        out.push(ngram_tree(4, Lexicalize::None));
        out.push(ngram_tree(4, Lexicalize::Functional));
    }

    if with_rbcontext {
        out.push(rbcontext(false, false, false, Syntactic));
        out.push(rbcontext(false, false, true, Syntactic));
        out.push(rbcontext(false, true, false, Syntactic));
        out.push(rbcontext(false, true, true, Syntactic));
        out.push(rbcontext(true, false, false, Syntactic));
        out.push(rbcontext(true, false, true, Syntactic));
        out.push(rbcontext(true, true, false, Syntactic));
        out.push(rbcontext(true, true, true, Syntactic));
    }

    out
}

/// One instance of every extractor kind; exercised by the test suite and
/// handy for smoke-testing new annotation configs.
fn all_kinds() -> Vec<Extractor> {
    let empty = EdgeContext::default();
    let punct1 = EdgeContext::new(1, 0, 0, 0, 0);
    let closed1 = EdgeContext::new(1, 1, 1, 0, 0);
    vec![
        Extractor::NegLogProb(NegLogProb),
        Extractor::NegLogCondProb(NegLogCondProb),
        Extractor::BinnedLogCondProb(BinnedLogCondProb::new(7, 2.0)),
        Extractor::InterpLogCondProb(InterpLogCondProb::new(7, 2.0)),
        rule_plain(0, 1),
        ngram(2, 1, false, false, NoLex, NoLex),
        nngram_dirdist(2, false, false, NoLex, NoLex),
        Extractor::Word(Word::new(1)),
        Extractor::WordProjection(WordProjection::new(Semantic, false, 1)),
        Extractor::SubjVerbAgreement(SubjVerbAgreement),
        Extractor::SynSemHeads(SynSemHeads::new(SynSemAnnotation::None)),
        Extractor::RightBranch(RightBranch),
        Extractor::LeftBranchLength(LeftBranchLength),
        Extractor::RightBranchLength(RightBranchLength),
        rbcontext(true, true, true, Syntactic),
        heads(2, true, true, Syntactic),
        wsheads(0, 2, LexInfo, LexInfo, Syntactic),
        Extractor::Neighbours(Neighbours::new(1, 1)),
        Extractor::Edges(Edges::new(true, 1, 1, 1, 1)),
        Extractor::WordEdges(WordEdges::new(false, 1, 1, 0, 0)),
        Extractor::WordNeighbours(WordNeighbours::new(true, 1, 1)),
        Extractor::WideEdges(WideEdges::new(false, [1, 1, 0, 0, 0, 0, 1, 1])),
        ws_edges(closed1, empty, empty, punct1, true),
        Extractor::Heavy(Heavy),
        ngram_tree(2, Lexicalize::All),
        head_tree(true, Semantic),
        Extractor::CoordParallelism(CoordParallelism::new(false)),
        Extractor::CoordLenParallelism(CoordLenParallelism),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_unknown_set_name_is_rejected() {
        assert!(extractor_set(Some("no-such-set")).is_err());
        assert!(extractor_set(None).is_ok());
    }

    #[test]
    fn test_identifiers_are_unique_within_each_set() {
        for name in [
            "nfeatures",
            "sfeatures",
            "conll",
            "splh",
            "splhnn",
            "splhlocal",
            "splhsuffix0",
            "splhsuffix1",
            "splhsuffix3",
            "wedges",
            "wshead",
            "wsedge",
            "wsedge0",
            "wsedge1",
            "wsngram",
            "wsngramtree",
            "wsrbcontext",
            "ws",
            "wsall",
            "all",
        ] {
            let set = extractor_set(Some(name)).unwrap();
            assert!(!set.is_empty(), "set {} is empty", name);
            let idents: HashSet<String> = set
                .iter()
                .map(|e| e.identifier().to_string())
                .collect();
            assert_eq!(
                idents.len(),
                set.len(),
                "duplicate identifiers in set {}",
                name
            );
        }
    }

    #[test]
    fn test_identifier_format_matches_convention() {
        let set = extractor_set(Some("nfeatures")).unwrap();
        let idents: Vec<&str> = set.iter().map(|e| e.identifier()).collect();
        assert!(idents.contains(&"Rule:0:1:false:false:none:none:none:syntactic"));
        assert!(idents.contains(&"WSHeads:0:true:2:pos:pos:syntactic"));
        assert!(idents.contains(&"CoPar:false"));
        assert!(idents.contains(&"NLogP"));
    }
}
