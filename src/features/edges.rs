use crate::features::common::{end_marker, quantize, symbol_quantize, zero_marker};
use crate::features::key::FeatureKey;
use crate::features::FeatureCounts;
use crate::syntax::symbol::Symbol;
use crate::syntax::tree::{NodeId, Parse, ParseTree};

/// Category, quantized length, and POS context around each nonterminal.
///
/// The left window starts at `left` rather than `left - 1`; kept that way for
/// compatibility with models trained on the historical behavior.
#[derive(Debug, Clone)]
pub struct Neighbours {
    num_left: usize,
    num_right: usize,
    identifier: String,
}

impl Neighbours {
    pub fn new(num_left: usize, num_right: usize) -> Self {
        Self {
            num_left,
            num_right,
            identifier: format!("Neighbours:{}:{}", num_left, num_right),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        let preterms = tree.preterminals();
        for node in tree.pre_order() {
            if !tree.node(node).is_nonterminal() {
                continue;
            }
            let left = tree.node(node).left;
            let right = tree.node(node).right;

            let ints = vec![quantize(right - left)];
            let mut syms = vec![tree.node(node).category];

            for i in 0..self.num_left {
                syms.push(if i <= left {
                    tree.node(preterms[left - i]).category
                } else {
                    end_marker()
                });
            }
            for i in 0..self.num_right {
                syms.push(if right + i < preterms.len() {
                    tree.node(preterms[right + i]).category
                } else {
                    end_marker()
                });
            }

            *counts
                .entry(FeatureKey::IntsSyms(ints, syms))
                .or_insert(0.0) += 1.0;
        }
    }
}

/// POS context just inside and outside both constituent edges.
#[derive(Debug, Clone)]
pub struct Edges {
    binned_length: bool,
    num_left_prec: usize,
    num_left_succ: usize,
    num_right_prec: usize,
    num_right_succ: usize,
    identifier: String,
}

impl Edges {
    pub fn new(
        binned_length: bool,
        num_left_prec: usize,
        num_left_succ: usize,
        num_right_prec: usize,
        num_right_succ: usize,
    ) -> Self {
        Self {
            binned_length,
            num_left_prec,
            num_left_succ,
            num_right_prec,
            num_right_succ,
            identifier: format!(
                "Edges:{}:{}:{}:{}:{}",
                binned_length, num_left_prec, num_left_succ, num_right_prec, num_right_succ
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        edge_context(
            parse,
            self.binned_length,
            self.num_left_prec,
            self.num_left_succ,
            self.num_right_prec,
            self.num_right_succ,
            |tree, pt| tree.node(pt).category,
            counts,
        );
    }
}

/// Word context just inside and outside both constituent edges.
#[derive(Debug, Clone)]
pub struct WordEdges {
    binned_length: bool,
    num_left_prec: usize,
    num_left_succ: usize,
    num_right_prec: usize,
    num_right_succ: usize,
    identifier: String,
}

impl WordEdges {
    pub fn new(
        binned_length: bool,
        num_left_prec: usize,
        num_left_succ: usize,
        num_right_prec: usize,
        num_right_succ: usize,
    ) -> Self {
        Self {
            binned_length,
            num_left_prec,
            num_left_succ,
            num_right_prec,
            num_right_succ,
            identifier: format!(
                "WordEdges:{}:{}:{}:{}:{}",
                binned_length, num_left_prec, num_left_succ, num_right_prec, num_right_succ
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        edge_context(
            parse,
            self.binned_length,
            self.num_left_prec,
            self.num_left_succ,
            self.num_right_prec,
            self.num_right_succ,
            |tree, pt| tree.word(pt),
            counts,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn edge_context(
    parse: &Parse,
    binned_length: bool,
    num_left_prec: usize,
    num_left_succ: usize,
    num_right_prec: usize,
    num_right_succ: usize,
    label_of: impl Fn(&ParseTree, NodeId) -> Symbol,
    counts: &mut FeatureCounts,
) {
    let tree = &parse.tree;
    let preterms = tree.preterminals();
    let nwords = preterms.len();

    for node in tree.pre_order() {
        if !tree.node(node).is_nonterminal() {
            continue;
        }
        let left = tree.node(node).left;
        let right = tree.node(node).right;

        let mut f = Vec::new();
        if binned_length {
            f.push(symbol_quantize(right - left));
        }
        f.push(tree.node(node).category);

        for i in 1..=num_left_prec {
            f.push(if i <= left {
                label_of(tree, preterms[left - i])
            } else {
                end_marker()
            });
        }
        for i in 0..num_left_succ {
            f.push(if left + i < nwords {
                label_of(tree, preterms[left + i])
            } else {
                end_marker()
            });
        }
        for i in 1..=num_right_prec {
            f.push(if i <= right {
                label_of(tree, preterms[right - i])
            } else {
                end_marker()
            });
        }
        for i in 0..num_right_succ {
            f.push(if right + i < nwords {
                label_of(tree, preterms[right + i])
            } else {
                end_marker()
            });
        }

        *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
    }
}

/// Word context around each nonterminal (same historical left window as
/// [`Neighbours`]).
#[derive(Debug, Clone)]
pub struct WordNeighbours {
    binned_length: bool,
    num_left: usize,
    num_right: usize,
    identifier: String,
}

impl WordNeighbours {
    pub fn new(binned_length: bool, num_left: usize, num_right: usize) -> Self {
        Self {
            binned_length,
            num_left,
            num_right,
            identifier: format!(
                "WordNeighbours:{}:{}:{}",
                binned_length, num_left, num_right
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        let preterms = tree.preterminals();

        for node in tree.pre_order() {
            if !tree.node(node).is_nonterminal() {
                continue;
            }
            let left = tree.node(node).left;
            let right = tree.node(node).right;

            let mut f = Vec::new();
            if self.binned_length {
                f.push(symbol_quantize(right - left));
            }
            f.push(tree.node(node).category);

            for i in 0..self.num_left {
                f.push(if i <= left {
                    tree.word(preterms[left - i])
                } else {
                    end_marker()
                });
            }
            for i in 0..self.num_right {
                f.push(if right + i < preterms.len() {
                    tree.word(preterms[right + i])
                } else {
                    end_marker()
                });
            }

            *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
        }
    }
}

/// POS and word context around both edges, with independent widths per side.
#[derive(Debug, Clone)]
pub struct WideEdges {
    binned_length: bool,
    widths: [usize; 8], // lp, lpw, ls, lsw, rp, rpw, rs, rsw
    identifier: String,
}

impl WideEdges {
    #[allow(clippy::too_many_arguments)]
    pub fn new(binned_length: bool, widths: [usize; 8]) -> Self {
        let identifier = format!(
            "WEdges:{}:{}:{}:{}:{}:{}:{}:{}:{}",
            binned_length,
            widths[0],
            widths[1],
            widths[2],
            widths[3],
            widths[4],
            widths[5],
            widths[6],
            widths[7]
        );
        Self {
            binned_length,
            widths,
            identifier,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        let preterms = tree.preterminals();
        let nwords = preterms.len();
        let [lp, lpw, ls, lsw, rp, rpw, rs, rsw] = self.widths;

        for node in tree.pre_order() {
            if !tree.node(node).is_nonterminal() {
                continue;
            }
            let left = tree.node(node).left;
            let right = tree.node(node).right;

            let mut f = Vec::new();
            if self.binned_length {
                f.push(symbol_quantize(right - left));
            }
            f.push(tree.node(node).category);

            for i in 1..=lp {
                f.push(if i <= left {
                    tree.node(preterms[left - i]).category
                } else {
                    end_marker()
                });
            }
            for i in 1..=lpw {
                f.push(if i <= left {
                    tree.word(preterms[left - i])
                } else {
                    end_marker()
                });
            }
            for i in 0..ls {
                f.push(if left + i < nwords {
                    tree.node(preterms[left + i]).category
                } else {
                    end_marker()
                });
            }
            for i in 0..lsw {
                f.push(if left + i < nwords {
                    tree.word(preterms[left + i])
                } else {
                    end_marker()
                });
            }
            for i in 1..=rp {
                f.push(if i <= right {
                    tree.node(preterms[right - i]).category
                } else {
                    end_marker()
                });
            }
            for i in 1..=rpw {
                f.push(if i <= right {
                    tree.word(preterms[right - i])
                } else {
                    end_marker()
                });
            }
            for i in 0..rs {
                f.push(if right + i < nwords {
                    tree.node(preterms[right + i]).category
                } else {
                    end_marker()
                });
            }
            for i in 0..rsw {
                f.push(if right + i < nwords {
                    tree.word(preterms[right + i])
                } else {
                    end_marker()
                });
            }

            *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
        }
    }
}

/// How far one side of a constituent edge looks into punctuation, POS,
/// closed-class and (suffix-truncated) word context.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeContext {
    pub punct: usize,
    pub pos: usize,
    pub closed: usize,
    pub word: usize,
    pub num_suffix: usize,
}

impl EdgeContext {
    pub fn new(punct: usize, pos: usize, closed: usize, word: usize, num_suffix: usize) -> Self {
        Self {
            punct,
            pos,
            closed,
            word,
            num_suffix,
        }
    }

    fn identifier(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.punct, self.pos, self.closed, self.word, self.num_suffix
        )
    }

    fn width(&self) -> usize {
        self.punct.max(self.pos).max(self.word)
    }

    fn push_features(
        &self,
        tree: &ParseTree,
        preterms: &[NodeId],
        position: i64,
        direction: i64,
        f: &mut Vec<Symbol>,
    ) {
        let n = preterms.len() as i64;
        let at = |j: i64| -> Option<NodeId> {
            if j < 0 || j >= n {
                None
            } else {
                Some(preterms[j as usize])
            }
        };

        for i in 0..self.punct as i64 {
            f.push(match at(position + i * direction) {
                None => end_marker(),
                Some(pt) => {
                    if tree.node(pt).punctuation {
                        tree.node(pt).category
                    } else {
                        zero_marker()
                    }
                }
            });
        }
        for i in 0..self.pos as i64 {
            f.push(match at(position + i * direction) {
                None => end_marker(),
                Some(pt) => tree.node(pt).category,
            });
        }
        for i in 0..self.closed as i64 {
            f.push(match at(position + i * direction) {
                None => end_marker(),
                Some(pt) => {
                    let node = tree.node(pt);
                    if node.closed_class || node.punctuation {
                        tree.word(pt)
                    } else {
                        node.category
                    }
                }
            });
        }
        for i in 0..self.word as i64 {
            f.push(match at(position + i * direction) {
                None => end_marker(),
                Some(pt) => tree.word(pt).suffix(self.num_suffix),
            });
        }
    }
}

/// Edge context with a descriptor per side of each edge; windows never cross
/// into the opposite edge.
#[derive(Debug, Clone)]
pub struct ContextEdges {
    left_left: EdgeContext,
    left_right: EdgeContext,
    right_left: EdgeContext,
    right_right: EdgeContext,
    binned_length: bool,
    identifier: String,
}

impl ContextEdges {
    pub fn new(
        left_left: EdgeContext,
        left_right: EdgeContext,
        right_left: EdgeContext,
        right_right: EdgeContext,
        binned_length: bool,
    ) -> Self {
        let identifier = format!(
            "WSEdges:{}:ll{}:lr{}:rl{}:rr{}",
            binned_length,
            left_left.identifier(),
            left_right.identifier(),
            right_left.identifier(),
            right_right.identifier()
        );
        Self {
            left_left,
            left_right,
            right_left,
            right_right,
            binned_length,
            identifier,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        let preterms = tree.preterminals();
        let nwords = preterms.len();

        for node in tree.pre_order() {
            if !tree.node(node).is_nonterminal() {
                continue;
            }
            let left = tree.node(node).left;
            let right = tree.node(node).right;

            // don't permit a window to overlap both edges
            if left + self.left_right.width() > right || left + self.right_left.width() > right {
                continue;
            }
            if left + 1 < self.left_left.width() {
                continue;
            }
            if right + self.right_right.width() > nwords {
                continue;
            }

            let mut f = vec![tree.node(node).category];
            if self.binned_length {
                f.push(symbol_quantize(right - left));
            }

            self.left_left
                .push_features(tree, preterms, left as i64 - 1, -1, &mut f);
            self.left_right
                .push_features(tree, preterms, left as i64, 1, &mut f);
            self.right_left
                .push_features(tree, preterms, right as i64 - 1, -1, &mut f);
            self.right_right
                .push_features(tree, preterms, right as i64, 1, &mut f);

            *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
        }
    }
}

/// Quantized size and end-of-sentence distance of each constituent, with
/// final and following punctuation.
#[derive(Debug, Clone)]
pub struct Heavy;

impl Heavy {
    pub fn identifier(&self) -> &str {
        "Heavy"
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        let preterms = tree.preterminals();
        let nwords = preterms.len();

        for node in tree.pre_order() {
            if !tree.node(node).is_nonterminal() {
                continue;
            }
            let left = tree.node(node).left;
            let right = tree.node(node).right;

            let mut final_punct = end_marker();
            let mut following_punct = end_marker();
            if tree.node(preterms[right - 1]).punctuation {
                final_punct = tree.word(preterms[right - 1]);
            }
            if right < nwords && tree.node(preterms[right]).punctuation {
                following_punct = tree.word(preterms[right]);
            }

            let ints = vec![quantize(right - left), quantize(nwords - right)];
            let syms = vec![tree.node(node).category, final_punct, following_punct];

            *counts
                .entry(FeatureKey::IntsSyms(ints, syms))
                .or_insert(0.0) += 1.0;
        }
    }
}
