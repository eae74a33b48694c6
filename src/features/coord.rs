use crate::features::key::FeatureKey;
use crate::features::FeatureCounts;
use crate::syntax::tree::{NodeId, Parse, ParseTree};

/// Result of comparing two conjuncts: 0 = mismatch, 1 = match with
/// substructure at the probed depth, -1 = match but nothing left to compare.
type Match = i64;

/// Structural parallelism of adjacent conjuncts, probed at depths 1..=5.
/// Only definite matches and mismatches are emitted.
#[derive(Debug, Clone)]
pub struct CoordParallelism {
    ignore_preterms: bool,
    identifier: String,
}

impl CoordParallelism {
    pub fn new(ignore_preterms: bool) -> Self {
        Self {
            ignore_preterms,
            identifier: format!("CoPar:{}", ignore_preterms),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        for node in tree.pre_order() {
            if !tree.is_coordination(node) {
                continue;
            }
            for depth in 1..=5 {
                let mut last_child: Option<NodeId> = None;
                for child in tree.children(node) {
                    let n = tree.node(child);
                    if n.punctuation || n.conjunction {
                        continue;
                    }
                    if let Some(last) = last_child {
                        let m = self.match_nodes(tree, depth, last, child);
                        if m != -1 {
                            *counts
                                .entry(FeatureKey::IntPair(depth, m))
                                .or_insert(0.0) += 1.0;
                        }
                    }
                    last_child = Some(child);
                }
            }
        }
    }

    fn match_nodes(&self, tree: &ParseTree, depth: i64, a: NodeId, b: NodeId) -> Match {
        if tree.node(a).category != tree.node(b).category {
            return 0;
        }
        if depth == 1 {
            return 1;
        }
        if tree.node(a).is_preterminal() {
            return -1;
        }
        self.match_chains(
            tree,
            depth - 1,
            tree.node(a).first_child,
            tree.node(b).first_child,
        )
    }

    fn match_chains(
        &self,
        tree: &ParseTree,
        depth: i64,
        mut a: Option<NodeId>,
        mut b: Option<NodeId>,
    ) -> Match {
        if self.ignore_preterms {
            while a.is_some_and(|n| tree.node(n).is_preterminal()) {
                a = tree.node(a.unwrap()).next_sibling;
            }
            while b.is_some_and(|n| tree.node(n).is_preterminal()) {
                b = tree.node(b.unwrap()).next_sibling;
            }
        }

        let a = match a {
            Some(a) => a,
            None => return if b.is_none() { -1 } else { 0 },
        };
        let b = match b {
            Some(b) => b,
            None => return 0,
        };

        let m1 = self.match_nodes(tree, depth, a, b);
        let m2 = self.match_chains(
            tree,
            depth,
            tree.node(a).next_sibling,
            tree.node(b).next_sibling,
        );

        if m1 == 0 || m2 == 0 {
            0
        } else if m1 == 1 || m2 == 1 {
            1
        } else {
            -1
        }
    }
}

/// Signed length difference of adjacent conjuncts, clamped to [-5, 5] and
/// paired with a last-conjunct flag.
#[derive(Debug, Clone)]
pub struct CoordLenParallelism;

impl CoordLenParallelism {
    pub fn identifier(&self) -> &str {
        "CoLenPar"
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        for node in tree.pre_order() {
            if !tree.is_coordination(node) {
                continue;
            }
            let mut last_child: Option<NodeId> = None;
            let mut last_size: i64 = 0;
            for child in tree.children(node) {
                let n = tree.node(child);
                if n.punctuation || n.conjunction {
                    continue;
                }
                let size = (n.right - n.left) as i64;
                if last_child.is_some() {
                    let dsize = (size - last_size).clamp(-5, 5);
                    let is_last = tree.node(child).next_sibling.is_none() as i64;
                    *counts
                        .entry(FeatureKey::IntPair(dsize, is_last))
                        .or_insert(0.0) += 1.0;
                }
                last_child = Some(child);
                last_size = size;
            }
        }
    }
}
