use crate::features::common::InfoLevel;
use crate::features::key::FeatureKey;
use crate::features::FeatureCounts;
use crate::syntax::symbol::Symbol;
use crate::syntax::tree::{HeadType, NodeId, Parse, ParseTree};

/// Head-to-head dependency chains of `num_heads` governors above each
/// preterminal. Coordination nodes are transparent: every same-category
/// conjunct counts as a parallel governor, enumerated in continuation-passing
/// style.
#[derive(Debug, Clone)]
pub struct Heads {
    num_heads: usize,
    governor_lex: bool,
    dependent_lex: bool,
    head_type: HeadType,
    identifier: String,
}

impl Heads {
    pub fn new(
        num_heads: usize,
        governor_lex: bool,
        dependent_lex: bool,
        head_type: HeadType,
    ) -> Self {
        Self {
            num_heads,
            governor_lex,
            dependent_lex,
            head_type,
            identifier: format!(
                "Heads:{}:{}:{}:{}",
                num_heads, governor_lex, dependent_lex, head_type
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        for node in tree.pre_order() {
            if !tree.node(node).is_preterminal() {
                continue;
            }
            let mut f = vec![tree.node(node).category];
            if self.dependent_lex {
                f.push(tree.word(node));
            }
            self.visit_ancestors(tree, node, 1, &mut f, counts);
        }
    }

    fn visit_ancestors(
        &self,
        tree: &ParseTree,
        node: NodeId,
        nsofar: usize,
        f: &mut Vec<Symbol>,
        counts: &mut FeatureCounts,
    ) {
        if nsofar == self.num_heads {
            *counts.entry(FeatureKey::Syms(f.clone())).or_insert(0.0) += 1.0;
            return;
        }

        let ancestor = match tree.node(node).parent {
            Some(a) => a,
            None => return, // ran out of ancestors before finding enough governors
        };

        if tree.is_coordination(ancestor) {
            self.visit_ancestors(tree, ancestor, nsofar, f, counts);
        } else {
            match tree.head_child(ancestor, self.head_type) {
                Some(hchild) if hchild != node => {
                    self.visit_governors(tree, ancestor, nsofar, f, hchild, counts)
                }
                _ => self.visit_ancestors(tree, ancestor, nsofar, f, counts),
            }
        }
    }

    fn visit_governors(
        &self,
        tree: &ParseTree,
        ancestor: NodeId,
        nsofar: usize,
        f: &mut Vec<Symbol>,
        head: NodeId,
        counts: &mut FeatureCounts,
    ) {
        if tree.node(head).is_preterminal() {
            let old_len = f.len();
            f.push(tree.node(head).category);
            if self.governor_lex {
                f.push(tree.word(head));
            }
            self.visit_ancestors(tree, ancestor, nsofar + 1, f, counts);
            f.truncate(old_len);
        } else {
            let hchild = tree.head_child(head, self.head_type);
            if tree.is_coordination(head) {
                // every conjunct's head is a parallel governor
                let head_cat = tree.node(head).category;
                for child in tree.children(head) {
                    let ccat = tree.node(child).category;
                    if ccat == head_cat
                        || hchild.is_some_and(|h| ccat == tree.node(h).category)
                    {
                        self.visit_governors(tree, ancestor, nsofar, f, child, counts);
                    }
                }
            } else if let Some(h) = hchild {
                self.visit_governors(tree, ancestor, nsofar, f, h, counts);
            }
        }
    }
}

/// [`Heads`] generalized to pos/closed-class/lexical granularity per
/// endpoint, with optional suffix truncation of words and optional
/// distribution over coordination.
#[derive(Debug, Clone)]
pub struct WordHeads {
    num_suffix: usize,
    distribute: bool,
    num_heads: usize,
    governor_info: InfoLevel,
    dependent_info: InfoLevel,
    head_type: HeadType,
    identifier: String,
}

impl WordHeads {
    pub fn new(
        num_suffix: usize,
        distribute: bool,
        num_heads: usize,
        governor_info: InfoLevel,
        dependent_info: InfoLevel,
        head_type: HeadType,
    ) -> Self {
        Self {
            num_suffix,
            distribute,
            num_heads,
            governor_info,
            dependent_info,
            head_type,
            identifier: format!(
                "WSHeads:{}:{}:{}:{}:{}:{}",
                num_suffix, distribute, num_heads, governor_info, dependent_info, head_type
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        for node in tree.pre_order() {
            if !tree.node(node).is_preterminal() {
                continue;
            }
            let mut f = vec![tree.node(node).category];
            match self.dependent_info {
                InfoLevel::ClosedClass => f.push(tree.word(node)),
                InfoLevel::Lexical => f.push(tree.word(node).suffix(self.num_suffix)),
                InfoLevel::Pos => {}
            }
            self.visit_ancestors(tree, node, 1, &mut f, counts);
        }
    }

    fn visit_ancestors(
        &self,
        tree: &ParseTree,
        node: NodeId,
        nsofar: usize,
        f: &mut Vec<Symbol>,
        counts: &mut FeatureCounts,
    ) {
        if nsofar == self.num_heads {
            *counts.entry(FeatureKey::Syms(f.clone())).or_insert(0.0) += 1.0;
            return;
        }

        let ancestor = match tree.node(node).parent {
            Some(a) => a,
            None => return,
        };

        if tree.is_coordination(ancestor) {
            // without distribution, only the rightmost conjunct climbs out
            if self.distribute || tree.node(node).next_sibling.is_none() {
                self.visit_ancestors(tree, ancestor, nsofar, f, counts);
            }
        } else {
            match tree.head_child(ancestor, self.head_type) {
                Some(hchild) if hchild != node => {
                    self.visit_governors(tree, ancestor, nsofar, f, hchild, counts)
                }
                _ => self.visit_ancestors(tree, ancestor, nsofar, f, counts),
            }
        }
    }

    fn visit_governors(
        &self,
        tree: &ParseTree,
        ancestor: NodeId,
        nsofar: usize,
        f: &mut Vec<Symbol>,
        head: NodeId,
        counts: &mut FeatureCounts,
    ) {
        if tree.node(head).is_preterminal() {
            let old_len = f.len();
            f.push(tree.node(head).category);
            match self.governor_info {
                InfoLevel::ClosedClass => f.push(tree.word(head)),
                InfoLevel::Lexical => f.push(tree.word(head).suffix(self.num_suffix)),
                InfoLevel::Pos => {}
            }
            self.visit_ancestors(tree, ancestor, nsofar + 1, f, counts);
            f.truncate(old_len);
        } else if tree.is_coordination(head) && self.distribute {
            let head_cat = tree.node(head).category;
            for child in tree.children(head) {
                if tree.node(child).category == head_cat {
                    self.visit_governors(tree, ancestor, nsofar, f, child, counts);
                }
            }
        } else if let Some(h) = tree.head_child(head, self.head_type) {
            self.visit_governors(tree, ancestor, nsofar, f, h, counts);
        }
    }
}
