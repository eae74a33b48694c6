use crate::features::common::{conjunct_marker, posthead_marker, symbol_quantize};
use crate::features::key::FeatureKey;
use crate::features::FeatureCounts;
use crate::syntax::tree::{HeadType, NodeId, Parse, ParseTree};

/// Counts nodes on and off the rightmost branch (punctuation excepted).
#[derive(Debug, Clone)]
pub struct RightBranch;

impl RightBranch {
    pub fn identifier(&self) -> &str {
        "RightBranch"
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        Self::visit(tree, tree.root(), 1, counts);
    }

    /// `rightmost` is 1 iff every ancestor step from the root reached this
    /// node through its last non-punctuation child.
    fn visit(tree: &ParseTree, id: NodeId, mut rightmost: i64, counts: &mut FeatureCounts) -> i64 {
        if let Some(next) = tree.node(id).next_sibling {
            rightmost = Self::visit(tree, next, rightmost, counts);
        }
        if tree.node(id).punctuation {
            return rightmost;
        }
        *counts.entry(FeatureKey::Bin(rightmost)).or_insert(0.0) += 1.0;
        if tree.node(id).is_nonterminal() {
            Self::visit(tree, tree.node(id).first_child.unwrap(), rightmost, counts);
        }
        0
    }
}

/// Log2-binned length of the left-branching chain above each preterminal.
#[derive(Debug, Clone)]
pub struct LeftBranchLength;

impl LeftBranchLength {
    pub fn identifier(&self) -> &str {
        "LeftBranchLength"
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        Self::visit(tree, Some(tree.root()), 1, counts);
    }

    fn visit(tree: &ParseTree, id: Option<NodeId>, leftmost: i64, counts: &mut FeatureCounts) {
        let id = match id {
            Some(id) => id,
            None => return,
        };
        let node = tree.node(id);
        if node.punctuation {
            Self::visit(tree, node.next_sibling, leftmost, counts);
        } else {
            if node.is_preterminal() {
                let bin = (leftmost as f32).log2() as i64;
                *counts.entry(FeatureKey::Bin(bin)).or_insert(0.0) += 1.0;
            } else {
                Self::visit(tree, node.first_child, leftmost + 1, counts);
            }
            Self::visit(tree, node.next_sibling, 1, counts);
        }
    }
}

/// Log2-binned length of the right-branching chain above each preterminal.
#[derive(Debug, Clone)]
pub struct RightBranchLength;

impl RightBranchLength {
    pub fn identifier(&self) -> &str {
        "RightBranchLength"
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        Self::visit(tree, tree.root(), 1, counts);
    }

    fn visit(tree: &ParseTree, id: NodeId, mut rightmost: i64, counts: &mut FeatureCounts) -> i64 {
        let node = tree.node(id);
        if let Some(next) = node.next_sibling {
            rightmost = Self::visit(tree, next, rightmost, counts);
        }
        if node.punctuation {
            return rightmost;
        }
        if node.is_preterminal() {
            let bin = (rightmost as f32).log2() as i64;
            *counts.entry(FeatureKey::Bin(bin)).or_insert(0.0) += 1.0;
        } else if node.is_nonterminal() {
            Self::visit(tree, node.first_child.unwrap(), rightmost + 1, counts);
        }
        1
    }
}

/// Per-child right-edge context: each non-head child's category and the
/// quantized distance of its lexical head from its right edge, optionally
/// annotated with coordination, parent and governor information.
#[derive(Debug, Clone)]
pub struct RuleContext {
    label_coordination: bool,
    label_parent: bool,
    label_governor: bool,
    head_type: HeadType,
    identifier: String,
}

impl RuleContext {
    pub fn new(
        label_coordination: bool,
        label_parent: bool,
        label_governor: bool,
        head_type: HeadType,
    ) -> Self {
        Self {
            label_coordination,
            label_parent,
            label_governor,
            head_type,
            identifier: format!(
                "RBContext:{}:{}:{}:{}",
                label_coordination, label_parent, label_governor, head_type
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        for node in tree.pre_order() {
            self.node_count(tree, node, counts);
        }
    }

    fn node_count(&self, tree: &ParseTree, node: NodeId, counts: &mut FeatureCounts) {
        if !tree.node(node).is_nonterminal() {
            return;
        }
        let hchild = match tree.head_child(node, self.head_type) {
            Some(h) => h,
            None => return,
        };
        let head_lex = match tree.lex_head(hchild, self.head_type) {
            Some(h) => h,
            None => return,
        };

        let mut f = Vec::new();
        if self.label_coordination && tree.is_coordination(node) {
            f.push(conjunct_marker());
        }
        if self.label_parent {
            f.push(tree.node(node).category);
        }
        if self.label_governor {
            f.push(tree.node(hchild).category);
            f.push(symbol_quantize(
                tree.node(hchild).right - tree.node(head_lex).right,
            ));
        }

        for child in tree.children(node) {
            if child == hchild {
                f.push(posthead_marker());
                continue;
            }
            let lex = match tree.lex_head(child, self.head_type) {
                Some(l) => l,
                None => continue,
            };
            f.push(tree.node(child).category);
            f.push(symbol_quantize(tree.node(child).right - tree.node(lex).right));
            *counts.entry(FeatureKey::Syms(f.clone())).or_insert(0.0) += 1.0;
            f.pop();
            f.pop();
        }
    }
}
