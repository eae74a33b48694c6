use std::fmt;

use crate::features::key::FeatureKey;
use crate::features::FeatureCounts;
use crate::syntax::symbol::Symbol;
use crate::syntax::tree::{HeadType, NodeId, Parse, ParseTree};

/// A detached copy of part of a parse, used only as a printable feature key.
struct Fragment {
    category: Symbol,
    children: Vec<Fragment>,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.children.is_empty() {
            return write!(f, "{}", self.category);
        }
        write!(f, "({}", self.category)?;
        for child in &self.children {
            write!(f, " {}", child)?;
        }
        f.write_str(")")
    }
}

/// Which preterminals of a fragment keep their word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexicalize {
    None,
    ClosedClass,
    Functional,
    All,
}

impl fmt::Display for Lexicalize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lexicalize::None => "none",
            Lexicalize::ClosedClass => "closedclass",
            Lexicalize::Functional => "functional",
            Lexicalize::All => "all",
        })
    }
}

/// The minimal connected fragment covering each `ngram`-token window,
/// optionally collapsing branches that do not overlap the window.
#[derive(Debug, Clone)]
pub struct NGramTree {
    ngram: usize,
    lexicalize: Lexicalize,
    collapse: bool,
    num_ancs: usize,
    identifier: String,
}

impl NGramTree {
    pub fn new(ngram: usize, lexicalize: Lexicalize, collapse: bool, num_ancs: usize) -> Self {
        Self {
            ngram,
            lexicalize,
            collapse,
            num_ancs,
            identifier: format!("NGramTree:{}:{}:{}:{}", ngram, lexicalize, collapse, num_ancs),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        let preterms = tree.preterminals();

        for i in 0..preterms.len() {
            if i + self.ngram >= preterms.len() {
                break;
            }

            // lowest ancestor covering the whole window
            let mut t0 = preterms[i];
            while tree.node(t0).right < i + self.ngram {
                t0 = match tree.node(t0).parent {
                    Some(p) => p,
                    None => break,
                };
            }
            let mut cover = Some(t0);
            for _ in 0..self.num_ancs {
                cover = cover.and_then(|n| tree.node(n).parent);
            }
            let cover = match cover {
                Some(c) => c,
                None => return,
            };

            let frag = self.copy_node(tree, cover, i, i + self.ngram);
            *counts
                .entry(FeatureKey::Fragment(frag.to_string()))
                .or_insert(0.0) += 1.0;
        }
    }

    fn copy_node(&self, tree: &ParseTree, id: NodeId, left: usize, right: usize) -> Fragment {
        let node = tree.node(id);
        let overlaps = node.left < right && node.right > left;
        let lex_ok = node.is_nonterminal()
            || match self.lexicalize {
                Lexicalize::All => true,
                Lexicalize::Functional => node.function_word,
                Lexicalize::ClosedClass => node.closed_class,
                Lexicalize::None => false,
            };
        let children = if node.first_child.is_some() && overlaps && lex_ok {
            self.copy_chain(tree, node.first_child, left, right)
        } else {
            Vec::new()
        };
        Fragment {
            category: node.category,
            children,
        }
    }

    fn copy_chain(
        &self,
        tree: &ParseTree,
        first: Option<NodeId>,
        left: usize,
        right: usize,
    ) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut cur = first;
        while let Some(id) = cur {
            let node = tree.node(id);
            if self.collapse {
                if node.right <= left {
                    cur = node.next_sibling;
                    continue;
                }
                if node.left >= right {
                    break;
                }
            }
            out.push(self.copy_node(tree, id, left, right));
            cur = node.next_sibling;
        }
        out
    }
}

/// The projection chain of each preterminal through head-child links,
/// optionally collapsed around the head position and lexicalized at the head.
#[derive(Debug, Clone)]
pub struct HeadTree {
    collapse: bool,
    lexicalize: bool,
    num_ancs: usize,
    head_type: HeadType,
    identifier: String,
}

impl HeadTree {
    pub fn new(collapse: bool, lexicalize: bool, num_ancs: usize, head_type: HeadType) -> Self {
        Self {
            collapse,
            lexicalize,
            num_ancs,
            head_type,
            identifier: format!(
                "HeadTree:{}:{}:{}:{}",
                collapse, lexicalize, num_ancs, head_type
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        let preterms = tree.preterminals();

        for (i, &preterm) in preterms.iter().enumerate() {
            // project upward while we remain the head child
            let mut t0 = preterm;
            loop {
                let parent = match tree.node(t0).parent {
                    Some(p) => p,
                    None => break,
                };
                if tree.head_child(parent, self.head_type) != Some(t0) {
                    break;
                }
                t0 = parent;
            }
            let mut top = Some(t0);
            for _ in 0..self.num_ancs {
                top = top.and_then(|n| tree.node(n).parent);
            }
            let top = match top {
                Some(t) => t,
                None => return,
            };

            let frag = self.copy_node(tree, top, i);
            *counts
                .entry(FeatureKey::Fragment(frag.to_string()))
                .or_insert(0.0) += 1.0;
        }
    }

    fn copy_node(&self, tree: &ParseTree, id: NodeId, head_left: usize) -> Fragment {
        let node = tree.node(id);
        let keep_children =
            node.is_nonterminal() || (self.lexicalize && node.left == head_left);
        let children = if node.first_child.is_some() && keep_children {
            self.copy_chain(tree, node.first_child, head_left)
        } else {
            Vec::new()
        };
        Fragment {
            category: node.category,
            children,
        }
    }

    fn copy_chain(
        &self,
        tree: &ParseTree,
        first: Option<NodeId>,
        head_left: usize,
    ) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut cur = first;
        while let Some(id) = cur {
            let node = tree.node(id);
            if self.collapse {
                // a sibling is kept only while its padded span still touches
                // the head position
                let left = match node.prev_sibling {
                    Some(p) => tree.node(p).left,
                    None => node.left,
                };
                let right = match node.next_sibling {
                    Some(n) => tree.node(n).right,
                    None => node.right,
                };
                if right <= head_left {
                    cur = node.next_sibling;
                    continue;
                }
                if left > head_left {
                    break;
                }
            }
            out.push(self.copy_node(tree, id, head_left));
            cur = node.next_sibling;
        }
        out
    }
}
