use crate::features::common::{
    adjunct_marker, child_marker, conjunct_marker, end_marker, head_marker, is_bounding_node,
    last_adjunct_marker, last_conjunct_marker, nonroot_marker, posthead_marker, prehead_marker,
    symbol_quantize, LexLevel,
};
use crate::features::key::FeatureKey;
use crate::features::FeatureCounts;
use crate::syntax::symbol::Symbol;
use crate::syntax::tree::{HeadType, NodeId, Parse, ParseTree};

/// Shared configuration of the rule-like feature family: ancestor-category
/// context, root/conjunction markers, and the three lexicalization channels
/// (head child, function words, all words).
#[derive(Debug, Clone)]
pub struct RuleOptions {
    pub num_anc_cats: usize,
    pub label_root: bool,
    pub label_conjunct: bool,
    pub head: LexLevel,
    pub functional: LexLevel,
    pub all: LexLevel,
    pub head_type: HeadType,
}

impl RuleOptions {
    pub fn max_level(&self) -> LexLevel {
        self.head.max(self.functional).max(self.all)
    }

    pub fn identifier_suffix(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}:{}",
            self.num_anc_cats,
            self.label_root,
            self.label_conjunct,
            self.head,
            self.functional,
            self.all,
            self.head_type
        )
    }

    /// Push one child's category, optionally annotated with its lexical
    /// head's part of speech and word. `highest` records the richest
    /// annotation level actually reached, so the caller can refuse keys that
    /// fall short of the configured maximum.
    fn push_child(
        &self,
        tree: &ParseTree,
        node: NodeId,
        parent: NodeId,
        f: &mut Vec<Symbol>,
        highest: &mut LexLevel,
    ) {
        let is_headchild = tree.head_child(parent, self.head_type) == Some(node);
        f.push(tree.node(node).category);
        let lexhead = match tree.lex_head(node, self.head_type) {
            Some(h) => h,
            None => return,
        };
        let functional = tree.node(lexhead).function_word;
        if self.all < LexLevel::Pos
            && (!functional || self.functional < LexLevel::Pos)
            && (!is_headchild || self.head < LexLevel::Pos)
        {
            return;
        }
        if lexhead != node {
            f.push(head_marker());
            f.push(tree.node(lexhead).category);
            *highest = (*highest).max(LexLevel::Pos);
        }
        if self.all < LexLevel::Lexical
            && (!functional || self.functional < LexLevel::Lexical)
            && (!is_headchild || self.head < LexLevel::Lexical)
        {
            return;
        }
        f.push(tree.word(lexhead));
        *highest = (*highest).max(LexLevel::Lexical);
    }

    /// Push ancestor categories with conjunct/adjunct markers, then the
    /// non-root context marker.
    fn push_ancestors(&self, tree: &ParseTree, start: NodeId, f: &mut Vec<Symbol>) {
        f.push(end_marker());

        let mut node = start;
        let mut parent = tree.node(node).parent;
        let mut i = 0;
        while i <= self.num_anc_cats {
            let p = match parent {
                Some(p) => p,
                None => break,
            };
            f.push(tree.node(node).category);
            if self.label_conjunct {
                if tree.is_coordination(p) {
                    f.push(if tree.is_last_nonpunctuation(node) {
                        last_conjunct_marker()
                    } else {
                        conjunct_marker()
                    });
                } else if tree.is_adjunction(p) {
                    f.push(if tree.is_last_nonpunctuation(node) {
                        last_adjunct_marker()
                    } else {
                        adjunct_marker()
                    });
                }
            }
            node = p;
            parent = tree.node(node).parent;
            i += 1;
        }

        if self.label_root {
            let mut cur = parent;
            while let Some(n) = cur {
                let p = tree.node(n).parent;
                if is_bounding_node(tree, n) && !p.is_some_and(|pp| is_bounding_node(tree, pp)) {
                    f.push(nonroot_marker());
                    break;
                }
                cur = p;
            }
        }
    }
}

/// Local-tree rule features, optionally extended through ancestor local
/// trees.
#[derive(Debug, Clone)]
pub struct Rule {
    num_anc_trees: usize,
    opts: RuleOptions,
    identifier: String,
}

impl Rule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num_anc_trees: usize,
        num_anc_cats: usize,
        label_root: bool,
        label_conjunct: bool,
        head: LexLevel,
        functional: LexLevel,
        all: LexLevel,
        head_type: HeadType,
    ) -> Self {
        let opts = RuleOptions {
            num_anc_cats,
            label_root,
            label_conjunct,
            head,
            functional,
            all,
            head_type,
        };
        let identifier = format!("Rule:{}:{}", num_anc_trees, opts.identifier_suffix());
        Self {
            num_anc_trees,
            opts,
            identifier,
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

        let mut f = Vec::new();
        let mut highest = LexLevel::None;

        for child in tree.children(node) {
            self.opts.push_child(tree, child, node, &mut f, &mut highest);
        }

        // Extend through ancestor local trees, marking our own position.
        let mut cur = node;
        for _ in 0..self.num_anc_trees {
            let parent = match tree.node(cur).parent {
                Some(p) => p,
                None => break,
            };
            f.push(end_marker());
            for child in tree.children(parent) {
                if child == cur {
                    f.push(child_marker());
                    f.push(tree.node(child).category);
                } else {
                    self.opts.push_child(tree, child, cur, &mut f, &mut highest);
                }
            }
            cur = parent;
        }

        if highest != self.opts.max_level() {
            return;
        }
        self.opts.push_ancestors(tree, cur, &mut f);
        *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
    }
}

/// Sliding windows of `frag_len` over a node's children, with sentinel edge
/// positions and pre/post-head tagging.
#[derive(Debug, Clone)]
pub struct NGram {
    frag_len: usize,
    opts: RuleOptions,
    identifier: String,
}

impl NGram {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frag_len: usize,
        num_anc_cats: usize,
        label_root: bool,
        label_conjunct: bool,
        head: LexLevel,
        functional: LexLevel,
        all: LexLevel,
        head_type: HeadType,
    ) -> Self {
        let opts = RuleOptions {
            num_anc_cats,
            label_root,
            label_conjunct,
            head,
            functional,
            all,
            head_type,
        };
        let identifier = format!("NGram:{}:{}", frag_len, opts.identifier_suffix());
        Self {
            frag_len,
            opts,
            identifier,
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
        let children: Vec<NodeId> = tree.children(node).collect();
        if children.len() < self.frag_len {
            return;
        }

        let headchild = tree.head_child(node, self.opts.head_type);

        let mut padded: Vec<Option<NodeId>> = Vec::with_capacity(children.len() + 2);
        padded.push(None);
        padded.extend(children.iter().map(|&c| Some(c)));
        padded.push(None);

        let mut headposition = prehead_marker();

        for start in 0..=(padded.len() - self.frag_len) {
            if padded[start] == headchild {
                headposition = posthead_marker();
            }

            let mut f = Vec::new();
            let mut highest = LexLevel::None;
            let mut includes_headchild = false;

            for pos in start..start + self.frag_len {
                match padded[pos] {
                    Some(child) => self.opts.push_child(tree, child, node, &mut f, &mut highest),
                    None => f.push(end_marker()),
                }
                if padded[pos] == headchild {
                    includes_headchild = true;
                }
            }

            f.push(headposition);

            if !includes_headchild && self.opts.head != LexLevel::None {
                match headchild {
                    Some(h) => self.opts.push_child(tree, h, node, &mut f, &mut highest),
                    None => return,
                }
            }

            if highest != self.opts.max_level() {
                return;
            }

            self.opts.push_ancestors(tree, node, &mut f);
            *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
        }
    }
}

/// [`NGram`] extended with quantized direction and distance to the head
/// child.
#[derive(Debug, Clone)]
pub struct NNGram {
    frag_len: usize,
    head_dir: bool,
    head_dist: bool,
    opts: RuleOptions,
    identifier: String,
}

impl NNGram {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frag_len: usize,
        num_anc_cats: usize,
        label_root: bool,
        label_conjunct: bool,
        head: LexLevel,
        functional: LexLevel,
        all: LexLevel,
        head_type: HeadType,
        head_dir: bool,
        head_dist: bool,
    ) -> Self {
        let opts = RuleOptions {
            num_anc_cats,
            label_root,
            label_conjunct,
            head,
            functional,
            all,
            head_type,
        };
        let identifier = format!(
            "NNGram:{}:{}:{}:{}",
            frag_len,
            head_dir,
            head_dist,
            opts.identifier_suffix()
        );
        Self {
            frag_len,
            head_dir,
            head_dist,
            opts,
            identifier,
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

        let headchild = tree.head_child(node, self.opts.head_type);

        let children: Vec<NodeId> = tree.children(node).collect();
        let mut headlocation = 0usize;
        for (i, &c) in children.iter().enumerate() {
            if Some(c) == headchild {
                headlocation = i;
            }
        }

        if children.len() + 1 < self.frag_len {
            return;
        }

        let mut padded: Vec<Option<NodeId>> = Vec::with_capacity(children.len() + 2);
        padded.push(None);
        padded.extend(children.iter().map(|&c| Some(c)));
        padded.push(None);

        let mut headposition = prehead_marker();

        for start in 0..=(padded.len() - self.frag_len) {
            if padded[start] == headchild {
                headposition = posthead_marker();
            }

            let mut f = Vec::new();
            let mut highest = LexLevel::None;
            let mut includes_headchild = false;

            for pos in start..start + self.frag_len {
                match padded[pos] {
                    Some(child) => {
                        self.opts.push_child(tree, child, node, &mut f, &mut highest);
                        if Some(child) == headchild {
                            includes_headchild = true;
                        }
                    }
                    None => f.push(end_marker()),
                }
            }

            if self.head_dir {
                if includes_headchild {
                    f.push(symbol_quantize(headlocation + 1 - start));
                } else {
                    f.push(headposition);
                }
            }

            if self.head_dist {
                if headlocation + 1 < start {
                    f.push(symbol_quantize(start - headlocation - 1));
                } else if headlocation + 1 >= start + self.frag_len {
                    f.push(symbol_quantize(headlocation + 2 - (start + self.frag_len)));
                } else {
                    f.push(symbol_quantize(0));
                }
            }

            if self.opts.head != LexLevel::None {
                match headchild {
                    Some(h) => self.opts.push_child(tree, h, node, &mut f, &mut highest),
                    None => f.push(head_marker()),
                }
            }

            if highest != self.opts.max_level() {
                return;
            }

            self.opts.push_ancestors(tree, node, &mut f);
            *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
        }
    }
}
