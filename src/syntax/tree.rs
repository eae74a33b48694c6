use std::fmt::Write as _;

use crate::syntax::symbol::Symbol;

/// Index of a node inside its owning [`ParseTree`] arena.
pub type NodeId = usize;

/// Which of the two head-annotation conventions to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadType {
    Syntactic,
    Semantic,
}

impl std::fmt::Display for HeadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HeadType::Syntactic => "syntactic",
            HeadType::Semantic => "semantic",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A word; always the only child of a preterminal.
    Terminal,
    /// A part-of-speech node dominating exactly one terminal.
    Preterminal,
    Nonterminal,
}

/// One constituent, preterminal or terminal in the arena.
///
/// `parent` and `prev_sibling` are back-references; head fields point at other
/// nodes of the same arena and may be absent (for example on punctuation-only
/// constituents). All fields are fixed once annotation has run.
#[derive(Debug, Clone)]
pub struct Node {
    pub category: Symbol,
    pub left: usize,
    pub right: usize,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub syn_head_child: Option<NodeId>,
    pub sem_head_child: Option<NodeId>,
    pub syn_lex_head: Option<NodeId>,
    pub sem_lex_head: Option<NodeId>,
    pub kind: NodeKind,
    pub punctuation: bool,
    pub conjunction: bool,
    pub function_word: bool,
    pub closed_class: bool,
}

impl Node {
    pub(crate) fn new(category: Symbol) -> Self {
        Self {
            category,
            left: 0,
            right: 0,
            first_child: None,
            next_sibling: None,
            prev_sibling: None,
            parent: None,
            syn_head_child: None,
            sem_head_child: None,
            syn_lex_head: None,
            sem_lex_head: None,
            kind: NodeKind::Terminal,
            punctuation: false,
            conjunction: false,
            function_word: false,
            closed_class: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == NodeKind::Terminal
    }

    pub fn is_preterminal(&self) -> bool {
        self.kind == NodeKind::Preterminal
    }

    pub fn is_nonterminal(&self) -> bool {
        self.kind == NodeKind::Nonterminal
    }
}

/// An annotated parse tree stored as an index arena.
#[derive(Debug, Clone)]
pub struct ParseTree {
    pub(crate) nodes: Vec<Node>,
    root: NodeId,
    preterminals: Vec<NodeId>,
}

impl ParseTree {
    pub(crate) fn from_arena(nodes: Vec<Node>, root: NodeId) -> Self {
        Self {
            nodes,
            root,
            preterminals: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Preterminals in left-to-right string order; one entry per word.
    pub fn preterminals(&self) -> &[NodeId] {
        &self.preterminals
    }

    pub(crate) fn set_preterminals(&mut self, preterms: Vec<NodeId>) {
        self.preterminals = preterms;
    }

    /// The word dominated by a preterminal (category of its terminal child).
    pub fn word(&self, preterm: NodeId) -> Symbol {
        let child = self.nodes[preterm]
            .first_child
            .expect("preterminal without terminal child");
        self.nodes[child].category
    }

    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            next: self.nodes[id].first_child,
        }
    }

    pub fn head_child(&self, id: NodeId, head_type: HeadType) -> Option<NodeId> {
        match head_type {
            HeadType::Syntactic => self.nodes[id].syn_head_child,
            HeadType::Semantic => self.nodes[id].sem_head_child,
        }
    }

    pub fn lex_head(&self, id: NodeId, head_type: HeadType) -> Option<NodeId> {
        match head_type {
            HeadType::Syntactic => self.nodes[id].syn_lex_head,
            HeadType::Semantic => self.nodes[id].sem_lex_head,
        }
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.nodes[id].parent.is_none()
    }

    /// A coordination is a nonterminal with a conjunction child in interior
    /// position (at least one non-punctuation sibling on each side).
    pub fn is_coordination(&self, id: NodeId) -> bool {
        if !self.nodes[id].is_nonterminal() {
            return false;
        }
        let children: Vec<NodeId> = self.children(id).collect();
        children.iter().enumerate().any(|(i, &c)| {
            self.nodes[c].conjunction
                && children[..i].iter().any(|&s| !self.nodes[s].punctuation)
                && children[i + 1..].iter().any(|&s| !self.nodes[s].punctuation)
        })
    }

    /// An adjunction structure repeats its own category among its children
    /// without any conjunction (e.g. an NP dominating an NP plus modifiers).
    pub fn is_adjunction(&self, id: NodeId) -> bool {
        if !self.nodes[id].is_nonterminal() {
            return false;
        }
        let cat = self.nodes[id].category;
        let mut has_same = false;
        for c in self.children(id) {
            if self.nodes[c].conjunction {
                return false;
            }
            if self.nodes[c].category == cat {
                has_same = true;
            }
        }
        has_same
    }

    /// True when every following sibling of `id` is punctuation.
    pub fn is_last_nonpunctuation(&self, id: NodeId) -> bool {
        let mut next = self.nodes[id].next_sibling;
        while let Some(n) = next {
            if !self.nodes[n].punctuation {
                return false;
            }
            next = self.nodes[n].next_sibling;
        }
        true
    }

    /// Pre-order traversal: node, then its subtree, then its next sibling.
    pub fn pre_order(&self) -> PreOrderIter<'_> {
        PreOrderIter {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Serialize in Penn bracketed form.
    pub fn to_bracketed(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        if node.is_terminal() {
            let _ = write!(out, "{}", node.category);
            return;
        }
        let _ = write!(out, "({}", node.category);
        for child in self.children(id) {
            out.push(' ');
            self.write_node(child, out);
        }
        out.push(')');
    }
}

pub struct ChildIter<'a> {
    tree: &'a ParseTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.nodes[id].next_sibling;
        Some(id)
    }
}

pub struct PreOrderIter<'a> {
    tree: &'a ParseTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        // Sibling below child so the child subtree is visited first.
        if let Some(next) = node.next_sibling {
            self.stack.push(next);
        }
        if let Some(child) = node.first_child {
            self.stack.push(child);
        }
        Some(id)
    }
}

/// One candidate analysis from the upstream n-best parser.
#[derive(Debug, Clone)]
pub struct Parse {
    pub tree: ParseTree,
    pub log_prob: f64,
    pub log_cond_prob: f64,
}

/// An n-best list for one sentence, with an optional gold tree.
///
/// Parse index 0 plays the distinguished "reference parse" role for the
/// correct/incorrect collection policy; that convention comes from the
/// upstream producer and is never re-derived here.
#[derive(Debug, Clone)]
pub struct Sentence {
    pub label: String,
    pub parses: Vec<Parse>,
    pub gold: Option<ParseTree>,
}

impl Sentence {
    pub fn num_parses(&self) -> usize {
        self.parses.len()
    }
}
