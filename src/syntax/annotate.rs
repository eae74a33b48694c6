use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::syntax::symbol::Symbol;
use crate::syntax::tree::{HeadType, NodeId, NodeKind, ParseTree};

/// Which end of the child list a head rule scans from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

/// One head-percolation rule: for constituents labeled `parent`, try each
/// `priority` category in order, scanning children from `direction`.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadRule {
    pub parent: String,
    pub direction: Direction,
    pub priority: Vec<String>,
}

/// Linguistic annotation tables: tag sets for the categorical predicates and
/// head-percolation rules for both head conventions. Deserializable from YAML
/// so a treebank with different conventions can override the defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub punctuation_tags: Vec<String>,
    pub conjunction_tags: Vec<String>,
    pub function_tags: Vec<String>,
    pub closed_class_tags: Vec<String>,
    pub syntactic_heads: Vec<HeadRule>,
    pub semantic_heads: Vec<HeadRule>,
}

impl AnnotationConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read annotation config {}: {}", path.display(), e))?;
        let config: AnnotationConfig = serde_yaml::from_str(&text)
            .map_err(|e| anyhow!("Invalid annotation config {}: {}", path.display(), e))?;
        Ok(config)
    }
}

fn rule(parent: &str, direction: Direction, priority: &[&str]) -> HeadRule {
    HeadRule {
        parent: parent.to_string(),
        direction,
        priority: priority.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        use Direction::{Left, Right};
        let syntactic_heads = vec![
            rule("ADJP", Left, &["NNS", "QP", "NN", "ADVP", "JJ", "VBN", "VBG", "ADJP", "JJR", "NP", "JJS", "DT", "FW", "RBR", "RBS", "SBAR", "RB"]),
            rule("ADVP", Right, &["RB", "RBR", "RBS", "FW", "ADVP", "TO", "CD", "JJR", "JJ", "IN", "NP", "JJS", "NN"]),
            rule("CONJP", Right, &["CC", "RB", "IN"]),
            rule("LST", Right, &["LS", ":"]),
            rule("NAC", Left, &["NN", "NNS", "NNP", "NNPS", "NP", "NAC", "EX", "CD", "QP", "PRP", "VBG", "JJ", "JJS", "JJR", "ADJP", "FW"]),
            rule("NP", Right, &["NN", "NNP", "NNPS", "NNS", "NX", "POS", "JJR", "NP", "ADJP", "PRN", "CD", "JJ", "JJS", "RB", "QP", "PRP"]),
            rule("NX", Right, &["NN", "NNP", "NNPS", "NNS", "NX"]),
            rule("PP", Right, &["IN", "TO", "VBG", "VBN", "RP", "FW"]),
            rule("PRT", Right, &["RP"]),
            rule("QP", Left, &["IN", "NNS", "NN", "JJ", "RB", "DT", "CD", "QP", "JJR", "JJS"]),
            rule("RRC", Right, &["VP", "NP", "ADVP", "ADJP", "PP"]),
            rule("S", Left, &["TO", "IN", "VP", "S", "SBAR", "ADJP", "UCP", "NP"]),
            rule("SBAR", Left, &["WHNP", "WHPP", "WHADVP", "WHADJP", "IN", "DT", "S", "SQ", "SINV", "SBAR", "FRAG"]),
            rule("SBARQ", Left, &["SQ", "S", "SINV", "SBARQ", "FRAG"]),
            rule("SINV", Left, &["VBZ", "VBD", "VBP", "VB", "MD", "VP", "S", "SINV", "ADJP", "NP"]),
            rule("SQ", Left, &["VBZ", "VBD", "VBP", "VB", "MD", "VP", "SQ"]),
            rule("VP", Left, &["TO", "VBD", "VBN", "MD", "VBZ", "VB", "VBG", "VBP", "VP", "ADJP", "NN", "NNS", "NP"]),
            rule("WHADJP", Left, &["CC", "WRB", "JJ", "ADJP"]),
            rule("WHADVP", Right, &["CC", "WRB"]),
            rule("WHNP", Left, &["WDT", "WP", "WP$", "WHADJP", "WHPP", "WHNP"]),
            rule("WHPP", Right, &["IN", "TO", "FW"]),
        ];
        // The semantic convention prefers content projections: the clause's
        // verb phrase over its complementizer, a preposition's object over
        // the preposition itself, a verb group's main verb over auxiliaries.
        let semantic_heads = vec![
            rule("S", Left, &["VP", "S", "SBAR", "ADJP", "UCP", "NP"]),
            rule("SBAR", Right, &["S", "SQ", "SINV", "SBAR", "FRAG"]),
            rule("SBARQ", Right, &["SQ", "S", "SINV", "SBARQ", "FRAG"]),
            rule("SINV", Left, &["VP", "S", "SINV", "ADJP", "NP"]),
            rule("SQ", Left, &["VP", "SQ"]),
            rule("PP", Right, &["NP", "SBAR", "S", "VP", "ADJP", "ADVP"]),
            rule("VP", Right, &["VP", "VBN", "VBG", "VBD", "VBZ", "VBP", "VB", "ADJP", "NN", "NNS", "NP"]),
            rule("ADJP", Left, &["NNS", "QP", "NN", "ADVP", "JJ", "VBN", "VBG", "ADJP", "JJR", "NP", "JJS", "DT", "FW", "RBR", "RBS", "SBAR", "RB"]),
            rule("NP", Right, &["NN", "NNP", "NNPS", "NNS", "NX", "JJR", "NP", "ADJP", "PRN", "CD", "JJ", "JJS", "RB", "QP", "PRP"]),
        ];
        Self {
            punctuation_tags: [".", ",", ":", "``", "''", "-LRB-", "-RRB-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            conjunction_tags: ["CC", "CONJP"].iter().map(|s| s.to_string()).collect(),
            function_tags: ["IN", "DT", "TO", "MD", "CC", "POS", "PDT", "WDT", "EX", "RP"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            closed_class_tags: [
                "IN", "DT", "TO", "MD", "CC", "POS", "PDT", "WDT", "EX", "RP", "PRP", "PRP$",
                "WP", "WP$", "WRB", "UH", "AUX", "AUXG",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            syntactic_heads,
            semantic_heads,
        }
    }
}

struct HeadTable {
    rules: HashMap<Symbol, (Direction, Vec<Symbol>)>,
}

impl HeadTable {
    fn new(rules: &[HeadRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| {
                    (
                        Symbol::intern(&r.parent),
                        (
                            r.direction,
                            r.priority.iter().map(|p| Symbol::intern(p)).collect(),
                        ),
                    )
                })
                .collect(),
        }
    }

    /// Pick the head child of `parent` from `children` (left-to-right order).
    fn select(&self, tree: &ParseTree, parent: NodeId, children: &[NodeId]) -> Option<NodeId> {
        if children.is_empty() {
            return None;
        }
        let cat = tree.node(parent).category;
        if let Some((direction, priority)) = self.rules.get(&cat) {
            for want in priority {
                let found = match direction {
                    Direction::Left => children
                        .iter()
                        .find(|&&c| tree.node(c).category == *want),
                    Direction::Right => children
                        .iter()
                        .rev()
                        .find(|&&c| tree.node(c).category == *want),
                };
                if let Some(&head) = found {
                    return Some(head);
                }
            }
            let fallback = match direction {
                Direction::Left => children.iter().find(|&&c| !tree.node(c).punctuation),
                Direction::Right => children.iter().rev().find(|&&c| !tree.node(c).punctuation),
            };
            return fallback.copied().or(Some(children[0]));
        }
        // No rule for this category: first non-punctuation child.
        children
            .iter()
            .find(|&&c| !tree.node(c).punctuation)
            .copied()
            .or(Some(children[0]))
    }
}

/// Applies spans, back-links, predicates and head annotations to a bare tree.
pub struct Annotator {
    punctuation: Vec<Symbol>,
    conjunction: Vec<Symbol>,
    function: Vec<Symbol>,
    closed_class: Vec<Symbol>,
    syntactic: HeadTable,
    semantic: HeadTable,
}

impl Annotator {
    pub fn new(config: &AnnotationConfig) -> Self {
        let syms = |v: &[String]| v.iter().map(|s| Symbol::intern(s)).collect();
        Self {
            punctuation: syms(&config.punctuation_tags),
            conjunction: syms(&config.conjunction_tags),
            function: syms(&config.function_tags),
            closed_class: syms(&config.closed_class_tags),
            syntactic: HeadTable::new(&config.syntactic_heads),
            semantic: HeadTable::new(&config.semantic_heads),
        }
    }

    pub fn annotate(&self, tree: &mut ParseTree) {
        self.link_and_classify(tree);
        let mut preterms = Vec::new();
        self.assign_spans(tree, tree.root(), &mut preterms);
        self.assign_heads(tree, tree.root());
        tree.set_preterminals(preterms);
    }

    fn link_and_classify(&self, tree: &mut ParseTree) {
        // Parent and previous-sibling back-links.
        for id in 0..tree.num_nodes() {
            let mut prev: Option<NodeId> = None;
            let mut child = tree.nodes[id].first_child;
            while let Some(c) = child {
                tree.nodes[c].parent = Some(id);
                tree.nodes[c].prev_sibling = prev;
                prev = Some(c);
                child = tree.nodes[c].next_sibling;
            }
        }
        // Node kinds, then tag-driven predicates on preterminals; CONJP-style
        // nonterminal conjunctions are also marked.
        for id in 0..tree.num_nodes() {
            let kind = match tree.nodes[id].first_child {
                None => NodeKind::Terminal,
                Some(c) => {
                    if tree.nodes[c].first_child.is_none()
                        && tree.nodes[c].next_sibling.is_none()
                    {
                        NodeKind::Preterminal
                    } else {
                        NodeKind::Nonterminal
                    }
                }
            };
            tree.nodes[id].kind = kind;
            let cat = tree.nodes[id].category;
            match kind {
                NodeKind::Preterminal => {
                    tree.nodes[id].punctuation = self.punctuation.contains(&cat);
                    tree.nodes[id].conjunction = self.conjunction.contains(&cat);
                    tree.nodes[id].function_word = self.function.contains(&cat);
                    tree.nodes[id].closed_class = self.closed_class.contains(&cat);
                }
                NodeKind::Nonterminal => {
                    tree.nodes[id].conjunction = self.conjunction.contains(&cat);
                }
                NodeKind::Terminal => {}
            }
        }
    }

    fn assign_spans(&self, tree: &mut ParseTree, id: NodeId, preterms: &mut Vec<NodeId>) {
        match tree.nodes[id].kind {
            NodeKind::Preterminal => {
                let pos = preterms.len();
                preterms.push(id);
                tree.nodes[id].left = pos;
                tree.nodes[id].right = pos + 1;
                let child = tree.nodes[id].first_child.unwrap();
                tree.nodes[child].left = pos;
                tree.nodes[child].right = pos + 1;
            }
            NodeKind::Nonterminal => {
                let children: Vec<NodeId> = tree.children(id).collect();
                for &c in &children {
                    self.assign_spans(tree, c, preterms);
                }
                tree.nodes[id].left = tree.nodes[children[0]].left;
                tree.nodes[id].right = tree.nodes[*children.last().unwrap()].right;
            }
            NodeKind::Terminal => {}
        }
    }

    fn assign_heads(&self, tree: &mut ParseTree, id: NodeId) {
        match tree.nodes[id].kind {
            NodeKind::Preterminal => {
                // A preterminal is its own lexical head.
                tree.nodes[id].syn_lex_head = Some(id);
                tree.nodes[id].sem_lex_head = Some(id);
            }
            NodeKind::Nonterminal => {
                let children: Vec<NodeId> = tree.children(id).collect();
                for &c in &children {
                    self.assign_heads(tree, c);
                }
                let syn = self.syntactic.select(tree, id, &children);
                let sem = self
                    .semantic
                    .select(tree, id, &children)
                    .or(syn);
                tree.nodes[id].syn_head_child = syn;
                tree.nodes[id].sem_head_child = sem;
                tree.nodes[id].syn_lex_head = syn.and_then(|h| tree.nodes[h].syn_lex_head);
                tree.nodes[id].sem_lex_head = sem.and_then(|h| tree.nodes[h].sem_lex_head);
            }
            NodeKind::Terminal => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::reader::parse_tree;
    use crate::syntax::tree::HeadType;

    #[test]
    fn test_heads_and_spans() {
        let config = AnnotationConfig::default();
        let tree =
            parse_tree("(S (NP (DT the) (NN dog)) (VP (VBZ barks)))", false, &config).unwrap();

        let root = tree.root();
        assert_eq!(tree.node(root).left, 0);
        assert_eq!(tree.node(root).right, 3);
        assert_eq!(tree.preterminals().len(), 3);

        // S's syntactic head is the VP, whose lexical head is the verb.
        let vp = tree.head_child(root, HeadType::Syntactic).unwrap();
        assert_eq!(tree.node(vp).category.as_str(), "VP");
        let lex = tree.lex_head(root, HeadType::Syntactic).unwrap();
        assert_eq!(tree.node(lex).category.as_str(), "VBZ");
        assert_eq!(tree.word(lex).as_str(), "barks");

        // NP's head is the noun, and the determiner is a function word.
        let np = tree.children(root).next().unwrap();
        let np_head = tree.head_child(np, HeadType::Syntactic).unwrap();
        assert_eq!(tree.node(np_head).category.as_str(), "NN");
        let dt = tree.children(np).next().unwrap();
        assert!(tree.node(dt).function_word);
    }

    #[test]
    fn test_coordination_predicate() {
        let config = AnnotationConfig::default();
        let tree = parse_tree(
            "(NP (NP (NN cat)) (CC and) (NP (NN dog)))",
            false,
            &config,
        )
        .unwrap();
        assert!(tree.is_coordination(tree.root()));

        let plain = parse_tree("(NP (DT the) (NN cat))", false, &config).unwrap();
        assert!(!plain.is_coordination(plain.root()));
    }
}
