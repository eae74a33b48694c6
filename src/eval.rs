use std::collections::HashMap;

use crate::syntax::symbol::Symbol;
use crate::syntax::tree::ParseTree;

/// Labeled constituent spans of a tree, with multiplicities.
///
/// Edges are the (category, left, right) triples of nonterminal non-root
/// constituents; preterminals carry no bracketing information and the root
/// span is shared by every candidate, so both are excluded.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: HashMap<(Symbol, usize, usize), u32>,
    num_edges: u32,
}

impl EdgeSet {
    pub fn from_tree(tree: &ParseTree) -> Self {
        let mut edges: HashMap<(Symbol, usize, usize), u32> = HashMap::new();
        let mut num_edges = 0;
        for id in tree.pre_order() {
            if id == tree.root() || !tree.node(id).is_nonterminal() {
                continue;
            }
            let node = tree.node(id);
            *edges.entry((node.category, node.left, node.right)).or_insert(0) += 1;
            num_edges += 1;
        }
        Self { edges, num_edges }
    }

    pub fn num_edges(&self) -> u32 {
        self.num_edges
    }

    /// `(test, common)` — candidate edge count and multiset overlap with gold.
    pub fn overlap(&self, candidate: &ParseTree) -> (u32, u32) {
        let test = EdgeSet::from_tree(candidate);
        let mut common = 0;
        for (edge, &count) in &test.edges {
            if let Some(&gold_count) = self.edges.get(edge) {
                common += count.min(gold_count);
            }
        }
        (test.num_edges, common)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::annotate::AnnotationConfig;
    use crate::syntax::reader::parse_tree;

    #[test]
    fn test_edge_overlap() {
        let config = AnnotationConfig::default();
        let gold = parse_tree(
            "(S (NP (DT the) (NN dog)) (VP (VBZ barks) (ADVP (RB loudly))))",
            false,
            &config,
        )
        .unwrap();
        let gold_edges = EdgeSet::from_tree(&gold);
        // NP, VP and ADVP; the root S and the preterminals are not edges.
        assert_eq!(gold_edges.num_edges(), 3);

        let same = parse_tree(
            "(S (NP (DT the) (NN dog)) (VP (VBZ barks) (ADVP (RB loudly))))",
            false,
            &config,
        )
        .unwrap();
        assert_eq!(gold_edges.overlap(&same), (3, 3));

        let other = parse_tree(
            "(S (NP (DT the) (NN dog)) (VP (VBZ barks) (RB loudly)))",
            false,
            &config,
        )
        .unwrap();
        let (test, common) = gold_edges.overlap(&other);
        assert_eq!(test, 2);
        assert_eq!(common, 2); // NP and VP spans agree, ADVP is missing
    }
}
