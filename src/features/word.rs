use crate::features::common::end_marker;
use crate::features::key::FeatureKey;
use crate::features::FeatureCounts;
use crate::syntax::symbol::Symbol;
use crate::syntax::tree::{HeadType, NodeId, Parse, ParseTree};

/// A word together with its closest ancestor categories.
#[derive(Debug, Clone)]
pub struct Word {
    num_anc_cats: usize,
    identifier: String,
}

impl Word {
    pub fn new(num_anc_cats: usize) -> Self {
        Self {
            num_anc_cats,
            identifier: format!("Word:{}", num_anc_cats),
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
            let mut f = vec![tree.word(node)];
            let mut cur = Some(node);
            let mut complete = true;
            for _ in 0..self.num_anc_cats {
                match cur {
                    Some(n) => {
                        f.push(tree.node(n).category);
                        cur = tree.node(n).parent;
                    }
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if complete {
                *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
            }
        }
    }
}

/// A word projected upward through the head-child chain to its maximal
/// projection, plus extra ancestors.
#[derive(Debug, Clone)]
pub struct WordProjection {
    head_type: HeadType,
    include_nonmaximal: bool,
    num_ancs: usize,
    identifier: String,
}

impl WordProjection {
    pub fn new(head_type: HeadType, include_nonmaximal: bool, num_ancs: usize) -> Self {
        Self {
            head_type,
            include_nonmaximal,
            num_ancs,
            identifier: format!("WProj:{}:{}:{}", head_type, include_nonmaximal, num_ancs),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        for node in tree.pre_order() {
            let n = tree.node(node);
            if n.punctuation || !n.is_preterminal() {
                continue;
            }

            let mut f = vec![tree.word(node)];

            // Climb while we stay the head child of a non-root parent.
            let mut cur = node;
            while let Some(parent) = tree.node(cur).parent {
                let is_headchild = tree.head_child(parent, self.head_type) == Some(cur)
                    && !tree.is_root(parent);
                if !is_headchild {
                    break;
                }
                if self.include_nonmaximal {
                    f.push(tree.node(cur).category);
                }
                cur = parent;
            }

            let mut above: Option<NodeId> = Some(cur);
            let mut i = 0;
            while let Some(n) = above {
                if i > self.num_ancs {
                    break;
                }
                f.push(tree.node(n).category);
                above = tree.node(n).parent;
                i += 1;
            }

            *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
        }
    }
}

/// Pairs the lexical head of the last NP before a VP with the clause's
/// syntactic lexical head, as a crude agreement signal.
#[derive(Debug, Clone)]
pub struct SubjVerbAgreement;

impl SubjVerbAgreement {
    pub fn identifier(&self) -> &str {
        "SubjVerbAgr"
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        let s: Symbol = Symbol::intern("S");
        let sinv: Symbol = Symbol::intern("SINV");
        let np: Symbol = Symbol::intern("NP");
        let vp: Symbol = Symbol::intern("VP");

        for node in tree.pre_order() {
            let cat = tree.node(node).category;
            if (cat != s && cat != sinv) || tree.node(node).syn_lex_head.is_none() {
                continue;
            }

            let mut subject: Option<NodeId> = None;
            for child in tree.children(node) {
                let ccat = tree.node(child).category;
                if ccat == np {
                    subject = Some(child);
                } else if ccat == vp {
                    break;
                }
            }

            let subject = match subject {
                Some(subj) => subj,
                None => continue,
            };
            let subj_head = match tree.node(subject).sem_lex_head {
                Some(h) => h,
                None => continue,
            };
            let clause_head = tree.node(node).syn_lex_head.unwrap();

            let f = vec![
                tree.node(subj_head).category,
                tree.node(clause_head).category,
            ];
            *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
        }
    }
}

/// Lexicalization mode of [`SynSemHeads`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynSemAnnotation {
    None,
    LexSyn,
    LexAll,
}

impl std::fmt::Display for SynSemAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SynSemAnnotation::None => "none",
            SynSemAnnotation::LexSyn => "lexsyn",
            SynSemAnnotation::LexAll => "lexall",
        })
    }
}

/// Fires where the syntactic and semantic lexical heads of a constituent
/// diverge, recording both heads' categories (and optionally words).
#[derive(Debug, Clone)]
pub struct SynSemHeads {
    annotation: SynSemAnnotation,
    identifier: String,
}

impl SynSemHeads {
    pub fn new(annotation: SynSemAnnotation) -> Self {
        Self {
            annotation,
            identifier: format!("SynSemHeads:{}", annotation),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let tree = &parse.tree;
        for node in tree.pre_order() {
            let n = tree.node(node);
            if n.syn_lex_head == n.sem_lex_head {
                continue;
            }

            let mut f = Vec::new();
            match n.syn_lex_head {
                Some(h) => f.push(tree.node(h).category),
                None => f.push(end_marker()),
            }
            if self.annotation != SynSemAnnotation::None {
                match n.syn_lex_head {
                    Some(h) => f.push(tree.word(h)),
                    None => continue,
                }
            }
            match n.sem_lex_head {
                Some(h) => f.push(tree.node(h).category),
                None => f.push(end_marker()),
            }
            if self.annotation == SynSemAnnotation::LexAll {
                match n.sem_lex_head {
                    Some(h) => f.push(tree.word(h)),
                    None => continue,
                }
            }
            *counts.entry(FeatureKey::Syms(f)).or_insert(0.0) += 1.0;
        }
    }
}
