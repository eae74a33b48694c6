use std::io::BufRead;

use anyhow::{anyhow, bail, Result};

use crate::syntax::annotate::{AnnotationConfig, Annotator};
use crate::syntax::symbol::Symbol;
use crate::syntax::tree::{Node, Parse, ParseTree, Sentence};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Open,
    Close,
    Atom(&'a str),
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            b')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            c if c.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && bytes[i] != b'('
                    && bytes[i] != b')'
                {
                    i += 1;
                }
                tokens.push(Token::Atom(&text[start..i]));
            }
        }
    }
    tokens
}

struct TreeBuilder<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    nodes: Vec<Node>,
    lowercase: bool,
}

impl<'a> TreeBuilder<'a> {
    fn next(&mut self) -> Option<Token<'a>> {
        let t = self.tokens.get(self.pos).copied();
        self.pos += 1;
        t
    }

    fn parse_node(&mut self) -> Result<usize> {
        match self.next() {
            Some(Token::Open) => {
                let label = match self.next() {
                    Some(Token::Atom(s)) => s,
                    other => bail!("Expected constituent label, found {:?}", other),
                };
                let id = self.nodes.len();
                self.nodes.push(Node::new(Symbol::intern(label)));

                let mut prev_child: Option<usize> = None;
                loop {
                    match self.tokens.get(self.pos) {
                        Some(Token::Close) => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => {
                            let child = self.parse_node()?;
                            match prev_child {
                                None => self.nodes[id].first_child = Some(child),
                                Some(p) => self.nodes[p].next_sibling = Some(child),
                            }
                            prev_child = Some(child);
                        }
                        None => bail!("Unbalanced parentheses in tree"),
                    }
                }
                if prev_child.is_none() {
                    bail!("Constituent ({}) has no children", label);
                }
                Ok(id)
            }
            Some(Token::Atom(word)) => {
                let id = self.nodes.len();
                let sym = if self.lowercase {
                    Symbol::intern(&word.to_lowercase())
                } else {
                    Symbol::intern(word)
                };
                self.nodes.push(Node::new(sym));
                Ok(id)
            }
            other => bail!("Expected tree, found {:?}", other),
        }
    }
}

/// Parse one Penn-bracketed tree and annotate it.
pub fn parse_tree(text: &str, lowercase: bool, config: &AnnotationConfig) -> Result<ParseTree> {
    let annotator = Annotator::new(config);
    parse_tree_with(text, lowercase, &annotator)
}

pub(crate) fn parse_tree_with(
    text: &str,
    lowercase: bool,
    annotator: &Annotator,
) -> Result<ParseTree> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        bail!("Empty tree");
    }
    let mut builder = TreeBuilder {
        tokens: &tokens,
        pos: 0,
        nodes: Vec::new(),
        lowercase,
    };
    let root = builder.parse_node()?;
    if builder.pos != tokens.len() {
        bail!("Trailing input after tree");
    }
    let mut tree = ParseTree::from_arena(builder.nodes, root);
    annotator.annotate(&mut tree);
    Ok(tree)
}

fn read_nonblank_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = input.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            return Ok(Some(line.trim_end().to_string()));
        }
    }
}

/// Streaming reader for per-sentence n-best blocks.
///
/// Each block is a header line `<nparses> <label>`, then for every parse a
/// line `<logprob> <logcondprob>` followed by one bracketed tree line.
pub struct NBestReader<R: BufRead> {
    input: R,
    lowercase: bool,
    annotator: Annotator,
}

impl<R: BufRead> NBestReader<R> {
    pub fn new(input: R, lowercase: bool, config: &AnnotationConfig) -> Self {
        Self {
            input,
            lowercase,
            annotator: Annotator::new(config),
        }
    }

    pub fn next_sentence(&mut self) -> Result<Option<Sentence>> {
        let header = match read_nonblank_line(&mut self.input)? {
            Some(line) => line,
            None => return Ok(None),
        };
        let mut parts = header.splitn(2, char::is_whitespace);
        let nparses: usize = parts
            .next()
            .unwrap_or("")
            .parse()
            .map_err(|_| anyhow!("Bad n-best header line: {:?}", header))?;
        let label = parts.next().unwrap_or("").trim().to_string();

        let mut parses = Vec::with_capacity(nparses);
        for i in 0..nparses {
            let prob_line = read_nonblank_line(&mut self.input)?
                .ok_or_else(|| anyhow!("Truncated n-best block {:?}: parse {} missing", label, i))?;
            let mut probs = prob_line.split_whitespace();
            let log_prob: f64 = probs
                .next()
                .ok_or_else(|| anyhow!("Missing log probability for parse {} of {:?}", i, label))?
                .parse()
                .map_err(|_| anyhow!("Bad log probability line: {:?}", prob_line))?;
            let log_cond_prob: f64 = match probs.next() {
                Some(tok) => tok
                    .parse()
                    .map_err(|_| anyhow!("Bad log probability line: {:?}", prob_line))?,
                None => 0.0,
            };

            let tree_line = read_nonblank_line(&mut self.input)?
                .ok_or_else(|| anyhow!("Truncated n-best block {:?}: tree {} missing", label, i))?;
            let tree = parse_tree_with(&tree_line, self.lowercase, &self.annotator)?;
            parses.push(Parse {
                tree,
                log_prob,
                log_cond_prob,
            });
        }

        Ok(Some(Sentence {
            label,
            parses,
            gold: None,
        }))
    }
}

/// Reader for a gold-tree stream: a sentence count line followed by one
/// bracketed tree per line.
pub struct GoldReader<R: BufRead> {
    input: R,
    lowercase: bool,
    annotator: Annotator,
    expected: usize,
}

impl<R: BufRead> GoldReader<R> {
    pub fn new(mut input: R, lowercase: bool, config: &AnnotationConfig) -> Result<Self> {
        let count_line = read_nonblank_line(&mut input)?
            .ok_or_else(|| anyhow!("Empty gold stream: missing sentence count"))?;
        let expected: usize = count_line
            .trim()
            .parse()
            .map_err(|_| anyhow!("Bad gold sentence count: {:?}", count_line))?;
        Ok(Self {
            input,
            lowercase,
            annotator: Annotator::new(config),
            expected,
        })
    }

    pub fn expected_sentences(&self) -> usize {
        self.expected
    }

    pub fn next_tree(&mut self) -> Result<Option<ParseTree>> {
        match read_nonblank_line(&mut self.input)? {
            Some(line) => Ok(Some(parse_tree_with(&line, self.lowercase, &self.annotator)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_round_trip() {
        let config = AnnotationConfig::default();
        let text = "(S (NP (DT the) (NN dog)) (VP (VBZ barks)))";
        let tree = parse_tree(text, false, &config).unwrap();
        assert_eq!(tree.to_bracketed(), text);
    }

    #[test]
    fn test_lowercasing_applies_to_terminals_only() {
        let config = AnnotationConfig::default();
        let tree = parse_tree("(NP (NNP John))", true, &config).unwrap();
        let np = tree.root();
        let nnp = tree.children(np).next().unwrap();
        assert_eq!(tree.node(nnp).category.as_str(), "NNP");
        assert_eq!(tree.word(nnp).as_str(), "john");
    }

    #[test]
    fn test_malformed_tree_is_rejected() {
        let config = AnnotationConfig::default();
        assert!(parse_tree("(S (NP", false, &config).is_err());
        assert!(parse_tree("", false, &config).is_err());
        assert!(parse_tree("(S ())", false, &config).is_err());
    }

    #[test]
    fn test_nbest_blocks() {
        let config = AnnotationConfig::default();
        let input = "\
2 wsj_0001.1
-42.5 -1.2
(S (NP (NN dog)) (VP (VBZ barks)))
-44.0 -2.7
(S (NP (NN dog) (NN barks)))
1 wsj_0001.2
-10.0 -0.1
(NP (DT the) (NN cat))
";
        let mut reader = NBestReader::new(input.as_bytes(), false, &config);
        let s1 = reader.next_sentence().unwrap().unwrap();
        assert_eq!(s1.label, "wsj_0001.1");
        assert_eq!(s1.num_parses(), 2);
        assert_eq!(s1.parses[0].log_prob, -42.5);
        assert_eq!(s1.parses[1].log_cond_prob, -2.7);

        let s2 = reader.next_sentence().unwrap().unwrap();
        assert_eq!(s2.num_parses(), 1);
        assert!(reader.next_sentence().unwrap().is_none());
    }

    #[test]
    fn test_truncated_nbest_block_is_fatal() {
        let config = AnnotationConfig::default();
        let input = "2 s1\n-1.0 -0.5\n(NP (NN dog))\n";
        let mut reader = NBestReader::new(input.as_bytes(), false, &config);
        assert!(reader.next_sentence().is_err());
    }

    #[test]
    fn test_gold_stream() {
        let config = AnnotationConfig::default();
        let input = "2\n(NP (NN cat))\n(NP (NN dog))\n";
        let mut reader = GoldReader::new(input.as_bytes(), false, &config).unwrap();
        assert_eq!(reader.expected_sentences(), 2);
        assert!(reader.next_tree().unwrap().is_some());
        assert!(reader.next_tree().unwrap().is_some());
        assert!(reader.next_tree().unwrap().is_none());
    }
}
