//! End-to-end tests of the extraction, id-assignment and scoring protocol.

use rerank::config::RunConfig;
use rerank::features::word::Word;
use rerank::features::Extractor;
use rerank::registry::FeatureRegistry;
use rerank::scoring::{self, WeightVector};
use rerank::syntax::annotate::AnnotationConfig;
use rerank::syntax::reader::{parse_tree, GoldReader, NBestReader};
use rerank::syntax::tree::{Parse, Sentence};

fn sentence(label: &str, trees: &[&str]) -> Sentence {
    let config = AnnotationConfig::default();
    let parses = trees
        .iter()
        .map(|text| Parse {
            tree: parse_tree(text, false, &config).unwrap(),
            log_prob: -1.0,
            log_cond_prob: -1.0,
        })
        .collect();
    Sentence {
        label: label.to_string(),
        parses,
        gold: None,
    }
}

/// A registry with the single `Word:1` extractor, whose counts are easy to
/// control from the test trees: one feature per (word, preterminal) pair.
fn word_registry() -> FeatureRegistry {
    FeatureRegistry::new(vec![Extractor::Word(Word::new(1))])
}

fn collect_all() -> RunConfig {
    RunConfig {
        collect_correct: true,
        collect_incorrect: true,
        ..RunConfig::default()
    }
}

fn definitions(registry: &mut FeatureRegistry, min_count: u32, start_id: u32) -> String {
    let mut out = Vec::new();
    registry
        .prune_and_renumber(min_count, start_id, &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn single_parse_sentences_are_skipped() {
    let mut registry = word_registry();
    let s = sentence("s1", &["(S (NN dog) (VBZ barks))"]);
    registry.extract_from_sentence(&s, &collect_all()).unwrap();
    assert_eq!(registry.num_features(), 0);
}

#[test]
fn pseudo_constant_features_are_not_counted() {
    // "dog" is tagged NN in both parses (pseudo-constant); "barks" differs.
    let s = sentence(
        "s1",
        &[
            "(S (NN dog) (VBZ barks))",
            "(S (NN dog) (NN barks))",
        ],
    );

    let mut registry = word_registry();
    registry.extract_from_sentence(&s, &collect_all()).unwrap();
    let defs = definitions(&mut registry, 1, 0);
    assert!(!defs.contains("dog"), "pseudo-constant feature survived:\n{}", defs);
    assert!(defs.contains("barks"));
}

#[test]
fn collection_policy_selects_reference_or_other_parses() {
    let s = sentence(
        "s1",
        &[
            "(S (NN dog) (VBZ barks))",
            "(S (NN dog) (NN barks))",
        ],
    );

    // Correct-only: just the reference parse's (barks, VBZ).
    let mut registry = word_registry();
    let config = RunConfig {
        collect_correct: true,
        ..RunConfig::default()
    };
    registry.extract_from_sentence(&s, &config).unwrap();
    let defs = definitions(&mut registry, 1, 0);
    assert!(defs.contains("barks VBZ"));
    assert!(!defs.contains("barks NN"));

    // Incorrect-only: just the non-reference parse's (barks, NN).
    let mut registry = word_registry();
    let config = RunConfig {
        collect_incorrect: true,
        ..RunConfig::default()
    };
    registry.extract_from_sentence(&s, &config).unwrap();
    let defs = definitions(&mut registry, 1, 0);
    assert!(!defs.contains("barks VBZ"));
    assert!(defs.contains("barks NN"));
}

#[test]
fn no_collection_policy_is_fatal() {
    let mut registry = word_registry();
    let s = sentence("s1", &["(S (NN a))", "(S (VB a))"]);
    assert!(registry
        .extract_from_sentence(&s, &RunConfig::default())
        .is_err());
}

#[test]
fn relative_counts_center_on_the_weighted_mode() {
    // Raw counts of (a, DT) are [2, 2, 2, 5]; the weighted histogram is
    // {1:3, 2:6, 4:1, 5:2}, so the mode is 2 and only parse 3 deviates.
    let two = "(X (DT a) (DT a))";
    let five = "(X (DT a) (DT a) (DT a) (DT a) (DT a))";
    let s = sentence("s1", &[two, two, two, five]);

    let mut registry = word_registry();
    registry
        .load_feature_definitions("0\tWord:1 a DT\n".as_bytes())
        .unwrap();

    let vectors = registry.feature_values(&s, &RunConfig::default());
    assert_eq!(vectors.len(), 4);
    assert!(vectors[0].is_empty());
    assert!(vectors[1].is_empty());
    assert!(vectors[2].is_empty());
    assert_eq!(vectors[3].get(&0), Some(&3.0));

    let absolute = RunConfig {
        absolute_counts: true,
        ..RunConfig::default()
    };
    let vectors = registry.feature_values(&s, &absolute);
    assert_eq!(vectors[0].get(&0), Some(&2.0));
    assert_eq!(vectors[3].get(&0), Some(&5.0));
}

#[test]
fn pruning_renumbers_contiguously_in_registration_order() {
    // Two extractors; (barks, *) features occur in two sentences, the
    // (growls, *) pair in only one and is pruned at min_count = 2.
    let mut registry = FeatureRegistry::new(vec![
        Extractor::Word(Word::new(1)),
        Extractor::Word(Word::new(2)),
    ]);
    let config = collect_all();
    for label in ["s1", "s2"] {
        let s = sentence(
            label,
            &[
                "(S (NN dog) (VBZ barks))",
                "(S (NN dog) (NN barks))",
            ],
        );
        registry.extract_from_sentence(&s, &config).unwrap();
    }
    let s = sentence(
        "s3",
        &[
            "(S (NN dog) (VBZ growls))",
            "(S (NN dog) (NN growls))",
        ],
    );
    registry.extract_from_sentence(&s, &config).unwrap();

    let mut out = Vec::new();
    let next_id = registry.prune_and_renumber(2, 10, &mut out).unwrap();
    let listing = String::from_utf8(out).unwrap();

    let ids: Vec<u32> = listing
        .lines()
        .map(|line| line.split_whitespace().next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 11, 12, 13], "listing:\n{}", listing);
    assert_eq!(next_id, 14);
    assert!(!listing.contains("growls"));

    // Word:1 entries precede Word:2 entries.
    let classes: Vec<&str> = listing
        .lines()
        .map(|line| line.split_whitespace().nth(1).unwrap())
        .collect();
    assert_eq!(classes, vec!["Word:1", "Word:1", "Word:2", "Word:2"]);
}

#[test]
fn definition_listing_round_trips() {
    let mut registry = word_registry();
    let config = collect_all();
    let s = sentence(
        "s1",
        &[
            "(S (NN dog) (VBZ barks))",
            "(S (NN dog) (NN barks))",
        ],
    );
    registry.extract_from_sentence(&s, &config).unwrap();
    let listing = definitions(&mut registry, 1, 0);

    let mut reloaded = word_registry();
    let max_id = reloaded
        .load_feature_definitions(listing.as_bytes())
        .unwrap();
    assert_eq!(reloaded.num_features(), registry.num_features());

    let original = registry.feature_values(&s, &RunConfig::default());
    let restored = reloaded.feature_values(&s, &RunConfig::default());
    assert_eq!(original, restored);
    assert_eq!(max_id, 1); // ids 0 and 1 for the two surviving features
}

#[test]
fn duplicate_or_unknown_definitions_are_fatal() {
    let mut registry = word_registry();
    assert!(registry
        .load_feature_definitions("0\tWord:1 a DT\n0\tWord:1 b DT\n".as_bytes())
        .is_err());

    let mut registry = word_registry();
    assert!(registry
        .load_feature_definitions("0\tWord:1 a DT\n1\tWord:1 a DT\n".as_bytes())
        .is_err());

    let mut registry = word_registry();
    assert!(registry
        .load_feature_definitions("0\tHeads:2:true:true:syntactic _ NN\n".as_bytes())
        .is_err());
}

#[test]
fn best_parse_takes_the_first_strict_maximum() {
    // (a, DT) counts per parse are 3, 5, 5, 1; with weight 1 in absolute
    // mode the scores match, and parse 1 beats the equal-scoring parse 2.
    let tree_of = |n: usize| format!("(X {})", "(DT a) ".repeat(n).trim_end());
    let trees: Vec<String> = [3, 5, 5, 1].iter().map(|&n| tree_of(n)).collect();
    let refs: Vec<&str> = trees.iter().map(String::as_str).collect();
    let s = sentence("s1", &refs);

    let mut registry = word_registry();
    registry
        .load_feature_definitions("0\tWord:1 a DT\n".as_bytes())
        .unwrap();
    let weights = WeightVector::from_values(vec![1.0]);
    let config = RunConfig {
        absolute_counts: true,
        ..RunConfig::default()
    };

    let best = scoring::best_parse_index(&registry, &s, &weights, &config).unwrap();
    assert_eq!(best, 1);

    // All-zero weights: every parse ties and the reference parse wins.
    let zero = WeightVector::from_values(vec![0.0]);
    let best = scoring::best_parse_index(&registry, &s, &zero, &config).unwrap();
    assert_eq!(best, 0);
}

#[test]
fn ranked_parses_are_non_increasing() {
    let tree_of = |n: usize| format!("(X {})", "(DT a) ".repeat(n).trim_end());
    let trees: Vec<String> = [1, 9, 4].iter().map(|&n| tree_of(n)).collect();
    let refs: Vec<&str> = trees.iter().map(String::as_str).collect();
    let s = sentence("s1", &refs);

    let mut registry = word_registry();
    registry
        .load_feature_definitions("0\tWord:1 a DT\n".as_bytes())
        .unwrap();
    let weights = WeightVector::from_values(vec![1.0]);
    let config = RunConfig {
        absolute_counts: true,
        ..RunConfig::default()
    };

    let ranked = scoring::ranked_parses(&registry, &s, &weights, &config).unwrap();
    let scores: Vec<f64> = ranked.iter().map(|&(_, score)| score).collect();
    assert_eq!(scores, vec![9.0, 4.0, 1.0]);
    assert_eq!(ranked[0].0, 1);
}

#[test]
fn feature_count_export_round_trips() {
    let mut registry = word_registry();
    registry
        .load_feature_definitions("0\tWord:1 a DT\n1\tWord:1 b NN\n".as_bytes())
        .unwrap();

    let nbest = "\
2 s1
-1.0 -0.5
(S (NP (DT a)) (VP (NN b) (NN b)))
-2.0 -1.5
(S (NP (DT a)) (NN b))
";
    let gold = "1\n(S (NP (DT a)) (VP (NN b) (NN b)))\n";

    let annotation = AnnotationConfig::default();
    let mut nbest_reader = NBestReader::new(nbest.as_bytes(), false, &annotation);
    let mut gold_reader = GoldReader::new(gold.as_bytes(), false, &annotation).unwrap();
    let config = RunConfig {
        absolute_counts: true,
        ..RunConfig::default()
    };

    let mut out = Vec::new();
    registry
        .write_feature_counts(&mut nbest_reader, &mut gold_reader, &mut out, &config)
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    // Gold has the NP and VP edges. Parse 0 matches both and carries
    // (a, DT) once and (b, NN) twice; parse 1 only has the NP edge and one
    // of each feature, so its unit value drops the `=1` suffix.
    assert_eq!(text, "S=1\nG=2 N=2 P=2 W=2 0 1=2, P=1 W=1 0 1,\n");

    // Reparse the sentence line and recover the same statistics and values.
    let line = text.lines().nth(1).unwrap();
    let mut tokens = line.split_whitespace();
    assert_eq!(tokens.next(), Some("G=2"));
    assert_eq!(tokens.next(), Some("N=2"));
    let mut parses: Vec<(u32, u32, Vec<(u32, f64)>)> = Vec::new();
    for token in tokens {
        if let Some(p) = token.strip_prefix("P=") {
            parses.push((p.parse().unwrap(), 0, Vec::new()));
        } else if let Some(w) = token.strip_prefix("W=") {
            parses.last_mut().unwrap().1 = w.parse().unwrap();
        } else {
            let token = token.trim_end_matches(',');
            let entry = match token.split_once('=') {
                Some((id, value)) => (id.parse().unwrap(), value.parse().unwrap()),
                None => (token.parse().unwrap(), 1.0),
            };
            parses.last_mut().unwrap().2.push(entry);
        }
    }
    assert_eq!(
        parses,
        vec![
            (2, 2, vec![(0, 1.0), (1, 2.0)]),
            (1, 1, vec![(0, 1.0), (1, 1.0)]),
        ]
    );
}
