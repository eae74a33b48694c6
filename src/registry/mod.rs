//! The feature registry: an ordered collection of extractors, each owning a
//! table that maps feature keys to sentence-occurrence counts while training
//! data is scanned, and to dense feature ids once pruned or loaded from a
//! definition file. Tables are mutable only in that first phase; scoring-time
//! lookups treat them as read-only.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Result};

use crate::config::RunConfig;
use crate::eval::EdgeSet;
use crate::features::{extractor_set, Extractor, FeatureKey};
use crate::syntax::reader::{GoldReader, NBestReader};
use crate::syntax::tree::Sentence;

/// A sparse feature vector for one parse, keyed by dense feature id.
pub type SparseVector = BTreeMap<u32, f64>;

struct FeatureClass {
    extractor: Extractor,
    /// Sentence-occurrence counts during collection; feature ids afterwards.
    table: HashMap<FeatureKey, u32>,
}

pub struct FeatureRegistry {
    classes: Vec<FeatureClass>,
}

impl FeatureRegistry {
    pub fn new(extractors: Vec<Extractor>) -> Self {
        Self {
            classes: extractors
                .into_iter()
                .map(|extractor| FeatureClass {
                    extractor,
                    table: HashMap::new(),
                })
                .collect(),
        }
    }

    /// Build a registry from a named extractor set (`None` = default set).
    pub fn from_set_name(name: Option<&str>) -> Result<Self> {
        Ok(Self::new(extractor_set(name)?))
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Total number of features currently in the tables.
    pub fn num_features(&self) -> usize {
        self.classes.iter().map(|c| c.table.len()).sum()
    }

    /// Count which features this sentence's n-best list discriminates on.
    ///
    /// Sentences with at most one parse carry no discriminative content and
    /// are skipped. A feature occurring with the same value on every parse is
    /// pseudo-constant and is not counted. A surviving feature's occurrence
    /// count rises by one if the enabled collection policy covers it: the
    /// correct policy wants a value on the reference parse (index 0), the
    /// incorrect policy wants a value off the reference parse or on several
    /// parses.
    pub fn extract_from_sentence(
        &mut self,
        sentence: &Sentence,
        config: &RunConfig,
    ) -> Result<()> {
        if !config.collect_correct && !config.collect_incorrect {
            bail!("At least one of the correct/incorrect collection policies must be enabled");
        }
        if sentence.num_parses() <= 1 {
            return Ok(());
        }

        let num_parses = sentence.num_parses();
        for class in &mut self.classes {
            let mut per_feature: HashMap<FeatureKey, Vec<(usize, f64)>> = HashMap::new();
            for (i, parse) in sentence.parses.iter().enumerate() {
                for (key, value) in class.extractor.count_features(parse) {
                    per_feature.entry(key).or_default().push((i, value));
                }
            }

            for (key, parse_values) in per_feature {
                let pseudo_constant = parse_values.len() == num_parses
                    && parse_values.windows(2).all(|w| w[0].1 == w[1].1);
                if pseudo_constant {
                    continue;
                }
                let on_reference = parse_values[0].0 == 0;
                let collected = (config.collect_correct && on_reference)
                    || (config.collect_incorrect && (!on_reference || parse_values.len() > 1));
                if collected {
                    *class.table.entry(key).or_insert(0) += 1;
                }
            }
        }
        Ok(())
    }

    /// Drop features occurring in fewer than `min_count` sentences, then
    /// assign dense ids contiguously from `start_id` in registration order.
    /// The surviving `(id, identifier, key)` listing is written to `out`.
    /// Returns the next unassigned id.
    pub fn prune_and_renumber(
        &mut self,
        min_count: u32,
        start_id: u32,
        out: &mut dyn Write,
    ) -> Result<u32> {
        let mut next_id = start_id;
        for class in &mut self.classes {
            let mut survivors: Vec<FeatureKey> = class
                .table
                .iter()
                .filter(|&(_, &count)| count >= min_count)
                .map(|(key, _)| key.clone())
                .collect();
            survivors.sort();

            let dropped = class.table.len() - survivors.len();
            log::debug!(
                "{}: kept {} features, pruned {}",
                class.extractor.identifier(),
                survivors.len(),
                dropped
            );

            class.table.clear();
            for key in survivors {
                class.table.insert(key, next_id);
                next_id += 1;
            }
            class.write_definitions(out)?;
        }
        Ok(next_id)
    }

    /// Load a feature-definition listing produced by
    /// [`prune_and_renumber`](Self::prune_and_renumber). Returns the largest
    /// id seen. Unknown extractor identifiers and repeated ids or keys are
    /// fatal: they mean the file does not match the compiled-in catalog.
    pub fn load_feature_definitions(&mut self, reader: impl BufRead) -> Result<u32> {
        let index: HashMap<String, usize> = self
            .classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.extractor.identifier().to_string(), i))
            .collect();

        let mut seen_ids: Vec<HashSet<u32>> = vec![HashSet::new(); self.classes.len()];
        let mut max_id = 0u32;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (id_token, rest) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("Malformed feature definition line: {:?}", line))?;
            let rest = rest.trim_start();
            let (identifier, key_text) = match rest.split_once(char::is_whitespace) {
                Some((ident, key_text)) => (ident, key_text),
                None => (rest, ""),
            };

            let id: u32 = id_token
                .parse()
                .map_err(|_| anyhow!("Bad feature id in definition line: {:?}", line))?;
            let &class_index = index.get(identifier).ok_or_else(|| {
                anyhow!(
                    "Unknown extractor identifier {:?} in feature definitions; \
                     the file does not match the compiled-in catalog",
                    identifier
                )
            })?;

            let class = &mut self.classes[class_index];
            let key = class.extractor.key_shape().parse(key_text)?;
            if !seen_ids[class_index].insert(id) {
                bail!("Duplicate feature id {} for extractor {}", id, identifier);
            }
            if class.table.insert(key, id).is_some() {
                bail!(
                    "Duplicate feature definition for extractor {}: {:?}",
                    identifier,
                    key_text
                );
            }
            max_id = max_id.max(id);
        }
        Ok(max_id)
    }

    /// Per-parse sparse feature vectors for one sentence.
    ///
    /// Keys absent from the id tables are silently dropped (they were pruned
    /// or never seen in training). Unless absolute counts are requested, each
    /// feature's counts are centered on the sentence's most common value, so
    /// only deviations from the shared baseline are stored.
    pub fn feature_values(&self, sentence: &Sentence, config: &RunConfig) -> Vec<SparseVector> {
        let num_parses = sentence.num_parses();
        let mut result = vec![SparseVector::new(); num_parses];

        for class in &self.classes {
            let mut per_id: HashMap<u32, Vec<(usize, f64)>> = HashMap::new();
            for (i, parse) in sentence.parses.iter().enumerate() {
                for (key, value) in class.extractor.count_features(parse) {
                    if let Some(&id) = class.table.get(&key) {
                        per_id.entry(id).or_default().push((i, value));
                    }
                }
            }

            for (id, parse_values) in per_id {
                if config.absolute_counts {
                    for &(i, value) in &parse_values {
                        if value != 0.0 {
                            result[i].insert(id, value);
                        }
                    }
                } else {
                    let mut values = vec![0.0f64; num_parses];
                    for &(i, value) in &parse_values {
                        values[i] = value;
                    }
                    let mode = weighted_mode(&values);
                    for (i, &value) in values.iter().enumerate() {
                        let relative = value - mode;
                        if relative != 0.0 {
                            result[i].insert(id, relative);
                        }
                    }
                }
            }
        }
        result
    }

    /// Stream the feature-count export for paired n-best and gold readers.
    ///
    /// Format: a `S=<n>` header, then one line per sentence carrying the gold
    /// edge count, the parse count, and per parse the edge-overlap statistics
    /// followed by the sparse id/value run (`=1` suffixes omitted).
    pub fn write_feature_counts<R1: BufRead, R2: BufRead>(
        &self,
        nbest: &mut NBestReader<R1>,
        gold: &mut GoldReader<R2>,
        out: &mut dyn Write,
        config: &RunConfig,
    ) -> Result<()> {
        let num_sentences = gold.expected_sentences();
        writeln!(out, "S={}", num_sentences)?;

        for i in 0..num_sentences {
            let sentence = nbest
                .next_sentence()?
                .ok_or_else(|| anyhow!("Truncated n-best stream at sentence {}", i + 1))?;
            let gold_tree = gold
                .next_tree()?
                .ok_or_else(|| anyhow!("Truncated gold stream at sentence {}", i + 1))?;
            let gold_edges = EdgeSet::from_tree(&gold_tree);

            write!(out, "G={} N={}", gold_edges.num_edges(), sentence.num_parses())?;
            let vectors = self.feature_values(&sentence, config);
            for (j, parse) in sentence.parses.iter().enumerate() {
                let (test, common) = gold_edges.overlap(&parse.tree);
                write!(out, " P={} W={}", test, common)?;
                for (id, value) in &vectors[j] {
                    if *value == 1.0 {
                        write!(out, " {}", id)?;
                    } else {
                        write!(out, " {}={}", id, value)?;
                    }
                }
                write!(out, ",")?;
            }
            writeln!(out)?;

            if (i + 1) % 1000 == 0 {
                log::info!("wrote features for {} of {} sentences", i + 1, num_sentences);
            }
        }
        Ok(())
    }
}

impl FeatureClass {
    fn write_definitions(&self, out: &mut dyn Write) -> Result<()> {
        let mut entries: Vec<(u32, &FeatureKey)> =
            self.table.iter().map(|(key, &id)| (id, key)).collect();
        entries.sort_by_key(|&(id, _)| id);
        for (id, key) in entries {
            writeln!(out, "{}\t{} {}", id, self.extractor.identifier(), key)?;
        }
        Ok(())
    }
}

/// The most common value across parses, under a weighted histogram that adds
/// weight 2 at each value and weight 1 just below it. Ties go to the smallest
/// value.
fn weighted_mode(values: &[f64]) -> f64 {
    let mut histogram: Vec<(f64, u32)> = Vec::new();
    for &v in values {
        for (value, weight) in [(v, 2u32), (v - 1.0, 1u32)] {
            match histogram.iter_mut().find(|(x, _)| *x == value) {
                Some((_, w)) => *w += weight,
                None => histogram.push((value, weight)),
            }
        }
    }
    histogram.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("finite feature values"));

    let mut mode = 0.0;
    let mut best = 0;
    for &(value, weight) in &histogram {
        if weight > best {
            best = weight;
            mode = value;
        }
    }
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_mode_spec_example() {
        // raw counts [2,2,2,5] -> histogram {1:3, 2:6, 4:1, 5:2} -> mode 2
        assert_eq!(weighted_mode(&[2.0, 2.0, 2.0, 5.0]), 2.0);
    }

    #[test]
    fn test_weighted_mode_tie_takes_smallest() {
        // [1,2]: histogram {0:1, 1:3, 2:2} -> mode 1
        assert_eq!(weighted_mode(&[1.0, 2.0]), 1.0);
        // [0,1]: histogram {-1:1, 0:3, 1:2} -> mode 0
        assert_eq!(weighted_mode(&[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_weighted_mode_single_parse() {
        assert_eq!(weighted_mode(&[3.0]), 3.0);
    }
}
