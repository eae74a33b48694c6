//! Linear scoring of sparse feature vectors against an externally trained
//! weight vector, and the parse selection/ranking built on top of it.

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Result};

use crate::config::RunConfig;
use crate::registry::{FeatureRegistry, SparseVector};
use crate::syntax::tree::{Parse, Sentence};

/// A dense weight vector indexed by feature id.
#[derive(Debug, Clone)]
pub struct WeightVector {
    weights: Vec<f64>,
}

impl WeightVector {
    /// Read `<id> = <weight>` lines. Ids beyond `max_id` and repeated ids are
    /// fatal: the weight file does not match the feature definitions.
    pub fn read(reader: impl BufRead, max_id: u32) -> Result<Self> {
        let mut weights = vec![0.0f64; max_id as usize + 1];
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let id: u32 = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| anyhow!("Malformed weight line: {:?}", line))?;
            if tokens.next() != Some("=") {
                bail!("Malformed weight line (expected '='): {:?}", line);
            }
            let weight: f64 = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| anyhow!("Malformed weight line: {:?}", line))?;

            if id > max_id {
                bail!("Weight for id {} exceeds maximum feature id {}", id, max_id);
            }
            if weights[id as usize] != 0.0 {
                bail!("Duplicate weight for feature id {}", id);
            }
            weights[id as usize] = weight;
        }
        Ok(Self { weights })
    }

    pub fn from_values(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn get(&self, id: u32) -> Result<f64> {
        self.weights.get(id as usize).copied().ok_or_else(|| {
            anyhow!(
                "Feature id {} out of range for weight vector of length {}",
                id,
                self.weights.len()
            )
        })
    }
}

/// Dot product of one parse's sparse vector with the weights.
pub fn score_vector(vector: &SparseVector, weights: &WeightVector) -> Result<f64> {
    let mut total = 0.0;
    for (&id, &value) in vector {
        total += value * weights.get(id)?;
    }
    Ok(total)
}

/// The index of the highest-scoring parse. Replacement happens only on a
/// strict improvement, so the earliest maximum wins and index 0 wins an
/// all-tie.
pub fn best_parse_index(
    registry: &FeatureRegistry,
    sentence: &Sentence,
    weights: &WeightVector,
    config: &RunConfig,
) -> Result<usize> {
    if sentence.parses.is_empty() {
        bail!("Sentence {:?} has no parses", sentence.label);
    }
    let vectors = registry.feature_values(sentence, config);
    let mut best = 0;
    let mut best_score = 0.0;
    for (i, vector) in vectors.iter().enumerate() {
        let score = score_vector(vector, weights)?;
        if i == 0 || score > best_score {
            best = i;
            best_score = score;
        }
    }
    Ok(best)
}

pub fn best_parse<'a>(
    registry: &FeatureRegistry,
    sentence: &'a Sentence,
    weights: &WeightVector,
    config: &RunConfig,
) -> Result<&'a Parse> {
    Ok(&sentence.parses[best_parse_index(registry, sentence, weights, config)?])
}

/// All parses as `(index, score)`, sorted by descending score. The order of
/// equal scores is unspecified.
pub fn ranked_parses(
    registry: &FeatureRegistry,
    sentence: &Sentence,
    weights: &WeightVector,
    config: &RunConfig,
) -> Result<Vec<(usize, f64)>> {
    if sentence.parses.is_empty() {
        bail!("Sentence {:?} has no parses", sentence.label);
    }
    let vectors = registry.feature_values(sentence, config);
    let mut scored: Vec<(usize, f64)> = Vec::with_capacity(vectors.len());
    for (i, vector) in vectors.iter().enumerate() {
        scored.push((i, score_vector(vector, weights)?));
    }
    scored.sort_unstable_by(|a, b| b.1.partial_cmp(&a.1).expect("finite parse scores"));
    Ok(scored)
}

/// Write the full ranking: a `<n> <label>` header, then per parse its score,
/// its parser log probability, and the tree.
pub fn write_ranked_parses(
    registry: &FeatureRegistry,
    sentence: &Sentence,
    weights: &WeightVector,
    config: &RunConfig,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "{} {}", sentence.num_parses(), sentence.label)?;
    for (index, score) in ranked_parses(registry, sentence, weights, config)? {
        let parse = &sentence.parses[index];
        writeln!(out, "{} {}", score, parse.log_prob)?;
        writeln!(out, "{}", parse.tree.to_bracketed())?;
    }
    Ok(())
}

/// Introspection dump: `(label, parse index, id, value)` rows, skipping
/// feature id 0 and zero-weight features.
pub fn write_feature_debug(
    registry: &FeatureRegistry,
    sentence: &Sentence,
    weights: &WeightVector,
    config: &RunConfig,
    out: &mut dyn Write,
) -> Result<()> {
    let vectors = registry.feature_values(sentence, config);
    for (i, vector) in vectors.iter().enumerate() {
        for (&id, &value) in vector {
            if id == 0 || weights.get(id)? == 0.0 {
                continue;
            }
            writeln!(out, "{} {} {} {}", sentence.label, i, id, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_file_parsing() {
        let text = "0 = 1.5\n3 = -0.25\n\n1 = 2\n";
        let weights = WeightVector::read(text.as_bytes(), 3).unwrap();
        assert_eq!(weights.len(), 4);
        assert_eq!(weights.get(0).unwrap(), 1.5);
        assert_eq!(weights.get(1).unwrap(), 2.0);
        assert_eq!(weights.get(2).unwrap(), 0.0);
        assert_eq!(weights.get(3).unwrap(), -0.25);
    }

    #[test]
    fn test_weight_file_rejects_duplicates_and_overflow() {
        assert!(WeightVector::read("1 = 0.5\n1 = 0.5\n".as_bytes(), 3).is_err());
        assert!(WeightVector::read("7 = 0.5\n".as_bytes(), 3).is_err());
        assert!(WeightVector::read("1 0.5\n".as_bytes(), 3).is_err());
    }

    #[test]
    fn test_score_vector_bounds_check() {
        let weights = WeightVector::from_values(vec![0.5, 2.0]);
        let mut vector = SparseVector::new();
        vector.insert(1, 3.0);
        assert_eq!(score_vector(&vector, &weights).unwrap(), 6.0);

        vector.insert(9, 1.0);
        assert!(score_vector(&vector, &weights).is_err());
    }
}
