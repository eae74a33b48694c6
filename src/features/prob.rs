use crate::features::key::FeatureKey;
use crate::features::FeatureCounts;
use crate::syntax::tree::Parse;

/// Negative log probability of the parse, as a single real-valued feature.
#[derive(Debug, Clone)]
pub struct NegLogProb;

impl NegLogProb {
    pub fn identifier(&self) -> &str {
        "NLogP"
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        *counts.entry(FeatureKey::Bin(0)).or_insert(0.0) -= parse.log_prob;
    }
}

/// Negative log conditional probability of the parse.
#[derive(Debug, Clone)]
pub struct NegLogCondProb;

impl NegLogCondProb {
    pub fn identifier(&self) -> &str {
        "NLogCondP"
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        *counts.entry(FeatureKey::Bin(0)).or_insert(0.0) -= parse.log_cond_prob;
    }
}

/// Log conditional probability binned into `nbins` buckets of log-`base`.
#[derive(Debug, Clone)]
pub struct BinnedLogCondProb {
    nbins: i64,
    log_base: f64,
    identifier: String,
}

impl BinnedLogCondProb {
    pub fn new(nbins: i64, base: f64) -> Self {
        Self {
            nbins,
            log_base: base.ln(),
            identifier: format!("BinnedLogCondP:{}:{}", nbins, base),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    fn bin(&self, parse: &Parse) -> i64 {
        ((-parse.log_cond_prob / self.log_base) as i64).clamp(1, self.nbins)
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        *counts.entry(FeatureKey::Bin(self.bin(parse))).or_insert(0.0) += 1.0;
    }
}

/// Like [`BinnedLogCondProb`] but the bin carries the fractional bin position
/// instead of a unit count, interpolating between bin boundaries.
#[derive(Debug, Clone)]
pub struct InterpLogCondProb {
    nbins: i64,
    log_base: f64,
    identifier: String,
}

impl InterpLogCondProb {
    pub fn new(nbins: i64, base: f64) -> Self {
        Self {
            nbins,
            log_base: base.ln(),
            identifier: format!("InterpLogCondP:{}:{}", nbins, base),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn count(&self, parse: &Parse, counts: &mut FeatureCounts) {
        let scaled = -parse.log_cond_prob / self.log_base;
        let bin = (scaled as i64).clamp(1, self.nbins);
        *counts.entry(FeatureKey::Bin(bin)).or_insert(0.0) += scaled;
    }
}
