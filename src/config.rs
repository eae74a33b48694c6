/// Run-scoped policy switches, threaded explicitly through registry and
/// scoring calls instead of living in process-global flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Named extractor catalog (`None` selects the default set).
    pub feature_set: Option<String>,
    /// Emit raw counts instead of mode-centered relative counts.
    pub absolute_counts: bool,
    /// Count features that occur on the reference parse (index 0).
    pub collect_correct: bool,
    /// Count features that occur off the reference parse.
    pub collect_incorrect: bool,
    /// Lowercase terminals while reading trees.
    pub lowercase: bool,
    /// Minimum number of sentences a feature must occur in to survive
    /// pruning.
    pub min_count: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            feature_set: None,
            absolute_counts: false,
            collect_correct: false,
            collect_incorrect: false,
            lowercase: false,
            min_count: 5,
        }
    }
}
