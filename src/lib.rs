//! Reranking of n-best syntactic parses with a linear model over
//! hand-engineered structural features.
//!
//! The pipeline has two phases sharing one catalog of feature extractors.
//! At training time [`registry::FeatureRegistry`] scans n-best lists,
//! counts which features discriminate between a sentence's parses, prunes
//! rare ones, assigns dense ids and exports sparse count vectors for an
//! external weight optimizer. At inference time the same registry reloads
//! the frozen id tables and [`scoring`] combines per-parse vectors with the
//! trained weights to pick or rank parses.

pub mod config;
pub mod eval;
pub mod features;
pub mod io;
pub mod registry;
pub mod scoring;
pub mod syntax;

pub use config::RunConfig;
pub use eval::EdgeSet;
pub use features::{extractor_set, Extractor, FeatureKey};
pub use registry::{FeatureRegistry, SparseVector};
pub use scoring::{best_parse, ranked_parses, score_vector, WeightVector};
pub use syntax::{AnnotationConfig, NBestReader, Parse, ParseTree, Sentence, Symbol};
