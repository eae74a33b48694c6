//! Scores n-best parses from stdin against a trained weight vector.
//!
//! Usage:
//!   best_parses feat-defs.gz feat-weights.gz < nbest-parses > best-parses
//!
//! The feature set must agree with the one used by extract_features; the
//! definition file joins the two runs through the extractor identifiers.

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use rerank::config::RunConfig;
use rerank::io::open_source;
use rerank::registry::FeatureRegistry;
use rerank::scoring::{self, WeightVector};
use rerank::syntax::annotate::AnnotationConfig;
use rerank::syntax::reader::NBestReader;

#[derive(Parser, Debug)]
#[command(name = "best_parses")]
#[command(about = "Select or rank n-best parses with a trained feature model")]
#[command(version)]
struct Args {
    /// Feature set (must agree with extract_features)
    #[arg(short = 'f', long)]
    feature_set: Option<String>,

    /// Score with relative (mode-centered) counts instead of absolute counts
    #[arg(short = 'a', long)]
    relative: bool,

    /// Map all words to lower case as trees are read
    #[arg(short = 'l', long)]
    lowercase: bool,

    /// Output: 0 = best tree, 1 = ranked parses, 2 = feature dump
    #[arg(short = 'm', long, default_value_t = 0)]
    mode: u32,

    /// YAML file overriding the built-in head and tag tables
    #[arg(long)]
    annotation_config: Option<PathBuf>,

    /// Feature definition file produced by extract_features
    feature_defs: PathBuf,

    /// Feature weight file (`<id> = <weight>` lines)
    weights: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.mode > 2 {
        bail!("Unknown mode {} (expected 0, 1 or 2)", args.mode);
    }

    let config = RunConfig {
        feature_set: args.feature_set.clone(),
        absolute_counts: !args.relative,
        lowercase: args.lowercase,
        ..RunConfig::default()
    };

    let annotation = match &args.annotation_config {
        Some(path) => AnnotationConfig::from_yaml_file(path)?,
        None => AnnotationConfig::default(),
    };

    let mut registry = FeatureRegistry::from_set_name(config.feature_set.as_deref())?;
    let max_id = registry.load_feature_definitions(open_source(&args.feature_defs)?)?;
    info!(
        "loaded {} feature definitions from {} (max id {})",
        registry.num_features(),
        args.feature_defs.display(),
        max_id
    );

    let weights = WeightVector::read(open_source(&args.weights)?, max_id)?;

    let stdin = stdin();
    let mut reader = NBestReader::new(stdin.lock(), config.lowercase, &annotation);
    let stdout = stdout();
    let mut out = stdout.lock();

    while let Some(sentence) = reader.next_sentence()? {
        match args.mode {
            0 => {
                let best = scoring::best_parse(&registry, &sentence, &weights, &config)?;
                writeln!(out, "{}", best.tree.to_bracketed())?;
            }
            1 => {
                scoring::write_ranked_parses(&registry, &sentence, &weights, &config, &mut out)?
            }
            _ => scoring::write_feature_debug(&registry, &sentence, &weights, &config, &mut out)?,
        }
    }

    Ok(())
}
