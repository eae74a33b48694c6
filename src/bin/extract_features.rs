//! Extracts reranker training features from n-best parse data.
//!
//! Scans the training n-best list once to find discriminative features,
//! prunes the rare ones and writes the surviving feature definitions, then
//! rereads each dataset to emit its sparse count vectors.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use rerank::config::RunConfig;
use rerank::io::{open_source, Sink};
use rerank::registry::FeatureRegistry;
use rerank::syntax::annotate::AnnotationConfig;
use rerank::syntax::reader::{GoldReader, NBestReader};

#[derive(Parser, Debug)]
#[command(name = "extract_features")]
#[command(about = "Extract reranker feature counts from n-best parse data")]
#[command(version)]
struct Args {
    /// Feature set to extract (default catalog if omitted)
    #[arg(short = 'f', long)]
    feature_set: Option<String>,

    /// Produce absolute feature counts rather than relative counts
    #[arg(short = 'a', long)]
    absolute: bool,

    /// Collect features from correct examples
    #[arg(short = 'c', long)]
    collect_correct: bool,

    /// Collect features from incorrect examples
    #[arg(short = 'i', long)]
    collect_incorrect: bool,

    /// Map all words to lower case as trees are read
    #[arg(short = 'l', long)]
    lowercase: bool,

    /// Number of sentences a feature must appear in not to be pruned
    #[arg(short = 's', long, default_value_t = 5)]
    min_count: u32,

    /// YAML file overriding the built-in head and tag tables
    #[arg(long)]
    annotation_config: Option<PathBuf>,

    /// Output file for the feature definitions (.gz/.bz2 suffix compresses)
    #[arg(short = 'F', long)]
    feature_defs: PathBuf,

    /// Dataset triples `<nbest> <gold> <counts-out>`; the first triple is the
    /// training set the features are collected from
    #[arg(required = true, num_args = 3..)]
    datasets: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.datasets.len() % 3 != 0 {
        bail!("Datasets must come as <nbest> <gold> <counts-out> triples");
    }
    if !args.collect_correct && !args.collect_incorrect {
        bail!("At least one of --collect-correct / --collect-incorrect is required");
    }

    let config = RunConfig {
        feature_set: args.feature_set.clone(),
        absolute_counts: args.absolute,
        collect_correct: args.collect_correct,
        collect_incorrect: args.collect_incorrect,
        lowercase: args.lowercase,
        min_count: args.min_count,
    };
    info!(
        "feature_set={:?} absolute={} collect_correct={} collect_incorrect={} \
         lowercase={} min_count={}",
        config.feature_set,
        config.absolute_counts,
        config.collect_correct,
        config.collect_incorrect,
        config.lowercase,
        config.min_count
    );

    let annotation = match &args.annotation_config {
        Some(path) => AnnotationConfig::from_yaml_file(path)?,
        None => AnnotationConfig::default(),
    };

    let mut registry = FeatureRegistry::from_set_name(config.feature_set.as_deref())?;

    let train_nbest = &args.datasets[0];
    info!("collecting features from {}", train_nbest.display());
    let mut reader = NBestReader::new(open_source(train_nbest)?, config.lowercase, &annotation);
    let mut num_sentences = 0usize;
    while let Some(sentence) = reader.next_sentence()? {
        registry.extract_from_sentence(&sentence, &config)?;
        num_sentences += 1;
        if num_sentences % 1000 == 0 {
            info!(
                "{} sentences scanned, {} features",
                num_sentences,
                registry.num_features()
            );
        }
    }
    info!(
        "{} sentences scanned, {} features before pruning",
        num_sentences,
        registry.num_features()
    );

    let mut defs_out = Sink::create(&args.feature_defs)?;
    let next_id = registry.prune_and_renumber(config.min_count, 0, &mut defs_out)?;
    defs_out.finish()?;
    info!(
        "{} features survived pruning, definitions written to {}",
        next_id,
        args.feature_defs.display()
    );

    for triple in args.datasets.chunks(3) {
        let (nbest, gold, out) = (&triple[0], &triple[1], &triple[2]);
        info!(
            "writing features for {} / {} to {}",
            nbest.display(),
            gold.display(),
            out.display()
        );
        let mut nbest_reader =
            NBestReader::new(open_source(nbest)?, config.lowercase, &annotation);
        let mut gold_reader =
            GoldReader::new(open_source(gold)?, config.lowercase, &annotation)?;
        let mut sink = Sink::create(out)?;
        registry.write_feature_counts(&mut nbest_reader, &mut gold_reader, &mut sink, &config)?;
        sink.finish()?;
    }

    Ok(())
}
