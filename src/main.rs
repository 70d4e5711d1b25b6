//! `corpus-dedup`: remove near-duplicates from a JSON Lines corpus.
//!
//! ```bash
//! corpus-dedup --input corpus.jsonl --output decisions.jsonl
//! corpus-dedup --config dedup.yaml --kept-only < corpus.jsonl > kept.jsonl
//! RUST_LOG=matcher=debug corpus-dedup --threshold 0.8 --parallel -i corpus.jsonl
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use corpus_dedup::jsonl::{read_documents, write_decisions, write_kept};
use corpus_dedup::{CancellationFlag, CanonicalizeConfig, DedupFileConfig, Deduplicator};

#[derive(Debug, Parser)]
#[command(name = "corpus-dedup", version, about = "Near-duplicate corpus deduplication")]
struct Cli {
    /// JSON Lines documents (`{"id": ..., "text": ...}`). Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write results. Writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML configuration file. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Jaccard similarity threshold in (0, 1).
    #[arg(long)]
    threshold: Option<f64>,

    /// Signature length.
    #[arg(long)]
    num_perm: Option<usize>,

    /// Tokens per shingle.
    #[arg(long)]
    shingle_size: Option<usize>,

    /// Shorter texts are always kept.
    #[arg(long)]
    min_text_length: Option<usize>,

    /// Explicit band count; must divide `num_perm`.
    #[arg(long)]
    bands: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Documents signed together with `--parallel`.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Strip annotations and normalize text before signing.
    #[arg(long)]
    cleanup: bool,

    /// Sign batches of documents in parallel.
    #[arg(long)]
    parallel: bool,

    /// Write the kept documents instead of one decision per document.
    #[arg(long)]
    kept_only: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let mut file_cfg = match &cli.config {
        Some(path) => DedupFileConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DedupFileConfig::default(),
    };
    apply_overrides(&cli, &mut file_cfg);

    let mut dedup = Deduplicator::new(file_cfg.dedup.clone()).context("invalid configuration")?;
    let params = dedup.params();
    info!(
        name = file_cfg.name.as_deref().unwrap_or("unnamed"),
        threshold = file_cfg.dedup.threshold,
        num_perm = params.num_perm(),
        bands = params.bands(),
        rows = params.rows(),
        "corpus_dedup_start"
    );

    let docs = match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_documents(BufReader::new(file))
        }
        None => read_documents(io::stdin().lock()),
    }
    .context("reading documents")?;

    let cancel = CancellationFlag::new();
    let report = if cli.parallel {
        dedup.run_batched(&docs, &cancel)
    } else {
        dedup.run(&docs, &cancel)
    };

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if cli.kept_only {
        write_kept(writer, &docs, &report.decisions)
    } else {
        write_decisions(writer, &report.decisions)
    }
    .context("writing results")?;

    Ok(())
}

fn init_tracing(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn apply_overrides(cli: &Cli, file_cfg: &mut DedupFileConfig) {
    let cfg = &mut file_cfg.dedup;
    if let Some(threshold) = cli.threshold {
        cfg.threshold = threshold;
    }
    if let Some(num_perm) = cli.num_perm {
        cfg.num_perm = num_perm;
    }
    if let Some(shingle_size) = cli.shingle_size {
        cfg.shingle_size = shingle_size;
    }
    if let Some(min_text_length) = cli.min_text_length {
        cfg.min_text_length = min_text_length;
    }
    if let Some(bands) = cli.bands {
        cfg.bands = Some(bands);
    }
    if let Some(seed) = cli.seed {
        cfg.seed = seed;
    }
    if let Some(batch_size) = cli.batch_size {
        cfg.batch_size = batch_size;
    }
    if cli.cleanup && cfg.cleanup.is_none() {
        cfg.cleanup = Some(CanonicalizeConfig::default());
    }
}
