use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Map, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cohmetrix::{Config, MetricSet, ResourcePool, Text};

/// CLI: linguistic complexity metrics for Portuguese texts.
#[derive(Parser, Debug)]
#[command(name = "cohmetrix", version, about)]
struct Args {
    /// JSON file with resource paths and cache settings
    #[arg(long = "config")]
    config_path: Option<PathBuf>,

    /// Text file to measure (repeatable); reads STDIN when absent
    #[arg(long = "text")]
    text_paths: Vec<PathBuf>,

    /// Only compute these metric categories (repeatable); `syntax` is only
    /// available this way and needs parsers registered in the pool
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Override the number of per-text resources kept in the cache
    #[arg(long = "cache-limit")]
    cache_limit: Option<usize>,

    /// Override the MATTR window size
    #[arg(long = "window")]
    window: Option<usize>,

    /// Number of leading paragraphs in each text that are titles
    #[arg(long = "subtitles")]
    subtitles: Option<usize>,

    /// Log failing texts and continue instead of aborting the run
    #[arg(long = "keep-going")]
    keep_going: bool,

    /// Print the available categories and columns, then exit
    #[arg(long = "list")]
    list: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config_path {
        Some(p) => Config::load(p)?,
        None => Config::default(),
    };
    if let Some(limit) = args.cache_limit {
        config.cache_limit = limit;
    }
    if let Some(window) = args.window {
        config.mattr_window = window;
    }
    config.validate()?;
    Ok(config)
}

fn metric_set(args: &Args) -> Result<MetricSet> {
    Ok(MetricSet::for_categories(&args.categories)?)
}

fn print_columns(set: &MetricSet) {
    for category in set.categories() {
        println!("{}", category.name);
        for metric in &category.metrics {
            println!("  {:<36} {}", metric.column_name(), metric.name());
        }
    }
}

fn read_texts(args: &Args) -> Result<Vec<Text>> {
    let texts = if args.text_paths.is_empty() {
        vec![Text::from_stdin()?]
    } else {
        args.text_paths
            .iter()
            .map(|p| Text::from_file(p))
            .collect::<Result<Vec<_>>>()?
    };
    Ok(texts
        .into_iter()
        .map(|t| match args.subtitles {
            Some(n) => t.with_subtitles(n),
            None => t,
        })
        .collect())
}

fn measure(set: &MetricSet, text: &Text, pool: &ResourcePool) -> Result<Value> {
    let values = set
        .values_for_text(text, pool)
        .with_context(|| format!("failed to measure {}", text.label()))?;
    let metrics: Map<String, Value> = values
        .into_iter()
        .map(|v| (v.column, json!(v.value)))
        .collect();
    Ok(json!({ "text": text.label(), "metrics": metrics }))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let set = metric_set(&args)?;
    if args.list {
        print_columns(&set);
        return Ok(());
    }

    let config = load_config(&args)?;
    let pool = ResourcePool::from_config(&config);
    let texts = read_texts(&args)?;

    let mut failed = 0usize;
    for text in &texts {
        match measure(&set, text, &pool) {
            // One JSON object per line, so the output pipes into jq and friends
            Ok(report) => println!("{report}"),
            Err(e) if args.keep_going => {
                error!("{e:#}");
                failed += 1;
            }
            Err(e) => return Err(e),
        }
        pool.clear_unpinned();
    }

    let stats = pool.stats();
    info!(
        texts = texts.len(),
        failed,
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        "done"
    );
    Ok(())
}
