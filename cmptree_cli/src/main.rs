use anyhow::Context;
use clap::Parser;
use cmptree_common::{CmpTreeError, ComparisonSet, EngineConfig, FullComparison, ReportConfig};
use cmptree_core::{check_root, ComparisonEngine, Reporter, Totals};
use serde::Serialize;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Both trees matched entry for entry
const EXIT_IDENTICAL: i32 = 0;
/// The comparison ran and found at least one mismatch
const EXIT_MISMATCH: i32 = 1;
/// The comparison could not be run
const EXIT_FAILURE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "cmp-tree")]
#[command(author = "cmp-tree Contributors")]
#[command(version)]
#[command(about = "Compare two directory trees entry by entry, byte for byte", long_about = None)]
struct Cli {
    /// First directory tree
    first: PathBuf,

    /// Second directory tree
    second: PathBuf,

    /// Also print the paths that match
    #[arg(short, long)]
    matches: bool,

    /// Colorize output: green for matches, red for mismatches
    #[arg(short, long)]
    pretty: bool,

    /// Print match totals once done
    #[arg(short, long)]
    totals: bool,

    /// Print nothing; report through the exit code only
    #[arg(short, long)]
    silent: bool,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    /// Treat regular files of equal size as identical without reading them
    #[arg(long)]
    shallow_pass: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn report_config(&self) -> ReportConfig {
        ReportConfig::default()
            .with_matches(self.matches)
            .with_color(self.pretty)
            .with_totals(self.totals)
            .with_silent(self.silent)
    }

    fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_parallelism(self.jobs.map(NonZeroUsize::get))
            .with_shallow_pass(self.shallow_pass)
    }
}

fn main() {
    // Diagnostics go to stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(true) => EXIT_IDENTICAL,
        Ok(false) => EXIT_MISMATCH,
        Err(e) => {
            // Printed directly so it survives any RUST_LOG filter
            eprintln!("cmp-tree: {:#}", e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

/// Returns whether the two trees are identical
fn run(cli: &Cli) -> anyhow::Result<bool> {
    validate_root(&cli.first, "first")?;
    validate_root(&cli.second, "second")?;

    info!("Comparing:");
    info!("  First:  {}", cli.first.display());
    info!("  Second: {}", cli.second.display());

    let engine = ComparisonEngine::new(cli.engine_config());
    let comparisons = engine
        .compare_directory_trees(&cli.first, &cli.second)
        .context("Comparison failed")?;

    let report_config = cli.report_config();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.json && !report_config.silent {
        let report = build_json_report(&cli.first, &cli.second, &comparisons, report_config.show_matches);
        serde_json::to_writer_pretty(&mut out, &report)
            .map_err(|e| CmpTreeError::Serialization(e.to_string()))
            .context("Failed to write JSON report")?;
        writeln!(out)?;
        out.flush()?;
    } else {
        Reporter::new(report_config)
            .write_report(&mut out, &comparisons)
            .context("Failed to write report")?;
    }

    info!(
        "{} of {} entries mismatched",
        comparisons.mismatch_count(),
        comparisons.len()
    );
    Ok(!comparisons.has_mismatch())
}

fn validate_root(path: &Path, which: &str) -> anyhow::Result<()> {
    check_root(path).with_context(|| format!("Invalid {} directory tree", which))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    first: String,
    second: String,
    identical: bool,
    summary: JsonSummary,
    entries: Vec<&'a FullComparison>,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    matches: usize,
    mismatches: usize,
    #[serde(flatten)]
    totals: Totals,
}

fn build_json_report<'a>(
    first: &Path,
    second: &Path,
    comparisons: &'a ComparisonSet,
    show_matches: bool,
) -> JsonReport<'a> {
    let mismatches = comparisons.mismatch_count();

    JsonReport {
        first: first.to_string_lossy().to_string(),
        second: second.to_string_lossy().to_string(),
        identical: mismatches == 0,
        summary: JsonSummary {
            total: comparisons.len(),
            matches: comparisons.len() - mismatches,
            mismatches,
            totals: Totals::from_comparisons(comparisons),
        },
        entries: comparisons
            .iter()
            .filter(|c| show_matches || !c.outcome().is_match())
            .collect(),
    }
}
