//! CLI entry point for the dataset profiler.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use sheet_insight::{
    AnalysisConfig, Analyzer, CorrelationPairing, QuartileMethod, SchemaPolicy, loader,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Tabular dataset profiler",
    long_about = "Profiles a CSV or JSON table and prints a narrative data-quality report.\n\n\
                  EXAMPLES:\n  \
                  # Markdown report to stdout\n  \
                  sheet-insight -i data.csv\n\n  \
                  # Chart summaries as JSON\n  \
                  sheet-insight -i data.json --chart-data\n\n  \
                  # Custom thresholds, report written to a file\n  \
                  sheet-insight -i data.csv -c config.json -o report.md"
)]
struct Args {
    /// Path to the input file (.csv or .json array of row objects)
    #[arg(short, long)]
    input: PathBuf,

    /// Write the output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with analysis settings; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit chart data as JSON instead of the narrative report
    #[arg(long)]
    chart_data: bool,

    /// Correlate columns row by row, skipping rows where either side is missing
    #[arg(long)]
    row_aligned_correlation: bool,

    /// Treat keys absent from a row as null instead of rejecting the input
    #[arg(long)]
    null_fill_missing: bool,

    /// Use the legacy quartile index scheme for outlier detection
    #[arg(long, conflicts_with = "interpolated_quartiles")]
    legacy_quartiles: bool,

    /// Use linearly interpolated quartiles for outlier detection
    #[arg(long)]
    interpolated_quartiles: bool,

    /// Profile columns on a single thread
    #[arg(long)]
    sequential: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logging is skipped entirely when JSON goes to stdout, so the output stays
/// parseable.
fn init_logging(level: &str, quiet: bool, json_to_stdout: bool) {
    if json_to_stdout {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file (if any) and apply flag overrides.
fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
            serde_json::from_str(&text)
                .map_err(|e| anyhow!("Invalid config {}: {}", path.display(), e))?
        }
        None => AnalysisConfig::default(),
    };

    if args.row_aligned_correlation {
        config.correlation_pairing = CorrelationPairing::RowAligned;
    }
    if args.null_fill_missing {
        config.schema_policy = SchemaPolicy::NullFill;
    }
    if args.legacy_quartiles {
        config.quartile_method = QuartileMethod::Legacy;
    }
    if args.interpolated_quartiles {
        config.quartile_method = QuartileMethod::Linear;
    }
    if args.sequential {
        config.parallel = false;
    }

    debug!("Effective config: {:?}", config);
    Ok(config)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(
        &args.log_level,
        args.quiet,
        args.chart_data && args.output.is_none(),
    );

    dotenv().ok();

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let analyzer = Analyzer::new(build_config(&args)?)?;

    info!("Loading dataset from: {}", args.input.display());
    let rows = loader::load_rows(&args.input)?;

    let content = if args.chart_data {
        serde_json::to_string_pretty(&analyzer.chart_data(rows)?)?
    } else {
        analyzer.analyze(rows)?
    };

    write_output(args.output.as_deref(), &content)
}
