//! u-eda command-line runner.
//!
//! Usage:
//!   u-eda --input data.csv --column suicides_no --policy symmetric-band --chart-dir charts
//!
//! The report goes to stdout; logs go to stderr (`RUST_LOG` or `--log-level`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use u_eda::pipeline::{self, EdaConfig};
use u_eda::shape::ThresholdPolicy;

#[derive(Parser, Debug)]
#[command(name = "u-eda")]
#[command(about = "Descriptive statistics, chart datasets, and distribution shape of a CSV table")]
#[command(version)]
struct Args {
    /// JSON config file; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delimited input file with a header row
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Numeric column to analyze
    #[arg(short, long)]
    column: Option<String>,

    /// Shape threshold policy: `symmetric-band` or `sign`
    #[arg(short, long)]
    policy: Option<ThresholdPolicy>,

    /// Field delimiter
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Directory for the chart JSON datasets
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> Result<EdaConfig, u_eda::error::EdaError> {
        let mut config = match &self.config {
            Some(path) => EdaConfig::from_json_file(path)?,
            None => EdaConfig::default(),
        };
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(column) = self.column {
            config.column = column;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.chart_dir.is_some() {
            config.chart_dir = self.chart_dir;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    match pipeline::run(&config, &mut stdout.lock()) {
        Ok(summary) => {
            tracing::info!(
                rows_loaded = summary.rows_loaded,
                rows_dropped = summary.rows_dropped,
                artifacts = summary.artifacts.len(),
                "analysis complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Analysis error: {e}");
            ExitCode::FAILURE
        }
    }
}
