//! End-to-end exploratory run.
//!
//! Stages, each aborting the run on error before producing its output:
//!
//! 1. load the table
//! 2. write the preprocessing report, then drop rows with missing values
//! 3. build the chart datasets (and write them if a chart directory is set)
//! 4. compute moments of the target column and classify its shape
//! 5. write the moments report

use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::charts::{category_aggregate, heatmap, trend_chart, ChartSet};
use crate::correlation::numeric_correlation;
use crate::csv_loader::CsvLoader;
use crate::dataframe::DataFrame;
use crate::error::EdaError;
use crate::moments::{analyze, Moments};
use crate::report::{write_moments_report, write_preprocessing_report};
use crate::shape::{classify, ShapeClassification, ThresholdPolicy};

/// Columns of the relational (trend) chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    pub x: String,
    pub y: String,
    pub hue: String,
}

/// Columns of the categorical (bar) chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateConfig {
    pub category: String,
    pub value: String,
}

/// Run configuration. Missing fields in a config file take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    pub input: PathBuf,
    /// Numeric column whose moments are reported.
    pub column: String,
    pub policy: ThresholdPolicy,
    /// Field delimiter as a single ASCII character.
    pub delimiter: char,
    pub trend: TrendConfig,
    pub aggregate: AggregateConfig,
    pub heatmap_columns: Vec<String>,
    /// Where chart datasets are written; `None` skips writing.
    pub chart_dir: Option<PathBuf>,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.csv"),
            column: "suicides_no".to_string(),
            policy: ThresholdPolicy::SymmetricBand,
            delimiter: ',',
            trend: TrendConfig {
                x: "year".to_string(),
                y: "suicides_no".to_string(),
                hue: "country".to_string(),
            },
            aggregate: AggregateConfig {
                category: "sex".to_string(),
                value: "suicides_no".to_string(),
            },
            heatmap_columns: vec![
                "suicides_no".to_string(),
                "population".to_string(),
                "year".to_string(),
            ],
            chart_dir: None,
        }
    }
}

impl EdaConfig {
    /// Reads a JSON config file.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, EdaError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn loader(&self) -> Result<CsvLoader, EdaError> {
        if !self.delimiter.is_ascii() {
            return Err(EdaError::invalid(
                "delimiter",
                format!("'{}' is not a single-byte character", self.delimiter),
            ));
        }
        Ok(CsvLoader::new().delimiter(self.delimiter as u8))
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub moments: Moments,
    pub shape: ShapeClassification,
    pub charts: ChartSet,
    pub artifacts: Vec<PathBuf>,
}

/// Runs every stage against the file named in `config`, writing text to `out`.
pub fn run<W: Write>(config: &EdaConfig, out: &mut W) -> Result<RunSummary, EdaError> {
    let df = config.loader()?.load_path(&config.input)?;
    run_on(config, df, out)
}

/// Runs every stage after loading, on an already-parsed table.
pub fn run_on<W: Write>(
    config: &EdaConfig,
    mut df: DataFrame,
    out: &mut W,
) -> Result<RunSummary, EdaError> {
    let rows_loaded = df.row_count();

    write_preprocessing_report(out, &df, &numeric_correlation(&df))?;
    let rows_dropped = df.drop_missing_rows();
    if rows_dropped > 0 {
        warn!(rows_dropped, remaining = df.row_count(), "dropped rows with missing values");
    }

    let charts = build_charts(config, &df)?;
    let artifacts = match &config.chart_dir {
        Some(dir) => charts.write_json(dir)?,
        None => Vec::new(),
    };

    let moments = analyze(&df, &config.column)?;
    let shape = classify(moments.skewness, moments.excess_kurtosis, config.policy);
    info!(column = %config.column, policy = %config.policy, %shape, "classified distribution");

    write_moments_report(out, &config.column, &moments, &shape)?;

    Ok(RunSummary {
        rows_loaded,
        rows_dropped,
        moments,
        shape,
        charts,
        artifacts,
    })
}

fn build_charts(config: &EdaConfig, df: &DataFrame) -> Result<ChartSet, EdaError> {
    let heat_cols: Vec<&str> = config.heatmap_columns.iter().map(String::as_str).collect();
    Ok(ChartSet {
        relational: trend_chart(df, &config.trend.x, &config.trend.y, &config.trend.hue)?,
        categorical: category_aggregate(df, &config.aggregate.category, &config.aggregate.value)?,
        statistical: heatmap(df, &heat_cols)?,
    })
}
