//! Column summaries and row previews for the preprocessing report.
//!
//! Profiling tolerates dirty data: missing values are skipped, not errors.
//!
//! ```
//! use u_eda::csv_loader::CsvLoader;
//! use u_eda::profiling::{describe, ColumnSummary};
//!
//! let df = CsvLoader::new().load_str("x,sex\n1,m\n2,f\nNA,m\n4,m\n").unwrap();
//! let summaries = describe(&df);
//! match &summaries[0] {
//!     ColumnSummary::Numeric { stats, .. } => {
//!         assert_eq!(stats.count, 3);
//!         assert_eq!(stats.max, 4.0);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use serde::Serialize;

use crate::dataframe::{Column, DataFrame};

/// `describe()`-style statistics for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `NaN` below two values.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Frequency statistics for a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    /// Most frequent label; ties go to the label seen first.
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnSummary {
    Numeric { name: String, stats: NumericSummary },
    Categorical { name: String, stats: CategoricalSummary },
}

impl ColumnSummary {
    pub fn name(&self) -> &str {
        match self {
            Self::Numeric { name, .. } | Self::Categorical { name, .. } => name,
        }
    }
}

/// Summarizes every column, in column order.
pub fn describe(df: &DataFrame) -> Vec<ColumnSummary> {
    df.iter()
        .map(|(name, col)| match col {
            Column::Numeric { .. } => ColumnSummary::Numeric {
                name: name.to_string(),
                stats: summarize_numeric(&col.valid_numeric_values().unwrap_or_default()),
            },
            Column::Categorical {
                dictionary,
                indices,
                validity,
            } => {
                let mut freq = vec![0usize; dictionary.len()];
                for i in validity.valid_indices() {
                    freq[indices[i] as usize] += 1;
                }
                ColumnSummary::Categorical {
                    name: name.to_string(),
                    stats: summarize_categorical(dictionary, &freq),
                }
            }
        })
        .collect()
}

fn summarize_numeric(values: &[f64]) -> NumericSummary {
    let count = values.len();
    if count == 0 {
        return NumericSummary {
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        };
    }

    let std = if count < 2 {
        f64::NAN
    } else {
        u_numflow::stats::std_dev(values).unwrap_or(f64::NAN)
    };

    NumericSummary {
        count,
        mean: u_numflow::stats::mean(values).unwrap_or(f64::NAN),
        std,
        min: u_numflow::stats::min(values).unwrap_or(f64::NAN),
        q1: u_numflow::stats::quantile(values, 0.25).unwrap_or(f64::NAN),
        median: u_numflow::stats::median(values).unwrap_or(f64::NAN),
        q3: u_numflow::stats::quantile(values, 0.75).unwrap_or(f64::NAN),
        max: u_numflow::stats::max(values).unwrap_or(f64::NAN),
    }
}

fn summarize_categorical(dictionary: &[String], freq: &[usize]) -> CategoricalSummary {
    let count = freq.iter().sum();
    let unique = freq.iter().filter(|&&f| f > 0).count();
    // Strict `>` keeps the earliest label on ties.
    let mut best: Option<(usize, usize)> = None;
    for (i, &f) in freq.iter().enumerate() {
        if f > 0 && best.map_or(true, |(_, bf)| f > bf) {
            best = Some((i, f));
        }
    }
    CategoricalSummary {
        count,
        unique,
        top: best.map(|(i, _)| dictionary[i].clone()),
        freq: best.map_or(0, |(_, f)| f),
    }
}

/// First `n` rows, each rendered as display strings (`NaN` for missing).
pub fn head(df: &DataFrame, n: usize) -> Vec<Vec<String>> {
    (0..n.min(df.row_count()))
        .map(|row| df.iter().map(|(_, col)| col.display_at(row)).collect())
        .collect()
}
