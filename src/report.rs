//! Plain-text report writers.
//!
//! The moments report reads:
//!
//! ```text
//! For the attribute suicides_no:
//! Mean = 242.57,
//! Standard Deviation = 902.05,
//! Skewness = 10.35, and
//! Excess Kurtosis = 157.36.
//! The data is right-skewed and leptokurtic.
//! ```

use std::io::Write;

use crate::correlation::CorrelationMatrix;
use crate::dataframe::DataFrame;
use crate::moments::Moments;
use crate::profiling::{describe, head, ColumnSummary, NumericSummary};
use crate::shape::ShapeClassification;

/// Rows shown in the "First Rows" preview.
pub const HEAD_ROWS: usize = 5;

/// Writes the moments of `column` and the shape sentence.
///
/// ```
/// use u_eda::moments::moments_of;
/// use u_eda::report::write_moments_report;
/// use u_eda::shape::{classify, ThresholdPolicy};
///
/// let m = moments_of("v", &[1.0, 1.0, 1.0, 1.0, 10.0]).unwrap();
/// let shape = classify(m.skewness, m.excess_kurtosis, ThresholdPolicy::SymmetricBand);
/// let mut out = Vec::new();
/// write_moments_report(&mut out, "v", &m, &shape).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.ends_with("The data is right-skewed and mesokurtic.\n"));
/// ```
pub fn write_moments_report<W: Write>(
    out: &mut W,
    column: &str,
    moments: &Moments,
    shape: &ShapeClassification,
) -> std::io::Result<()> {
    writeln!(out, "For the attribute {column}:")?;
    writeln!(out, "Mean = {:.2}, ", moments.mean)?;
    writeln!(out, "Standard Deviation = {:.2}, ", moments.std_dev)?;
    writeln!(out, "Skewness = {:.2}, and ", moments.skewness)?;
    writeln!(out, "Excess Kurtosis = {:.2}.", moments.excess_kurtosis)?;
    writeln!(out, "The data is {shape}.")
}

/// Writes the summary statistics, numeric correlation matrix and first rows.
pub fn write_preprocessing_report<W: Write>(
    out: &mut W,
    df: &DataFrame,
    correlation: &CorrelationMatrix,
) -> std::io::Result<()> {
    let summaries = describe(df);

    writeln!(out, "Summary Stats:")?;
    write_numeric_summary(out, &summaries)?;
    write_categorical_summary(out, &summaries)?;
    writeln!(out)?;

    writeln!(out, "Correlation Matrix:")?;
    let rows: Vec<(String, Vec<String>)> = correlation
        .names
        .iter()
        .zip(correlation.rows())
        .map(|(name, row)| (name.clone(), row.iter().map(|&v| cell(v)).collect()))
        .collect();
    write_table(out, &correlation.names, &rows)?;
    writeln!(out)?;

    writeln!(out, "First Rows:")?;
    let rows: Vec<(String, Vec<String>)> = head(df, HEAD_ROWS)
        .into_iter()
        .enumerate()
        .map(|(i, row)| (i.to_string(), row))
        .collect();
    write_table(out, df.column_names(), &rows)?;
    writeln!(out)
}

fn write_numeric_summary<W: Write>(
    out: &mut W,
    summaries: &[ColumnSummary],
) -> std::io::Result<()> {
    let numeric: Vec<(&str, &NumericSummary)> = summaries
        .iter()
        .filter_map(|s| match s {
            ColumnSummary::Numeric { name, stats } => Some((name.as_str(), stats)),
            ColumnSummary::Categorical { .. } => None,
        })
        .collect();
    if numeric.is_empty() {
        return Ok(());
    }
    let header: Vec<String> = numeric.iter().map(|(n, _)| (*n).to_string()).collect();
    let labels = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    let rows: Vec<(String, Vec<String>)> = labels
        .iter()
        .map(|&label| {
            (
                label.to_string(),
                numeric.iter().map(|(_, s)| cell(summary_stat(s, label))).collect(),
            )
        })
        .collect();
    write_table(out, &header, &rows)
}

fn summary_stat(s: &NumericSummary, label: &str) -> f64 {
    match label {
        "count" => s.count as f64,
        "mean" => s.mean,
        "std" => s.std,
        "min" => s.min,
        "25%" => s.q1,
        "50%" => s.median,
        "75%" => s.q3,
        _ => s.max,
    }
}

fn write_categorical_summary<W: Write>(
    out: &mut W,
    summaries: &[ColumnSummary],
) -> std::io::Result<()> {
    let categorical: Vec<_> = summaries
        .iter()
        .filter_map(|s| match s {
            ColumnSummary::Categorical { name, stats } => Some((name.clone(), stats)),
            ColumnSummary::Numeric { .. } => None,
        })
        .collect();
    if categorical.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    let header: Vec<String> = categorical.iter().map(|(n, _)| n.clone()).collect();
    let rows: Vec<(String, Vec<String>)> = vec![
        ("count".to_string(), categorical.iter().map(|(_, s)| s.count.to_string()).collect()),
        ("unique".to_string(), categorical.iter().map(|(_, s)| s.unique.to_string()).collect()),
        (
            "top".to_string(),
            categorical
                .iter()
                .map(|(_, s)| s.top.clone().unwrap_or_else(|| "NaN".to_string()))
                .collect(),
        ),
        ("freq".to_string(), categorical.iter().map(|(_, s)| s.freq.to_string()).collect()),
    ];
    write_table(out, &header, &rows)
}

fn cell(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

/// Right-aligned table with a leading label column.
fn write_table<W: Write>(
    out: &mut W,
    header: &[String],
    rows: &[(String, Vec<String>)],
) -> std::io::Result<()> {
    let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|(_, r)| r.get(i).map(String::len))
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write!(out, "{:label_width$}", "")?;
    for (h, w) in header.iter().zip(widths.iter().copied()) {
        write!(out, "  {h:>w$}")?;
    }
    writeln!(out)?;
    for (label, row) in rows {
        write!(out, "{label:<label_width$}")?;
        for (v, w) in row.iter().zip(widths.iter().copied()) {
            write!(out, "  {v:>w$}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
