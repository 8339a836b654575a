//! Pearson correlation between numeric columns.
//!
//! Each pair uses the rows where both columns are present
//! (pairwise-complete). A pair with fewer than two shared rows, or where
//! either side is constant, yields `NaN`.
//!
//! ```
//! use u_eda::csv_loader::CsvLoader;
//! use u_eda::correlation::correlation_matrix;
//!
//! let df = CsvLoader::new().load_str("x,y,z\n1,2,5\n2,4,4\n3,6,3\n4,8,2\n").unwrap();
//! let m = correlation_matrix(&df, &["x", "y", "z"]).unwrap();
//! assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
//! assert!((m.get(0, 2) + 1.0).abs() < 1e-12);
//! ```

use serde::Serialize;

use crate::dataframe::DataFrame;
use crate::error::EdaError;

/// Symmetric `n × n` correlation matrix, row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Number of variables.
    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size() + col]
    }

    /// Rows of the matrix, for tabular rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.size().max(1))
    }
}

/// Correlates the named columns.
///
/// Fails with [`EdaError::MissingColumn`] or, for a categorical column,
/// [`EdaError::InvalidInput`].
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Result<CorrelationMatrix, EdaError> {
    let mut series: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for &name in columns {
        let col = df.require(name)?;
        if col.valid_numeric_values().is_none() {
            return Err(EdaError::invalid(name, "correlation requires a numeric column"));
        }
        series.push((0..col.len()).map(|i| col.numeric_at(i)).collect());
    }

    let n = columns.len();
    let mut values = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let r = pearson_pairwise(&series[i], &series[j]);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    Ok(CorrelationMatrix {
        names: columns.iter().map(|s| (*s).to_string()).collect(),
        values,
    })
}

/// Correlates every numeric column of `df`.
pub fn numeric_correlation(df: &DataFrame) -> CorrelationMatrix {
    let names = df.numeric_column_names();
    // Every listed column exists and is numeric.
    correlation_matrix(df, &names).unwrap_or(CorrelationMatrix {
        names: Vec::new(),
        values: Vec::new(),
    })
}

fn pearson_pairwise(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();
    if xs.len() < 2 || is_constant(&xs) || is_constant(&ys) {
        return f64::NAN;
    }
    u_analytics::correlation::pearson(&xs, &ys).map_or(f64::NAN, |pr| pr.r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
