//! Four descriptive moments of a numeric column.
//!
//! | Moment | Definition |
//! |--------|------------|
//! | mean | arithmetic mean |
//! | std_dev | sample standard deviation, `n − 1` denominator |
//! | skewness | `m3 / m2^1.5` (Fisher-Pearson, no bias correction) |
//! | excess_kurtosis | `m4 / m2² − 3` (no bias correction) |
//!
//! where `m_k = Σ(x − mean)^k / n` are the population central moments.
//!
//! A constant column has `m2 = 0`; its skewness and excess kurtosis are
//! reported as `NaN` rather than as an error.
//!
//! # Example
//!
//! ```
//! use u_eda::moments::moments_of;
//!
//! let m = moments_of("x", &[1.0, 1.0, 1.0, 1.0, 10.0]).unwrap();
//! assert!((m.mean - 2.8).abs() < 1e-12);
//! assert!((m.skewness - 1.5).abs() < 1e-12);
//! assert!((m.excess_kurtosis - 0.25).abs() < 1e-12);
//! ```

use serde::Serialize;
use tracing::debug;

use crate::dataframe::DataFrame;
use crate::error::EdaError;

/// Mean, standard deviation, skewness and excess kurtosis of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Moments {
    /// Number of samples used.
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (`n − 1` denominator).
    pub std_dev: f64,
    /// Third standardized moment. `NaN` for a constant sample.
    pub skewness: f64,
    /// Fourth standardized moment minus 3. `NaN` for a constant sample.
    pub excess_kurtosis: f64,
}

/// Computes the moments of the present values of `column` in `df`.
///
/// # Errors
///
/// - [`EdaError::MissingColumn`] if `column` is absent
/// - [`EdaError::InvalidInput`] if the column is categorical, has fewer
///   than two present values, or holds a non-finite value
///
/// ```
/// use u_eda::csv_loader::CsvLoader;
/// use u_eda::moments::analyze;
///
/// let df = CsvLoader::new().load_str("v\n2\n4\n4\n4\n5\n5\n7\n9\n").unwrap();
/// let m = analyze(&df, "v").unwrap();
/// assert_eq!(m.mean, 5.0);
/// assert!((m.std_dev - 2.138).abs() < 1e-3);
/// ```
pub fn analyze(df: &DataFrame, column: &str) -> Result<Moments, EdaError> {
    let values = df.numeric_values(column)?;
    if values.is_empty() && df.require(column)?.null_count() > 0 {
        return Err(EdaError::invalid(column, "all values are missing"));
    }
    moments_of(column, &values)
}

/// Computes the moments of a raw sample. `label` names the sample in errors.
pub fn moments_of(label: &str, values: &[f64]) -> Result<Moments, EdaError> {
    let n = values.len();
    match n {
        0 => return Err(EdaError::invalid(label, "column is empty")),
        1 => {
            return Err(EdaError::invalid(
                label,
                "standard deviation is undefined for a single value",
            ))
        }
        _ => {}
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(EdaError::invalid(label, format!("non-finite value {bad}")));
    }

    let nf = n as f64;
    let mean = u_numflow::stats::mean(values)
        .ok_or_else(|| EdaError::invalid(label, "mean is undefined"))?;

    let (mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0);
    for &x in values {
        let d = x - mean;
        let d2 = d * d;
        s2 += d2;
        s3 += d2 * d;
        s4 += d2 * d2;
    }

    let std_dev = (s2 / (nf - 1.0)).sqrt();
    let m2 = s2 / nf;
    let (skewness, excess_kurtosis) = if m2 == 0.0 {
        (f64::NAN, f64::NAN)
    } else {
        let m3 = s3 / nf;
        let m4 = s4 / nf;
        (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
    };

    debug!(label, n, mean, std_dev, skewness, excess_kurtosis, "computed moments");

    Ok(Moments {
        n,
        mean,
        std_dev,
        skewness,
        excess_kurtosis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_loader::CsvLoader;

    const EPS: f64 = 1e-9;

    #[test]
    fn textbook_sample() {
        let m = moments_of("v", &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(m.n, 8);
        assert!((m.mean - 5.0).abs() < EPS);
        assert!((m.std_dev - (32.0f64 / 7.0).sqrt()).abs() < EPS);
        // m2 = 4, m3 = 5.25, m4 = 44.5
        assert!((m.skewness - 0.65625).abs() < EPS);
        assert!((m.excess_kurtosis - (-0.21875)).abs() < EPS);
    }

    #[test]
    fn symmetric_sample_has_zero_skew() {
        let m = moments_of("v", &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((m.mean - 3.0).abs() < EPS);
        assert!(m.skewness.abs() < EPS);
        assert!((m.excess_kurtosis - (-1.3)).abs() < EPS);
    }

    #[test]
    fn right_tailed_sample() {
        let m = moments_of("v", &[1.0, 1.0, 1.0, 1.0, 10.0]).unwrap();
        assert!(m.skewness > 0.5);
        assert!((m.skewness - 1.5).abs() < EPS);
        assert!((m.excess_kurtosis - 0.25).abs() < EPS);
    }

    #[test]
    fn constant_sample_yields_nan_shape() {
        let m = moments_of("v", &[7.0, 7.0, 7.0]).unwrap();
        assert_eq!(m.mean, 7.0);
        assert_eq!(m.std_dev, 0.0);
        assert!(m.skewness.is_nan());
        assert!(m.excess_kurtosis.is_nan());
    }

    #[test]
    fn single_value_is_invalid() {
        let err = moments_of("v", &[3.0]).unwrap_err();
        assert!(matches!(err, EdaError::InvalidInput { .. }));
    }

    #[test]
    fn empty_is_invalid() {
        assert!(matches!(
            moments_of("v", &[]),
            Err(EdaError::InvalidInput { .. })
        ));
    }

    #[test]
    fn non_finite_is_invalid() {
        assert!(matches!(
            moments_of("v", &[1.0, f64::INFINITY]),
            Err(EdaError::InvalidInput { .. })
        ));
    }

    #[test]
    fn analyze_skips_missing_values() {
        let df = CsvLoader::new().load_str("v\n1\nNA\n2\n3\n4\n5\n").unwrap();
        let m = analyze(&df, "v").unwrap();
        assert_eq!(m.n, 5);
        assert!((m.mean - 3.0).abs() < EPS);
    }

    #[test]
    fn analyze_errors() {
        let df = CsvLoader::new()
            .load_str("v,sex,empty\n1,male,NA\n2,female,NA\n")
            .unwrap();
        assert!(matches!(
            analyze(&df, "missing"),
            Err(EdaError::MissingColumn { .. })
        ));
        assert!(matches!(
            analyze(&df, "sex"),
            Err(EdaError::InvalidInput { .. })
        ));
        let err = analyze(&df, "empty").unwrap_err();
        assert!(err.to_string().contains("all values are missing"), "{err}");
    }

    #[test]
    fn header_only_table_is_invalid_not_missing() {
        let df = CsvLoader::new().load_str("v,w\n").unwrap();
        let err = analyze(&df, "v").unwrap_err();
        assert!(matches!(err, EdaError::InvalidInput { .. }), "{err:?}");
        assert!(matches!(
            analyze(&df, "x"),
            Err(EdaError::MissingColumn { .. })
        ));
    }

    #[test]
    fn analyze_is_deterministic() {
        let df = CsvLoader::new().load_str("v\n3\n1\n4\n1\n5\n9\n2\n6\n").unwrap();
        assert_eq!(analyze(&df, "v").unwrap(), analyze(&df, "v").unwrap());
    }
}
