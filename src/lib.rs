//! # u-eda
//!
//! Exploratory data analysis of a delimited table: descriptive statistics,
//! chart datasets and the shape of one numeric column's distribution.
//!
//! The core is the moment analyzer: mean, sample standard deviation,
//! skewness and excess kurtosis of a column, plus a qualitative shape
//! classification under an explicitly chosen threshold policy.
//!
//! ## Modules
//!
//! - [`dataframe`] — Column-major table (numeric / categorical columns, missing-value bitmap)
//! - [`csv_loader`] — Delimited text loading with type inference
//! - [`moments`] — Mean, standard deviation, skewness, excess kurtosis
//! - [`shape`] — Skew / kurtosis labels under symmetric-band or sign policy
//! - [`profiling`] — `describe`-style column summaries and row preview
//! - [`correlation`] — Pearson correlation matrix
//! - [`charts`] — Trend, categorical aggregate and heatmap datasets
//! - [`report`] — Text report writers
//! - [`pipeline`] — End-to-end run driven by [`pipeline::EdaConfig`]
//! - [`ffi`] — C FFI bindings (auto-generated C header via cbindgen)
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use u_eda::csv_loader::CsvLoader;
//! use u_eda::moments::analyze;
//! use u_eda::shape::{classify, ThresholdPolicy};
//!
//! let csv = "year,sex,suicides_no\n1987,male,1\n1987,female,1\n\
//!            1988,male,1\n1988,female,1\n1989,male,10\n";
//! let mut df = CsvLoader::new().load_str(csv).unwrap();
//! df.drop_missing_rows();
//!
//! let m = analyze(&df, "suicides_no").unwrap();
//! let shape = classify(m.skewness, m.excess_kurtosis, ThresholdPolicy::SymmetricBand);
//! assert_eq!(shape.to_string(), "right-skewed and mesokurtic");
//! ```

pub mod charts;
pub mod correlation;
pub mod csv_loader;
pub mod dataframe;
pub mod error;
pub mod ffi;
pub mod moments;
pub mod pipeline;
pub mod profiling;
pub mod report;
pub mod shape;
