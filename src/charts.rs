//! Data behind the three exploratory charts.
//!
//! Each chart is reduced to a serializable dataset; image rendering is left
//! to whatever consumes the JSON artifacts.
//!
//! | Chart | Dataset |
//! |-------|---------|
//! | relational (trend) | mean of `y` per distinct `x`, one series per `hue` value |
//! | categorical | sum of `value` per category |
//! | statistical (heatmap) | Pearson correlation matrix |
//!
//! ```
//! use u_eda::charts::category_aggregate;
//! use u_eda::csv_loader::CsvLoader;
//!
//! let df = CsvLoader::new().load_str("sex,n\nmale,21\nfemale,16\nmale,14\n").unwrap();
//! let agg = category_aggregate(&df, "sex", "n").unwrap();
//! assert_eq!(agg.bars[0].label, "male");
//! assert_eq!(agg.bars[0].total, 35.0);
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::correlation::{correlation_matrix, CorrelationMatrix};
use crate::dataframe::{Column, DataFrame};
use crate::error::EdaError;

pub const RELATIONAL_FILE: &str = "relational_plot.json";
pub const CATEGORICAL_FILE: &str = "categorical_plot.json";
pub const STATISTICAL_FILE: &str = "statistical_plot.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub group: String,
    /// `(x, mean y)` sorted by `x`.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub x: String,
    pub y: String,
    pub hue: String,
    pub series: Vec<TrendSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub value: String,
    /// One bar per label, in first-appearance order.
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub matrix: CorrelationMatrix,
}

/// All three chart datasets of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub relational: TrendChart,
    pub categorical: CategoryAggregate,
    pub statistical: Heatmap,
}

fn numeric_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, EdaError> {
    let col = df.require(name)?;
    if col.valid_numeric_values().is_none() {
        return Err(EdaError::invalid(name, "chart axis requires a numeric column"));
    }
    Ok(col)
}

/// Per-group trend of `y` over `x`. Rows missing any of the three values are skipped.
pub fn trend_chart(df: &DataFrame, x: &str, y: &str, hue: &str) -> Result<TrendChart, EdaError> {
    let x_col = numeric_column(df, x)?;
    let y_col = numeric_column(df, y)?;
    let hue_col = df.require(hue)?;

    let mut groups: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for row in 0..df.row_count() {
        let (Some(xv), Some(yv)) = (x_col.numeric_at(row), y_col.numeric_at(row)) else {
            continue;
        };
        if !hue_col.is_valid(row) {
            continue;
        }
        let key = hue_col.display_at(row);
        match groups.iter_mut().find(|(g, _)| *g == key) {
            Some((_, pts)) => pts.push((xv, yv)),
            None => groups.push((key, vec![(xv, yv)])),
        }
    }

    let series = groups
        .into_iter()
        .map(|(group, mut pts)| {
            pts.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut points: Vec<(f64, f64)> = Vec::new();
            let mut count = 0usize;
            for (xv, yv) in pts {
                if points.last().is_some_and(|(lx, _)| *lx == xv) {
                    if let Some((_, sum)) = points.last_mut() {
                        *sum += yv;
                    }
                    count += 1;
                } else {
                    finish_mean(&mut points, count);
                    points.push((xv, yv));
                    count = 1;
                }
            }
            finish_mean(&mut points, count);
            TrendSeries { group, points }
        })
        .collect::<Vec<_>>();

    debug!(x, y, hue, groups = series.len(), "built trend chart");
    Ok(TrendChart {
        x: x.to_string(),
        y: y.to_string(),
        hue: hue.to_string(),
        series,
    })
}

/// Turns the running sum of the last point into a mean over `count` rows.
fn finish_mean(points: &mut [(f64, f64)], count: usize) {
    if let Some((_, sum)) = points.last_mut() {
        if count > 1 {
            *sum /= count as f64;
        }
    }
}

/// Sum of `value` per label of `category`.
pub fn category_aggregate(
    df: &DataFrame,
    category: &str,
    value: &str,
) -> Result<CategoryAggregate, EdaError> {
    let cat_col = df.require(category)?;
    let val_col = numeric_column(df, value)?;

    let mut bars: Vec<Bar> = Vec::new();
    for row in 0..df.row_count() {
        let Some(v) = val_col.numeric_at(row) else {
            continue;
        };
        if !cat_col.is_valid(row) {
            continue;
        }
        let label = cat_col.display_at(row);
        match bars.iter_mut().find(|b| b.label == label) {
            Some(bar) => bar.total += v,
            None => bars.push(Bar { label, total: v }),
        }
    }

    Ok(CategoryAggregate {
        category: category.to_string(),
        value: value.to_string(),
        bars,
    })
}

pub fn heatmap(df: &DataFrame, columns: &[&str]) -> Result<Heatmap, EdaError> {
    Ok(Heatmap {
        matrix: correlation_matrix(df, columns)?,
    })
}

impl ChartSet {
    /// Writes the three datasets as pretty JSON into `dir`, creating it if needed.
    pub fn write_json(&self, dir: &Path) -> Result<Vec<PathBuf>, EdaError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(3);
        let artifacts: [(&str, serde_json::Value); 3] = [
            (RELATIONAL_FILE, serde_json::to_value(&self.relational)?),
            (CATEGORICAL_FILE, serde_json::to_value(&self.categorical)?),
            (STATISTICAL_FILE, serde_json::to_value(&self.statistical)?),
        ];
        for (file, value) in artifacts {
            let path = dir.join(file);
            std::fs::write(&path, serde_json::to_string_pretty(&value)?)?;
            info!(path = %path.display(), "wrote chart data");
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_loader::CsvLoader;

    fn sample() -> DataFrame {
        CsvLoader::new()
            .load_str(
                "country,year,sex,suicides_no,population\n\
                 Albania,1987,male,21,312900\n\
                 Albania,1987,female,16,308000\n\
                 Albania,1988,male,14,289700\n\
                 Chile,1987,male,40,1000000\n\
                 Chile,1988,female,NA,990000\n\
                 Chile,1988,male,30,980000\n",
            )
            .unwrap()
    }

    #[test]
    fn trend_means_per_year_and_country() {
        let chart = trend_chart(&sample(), "year", "suicides_no", "country").unwrap();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].group, "Albania");
        assert_eq!(chart.series[0].points, vec![(1987.0, 18.5), (1988.0, 14.0)]);
        assert_eq!(chart.series[1].group, "Chile");
        assert_eq!(chart.series[1].points, vec![(1987.0, 40.0), (1988.0, 30.0)]);
    }

    #[test]
    fn aggregate_sums_per_category() {
        let agg = category_aggregate(&sample(), "sex", "suicides_no").unwrap();
        assert_eq!(
            agg.bars,
            vec![
                Bar {
                    label: "male".into(),
                    total: 105.0
                },
                Bar {
                    label: "female".into(),
                    total: 16.0
                },
            ]
        );
    }

    #[test]
    fn chart_axes_must_be_numeric() {
        let df = sample();
        assert!(matches!(
            trend_chart(&df, "sex", "suicides_no", "country"),
            Err(EdaError::InvalidInput { .. })
        ));
        assert!(matches!(
            category_aggregate(&df, "gender", "suicides_no"),
            Err(EdaError::MissingColumn { .. })
        ));
    }

    #[test]
    fn writes_three_json_artifacts() {
        let df = sample();
        let set = ChartSet {
            relational: trend_chart(&df, "year", "suicides_no", "country").unwrap(),
            categorical: category_aggregate(&df, "sex", "suicides_no").unwrap(),
            statistical: heatmap(&df, &["suicides_no", "population", "year"]).unwrap(),
        };
        let dir = tempfile::tempdir().unwrap();
        let paths = set.write_json(dir.path()).unwrap();
        assert_eq!(paths.len(), 3);
        let text = std::fs::read_to_string(dir.path().join(STATISTICAL_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["matrix"]["names"][1], "population");
    }
}
