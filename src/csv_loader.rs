//! Delimited-text loader with per-column type inference.
//!
//! Reads a header row plus records into a [`DataFrame`]. A column whose
//! non-missing values all parse as `f64` becomes
//! [`Numeric`](crate::dataframe::Column::Numeric); anything else becomes
//! [`Categorical`](crate::dataframe::Column::Categorical).
//!
//! Standard missing-value markers are recognized: empty, `NA`, `N/A`,
//! `null`, `None`, `NaN`, `#N/A` and their common case variants.
//!
//! # Example
//!
//! ```
//! use u_eda::csv_loader::CsvLoader;
//! use u_eda::dataframe::DataType;
//!
//! let csv = "country,year,sex,suicides_no\nAlbania,1987,male,21\nAlbania,1987,female,16\n";
//! let df = CsvLoader::new().load_str(csv).unwrap();
//! assert_eq!(df.row_count(), 2);
//! assert_eq!(df.column_by_name("year").unwrap().data_type(), DataType::Numeric);
//! assert_eq!(df.column_by_name("sex").unwrap().data_type(), DataType::Categorical);
//! ```

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::dataframe::{Column, DataFrame, ValidityBitmap};
use crate::error::EdaError;

const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", "NaN", "nan", "NAN", "#N/A",
];

/// Loader configuration and entry point.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    has_header: bool,
    null_markers: Vec<String>,
}

impl CsvLoader {
    /// Comma delimiter, header row, standard null markers.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Without a header, columns are named `col_0`, `col_1`, ...
    pub fn has_header(mut self, header: bool) -> Self {
        self.has_header = header;
        self
    }

    /// Replaces the default null markers.
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    pub fn load_str(&self, input: &str) -> Result<DataFrame, EdaError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        self.load_reader(input.as_bytes())
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<DataFrame, EdaError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading table");
        let file = std::fs::File::open(path)?;
        let df = self.load_reader(std::io::BufReader::new(file))?;
        info!(rows = df.row_count(), columns = df.column_count(), "table loaded");
        Ok(df)
    }

    /// Parses records from any reader.
    ///
    /// Ragged rows fail with [`EdaError::CsvParse`]. Empty input yields an
    /// empty table; header-only input yields zero-row numeric columns.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<DataFrame, EdaError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_header)
            .flexible(false)
            .from_reader(reader);

        let mut headers: Vec<String> = if self.has_header {
            rdr.headers()?.iter().map(|h| h.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            if raw_columns.is_empty() {
                raw_columns = vec![Vec::new(); record.len()];
            }
            for (col, field) in raw_columns.iter_mut().zip(record.iter()) {
                col.push(field.trim().to_string());
            }
        }

        if raw_columns.first().map_or(true, Vec::is_empty) {
            let mut df = DataFrame::new();
            for name in headers {
                df.add_column(name, Column::numeric(Vec::new(), ValidityBitmap::empty()))?;
            }
            return Ok(df);
        }
        if headers.is_empty() {
            headers = (0..raw_columns.len()).map(|i| format!("col_{i}")).collect();
        }

        let mut df = DataFrame::new();
        for (name, raw) in headers.into_iter().zip(raw_columns) {
            let column = self.build_column(&raw);
            debug!(
                column = %name,
                data_type = %column.data_type(),
                nulls = column.null_count(),
                "inferred column"
            );
            df.add_column(name, column)?;
        }
        Ok(df)
    }

    fn is_null(&self, value: &str) -> bool {
        self.null_markers.iter().any(|m| m == value)
    }

    fn build_column(&self, raw: &[String]) -> Column {
        let cells: Vec<Option<&str>> = raw
            .iter()
            .map(|s| (!self.is_null(s)).then_some(s.as_str()))
            .collect();

        let parsed: Option<Vec<Option<f64>>> = cells
            .iter()
            .map(|cell| match cell {
                Some(s) => s.parse::<f64>().ok().map(Some),
                None => Some(None),
            })
            .collect();

        match parsed {
            Some(nums) => {
                let mut values = Vec::with_capacity(nums.len());
                let mut validity = ValidityBitmap::empty();
                for n in nums {
                    values.push(n.unwrap_or(0.0));
                    validity.push(n.is_some());
                }
                Column::numeric(values, validity)
            }
            None => Column::from_labels(&cells),
        }
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataframe::DataType;

    #[test]
    fn infers_numeric_and_categorical() {
        let csv = "country,year,sex,suicides_no,population\n\
                   Albania,1987,male,21,312900\n\
                   Albania,1987,female,16,308000\n\
                   Albania,1988,male,14,289700\n";
        let df = CsvLoader::new().load_str(csv).unwrap();
        assert_eq!(df.row_count(), 3);
        assert_eq!(
            df.schema(),
            vec![
                ("country", DataType::Categorical),
                ("year", DataType::Numeric),
                ("sex", DataType::Categorical),
                ("suicides_no", DataType::Numeric),
                ("population", DataType::Numeric),
            ]
        );
        assert_eq!(df.numeric_values("suicides_no").unwrap(), vec![21.0, 16.0, 14.0]);
    }

    #[test]
    fn null_markers_become_missing() {
        let csv = "x\n1.0\nNA\n3.0\n\"\"\nnull\nNaN\n";
        let df = CsvLoader::new().load_str(csv).unwrap();
        let x = df.column_by_name("x").unwrap();
        assert_eq!(x.data_type(), DataType::Numeric);
        assert_eq!(x.len(), 6);
        assert_eq!(x.null_count(), 4);
        assert_eq!(df.numeric_values("x").unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn all_null_column_is_numeric() {
        let df = CsvLoader::new().load_str("x,y\nNA,1\nnull,2\n").unwrap();
        let x = df.column_by_name("x").unwrap();
        assert_eq!(x.data_type(), DataType::Numeric);
        assert_eq!(x.valid_count(), 0);
    }

    #[test]
    fn single_word_demotes_to_categorical() {
        let df = CsvLoader::new().load_str("x\n1\n2\nthree\n").unwrap();
        assert_eq!(df.column_by_name("x").unwrap().data_type(), DataType::Categorical);
    }

    #[test]
    fn quoted_fields_and_whitespace() {
        let csv = "name,gdp\n\"Korea, Republic of\",  12.5 \nChile,3\n";
        let df = CsvLoader::new().load_str(csv).unwrap();
        assert_eq!(df.column_by_name("name").unwrap().category_at(0), Some("Korea, Republic of"));
        assert_eq!(df.numeric_values("gdp").unwrap(), vec![12.5, 3.0]);
    }

    #[test]
    fn ragged_row_is_parse_error() {
        let err = CsvLoader::new().load_str("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, EdaError::CsvParse { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn empty_and_header_only() {
        assert_eq!(CsvLoader::new().load_str("").unwrap().column_count(), 0);
        let df = CsvLoader::new().load_str("a,b\n").unwrap();
        assert_eq!(df.row_count(), 0);
        assert_eq!(df.column_names(), ["a", "b"]);
        assert_eq!(df.require("a").unwrap().data_type(), DataType::Numeric);
    }

    #[test]
    fn headerless_and_custom_delimiter() {
        let df = CsvLoader::new()
            .has_header(false)
            .delimiter(b';')
            .load_str("1;2\n3;4\n")
            .unwrap();
        assert_eq!(df.column_names(), &["col_0", "col_1"]);
        assert_eq!(df.numeric_values("col_1").unwrap(), vec![2.0, 4.0]);
    }

    #[test]
    fn crlf_and_bom() {
        let df = CsvLoader::new().load_str("\u{feff}a,b\r\n1,2\r\n3,4\r\n").unwrap();
        assert_eq!(df.column_names(), &["a", "b"]);
        assert_eq!(df.numeric_values("a").unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn custom_null_markers() {
        let df = CsvLoader::new()
            .null_markers(vec!["-999".to_string()])
            .load_str("x\n1\n-999\n3\n")
            .unwrap();
        assert_eq!(df.column_by_name("x").unwrap().null_count(), 1);
    }

    #[test]
    fn load_path_missing_file_is_io_error() {
        let err = CsvLoader::new().load_path("/nonexistent/u-eda/data.csv").unwrap_err();
        assert!(matches!(err, EdaError::Io(_)));
    }
}
