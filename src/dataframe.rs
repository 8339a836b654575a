//! Column-major table model.
//!
//! A [`DataFrame`] holds named, row-aligned columns. Each column is either
//! numeric (`f64`) or categorical (dictionary-encoded strings), and tracks
//! missing values in a bit-packed [`ValidityBitmap`].
//!
//! # Example
//!
//! ```
//! use u_eda::dataframe::{Column, DataFrame, ValidityBitmap};
//!
//! let mut df = DataFrame::new();
//! df.add_column(
//!     "suicides_no".to_string(),
//!     Column::numeric(vec![21.0, 16.0, 14.0], ValidityBitmap::all_valid(3)),
//! ).unwrap();
//! assert_eq!(df.row_count(), 3);
//! assert_eq!(df.numeric_values("suicides_no").unwrap(), vec![21.0, 16.0, 14.0]);
//! ```

use crate::error::EdaError;

// ── ValidityBitmap ────────────────────────────────────────────────────

/// Bit-packed validity flags, one bit per row (1 = present, 0 = missing).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityBitmap {
    bits: Vec<u64>,
    len: usize,
}

impl ValidityBitmap {
    /// Creates a bitmap where all `len` positions are valid.
    pub fn all_valid(len: usize) -> Self {
        let n_words = len.div_ceil(64);
        let mut bits = vec![u64::MAX; n_words];
        let trailing = len % 64;
        if trailing != 0 && n_words > 0 {
            bits[n_words - 1] = (1u64 << trailing) - 1;
        }
        Self { bits, len }
    }

    /// Creates a bitmap where all `len` positions are missing.
    pub fn all_invalid(len: usize) -> Self {
        Self {
            bits: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Creates an empty bitmap.
    pub fn empty() -> Self {
        Self {
            bits: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Marks position `idx` as missing.
    #[inline]
    pub fn set_invalid(&mut self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        self.bits[idx / 64] &= !(1u64 << (idx % 64));
    }

    /// Appends a position.
    pub fn push(&mut self, valid: bool) {
        let idx = self.len;
        self.len += 1;
        if idx / 64 >= self.bits.len() {
            self.bits.push(0);
        }
        if valid {
            self.bits[idx / 64] |= 1u64 << (idx % 64);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts missing positions.
    pub fn null_count(&self) -> usize {
        let valid: usize = self.bits.iter().map(|w| w.count_ones() as usize).sum();
        self.len - valid
    }

    /// Counts present positions.
    pub fn valid_count(&self) -> usize {
        self.len - self.null_count()
    }

    /// Returns an iterator over indices of present positions.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.is_valid(i))
    }

    /// Builds a new bitmap from the positions where `keep[i]` is true.
    fn retain(&self, keep: &[bool]) -> Self {
        let mut out = Self::empty();
        for (i, &k) in keep.iter().enumerate() {
            if k {
                out.push(self.is_valid(i));
            }
        }
        out
    }
}

// ── DataType ──────────────────────────────────────────────────────────

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Real-valued samples stored as `f64`.
    Numeric,
    /// Dictionary-encoded labels.
    Categorical,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column. Missing positions hold a placeholder (`0.0` or
/// dictionary index `0`) that must be ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric {
        values: Vec<f64>,
        validity: ValidityBitmap,
    },
    /// `dictionary` holds distinct labels in first-appearance order;
    /// `indices` maps each row into it.
    Categorical {
        dictionary: Vec<String>,
        indices: Vec<u32>,
        validity: ValidityBitmap,
    },
}

impl Column {
    pub fn numeric(values: Vec<f64>, validity: ValidityBitmap) -> Self {
        Self::Numeric { values, validity }
    }

    pub fn categorical(
        dictionary: Vec<String>,
        indices: Vec<u32>,
        validity: ValidityBitmap,
    ) -> Self {
        Self::Categorical {
            dictionary,
            indices,
            validity,
        }
    }

    /// Builds a categorical column from optional labels, assigning
    /// dictionary indices in first-appearance order.
    pub fn from_labels<S: AsRef<str>>(labels: &[Option<S>]) -> Self {
        let mut dictionary: Vec<String> = Vec::new();
        let mut indices = Vec::with_capacity(labels.len());
        let mut validity = ValidityBitmap::empty();
        for label in labels {
            match label {
                Some(s) => {
                    let s = s.as_ref();
                    let idx = match dictionary.iter().position(|d| d == s) {
                        Some(i) => i,
                        None => {
                            dictionary.push(s.to_string());
                            dictionary.len() - 1
                        }
                    };
                    indices.push(idx as u32);
                    validity.push(true);
                }
                None => {
                    indices.push(0);
                    validity.push(false);
                }
            }
        }
        Self::categorical(dictionary, indices, validity)
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Numeric { .. } => DataType::Numeric,
            Self::Categorical { .. } => DataType::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        self.validity().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validity(&self) -> &ValidityBitmap {
        match self {
            Self::Numeric { validity, .. } | Self::Categorical { validity, .. } => validity,
        }
    }

    pub fn null_count(&self) -> usize {
        self.validity().null_count()
    }

    pub fn valid_count(&self) -> usize {
        self.validity().valid_count()
    }

    pub fn is_valid(&self, idx: usize) -> bool {
        self.validity().is_valid(idx)
    }

    /// Numeric value at `idx`, `None` if missing or not numeric.
    pub fn numeric_at(&self, idx: usize) -> Option<f64> {
        match self {
            Self::Numeric { values, validity } if validity.is_valid(idx) => Some(values[idx]),
            _ => None,
        }
    }

    /// Category label at `idx`, `None` if missing or not categorical.
    pub fn category_at(&self, idx: usize) -> Option<&str> {
        match self {
            Self::Categorical {
                dictionary,
                indices,
                validity,
            } if validity.is_valid(idx) => {
                dictionary.get(indices[idx] as usize).map(String::as_str)
            }
            _ => None,
        }
    }

    /// Present numeric values in row order, or `None` for categorical columns.
    pub fn valid_numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Self::Numeric { values, validity } => {
                Some(validity.valid_indices().map(|i| values[i]).collect())
            }
            Self::Categorical { .. } => None,
        }
    }

    /// Renders the value at `idx` for display; missing values render as `NaN`.
    pub fn display_at(&self, idx: usize) -> String {
        match self {
            Self::Numeric { .. } => match self.numeric_at(idx) {
                Some(v) => format_number(v),
                None => "NaN".to_string(),
            },
            Self::Categorical { .. } => self.category_at(idx).unwrap_or("NaN").to_string(),
        }
    }

    fn retain(&self, keep: &[bool]) -> Self {
        match self {
            Self::Numeric { values, validity } => Self::Numeric {
                values: select(values, keep),
                validity: validity.retain(keep),
            },
            Self::Categorical {
                dictionary,
                indices,
                validity,
            } => Self::Categorical {
                dictionary: dictionary.clone(),
                indices: select(indices, keep),
                validity: validity.retain(keep),
            },
        }
    }
}

fn select<T: Copy>(values: &[T], keep: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(keep)
        .filter(|(_, &k)| k)
        .map(|(&v, _)| v)
        .collect()
}

/// Integers print without a fractional part, everything else with up to six
/// significant decimals.
pub(crate) fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else if v.is_finite() {
        let s = format!("{v:.6}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        v.to_string()
    }
}

// ── DataFrame ─────────────────────────────────────────────────────────

/// Ordered collection of named, row-aligned columns.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named column.
    ///
    /// Fails if the length differs from the existing row count or the name
    /// is already taken.
    pub fn add_column(&mut self, name: String, column: Column) -> Result<(), EdaError> {
        if self.names.contains(&name) {
            return Err(EdaError::DuplicateColumn { name });
        }
        let col_len = column.len();
        if self.columns.is_empty() {
            self.row_count = col_len;
        } else if col_len != self.row_count {
            return Err(EdaError::DimensionMismatch {
                expected: self.row_count,
                actual: col_len,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Looks up a column, failing with [`EdaError::MissingColumn`].
    pub fn require(&self, name: &str) -> Result<&Column, EdaError> {
        self.column_by_name(name).ok_or_else(|| EdaError::MissingColumn {
            name: name.to_string(),
        })
    }

    /// Iterates over `(name, column)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Names of all numeric columns, in column order.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, c)| c.data_type() == DataType::Numeric)
            .map(|(n, _)| n)
            .collect()
    }

    pub fn schema(&self) -> Vec<(&str, DataType)> {
        self.iter().map(|(n, c)| (n, c.data_type())).collect()
    }

    pub fn total_null_count(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }

    /// Present values of a numeric column.
    ///
    /// Fails with [`EdaError::MissingColumn`] if absent and
    /// [`EdaError::InvalidInput`] if the column is categorical.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>, EdaError> {
        let col = self.require(name)?;
        col.valid_numeric_values().ok_or_else(|| {
            EdaError::invalid(name, format!("expected numeric column, found {}", col.data_type()))
        })
    }

    /// Removes every row that has a missing value in any column.
    ///
    /// Returns the number of rows removed.
    ///
    /// ```
    /// use u_eda::csv_loader::CsvLoader;
    ///
    /// let mut df = CsvLoader::new().load_str("a,b\n1,x\nNA,y\n3,\n4,z\n").unwrap();
    /// assert_eq!(df.drop_missing_rows(), 2);
    /// assert_eq!(df.row_count(), 2);
    /// assert_eq!(df.total_null_count(), 0);
    /// ```
    pub fn drop_missing_rows(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.row_count)
            .map(|row| self.columns.iter().all(|c| c.is_valid(row)))
            .collect();
        let kept = keep.iter().filter(|&&k| k).count();
        let dropped = self.row_count - kept;
        if dropped == 0 {
            return 0;
        }
        self.columns = self.columns.iter().map(|c| c.retain(&keep)).collect();
        self.row_count = kept;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_word_boundaries() {
        let bm = ValidityBitmap::all_valid(65);
        assert_eq!(bm.bits.len(), 2);
        assert_eq!(bm.null_count(), 0);
        assert!(bm.is_valid(64));

        let mut bm = ValidityBitmap::empty();
        for i in 0..130 {
            bm.push(i % 4 != 0);
        }
        let expected = (0..130).filter(|i| i % 4 == 0).count();
        assert_eq!(bm.null_count(), expected);
    }

    #[test]
    fn bitmap_set_invalid_and_indices() {
        let mut bm = ValidityBitmap::all_valid(5);
        bm.set_invalid(1);
        bm.set_invalid(3);
        assert_eq!(bm.valid_indices().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(ValidityBitmap::all_invalid(7).valid_count(), 0);
    }

    #[test]
    fn categorical_from_labels() {
        let col = Column::from_labels(&[Some("male"), None, Some("female"), Some("male")]);
        assert_eq!(col.data_type(), DataType::Categorical);
        assert_eq!(col.category_at(0), Some("male"));
        assert_eq!(col.category_at(1), None);
        assert_eq!(col.category_at(2), Some("female"));
        assert_eq!(col.null_count(), 1);
        if let Column::Categorical { dictionary, .. } = &col {
            assert_eq!(dictionary, &["male", "female"]);
        }
    }

    #[test]
    fn add_column_rejects_length_mismatch() {
        let mut df = DataFrame::new();
        df.add_column("x".into(), Column::numeric(vec![1.0, 2.0], ValidityBitmap::all_valid(2)))
            .unwrap();
        let err = df
            .add_column("y".into(), Column::numeric(vec![1.0], ValidityBitmap::all_valid(1)))
            .unwrap_err();
        assert_eq!(
            err,
            EdaError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn add_column_rejects_duplicate_name() {
        let mut df = DataFrame::new();
        df.add_column("x".into(), Column::numeric(vec![1.0], ValidityBitmap::all_valid(1)))
            .unwrap();
        let err = df
            .add_column("x".into(), Column::numeric(vec![2.0], ValidityBitmap::all_valid(1)))
            .unwrap_err();
        assert!(matches!(err, EdaError::DuplicateColumn { .. }));
    }

    #[test]
    fn numeric_values_errors() {
        let mut df = DataFrame::new();
        df.add_column("sex".into(), Column::from_labels(&[Some("male")]))
            .unwrap();
        assert!(matches!(
            df.numeric_values("sex"),
            Err(EdaError::InvalidInput { .. })
        ));
        assert!(matches!(
            df.numeric_values("age"),
            Err(EdaError::MissingColumn { .. })
        ));
    }

    #[test]
    fn drop_missing_rows_keeps_alignment() {
        let mut v = ValidityBitmap::all_valid(4);
        v.set_invalid(1);
        let mut df = DataFrame::new();
        df.add_column("n".into(), Column::numeric(vec![1.0, 0.0, 3.0, 4.0], v))
            .unwrap();
        df.add_column(
            "c".into(),
            Column::from_labels(&[Some("a"), Some("b"), None, Some("d")]),
        )
        .unwrap();

        assert_eq!(df.drop_missing_rows(), 2);
        assert_eq!(df.row_count(), 2);
        assert_eq!(df.numeric_values("n").unwrap(), vec![1.0, 4.0]);
        let c = df.column_by_name("c").unwrap();
        assert_eq!(c.category_at(0), Some("a"));
        assert_eq!(c.category_at(1), Some("d"));
        assert_eq!(df.total_null_count(), 0);

        // Second call is a no-op.
        assert_eq!(df.drop_missing_rows(), 0);
    }

    #[test]
    fn display_values() {
        let mut v = ValidityBitmap::all_valid(3);
        v.set_invalid(2);
        let col = Column::numeric(vec![1987.0, 0.25, 0.0], v);
        assert_eq!(col.display_at(0), "1987");
        assert_eq!(col.display_at(1), "0.25");
        assert_eq!(col.display_at(2), "NaN");
    }
}
