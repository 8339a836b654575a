//! Error types for u-eda.

use thiserror::Error;

/// All errors produced by u-eda operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdaError {
    /// Delimited input could not be parsed.
    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },
    /// The column exists but cannot be analyzed (empty, all-missing,
    /// non-numeric, too few values, or non-finite values).
    #[error("invalid input in column '{column}': {reason}")]
    InvalidInput { column: String, reason: String },
    /// Requested column is absent from the table.
    #[error("column '{name}' not found")]
    MissingColumn { name: String },
    /// Column length does not match the table's row count.
    #[error("expected {expected} elements, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// A column with this name already exists.
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },
    /// I/O error while reading input or writing artifacts.
    #[error("I/O error: {0}")]
    Io(String),
    /// Artifact serialization failed.
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl EdaError {
    /// Shorthand for [`EdaError::InvalidInput`].
    pub(crate) fn invalid(column: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for EdaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for EdaError {
    fn from(e: csv::Error) -> Self {
        let line = e
            .position()
            .map_or(0, |p| usize::try_from(p.line()).unwrap_or(usize::MAX));
        if e.is_io_error() {
            Self::Io(e.to_string())
        } else {
            Self::CsvParse {
                line,
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for EdaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = EdaError::MissingColumn {
            name: "age".into(),
        };
        assert_eq!(e.to_string(), "column 'age' not found");

        let e = EdaError::invalid("x", "column is empty");
        assert_eq!(e.to_string(), "invalid input in column 'x': column is empty");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: EdaError = io.into();
        assert!(matches!(e, EdaError::Io(msg) if msg.contains("gone")));
    }
}
