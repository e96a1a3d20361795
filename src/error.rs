//! Error types for the preprocessing pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Preprocessing errors
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("unsupported encoding label: {0}")]
    UnsupportedEncoding(String),

    #[error("{} is not valid {encoding}", path.display())]
    Decode { path: PathBuf, encoding: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("no columns to parse from file")]
    EmptyData,

    #[error("row {row} has {found} fields, header has {expected}")]
    RowTooLong {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("column '{column}' has {found} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, PreprocessError>;
