//! Preprocessing for KOSIS statistical CSV exports: load legacy-encoded
//! files, normalize numeric formatting, filter rows by keyword, and write
//! cleaned CSVs for spreadsheet use.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod sample;
pub mod summary;

pub use config::{DatasetSpec, PipelineConfig};
pub use data::model::{Column, ColumnData, Dataset, Value};
pub use error::{PreprocessError, Result};
