use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::model::{format_float, ColumnData, Dataset};
use crate::error::Result;

/// Prefix given to every cleaned output file.
pub const PROCESSED_PREFIX: &str = "processed_";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Save a cleaned dataset as `processed_{file_name}` in `data_dir`.
///
/// An absent dataset is a no-op and returns `Ok(None)`.
pub fn save_processed(
    dataset: Option<&Dataset>,
    data_dir: &Path,
    file_name: &str,
) -> Result<Option<PathBuf>> {
    let Some(dataset) = dataset else {
        return Ok(None);
    };
    let path = data_dir.join(format!("{PROCESSED_PREFIX}{file_name}"));
    write_csv(dataset, &path)?;
    info!("saved {}", path.display());
    Ok(Some(path))
}

/// Write a dataset as UTF-8 CSV with a leading byte-order mark, header row
/// first, no index column. Missing cells are written empty.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(dataset.column_names())?;
    for row in 0..dataset.len() {
        writer.write_record(dataset.columns().iter().map(|c| cell_text(&c.data, row)))?;
    }
    writer.flush()?;
    Ok(())
}

fn cell_text(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
        ColumnData::Integer(v) => v[row].map(|i| i.to_string()).unwrap_or_default(),
        ColumnData::Float(v) => v[row].map(format_float).unwrap_or_default(),
    }
}
