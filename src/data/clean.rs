use log::{debug, info};

use super::model::{ColumnData, Dataset};

// ---------------------------------------------------------------------------
// Numeric normalization
// ---------------------------------------------------------------------------

/// Convert text columns holding comma-grouped numbers (`"1,234,567"`) into
/// float columns.
///
/// Conversion is all-or-nothing per column: a single cell that does not
/// parse after removing commas leaves the whole column untouched. Missing
/// cells stay missing. Returns the names of the converted columns.
pub fn normalize_numeric_columns(dataset: &mut Dataset) -> Vec<String> {
    let mut converted = Vec::new();

    let candidates: Vec<(usize, String, Vec<Option<f64>>)> = dataset
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(idx, col)| match &col.data {
            ColumnData::Text(cells) => match parse_grouped_numbers(cells) {
                Some(values) => Some((idx, col.name.clone(), values)),
                None => {
                    debug!("column '{}' left as text", col.name);
                    None
                }
            },
            _ => None,
        })
        .collect();

    for (idx, name, values) in candidates {
        // Same length as the column it replaces, so this cannot fail.
        if dataset.set_column_data(idx, ColumnData::Float(values)).is_ok() {
            converted.push(name);
        }
    }
    converted
}

/// Parse every present cell with thousands separators stripped.
fn parse_grouped_numbers(cells: &[Option<String>]) -> Option<Vec<Option<f64>>> {
    cells
        .iter()
        .map(|cell| match cell {
            Some(s) => s.replace(',', "").trim().parse::<f64>().ok().map(Some),
            None => Some(None),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Missing-value report
// ---------------------------------------------------------------------------

/// Missing-cell count for every column, in column order.
pub fn null_counts(dataset: &Dataset) -> Vec<(String, usize)> {
    dataset
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.data.null_count()))
        .collect()
}

/// Log the columns that have missing cells and return them.
/// Purely observational: no rows are dropped or filled.
pub fn report_missing(dataset: &Dataset) -> Vec<(String, usize)> {
    let missing: Vec<(String, usize)> = null_counts(dataset)
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
    if !missing.is_empty() {
        let listing = missing
            .iter()
            .map(|(name, n)| format!("{name}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        info!("missing values found: {listing}");
    }
    missing
}
