use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use super::model::{ColumnData, Dataset};
use crate::error::Result;

/// Rows shown in a preview.
pub const PREVIEW_ROWS: usize = 5;

/// Convert a dataset into a single Arrow record batch.
pub fn to_record_batch(dataset: &Dataset) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(dataset.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(dataset.num_columns());

    for col in dataset.columns() {
        let (data_type, array): (DataType, ArrayRef) = match &col.data {
            ColumnData::Text(v) => (
                DataType::Utf8,
                Arc::new(v.iter().map(|s| s.as_deref()).collect::<StringArray>()),
            ),
            ColumnData::Integer(v) => (DataType::Int64, Arc::new(Int64Array::from(v.clone()))),
            ColumnData::Float(v) => (DataType::Float64, Arc::new(Float64Array::from(v.clone()))),
        };
        fields.push(Field::new(col.name.as_str(), data_type, true));
        arrays.push(array);
    }

    if arrays.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Render the first rows as a table followed by the dataset shape.
pub fn render_preview(dataset: &Dataset) -> Result<String> {
    let batch = to_record_batch(&dataset.head(PREVIEW_ROWS))?;
    let table = pretty_format_batches(&[batch])?;
    let (rows, cols) = dataset.shape();
    Ok(format!("{table}\n\nshape: ({rows}, {cols})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use arrow::array::Array;

    #[test]
    fn test_preview_limits_rows_and_reports_shape() {
        let mut csv = String::from("year,job\n");
        for y in 2015..2025 {
            csv.push_str(&format!("{y},dev\n"));
        }
        let ds = parse_csv(&csv).unwrap();
        let out = render_preview(&ds).unwrap();

        assert!(out.contains("2019"));
        assert!(!out.contains("2020"));
        assert!(out.ends_with("shape: (10, 2)"));
    }

    #[test]
    fn test_record_batch_types() {
        let ds = parse_csv("a,b,c\n1,1.5,x\n,,\n").unwrap();
        let batch = to_record_batch(&ds).unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Int64);
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Float64);
        assert_eq!(batch.schema().field(2).data_type(), &DataType::Utf8);
        assert_eq!(batch.column(2).null_count(), 1);
    }
}
