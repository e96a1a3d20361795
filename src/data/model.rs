use std::cmp::Ordering;
use std::fmt;

use crate::error::{PreprocessError, Result};

/// Cell tokens read as missing values, matching what spreadsheet and
/// dataframe tooling treats as NA in exported CSVs.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw CSV cell counts as a missing value.
pub fn is_missing_marker(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw)
}

// ---------------------------------------------------------------------------
// Value – a single cell, used for keys and lookups
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Group-by keys live in `BTreeMap`s downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so Value can key a BTreeMap --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Text(a), Text(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            // Equal magnitudes order integer first so `cmp` agrees with `eq`.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Numbers before text, missing values last.
            (Null, _) => Ordering::Greater,
            (_, Null) => Ordering::Less,
            (Text(_), _) => Ordering::Greater,
            (_, Text(_)) => Ordering::Less,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` for arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Render a float the way dataframe CSV exports do: integral values keep a
/// trailing `.0` (exponent form once they get large), everything else uses
/// the shortest round-trip form. The output never reads back as an integer.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else if v.fract() == 0.0 {
        format!("{v:e}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// ColumnData – one typed column
// ---------------------------------------------------------------------------

/// Column storage. Missing cells are `None` in every variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ColumnData::Text(_))
    }

    pub fn is_numeric(&self) -> bool {
        !self.is_text()
    }

    /// Number of missing cells. NaN floats count as missing.
    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Integer(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Float(v) => v
                .iter()
                .filter(|c| c.map_or(true, f64::is_nan))
                .count(),
        }
    }

    /// Cell at `row`. Panics if `row` is out of bounds.
    pub fn get(&self, row: usize) -> Value {
        match self {
            ColumnData::Text(v) => v[row].clone().map_or(Value::Null, Value::Text),
            ColumnData::Integer(v) => v[row].map_or(Value::Null, Value::Integer),
            ColumnData::Float(v) => match v[row] {
                Some(f) if !f.is_nan() => Value::Float(f),
                _ => Value::Null,
            },
        }
    }

    /// New column holding the given rows, in the given order.
    pub fn take(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Text(v) => ColumnData::Text(rows.iter().map(|&i| v[i].clone()).collect()),
            ColumnData::Integer(v) => ColumnData::Integer(rows.iter().map(|&i| v[i]).collect()),
            ColumnData::Float(v) => ColumnData::Float(rows.iter().map(|&i| v[i]).collect()),
        }
    }

    /// Build a column from values, choosing the narrowest type that holds
    /// them all: integer, then float, then text.
    pub fn from_values(values: &[Value]) -> ColumnData {
        let present = || values.iter().filter(|v| !v.is_null());
        if present().all(|v| matches!(v, Value::Integer(_))) && present().next().is_some() {
            return ColumnData::Integer(
                values
                    .iter()
                    .map(|v| match v {
                        Value::Integer(i) => Some(*i),
                        _ => None,
                    })
                    .collect(),
            );
        }
        if present().all(|v| v.as_f64().is_some()) {
            return ColumnData::Float(values.iter().map(Value::as_f64).collect());
        }
        ColumnData::Text(
            values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect(),
        )
    }

    /// Infer a column type from raw CSV cells.
    ///
    /// Integer if every present cell parses as `i64`, float if every present
    /// cell parses as `f64`, text otherwise. A column with no present cells
    /// is float, all missing.
    pub fn infer(cells: Vec<Option<String>>) -> ColumnData {
        let present = || cells.iter().flatten();

        if present().all(|s| s.trim().parse::<i64>().is_ok()) && present().next().is_some() {
            return ColumnData::Integer(
                cells
                    .iter()
                    .map(|c| c.as_ref().and_then(|s| s.trim().parse().ok()))
                    .collect(),
            );
        }
        if present().all(|s| s.trim().parse::<f64>().is_ok()) {
            return ColumnData::Float(
                cells
                    .iter()
                    .map(|c| c.as_ref().and_then(|s| s.trim().parse().ok()))
                    .collect(),
            );
        }
        ColumnData::Text(cells)
    }
}

// ---------------------------------------------------------------------------
// Column / Dataset
// ---------------------------------------------------------------------------

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Column {
            name: name.into(),
            data,
        }
    }
}

/// An ordered set of named columns sharing one row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset, checking that all columns have the same length and
    /// distinct names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |c| c.data.len());
        for (i, col) in columns.iter().enumerate() {
            if col.data.len() != n_rows {
                return Err(PreprocessError::ColumnLength {
                    column: col.name.clone(),
                    expected: n_rows,
                    found: col.data.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(PreprocessError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Dataset { columns, n_rows })
    }

    /// Build a dataset from header names and raw text rows, inferring each
    /// column's type. Rows must all have `headers.len()` cells.
    pub fn from_text_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        let mut cells: Vec<Vec<Option<String>>> =
            headers.iter().map(|_| Vec::with_capacity(rows.len())).collect();
        for row in rows {
            for (slot, cell) in cells.iter_mut().zip(row) {
                slot.push(cell);
            }
        }
        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, ColumnData::infer(values)))
            .collect();
        Dataset::new(columns)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All cells of a column, or an error naming the missing column.
    pub fn values(&self, name: &str) -> Result<Vec<Value>> {
        let col = self
            .column(name)
            .ok_or_else(|| PreprocessError::UnknownColumn(name.to_string()))?;
        Ok((0..self.n_rows).map(|row| col.data.get(row)).collect())
    }

    /// A numeric column as floats; text columns are rejected.
    pub fn numeric(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let col = self
            .column(name)
            .ok_or_else(|| PreprocessError::UnknownColumn(name.to_string()))?;
        if col.data.is_text() {
            return Err(PreprocessError::NotNumeric(name.to_string()));
        }
        Ok((0..self.n_rows).map(|row| col.data.get(row).as_f64()).collect())
    }

    /// Replace the data of column `index`, keeping the row count invariant.
    pub fn set_column_data(&mut self, index: usize, data: ColumnData) -> Result<()> {
        let col = self.columns.get_mut(index).ok_or_else(|| {
            PreprocessError::Config(format!("column index {index} out of range"))
        })?;
        if data.len() != self.n_rows {
            return Err(PreprocessError::ColumnLength {
                column: col.name.clone(),
                expected: self.n_rows,
                found: data.len(),
            });
        }
        col.data = data;
        Ok(())
    }

    /// Append a column, or replace an existing one with the same name.
    pub fn upsert_column(&mut self, column: Column) -> Result<()> {
        if self.columns.is_empty() {
            self.n_rows = column.data.len();
        }
        match self.columns.iter().position(|c| c.name == column.name) {
            Some(idx) => self.set_column_data(idx, column.data),
            None if column.data.len() != self.n_rows => Err(PreprocessError::ColumnLength {
                column: column.name,
                expected: self.n_rows,
                found: column.data.len(),
            }),
            None => {
                self.columns.push(column);
                Ok(())
            }
        }
    }

    /// New dataset holding the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Dataset {
        Dataset {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(rows)))
                .collect(),
            n_rows: rows.len(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        let rows: Vec<usize> = (0..n.min(self.n_rows)).collect();
        self.take_rows(&rows)
    }
}
