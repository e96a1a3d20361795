//! Reshaping helpers for downstream charts: age band parsing, year-over-year
//! growth and pivot tables.

use std::collections::{BTreeMap, BTreeSet};

use super::model::{Column, ColumnData, Dataset, Value};
use crate::error::Result;

/// Name of the column appended by [`growth_rate`].
pub const GROWTH_RATE_COLUMN: &str = "증가율";

/// Leading number of an age band label, e.g. `"15-19세"` → 15.
pub fn age_band_start(label: Option<&str>) -> Option<i64> {
    let label = label?;
    let start = label.find(|c: char| c.is_ascii_digit())?;
    let digits: String = label[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Sort by `year_column` and append [`GROWTH_RATE_COLUMN`], the percent
/// change of `value_column` versus the previous row.
///
/// The first row, rows next to a missing value, and rows whose predecessor
/// is zero get a missing rate.
pub fn growth_rate(dataset: &Dataset, value_column: &str, year_column: &str) -> Result<Dataset> {
    let years = dataset.values(year_column)?;
    // Validate before sorting so a text value column fails fast.
    dataset.numeric(value_column)?;

    let mut order: Vec<usize> = (0..dataset.len()).collect();
    order.sort_by(|&a, &b| years[a].cmp(&years[b]));

    let mut sorted = dataset.take_rows(&order);
    let values = sorted.numeric(value_column)?;
    let rates: Vec<Option<f64>> = (0..values.len())
        .map(|i| {
            let prev = values.get(i.checked_sub(1)?).copied().flatten()?;
            let cur = values[i]?;
            (prev != 0.0).then(|| (cur / prev - 1.0) * 100.0)
        })
        .collect();

    sorted.upsert_column(Column::new(GROWTH_RATE_COLUMN, ColumnData::Float(rates)))?;
    Ok(sorted)
}

/// Sum-aggregated pivot: one row per distinct `index` value, one column per
/// distinct `columns` value, cells holding the sum of `values`.
///
/// Keys are sorted; rows with a missing key are dropped; combinations with
/// no present value are missing. A column key that collides with the index
/// name or another key's label gets a `.1`, `.2`, ... suffix.
pub fn pivot(dataset: &Dataset, index: &str, columns: &str, values: &str) -> Result<Dataset> {
    let row_keys = dataset.values(index)?;
    let col_keys = dataset.values(columns)?;
    let amounts = dataset.numeric(values)?;

    let mut cells: BTreeMap<(Value, Value), f64> = BTreeMap::new();
    let mut index_keys: BTreeSet<Value> = BTreeSet::new();
    let mut column_keys: BTreeSet<Value> = BTreeSet::new();

    for ((r, c), v) in row_keys.into_iter().zip(col_keys).zip(amounts) {
        if r.is_null() || c.is_null() {
            continue;
        }
        index_keys.insert(r.clone());
        column_keys.insert(c.clone());
        if let Some(v) = v {
            *cells.entry((r, c)).or_insert(0.0) += v;
        }
    }

    let index_keys: Vec<Value> = index_keys.into_iter().collect();
    let mut out = vec![Column::new(index, ColumnData::from_values(&index_keys))];
    for c in column_keys {
        let data = index_keys
            .iter()
            .map(|r| cells.get(&(r.clone(), c.clone())).copied())
            .collect();
        let base = c.to_string();
        let mut name = base.clone();
        let mut n = 1;
        while out.iter().any(|col| col.name == name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        out.push(Column::new(name, ColumnData::Float(data)));
    }
    Dataset::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::error::PreprocessError;

    #[test]
    fn test_age_band_start() {
        assert_eq!(age_band_start(Some("15-19세")), Some(15));
        assert_eq!(age_band_start(Some("85세 이상")), Some(85));
        assert_eq!(age_band_start(Some("계")), None);
        assert_eq!(age_band_start(None), None);
    }

    #[test]
    fn test_growth_rate_sorts_and_computes() {
        let ds = parse_csv("연도,취업자수\n2022,150\n2020,100\n2021,0\n2023,\n").unwrap();
        let out = growth_rate(&ds, "취업자수", "연도").unwrap();

        assert_eq!(
            out.column("연도").unwrap().data,
            ColumnData::Integer(vec![Some(2020), Some(2021), Some(2022), Some(2023)])
        );
        assert_eq!(
            out.column(GROWTH_RATE_COLUMN).unwrap().data,
            ColumnData::Float(vec![None, Some(-100.0), None, None])
        );
    }

    #[test]
    fn test_growth_rate_rejects_text_values() {
        let ds = parse_csv("year,v\n2020,a\n").unwrap();
        assert!(matches!(
            growth_rate(&ds, "v", "year"),
            Err(PreprocessError::NotNumeric(_))
        ));
        assert!(matches!(
            growth_rate(&ds, "v", "연도"),
            Err(PreprocessError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_pivot_sums_and_fills_missing() {
        let ds = parse_csv(
            "연도,직업,취업자수\n\
             2021,dev,10\n\
             2020,dev,5\n\
             2020,dev,7\n\
             2020,ops,3\n\
             ,ops,99\n",
        )
        .unwrap();
        let out = pivot(&ds, "연도", "직업", "취업자수").unwrap();

        assert_eq!(out.column_names(), vec!["연도", "dev", "ops"]);
        assert_eq!(
            out.column("연도").unwrap().data,
            ColumnData::Integer(vec![Some(2020), Some(2021)])
        );
        assert_eq!(
            out.column("dev").unwrap().data,
            ColumnData::Float(vec![Some(12.0), Some(10.0)])
        );
        assert_eq!(out.column("ops").unwrap().data, ColumnData::Float(vec![Some(3.0), None]));
    }

    #[test]
    fn test_pivot_key_matching_index_name_is_suffixed() {
        let ds = parse_csv("k,c,v\n1,k,2\n1,x,3\n2,k,4\n").unwrap();
        let out = pivot(&ds, "k", "c", "v").unwrap();

        assert_eq!(out.column_names(), vec!["k", "k.1", "x"]);
        assert_eq!(
            out.column("k.1").unwrap().data,
            ColumnData::Float(vec![Some(2.0), Some(4.0)])
        );
        assert_eq!(
            out.column("k").unwrap().data,
            ColumnData::Integer(vec![Some(1), Some(2)])
        );
    }
}
