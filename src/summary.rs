//! Named aggregation directives over cleaned datasets.
//!
//! A directive groups one dataset by a period column, sums a value column
//! per period, then reduces the per-period sums. With no directives
//! configured the summary is empty.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::data::model::{Dataset, Value};
use crate::error::Result;

/// How per-period sums are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduce {
    /// Sum for the greatest period key.
    Latest,
    /// Every period with its sum, ordered by period.
    Series,
}

/// One named aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationDirective {
    pub name: String,
    /// Dataset name as configured in the pipeline.
    pub dataset: String,
    pub group_by: String,
    pub value: String,
    pub reduce: Reduce,
}

/// A single summary entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Scalar(f64),
    Series(Vec<(String, f64)>),
}

/// Directive name → result.
pub type Summary = BTreeMap<String, SummaryValue>;

/// Evaluate every directive against the available datasets.
///
/// Directives naming an absent dataset or unknown columns are skipped with
/// a warning; the rest still run.
pub fn build_summary(
    datasets: &BTreeMap<String, Dataset>,
    directives: &[AggregationDirective],
) -> Summary {
    let mut summary = Summary::new();
    for directive in directives {
        let Some(dataset) = datasets.get(&directive.dataset) else {
            warn!(
                "summary '{}': dataset '{}' unavailable, skipped",
                directive.name, directive.dataset
            );
            continue;
        };
        match evaluate(dataset, directive) {
            Ok(Some(value)) => {
                summary.insert(directive.name.clone(), value);
            }
            Ok(None) => warn!("summary '{}': no periods to aggregate", directive.name),
            Err(e) => warn!("summary '{}' skipped: {e}", directive.name),
        }
    }
    info!("built {} summary entries", summary.len());
    summary
}

fn evaluate(dataset: &Dataset, directive: &AggregationDirective) -> Result<Option<SummaryValue>> {
    let sums = sum_by_period(dataset, &directive.group_by, &directive.value)?;
    Ok(match directive.reduce {
        Reduce::Latest => sums.last_key_value().map(|(_, v)| SummaryValue::Scalar(*v)),
        Reduce::Series => Some(SummaryValue::Series(
            sums.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        )),
    })
}

/// Sum of `value` per distinct non-missing `group_by` key. Missing values
/// contribute nothing.
fn sum_by_period(dataset: &Dataset, group_by: &str, value: &str) -> Result<BTreeMap<Value, f64>> {
    let keys = dataset.values(group_by)?;
    let values = dataset.numeric(value)?;

    let mut sums = BTreeMap::new();
    for (key, v) in keys.into_iter().zip(values) {
        if key.is_null() {
            continue;
        }
        *sums.entry(key).or_insert(0.0) += v.unwrap_or(0.0);
    }
    Ok(sums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    fn datasets() -> BTreeMap<String, Dataset> {
        let employment = parse_csv(
            "연도,직업,취업자수\n\
             2020,dev,100\n\
             2020,ops,50\n\
             2021,dev,120\n\
             2021,ops,\n",
        )
        .unwrap();
        BTreeMap::from([("employment".to_string(), employment)])
    }

    fn directive(name: &str, dataset: &str, value: &str, reduce: Reduce) -> AggregationDirective {
        AggregationDirective {
            name: name.to_string(),
            dataset: dataset.to_string(),
            group_by: "연도".to_string(),
            value: value.to_string(),
            reduce,
        }
    }

    #[test]
    fn test_no_directives_is_empty() {
        assert!(build_summary(&datasets(), &[]).is_empty());
        assert!(build_summary(&BTreeMap::new(), &[]).is_empty());
    }

    #[test]
    fn test_latest_and_series() {
        let summary = build_summary(
            &datasets(),
            &[
                directive("latest_it", "employment", "취업자수", Reduce::Latest),
                directive("it_trend", "employment", "취업자수", Reduce::Series),
            ],
        );

        assert_eq!(summary["latest_it"], SummaryValue::Scalar(120.0));
        assert_eq!(
            summary["it_trend"],
            SummaryValue::Series(vec![("2020".into(), 150.0), ("2021".into(), 120.0)])
        );
    }

    #[test]
    fn test_bad_directives_are_skipped() {
        let summary = build_summary(
            &datasets(),
            &[
                directive("absent", "population", "인구수", Reduce::Latest),
                directive("text", "employment", "직업", Reduce::Latest),
                directive("ok", "employment", "취업자수", Reduce::Latest),
            ],
        );
        assert_eq!(summary.keys().collect::<Vec<_>>(), vec!["ok"]);
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let summary = build_summary(
            &datasets(),
            &[directive("trend", "employment", "취업자수", Reduce::Series)],
        );
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"trend":[["2020",150.0],["2021",120.0]]}"#);
    }
}
