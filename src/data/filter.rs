use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::model::{ColumnData, Dataset};

/// IT-related job title fragments used to narrow employment tables.
pub const IT_KEYWORDS: &[&str] = &[
    "소프트웨어",
    "컴퓨터",
    "정보",
    "데이터",
    "네트워크",
    "시스템",
    "프로그래머",
    "개발",
];

// ---------------------------------------------------------------------------
// Keyword filter predicate
// ---------------------------------------------------------------------------

/// Keeps rows whose `column` text contains any of `keywords`.
///
/// Matching is a case-sensitive substring test, OR-combined across keywords.
/// With no `column` configured the filter is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new(column: Option<&str>, keywords: &[&str]) -> Self {
        KeywordFilter {
            column: column.map(str::to_string),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// The IT keyword set, not yet bound to a column.
    pub fn it_jobs() -> Self {
        KeywordFilter::new(None, IT_KEYWORDS)
    }

    /// Whether a single cell passes. Missing cells never match.
    pub fn matches(&self, cell: Option<&str>) -> bool {
        match cell {
            Some(text) => self.keywords.iter().any(|k| text.contains(k.as_str())),
            None => false,
        }
    }

    /// Return indices of rows that pass, or `None` when the filter does not
    /// apply (no column configured, column absent, or column not text).
    pub fn matching_indices(&self, dataset: &Dataset) -> Option<Vec<usize>> {
        let name = self.column.as_deref()?;
        let Some(column) = dataset.column(name) else {
            warn!("keyword filter column '{name}' not found; filter skipped");
            return None;
        };
        let ColumnData::Text(cells) = &column.data else {
            warn!("keyword filter column '{name}' is not text; filter skipped");
            return None;
        };
        Some(
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| self.matches(cell.as_deref()))
                .map(|(i, _)| i)
                .collect(),
        )
    }

    /// Apply the filter, returning the dataset unchanged when it does not apply.
    pub fn apply(&self, dataset: Dataset) -> Dataset {
        match self.matching_indices(&dataset) {
            Some(rows) => {
                let filtered = dataset.take_rows(&rows);
                info!("keyword filter kept {} of {} rows", filtered.len(), dataset.len());
                filtered
            }
            None => dataset,
        }
    }
}
