/// Data layer: core types, loading, cleaning and writing.
///
/// Architecture:
/// ```text
///  kosis_*.csv (cp949)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → Dataset (typed columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  comma-grouped text → numbers, missing-value report
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  keyword predicate on one text column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  processed_*.csv (UTF-8 with BOM)
///   └──────────┘
/// ```

pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod preview;
pub mod transform;
pub mod writer;
