/// Data layer: feature files, cleaning, and the two-table feature store.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop id columns, drop incomplete rows, split labels
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FeatureTable  │  numeric rows + group labels
///   └──────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
