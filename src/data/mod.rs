/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv        embedded sample
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                 ┌──────────┐
///   │  loader   │                │ employee  │
///   └──────────┘                 └──────────┘
///        │                              │
///        └──────────────┬───────────────┘
///                       ▼
///                ┌──────────────┐
///                │   Dataset    │  Vec<Record>, column index
///                └──────────────┘
///                       │
///                       ▼
///                ┌──────────────┐
///                │    filter     │  per-column selection → FilteredView
///                └──────────────┘
///                       │
///                       ▼
///                ┌──────────────┐
///                │    batch      │  view → Arrow RecordBatch
///                └──────────────┘
/// ```

pub mod batch;
pub mod employee;
pub mod filter;
pub mod loader;
pub mod model;
