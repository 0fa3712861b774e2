/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  URL / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, immutable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  metrics, top-n means, histogram, counts
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ dashboard │  one DashboardSnapshot per filter change
///   └───────────┘
/// ```

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
