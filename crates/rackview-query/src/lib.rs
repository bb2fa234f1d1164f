//! Pure query engine over server records.
//!
//! Filtering, full-text search, stable multi-key sorting, pagination
//! math, and chart analytics. Every function here is deterministic,
//! side-effect free, and safe to call from concurrent readers; state
//! lives in `rackview-store`.

pub mod filter;
pub mod pagination;
pub mod sort;
pub mod stats;

pub use filter::apply_filters_and_search;
pub use pagination::{PageItem, pagination_range};
pub use sort::{SortOptions, apply_sort, toggle_sort_key};
pub use stats::{
    InventorySummary, ResourceUsage, distribution_by, growth_by_month, missing_maintenance_window,
    resource_usage, summarize,
};
