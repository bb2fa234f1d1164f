//! Stateful core of the server-inventory dashboard.
//!
//! The [`InventoryStore`] owns the record collection and every piece of
//! table state (filters, search, sort, pagination, columns, saved
//! views, selection, audit history) and recomputes its derived view
//! after each transition. Persistence goes through the abstract gateway
//! in `rackview-gateway`; pure query logic lives in `rackview-query`.

mod config;
pub mod persistence;
mod store;

pub use config::StoreConfig;
pub use store::{InventoryStore, UPSERT_CHUNK};
