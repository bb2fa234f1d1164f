use rackview_model::{FieldKey, SortKey};
use rackview_query::SortOptions;
use std::time::Duration;

/// Construction-time knobs for [`InventoryStore`](crate::InventoryStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Actor recorded as `updatedBy` and on history entries.
    pub actor: String,
    /// Rows per page.
    pub page_size: usize,
    /// Initially visible columns.
    pub visible_fields: Vec<FieldKey>,
    /// Initial sort order.
    pub sort_keys: Vec<SortKey>,
    /// Sorting behavior (numeric-aware toggle).
    pub sort_options: SortOptions,
    /// Optional ceiling on gateway calls, surfaced as a transport error
    /// when exceeded. `None` (the default) keeps the historical
    /// behavior: a hung backend leaves `is_loading` set indefinitely.
    pub gateway_timeout: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            actor: "operator".to_string(),
            page_size: 20,
            visible_fields: FieldKey::DEFAULT_VISIBLE.to_vec(),
            sort_keys: vec![SortKey::asc(FieldKey::ServerName)],
            sort_options: SortOptions::default(),
            gateway_timeout: None,
        }
    }
}
