use crate::server::FieldChange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One audit-log row: a single field-level change to one server.
///
/// Entries are append-only and cascade-deleted with their server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// Foreign reference to the changed server (not ownership).
    pub server_id: String,
    /// Wire name of the changed field.
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    pub timestamp: DateTime<Utc>,
    /// Actor who made the change.
    pub user: String,
}

impl HistoryEntry {
    /// Build an entry from a detected field change.
    pub fn from_change(
        server_id: &str,
        change: &FieldChange,
        user: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            server_id: server_id.to_string(),
            field: change.key.as_str().to_string(),
            old_value: change.old_value.clone(),
            new_value: change.new_value.clone(),
            timestamp,
            user: user.to_string(),
        }
    }
}
