pub mod enums;
pub mod field;
pub mod history;
pub mod server;
pub mod view;

pub use enums::{BackupStatus, Environment, HardwareType, PatchStatus};
pub use field::{FieldKey, FieldValue};
pub use history::HistoryEntry;
pub use server::{CPU_TREND_WINDOW, FieldChange, Server, ServerDraft, ServerPatch};
pub use view::{Filter, FilterKey, MAX_SORT_KEYS, SavedView, SortDirection, SortKey};
