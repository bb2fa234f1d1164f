//! Saved-view persistence.
//!
//! Saved views are the only durable piece of UI configuration. They are
//! written as pretty-printed JSON so a view file survives application
//! versions and hand inspection.

use rackview_model::SavedView;
use std::fs;
use std::path::Path;

/// Load saved views from disk.
///
/// Returns an empty list if:
/// - The file doesn't exist yet
/// - The file cannot be read or parsed
pub fn load_views(path: &Path) -> Vec<SavedView> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(views) => {
                tracing::info!("Loaded saved views from {:?}", path);
                views
            }
            Err(e) => {
                tracing::warn!("Failed to parse saved views file: {}, starting empty", e);
                Vec::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No saved views file at {:?}, starting empty", path);
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Failed to read saved views file: {}, starting empty", e);
            Vec::new()
        }
    }
}

/// Save views to disk.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_views(views: &[SavedView], path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create views directory: {}", e))?;
    }

    let content = serde_json::to_string_pretty(views)
        .map_err(|e| format!("Failed to serialize saved views: {}", e))?;

    fs::write(path, content).map_err(|e| format!("Failed to write saved views file: {}", e))?;

    tracing::info!("Saved {} views to {:?}", views.len(), path);
    Ok(())
}
