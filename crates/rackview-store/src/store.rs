//! The stateful inventory core.
//!
//! [`InventoryStore`] exclusively owns the live record set, the derived
//! (filtered -> searched -> sorted) view, pagination and column state,
//! saved views, the selection set, and the per-record audit history.
//! Mutations go through its operations and nothing else writes to it.
//!
//! Every state transition is synchronous and runs to completion;
//! asynchronous operations suspend only at the gateway boundary, where
//! `is_loading` is the single externally observable in-flight signal.
//! Overlapping mutations on the same record are not serialized; the
//! last gateway response to resolve wins.

use crate::config::StoreConfig;
use crate::persistence;
use chrono::Utc;
use rackview_gateway::{GatewayError, ServerGateway};
use rackview_model::{
    FieldChange, FieldKey, Filter, HistoryEntry, MAX_SORT_KEYS, SavedView, Server, ServerDraft,
    ServerPatch, SortKey,
};
use rackview_query::{apply_filters_and_search, apply_sort, toggle_sort_key};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Records per batch when syncing the full set to the backend.
pub const UPSERT_CHUNK: usize = 1000;

/// The stateful core of the dashboard.
///
/// Constructed with a gateway handle and explicit configuration; there
/// is deliberately no global instance. Dropping the store drops all
/// session state (history, selection, unsaved views).
pub struct InventoryStore {
    gateway: Arc<dyn ServerGateway>,
    config: StoreConfig,
    records: Vec<Server>,
    derived: Vec<Server>,
    filters: Vec<Filter>,
    search: String,
    sort_keys: Vec<SortKey>,
    page: usize,
    page_size: usize,
    total_pages: usize,
    visible_fields: Vec<FieldKey>,
    saved_views: Vec<SavedView>,
    active_view: Option<String>,
    history: HashMap<String, Vec<HistoryEntry>>,
    selected: HashSet<String>,
    is_loading: bool,
}

impl InventoryStore {
    pub fn new(gateway: Arc<dyn ServerGateway>, config: StoreConfig) -> Self {
        let page_size = config.page_size.max(1);
        let mut sort_keys = config.sort_keys.clone();
        sort_keys.truncate(MAX_SORT_KEYS);
        Self {
            records: Vec::new(),
            derived: Vec::new(),
            filters: Vec::new(),
            search: String::new(),
            sort_keys,
            page: 1,
            page_size,
            total_pages: 0,
            visible_fields: config.visible_fields.clone(),
            saved_views: Vec::new(),
            active_view: None,
            history: HashMap::new(),
            selected: HashSet::new(),
            is_loading: false,
            gateway,
            config,
        }
    }

    // ========================================================================
    // State access
    // ========================================================================

    /// The authoritative record set, in load/insertion order.
    pub fn records(&self) -> &[Server] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Server> {
        self.records.iter().find(|server| server.id == id)
    }

    /// The derived view: filters -> search -> sort applied to the record
    /// set. Recomputed after every relevant transition, never patched.
    pub fn derived_view(&self) -> &[Server] {
        &self.derived
    }

    /// The slice of the derived view the current page shows.
    pub fn current_page_slice(&self) -> &[Server] {
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.derived.len());
        self.derived.get(start..end).unwrap_or(&[])
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn visible_fields(&self) -> &[FieldKey] {
        &self.visible_fields
    }

    pub fn saved_views(&self) -> &[SavedView] {
        &self.saved_views
    }

    pub fn active_view(&self) -> Option<&str> {
        self.active_view.as_deref()
    }

    /// Audit history of one record, oldest first.
    pub fn history_for(&self, id: &str) -> &[HistoryEntry] {
        self.history.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Rebuild the derived view and page bookkeeping from the current
    /// inputs. `page` always lands in `[1, max(1, total_pages)]`.
    fn recompute(&mut self) {
        let filtered = apply_filters_and_search(&self.records, &self.filters, &self.search);
        self.derived = apply_sort(&filtered, &self.sort_keys, self.config.sort_options);
        self.total_pages = self.derived.len().div_ceil(self.page_size);
        self.page = self.page.clamp(1, self.total_pages.max(1));
    }

    // ========================================================================
    // Gateway-backed mutations
    // ========================================================================

    /// Replace the record set from the backend.
    ///
    /// On failure the local state is preserved: only `is_loading` is
    /// reset and the error surfaces to the caller for notification.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        self.is_loading = true;
        let gateway = Arc::clone(&self.gateway);
        let result = with_timeout(self.config.gateway_timeout, gateway.fetch_all()).await;
        self.is_loading = false;
        match result {
            Ok(records) => {
                self.records = records;
                self.recompute();
                Ok(())
            }
            Err(error) => {
                tracing::error!(error = %error, "failed to load servers");
                Err(error)
            }
        }
    }

    /// Create a record through the gateway and append the stored result.
    pub async fn create(&mut self, draft: ServerDraft) -> Result<Server, GatewayError> {
        self.is_loading = true;
        let gateway = Arc::clone(&self.gateway);
        let result = with_timeout(self.config.gateway_timeout, gateway.create(draft)).await;
        self.is_loading = false;
        match result {
            Ok(server) => {
                self.records.push(server.clone());
                self.recompute();
                Ok(server)
            }
            Err(error) => {
                tracing::error!(error = %error, "failed to create server");
                Err(error)
            }
        }
    }

    /// Apply a partial update to one record.
    ///
    /// Each field the patch actually changes produces one history entry
    /// (audit columns are never diffed); a patch that changes nothing
    /// produces none but still refreshes `updated_at` / `updated_by`.
    /// History is only written once the gateway confirms.
    pub async fn update(&mut self, id: &str, patch: ServerPatch) -> Result<(), GatewayError> {
        let existing = match self.get(id) {
            Some(server) => server.clone(),
            None => return Err(GatewayError::not_found(id)),
        };
        let mut next = existing.clone();
        patch.apply(&mut next);
        let changes = existing.diff(&next);

        self.is_loading = true;
        let gateway = Arc::clone(&self.gateway);
        let result = with_timeout(self.config.gateway_timeout, gateway.update(id, patch)).await;
        self.is_loading = false;
        match result {
            Ok(_) => {
                let now = Utc::now();
                if !changes.is_empty() {
                    let entries = changes
                        .iter()
                        .map(|change| HistoryEntry::from_change(id, change, &self.config.actor, now));
                    self.history.entry(id.to_string()).or_default().extend(entries);
                }
                next.updated_at = now;
                next.updated_by = self.config.actor.clone();
                if let Some(slot) = self.records.iter_mut().find(|server| server.id == id) {
                    *slot = next;
                }
                self.recompute();
                Ok(())
            }
            Err(error) => {
                tracing::error!(id, error = %error, "failed to update server");
                Err(error)
            }
        }
    }

    /// Delete one record. History and selection cascade with it.
    pub async fn delete(&mut self, id: &str) -> Result<(), GatewayError> {
        self.is_loading = true;
        let gateway = Arc::clone(&self.gateway);
        let result = with_timeout(self.config.gateway_timeout, gateway.delete(id)).await;
        self.is_loading = false;
        match result {
            Ok(()) => {
                self.records.retain(|server| server.id != id);
                self.selected.remove(id);
                self.history.remove(id);
                self.recompute();
                Ok(())
            }
            Err(error) => {
                tracing::error!(id, error = %error, "failed to delete server");
                Err(error)
            }
        }
    }

    /// Delete a batch of records.
    ///
    /// The backend is not assumed to be all-or-nothing: local state
    /// reflects exactly the deletions it confirmed, and the first
    /// failure is reported after those are applied.
    pub async fn delete_many(&mut self, ids: &[String]) -> Result<(), GatewayError> {
        self.is_loading = true;
        let gateway = Arc::clone(&self.gateway);
        let mut confirmed: HashSet<String> = HashSet::new();
        let mut first_error = None;
        for id in ids {
            match with_timeout(self.config.gateway_timeout, gateway.delete(id)).await {
                Ok(()) => {
                    confirmed.insert(id.clone());
                }
                Err(error) => {
                    tracing::error!(id = %id, error = %error, "failed to delete server");
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }
        self.records.retain(|server| !confirmed.contains(&server.id));
        self.selected.retain(|id| !confirmed.contains(id));
        self.history.retain(|id, _| !confirmed.contains(id));
        self.recompute();
        self.is_loading = false;
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Add `tag` to every selected record that does not already carry it.
    ///
    /// Per-record idempotent: already-tagged records are skipped without
    /// a gateway call or history entry. Each confirmed change writes one
    /// `tags` entry with the comma-joined old and new sets.
    pub async fn bulk_tag(&mut self, tag: &str) -> Result<(), GatewayError> {
        // Walk in record order so backend calls and history are deterministic.
        let targets: Vec<(String, Vec<String>)> = self
            .records
            .iter()
            .filter(|server| self.selected.contains(&server.id) && !server.has_tag(tag))
            .map(|server| (server.id.clone(), server.tags.clone()))
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        self.is_loading = true;
        let gateway = Arc::clone(&self.gateway);
        let mut first_error = None;
        for (id, old_tags) in targets {
            let mut new_tags = old_tags.clone();
            new_tags.push(tag.to_string());
            let patch = ServerPatch::tags(new_tags.clone());
            match with_timeout(self.config.gateway_timeout, gateway.update(&id, patch)).await {
                Ok(_) => {
                    let now = Utc::now();
                    let change = FieldChange {
                        key: FieldKey::Tags,
                        old_value: old_tags.join(", "),
                        new_value: new_tags.join(", "),
                    };
                    self.history
                        .entry(id.clone())
                        .or_default()
                        .push(HistoryEntry::from_change(&id, &change, &self.config.actor, now));
                    if let Some(server) = self.records.iter_mut().find(|server| server.id == id) {
                        server.tags = new_tags;
                        server.updated_at = now;
                        server.updated_by = self.config.actor.clone();
                    }
                }
                Err(error) => {
                    tracing::error!(id = %id, error = %error, "failed to tag server");
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }
        self.recompute();
        self.is_loading = false;
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Push the authoritative record set to the backend in chunks of
    /// [`UPSERT_CHUNK`], returning the confirmed write count.
    pub async fn sync_to_gateway(&mut self) -> Result<usize, GatewayError> {
        self.is_loading = true;
        let gateway = Arc::clone(&self.gateway);
        let batches: Vec<Vec<Server>> = self
            .records
            .chunks(UPSERT_CHUNK)
            .map(<[Server]>::to_vec)
            .collect();
        let mut written = 0;
        for batch in batches {
            match with_timeout(self.config.gateway_timeout, gateway.batch_upsert(batch)).await {
                Ok(count) => written += count,
                Err(error) => {
                    tracing::error!(error = %error, written, "sync to backend aborted");
                    self.is_loading = false;
                    return Err(error);
                }
            }
        }
        self.is_loading = false;
        Ok(written)
    }

    // ========================================================================
    // Filters, search, sort
    // ========================================================================

    /// Replace the filter list. Resets to page 1: the new result set
    /// invalidates the old page position.
    pub fn set_filters(&mut self, filters: Vec<Filter>) {
        self.filters = filters;
        self.page = 1;
        self.recompute();
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
        self.page = 1;
        self.recompute();
    }

    pub fn remove_filter(&mut self, index: usize) {
        if index < self.filters.len() {
            self.filters.remove(index);
            self.page = 1;
            self.recompute();
        }
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
        self.recompute();
    }

    /// Set the full-text search. Resets to page 1.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
        self.recompute();
    }

    /// Replace the sort order (capped at [`MAX_SORT_KEYS`]). The page
    /// position is kept; reordering does not invalidate it.
    pub fn set_sort_keys(&mut self, mut sort_keys: Vec<SortKey>) {
        sort_keys.truncate(MAX_SORT_KEYS);
        self.sort_keys = sort_keys;
        self.recompute();
    }

    /// Fold a column-header click into the sort order
    /// (asc -> desc -> removed; new columns become the primary key).
    pub fn toggle_sort(&mut self, key: FieldKey) {
        self.sort_keys = toggle_sort_key(&self.sort_keys, key);
        self.recompute();
    }

    // ========================================================================
    // Pagination and columns
    // ========================================================================

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages.max(1));
    }

    /// Change the page size and jump back to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
        self.recompute();
    }

    pub fn set_visible_fields(&mut self, fields: Vec<FieldKey>) {
        self.visible_fields = fields;
    }

    /// Show or hide a column. The last visible column cannot be hidden.
    pub fn toggle_column(&mut self, field: FieldKey) {
        match self.visible_fields.iter().position(|f| *f == field) {
            Some(index) => {
                if self.visible_fields.len() > 1 {
                    self.visible_fields.remove(index);
                }
            }
            None => self.visible_fields.push(field),
        }
    }

    // ========================================================================
    // Saved views
    // ========================================================================

    /// Snapshot the current filters, columns, and sort order under a
    /// name; the new view becomes active. Returns its id.
    pub fn save_view(&mut self, name: impl Into<String>) -> String {
        let view = SavedView::capture(
            name,
            self.config.actor.clone(),
            &self.filters,
            &self.visible_fields,
            &self.sort_keys,
        );
        let id = view.id.clone();
        self.active_view = Some(id.clone());
        self.saved_views.push(view);
        id
    }

    /// Restore a saved view's configuration. Unknown ids are a no-op.
    pub fn load_view(&mut self, view_id: &str) {
        let Some(view) = self
            .saved_views
            .iter()
            .find(|view| view.id == view_id)
            .cloned()
        else {
            return;
        };
        self.filters = view.filters;
        self.visible_fields = view.visible_columns;
        self.sort_keys = view.sort_order;
        self.active_view = Some(view.id);
        self.page = 1;
        self.recompute();
    }

    pub fn delete_view(&mut self, view_id: &str) {
        self.saved_views.retain(|view| view.id != view_id);
        if self.active_view.as_deref() == Some(view_id) {
            self.active_view = None;
        }
    }

    /// Persist the saved views as JSON.
    pub fn save_views_to(&self, path: &Path) -> Result<(), String> {
        persistence::save_views(&self.saved_views, path)
    }

    /// Replace the saved views from a JSON file (missing or unreadable
    /// files yield an empty list). A stale active id is cleared.
    pub fn load_views_from(&mut self, path: &Path) {
        self.saved_views = persistence::load_views(path);
        let active_is_stale = match &self.active_view {
            Some(active) => !self.saved_views.iter().any(|view| &view.id == active),
            None => false,
        };
        if active_is_stale {
            self.active_view = None;
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn toggle_select(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Page-scoped select-all: if every row on the current page is
    /// already selected, deselect exactly those rows; otherwise select
    /// exactly those rows. Selections on other pages are untouched.
    pub fn select_all_on_page(&mut self) {
        let page_ids: Vec<String> = self
            .current_page_slice()
            .iter()
            .map(|server| server.id.clone())
            .collect();
        if page_ids.is_empty() {
            return;
        }
        let all_selected = page_ids.iter().all(|id| self.selected.contains(id));
        if all_selected {
            for id in &page_ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(page_ids);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}

/// Run a gateway future under the configured ceiling, if any.
async fn with_timeout<T>(
    limit: Option<Duration>,
    fut: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, GatewayError> {
    match limit {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::timeout(limit)),
        },
        None => fut.await,
    }
}
