use crate::error::Result;
use async_trait::async_trait;
use rackview_model::{Server, ServerDraft, ServerPatch};

/// Abstract CRUD boundary the inventory store talks to.
///
/// Any backend with fetch-all / create / update / delete / batch-upsert
/// semantics satisfies the store; the gateway owns no state of its own
/// and is a stateless conduit to whatever is behind it.
///
/// Backends assign ids and stamp missing timestamps on `create`; the
/// store never invents ids locally. Errors map onto
/// [`GatewayError`](crate::GatewayError)'s three kinds.
#[async_trait]
pub trait ServerGateway: Send + Sync {
    /// Fetch the full record set.
    async fn fetch_all(&self) -> Result<Vec<Server>>;

    /// Persist a new record. The backend assigns the id and stamps
    /// `created_at` / `updated_at` when the draft leaves them unset.
    async fn create(&self, draft: ServerDraft) -> Result<Server>;

    /// Apply a partial update to an existing record and return the
    /// stored result.
    async fn update(&self, id: &str, patch: ServerPatch) -> Result<Server>;

    /// Remove a record.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Insert-or-replace a batch of records, returning how many were
    /// written. Callers are responsible for chunking when the backend
    /// limits batch sizes.
    async fn batch_upsert(&self, records: Vec<Server>) -> Result<usize>;
}
