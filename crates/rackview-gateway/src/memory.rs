//! In-memory reference backend.
//!
//! Backs tests and demos without a database. Records live in insertion
//! order behind an async lock, so fetch-all is deterministic.

use crate::error::{GatewayError, Result};
use crate::gateway::ServerGateway;
use crate::validate::{validate_draft, validate_patch};
use async_trait::async_trait;
use chrono::Utc;
use rackview_model::{Server, ServerDraft, ServerPatch};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A [`ServerGateway`] holding everything in process memory.
#[derive(Default)]
pub struct MemoryGateway {
    records: RwLock<Vec<Server>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with existing records (ids are kept as-is).
    pub fn with_records(records: Vec<Server>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Current backend contents, for assertions in tests.
    pub async fn snapshot(&self) -> Vec<Server> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl ServerGateway for MemoryGateway {
    async fn fetch_all(&self) -> Result<Vec<Server>> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, draft: ServerDraft) -> Result<Server> {
        validate_draft(&draft)?;
        let server = draft.into_server(Uuid::new_v4().to_string(), Utc::now());
        let mut records = self.records.write().await;
        records.push(server.clone());
        tracing::debug!(id = %server.id, "created server record");
        Ok(server)
    }

    async fn update(&self, id: &str, patch: ServerPatch) -> Result<Server> {
        validate_patch(&patch)?;
        let mut records = self.records.write().await;
        let server = records
            .iter_mut()
            .find(|server| server.id == id)
            .ok_or_else(|| GatewayError::not_found(id))?;
        patch.apply(server);
        server.updated_at = Utc::now();
        Ok(server.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|server| server.id == id)
            .ok_or_else(|| GatewayError::not_found(id))?;
        records.remove(index);
        tracing::debug!(id, "deleted server record");
        Ok(())
    }

    async fn batch_upsert(&self, batch: Vec<Server>) -> Result<usize> {
        let mut records = self.records.write().await;
        let count = batch.len();
        for incoming in batch {
            match records.iter_mut().find(|server| server.id == incoming.id) {
                Some(existing) => *existing = incoming,
                None => records.push(incoming),
            }
        }
        Ok(count)
    }
}
