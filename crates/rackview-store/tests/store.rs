//! Gateway-backed store operations: load, CRUD, history synthesis,
//! bulk tagging, sync, and failure semantics.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rackview_gateway::{GatewayError, MemoryGateway, ServerGateway};
use rackview_model::{
    BackupStatus, Environment, HardwareType, PatchStatus, Server, ServerDraft, ServerPatch,
};
use rackview_store::{InventoryStore, StoreConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn make_server(name: &str, env: Environment) -> Server {
    Server {
        id: name.to_lowercase(),
        server_name: name.to_string(),
        operating_system: "Ubuntu 22.04".to_string(),
        hardware_type: HardwareType::Virtualized,
        company: "Acme".to_string(),
        server_type: env,
        location: "Frankfurt".to_string(),
        system_admin: "j.doe".to_string(),
        backup_admin: "b.ops".to_string(),
        hardware_admin: "h.ops".to_string(),
        description: String::new(),
        domain: "acme.internal".to_string(),
        maintenance_window: "Sun 02:00-04:00".to_string(),
        ip_address: "10.0.0.1".to_string(),
        application_zone: "web".to_string(),
        operational_zone: "dmz".to_string(),
        backup: BackupStatus::Yes,
        tags: vec![],
        created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        updated_by: "seed".to_string(),
        cores: 8,
        ram_gb: 32,
        storage_gb: 500,
        cluster: "esx-fra-01".to_string(),
        application: "webshop".to_string(),
        patch_status: PatchStatus::Current,
        last_patch_date: None,
        cpu_load_trend: vec![],
        alarm_count: 0,
    }
}

fn make_draft(name: &str) -> ServerDraft {
    ServerDraft {
        server_name: name.to_string(),
        operating_system: "Ubuntu 22.04".to_string(),
        hardware_type: HardwareType::Virtualized,
        company: "Acme".to_string(),
        server_type: Environment::Production,
        location: "Frankfurt".to_string(),
        system_admin: "j.doe".to_string(),
        backup_admin: "b.ops".to_string(),
        hardware_admin: "h.ops".to_string(),
        description: String::new(),
        domain: "acme.internal".to_string(),
        maintenance_window: "Sun 02:00-04:00".to_string(),
        ip_address: "10.0.0.2".to_string(),
        application_zone: "web".to_string(),
        operational_zone: "dmz".to_string(),
        backup: BackupStatus::Yes,
        tags: vec![],
        created_at: None,
        updated_at: None,
        updated_by: "seed".to_string(),
        cores: 4,
        ram_gb: 16,
        storage_gb: 250,
        cluster: "esx-fra-01".to_string(),
        application: "webshop".to_string(),
        patch_status: PatchStatus::Current,
        last_patch_date: None,
        cpu_load_trend: vec![],
        alarm_count: 0,
    }
}

/// Store over a seeded in-memory backend, unsorted so load order shows.
async fn seeded_store(records: Vec<Server>) -> InventoryStore {
    let gateway = Arc::new(MemoryGateway::with_records(records));
    let config = StoreConfig {
        sort_keys: vec![],
        ..StoreConfig::default()
    };
    let mut store = InventoryStore::new(gateway, config);
    store.load().await.expect("initial load");
    store
}

/// Gateway that can be flipped into a failing state mid-test.
struct FlakyGateway {
    inner: MemoryGateway,
    failing: AtomicBool,
}

impl FlakyGateway {
    fn with_records(records: Vec<Server>) -> Self {
        Self {
            inner: MemoryGateway::with_records(records),
            failing: AtomicBool::new(false),
        }
    }

    fn fail_from_now_on(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn outage() -> GatewayError {
        GatewayError::Transport {
            context: "connection refused".to_string(),
            source: None,
        }
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Self::outage())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ServerGateway for FlakyGateway {
    async fn fetch_all(&self) -> Result<Vec<Server>, GatewayError> {
        self.check()?;
        self.inner.fetch_all().await
    }

    async fn create(&self, draft: ServerDraft) -> Result<Server, GatewayError> {
        self.check()?;
        self.inner.create(draft).await
    }

    async fn update(&self, id: &str, patch: ServerPatch) -> Result<Server, GatewayError> {
        self.check()?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.check()?;
        self.inner.delete(id).await
    }

    async fn batch_upsert(&self, records: Vec<Server>) -> Result<usize, GatewayError> {
        self.check()?;
        self.inner.batch_upsert(records).await
    }
}

#[tokio::test]
async fn load_replaces_records_and_recomputes_the_view() {
    let store = seeded_store(vec![
        make_server("SRV-A", Environment::Production),
        make_server("SRV-B", Environment::Test),
        make_server("SRV-C", Environment::Production),
    ])
    .await;

    assert_eq!(store.records().len(), 3);
    assert_eq!(store.derived_view().len(), 3);
    assert_eq!(store.total_pages(), 1);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn failed_load_is_non_destructive() {
    let gateway = Arc::new(FlakyGateway::with_records(vec![make_server(
        "SRV-A",
        Environment::Production,
    )]));
    let mut store = InventoryStore::new(gateway.clone(), StoreConfig::default());
    store.load().await.expect("first load");
    assert_eq!(store.records().len(), 1);

    gateway.fail_from_now_on();
    let error = store.load().await.expect_err("backend is down");

    assert!(matches!(error, GatewayError::Transport { .. }));
    assert_eq!(store.records().len(), 1, "local state is preserved");
    assert!(!store.is_loading());
}

#[tokio::test]
async fn create_appends_the_stored_record() {
    let mut store = seeded_store(vec![make_server("SRV-A", Environment::Production)]).await;

    let created = store.create(make_draft("SRV-B")).await.expect("create");

    assert!(!created.id.is_empty());
    assert_eq!(store.records().len(), 2);
    assert_eq!(store.derived_view().len(), 2);
}

#[tokio::test]
async fn rejected_create_changes_nothing() {
    let mut store = seeded_store(vec![make_server("SRV-A", Environment::Production)]).await;

    let mut bad = make_draft("SRV-B");
    bad.ip_address = "not-an-ip".to_string();
    let error = store.create(bad).await.expect_err("must be rejected");

    assert!(matches!(error, GatewayError::Validation { .. }));
    assert_eq!(store.records().len(), 1);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn update_writes_exactly_one_history_entry_per_changed_field() {
    let mut store = seeded_store(vec![make_server("SRV-A", Environment::Production)]).await;
    let before = store.get("srv-a").expect("seeded").updated_at;

    let patch = ServerPatch {
        company: Some("Globex".to_string()),
        // Same value as seeded: must not produce an entry.
        location: Some("Frankfurt".to_string()),
        ..ServerPatch::default()
    };
    store.update("srv-a", patch).await.expect("update");

    let history = store.history_for("srv-a");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].field, "company");
    assert_eq!(history[0].old_value, "Acme");
    assert_eq!(history[0].new_value, "Globex");
    assert_eq!(history[0].user, "operator");

    let updated = store.get("srv-a").expect("still present");
    assert_eq!(updated.company, "Globex");
    assert_eq!(updated.updated_by, "operator");
    assert!(updated.updated_at > before);
}

#[tokio::test]
async fn no_op_update_refreshes_audit_columns_without_history() {
    let mut store = seeded_store(vec![make_server("SRV-A", Environment::Production)]).await;
    let before = store.get("srv-a").expect("seeded").updated_at;

    store
        .update("srv-a", ServerPatch::default())
        .await
        .expect("update");

    assert!(store.history_for("srv-a").is_empty());
    let updated = store.get("srv-a").expect("still present");
    assert!(updated.updated_at > before);
    assert_eq!(updated.updated_by, "operator");
}

#[tokio::test]
async fn update_of_unknown_id_fails_without_side_effects() {
    let mut store = seeded_store(vec![make_server("SRV-A", Environment::Production)]).await;

    let error = store
        .update("srv-ghost", ServerPatch::default())
        .await
        .expect_err("unknown id");

    assert!(matches!(error, GatewayError::NotFound { .. }));
    assert!(store.history_for("srv-ghost").is_empty());
}

#[tokio::test]
async fn delete_cascades_history_and_selection() {
    let mut store = seeded_store(vec![
        make_server("SRV-A", Environment::Production),
        make_server("SRV-B", Environment::Test),
    ])
    .await;
    store.toggle_select("srv-a");
    let patch = ServerPatch {
        company: Some("Globex".to_string()),
        ..ServerPatch::default()
    };
    store.update("srv-a", patch).await.expect("update");
    assert_eq!(store.history_for("srv-a").len(), 1);

    store.delete("srv-a").await.expect("delete");

    assert!(store.get("srv-a").is_none());
    assert!(store.history_for("srv-a").is_empty());
    assert!(!store.is_selected("srv-a"));
    assert_eq!(store.derived_view().len(), 1);
}

/// Gateway that refuses to delete one specific id.
struct StubbornGateway {
    inner: MemoryGateway,
    protected: String,
}

#[async_trait]
impl ServerGateway for StubbornGateway {
    async fn fetch_all(&self) -> Result<Vec<Server>, GatewayError> {
        self.inner.fetch_all().await
    }

    async fn create(&self, draft: ServerDraft) -> Result<Server, GatewayError> {
        self.inner.create(draft).await
    }

    async fn update(&self, id: &str, patch: ServerPatch) -> Result<Server, GatewayError> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        if id == self.protected {
            return Err(GatewayError::Transport {
                context: "row lock held".to_string(),
                source: None,
            });
        }
        self.inner.delete(id).await
    }

    async fn batch_upsert(&self, records: Vec<Server>) -> Result<usize, GatewayError> {
        self.inner.batch_upsert(records).await
    }
}

#[tokio::test]
async fn delete_many_reflects_exactly_the_confirmed_deletions() {
    let records = vec![
        make_server("SRV-A", Environment::Production),
        make_server("SRV-B", Environment::Test),
        make_server("SRV-C", Environment::Qa),
    ];
    let gateway = Arc::new(StubbornGateway {
        inner: MemoryGateway::with_records(records),
        protected: "srv-b".to_string(),
    });
    let mut store = InventoryStore::new(gateway, StoreConfig::default());
    store.load().await.expect("load");
    store.toggle_select("srv-a");
    store.toggle_select("srv-b");
    store.toggle_select("srv-c");

    let ids = vec![
        "srv-a".to_string(),
        "srv-b".to_string(),
        "srv-c".to_string(),
    ];
    let error = store.delete_many(&ids).await.expect_err("one refused");

    assert!(matches!(error, GatewayError::Transport { .. }));
    assert!(store.get("srv-a").is_none());
    assert!(store.get("srv-c").is_none());
    assert!(store.get("srv-b").is_some(), "unconfirmed survives");
    assert!(store.is_selected("srv-b"));
    assert!(!store.is_selected("srv-a"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn bulk_tag_is_idempotent_per_record() {
    let mut store = seeded_store(vec![
        make_server("SRV-A", Environment::Production),
        make_server("SRV-B", Environment::Test),
    ])
    .await;
    store.toggle_select("srv-a");
    store.toggle_select("srv-b");

    store.bulk_tag("audited").await.expect("first pass");
    store.bulk_tag("audited").await.expect("second pass");

    for id in ["srv-a", "srv-b"] {
        let server = store.get(id).expect("present");
        let occurrences = server.tags.iter().filter(|tag| *tag == "audited").count();
        assert_eq!(occurrences, 1, "tag applied exactly once on {id}");

        let history = store.history_for(id);
        assert_eq!(history.len(), 1, "one entry per record on {id}");
        assert_eq!(history[0].field, "tags");
        assert_eq!(history[0].new_value, "audited");
    }
}

#[tokio::test]
async fn bulk_tag_skips_records_that_already_carry_the_tag() {
    let mut tagged = make_server("SRV-A", Environment::Production);
    tagged.tags = vec!["audited".to_string()];
    let mut store = seeded_store(vec![tagged, make_server("SRV-B", Environment::Test)]).await;
    store.toggle_select("srv-a");
    store.toggle_select("srv-b");

    store.bulk_tag("audited").await.expect("bulk tag");

    assert!(store.history_for("srv-a").is_empty());
    let history = store.history_for("srv-b");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_value, "");
    assert_eq!(history[0].new_value, "audited");
}

#[tokio::test]
async fn page_is_clamped_when_deletions_shrink_the_view() {
    let records: Vec<Server> = (0..25)
        .map(|index| {
            let mut server = make_server(&format!("SRV-{index:02}"), Environment::Production);
            server.id = format!("srv-{index:02}");
            server
        })
        .collect();
    let gateway = Arc::new(MemoryGateway::with_records(records));
    let config = StoreConfig {
        page_size: 10,
        sort_keys: vec![],
        ..StoreConfig::default()
    };
    let mut store = InventoryStore::new(gateway, config);
    store.load().await.expect("load");
    assert_eq!(store.total_pages(), 3);
    store.set_page(3);

    let doomed: Vec<String> = (5..25).map(|index| format!("srv-{index:02}")).collect();
    store.delete_many(&doomed).await.expect("delete batch");

    assert_eq!(store.derived_view().len(), 5);
    assert_eq!(store.total_pages(), 1);
    assert_eq!(store.page(), 1);
    assert_eq!(store.current_page_slice().len(), 5);
}

/// Gateway that records the size of every upsert batch it receives.
struct CountingGateway {
    inner: MemoryGateway,
    batch_sizes: std::sync::Mutex<Vec<usize>>,
}

#[async_trait]
impl ServerGateway for CountingGateway {
    async fn fetch_all(&self) -> Result<Vec<Server>, GatewayError> {
        self.inner.fetch_all().await
    }

    async fn create(&self, draft: ServerDraft) -> Result<Server, GatewayError> {
        self.inner.create(draft).await
    }

    async fn update(&self, id: &str, patch: ServerPatch) -> Result<Server, GatewayError> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.inner.delete(id).await
    }

    async fn batch_upsert(&self, records: Vec<Server>) -> Result<usize, GatewayError> {
        self.batch_sizes
            .lock()
            .expect("batch log lock")
            .push(records.len());
        self.inner.batch_upsert(records).await
    }
}

#[tokio::test]
async fn sync_chunks_the_record_set_at_one_thousand() {
    let records: Vec<Server> = (0..2050)
        .map(|index| {
            let mut server = make_server(&format!("SRV-{index:04}"), Environment::Production);
            server.id = format!("srv-{index:04}");
            server
        })
        .collect();
    let gateway = Arc::new(CountingGateway {
        inner: MemoryGateway::with_records(records),
        batch_sizes: std::sync::Mutex::new(Vec::new()),
    });
    let mut store = InventoryStore::new(gateway.clone(), StoreConfig::default());
    store.load().await.expect("load");

    let written = store.sync_to_gateway().await.expect("sync");

    assert_eq!(written, 2050);
    let sizes = gateway.batch_sizes.lock().expect("batch log lock").clone();
    assert_eq!(sizes, vec![1000, 1000, 50]);
}

/// Gateway that never answers in time.
struct GlacialGateway;

#[async_trait]
impl ServerGateway for GlacialGateway {
    async fn fetch_all(&self) -> Result<Vec<Server>, GatewayError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![])
    }

    async fn create(&self, _draft: ServerDraft) -> Result<Server, GatewayError> {
        Err(GatewayError::Transport {
            context: "unused".to_string(),
            source: None,
        })
    }

    async fn update(&self, _id: &str, _patch: ServerPatch) -> Result<Server, GatewayError> {
        Err(GatewayError::Transport {
            context: "unused".to_string(),
            source: None,
        })
    }

    async fn delete(&self, _id: &str) -> Result<(), GatewayError> {
        Err(GatewayError::Transport {
            context: "unused".to_string(),
            source: None,
        })
    }

    async fn batch_upsert(&self, _records: Vec<Server>) -> Result<usize, GatewayError> {
        Err(GatewayError::Transport {
            context: "unused".to_string(),
            source: None,
        })
    }
}

#[tokio::test]
async fn configured_timeout_surfaces_as_a_transport_error() {
    let config = StoreConfig {
        gateway_timeout: Some(Duration::from_millis(50)),
        ..StoreConfig::default()
    };
    let mut store = InventoryStore::new(Arc::new(GlacialGateway), config);

    let error = store.load().await.expect_err("must time out");

    assert!(matches!(error, GatewayError::Transport { .. }));
    assert!(!store.is_loading());
    assert!(store.records().is_empty());
}
