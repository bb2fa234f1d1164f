use crate::enums::{BackupStatus, Environment, HardwareType, PatchStatus};
use crate::field::FieldKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of samples kept in the rolling CPU-load trend.
pub const CPU_TREND_WINDOW: usize = 24;

/// One server inventory record.
///
/// `id` is assigned by the persistence backend and immutable afterwards.
/// `updated_at` / `updated_by` are maintained by the store's update path,
/// never by callers directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: String,
    pub server_name: String,
    pub operating_system: String,
    pub hardware_type: HardwareType,
    pub company: String,
    pub server_type: Environment,
    pub location: String,
    pub system_admin: String,
    pub backup_admin: String,
    pub hardware_admin: String,
    pub description: String,
    pub domain: String,
    pub maintenance_window: String,
    pub ip_address: String,
    pub application_zone: String,
    pub operational_zone: String,
    pub backup: BackupStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    pub cores: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
    /// Virtualization cluster name; empty for bare-metal machines.
    #[serde(default)]
    pub cluster: String,
    pub application: String,
    pub patch_status: PatchStatus,
    #[serde(default)]
    pub last_patch_date: Option<DateTime<Utc>>,
    /// Rolling window of CPU-load percentage samples, oldest first.
    #[serde(default)]
    pub cpu_load_trend: Vec<f32>,
    pub alarm_count: u32,
}

impl Server {
    /// Append a CPU-load sample, evicting the oldest once the window is full.
    pub fn push_load_sample(&mut self, sample: f32) {
        self.cpu_load_trend.push(sample);
        let len = self.cpu_load_trend.len();
        if len > CPU_TREND_WINDOW {
            self.cpu_load_trend.drain(..len - CPU_TREND_WINDOW);
        }
    }

    /// Most recent CPU-load sample, if any.
    pub fn latest_load(&self) -> Option<f32> {
        self.cpu_load_trend.last().copied()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Field-level differences between two versions of a record.
    ///
    /// Compares every tracked field (audit-managed `updatedAt` / `updatedBy`
    /// are excluded) via its canonical string rendering. The result feeds
    /// history synthesis, so old/new come back already stringified.
    pub fn diff(&self, other: &Server) -> Vec<FieldChange> {
        FieldKey::TRACKED
            .iter()
            .filter_map(|key| {
                let old_value = key.value(self).into_text().into_owned();
                let new_value = key.value(other).into_text().into_owned();
                (old_value != new_value).then_some(FieldChange {
                    key: *key,
                    old_value,
                    new_value,
                })
            })
            .collect()
    }
}

/// One field-level change detected by [`Server::diff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub key: FieldKey,
    pub old_value: String,
    pub new_value: String,
}

/// Payload for creating a server: everything but the backend-assigned `id`.
///
/// Timestamps may be supplied (bulk imports keep their original dates);
/// the backend stamps them when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDraft {
    pub server_name: String,
    pub operating_system: String,
    pub hardware_type: HardwareType,
    pub company: String,
    pub server_type: Environment,
    pub location: String,
    pub system_admin: String,
    pub backup_admin: String,
    pub hardware_admin: String,
    pub description: String,
    pub domain: String,
    pub maintenance_window: String,
    pub ip_address: String,
    pub application_zone: String,
    pub operational_zone: String,
    pub backup: BackupStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: String,
    pub cores: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
    #[serde(default)]
    pub cluster: String,
    pub application: String,
    pub patch_status: PatchStatus,
    #[serde(default)]
    pub last_patch_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cpu_load_trend: Vec<f32>,
    pub alarm_count: u32,
}

impl ServerDraft {
    /// Materialize the draft into a full record with the given id.
    /// Missing timestamps are stamped with `now`.
    pub fn into_server(self, id: String, now: DateTime<Utc>) -> Server {
        Server {
            id,
            server_name: self.server_name,
            operating_system: self.operating_system,
            hardware_type: self.hardware_type,
            company: self.company,
            server_type: self.server_type,
            location: self.location,
            system_admin: self.system_admin,
            backup_admin: self.backup_admin,
            hardware_admin: self.hardware_admin,
            description: self.description,
            domain: self.domain,
            maintenance_window: self.maintenance_window,
            ip_address: self.ip_address,
            application_zone: self.application_zone,
            operational_zone: self.operational_zone,
            backup: self.backup,
            tags: self.tags,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
            updated_by: self.updated_by,
            cores: self.cores,
            ram_gb: self.ram_gb,
            storage_gb: self.storage_gb,
            cluster: self.cluster,
            application: self.application,
            patch_status: self.patch_status,
            last_patch_date: self.last_patch_date,
            cpu_load_trend: self.cpu_load_trend,
            alarm_count: self.alarm_count,
        }
    }
}

/// Partial update of a server: every settable field, all optional.
///
/// `id`, `created_at`, `updated_at`, and `updated_by` are absent on
/// purpose: the first two are immutable, the last two are stamped by
/// the store's update path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerPatch {
    pub server_name: Option<String>,
    pub operating_system: Option<String>,
    pub hardware_type: Option<HardwareType>,
    pub company: Option<String>,
    pub server_type: Option<Environment>,
    pub location: Option<String>,
    pub system_admin: Option<String>,
    pub backup_admin: Option<String>,
    pub hardware_admin: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub maintenance_window: Option<String>,
    pub ip_address: Option<String>,
    pub application_zone: Option<String>,
    pub operational_zone: Option<String>,
    pub backup: Option<BackupStatus>,
    pub tags: Option<Vec<String>>,
    pub cores: Option<u32>,
    pub ram_gb: Option<u32>,
    pub storage_gb: Option<u32>,
    pub cluster: Option<String>,
    pub application: Option<String>,
    pub patch_status: Option<PatchStatus>,
    pub last_patch_date: Option<DateTime<Utc>>,
    pub cpu_load_trend: Option<Vec<f32>>,
    pub alarm_count: Option<u32>,
}

macro_rules! apply_field {
    ($patch:expr, $server:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field.clone() {
                $server.$field = value;
            }
        )+
    };
}

impl ServerPatch {
    /// Overlay the patch onto a record. Unset fields are left untouched.
    pub fn apply(&self, server: &mut Server) {
        apply_field!(
            self,
            server,
            server_name,
            operating_system,
            hardware_type,
            company,
            server_type,
            location,
            system_admin,
            backup_admin,
            hardware_admin,
            description,
            domain,
            maintenance_window,
            ip_address,
            application_zone,
            operational_zone,
            backup,
            tags,
            cores,
            ram_gb,
            storage_gb,
            cluster,
            application,
            patch_status,
            cpu_load_trend,
            alarm_count,
        );
        if let Some(value) = self.last_patch_date {
            server.last_patch_date = Some(value);
        }
    }

    /// A patch that only replaces the tag set.
    pub fn tags(tags: Vec<String>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
