//! Enum-keyed field access.
//!
//! The dashboard filters, searches, sorts, and exports by field *name*
//! (saved views store plain strings). Instead of indexing records with
//! runtime string lookups, every addressable column is a [`FieldKey`]
//! variant with a typed getter, so field access is checked at compile
//! time while the by-name capability survives through `FromStr`.

use crate::server::Server;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// One addressable column of a [`Server`] record.
///
/// Serialized as the camelCase wire name (`"serverName"`, `"ramGb"`, …),
/// which is also what history entries carry in their `field` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Id,
    ServerName,
    OperatingSystem,
    HardwareType,
    Company,
    ServerType,
    Location,
    SystemAdmin,
    BackupAdmin,
    HardwareAdmin,
    Description,
    Domain,
    MaintenanceWindow,
    IpAddress,
    ApplicationZone,
    OperationalZone,
    Backup,
    Tags,
    Cores,
    RamGb,
    StorageGb,
    Cluster,
    Application,
    PatchStatus,
    LastPatchDate,
    CpuLoadTrend,
    AlarmCount,
    CreatedAt,
    UpdatedAt,
    UpdatedBy,
}

impl FieldKey {
    /// Every addressable field.
    pub const ALL: [FieldKey; 30] = [
        FieldKey::Id,
        FieldKey::ServerName,
        FieldKey::OperatingSystem,
        FieldKey::HardwareType,
        FieldKey::Company,
        FieldKey::ServerType,
        FieldKey::Location,
        FieldKey::SystemAdmin,
        FieldKey::BackupAdmin,
        FieldKey::HardwareAdmin,
        FieldKey::Description,
        FieldKey::Domain,
        FieldKey::MaintenanceWindow,
        FieldKey::IpAddress,
        FieldKey::ApplicationZone,
        FieldKey::OperationalZone,
        FieldKey::Backup,
        FieldKey::Tags,
        FieldKey::Cores,
        FieldKey::RamGb,
        FieldKey::StorageGb,
        FieldKey::Cluster,
        FieldKey::Application,
        FieldKey::PatchStatus,
        FieldKey::LastPatchDate,
        FieldKey::CpuLoadTrend,
        FieldKey::AlarmCount,
        FieldKey::CreatedAt,
        FieldKey::UpdatedAt,
        FieldKey::UpdatedBy,
    ];

    /// Fields the audit trail diffs. The audit columns themselves
    /// (`updatedAt`, `updatedBy`) never generate history entries.
    pub const TRACKED: [FieldKey; 28] = [
        FieldKey::Id,
        FieldKey::ServerName,
        FieldKey::OperatingSystem,
        FieldKey::HardwareType,
        FieldKey::Company,
        FieldKey::ServerType,
        FieldKey::Location,
        FieldKey::SystemAdmin,
        FieldKey::BackupAdmin,
        FieldKey::HardwareAdmin,
        FieldKey::Description,
        FieldKey::Domain,
        FieldKey::MaintenanceWindow,
        FieldKey::IpAddress,
        FieldKey::ApplicationZone,
        FieldKey::OperationalZone,
        FieldKey::Backup,
        FieldKey::Tags,
        FieldKey::Cores,
        FieldKey::RamGb,
        FieldKey::StorageGb,
        FieldKey::Cluster,
        FieldKey::Application,
        FieldKey::PatchStatus,
        FieldKey::LastPatchDate,
        FieldKey::CpuLoadTrend,
        FieldKey::AlarmCount,
        FieldKey::CreatedAt,
    ];

    /// Columns visible in a fresh table, matching the default dashboard
    /// layout.
    pub const DEFAULT_VISIBLE: [FieldKey; 8] = [
        FieldKey::ServerName,
        FieldKey::OperatingSystem,
        FieldKey::HardwareType,
        FieldKey::Company,
        FieldKey::ServerType,
        FieldKey::Location,
        FieldKey::IpAddress,
        FieldKey::Backup,
    ];

    /// The camelCase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Id => "id",
            FieldKey::ServerName => "serverName",
            FieldKey::OperatingSystem => "operatingSystem",
            FieldKey::HardwareType => "hardwareType",
            FieldKey::Company => "company",
            FieldKey::ServerType => "serverType",
            FieldKey::Location => "location",
            FieldKey::SystemAdmin => "systemAdmin",
            FieldKey::BackupAdmin => "backupAdmin",
            FieldKey::HardwareAdmin => "hardwareAdmin",
            FieldKey::Description => "description",
            FieldKey::Domain => "domain",
            FieldKey::MaintenanceWindow => "maintenanceWindow",
            FieldKey::IpAddress => "ipAddress",
            FieldKey::ApplicationZone => "applicationZone",
            FieldKey::OperationalZone => "operationalZone",
            FieldKey::Backup => "backup",
            FieldKey::Tags => "tags",
            FieldKey::Cores => "cores",
            FieldKey::RamGb => "ramGb",
            FieldKey::StorageGb => "storageGb",
            FieldKey::Cluster => "cluster",
            FieldKey::Application => "application",
            FieldKey::PatchStatus => "patchStatus",
            FieldKey::LastPatchDate => "lastPatchDate",
            FieldKey::CpuLoadTrend => "cpuLoadTrend",
            FieldKey::AlarmCount => "alarmCount",
            FieldKey::CreatedAt => "createdAt",
            FieldKey::UpdatedAt => "updatedAt",
            FieldKey::UpdatedBy => "updatedBy",
        }
    }

    /// The value of this field on a record, for matching, sorting, and
    /// export. Scalar fields come back as text (numbers and timestamps
    /// in their canonical string rendering); the tag set keeps its
    /// elements so substring matching can test each one.
    pub fn value<'a>(&self, server: &'a Server) -> FieldValue<'a> {
        match self {
            FieldKey::Id => FieldValue::Text(Cow::Borrowed(&server.id)),
            FieldKey::ServerName => FieldValue::Text(Cow::Borrowed(&server.server_name)),
            FieldKey::OperatingSystem => FieldValue::Text(Cow::Borrowed(&server.operating_system)),
            FieldKey::HardwareType => {
                FieldValue::Text(Cow::Borrowed(server.hardware_type.as_str()))
            }
            FieldKey::Company => FieldValue::Text(Cow::Borrowed(&server.company)),
            FieldKey::ServerType => FieldValue::Text(Cow::Borrowed(server.server_type.as_str())),
            FieldKey::Location => FieldValue::Text(Cow::Borrowed(&server.location)),
            FieldKey::SystemAdmin => FieldValue::Text(Cow::Borrowed(&server.system_admin)),
            FieldKey::BackupAdmin => FieldValue::Text(Cow::Borrowed(&server.backup_admin)),
            FieldKey::HardwareAdmin => FieldValue::Text(Cow::Borrowed(&server.hardware_admin)),
            FieldKey::Description => FieldValue::Text(Cow::Borrowed(&server.description)),
            FieldKey::Domain => FieldValue::Text(Cow::Borrowed(&server.domain)),
            FieldKey::MaintenanceWindow => {
                FieldValue::Text(Cow::Borrowed(&server.maintenance_window))
            }
            FieldKey::IpAddress => FieldValue::Text(Cow::Borrowed(&server.ip_address)),
            FieldKey::ApplicationZone => FieldValue::Text(Cow::Borrowed(&server.application_zone)),
            FieldKey::OperationalZone => {
                FieldValue::Text(Cow::Borrowed(&server.operational_zone))
            }
            FieldKey::Backup => FieldValue::Text(Cow::Borrowed(server.backup.as_str())),
            FieldKey::Tags => FieldValue::List(&server.tags),
            FieldKey::Cores => FieldValue::Text(Cow::Owned(server.cores.to_string())),
            FieldKey::RamGb => FieldValue::Text(Cow::Owned(server.ram_gb.to_string())),
            FieldKey::StorageGb => FieldValue::Text(Cow::Owned(server.storage_gb.to_string())),
            FieldKey::Cluster => FieldValue::Text(Cow::Borrowed(&server.cluster)),
            FieldKey::Application => FieldValue::Text(Cow::Borrowed(&server.application)),
            FieldKey::PatchStatus => FieldValue::Text(Cow::Borrowed(server.patch_status.as_str())),
            FieldKey::LastPatchDate => FieldValue::Text(match server.last_patch_date {
                Some(ts) => Cow::Owned(ts.to_rfc3339()),
                None => Cow::Borrowed(""),
            }),
            FieldKey::CpuLoadTrend => FieldValue::Text(Cow::Owned(
                server
                    .cpu_load_trend
                    .iter()
                    .map(|sample| sample.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
            FieldKey::AlarmCount => FieldValue::Text(Cow::Owned(server.alarm_count.to_string())),
            FieldKey::CreatedAt => FieldValue::Text(Cow::Owned(server.created_at.to_rfc3339())),
            FieldKey::UpdatedAt => FieldValue::Text(Cow::Owned(server.updated_at.to_rfc3339())),
            FieldKey::UpdatedBy => FieldValue::Text(Cow::Borrowed(&server.updated_by)),
        }
    }

    /// Numeric reading of this field, for opt-in numeric-aware sorting.
    /// `None` for non-numeric columns.
    pub fn numeric_value(&self, server: &Server) -> Option<u64> {
        match self {
            FieldKey::Cores => Some(u64::from(server.cores)),
            FieldKey::RamGb => Some(u64::from(server.ram_gb)),
            FieldKey::StorageGb => Some(u64::from(server.storage_gb)),
            FieldKey::AlarmCount => Some(u64::from(server.alarm_count)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FieldKey::ALL
            .iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// A field value extracted for matching or display.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Scalar field rendered as text.
    Text(Cow<'a, str>),
    /// Set-valued field (tags); matching tests each element.
    List(&'a [String]),
}

impl<'a> FieldValue<'a> {
    /// Case-insensitive substring test. `needle_lower` must already be
    /// lowercased by the caller (hoisted out of the per-record loop).
    pub fn contains_ignore_case(&self, needle_lower: &str) -> bool {
        match self {
            FieldValue::Text(text) => text.to_lowercase().contains(needle_lower),
            FieldValue::List(items) => items
                .iter()
                .any(|item| item.to_lowercase().contains(needle_lower)),
        }
    }

    /// Collapse to a single text value; the tag set joins with `", "`.
    pub fn into_text(self) -> Cow<'a, str> {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::List(items) => Cow::Owned(items.join(", ")),
        }
    }
}
