//! Inventory analytics.
//!
//! Pure summary functions the dashboard's charts consume: stat tiles,
//! distribution doughnuts, the growth curve, and the resource table.
//! Everything is computed from the record slice handed in (typically
//! the filtered view), never from stored aggregates.

use rackview_model::{BackupStatus, FieldKey, Server};
use std::collections::BTreeMap;

/// Headline numbers for the stat tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub total_servers: usize,
    /// Core-weighted average of each server's latest CPU-load sample,
    /// as a percentage. Servers without samples contribute no load.
    pub overall_cpu_usage: f32,
    pub backup_enabled: usize,
    pub backup_disabled: usize,
    pub total_alarms: u64,
}

/// Compute the headline summary over a record set.
pub fn summarize(records: &[Server]) -> InventorySummary {
    let total_cores: u64 = records.iter().map(|server| u64::from(server.cores)).sum();
    let used_cores: f64 = records
        .iter()
        .filter_map(|server| {
            server
                .latest_load()
                .map(|load| f64::from(load) / 100.0 * f64::from(server.cores))
        })
        .sum();
    let overall_cpu_usage = if total_cores > 0 {
        (used_cores / total_cores as f64 * 100.0) as f32
    } else {
        0.0
    };

    InventorySummary {
        total_servers: records.len(),
        overall_cpu_usage,
        backup_enabled: records
            .iter()
            .filter(|server| server.backup == BackupStatus::Yes)
            .count(),
        backup_disabled: records
            .iter()
            .filter(|server| server.backup == BackupStatus::No)
            .count(),
        total_alarms: records
            .iter()
            .map(|server| u64::from(server.alarm_count))
            .sum(),
    }
}

/// Count records per distinct value of a field (e.g. operating system
/// or environment), most frequent first, name as tie-break.
pub fn distribution_by(records: &[Server], key: FieldKey) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for server in records {
        let value = key.value(server).into_text().into_owned();
        *counts.entry(value).or_default() += 1;
    }
    let mut distribution: Vec<(String, usize)> = counts.into_iter().collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    distribution
}

/// Cumulative inventory size per creation month (`YYYY-MM`), oldest
/// first. Feeds the growth chart.
pub fn growth_by_month(records: &[Server]) -> Vec<(String, usize)> {
    let mut added: BTreeMap<String, usize> = BTreeMap::new();
    for server in records {
        let month = server.created_at.format("%Y-%m").to_string();
        *added.entry(month).or_default() += 1;
    }
    let mut cumulative = 0;
    added
        .into_iter()
        .map(|(month, count)| {
            cumulative += count;
            (month, cumulative)
        })
        .collect()
}

/// Per-server resource triple for the resource-usage chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUsage {
    pub server_name: String,
    pub cores: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
}

pub fn resource_usage(records: &[Server]) -> Vec<ResourceUsage> {
    records
        .iter()
        .map(|server| ResourceUsage {
            server_name: server.server_name.clone(),
            cores: server.cores,
            ram_gb: server.ram_gb,
            storage_gb: server.storage_gb,
        })
        .collect()
}

/// Records with no maintenance window configured, in input order.
pub fn missing_maintenance_window<'a>(records: &'a [Server]) -> Vec<&'a Server> {
    records
        .iter()
        .filter(|server| server.maintenance_window.trim().is_empty())
        .collect()
}
