use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware platform a server record describes.
///
/// Closed set: unrecognized values are rejected at the persistence
/// boundary, never inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HardwareType {
    /// Hypervisor-hosted guest.
    Virtualized,
    /// Physical machine.
    BareMetal,
}

impl HardwareType {
    /// Canonical display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HardwareType::Virtualized => "Virtualized",
            HardwareType::BareMetal => "Bare-Metal",
        }
    }
}

impl fmt::Display for HardwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HardwareType {
    type Err = String;

    /// Parse a hardware type string.
    /// Handles formats found in legacy inventories (case-insensitive,
    /// with/without hyphens, hypervisor brand names).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', " ");
        match normalized.as_str() {
            "VIRTUALIZED" | "VMWARE" | "VM" => Ok(HardwareType::Virtualized),
            "BARE METAL" | "PHYSICAL" => Ok(HardwareType::BareMetal),
            _ => Err(format!("Unknown hardware type: {}", s)),
        }
    }
}

/// Environment classification of a server (the "server type" column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Test,
    Development,
    Staging,
    Qa,
}

impl Environment {
    /// Canonical display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "Production",
            Environment::Test => "Test",
            Environment::Development => "Development",
            Environment::Staging => "Staging",
            Environment::Qa => "QA",
        }
    }

    /// All environments in display order.
    pub const ALL: [Environment; 5] = [
        Environment::Production,
        Environment::Test,
        Environment::Development,
        Environment::Staging,
        Environment::Qa,
    ];
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PRODUCTION" | "PROD" => Ok(Environment::Production),
            "TEST" => Ok(Environment::Test),
            "DEVELOPMENT" | "DEV" => Ok(Environment::Development),
            "STAGING" => Ok(Environment::Staging),
            "QA" => Ok(Environment::Qa),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

/// Whether a server is covered by the backup regime.
///
/// Kept as a yes/no enum rather than a bool because the column is
/// displayed, filtered, and exported as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupStatus {
    Yes,
    No,
}

impl BackupStatus {
    /// Canonical display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupStatus::Yes => "Yes",
            BackupStatus::No => "No",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, BackupStatus::Yes)
    }
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackupStatus {
    type Err = String;

    /// Parse a backup flag. Accepts the German values carried by legacy
    /// inventory exports alongside the canonical ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "YES" | "JA" | "TRUE" => Ok(BackupStatus::Yes),
            "NO" | "NEIN" | "FALSE" => Ok(BackupStatus::No),
            _ => Err(format!("Unknown backup status: {}", s)),
        }
    }
}

/// Patch currency of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchStatus {
    Current,
    Outdated,
    Critical,
}

impl PatchStatus {
    /// Canonical display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchStatus::Current => "Current",
            PatchStatus::Outdated => "Outdated",
            PatchStatus::Critical => "Critical",
        }
    }
}

impl fmt::Display for PatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PatchStatus {
    type Err = String;

    /// Parse a patch status. Accepts the German values carried by legacy
    /// inventory exports alongside the canonical ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CURRENT" | "AKTUELL" => Ok(PatchStatus::Current),
            "OUTDATED" | "VERALTET" => Ok(PatchStatus::Outdated),
            "CRITICAL" | "KRITISCH" => Ok(PatchStatus::Critical),
            _ => Err(format!("Unknown patch status: {}", s)),
        }
    }
}
