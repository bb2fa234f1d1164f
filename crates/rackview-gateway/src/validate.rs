//! Draft and patch validation.
//!
//! Format checks live at the persistence boundary, not inside the
//! store: a record that deserialized into the typed model is already
//! enum-clean, so what remains is required fields and string shapes.

use crate::error::{GatewayError, Result};
use rackview_model::{ServerDraft, ServerPatch};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Validate a creation draft.
pub fn validate_draft(draft: &ServerDraft) -> Result<()> {
    if draft.server_name.trim().is_empty() {
        return Err(GatewayError::validation(
            "serverName",
            "a server name is required",
        ));
    }
    validate_ip(&draft.ip_address)
}

/// Validate the fields a patch actually sets.
pub fn validate_patch(patch: &ServerPatch) -> Result<()> {
    if let Some(name) = &patch.server_name {
        if name.trim().is_empty() {
            return Err(GatewayError::validation(
                "serverName",
                "a server name is required",
            ));
        }
    }
    if let Some(ip) = &patch.ip_address {
        validate_ip(ip)?;
    }
    Ok(())
}

fn validate_ip(ip: &str) -> Result<()> {
    if Ipv4Addr::from_str(ip).is_err() {
        return Err(GatewayError::validation(
            "ipAddress",
            format!("'{}' is not a dotted-quad IPv4 address", ip),
        ));
    }
    Ok(())
}
