//! Typed actions accepted by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every transition the store knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// Replace the last scanned cartridge code (`None` clears it).
    SetCartridgeScan(Option<String>),
    /// Change the cartridge server endpoint.
    SetCartridgeServerUrl(String),
    /// Change the documents server endpoint.
    SetDocsServerUrl(String),
    /// Set or clear the date of the running inventory.
    SetInventoryDate(Option<DateTime<Utc>>),
}

impl Action {
    /// Stable name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetCartridgeScan(_) => "scan/set_cartridge_scan",
            Action::SetCartridgeServerUrl(_) => "settings/set_cartridge_server_url",
            Action::SetDocsServerUrl(_) => "settings/set_docs_server_url",
            Action::SetInventoryDate(_) => "inventory/set_inventory_date",
        }
    }
}
