//! Cartridge records as served by the cartridge server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainError;
use crate::id::CartridgeId;

/// Direction of a stock adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustKind {
    /// Stock received.
    Add,
    /// Stock issued.
    Sub,
}

impl AdjustKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustKind::Add => "add",
            AdjustKind::Sub => "sub",
        }
    }

    /// Signed change in stock for a positive `amount`.
    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            AdjustKind::Add => amount,
            AdjustKind::Sub => -amount,
        }
    }
}

impl core::fmt::Display for AdjustKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AdjustKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(AdjustKind::Add),
            "sub" | "-" => Ok(AdjustKind::Sub),
            other => Err(DomainError::unknown("adjust kind", other)),
        }
    }
}

/// One entry of a cartridge's movement history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartridgeLog {
    #[serde(rename = "type")]
    pub kind: AdjustKind,
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CartridgeLog {
    /// Compact single-line rendering, e.g. `+3 refill 2024-03-01`.
    pub fn summary(&self) -> String {
        let sign = match self.kind {
            AdjustKind::Add => '+',
            AdjustKind::Sub => '-',
        };
        let mut line = format!("{sign}{}", self.amount);
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            line.push(' ');
            line.push_str(description);
        }
        line.push(' ');
        line.push_str(&self.created_at.format("%Y-%m-%d").to_string());
        line
    }
}

/// Cartridge read model (matches the `findByName` / `updateAmount` response shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cartridge {
    pub id: CartridgeId,
    pub name: String,
    pub amount: i64,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub logs: Vec<CartridgeLog>,
}

impl Entity for Cartridge {
    type Id = CartridgeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
