//! Strongly-typed identifiers for remote records.
//!
//! The remote services key their records by plain integers; the newtypes keep a
//! cartridge id from being passed where a document id is expected.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a cartridge record on the cartridge server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CartridgeId(i64);

/// Identifier of a document on the documents server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocId(i64);

/// GraphQL `ID` scalars arrive as strings, REST payloads as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = i64::from_str(s.trim())
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                match RawId::deserialize(deserializer)? {
                    RawId::Int(raw) => Ok(Self(raw)),
                    RawId::Text(text) => text.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

impl_int_newtype!(CartridgeId, "CartridgeId");
impl_int_newtype!(DocId, "DocId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_integer() {
        let id: CartridgeId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_id() {
        let err = "abc".parse::<DocId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.starts_with("DocId")));
    }

    #[test]
    fn deserializes_graphql_string_ids() {
        let id: CartridgeId = serde_json::from_str("\"15\"").unwrap();
        assert_eq!(id, CartridgeId::new(15));
        let id: CartridgeId = serde_json::from_str("15").unwrap();
        assert_eq!(id, CartridgeId::new(15));
        assert!(serde_json::from_str::<CartridgeId>("\"x1\"").is_err());
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&CartridgeId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
