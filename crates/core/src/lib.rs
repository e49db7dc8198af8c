//! `scanstock-core`: domain building blocks shared by the store, the gateways
//! and the synchronization core.
//!
//! This crate contains **pure domain** types (no IO, no async).

pub mod amount;
pub mod cartridge;
pub mod doc;
pub mod entity;
pub mod error;
pub mod id;

pub use amount::Amount;
pub use cartridge::{AdjustKind, Cartridge, CartridgeLog};
pub use doc::{Doc, DocPatch};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CartridgeId, DocId};
