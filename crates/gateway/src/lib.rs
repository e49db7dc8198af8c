//! `scanstock-gateway`: remote query/mutation boundary.
//!
//! **Responsibility:** execute named queries and mutations against the remote
//! services and report `{data | error}` for each call.
//!
//! - [`CartridgeGateway`]: `findByName` / `updateAmount` (GraphQL over HTTP)
//! - [`DocsGateway`]: `total/{id}` read and partial update (REST)
//!
//! The base endpoints are supplied per call; they live in the settings slice
//! of the store and may change while the client runs. Timeouts belong here,
//! on the HTTP client, not in the synchronization core.

pub mod cartridge;
pub mod docs;
pub mod error;
pub mod graphql;
pub mod memory;

pub use cartridge::{CartridgeGateway, LookupVars, UpdateAmountVars};
pub use docs::{DocsGateway, HttpDocsGateway};
pub use error::GatewayError;
pub use graphql::GraphqlGateway;
pub use memory::InMemoryGateway;
