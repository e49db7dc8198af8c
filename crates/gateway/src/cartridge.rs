//! Cartridge operations.

use async_trait::async_trait;
use scanstock_core::{AdjustKind, Amount, Cartridge, CartridgeId};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Variables of the `findByName` query.
///
/// `name` is `None` when nothing has been scanned yet; the query is still sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupVars {
    pub name: Option<String>,
}

/// Variables of the `updateAmount` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAmountVars {
    pub id: CartridgeId,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: AdjustKind,
}

impl UpdateAmountVars {
    pub fn new(id: CartridgeId, amount: Amount, kind: AdjustKind) -> Self {
        Self {
            id,
            amount: amount.get(),
            kind,
        }
    }
}

/// Remote cartridge service.
///
/// `endpoint` is the configured cartridge server URL at the time the call is
/// issued.
#[async_trait]
pub trait CartridgeGateway: Send + Sync {
    /// Look a cartridge up by its scanned code. `Ok(None)` means not found.
    async fn find_by_name(
        &self,
        endpoint: &str,
        vars: &LookupVars,
    ) -> Result<Option<Cartridge>, GatewayError>;

    /// Adjust the stock of a cartridge and return the updated record.
    async fn update_amount(
        &self,
        endpoint: &str,
        vars: &UpdateAmountVars,
    ) -> Result<Cartridge, GatewayError>;
}

#[async_trait]
impl<G> CartridgeGateway for std::sync::Arc<G>
where
    G: CartridgeGateway + ?Sized,
{
    async fn find_by_name(
        &self,
        endpoint: &str,
        vars: &LookupVars,
    ) -> Result<Option<Cartridge>, GatewayError> {
        (**self).find_by_name(endpoint, vars).await
    }

    async fn update_amount(
        &self,
        endpoint: &str,
        vars: &UpdateAmountVars,
    ) -> Result<Cartridge, GatewayError> {
        (**self).update_amount(endpoint, vars).await
    }
}
