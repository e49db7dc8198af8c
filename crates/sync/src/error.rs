use scanstock_core::DomainError;
use scanstock_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// The cartridge lookup failed in transport or on the server.
    #[error("lookup failed: {0}")]
    LookupFailed(GatewayError),
    /// The stock adjustment failed in transport or on the server.
    #[error("mutation failed: {0}")]
    MutationFailed(GatewayError),
    /// An adjustment was requested while no cartridge is resolved.
    #[error("no cartridge to adjust")]
    NotApplicable,
    #[error("invalid amount: {0}")]
    InvalidAmount(DomainError),
    /// The controller was created outside a tokio runtime.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),
}

impl SyncError {
    /// Whether the user should be told about this error.
    ///
    /// Remote failures are; a rejected local input is reported by the input
    /// itself and `NotApplicable` is silently ignored.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, SyncError::LookupFailed(_) | SyncError::MutationFailed(_))
    }
}
