use thiserror::Error;

/// Failure of a single remote call.
///
/// Carried by value inside query/mutation results, so it is `Clone` and keeps
/// only rendered messages rather than the transport's error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {0}: {1}")]
    Status(u16, String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("remote error: {}", .0.join("; "))]
    Remote(Vec<String>),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    /// The task running the call ended without producing a result.
    #[error("call aborted: {0}")]
    Aborted(String),
}

impl GatewayError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Status(status.as_u16(), err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}
