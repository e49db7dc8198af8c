//! Sequence-tagged result slots.

use scanstock_gateway::GatewayError;

/// `{data, loading, error}` of the latest invocation of one operation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsyncResult<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<GatewayError>,
}

impl<T> Default for AsyncResult<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// An issued remote call: the variables to send and the sequence number its
/// resolution must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<V> {
    pub seq: u64,
    pub vars: V,
}

/// Single tracked in-flight/last-resolved result for one operation kind.
///
/// Sequence numbers come from the owner and must increase across calls to
/// [`Slot::issue`]. Only the latest issued sequence number can resolve the
/// slot; every other resolution is stale and ignored.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    name: &'static str,
    result: AsyncResult<T>,
    issued: Option<u64>,
    resolved: Option<u64>,
}

impl<T> Slot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            result: AsyncResult::default(),
            issued: None,
            resolved: None,
        }
    }

    /// Start tracking invocation `seq`. Previous data stays visible until it
    /// resolves.
    pub fn issue(&mut self, seq: u64) {
        debug_assert!(self.issued.is_none_or(|prev| prev < seq));
        self.issued = Some(seq);
        self.result.loading = true;
    }

    /// Apply the outcome of invocation `seq`.
    ///
    /// Returns `false` (and changes nothing) if `seq` is not the latest issued
    /// invocation or has already resolved.
    pub fn resolve(&mut self, seq: u64, outcome: Result<Option<T>, GatewayError>) -> bool {
        if self.issued != Some(seq) || self.resolved == Some(seq) {
            tracing::debug!(
                slot = self.name,
                seq,
                latest = ?self.issued,
                "discarding stale resolution"
            );
            return false;
        }

        match outcome {
            Ok(data) => {
                self.result.data = data;
                self.result.error = None;
            }
            Err(err) => {
                tracing::warn!(slot = self.name, seq, error = %err, "remote call failed");
                self.result.data = None;
                self.result.error = Some(err);
            }
        }
        self.result.loading = false;
        self.resolved = Some(seq);
        true
    }

    pub fn clear_error(&mut self) {
        self.result.error = None;
    }

    pub fn data(&self) -> Option<&T> {
        self.result.data.as_ref()
    }

    pub fn error(&self) -> Option<&GatewayError> {
        self.result.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.result.loading
    }

    /// Sequence number of the invocation whose outcome is currently held.
    pub fn resolved(&self) -> Option<u64> {
        self.resolved
    }
}
