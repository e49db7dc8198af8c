//! Cartridge screen session: lookup slot, adjustment slot, amount buffer and
//! error notice, driven by store notifications.

use core::str::FromStr;

use scanstock_core::{AdjustKind, Amount, Cartridge, DomainError, Entity};
use scanstock_gateway::{GatewayError, LookupVars, UpdateAmountVars};
use scanstock_store::State;
use serde::{Deserialize, Serialize};

use crate::buffer::AmountBuffer;
use crate::error::SyncError;
use crate::slot::{Invocation, Slot};
use crate::view::{ErrorNotice, ViewState};

/// When a store notification issues a lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerPolicy {
    /// Every notification issues a lookup with the current scan value, changed
    /// or not, including notifications caused by unrelated slices.
    #[default]
    Level,
    /// Only a notification whose scan value differs from the previously
    /// observed one issues a lookup.
    Edge,
}

impl FromStr for TriggerPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "level" => Ok(TriggerPolicy::Level),
            "edge" => Ok(TriggerPolicy::Edge),
            other => Err(DomainError::unknown("trigger policy", other)),
        }
    }
}

/// Coarse lifecycle of one lookup + adjustment session.
///
/// Errors never lead to a terminal phase; the next trigger starts over at
/// `Querying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Querying,
    Found,
    NotFound,
    Mutating,
}

/// Synchronous state machine behind the cartridge screen.
///
/// Produces [`Invocation`]s for the caller to execute and accepts their
/// outcomes through `resolve_*`. Sequence numbers are shared by both slots so
/// an adjustment can be ordered against the lookup result it was based on.
#[derive(Debug, Clone)]
pub struct CartridgeSession {
    policy: TriggerPolicy,
    next_seq: u64,
    observed_scan: Option<String>,
    lookup: Slot<Cartridge>,
    adjustment: Slot<Cartridge>,
    /// Latest successful adjustment result and its sequence number. Outlives
    /// later failed adjustments, which leave the slot's data empty.
    applied: Option<(u64, Cartridge)>,
    amount: AmountBuffer,
    notice: ErrorNotice,
    lookups_issued: u64,
}

impl Default for CartridgeSession {
    fn default() -> Self {
        Self::new(TriggerPolicy::default())
    }
}

impl CartridgeSession {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            policy,
            next_seq: 1,
            observed_scan: None,
            lookup: Slot::new("lookup"),
            adjustment: Slot::new("adjustment"),
            applied: None,
            amount: AmountBuffer::new(),
            notice: ErrorNotice::default(),
            lookups_issued: 0,
        }
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    /// Record the scan value present when the session attaches to a store,
    /// without issuing anything.
    pub fn prime(&mut self, state: &State) {
        self.observed_scan = state.scan.cartridge_scan.clone();
    }

    /// React to a store notification.
    pub fn on_store_change(&mut self, state: &State) -> Option<Invocation<LookupVars>> {
        let scan = state.scan.cartridge_scan.clone();
        let changed = scan != self.observed_scan;
        self.observed_scan = scan.clone();

        match self.policy {
            TriggerPolicy::Level => Some(self.lookup(scan)),
            TriggerPolicy::Edge if changed => Some(self.lookup(scan)),
            TriggerPolicy::Edge => {
                tracing::trace!("scan unchanged; lookup skipped");
                None
            }
        }
    }

    /// Issue a lookup for `key`, superseding any lookup still in flight.
    pub fn lookup(&mut self, key: Option<String>) -> Invocation<LookupVars> {
        let seq = self.next_seq();
        self.lookup.issue(seq);
        self.lookups_issued += 1;
        tracing::debug!(seq, key = ?key, "lookup issued");
        self.refresh_notice();
        Invocation {
            seq,
            vars: LookupVars { name: key },
        }
    }

    /// Re-run the lookup for the last observed scan value.
    pub fn refresh(&mut self) -> Invocation<LookupVars> {
        self.lookup(self.observed_scan.clone())
    }

    pub fn resolve_lookup(
        &mut self,
        seq: u64,
        outcome: Result<Option<Cartridge>, GatewayError>,
    ) -> bool {
        let succeeded = outcome.is_ok();
        if !self.lookup.resolve(seq, outcome) {
            return false;
        }
        if succeeded {
            self.adjustment.clear_error();
        }
        self.refresh_notice();
        true
    }

    pub fn set_amount(&mut self, text: impl Into<String>) {
        self.amount.set(text);
    }

    pub fn amount(&self) -> &str {
        self.amount.as_str()
    }

    /// Issue an adjustment of the resolved cartridge by `amount` in direction
    /// `kind`.
    ///
    /// Without a resolved cartridge nothing is issued and the session is left
    /// untouched ([`SyncError::NotApplicable`]). On success the amount buffer
    /// is cleared immediately, before the mutation resolves.
    pub fn submit_adjustment(
        &mut self,
        amount: &str,
        kind: AdjustKind,
    ) -> Result<Invocation<UpdateAmountVars>, SyncError> {
        let Some(target) = self.entity().map(|c| *c.id()) else {
            tracing::debug!("adjustment ignored: no cartridge resolved");
            return Err(SyncError::NotApplicable);
        };
        let amount: Amount = amount.parse().map_err(SyncError::InvalidAmount)?;

        let seq = self.next_seq();
        self.adjustment.issue(seq);
        self.amount.clear();
        tracing::debug!(seq, id = %target, %amount, %kind, "adjustment issued");
        self.refresh_notice();

        Ok(Invocation {
            seq,
            vars: UpdateAmountVars::new(target, amount, kind),
        })
    }

    /// Submit whatever is currently in the amount buffer.
    pub fn submit_buffered(
        &mut self,
        kind: AdjustKind,
    ) -> Result<Invocation<UpdateAmountVars>, SyncError> {
        let text = self.amount.as_str().to_owned();
        self.submit_adjustment(&text, kind)
    }

    pub fn resolve_adjustment(
        &mut self,
        seq: u64,
        outcome: Result<Cartridge, GatewayError>,
    ) -> bool {
        let updated = outcome.as_ref().ok().cloned();
        if !self.adjustment.resolve(seq, outcome.map(Some)) {
            return false;
        }
        if let Some(updated) = updated {
            self.lookup.clear_error();
            self.applied = Some((seq, updated));
        }
        self.refresh_notice();
        true
    }

    pub fn dismiss_error(&mut self) {
        self.notice.dismiss();
    }

    /// Cartridge to display: the lookup result, unless a newer successful
    /// adjustment of the same cartridge has resolved since.
    pub fn entity(&self) -> Option<&Cartridge> {
        let looked_up = self.lookup.data()?;
        match (&self.applied, self.lookup.resolved()) {
            (Some((adjusted_at, updated)), Some(looked_up_at))
                if *adjusted_at > looked_up_at && updated.same_entity(looked_up) =>
            {
                Some(updated)
            }
            _ => Some(looked_up),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.lookup.is_loading() || self.adjustment.is_loading()
    }

    pub fn has_error(&self) -> bool {
        self.lookup.error().is_some() || self.adjustment.error().is_some()
    }

    /// The outstanding error, lookup first.
    pub fn last_error(&self) -> Option<SyncError> {
        self.lookup
            .error()
            .cloned()
            .map(SyncError::LookupFailed)
            .or_else(|| self.adjustment.error().cloned().map(SyncError::MutationFailed))
    }

    pub fn notification_visible(&self) -> bool {
        self.notice.is_visible()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.adjustment.is_loading() {
            SessionPhase::Mutating
        } else if self.lookup.is_loading() {
            SessionPhase::Querying
        } else if self.lookup.resolved().is_none() {
            SessionPhase::Idle
        } else if self.entity().is_some() {
            SessionPhase::Found
        } else {
            SessionPhase::NotFound
        }
    }

    /// Number of lookups issued since the session was created.
    pub fn lookups_issued(&self) -> u64 {
        self.lookups_issued
    }

    pub fn scan(&self) -> Option<&str> {
        self.observed_scan.as_deref()
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            scan: self.observed_scan.clone(),
            entity: self.entity().cloned(),
            busy: self.is_busy(),
            has_error: self.has_error(),
            notification_visible: self.notice.is_visible(),
            amount: self.amount.as_str().to_owned(),
            phase: self.phase(),
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn refresh_notice(&mut self) {
        if self.notice.observe(self.has_error()) {
            tracing::info!(error = ?self.last_error(), "error notification raised");
        }
    }
}
