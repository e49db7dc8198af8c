//! In-memory cartridge gateway for tests, demos and offline development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use scanstock_core::{Cartridge, CartridgeLog};

use crate::cartridge::{CartridgeGateway, LookupVars, UpdateAmountVars};
use crate::error::GatewayError;

#[derive(Debug, Default)]
struct Catalog {
    by_name: HashMap<String, Cartridge>,
    fail_next: Vec<GatewayError>,
    latency: HashMap<String, Duration>,
}

/// Cartridge gateway backed by a `HashMap`, keyed by cartridge name.
///
/// - No IO
/// - Failures can be queued with [`InMemoryGateway::fail_next`]
/// - Per-name latency can be set to make calls resolve out of order
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    catalog: Mutex<Catalog>,
    lookups: AtomicUsize,
    updates: AtomicUsize,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cartridges(cartridges: impl IntoIterator<Item = Cartridge>) -> Self {
        let gateway = Self::new();
        for cartridge in cartridges {
            gateway.insert(cartridge);
        }
        gateway
    }

    fn catalog(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, cartridge: Cartridge) {
        self.catalog().by_name.insert(cartridge.name.clone(), cartridge);
    }

    pub fn get(&self, name: &str) -> Option<Cartridge> {
        self.catalog().by_name.get(name).cloned()
    }

    /// Make the next call (lookup or update) fail with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        self.catalog().fail_next.push(error);
    }

    /// Delay every lookup of `name` by `delay`.
    pub fn set_latency(&self, name: impl Into<String>, delay: Duration) {
        self.catalog().latency.insert(name.into(), delay);
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> Option<GatewayError> {
        let mut catalog = self.catalog();
        if catalog.fail_next.is_empty() {
            None
        } else {
            Some(catalog.fail_next.remove(0))
        }
    }
}

#[async_trait]
impl CartridgeGateway for InMemoryGateway {
    async fn find_by_name(
        &self,
        _endpoint: &str,
        vars: &LookupVars,
    ) -> Result<Option<Cartridge>, GatewayError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let delay = vars
            .name
            .as_ref()
            .and_then(|name| self.catalog().latency.get(name).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(vars.name.as_deref().and_then(|name| self.get(name)))
    }

    async fn update_amount(
        &self,
        _endpoint: &str,
        vars: &UpdateAmountVars,
    ) -> Result<Cartridge, GatewayError> {
        self.updates.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let mut catalog = self.catalog();
        let cartridge = catalog
            .by_name
            .values_mut()
            .find(|c| c.id == vars.id)
            .ok_or_else(|| GatewayError::Remote(vec![format!("cartridge {} not found", vars.id)]))?;

        let new_amount = cartridge.amount + vars.kind.signed(vars.amount);
        if new_amount < 0 {
            return Err(GatewayError::Remote(vec!["amount cannot go negative".to_string()]));
        }
        cartridge.amount = new_amount;
        cartridge.logs.push(CartridgeLog {
            kind: vars.kind,
            amount: vars.amount,
            description: None,
            created_at: chrono::Utc::now(),
        });
        Ok(cartridge.clone())
    }
}
