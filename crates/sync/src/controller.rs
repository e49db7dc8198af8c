//! Runtime wiring of store, session and gateway.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use scanstock_core::{AdjustKind, Cartridge};
use scanstock_gateway::{CartridgeGateway, GatewayError, LookupVars, UpdateAmountVars};
use scanstock_store::{Action, Store, Subscription};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::SyncError;
use crate::session::{CartridgeSession, TriggerPolicy};
use crate::slot::Invocation;
use crate::view::{ViewState, notification_message};

/// Outcome of a gateway task, tagged with the invocation it answers.
#[derive(Debug)]
enum Completion {
    Lookup {
        seq: u64,
        outcome: Result<Option<Cartridge>, GatewayError>,
    },
    Adjustment {
        seq: u64,
        outcome: Result<Cartridge, GatewayError>,
    },
}

fn lock(session: &Mutex<CartridgeSession>) -> MutexGuard<'_, CartridgeSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spawns gateway calls and reports their completions.
struct Launcher<G> {
    gateway: Arc<G>,
    runtime: Handle,
    completions: mpsc::UnboundedSender<Completion>,
    in_flight: Arc<AtomicUsize>,
}

impl<G> Clone for Launcher<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            runtime: self.runtime.clone(),
            completions: self.completions.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<G> Launcher<G>
where
    G: CartridgeGateway + 'static,
{
    fn lookup(&self, endpoint: String, invocation: Invocation<LookupVars>) {
        let gateway = self.gateway.clone();
        let Invocation { seq, vars } = invocation;
        self.track(
            async move { gateway.find_by_name(&endpoint, &vars).await },
            move |outcome| Completion::Lookup { seq, outcome },
        );
    }

    fn adjustment(&self, endpoint: String, invocation: Invocation<UpdateAmountVars>) {
        let gateway = self.gateway.clone();
        let Invocation { seq, vars } = invocation;
        self.track(
            async move { gateway.update_amount(&endpoint, &vars).await },
            move |outcome| Completion::Adjustment { seq, outcome },
        );
    }

    /// Spawn `call` and report exactly one completion for it, even if the
    /// call panics.
    fn track<T, F, C>(&self, call: F, complete: C)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, GatewayError>> + Send + 'static,
        C: FnOnce(Result<T, GatewayError>) -> Completion + Send + 'static,
    {
        let completions = self.completions.clone();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let call = self.runtime.spawn(call);
        self.runtime.spawn(async move {
            let outcome = call.await.unwrap_or_else(|err| {
                tracing::error!(error = %err, "gateway task failed");
                Err(GatewayError::Aborted(err.to_string()))
            });
            let _ = completions.send(complete(outcome));
        });
    }
}

/// Cartridge screen controller.
///
/// Subscribes a [`CartridgeSession`] to the store: every store notification
/// goes through the session's trigger policy and may spawn a lookup. Gateway
/// tasks run on the tokio runtime the controller was created in; their
/// results are applied when the owner calls [`ScanController::pump`] or
/// [`ScanController::settle`], so the session only ever changes on the
/// caller's side of the channel or inside a store dispatch.
pub struct ScanController<G> {
    store: Store,
    session: Arc<Mutex<CartridgeSession>>,
    launcher: Launcher<G>,
    completions: mpsc::UnboundedReceiver<Completion>,
    _subscription: Subscription,
}

impl<G> ScanController<G>
where
    G: CartridgeGateway + 'static,
{
    /// Attach to `store`. Must be called from within a tokio runtime.
    pub fn new(store: Store, gateway: Arc<G>, policy: TriggerPolicy) -> Result<Self, SyncError> {
        let runtime = Handle::try_current().map_err(|e| SyncError::NoRuntime(e.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let launcher = Launcher {
            gateway,
            runtime,
            completions: tx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        };

        let mut session = CartridgeSession::new(policy);
        session.prime(&store.snapshot());
        let session = Arc::new(Mutex::new(session));

        let subscription = {
            let weak_store = store.downgrade();
            let session = session.clone();
            let launcher = launcher.clone();
            store.subscribe(move || {
                let Some(store) = weak_store.upgrade() else {
                    return;
                };
                let snapshot = store.snapshot();
                let invocation = lock(&session).on_store_change(&snapshot);
                if let Some(invocation) = invocation {
                    launcher.lookup(snapshot.settings.cartridge_server_url, invocation);
                }
            })
        };

        tracing::info!(?policy, "scan controller attached");

        Ok(Self {
            store,
            session,
            launcher,
            completions: rx,
            _subscription: subscription,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn view_state(&self) -> ViewState {
        lock(&self.session).view_state()
    }

    /// Record a completed scan. The lookup follows from the store notification.
    pub fn trigger_scan(&self, code: impl Into<String>) {
        let code = code.into();
        tracing::info!(%code, "cartridge scanned");
        self.store.dispatch(Action::SetCartridgeScan(Some(code)));
    }

    /// Re-run the lookup for the current scan value.
    pub fn refresh(&self) {
        let snapshot = self.store.snapshot();
        let invocation = lock(&self.session).lookup(snapshot.scan.cartridge_scan);
        self.launcher.lookup(snapshot.settings.cartridge_server_url, invocation);
    }

    pub fn set_amount(&self, text: impl Into<String>) {
        lock(&self.session).set_amount(text);
    }

    /// Adjust the displayed cartridge.
    ///
    /// `Err(SyncError::NotApplicable)` when nothing is resolved; no call is made
    /// in that case.
    pub fn submit_adjustment(&self, amount: &str, kind: AdjustKind) -> Result<(), SyncError> {
        let invocation = lock(&self.session).submit_adjustment(amount, kind)?;
        let endpoint = self.store.snapshot().settings.cartridge_server_url;
        self.launcher.adjustment(endpoint, invocation);
        Ok(())
    }

    /// [`ScanController::submit_adjustment`] with the buffered amount.
    pub fn submit_buffered(&self, kind: AdjustKind) -> Result<(), SyncError> {
        let invocation = lock(&self.session).submit_buffered(kind)?;
        let endpoint = self.store.snapshot().settings.cartridge_server_url;
        self.launcher.adjustment(endpoint, invocation);
        Ok(())
    }

    pub fn dismiss_error(&self) {
        lock(&self.session).dismiss_error();
    }

    /// Text of the visible notification, if any.
    pub fn notification_message(&self) -> Option<String> {
        if !lock(&self.session).notification_visible() {
            return None;
        }
        Some(notification_message(
            &self.store.snapshot().settings.cartridge_server_url,
        ))
    }

    pub fn lookup_count(&self) -> u64 {
        lock(&self.session).lookups_issued()
    }

    /// Number of gateway calls whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.launcher.in_flight.load(Ordering::SeqCst)
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` when nothing is in flight, otherwise whether the
    /// completion was current (`false` for a discarded stale result).
    pub async fn pump(&mut self) -> Option<bool> {
        if self.in_flight() == 0 {
            return None;
        }
        let completion = self.completions.recv().await?;
        self.launcher.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut session = lock(&self.session);
        let applied = match completion {
            Completion::Lookup { seq, outcome } => session.resolve_lookup(seq, outcome),
            Completion::Adjustment { seq, outcome } => session.resolve_adjustment(seq, outcome),
        };
        Some(applied)
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.pump().await.is_some() {}
    }
}
