//! The observable container.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::action::Action;
use crate::state::{State, reduce};

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Inner {
    state: Mutex<State>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
    revision: AtomicU64,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        // Reducers never panic, so a poisoned lock still holds a committed state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared handle to the global state.
///
/// Cloning is cheap; all clones observe and mutate the same state.
///
/// ## Notification contract
///
/// - `dispatch` commits the reducer result before any listener runs.
/// - Listeners run synchronously, in registration order, once per dispatch.
/// - No lock is held while listeners run, so they may call [`Store::snapshot`]
///   or even [`Store::dispatch`] again.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for Store {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state())
            .field("revision", &self.revision())
            .field("listeners", &self.inner.listeners().len())
            .finish()
    }
}

impl Store {
    pub fn new(initial: State) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(initial),
                ..Inner::default()
            }),
        }
    }

    /// Current state tree (a clone; later dispatches do not affect it).
    pub fn snapshot(&self) -> State {
        self.inner.state().clone()
    }

    /// Number of dispatches applied so far.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    /// Apply `action` and notify every listener before returning.
    pub fn dispatch(&self, action: Action) {
        {
            let mut state = self.inner.state();
            *state = reduce(&state, &action);
        }
        let revision = self.inner.revision.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(action = action.kind(), revision, "store dispatch");

        let listeners: Vec<Listener> = self
            .inner
            .listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Register `listener`; it is called with no payload after every dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.next_listener.fetch_add(1, Ordering::SeqCst);
        self.inner.listeners().push((id, Arc::new(listener)));
        Subscription {
            store: Arc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners().len()
    }

    /// Non-owning handle, for listeners that need to read the store they are
    /// registered on without keeping it alive.
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning store handle.
#[derive(Clone, Default)]
pub struct WeakStore {
    inner: Weak<Inner>,
}

impl WeakStore {
    pub fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

/// Registration handle returned by [`Store::subscribe`].
///
/// Dropping the handle unsubscribes the listener; call [`Subscription::detach`]
/// to keep it registered for the lifetime of the store.
#[must_use = "dropping a Subscription unsubscribes the listener"]
#[derive(Debug)]
pub struct Subscription {
    store: Weak<Inner>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.remove();
    }

    pub fn detach(mut self) {
        self.id = None;
    }

    fn remove(&mut self) {
        let (Some(id), Some(inner)) = (self.id.take(), self.store.upgrade()) else {
            return;
        };
        inner.listeners().retain(|(listener_id, _)| *listener_id != id);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
