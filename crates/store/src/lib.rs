//! `scanstock-store`: process-wide observable state container.
//!
//! The store is the single source of truth for the scan, settings and
//! inventory slices. It is mutated only through typed [`Action`]s passed to
//! [`Store::dispatch`], which runs the pure [`reduce`] function and then
//! synchronously notifies every subscriber in registration order.
//!
//! ```text
//! dispatch(action) → reduce(state, action) → commit → notify listeners (no payload)
//!                                                        └─ listeners call snapshot()
//! ```

pub mod action;
pub mod state;
pub mod store;

pub use action::Action;
pub use state::{InventoryState, ScanState, SettingsState, State, reduce};
pub use store::{Store, Subscription, WeakStore};
