//! `scanstock-sync`: scan-driven synchronization core.
//!
//! **Responsibility:** keep a remote lookup aligned with the store's current
//! scan value, fold the outcome of stock adjustments into the same view, and
//! decide when the user should see an error notification.
//!
//! The crate is split in two layers:
//!
//! - [`CartridgeSession`]: a synchronous state machine with no IO. It issues
//!   sequence-tagged [`Invocation`]s and accepts their resolutions; stale
//!   resolutions are discarded on arrival (last-issued-wins).
//! - [`ScanController`]: wires a [`Store`](scanstock_store::Store), a session
//!   and a [`CartridgeGateway`](scanstock_gateway::CartridgeGateway) on a tokio
//!   runtime. Gateway calls run as tasks; their completions are applied back
//!   to the session one at a time.
//!
//! ```text
//! Store::dispatch ─► listener ─► session.on_store_change ─► Invocation ─► gateway task
//!                                                                            │
//! view_state() ◄─ session.resolve_* ◄─ ScanController::pump ◄─ completion ◄──┘
//! ```

pub mod buffer;
pub mod controller;
pub mod error;
pub mod session;
pub mod slot;
pub mod view;

pub use buffer::AmountBuffer;
pub use controller::ScanController;
pub use error::SyncError;
pub use session::{CartridgeSession, SessionPhase, TriggerPolicy};
pub use slot::{AsyncResult, Invocation, Slot};
pub use view::{ErrorNotice, ViewState, notification_message};
