//! `scanstock-client`
//!
//! **Responsibility:** line-oriented driver for the synchronization core.
//!
//! Stands in for the presentation layer: reads scan and adjustment commands,
//! feeds them to a [`ScanController`](scanstock_sync::ScanController) and
//! prints the resulting view-state as one JSON object per line.

pub mod command;
pub mod config;
pub mod repl;

pub use command::{Command, CommandError};
pub use config::ClientConfig;
pub use repl::run;
