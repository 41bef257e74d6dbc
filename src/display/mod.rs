//! Display consumers
//!
//! Console price log, the snapshot backing the web page, and the currency
//! formatting they share.

mod console;
pub mod format;
mod snapshot;

pub use console::ConsoleReporter;
pub use snapshot::{Snapshot, SnapshotPublisher, SnapshotReceiver};
