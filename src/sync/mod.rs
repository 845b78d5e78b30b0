//! Per-table reconciliation.
//!
//! One [`TableSyncWorker`] per configured triple, launched and joined by the
//! [`Supervisor`]. Workers share nothing mutable; cancellation travels
//! through a broadcast token and is only observed at pass boundaries, so an
//! in-flight bulk load always completes before shutdown.

mod error;
mod supervisor;
mod worker;

pub use error::{SyncError, SyncResult};
pub use supervisor::Supervisor;
pub use worker::{TableSyncWorker, WorkerContext};
