//! # Siphon
//!
//! Keeps analytic warehouse tables in sync with an object-storage bucket.
//!
//! Siphon never keeps tracking state of its own: the warehouse's load
//! history is the single source of truth for which objects have already
//! been ingested. One worker per configured (table, bucket, prefix) triple
//! bootstraps the table if needed, then repeatedly diffs the bucket listing
//! against the load history and issues a bulk load per missing object.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Supervisor                          │
//! │   one task per table, shared cancellation, join on exit  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [per table]
//! ┌─────────────────────────────────────────────────────────┐
//! │                   TableSyncWorker                        │
//! │   Bootstrapping → Reconciling (loop) → Draining → Stopped│
//! └─────────────────────────────────────────────────────────┘
//!        │ once                      │ every pass
//!        ▼                           ▼
//! ┌──────────────────┐   ┌─────────────────────────────────┐
//! │ SchemaCatalog    │   │ LoadHistory ──┐                 │
//! │ + CreateTable DDL│   │ ObjectStore ──┼─▶ pending keys  │
//! └──────────────────┘   │ CopyFrom   ◀──┘  (one COPY each)│
//!                        └─────────────────────────────────┘
//! ```

pub mod alert;
pub mod config;
pub mod schema;
pub mod sql;
pub mod store;
pub mod sync;
pub mod warehouse;

// Re-export the types most callers need at the crate root
pub use config::{Settings, SettingsError, TableSpec};
pub use schema::{SchemaCatalog, SchemaError, TableDef};
pub use sql::{CopyFrom, CreateTable, Credentials, LoadOptions};
pub use sync::{Supervisor, SyncError, TableSyncWorker, WorkerContext};
