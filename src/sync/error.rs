//! Worker-fatal error taxonomy.

use thiserror::Error;

use crate::schema::SchemaError;
use crate::store::ObjectStoreError;
use crate::warehouse::WarehouseError;

/// Result type for worker operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that terminate a worker.
///
/// Each of these is fatal to the affected worker only; the supervisor keeps
/// sibling tables running and reports the fault through the alert sink.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Catalog lookup failed during bootstrap.
    #[error("schema catalog: {0}")]
    Schema(#[from] SchemaError),

    /// Introspection, history query, or bootstrap DDL failed.
    #[error("warehouse: {0}")]
    Warehouse(#[from] WarehouseError),

    /// Bucket listing failed mid-pass.
    #[error("object store: {0}")]
    Store(#[from] ObjectStoreError),

    /// The table is missing and the config forbids creating it.
    #[error("table {table} does not exist and migrate is disabled")]
    MigrateDisabled { table: String },
}
