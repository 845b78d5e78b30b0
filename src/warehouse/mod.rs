//! Warehouse access.
//!
//! The warehouse is consumed through the narrow [`Warehouse`] trait:
//! statements in, text row sets out. Siphon only ever issues four kinds of
//! statement (column introspection, load-history query, CREATE TABLE, COPY),
//! all of which return textual columns, so rows are `Vec<String>`.
//!
//! [`PgWarehouse`] is the production implementation over the Postgres wire
//! protocol. [`history::LoadHistory`] layers the load-history queries on top
//! of any `Warehouse`.

mod history;
mod postgres;

pub use history::LoadHistory;
pub use postgres::PgWarehouse;

use async_trait::async_trait;
use thiserror::Error;

/// Result type for warehouse operations.
pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// Errors that can occur talking to the warehouse.
///
/// All three variants are fatal to the worker that hit them, with one
/// exception: COPY execution failures inside a reconcile pass are reported
/// and retried on the next pass (the failed key never enters load history).
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Could not establish a connection.
    #[error("warehouse connection failed: {0}")]
    Connect(String),

    /// A row-returning statement failed.
    #[error("warehouse query failed: {0}")]
    Query(String),

    /// A side-effecting statement (DDL or COPY) failed.
    #[error("warehouse statement failed: {0}")]
    Exec(String),
}

/// Narrow statement-execution interface over the warehouse.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Run a row-returning statement; every column is read back as text.
    async fn query(&self, sql: &str) -> WarehouseResult<Vec<Vec<String>>>;

    /// Run a side-effecting statement (DDL or COPY).
    async fn execute(&self, sql: &str) -> WarehouseResult<()>;
}
