//! Per-table sync worker.
//!
//! Lifecycle: `Bootstrapping → Reconciling (loop) → Draining → Stopped`.
//!
//! Bootstrapping runs once and creates the table if the warehouse has never
//! seen it. Every reconcile pass rebuilds both key sets from scratch (the
//! loaded set from the warehouse's load history, the available set from a
//! fresh bucket listing) and issues one COPY per key in the difference.
//! Neither set is cached across passes.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{SyncError, SyncResult};
use crate::alert::AlertSink;
use crate::config::TableSpec;
use crate::schema::SchemaCatalog;
use crate::sql::{CopyFrom, CreateTable, Credentials, LoadOptions};
use crate::store::{self, ObjectStore};
use crate::warehouse::{LoadHistory, Warehouse, WarehouseError};

/// Immutable inputs shared by every worker.
#[derive(Clone)]
pub struct WorkerContext {
    /// Table definitions, fetched once at startup.
    pub catalog: Arc<SchemaCatalog>,

    /// Failure notification channel.
    pub alerts: Arc<dyn AlertSink>,

    /// Credential material inlined into COPY statements.
    pub credentials: Credentials,

    /// COPY options from config.
    pub options: LoadOptions,

    /// Sleep between reconcile passes.
    pub poll_interval: Duration,

    /// Whether a missing table may be created.
    pub migrate: bool,
}

/// Lifecycle phase, for log readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Bootstrapping,
    Reconciling,
    Draining,
    Stopped,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::Bootstrapping => "bootstrapping",
            Phase::Reconciling => "reconciling",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        }
    }
}

/// Owns one table's sync lifecycle.
///
/// Each worker holds its own warehouse and object-store handles; the only
/// shared state is the read-only [`WorkerContext`] and the cancellation
/// token passed to [`run`](Self::run).
pub struct TableSyncWorker {
    spec: TableSpec,
    warehouse: Box<dyn Warehouse>,
    store: Box<dyn ObjectStore>,
    ctx: WorkerContext,
}

impl TableSyncWorker {
    pub fn new(
        spec: TableSpec,
        warehouse: Box<dyn Warehouse>,
        store: Box<dyn ObjectStore>,
        ctx: WorkerContext,
    ) -> Self {
        Self {
            spec,
            warehouse,
            store,
            ctx,
        }
    }

    /// The table this worker owns.
    pub fn table(&self) -> &str {
        &self.spec.name
    }

    /// Run until cancellation or a fatal error.
    ///
    /// Cancellation is cooperative: the flag is checked before each pass and
    /// during the inter-pass sleep, never mid-statement.
    pub async fn run(self, cancel: CancellationToken) -> SyncResult<()> {
        info!(phase = Phase::Bootstrapping.as_str(), "worker starting");
        self.bootstrap().await?;

        info!(phase = Phase::Reconciling.as_str(), "entering reconcile loop");
        while !cancel.is_cancelled() {
            self.reconcile_pass().await?;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.ctx.poll_interval) => {}
            }
        }

        info!(phase = Phase::Draining.as_str(), "cancellation observed");
        info!(phase = Phase::Stopped.as_str(), "worker finished");
        Ok(())
    }

    /// Create the table unless the warehouse already knows it.
    async fn bootstrap(&self) -> SyncResult<()> {
        let history = LoadHistory::new(self.warehouse.as_ref());
        let columns = history.existing_columns(&self.spec.name).await?;

        if !columns.is_empty() {
            debug!(columns = columns.len(), "table exists, no migration needed");
            return Ok(());
        }

        if !self.ctx.migrate {
            return Err(SyncError::MigrateDisabled {
                table: self.spec.name.clone(),
            });
        }

        let def = self.ctx.catalog.table(&self.spec.name)?;
        let statement = CreateTable::from_def(def).to_sql();
        debug!(statement = %statement, "creating table");
        self.warehouse.execute(&statement).await?;
        info!("created table");
        Ok(())
    }

    /// One reconcile pass over a single snapshot pair of key sets.
    async fn reconcile_pass(&self) -> SyncResult<()> {
        let history = LoadHistory::new(self.warehouse.as_ref());
        let loaded = history.loaded_keys().await?;

        if loaded.is_empty() {
            // Nothing in load history yet: one COPY over the whole prefix
            // covers every object without enumerating the bucket.
            let statement = CopyFrom::new(
                self.spec.name.as_str(),
                self.spec.bucket.as_str(),
                self.spec.prefix.as_str(),
                &self.ctx.credentials,
                &self.ctx.options,
            )
            .to_sql();
            debug!(statement = %statement, "empty load history, copying whole prefix");
            if let Err(err) = self.warehouse.execute(&statement).await {
                self.report_load_failure(&self.spec.prefix, &err).await;
            }
            return Ok(());
        }

        let available =
            store::list_all(self.store.as_ref(), &self.spec.bucket, &self.spec.prefix).await?;
        let pending: Vec<&str> = available
            .iter()
            .map(String::as_str)
            .filter(|key| !loaded.contains(key.trim()))
            .collect();
        debug!(
            available = available.len(),
            loaded = loaded.len(),
            pending = pending.len(),
            "reconcile diff computed"
        );

        // Sequential, in listing order: bounds warehouse load and keeps
        // failures attributable to a single key.
        for key in pending {
            let statement = CopyFrom::new(
                self.spec.name.as_str(),
                self.spec.bucket.as_str(),
                key,
                &self.ctx.credentials,
                &self.ctx.options,
            )
            .to_sql();
            match self.warehouse.execute(&statement).await {
                Ok(()) => info!(key, "loaded object"),
                // The key is still absent from load history, so the next
                // pass retries it.
                Err(err) => self.report_load_failure(key, &err).await,
            }
        }

        Ok(())
    }

    async fn report_load_failure(&self, key: &str, err: &WarehouseError) {
        warn!(key, error = %err, "bulk load failed");
        self.ctx
            .alerts
            .notify(
                &format!("bulk load into {} failed", self.spec.name),
                &format!("{key}: {err}"),
            )
            .await;
    }
}
