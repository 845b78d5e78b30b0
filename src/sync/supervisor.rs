//! Worker supervision.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, Instrument};

use super::worker::TableSyncWorker;
use crate::alert::AlertSink;

/// Launches one task per worker and waits for all of them.
///
/// Table lifecycles are independent: a worker that aborts fatally is
/// reported and counted, but its siblings keep running until cancellation
/// or their own fatal error.
pub struct Supervisor {
    workers: Vec<TableSyncWorker>,
    alerts: Arc<dyn AlertSink>,
}

impl Supervisor {
    pub fn new(workers: Vec<TableSyncWorker>, alerts: Arc<dyn AlertSink>) -> Self {
        Self { workers, alerts }
    }

    /// Run every worker to completion; returns how many failed.
    pub async fn run(self, cancel: CancellationToken) -> usize {
        let mut tasks = JoinSet::new();
        for worker in self.workers {
            let table = worker.table().to_string();
            let token = cancel.clone();
            let span = info_span!("table_sync", table = %table);
            tasks.spawn(async move { (table, worker.run(token).await) }.instrument(span));
        }

        let mut failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((table, Ok(()))) => {
                    info!(table = %table, "worker completed");
                }
                Ok((table, Err(err))) => {
                    failed += 1;
                    error!(table = %table, error = %err, "worker aborted");
                    self.alerts
                        .notify(
                            &format!("table sync for {table} aborted"),
                            &err.to_string(),
                        )
                        .await;
                }
                Err(err) => {
                    failed += 1;
                    error!(error = %err, "worker task panicked");
                }
            }
        }
        failed
    }

    /// Install the process-wide interrupt listener, then run.
    ///
    /// The first interrupt broadcasts cancellation to every worker; the call
    /// returns once all of them have drained.
    pub async fn run_until_interrupted(self) -> usize {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, draining workers");
                trigger.cancel();
            }
        });
        self.run(cancel).await
    }
}
