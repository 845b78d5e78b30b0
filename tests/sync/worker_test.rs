#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use siphon::alert::AlertSink;
    use siphon::config::TableSpec;
    use siphon::schema::SchemaCatalog;
    use siphon::sql::{Credentials, LoadOptions};
    use siphon::store::{ListPage, ObjectStore, ObjectStoreError};
    use siphon::sync::{SyncError, TableSyncWorker, WorkerContext};
    use siphon::warehouse::{Warehouse, WarehouseError, WarehouseResult};

    const CATALOG: &str = r#"{
        "tables": [
            {
                "name": "events",
                "columns": [
                    {"name": "id", "type": "bigint", "null": false},
                    {"name": "payload", "type": "varchar(1024)"}
                ]
            }
        ]
    }"#;

    /// Scripted warehouse: fixed column probe and load history, every
    /// executed statement recorded. Statements containing `fail_marker`
    /// error out, as do history queries when `fail_history` is set.
    #[derive(Default)]
    struct StubWarehouse {
        columns: Vec<(&'static str, &'static str)>,
        loaded: Vec<&'static str>,
        fail_history: bool,
        fail_marker: Option<&'static str>,
        executed: Arc<Mutex<Vec<String>>>,
        history_queries: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl Warehouse for StubWarehouse {
        async fn query(&self, sql: &str) -> WarehouseResult<Vec<Vec<String>>> {
            if sql.contains("information_schema.columns") {
                Ok(self
                    .columns
                    .iter()
                    .map(|(name, ty)| vec![name.to_string(), ty.to_string()])
                    .collect())
            } else if sql.contains("stl_file_scan") {
                *self.history_queries.lock().unwrap() += 1;
                if self.fail_history {
                    return Err(WarehouseError::Query("history unavailable".to_string()));
                }
                Ok(self.loaded.iter().map(|key| vec![key.to_string()]).collect())
            } else {
                Err(WarehouseError::Query(format!("unexpected query: {sql}")))
            }
        }

        async fn execute(&self, sql: &str) -> WarehouseResult<()> {
            self.executed.lock().unwrap().push(sql.to_string());
            if let Some(marker) = self.fail_marker {
                if sql.contains(marker) {
                    return Err(WarehouseError::Exec(format!("rejected: {marker}")));
                }
            }
            Ok(())
        }
    }

    /// Single-page bucket listing.
    struct StubStore {
        keys: Vec<&'static str>,
    }

    #[async_trait]
    impl ObjectStore for StubStore {
        async fn list_page(
            &self,
            _bucket: &str,
            _prefix: &str,
            marker: Option<&str>,
        ) -> Result<ListPage, ObjectStoreError> {
            let keys = match marker {
                None => self.keys.iter().map(|k| k.to_string()).collect(),
                Some(_) => Vec::new(),
            };
            Ok(ListPage {
                keys,
                is_truncated: false,
            })
        }
    }

    #[derive(Default)]
    struct RecordingAlerts {
        notes: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl AlertSink for RecordingAlerts {
        async fn notify(&self, summary: &str, detail: &str) {
            self.notes
                .lock()
                .unwrap()
                .push((summary.to_string(), detail.to_string()));
        }
    }

    fn spec() -> TableSpec {
        TableSpec {
            name: "events".to_string(),
            bucket: "tracking".to_string(),
            prefix: "events/".to_string(),
        }
    }

    fn context(alerts: Arc<RecordingAlerts>) -> WorkerContext {
        WorkerContext {
            catalog: Arc::new(SchemaCatalog::parse(CATALOG.as_bytes()).unwrap()),
            alerts,
            credentials: Credentials {
                access_key: "ak".to_string(),
                secret_key: "sk".to_string(),
            },
            options: LoadOptions::default(),
            // Long enough that tests only ever observe the first pass.
            poll_interval: Duration::from_secs(3600),
            migrate: true,
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within 5s");
    }

    #[tokio::test]
    async fn test_absent_table_bootstraps_then_copies_whole_prefix() {
        let executed = Arc::new(Mutex::new(Vec::new()));
        let warehouse = StubWarehouse {
            executed: executed.clone(),
            ..StubWarehouse::default()
        };
        let alerts = Arc::new(RecordingAlerts::default());
        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore { keys: vec![] }),
            context(alerts.clone()),
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(worker.run(cancel.clone()));

        wait_until(|| executed.lock().unwrap().len() >= 2).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        let statements = executed.lock().unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[0],
            "CREATE TABLE events (\nid bigint NOT NULL,\npayload varchar(1024)\n);"
        );
        assert!(statements[1].starts_with("COPY events FROM 's3://tracking/events/'"));
        assert!(alerts.notes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_existing_table_skips_ddl() {
        let executed = Arc::new(Mutex::new(Vec::new()));
        let warehouse = StubWarehouse {
            columns: vec![("id", "bigint"), ("payload", "character varying")],
            loaded: vec!["events/a.csv"],
            executed: executed.clone(),
            ..StubWarehouse::default()
        };
        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore {
                keys: vec!["events/a.csv"],
            }),
            context(Arc::new(RecordingAlerts::default())),
        );

        let cancel = CancellationToken::new();
        cancel.cancel();
        worker.run(cancel).await.unwrap();

        assert!(executed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pending_diff_loads_only_missing_keys() {
        let executed = Arc::new(Mutex::new(Vec::new()));
        let warehouse = StubWarehouse {
            columns: vec![("id", "bigint")],
            loaded: vec!["events/a.csv"],
            executed: executed.clone(),
            ..StubWarehouse::default()
        };
        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore {
                keys: vec!["events/a.csv", "events/b.csv"],
            }),
            context(Arc::new(RecordingAlerts::default())),
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(worker.run(cancel.clone()));

        wait_until(|| !executed.lock().unwrap().is_empty()).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        let statements = executed.lock().unwrap();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("FROM 's3://tracking/events/b.csv'"));
    }

    #[tokio::test]
    async fn test_padded_history_keys_match_listing() {
        // Load history pads keys to the column width; the diff must compare
        // trimmed forms.
        let executed = Arc::new(Mutex::new(Vec::new()));
        let warehouse = StubWarehouse {
            columns: vec![("id", "bigint")],
            loaded: vec!["  events/a.csv  "],
            executed: executed.clone(),
            ..StubWarehouse::default()
        };
        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore {
                keys: vec!["events/a.csv"],
            }),
            context(Arc::new(RecordingAlerts::default())),
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(worker.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        // Nothing pending, so nothing executed.
        assert!(executed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_between_passes_completes_cleanly() {
        let executed = Arc::new(Mutex::new(Vec::new()));
        let history_queries = Arc::new(Mutex::new(0));
        let warehouse = StubWarehouse {
            columns: vec![("id", "bigint")],
            loaded: vec!["events/a.csv"],
            executed: executed.clone(),
            history_queries: history_queries.clone(),
            ..StubWarehouse::default()
        };
        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore {
                keys: vec!["events/a.csv"],
            }),
            context(Arc::new(RecordingAlerts::default())),
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(worker.run(cancel.clone()));

        // Let the first pass finish, then cancel during the sleep.
        wait_until(|| *history_queries.lock().unwrap() >= 1).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        // Exactly one pass ran: no second history query, no statements.
        assert_eq!(*history_queries.lock().unwrap(), 1);
        assert!(executed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_copy_failure_is_alerted_and_pass_continues() {
        let executed = Arc::new(Mutex::new(Vec::new()));
        let warehouse = StubWarehouse {
            columns: vec![("id", "bigint")],
            loaded: vec!["events/a.csv"],
            fail_marker: Some("events/b.csv"),
            executed: executed.clone(),
            ..StubWarehouse::default()
        };
        let alerts = Arc::new(RecordingAlerts::default());
        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore {
                keys: vec!["events/a.csv", "events/b.csv", "events/c.csv"],
            }),
            context(alerts.clone()),
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(worker.run(cancel.clone()));

        wait_until(|| executed.lock().unwrap().len() >= 2).await;
        cancel.cancel();
        // The failed COPY is not fatal: the worker still drains cleanly.
        handle.await.unwrap().unwrap();

        let statements = executed.lock().unwrap();
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("events/b.csv"));
        assert!(statements[1].contains("events/c.csv"));

        let notes = alerts.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].1.contains("events/b.csv"));
    }

    #[tokio::test]
    async fn test_history_failure_is_fatal() {
        let warehouse = StubWarehouse {
            columns: vec![("id", "bigint")],
            fail_history: true,
            ..StubWarehouse::default()
        };
        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore { keys: vec![] }),
            context(Arc::new(RecordingAlerts::default())),
        );

        let result = worker.run(CancellationToken::new()).await;
        assert!(matches!(result, Err(SyncError::Warehouse(_))));
    }

    #[tokio::test]
    async fn test_missing_catalog_entry_is_fatal() {
        let warehouse = StubWarehouse::default(); // table absent, bootstrap needed
        let alerts = Arc::new(RecordingAlerts::default());
        let mut ctx = context(alerts);
        ctx.catalog = Arc::new(SchemaCatalog::parse(br#"{"tables": []}"#).unwrap());

        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore { keys: vec![] }),
            ctx,
        );

        let result = worker.run(CancellationToken::new()).await;
        assert!(matches!(result, Err(SyncError::Schema(_))));
    }

    #[tokio::test]
    async fn test_missing_table_with_migrate_disabled_is_fatal() {
        let warehouse = StubWarehouse::default();
        let mut ctx = context(Arc::new(RecordingAlerts::default()));
        ctx.migrate = false;

        let worker = TableSyncWorker::new(
            spec(),
            Box::new(warehouse),
            Box::new(StubStore { keys: vec![] }),
            ctx,
        );

        let result = worker.run(CancellationToken::new()).await;
        assert!(matches!(result, Err(SyncError::MigrateDisabled { .. })));
    }
}
