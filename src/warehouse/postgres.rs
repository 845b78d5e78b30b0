//! Postgres-protocol implementation of [`Warehouse`].

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, Row};

use super::{Warehouse, WarehouseError, WarehouseResult};
use crate::config::WarehouseSettings;

/// Warehouse handle over the Postgres wire protocol.
///
/// Each worker gets its own `PgWarehouse` with a single connection, so
/// per-table load traffic never contends on a shared pool.
pub struct PgWarehouse {
    pool: PgPool,
}

impl PgWarehouse {
    /// Connect using the configured warehouse parameters.
    pub async fn connect(settings: &WarehouseSettings) -> WarehouseResult<Self> {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.database)
            .username(&settings.user)
            .password(&settings.password)
            .ssl_mode(PgSslMode::Disable);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| WarehouseError::Connect(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Warehouse for PgWarehouse {
    async fn query(&self, sql: &str) -> WarehouseResult<Vec<Vec<String>>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| WarehouseError::Query(e.to_string()))?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let mut values = Vec::with_capacity(row.len());
            for i in 0..row.len() {
                let value: String = row
                    .try_get(i)
                    .map_err(|e| WarehouseError::Query(e.to_string()))?;
                values.push(value);
            }
            result.push(values);
        }
        Ok(result)
    }

    async fn execute(&self, sql: &str) -> WarehouseResult<()> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| WarehouseError::Exec(e.to_string()))
    }
}
