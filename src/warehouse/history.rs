//! Load-history inspection.
//!
//! The warehouse keeps its own record of every file it has ingested; Siphon
//! queries that record instead of maintaining tracking state anywhere else.

use std::collections::HashSet;

use super::{Warehouse, WarehouseError, WarehouseResult};

/// Read-only view over the warehouse's column metadata and load history.
pub struct LoadHistory<'a> {
    warehouse: &'a dyn Warehouse,
}

impl<'a> LoadHistory<'a> {
    pub fn new(warehouse: &'a dyn Warehouse) -> Self {
        Self { warehouse }
    }

    /// Columns the warehouse currently has for `table`, in catalog order.
    ///
    /// An empty result means the table does not exist (or has no columns)
    /// and is the trigger for bootstrap DDL.
    pub async fn existing_columns(&self, table: &str) -> WarehouseResult<Vec<(String, String)>> {
        let sql = format!(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_name = '{table}' LIMIT 1000"
        );
        let rows = self.warehouse.query(&sql).await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let mut fields = row.into_iter();
            match (fields.next(), fields.next()) {
                (Some(name), Some(data_type)) => columns.push((name, data_type)),
                _ => {
                    return Err(WarehouseError::Query(
                        "malformed column metadata row".to_string(),
                    ))
                }
            }
        }
        Ok(columns)
    }

    /// Keys of every object the warehouse has ever loaded.
    ///
    /// stl_file_scan is global: it records loads into any table, so a key
    /// loaded into one table counts as loaded for all of them. Keys are
    /// trimmed because the warehouse pads them to the column width.
    pub async fn loaded_keys(&self) -> WarehouseResult<HashSet<String>> {
        let rows = self.warehouse.query("SELECT name FROM stl_file_scan").await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(|key| key.trim().to_string())
            .collect())
    }
}
