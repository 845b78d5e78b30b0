//! Schema catalog fetch and lookup.
//!
//! Wire shape of the catalog document:
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "name": "events",
//!       "columns": [
//!         {"name": "id", "type": "bigint", "unique": true, "null": false},
//!         {"name": "payload", "type": "varchar(1024)"}
//!       ],
//!       "unique": ["id", "occurred_at"],
//!       "primary_key": ["id"]
//!     }
//!   ]
//! }
//! ```
//!
//! A column's `unique` defaults to false and `null` to true when absent.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Result type for catalog operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while fetching or using the catalog.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Transport failure or non-success status fetching the document.
    #[error("failed to fetch schema catalog: {0}")]
    Fetch(#[source] reqwest::Error),

    /// The document is not valid catalog JSON.
    #[error("failed to parse schema catalog: {0}")]
    Parse(#[source] serde_json::Error),

    /// The catalog has no definition for the requested table. No placeholder
    /// definition is synthesized; the caller must treat this as fatal.
    #[error("table not found in schema catalog: {0}")]
    TableNotFound(String),
}

/// One column of a table definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub name: String,

    /// Warehouse type expression, copied into DDL verbatim.
    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default)]
    pub unique: bool,

    #[serde(rename = "null", default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

/// One table definition from the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct TableDef {
    pub name: String,

    /// Columns in catalog order; DDL preserves this order.
    pub columns: Vec<ColumnDef>,

    /// Table-level unique column group.
    #[serde(default)]
    pub unique: Vec<String>,

    /// Primary-key column group.
    #[serde(default)]
    pub primary_key: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDoc {
    tables: Vec<TableDef>,
}

/// Table definitions indexed by name.
#[derive(Debug)]
pub struct SchemaCatalog {
    tables: HashMap<String, TableDef>,
}

impl SchemaCatalog {
    /// Fetch and parse the catalog document.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> SchemaResult<Self> {
        let response = client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(SchemaError::Fetch)?;
        let body = response.bytes().await.map_err(SchemaError::Fetch)?;
        Self::parse(&body)
    }

    /// Parse a catalog document from raw bytes.
    pub fn parse(body: &[u8]) -> SchemaResult<Self> {
        let doc: CatalogDoc = serde_json::from_slice(body).map_err(SchemaError::Parse)?;
        let tables = doc
            .tables
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        Ok(Self { tables })
    }

    /// Look up a table definition by name.
    pub fn table(&self, name: &str) -> SchemaResult<&TableDef> {
        self.tables
            .get(name)
            .ok_or_else(|| SchemaError::TableNotFound(name.to_string()))
    }

    /// Number of table definitions in the catalog.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
