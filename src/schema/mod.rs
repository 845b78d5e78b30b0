//! Remote schema catalog.
//!
//! Table definitions come from a JSON document fetched over HTTP once at
//! startup; the catalog is read-only afterwards.

mod catalog;

pub use catalog::{ColumnDef, SchemaCatalog, SchemaError, SchemaResult, TableDef};
