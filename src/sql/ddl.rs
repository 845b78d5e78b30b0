//! DDL (Data Definition Language) support.
//!
//! Generates the CREATE TABLE statement used to bootstrap a missing table
//! from its catalog definition.
//!
//! # Examples
//!
//! ```ignore
//! use siphon::schema::TableDef;
//! use siphon::sql::CreateTable;
//!
//! let def: TableDef = serde_json::from_str(payload)?;
//! let sql = CreateTable::from_def(&def).to_sql();
//! ```

use crate::schema::{ColumnDef, TableDef};

/// CREATE TABLE statement.
///
/// Column clauses are rendered in the exact order the catalog lists them,
/// so the same definition always produces the same statement.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until rendered with to_sql()"]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub unique: Vec<String>,
    pub primary_key: Vec<String>,
}

impl CreateTable {
    /// Build a CREATE TABLE statement from a catalog definition.
    pub fn from_def(def: &TableDef) -> Self {
        Self {
            name: def.name.clone(),
            columns: def.columns.clone(),
            unique: def.unique.clone(),
            primary_key: def.primary_key.clone(),
        }
    }

    /// Render the statement.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        sql.push_str("CREATE TABLE ");
        sql.push_str(&self.name);
        sql.push_str(" (\n");

        for (i, column) in self.columns.iter().enumerate() {
            if i != 0 {
                sql.push_str(",\n");
            }
            sql.push_str(&column.name);
            sql.push(' ');
            sql.push_str(&column.data_type);
            if column.unique {
                sql.push_str(" UNIQUE");
            }
            if !column.nullable {
                sql.push_str(" NOT NULL");
            }
        }

        if !self.unique.is_empty() {
            sql.push_str(",\nUNIQUE (");
            sql.push_str(&self.unique.join(", "));
            sql.push(')');
        }

        // The catalog's primary_key group is emitted as a second UNIQUE
        // constraint, not a PRIMARY KEY; the warehouse treats key
        // constraints as informational only.
        if !self.primary_key.is_empty() {
            sql.push_str(",\nUNIQUE (");
            sql.push_str(&self.primary_key.join(", "));
            sql.push(')');
        }

        sql.push_str("\n);");
        sql
    }
}
