//! COPY (bulk-ingest) statement support.
//!
//! A [`CopyFrom`] targets a single object key, or a whole prefix when no
//! load history exists yet and one statement can cover everything under it.

use serde::Deserialize;

/// Object-store credential material inlined into COPY statements.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

/// Options appended to every COPY statement.
///
/// Clause order is fixed (empty-as-null, blank-as-null, fill-record,
/// max-error, delimiter) so statements are reproducible.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Load empty fields as NULL.
    pub empty_as_null: bool,

    /// Load whitespace-only fields as NULL.
    pub blanks_as_null: bool,

    /// Pad short records with NULLs instead of rejecting them.
    pub fill_record: bool,

    /// Number of bad records tolerated before the load fails. The clause is
    /// omitted when zero.
    pub max_error: i64,

    /// Field delimiter. The clause is omitted when unset.
    pub delimiter: Option<String>,
}

/// COPY statement for one object key (or prefix).
#[derive(Debug, Clone)]
#[must_use = "COPY statements have no effect until rendered with to_sql()"]
pub struct CopyFrom {
    pub table: String,
    pub bucket: String,
    pub key: String,
    pub credentials: Credentials,
    pub options: LoadOptions,
}

impl CopyFrom {
    /// Build a COPY statement for `bucket/key` into `table`.
    pub fn new(
        table: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
        credentials: &Credentials,
        options: &LoadOptions,
    ) -> Self {
        Self {
            table: table.into(),
            bucket: bucket.into(),
            key: key.into(),
            credentials: credentials.clone(),
            options: options.clone(),
        }
    }

    /// Render the statement.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        sql.push_str("COPY ");
        sql.push_str(&self.table);
        sql.push_str(" FROM 's3://");
        sql.push_str(&self.bucket);
        sql.push('/');
        sql.push_str(&self.key);
        sql.push_str("' credentials 'aws_access_key_id=");
        sql.push_str(&self.credentials.access_key);
        sql.push_str(";aws_secret_access_key=");
        sql.push_str(&self.credentials.secret_key);
        sql.push('\'');

        if self.options.empty_as_null {
            sql.push_str(" emptyasnull");
        }
        if self.options.blanks_as_null {
            sql.push_str(" blanksasnull");
        }
        if self.options.fill_record {
            sql.push_str(" fillrecord");
        }
        if self.options.max_error > 0 {
            sql.push_str(" maxerror ");
            sql.push_str(&self.options.max_error.to_string());
        }
        if let Some(delimiter) = &self.options.delimiter {
            if !delimiter.is_empty() {
                sql.push_str(" delimiter '");
                sql.push_str(delimiter);
                sql.push('\'');
            }
        }

        sql.push(';');
        sql
    }
}
