//! TOML-based configuration for Siphon.
//!
//! Supports a config file (siphon.toml) with environment variable expansion
//! for secret material.
//!
//! Example configuration:
//! ```toml
//! [default]
//! debug = false
//! poll_sleep_seconds = 60
//!
//! [aws]
//! region = "us-east-1"
//! access_key = "${AWS_ACCESS_KEY_ID}"
//! secret_key = "${AWS_SECRET_ACCESS_KEY}"
//!
//! [alerts]
//! failure_notifications = true
//! topic = "warehouse-sync-failures"
//! webhook_url = "https://alerts.internal/publish"
//!
//! [warehouse]
//! host = "warehouse.internal"
//! port = 5439
//! database = "analytics"
//! user = "loader"
//! password = "${WAREHOUSE_PASSWORD}"
//! schema_url = "https://schemas.internal/tables.json"
//! migrate = true
//!
//! [load]
//! empty_as_null = true
//! blanks_as_null = true
//! fill_record = false
//! max_error = 0
//! delimiter = "|"
//!
//! [[tables]]
//! name = "events"
//! bucket = "tracking-archive"
//! prefix = "events/"
//! ```

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::LoadOptions;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Process-wide defaults.
    #[serde(default)]
    pub default: DefaultSettings,

    /// Object-store credentials and region.
    pub aws: AwsSettings,

    /// Failure notification settings.
    #[serde(default)]
    pub alerts: AlertSettings,

    /// Warehouse connection and schema source.
    pub warehouse: WarehouseSettings,

    /// Bulk-load options applied to every COPY statement.
    #[serde(default)]
    pub load: LoadOptions,

    /// One entry per (table, bucket, prefix) triple to keep in sync.
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

/// Process-wide defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    /// Log at debug level by default.
    pub debug: bool,

    /// Seconds to sleep between reconcile passes.
    pub poll_sleep_seconds: u64,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            debug: false,
            poll_sleep_seconds: 60,
        }
    }
}

/// Object-store credentials and region.
#[derive(Debug, Clone, Deserialize)]
pub struct AwsSettings {
    /// Region of the buckets being watched.
    pub region: String,

    /// Access key (supports `${ENV_VAR}` expansion).
    pub access_key: String,

    /// Secret key (supports `${ENV_VAR}` expansion).
    pub secret_key: String,

    /// Custom endpoint, for S3-compatible stores.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Failure notification settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Publish a notification for every unrecoverable error.
    pub failure_notifications: bool,

    /// Topic identifier carried in each notification payload.
    pub topic: String,

    /// Endpoint notifications are POSTed to.
    pub webhook_url: Option<String>,
}

/// Warehouse connection and schema source.
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseSettings {
    /// Warehouse hostname.
    pub host: String,

    /// Warehouse port.
    #[serde(default = "default_warehouse_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password (supports `${ENV_VAR}` expansion).
    pub password: String,

    /// URL of the JSON schema catalog, fetched once at startup.
    pub schema_url: String,

    /// Allow workers to issue CREATE TABLE for missing tables. When false,
    /// a missing table is a fatal bootstrap error.
    #[serde(default = "default_true")]
    pub migrate: bool,
}

fn default_warehouse_port() -> u16 {
    5439
}

fn default_true() -> bool {
    true
}

/// One (table, bucket, prefix) triple to keep in sync.
#[derive(Debug, Clone, Deserialize)]
pub struct TableSpec {
    /// Warehouse table name.
    pub name: String,

    /// Object-store bucket the table is fed from.
    pub bucket: String,

    /// Key prefix within the bucket.
    #[serde(default)]
    pub prefix: String,
}

impl Settings {
    /// Load settings from a TOML file, expand secrets, and validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut settings: Settings = toml::from_str(&content)?;
        settings.resolve()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Expand environment variables in secret-bearing fields.
    fn resolve(&mut self) -> Result<(), SettingsError> {
        self.aws.access_key = expand_env_vars(&self.aws.access_key)?;
        self.aws.secret_key = expand_env_vars(&self.aws.secret_key)?;
        self.warehouse.password = expand_env_vars(&self.warehouse.password)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.tables.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "at least one [[tables]] entry is required".to_string(),
            ));
        }
        for spec in &self.tables {
            if spec.name.is_empty() || spec.bucket.is_empty() {
                return Err(SettingsError::InvalidConfig(format!(
                    "table entry with name '{}' must set both name and bucket",
                    spec.name
                )));
            }
        }
        if self.default.poll_sleep_seconds == 0 {
            return Err(SettingsError::InvalidConfig(
                "poll_sleep_seconds must be at least 1".to_string(),
            ));
        }
        if self.warehouse.schema_url.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "warehouse.schema_url must be set".to_string(),
            ));
        }
        if self.load.max_error < 0 {
            return Err(SettingsError::InvalidConfig(
                "load.max_error must not be negative".to_string(),
            ));
        }
        if self.alerts.failure_notifications && self.alerts.webhook_url.is_none() {
            return Err(SettingsError::InvalidConfig(
                "alerts.webhook_url must be set when failure_notifications is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            // Check for ${VAR} or $VAR
            if chars.peek() == Some(&'{') {
                chars.next(); // consume '{'
                let mut var_name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            } else {
                // $VAR (ends at non-alphanumeric/underscore)
                let mut var_name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        var_name.push(chars.next().unwrap());
                    } else {
                        break;
                    }
                }
                if var_name.is_empty() {
                    // Just a lone $, keep it
                    result.push('$');
                } else {
                    let value = env::var(&var_name)
                        .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                    result.push_str(&value);
                }
            }
        } else {
            result.push(c);
        }
    }

    Ok(result)
}
