//! Configuration module for Siphon.
//!
//! Everything is loaded once at startup into an immutable [`Settings`] value
//! and passed explicitly to the components that need it.

mod settings;

pub use settings::{
    expand_env_vars, AlertSettings, AwsSettings, DefaultSettings, Settings, SettingsError,
    TableSpec, WarehouseSettings,
};
