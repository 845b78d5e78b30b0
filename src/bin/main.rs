//! Siphon daemon - keep warehouse tables in sync with an object-storage bucket
//!
//! Usage:
//!   siphon [-c <config.toml>]
//!   siphon --version
//!
//! Runs one sync worker per configured table until interrupted. Exit code is
//! non-zero when configuration or startup fails, or when any worker aborts
//! fatally; a clean interrupt-driven shutdown exits zero.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use siphon::alert;
use siphon::config::Settings;
use siphon::schema::SchemaCatalog;
use siphon::sql::Credentials;
use siphon::store::S3ObjectStore;
use siphon::sync::{Supervisor, SyncError, TableSyncWorker, WorkerContext};
use siphon::warehouse::PgWarehouse;

#[derive(Parser)]
#[command(name = "siphon")]
#[command(about = "Keeps warehouse tables in sync with an object-storage bucket")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short = 'c', long = "config", default_value = "config/siphon.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::from_file(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("couldn't load config '{}': {}", cli.config.display(), err);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(settings.default.debug);

    match run(settings).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!(failed, "some workers aborted");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "startup failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

async fn run(settings: Settings) -> Result<usize, SyncError> {
    let http = reqwest::Client::new();

    let catalog = Arc::new(SchemaCatalog::fetch(&http, &settings.warehouse.schema_url).await?);
    info!(
        tables = catalog.len(),
        url = %settings.warehouse.schema_url,
        "fetched schema catalog"
    );

    let alerts = alert::from_settings(&settings.alerts, http);
    let ctx = WorkerContext {
        catalog,
        alerts: alerts.clone(),
        credentials: Credentials {
            access_key: settings.aws.access_key.clone(),
            secret_key: settings.aws.secret_key.clone(),
        },
        options: settings.load.clone(),
        poll_interval: Duration::from_secs(settings.default.poll_sleep_seconds),
        migrate: settings.warehouse.migrate,
    };

    // Every worker gets its own warehouse connection and store handle, so
    // per-table traffic never contends on shared clients.
    let mut workers = Vec::with_capacity(settings.tables.len());
    for spec in &settings.tables {
        let warehouse = PgWarehouse::connect(&settings.warehouse).await?;
        let store = S3ObjectStore::new(&settings.aws).await;
        workers.push(TableSyncWorker::new(
            spec.clone(),
            Box::new(warehouse),
            Box::new(store),
            ctx.clone(),
        ));
    }
    info!(workers = workers.len(), "launching sync workers");

    Ok(Supervisor::new(workers, alerts)
        .run_until_interrupted()
        .await)
}
