//! Server initialization and startup logic for WebLens.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weblens_api::{AppState, InterfaceConfig, InterfaceServer, RouterOptions};
use weblens_config::{weblens_dir, Config, ConfigValidator, StorageConfig};
use weblens_core::{MemorySnapshotStore, Tracker, TrackerConfig};
use weblens_protocols::SnapshotStore;
use weblens_store_sqlite::SqliteSnapshotStore;

use crate::cli::RunArgs;

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.weblens/logs/ with daily rotation.
pub(crate) fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = weblens_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("weblens")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes buffered lines on drop, so it has to outlive main.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Apply command-line overrides to the loaded configuration.
pub(crate) fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(db) = &args.db {
        config.storage.backend = "sqlite".to_string();
        config.storage.path = Some(db.clone());
    }
    if args.in_memory {
        config.storage.backend = "memory".to_string();
        config.storage.path = None;
    }
}

/// Open the snapshot store selected by the configuration.
pub(crate) async fn open_store(
    storage: &StorageConfig,
) -> Result<Arc<dyn SnapshotStore>, Box<dyn std::error::Error>> {
    match storage.backend.as_str() {
        "memory" => {
            warn!("Using in-memory store; snapshots are lost on restart");
            Ok(Arc::new(MemorySnapshotStore::new()))
        }
        "sqlite" => {
            let path = storage.database_path();
            let store = SqliteSnapshotStore::open(&path).await?;
            info!("Snapshot database: {}", path.display());
            Ok(Arc::new(store))
        }
        other => Err(format!("Unknown storage backend: {}", other).into()),
    }
}

/// Run the server in foreground.
pub(crate) async fn run_server(
    mut config: Config,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_overrides(&mut config, &args);

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if let Some(err) = validation.into_error() {
        return Err(err.into());
    }

    info!("Starting WebLens v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config.storage).await?;
    let tracker = Tracker::with_config(
        store,
        TrackerConfig {
            history_limit: config.tracker.history_limit,
            preview_chars: config.tracker.preview_chars,
        },
    );

    let state = Arc::new(AppState::new(tracker));
    let interface_config = InterfaceConfig::new(config.server.host.clone(), config.server.port)
        .with_router_options(RouterOptions {
            cors: config.server.cors,
            max_body_bytes: config.server.max_body_bytes,
        });

    InterfaceServer::new(interface_config, state).run().await
}
