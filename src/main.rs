//! Product Catalog - products, categories and organizations over REST and SOAP

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

use product_catalog::config::{LogFormat, LoggingConfig};
use product_catalog::{create_router, db, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("Product Catalog {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if let Some(pos) = args.iter().position(|arg| arg == "--write-config") {
        let path = args
            .get(pos + 1)
            .map(PathBuf::from)
            .context("--write-config requires a path")?;
        AppConfig::create_default_config(&path)
            .with_context(|| format!("Failed to write configuration to {:?}", path))?;
        println!("Wrote default configuration to {:?}", path);
        return Ok(());
    }

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The guard flushes file logs when dropped
    let _log_guard = init_logging(&config.logging);

    info!("Product Catalog starting up");

    ensure_data_directory(&config)?;

    info!("Initializing database connection");
    let db = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;

    if args.iter().any(|arg| arg == "--migrate") {
        return migrate(&db).await;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address configuration")?;

    let soap_path = config.soap.path.clone();
    let app = create_router(AppState { config, db });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Starting HTTP server on http://{}", addr);
    info!("REST API at http://{}/api, SOAP endpoint at http://{}{}", addr, addr, soap_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

/// Initialize the logging/tracing infrastructure
fn init_logging(log_config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut guard = None;

    if log_config.target.writes_console() {
        layers.push(match log_config.format {
            LogFormat::Json => fmt::layer().json().with_target(true).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
            LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
        });
    }

    if log_config.target.writes_file() {
        let (writer, file_guard) = create_file_writer(log_config);
        guard = Some(file_guard);
        layers.push(match log_config.format {
            LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
            LogFormat::Pretty => fmt::layer().with_ansi(false).with_writer(writer).boxed(),
        });
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    guard
}

/// Create a file writer with optional daily rotation
fn create_file_writer(log_config: &LoggingConfig) -> (NonBlocking, WorkerGuard) {
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Ensure the directory holding the SQLite file exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    if let Some(parent) = config.database.sqlite_path().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
            info!("Created data directory: {:?}", parent);
        }
    }
    Ok(())
}

/// Apply migrations (already done by `init_pool`) and verify the schema
async fn migrate(pool: &db::DbPool) -> Result<()> {
    let tables = db::list_tables(pool).await?;
    println!("Tables: {}", tables.join(", "));

    let missing = db::missing_tables(pool).await?;
    if missing.is_empty() {
        println!("All required tables are present");
        Ok(())
    } else {
        anyhow::bail!("Missing tables after migration: {}", missing.join(", "))
    }
}

/// Wait for SIGINT or SIGTERM
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            info!("SIGINT received, starting graceful shutdown...");
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("SIGINT received, starting graceful shutdown...");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received, starting graceful shutdown...");
        }
    }
}

/// Wait for shutdown signal (SIGINT only on non-Unix platforms)
#[cfg(not(unix))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, starting graceful shutdown...");
}

/// Print help message
fn print_help() {
    println!(
        r#"Product Catalog {}

USAGE:
    product-catalog [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --migrate               Apply database migrations, list the tables and
                            verify the required ones exist, then exit
    --write-config <PATH>   Write a configuration file with default values

ENVIRONMENT:
    CATALOG_CONFIG          Path to configuration file
    CATALOG_HOST            Listen address (default: 127.0.0.1)
    CATALOG_PORT            Listen port (default: 8080)
    DATABASE_URL            SQLite URL (default: sqlite://./data/catalog.db)
    CATALOG_SOAP_PATH       SOAP endpoint path (default: /ws)
    CATALOG_LOG_FORMAT      pretty, json or compact
    CATALOG_LOG_TARGET      console, file or both
    RUST_LOG                Log filter, overrides the configured level

CONFIGURATION:
    The application looks for configuration files in the following order:
    1. Path specified by CATALOG_CONFIG environment variable
    2. ./config.yaml
    3. ./config/config.yaml
    4. /etc/product-catalog/config.yaml
    5. <user config dir>/product-catalog/config.yaml"#,
        env!("CARGO_PKG_VERSION")
    );
}
