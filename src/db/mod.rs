//! Database layer
//!
//! SQLite storage for organizations, categories and products. The schema
//! lives in `migrations/` and is applied when the pool is created.

mod category_repository;
mod error;
mod organization_repository;
mod product_repository;

pub use category_repository::CategoryRepository;
pub use error::{StoreError, StoreResult};
pub use organization_repository::OrganizationRepository;
pub use product_repository::ProductRepository;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Tables the application cannot run without
pub const REQUIRED_TABLES: &[&str] = &["organizations", "categories", "products"];

/// Initialize the database connection pool and apply migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let connect_options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Failed to parse database URL: {}", config.url))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(config.connect_timeout_secs))
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(connect_options)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Apply the bundled migrations
pub async fn run_migrations(pool: &DbPool) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    debug!("Database migrations applied");
    Ok(())
}

/// Names of the application tables currently present
pub async fn list_tables(pool: &DbPool) -> StoreResult<Vec<String>> {
    let rows = sqlx::query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get::<String, _>("name")).collect())
}

/// Verify that every required table exists, returning the missing ones
pub async fn missing_tables(pool: &DbPool) -> StoreResult<Vec<&'static str>> {
    let existing = list_tables(pool).await?;
    let missing: Vec<&'static str> = REQUIRED_TABLES
        .iter()
        .filter(|table| !existing.iter().any(|t| t == *table))
        .copied()
        .collect();

    if missing.is_empty() {
        info!("All {} required tables present", REQUIRED_TABLES.len());
    }
    Ok(missing)
}

/// Cheap connectivity check used by the readiness probe
pub async fn check_health(pool: &DbPool) -> StoreResult<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}
