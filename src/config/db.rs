//! SQLite connection handling for local state.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

/// Open (creating if needed) the database at `path`
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database at {:?}", path))
}

/// In-memory database for tests
pub async fn connect_memory() -> Result<SqlitePool> {
    SqlitePool::connect(":memory:")
        .await
        .context("Failed to open in-memory database")
}

/// Bring the schema up to date. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS drafts (
            assessment_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            value TEXT NOT NULL,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (assessment_id, position)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create drafts table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create settings table")?;

    Ok(())
}
