// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqlitePool, SqlitePoolOptions},
    Sqlite,
};
use tracing::info;

pub async fn create_db_pool(db_url: &str) -> Result<SqlitePool> {
    // Create database if it doesn't exist
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        info!(url = db_url, "Creating database");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .connect(db_url)
        .await
        .with_context(|| format!("Failed to connect to {db_url}"))?;

    migrate(&pool).await?;

    Ok(pool)
}

/// Apply the schema. Every migration is create-if-absent, so this is safe to
/// run on each start.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!()
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(())
}

/// In-memory database pinned to a single connection. Each new SQLite memory
/// connection is a separate database, so the pool must never open a second one.
#[cfg(test)]
pub async fn create_test_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_is_idempotent() -> Result<()> {
        let pool = create_test_pool().await?;
        migrate(&pool).await?;

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'countries'",
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_db_pool_creates_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("country.db");
        let url = format!("sqlite://{}", path.display());

        let pool = create_db_pool(&url).await?;
        assert!(path.exists());
        pool.close().await;

        // Reopening an existing database runs migrations again without error
        let pool = create_db_pool(&url).await?;
        pool.close().await;

        Ok(())
    }
}
