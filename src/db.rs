// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use anyhow::Result;
use chrono::Local;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Sqlite};
use std::path::Path;

/// Embedded sqlx migrations from the `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

pub async fn create_db_pool(db_url: &str) -> Result<SqlitePool> {
    // Create database if it doesn't exist
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        Sqlite::create_database(db_url).await?;
    }

    // Connect to the database
    let pool = SqlitePool::connect(db_url).await?;

    // Run migrations
    MIGRATOR.run(&pool).await?;

    Ok(pool)
}

/// Copy the SQLite file to `<file>.<timestamp>` before destructive operations.
pub fn backup_database(db_path: &str) -> Result<Option<String>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = format!("{}.{}", db_path, timestamp);
    std::fs::copy(path, &backup_path)?;

    Ok(Some(backup_path))
}

/// Delete the database file, backing it up first. Returns the backup path.
pub fn delete_database(db_path: &str) -> Result<Option<String>> {
    let Some(backup_path) = backup_database(db_path)? else {
        return Ok(None);
    };
    std::fs::remove_file(db_path)?;
    Ok(Some(backup_path))
}

#[derive(Debug, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
}

/// Applied-migration history from sqlx's bookkeeping table.
pub async fn migration_history(pool: &SqlitePool) -> Result<Vec<AppliedMigration>> {
    let rows = sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, description FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_create_db_pool_runs_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        let pool = create_db_pool(&url).await.unwrap();

        let history = migration_history(&pool).await.unwrap();
        assert!(!history.is_empty());

        // Schema tables exist after migration
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_backup_database_missing_file() {
        let result = backup_database("does-not-exist.db").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_backup_and_delete_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let mut file = std::fs::File::create(&db_path).unwrap();
        file.write_all(b"not a real database").unwrap();

        let db_path_str = db_path.to_str().unwrap();
        let backup = backup_database(db_path_str).unwrap().unwrap();
        assert!(Path::new(&backup).exists());
        assert!(db_path.exists());

        let backup2 = delete_database(db_path_str).unwrap().unwrap();
        assert!(Path::new(&backup2).exists());
        assert!(!db_path.exists());
    }
}
