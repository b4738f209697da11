// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::WebinarRegistrant;

/// Outcome of a photo deletion attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum PhotoDelete {
    Deleted,
    NoPhoto,
    NotFound,
}

pub async fn get_all_registrants(pool: &SqlitePool) -> Result<Vec<WebinarRegistrant>> {
    let registrants = sqlx::query_as::<_, WebinarRegistrant>(
        "SELECT * FROM webinar_registrants ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(registrants)
}

async fn get_registrant(pool: &SqlitePool, id: &str) -> Result<Option<WebinarRegistrant>> {
    let registrant = sqlx::query_as::<_, WebinarRegistrant>(
        "SELECT * FROM webinar_registrants WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(registrant)
}

/// Store an uploaded photo under `<upload_dir>/photos/` and point the
/// registrant's photo_url at it. Returns the public URL, or None when
/// the registrant does not exist (the file is cleaned up again).
pub async fn upload_photo(
    pool: &SqlitePool,
    upload_dir: &str,
    registrant_id: &str,
    photo_content: &[u8],
    filename: &str,
) -> Result<Option<String>> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg");
    let unique_filename = format!("{}.{}", Uuid::new_v4(), extension);

    let photos_dir = PathBuf::from(upload_dir).join("photos");
    tokio::fs::create_dir_all(&photos_dir)
        .await
        .context("Failed to create upload directory")?;

    let file_path = photos_dir.join(&unique_filename);
    tokio::fs::write(&file_path, photo_content)
        .await
        .context("Failed to save uploaded file")?;

    let Some(_registrant) = get_registrant(pool, registrant_id).await? else {
        // Registrant unknown, remove the file we just wrote
        let _ = tokio::fs::remove_file(&file_path).await;
        return Ok(None);
    };

    let photo_url = format!("/static/uploads/photos/{}", unique_filename);
    sqlx::query("UPDATE webinar_registrants SET photo_url = ? WHERE id = ?")
        .bind(&photo_url)
        .bind(registrant_id)
        .execute(pool)
        .await?;

    Ok(Some(photo_url))
}

/// Update the free-form notes field. Returns false when the registrant
/// does not exist.
pub async fn update_notes(pool: &SqlitePool, registrant_id: &str, notes: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE webinar_registrants SET notes = ? WHERE id = ?")
        .bind(notes)
        .bind(registrant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Clear a registrant's photo and delete the file behind it.
pub async fn delete_photo(
    pool: &SqlitePool,
    upload_dir: &str,
    registrant_id: &str,
) -> Result<PhotoDelete> {
    let Some(registrant) = get_registrant(pool, registrant_id).await? else {
        return Ok(PhotoDelete::NotFound);
    };

    let Some(photo_url) = registrant.photo_url else {
        return Ok(PhotoDelete::NoPhoto);
    };

    // File deletion failures are logged, not surfaced; the DB row is
    // cleared either way.
    if let Some(filename) = photo_url.rsplit('/').next() {
        let file_path = PathBuf::from(upload_dir).join("photos").join(filename);
        if let Err(e) = tokio::fs::remove_file(&file_path).await {
            tracing::warn!(path = %file_path.display(), error = %e, "Failed to delete photo file");
        }
    }

    sqlx::query("UPDATE webinar_registrants SET photo_url = NULL WHERE id = ?")
        .bind(registrant_id)
        .execute(pool)
        .await?;

    Ok(PhotoDelete::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_db_pool;
    use crate::seed::add_sample_registrants;

    async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        let pool = create_db_pool(&url).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_update_notes() {
        let (_dir, pool) = test_pool().await;
        add_sample_registrants(&pool).await.unwrap();

        let registrants = get_all_registrants(&pool).await.unwrap();
        let id = registrants[0].id.clone();

        assert!(update_notes(&pool, &id, "followed up by email").await.unwrap());

        let registrants = get_all_registrants(&pool).await.unwrap();
        let updated = registrants.iter().find(|r| r.id == id).unwrap();
        assert_eq!(updated.notes.as_deref(), Some("followed up by email"));
    }

    #[tokio::test]
    async fn test_update_notes_unknown_registrant() {
        let (_dir, pool) = test_pool().await;
        let ok = update_notes(&pool, &Uuid::new_v4().to_string(), "notes")
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_upload_and_delete_photo() {
        let (_dir, pool) = test_pool().await;
        add_sample_registrants(&pool).await.unwrap();

        let upload_dir = tempfile::tempdir().unwrap();
        let upload_dir_str = upload_dir.path().to_str().unwrap();

        let registrants = get_all_registrants(&pool).await.unwrap();
        let id = registrants[0].id.clone();

        let photo_url = upload_photo(&pool, upload_dir_str, &id, b"fake-jpeg-bytes", "me.jpg")
            .await
            .unwrap()
            .unwrap();
        assert!(photo_url.starts_with("/static/uploads/photos/"));
        assert!(photo_url.ends_with(".jpg"));

        // File landed on disk
        let filename = photo_url.rsplit('/').next().unwrap();
        let file_path = upload_dir.path().join("photos").join(filename);
        assert!(file_path.exists());

        // Delete clears both the row and the file
        let outcome = delete_photo(&pool, upload_dir_str, &id).await.unwrap();
        assert_eq!(outcome, PhotoDelete::Deleted);
        assert!(!file_path.exists());

        let outcome = delete_photo(&pool, upload_dir_str, &id).await.unwrap();
        assert_eq!(outcome, PhotoDelete::NoPhoto);
    }

    #[tokio::test]
    async fn test_upload_photo_unknown_registrant_cleans_up() {
        let (_dir, pool) = test_pool().await;
        let upload_dir = tempfile::tempdir().unwrap();

        let result = upload_photo(
            &pool,
            upload_dir.path().to_str().unwrap(),
            &Uuid::new_v4().to_string(),
            b"bytes",
            "photo.png",
        )
        .await
        .unwrap();
        assert!(result.is_none());

        // No stray files left behind
        let photos_dir = upload_dir.path().join("photos");
        let leftover = std::fs::read_dir(&photos_dir)
            .map(|d| d.count())
            .unwrap_or(0);
        assert_eq!(leftover, 0);
    }
}
