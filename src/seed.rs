// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

//! Sample-data helpers behind the management CLI. The starter ships
//! with a known superuser, a handful of test accounts, and demo rows
//! so every page has something to show.

use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::models::User;

pub const DEFAULT_SUPERUSER_EMAIL: &str = "admin@example.com";
pub const DEFAULT_SUPERUSER_PASSWORD: &str = "admin123";
pub const TEST_USER_PASSWORD: &str = "test123";

async fn user_exists(pool: &SqlitePool, email: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

async fn insert_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    is_superuser: bool,
    is_staff: bool,
) -> Result<()> {
    let hashed = hash_password(password)?;
    sqlx::query(
        r#"
        INSERT INTO users (id, email, hashed_password, is_active, is_superuser, is_staff, created_at)
        VALUES (?, ?, ?, 1, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(email)
    .bind(hashed)
    .bind(is_superuser)
    .bind(is_staff)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Create a superuser account, skipping if the email is taken.
pub async fn create_superuser(pool: &SqlitePool, email: &str, password: &str) -> Result<bool> {
    if user_exists(pool, email).await? {
        return Ok(false);
    }
    insert_user(pool, email, password, true, true).await?;
    Ok(true)
}

/// Add the test accounts (one staff, one plain user). Password: test123.
pub async fn add_test_users(pool: &SqlitePool) -> Result<usize> {
    let users = [
        ("staff@example.com", false, true),
        ("user@example.com", false, false),
    ];

    let mut added = 0;
    for (email, is_superuser, is_staff) in users {
        if user_exists(pool, email).await? {
            continue;
        }
        insert_user(pool, email, TEST_USER_PASSWORD, is_superuser, is_staff).await?;
        added += 1;
    }
    Ok(added)
}

/// Insert demo products for the dashboard page.
pub async fn add_sample_products(pool: &SqlitePool) -> Result<usize> {
    let products: [(&str, Option<&str>, f64, Option<&str>, bool); 6] = [
        (
            "Wireless Headphones",
            Some("Over-ear, noise cancelling"),
            199.99,
            Some("Audio"),
            true,
        ),
        (
            "Mechanical Keyboard",
            Some("Tenkeyless, hot-swappable switches"),
            129.00,
            Some("Peripherals"),
            true,
        ),
        ("USB-C Hub", Some("7-in-1"), 49.50, Some("Peripherals"), true),
        (
            "4K Webcam",
            Some("With privacy shutter"),
            89.00,
            Some("Video"),
            false,
        ),
        ("Desk Mat", None, 24.00, Some("Accessories"), true),
        ("Studio Microphone", Some("USB condenser"), 149.00, Some("Audio"), false),
    ];

    let now = Utc::now();
    for (name, description, price, category, in_stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, category, in_stock, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category)
        .bind(in_stock)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
    }
    Ok(6)
}

/// Insert demo webinar registrants for the registrants pages.
pub async fn add_sample_registrants(pool: &SqlitePool) -> Result<usize> {
    let registrants = [
        ("Ada Lovelace", "ada@example.com", "Analytical Engines Ltd", "attended", "engineering"),
        ("Grace Hopper", "grace@example.com", "Compilers Inc", "attended", "engineering"),
        ("Tim Berners-Lee", "tim@example.com", "W3", "registered", "marketing"),
        ("Katherine Johnson", "katherine@example.com", "Trajectories LLC", "no_show", "general"),
    ];

    let now = Utc::now();
    let webinar_date = now + Duration::days(7);
    for (name, email, company, status, group) in registrants {
        sqlx::query(
            r#"
            INSERT INTO webinar_registrants
                (id, name, email, company, webinar_title, webinar_date, status, group_name, notes, photo_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(email)
        .bind(company)
        .bind("Building AI-backed Web Apps")
        .bind(webinar_date)
        .bind(status)
        .bind(group)
        .bind(now)
        .execute(pool)
        .await?;
    }
    Ok(4)
}

/// Delete all registrants and reseed fresh demo rows.
pub async fn clear_and_add_registrants(pool: &SqlitePool) -> Result<usize> {
    sqlx::query("DELETE FROM webinar_registrants")
        .execute(pool)
        .await?;
    add_sample_registrants(pool).await
}

/// List all users with their permission flags.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY email")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::db::create_db_pool;

    async fn test_pool() -> (tempfile::TempDir, sqlx::SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        let pool = create_db_pool(&url).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_create_superuser_and_skip_duplicate() {
        let (_dir, pool) = test_pool().await;

        let created = create_superuser(&pool, DEFAULT_SUPERUSER_EMAIL, DEFAULT_SUPERUSER_PASSWORD)
            .await
            .unwrap();
        assert!(created);

        // Second call is a no-op
        let created_again =
            create_superuser(&pool, DEFAULT_SUPERUSER_EMAIL, DEFAULT_SUPERUSER_PASSWORD)
                .await
                .unwrap();
        assert!(!created_again);

        let users = list_users(&pool).await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_superuser);
        assert!(users[0].is_staff);
        assert!(users[0].is_active);
        assert!(verify_password(
            DEFAULT_SUPERUSER_PASSWORD,
            &users[0].hashed_password
        ));
    }

    #[tokio::test]
    async fn test_add_test_users_idempotent() {
        let (_dir, pool) = test_pool().await;

        assert_eq!(add_test_users(&pool).await.unwrap(), 2);
        assert_eq!(add_test_users(&pool).await.unwrap(), 0);

        let users = list_users(&pool).await.unwrap();
        let staff = users.iter().find(|u| u.email == "staff@example.com").unwrap();
        assert!(staff.is_staff);
        assert!(!staff.is_superuser);

        let plain = users.iter().find(|u| u.email == "user@example.com").unwrap();
        assert!(!plain.is_staff_or_admin());
    }

    #[tokio::test]
    async fn test_clear_and_add_registrants() {
        let (_dir, pool) = test_pool().await;

        add_sample_registrants(&pool).await.unwrap();
        add_sample_registrants(&pool).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM webinar_registrants")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 8);

        clear_and_add_registrants(&pool).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM webinar_registrants")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 4);
    }
}
