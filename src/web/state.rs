// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use crate::config::Settings;
use sqlx::SqlitePool;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub settings: Settings,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, settings: Settings) -> Self {
        Self { db_pool, settings }
    }
}
