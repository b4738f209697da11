// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:fastopp.db";
const DEFAULT_SECRET_KEY: &str = "SECRET_KEY_CHANGE_ME_IN_PRODUCTION";
const DEFAULT_UPLOAD_DIR: &str = "static/uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Application settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub secret_key: String,
    pub environment: Environment,
    pub openrouter_api_key: Option<String>,
    pub upload_dir: String,
}

impl Settings {
    pub fn from_env() -> Self {
        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            println!("⚠️  Warning: SECRET_KEY not set, using default (insecure for production!)");
            DEFAULT_SECRET_KEY.to_string()
        });

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            secret_key,
            environment: Environment::parse(
                &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            ),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok(),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
        }
    }

    /// Filesystem path of the SQLite database, if the URL points at a file.
    pub fn database_path(&self) -> Option<&str> {
        let path = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_db_url(url: &str) -> Settings {
        Settings {
            database_url: url.to_string(),
            secret_key: "test-secret".to_string(),
            environment: Environment::Development,
            openrouter_api_key: None,
            upload_dir: DEFAULT_UPLOAD_DIR.to_string(),
        }
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("PROD"), Environment::Production);
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("anything-else"), Environment::Development);
    }

    #[test]
    fn test_environment_is_production() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Development.is_production());
    }

    #[test]
    fn test_database_path_from_plain_url() {
        let settings = settings_with_db_url("sqlite:fastopp.db");
        assert_eq!(settings.database_path(), Some("fastopp.db"));
    }

    #[test]
    fn test_database_path_from_double_slash_url() {
        let settings = settings_with_db_url("sqlite://data/fastopp.db");
        assert_eq!(settings.database_path(), Some("data/fastopp.db"));
    }

    #[test]
    fn test_database_path_memory_has_no_file() {
        let settings = settings_with_db_url("sqlite::memory:");
        assert_eq!(settings.database_path(), None);
    }

    #[test]
    fn test_database_path_non_sqlite_url() {
        let settings = settings_with_db_url("postgres://localhost/app");
        assert_eq!(settings.database_path(), None);
    }
}
