// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fastopp::config::Settings;
use fastopp::db;
use fastopp::seed;
use fastopp::web;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Complete initialization: database + superuser + sample data
    Init,
    /// Initialize the database only (create file, run migrations)
    Db,
    /// Create a superuser account
    Superuser {
        #[arg(long, default_value = seed::DEFAULT_SUPERUSER_EMAIL)]
        email: String,
        #[arg(long, default_value = seed::DEFAULT_SUPERUSER_PASSWORD)]
        password: String,
    },
    /// Add test users (password: test123)
    Users,
    /// Add sample products
    Products,
    /// Add sample webinar registrants
    Registrants,
    /// Clear and re-add fresh webinar registrants
    ClearRegistrants,
    /// List existing users and their permissions
    CheckUsers,
    /// Backup the current database file
    Backup,
    /// Delete the current database file (with backup)
    Delete,
    /// Show applied migration history
    Migrate,
    /// Check environment configuration
    Env,
    /// Start the web server
    Serve {
        /// Port to bind to
        #[arg(long, default_value = "8000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fastopp=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Some(Commands::Init) => {
            println!("🚀 Running full initialization...");
            let pool = db::create_db_pool(&settings.database_url).await?;
            seed::create_superuser(
                &pool,
                seed::DEFAULT_SUPERUSER_EMAIL,
                seed::DEFAULT_SUPERUSER_PASSWORD,
            )
            .await?;
            seed::add_test_users(&pool).await?;
            seed::add_sample_products(&pool).await?;
            seed::add_sample_registrants(&pool).await?;
            println!("✅ Full initialization complete!");
            println!();
            println!("📋 Summary:");
            println!("- Database initialized");
            println!(
                "- Superuser created: {} / {}",
                seed::DEFAULT_SUPERUSER_EMAIL,
                seed::DEFAULT_SUPERUSER_PASSWORD
            );
            println!("- Test users added (password: {})", seed::TEST_USER_PASSWORD);
            println!("- Sample products added");
            println!("- Sample webinar registrants added");
            println!();
            println!("🌐 Ready to start the application with: fastopp serve");
        }
        Some(Commands::Db) => {
            println!("🔄 Initializing database...");
            db::create_db_pool(&settings.database_url).await?;
            println!("✅ Database initialization complete");
        }
        Some(Commands::Superuser { email, password }) => {
            let pool = db::create_db_pool(&settings.database_url).await?;
            if seed::create_superuser(&pool, &email, &password).await? {
                println!("✅ Superuser created: {}", email);
            } else {
                println!("ℹ️  User {} already exists, skipping", email);
            }
        }
        Some(Commands::Users) => {
            let pool = db::create_db_pool(&settings.database_url).await?;
            let added = seed::add_test_users(&pool).await?;
            println!("✅ Test users added: {}", added);
        }
        Some(Commands::Products) => {
            let pool = db::create_db_pool(&settings.database_url).await?;
            let added = seed::add_sample_products(&pool).await?;
            println!("✅ Sample products added: {}", added);
        }
        Some(Commands::Registrants) => {
            let pool = db::create_db_pool(&settings.database_url).await?;
            let added = seed::add_sample_registrants(&pool).await?;
            println!("✅ Sample webinar registrants added: {}", added);
        }
        Some(Commands::ClearRegistrants) => {
            let pool = db::create_db_pool(&settings.database_url).await?;
            let added = seed::clear_and_add_registrants(&pool).await?;
            println!("✅ Fresh webinar registrants added: {}", added);
        }
        Some(Commands::CheckUsers) => {
            let pool = db::create_db_pool(&settings.database_url).await?;
            let users = seed::list_users(&pool).await?;
            if users.is_empty() {
                println!("No users found. Run 'fastopp superuser' first.");
            } else {
                println!("{} user(s):", users.len());
                for user in users {
                    println!(
                        "  {} active={} superuser={} staff={}",
                        user.email, user.is_active, user.is_superuser, user.is_staff
                    );
                }
            }
        }
        Some(Commands::Backup) => match settings.database_path() {
            Some(path) => match db::backup_database(path)? {
                Some(backup) => println!("✅ Database backed up to: {}", backup),
                None => println!("❌ No database file found to backup"),
            },
            None => println!("❌ DATABASE_URL does not point at a file"),
        },
        Some(Commands::Delete) => match settings.database_path() {
            Some(path) => match db::delete_database(path)? {
                Some(backup) => {
                    println!("✅ Database backed up to: {}", backup);
                    println!("✅ Database deleted successfully");
                }
                None => println!("❌ No database file found to delete"),
            },
            None => println!("❌ DATABASE_URL does not point at a file"),
        },
        Some(Commands::Migrate) => {
            let pool = db::create_db_pool(&settings.database_url).await?;
            let history = db::migration_history(&pool).await?;
            println!("Applied migrations ({}):", history.len());
            for migration in history {
                println!("  {} {}", migration.version, migration.description);
            }
        }
        Some(Commands::Env) => {
            print_env_check(&settings);
        }
        Some(Commands::Serve { port }) => {
            let pool = db::create_db_pool(&settings.database_url).await?;

            // Upload directory must exist before the first photo lands
            let photos_dir = std::path::Path::new(&settings.upload_dir).join("photos");
            std::fs::create_dir_all(photos_dir)?;

            let state = web::AppState::new(pool, settings);
            web::server::start_server(state, port).await?;
        }
        None => {
            // Default to serving, like most starters
            let pool = db::create_db_pool(&settings.database_url).await?;
            let state = web::AppState::new(pool, settings);
            web::server::start_server(state, 8000).await?;
        }
    }

    Ok(())
}

fn print_env_check(settings: &Settings) {
    println!("Environment configuration:");
    println!("  DATABASE_URL        = {}", settings.database_url);
    println!(
        "  SECRET_KEY          = {}",
        if settings.secret_key == "SECRET_KEY_CHANGE_ME_IN_PRODUCTION" {
            "(default, insecure)"
        } else {
            "(set)"
        }
    );
    println!("  ENVIRONMENT         = {:?}", settings.environment);
    println!(
        "  OPENROUTER_API_KEY  = {}",
        if settings.openrouter_api_key.is_some() {
            "(set)"
        } else {
            "(not set — AI chat demo disabled)"
        }
    );
    println!("  UPLOAD_DIR          = {}", settings.upload_dir);
}
