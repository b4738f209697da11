// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::web::{routes, state::AppState};

/// Create the Axum router with all routes
pub fn create_app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.settings.environment.is_production());

    let router = Router::new()
        // Health check endpoints (generic, kubernetes, leapcell)
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/kaithhealthcheck", get(health_check))
        // Pages
        .route("/", get(routes::pages::index))
        .route("/webinar-registrants", get(routes::pages::webinar_registrants))
        // Authentication routes
        .route(
            "/login",
            get(routes::auth::login_page).post(routes::auth::login_form),
        )
        .route("/logout", get(routes::auth::logout))
        .route("/api/auth/login", post(routes::auth::token_login))
        // API endpoints
        .route("/api/products", get(routes::api::get_products))
        .route("/api/registrants", get(routes::api::get_registrants))
        .route(
            "/api/webinar-attendees",
            get(routes::api::get_webinar_attendees),
        )
        .route(
            "/api/registrants/:id/photo",
            post(routes::api::upload_registrant_photo)
                .delete(routes::api::delete_registrant_photo),
        )
        .route(
            "/api/registrants/:id/notes",
            post(routes::api::update_registrant_notes),
        )
        // Admin panel (session-gated)
        .nest("/admin", routes::admin::admin_router());

    #[cfg(feature = "demo")]
    let router = router
        .route("/dashboard-demo", get(routes::pages::dashboard_demo))
        .route("/webinar-demo", get(routes::pages::webinar_demo))
        .route("/ai-demo", get(routes::pages::ai_demo))
        .route("/ai-stats", get(routes::pages::ai_stats))
        .route("/api/chat", post(routes::chat::chat));

    router
        // Static file serving (uploads land under static/uploads/)
        .nest_service("/static", ServeDir::new("static"))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        // Share app state
        .with_state(state)
}

/// Start the web server
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Server starting on http://{}", addr);
    println!("🔧 Admin panel: http://{}/admin", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
