// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use askama::Template;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{create_user_token, verify_password, ACCESS_TOKEN_EXPIRE_MINUTES};
use crate::models::User;
use crate::web::state::AppState;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    title: String,
    error: Option<String>,
    demo_enabled: bool,
}

fn render_login(error: Option<String>) -> Result<Html<String>, StatusCode> {
    let template = LoginTemplate {
        title: "Login".to_string(),
        error,
        demo_enabled: crate::web::routes::pages::DEMO_ENABLED,
    };
    Ok(Html(
        template
            .render()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    ))
}

/// Login page for webinar registrants access
pub async fn login_page() -> Result<Html<String>, StatusCode> {
    render_login(None)
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

async fn find_user_by_email(state: &AppState, email: &str) -> Result<Option<User>, StatusCode> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.db_pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Handle the HTML login form: verify credentials, require staff or
/// superuser, then set the access_token cookie and redirect.
pub async fn login_form(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, StatusCode> {
    if form.username.is_empty() || form.password.is_empty() {
        return Ok(render_login(Some(
            "Please provide both email and password".to_string(),
        ))?
        .into_response());
    }

    let Some(user) = find_user_by_email(&state, &form.username).await? else {
        return Ok(render_login(Some("Invalid email or password".to_string()))?.into_response());
    };

    if !verify_password(&form.password, &user.hashed_password) {
        return Ok(render_login(Some("Invalid email or password".to_string()))?.into_response());
    }

    if !user.is_active {
        return Ok(render_login(Some("Account is inactive".to_string()))?.into_response());
    }

    if !user.is_staff_or_admin() {
        return Ok(render_login(Some(
            "Access denied. Staff or admin privileges required.".to_string(),
        ))?
        .into_response());
    }

    let token = create_user_token(&user, &state.settings.secret_key)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    tracing::info!(email = %user.email, "User logged in");

    let mut cookie = format!(
        "access_token={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token,
        ACCESS_TOKEN_EXPIRE_MINUTES * 60
    );
    if state.settings.environment.is_production() {
        cookie.push_str("; Secure");
    }

    Ok((
        StatusCode::FOUND,
        [
            (header::SET_COOKIE, cookie),
            (header::LOCATION, "/webinar-registrants".to_string()),
        ],
    )
        .into_response())
}

/// Logout handler - clears cookie and redirects to the home page
pub async fn logout() -> impl IntoResponse {
    let cookie = "access_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0".to_string();

    (
        StatusCode::FOUND,
        [
            (header::SET_COOKIE, cookie),
            (header::LOCATION, "/".to_string()),
        ],
    )
}

#[derive(Deserialize)]
pub struct TokenRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// JSON login endpoint returning a bearer token for API calls.
pub async fn token_login(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, Response> {
    let unauthorized = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid email or password"})),
        )
            .into_response()
    };

    let user = find_user_by_email(&state, &body.email)
        .await
        .map_err(|s| s.into_response())?
        .ok_or_else(unauthorized)?;

    if !verify_password(&body.password, &user.hashed_password) || !user.is_active {
        return Err(unauthorized());
    }

    let token = create_user_token(&user, &state.settings.secret_key)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
