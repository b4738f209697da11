// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

//! Session-gated admin panel: CRUD views for users and products, with
//! every mutation recorded in the audit log.

use askama::Template;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::models::{AuditLogEntry, Product, User};
use crate::web::state::AppState;

const SESSION_USER_KEY: &str = "admin_user";

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", get(logout))
        .route("/", get(dashboard))
        .route("/users", get(users_list).post(user_create))
        .route("/users/new", get(user_new_form))
        .route("/users/:id/edit", get(user_edit_form))
        .route("/users/:id", post(user_update))
        .route("/users/:id/delete", post(user_delete))
        .route("/products", get(products_list).post(product_create))
        .route("/products/new", get(product_new_form))
        .route("/products/:id/edit", get(product_edit_form))
        .route("/products/:id", post(product_update))
        .route("/products/:id/delete", post(product_delete))
}

// =============================================================================
// Session extractor
// =============================================================================

/// Extractor carrying the logged-in admin's email. Requests without a
/// valid admin session are redirected to the login page.
pub struct AdminUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = tower_sessions::Session::from_request_parts(parts, state)
            .await
            .map_err(|r| r.into_response())?;

        match session.get::<String>(SESSION_USER_KEY).await {
            Ok(Some(email)) => Ok(AdminUser(email)),
            _ => Err(Redirect::to("/admin/login").into_response()),
        }
    }
}

// =============================================================================
// Audit log
// =============================================================================

async fn record_audit(
    pool: &SqlitePool,
    actor: &str,
    action: &str,
    object_repr: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_log (actor_email, action, object_repr, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(actor)
    .bind(action)
    .bind(object_repr)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    tracing::error!(error = %e, "Admin panel database error");
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
    )
        .into_response()
}

// =============================================================================
// Login / logout
// =============================================================================

#[derive(Template)]
#[template(path = "admin/login.html")]
struct AdminLoginTemplate {
    error: Option<String>,
}

async fn login_page() -> AdminLoginTemplate {
    AdminLoginTemplate { error: None }
}

#[derive(Deserialize)]
struct AdminLoginForm {
    username: String,
    password: String,
}

async fn login_submit(
    State(state): State<AppState>,
    session: tower_sessions::Session,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    let user = match sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(form.username.trim())
        .fetch_optional(&state.db_pool)
        .await
    {
        Ok(user) => user,
        Err(e) => return internal_error(e),
    };

    let valid = user
        .as_ref()
        .map(|u| verify_password(&form.password, &u.hashed_password) && u.is_active)
        .unwrap_or(false);

    let Some(user) = user.filter(|_| valid) else {
        return AdminLoginTemplate {
            error: Some("Invalid email or password".to_string()),
        }
        .into_response();
    };

    if !user.is_superuser {
        return AdminLoginTemplate {
            error: Some("Superuser privileges required".to_string()),
        }
        .into_response();
    }

    if let Err(e) = session.insert(SESSION_USER_KEY, user.email.clone()).await {
        tracing::error!(error = %e, "Failed to set admin session");
        return AdminLoginTemplate {
            error: Some("Session error. Try again.".to_string()),
        }
        .into_response();
    }

    tracing::info!(email = %user.email, "Admin logged in");
    Redirect::to("/admin").into_response()
}

async fn logout(session: tower_sessions::Session) -> Response {
    let _ = session.flush().await;
    Redirect::to("/admin/login").into_response()
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
struct DashboardTemplate {
    admin_email: String,
    user_count: i64,
    product_count: i64,
    registrant_count: i64,
    audit_entries: Vec<AuditLogEntry>,
}

async fn dashboard(
    AdminUser(email): AdminUser,
    State(state): State<AppState>,
) -> Result<DashboardTemplate, Response> {
    let pool = &state.db_pool;

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(internal_error)?;
    let product_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await
        .map_err(internal_error)?;
    let registrant_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM webinar_registrants")
        .fetch_one(pool)
        .await
        .map_err(internal_error)?;

    let audit_entries = sqlx::query_as::<_, AuditLogEntry>(
        "SELECT * FROM audit_log ORDER BY id DESC LIMIT 20",
    )
    .fetch_all(pool)
    .await
    .map_err(internal_error)?;

    Ok(DashboardTemplate {
        admin_email: email,
        user_count,
        product_count,
        registrant_count,
        audit_entries,
    })
}

// =============================================================================
// Users CRUD
// =============================================================================

#[derive(Template)]
#[template(path = "admin/users_list.html")]
struct UsersListTemplate {
    users: Vec<User>,
}

async fn users_list(
    AdminUser(_email): AdminUser,
    State(state): State<AppState>,
) -> Result<UsersListTemplate, Response> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY email")
        .fetch_all(&state.db_pool)
        .await
        .map_err(internal_error)?;
    Ok(UsersListTemplate { users })
}

#[derive(Template)]
#[template(path = "admin/user_form.html")]
struct UserFormTemplate {
    heading: String,
    action: String,
    is_new: bool,
    email: String,
    is_active: bool,
    is_superuser: bool,
    is_staff: bool,
    error: Option<String>,
}

impl UserFormTemplate {
    fn new_user() -> Self {
        Self {
            heading: "New user".to_string(),
            action: "/admin/users".to_string(),
            is_new: true,
            email: String::new(),
            is_active: true,
            is_superuser: false,
            is_staff: false,
            error: None,
        }
    }

    fn for_user(user: &User) -> Self {
        Self {
            heading: format!("Edit {}", user.email),
            action: format!("/admin/users/{}", user.id),
            is_new: false,
            email: user.email.clone(),
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            is_staff: user.is_staff,
            error: None,
        }
    }
}

async fn user_new_form(AdminUser(_email): AdminUser) -> UserFormTemplate {
    UserFormTemplate::new_user()
}

#[derive(Deserialize)]
struct UserForm {
    email: String,
    #[serde(default)]
    password: String,
    is_active: Option<String>,
    is_superuser: Option<String>,
    is_staff: Option<String>,
}

// HTML checkboxes post "on" when checked and are absent otherwise
fn checked(field: &Option<String>) -> bool {
    field.is_some()
}

async fn user_create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Response {
    let email = form.email.trim().to_string();
    if email.is_empty() || form.password.is_empty() {
        let mut template = UserFormTemplate::new_user();
        template.email = email;
        template.error = Some("Email and password are required".to_string());
        return template.into_response();
    }

    let hashed = match hash_password(&form.password) {
        Ok(h) => h,
        Err(e) => return internal_error(e),
    };

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, email, hashed_password, is_active, is_superuser, is_staff, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&email)
    .bind(hashed)
    .bind(checked(&form.is_active))
    .bind(checked(&form.is_superuser))
    .bind(checked(&form.is_staff))
    .bind(Utc::now())
    .execute(&state.db_pool)
    .await;

    if result.is_err() {
        let mut template = UserFormTemplate::new_user();
        template.email = email;
        template.error = Some("A user with that email already exists".to_string());
        return template.into_response();
    }

    if let Err(e) = record_audit(&state.db_pool, &admin, "user.create", &email).await {
        return internal_error(e);
    }
    Redirect::to("/admin/users").into_response()
}

async fn user_edit_form(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<UserFormTemplate, Response> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db_pool)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| {
            (axum::http::StatusCode::NOT_FOUND, "User not found").into_response()
        })?;

    Ok(UserFormTemplate::for_user(&user))
}

async fn user_update(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<UserForm>,
) -> Response {
    let email = form.email.trim().to_string();

    let result = sqlx::query(
        "UPDATE users SET email = ?, is_active = ?, is_superuser = ?, is_staff = ? WHERE id = ?",
    )
    .bind(&email)
    .bind(checked(&form.is_active))
    .bind(checked(&form.is_superuser))
    .bind(checked(&form.is_staff))
    .bind(&id)
    .execute(&state.db_pool)
    .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => {
            return (axum::http::StatusCode::NOT_FOUND, "User not found").into_response()
        }
        Ok(_) => {}
        Err(e) => return internal_error(e),
    }

    // Optional password reset on edit
    if !form.password.is_empty() {
        let hashed = match hash_password(&form.password) {
            Ok(h) => h,
            Err(e) => return internal_error(e),
        };
        if let Err(e) = sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
            .bind(hashed)
            .bind(&id)
            .execute(&state.db_pool)
            .await
        {
            return internal_error(e);
        }
    }

    if let Err(e) = record_audit(&state.db_pool, &admin, "user.update", &email).await {
        return internal_error(e);
    }
    Redirect::to("/admin/users").into_response()
}

async fn user_delete(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let user = match sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db_pool)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return (axum::http::StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) => return internal_error(e),
    };

    if let Err(e) = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&id)
        .execute(&state.db_pool)
        .await
    {
        return internal_error(e);
    }

    if let Err(e) = record_audit(&state.db_pool, &admin, "user.delete", &user.email).await {
        return internal_error(e);
    }
    Redirect::to("/admin/users").into_response()
}

// =============================================================================
// Products CRUD
// =============================================================================

#[derive(Template)]
#[template(path = "admin/products_list.html")]
struct ProductsListTemplate {
    products: Vec<Product>,
}

async fn products_list(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<ProductsListTemplate, Response> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name")
        .fetch_all(&state.db_pool)
        .await
        .map_err(internal_error)?;
    Ok(ProductsListTemplate { products })
}

#[derive(Template)]
#[template(path = "admin/product_form.html")]
struct ProductFormTemplate {
    heading: String,
    action: String,
    name: String,
    description: String,
    price: String,
    category: String,
    in_stock: bool,
    error: Option<String>,
}

impl ProductFormTemplate {
    fn new_product() -> Self {
        Self {
            heading: "New product".to_string(),
            action: "/admin/products".to_string(),
            name: String::new(),
            description: String::new(),
            price: String::new(),
            category: String::new(),
            in_stock: true,
            error: None,
        }
    }

    fn for_product(product: &Product) -> Self {
        Self {
            heading: format!("Edit {}", product.name),
            action: format!("/admin/products/{}", product.id),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: format!("{:.2}", product.price),
            category: product.category.clone().unwrap_or_default(),
            in_stock: product.in_stock,
            error: None,
        }
    }
}

async fn product_new_form(AdminUser(_admin): AdminUser) -> ProductFormTemplate {
    ProductFormTemplate::new_product()
}

#[derive(Deserialize)]
struct ProductForm {
    name: String,
    #[serde(default)]
    description: String,
    price: String,
    #[serde(default)]
    category: String,
    in_stock: Option<String>,
}

fn empty_to_none(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn invalid_product_form(form: ProductForm, message: &str) -> ProductFormTemplate {
    let mut template = ProductFormTemplate::new_product();
    template.name = form.name;
    template.description = form.description;
    template.price = form.price;
    template.category = form.category;
    template.in_stock = checked(&form.in_stock);
    template.error = Some(message.to_string());
    template
}

async fn product_create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Response {
    if form.name.trim().is_empty() {
        return invalid_product_form(form, "Name is required").into_response();
    }
    let Ok(price) = form.price.trim().parse::<f64>() else {
        return invalid_product_form(form, "Price must be a number").into_response();
    };

    let now = Utc::now();
    let name = form.name.trim().to_string();
    let result = sqlx::query(
        r#"
        INSERT INTO products (id, name, description, price, category, in_stock, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&name)
    .bind(empty_to_none(form.description.clone()))
    .bind(price)
    .bind(empty_to_none(form.category.clone()))
    .bind(checked(&form.in_stock))
    .bind(now)
    .bind(now)
    .execute(&state.db_pool)
    .await;

    if let Err(e) = result {
        return internal_error(e);
    }

    if let Err(e) = record_audit(&state.db_pool, &admin, "product.create", &name).await {
        return internal_error(e);
    }
    Redirect::to("/admin/products").into_response()
}

async fn product_edit_form(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate, Response> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db_pool)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| {
            (axum::http::StatusCode::NOT_FOUND, "Product not found").into_response()
        })?;

    Ok(ProductFormTemplate::for_product(&product))
}

async fn product_update(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Response {
    let Ok(price) = form.price.trim().parse::<f64>() else {
        return invalid_product_form(form, "Price must be a number").into_response();
    };

    let name = form.name.trim().to_string();
    let result = sqlx::query(
        r#"
        UPDATE products
        SET name = ?, description = ?, price = ?, category = ?, in_stock = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(empty_to_none(form.description.clone()))
    .bind(price)
    .bind(empty_to_none(form.category.clone()))
    .bind(checked(&form.in_stock))
    .bind(Utc::now())
    .bind(&id)
    .execute(&state.db_pool)
    .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => {
            return (axum::http::StatusCode::NOT_FOUND, "Product not found").into_response()
        }
        Ok(_) => {}
        Err(e) => return internal_error(e),
    }

    if let Err(e) = record_audit(&state.db_pool, &admin, "product.update", &name).await {
        return internal_error(e);
    }
    Redirect::to("/admin/products").into_response()
}

async fn product_delete(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let product = match sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db_pool)
        .await
    {
        Ok(Some(product)) => product,
        Ok(None) => {
            return (axum::http::StatusCode::NOT_FOUND, "Product not found").into_response()
        }
        Err(e) => return internal_error(e),
    };

    if let Err(e) = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(&id)
        .execute(&state.db_pool)
        .await
    {
        return internal_error(e);
    }

    if let Err(e) = record_audit(&state.db_pool, &admin, "product.delete", &product.name).await {
        return internal_error(e);
    }
    Redirect::to("/admin/products").into_response()
}
