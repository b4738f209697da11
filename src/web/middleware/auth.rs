// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

use crate::auth::verify_token;
use crate::models::User;
use crate::web::state::AppState;

/// Extractor for authenticated users. Accepts a bearer token or the
/// `access_token` cookie, then loads the user row behind the claims.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        let claims =
            verify_token(&token, &state.settings.secret_key).ok_or(AuthError::InvalidToken)?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&claims.sub)
            .fetch_optional(&state.db_pool)
            .await
            .map_err(|_| AuthError::Internal)?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        Ok(AuthUser(user))
    }
}

/// Extractor that additionally requires staff or superuser privileges.
pub struct RequireStaff(pub User);

#[async_trait]
impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_staff_or_admin() {
            return Err(AuthError::Forbidden);
        }

        Ok(RequireStaff(user))
    }
}

/// Extract a token from the Authorization header or the access_token cookie
fn extract_token(parts: &Parts) -> Result<String, AuthError> {
    // Try Authorization header first (Bearer token)
    if let Some(auth_header) = parts.headers.get("authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Ok(token.to_string());
            }
        }
    }

    // Try cookie
    if let Some(cookie_header) = parts.headers.get("cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split("; ") {
                if let Some(token) = cookie.strip_prefix("access_token=") {
                    return Ok(token.to_string());
                }
            }
        }
    }

    Err(AuthError::MissingToken)
}

/// Authentication errors
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    UserNotFound,
    InactiveUser,
    Forbidden,
    Internal,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "User not found"),
            AuthError::InactiveUser => (StatusCode::UNAUTHORIZED, "Inactive user"),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Not enough permissions - staff or admin access required",
            ),
            AuthError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, _body) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let parts = parts_with_headers(&[("authorization", "Bearer abc123")]);
        assert_eq!(extract_token(&parts).unwrap(), "abc123");
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let parts = parts_with_headers(&[("cookie", "theme=dark; access_token=tok456")]);
        assert_eq!(extract_token(&parts).unwrap(), "tok456");
    }

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let parts = parts_with_headers(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "access_token=cookie-token"),
        ]);
        assert_eq!(extract_token(&parts).unwrap(), "header-token");
    }

    #[test]
    fn test_extract_token_missing() {
        let parts = parts_with_headers(&[]);
        assert_eq!(extract_token(&parts).unwrap_err(), AuthError::MissingToken);
    }

    #[test]
    fn test_extract_token_ignores_non_bearer_auth() {
        let parts = parts_with_headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&parts).unwrap_err(), AuthError::MissingToken);
    }
}
