// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Access tokens are short-lived; there is no refresh mechanism.
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// JWT claims carried by the access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (uuid string)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Create a signed access token for a user.
pub fn create_user_token(user: &User, secret: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES)).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate a token and return its claims, or None if the token is
/// expired, tampered with, or otherwise malformed.
pub fn verify_token(token: &str, secret: &str) -> Option<Claims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .ok()
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against an Argon2 PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn test_user() -> User {
        User {
            id: "5f8c1a9e-0000-4000-8000-000000000001".to_string(),
            email: "user@example.com".to_string(),
            hashed_password: String::new(),
            is_active: true,
            is_superuser: false,
            is_staff: true,
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "my-secure-password-123";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_hash_password_produces_unique_hashes() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Different salts produce different hashes
        assert_ne!(hash1, hash2);

        // But both verify correctly
        assert!(verify_password(password, &hash1));
        assert!(verify_password(password, &hash2));
    }

    #[test]
    fn test_password_hash_contains_argon2_marker() {
        let hash = hash_password("test").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_rejects_invalid_hash() {
        assert!(!verify_password("test", "not-a-valid-hash"));
        assert!(!verify_password("test", ""));
    }

    #[test]
    fn test_create_and_verify_token() {
        let user = test_user();
        let token = create_user_token(&user, "secret").unwrap();

        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user.id);
        assert!(claims.exp > claims.iat);
        assert_eq!(
            claims.exp - claims.iat,
            ACCESS_TOKEN_EXPIRE_MINUTES * 60
        );
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let user = test_user();
        let token = create_user_token(&user, "secret").unwrap();
        assert!(verify_token(&token, "other-secret").is_none());
    }

    #[test]
    fn test_verify_token_garbage() {
        assert!(verify_token("not.a.jwt", "secret").is_none());
        assert!(verify_token("", "secret").is_none());
    }

    #[test]
    fn test_verify_token_expired() {
        // Hand-roll a token whose exp is in the past
        let now = Utc::now();
        let claims = Claims {
            sub: "someone".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(verify_token(&token, "secret").is_none());
    }
}
