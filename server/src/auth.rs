// Authentication: argon2 password hashing and bearer JWT sessions.

use argon2::{
    Argon2,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kelarin_core::user::UserRecord;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: i64,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

pub(crate) fn issue_token(secret: &str, user_id: i64, ttl_seconds: i64) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + ttl_seconds,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| AppError::internal(err.into()))
}

pub(crate) fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("invalid or expired token"))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::trim)
}

/// Resolve the authenticated user from the Authorization header.
pub(crate) async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserRecord, AppError> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(AppError::unauthorized("missing bearer token"));
    };

    let claims = verify_token(&state.jwt_secret, token)?;

    state
        .user_store
        .find_by_id(claims.sub)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::unauthorized("unknown user"))
}

pub(crate) async fn authenticate_with_password(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<UserRecord, AppError> {
    let Some(user) = state
        .user_store
        .find_by_email(email)
        .await
        .map_err(AppError::from_anyhow)?
    else {
        return Err(AppError::unauthorized("invalid credentials"));
    };

    if user.password_hash.trim().is_empty() {
        return Err(AppError::unauthorized("invalid credentials"));
    }

    let parsed_hash =
        PasswordHash::new(&user.password_hash).map_err(|err| AppError::internal(err.into()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::unauthorized("invalid credentials"))?;

    Ok(user)
}

pub fn generate_password_hash(password: &str) -> Result<String, PasswordHashError> {
    let mut rng = OsRng;
    let salt = SaltString::generate(&mut rng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bearer_headers, seed_user, setup_state};

    #[test]
    fn token_round_trip_preserves_subject() {
        let token = issue_token("secret", 42, 3600).expect("issue token");
        let claims = verify_token("secret", &token).expect("verify token");
        assert_eq!(claims.sub, 42);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("secret", 42, 3600).expect("issue token");
        let err = verify_token("other-secret", &token).expect_err("must reject");
        let (status, payload) = err.into_payload();
        assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(payload.name, "AUTHENTICATION_REQUIRED");
    }

    #[tokio::test]
    async fn authenticate_resolves_bearer_user() {
        let (_temp_dir, _database, state) = setup_state().await;
        let user = seed_user(&state, "Alice", "alice@example.com").await;

        let headers = bearer_headers(&state, user.id);
        let resolved = authenticate(&state, &headers).await.expect("authenticate");
        assert_eq!(resolved.id, user.id);

        let err = authenticate(&state, &HeaderMap::new())
            .await
            .expect_err("missing header must fail");
        let (status, _) = err.into_payload();
        assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn password_authentication_checks_hash() {
        let (_temp_dir, _database, state) = setup_state().await;
        seed_user(&state, "Alice", "alice@example.com").await;

        let user = authenticate_with_password(&state, "alice@example.com", "password")
            .await
            .expect("valid credentials");
        assert_eq!(user.email, "alice@example.com");

        let err = authenticate_with_password(&state, "alice@example.com", "wrong")
            .await
            .expect_err("wrong password must fail");
        let (status, _) = err.into_payload();
        assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    }
}
