// Registration, login, and profile handlers.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use kelarin_core::db::is_unique_violation;

use crate::{
    auth::{authenticate, authenticate_with_password, generate_password_hash, issue_token},
    error::AppError,
    state::AppState,
    types::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UserPayload},
};

pub(crate) async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    if payload.full_name.trim().is_empty() {
        return Err(AppError::bad_request("full_name must not be empty"));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError::bad_request("email must not be empty"));
    }
    if payload.password.is_empty() {
        return Err(AppError::bad_request("password must not be empty"));
    }

    let password_hash =
        generate_password_hash(&payload.password).map_err(|err| AppError::internal(err.into()))?;

    let user = match state
        .user_store
        .create(payload.full_name.trim(), payload.email.trim(), &password_hash)
        .await
    {
        Ok(user) => user,
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::conflict("email is already registered"));
        }
        Err(err) => return Err(AppError::from_anyhow(err)),
    };

    let token = issue_token(&state.jwt_secret, user.id, state.jwt_ttl_seconds)?;
    let response = AuthResponse {
        token,
        user: UserPayload::from(user),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

pub(crate) async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }

    let user = authenticate_with_password(&state, payload.email.trim(), &payload.password).await?;
    let token = issue_token(&state.jwt_secret, user.id, state.jwt_ttl_seconds)?;

    Ok(Json(AuthResponse {
        token,
        user: UserPayload::from(user),
    }))
}

pub(crate) async fn profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = authenticate(&state, &headers).await?;

    let workspaces = state
        .workspace_store
        .list_accessible(user.id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(ProfileResponse {
        user: UserPayload::from(user),
        workspaces: workspaces.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    use crate::test_support::{bearer_headers, seed_user, setup_state};

    #[tokio::test]
    async fn register_returns_token_and_user() {
        let (_temp_dir, _database, state) = setup_state().await;

        let response = register_handler(
            State(state),
            Json(RegisterRequest {
                full_name: "Alice Smith".into(),
                email: "alice@example.com".into(),
                password: "password".into(),
            }),
        )
        .await
        .expect("register");

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!json["token"].as_str().unwrap().is_empty());
        assert_eq!(json["user"]["email"], "alice@example.com");
        assert_eq!(json["user"]["streak"], 0);
        assert_eq!(json["user"]["has_streak_today"], false);
        assert!(json["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let (_temp_dir, _database, state) = setup_state().await;
        seed_user(&state, "Alice", "alice@example.com").await;

        let err = register_handler(
            State(state),
            Json(RegisterRequest {
                full_name: "Other Alice".into(),
                email: "alice@example.com".into(),
                password: "password".into(),
            }),
        )
        .await
        .expect_err("duplicate email must conflict");

        let (status, payload) = err.into_payload();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(payload.name, "RESOURCE_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn login_round_trip_and_profile() {
        let (_temp_dir, _database, state) = setup_state().await;
        let user = seed_user(&state, "Alice", "alice@example.com").await;

        let response = login_handler(
            State(state.clone()),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: "password".into(),
            }),
        )
        .await
        .expect("login");
        assert_eq!(response.0.user.id, user.id);

        let profile = profile_handler(State(state.clone()), bearer_headers(&state, user.id))
            .await
            .expect("profile");
        assert_eq!(profile.0.user.email, "alice@example.com");
        assert!(profile.0.workspaces.is_empty());
    }

    #[tokio::test]
    async fn login_rejects_bad_password() {
        let (_temp_dir, _database, state) = setup_state().await;
        seed_user(&state, "Alice", "alice@example.com").await;

        let err = login_handler(
            State(state),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: "nope".into(),
            }),
        )
        .await
        .expect_err("bad password must fail");

        let (status, _) = err.into_payload();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
