#![allow(dead_code)]

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use kelarin_core::{config::AppConfig, db::Database, user::UserRecord};
use tempfile::TempDir;

use crate::{
    auth::{generate_password_hash, issue_token},
    state::{AppState, build_state},
};

/// A fresh state over a temporary on-disk database. Keep the returned
/// TempDir alive for the duration of the test.
pub(crate) async fn setup_state() -> (TempDir, Database, AppState) {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let mut config = AppConfig::default();
    config.database_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .into_owned();
    config.jwt_secret = "test-secret".to_owned();

    let database = Database::connect(&config).await.expect("connect database");
    let state = build_state(&database, &config);

    (temp_dir, database, state)
}

/// All seeded users share the password "password".
pub(crate) async fn seed_user(state: &AppState, full_name: &str, email: &str) -> UserRecord {
    let hash = generate_password_hash("password").expect("hash password");
    state
        .user_store
        .create(full_name, email, &hash)
        .await
        .expect("create user")
}

pub(crate) async fn seed_workspace(state: &AppState) -> (i64, i64) {
    let owner = seed_user(state, "Tester", "tester@example.com").await;
    let workspace = state
        .workspace_store
        .create(owner.id, "Test Workspace", None)
        .await
        .expect("create workspace");
    (workspace.id, owner.id)
}

pub(crate) async fn seed_board_list(state: &AppState) -> (i64, i64, i64) {
    let (workspace_id, owner_id) = seed_workspace(state).await;
    let list = state
        .board_list_store
        .create(workspace_id, "To Do")
        .await
        .expect("create board list");
    (list.id, workspace_id, owner_id)
}

pub(crate) async fn seed_card(state: &AppState) -> (i64, i64) {
    let (list_id, _workspace_id, owner_id) = seed_board_list(state).await;
    let card = state
        .card_store
        .create(list_id, "Task", None, None)
        .await
        .expect("create card");
    (card.id, owner_id)
}

pub(crate) fn bearer_headers(state: &AppState, user_id: i64) -> HeaderMap {
    let token = issue_token(&state.jwt_secret, user_id, state.jwt_ttl_seconds).expect("issue token");
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
    );
    headers
}
