// Subtask handlers. Card sub-resources require authentication and an
// existing parent card.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    auth::authenticate,
    error::AppError,
    handlers::fetch_card,
    state::AppState,
    types::{CreateSubtaskRequest, SubtaskPayload, UpdateSubtaskRequest},
};

pub(crate) async fn list_subtasks_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<SubtaskPayload>>, AppError> {
    authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let subtasks = state
        .subtask_store
        .list_for_card(card_id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(subtasks.into_iter().map(Into::into).collect()))
}

pub(crate) async fn create_subtask_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<CreateSubtaskRequest>,
) -> Result<Response, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::bad_request("subtask title must not be empty"));
    }

    let user = authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let subtask = state
        .subtask_store
        .create(card_id, payload.title.trim())
        .await
        .map_err(AppError::from_anyhow)?;

    state.credit_streak(user.id).await;

    Ok((StatusCode::CREATED, Json(SubtaskPayload::from(subtask))).into_response())
}

pub(crate) async fn update_subtask_handler(
    State(state): State<AppState>,
    Path(subtask_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateSubtaskRequest>,
) -> Result<Json<SubtaskPayload>, AppError> {
    if let Some(title) = payload.title.as_deref() {
        if title.trim().is_empty() {
            return Err(AppError::bad_request("subtask title must not be empty"));
        }
    }

    let user = authenticate(&state, &headers).await?;

    let subtask = state
        .subtask_store
        .update(
            subtask_id,
            payload.title.as_deref().map(str::trim),
            payload.is_done,
        )
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::card_item_not_found("Subtask", "SUBTASK_NOT_FOUND", subtask_id))?;

    state.credit_streak(user.id).await;

    Ok(Json(SubtaskPayload::from(subtask)))
}

pub(crate) async fn delete_subtask_handler(
    State(state): State<AppState>,
    Path(subtask_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;

    let deleted = state
        .subtask_store
        .delete(subtask_id)
        .await
        .map_err(AppError::from_anyhow)?;

    if !deleted {
        return Err(AppError::card_item_not_found(
            "Subtask",
            "SUBTASK_NOT_FOUND",
            subtask_id,
        ));
    }

    state.credit_streak(user.id).await;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    use crate::test_support::{bearer_headers, seed_card, setup_state};

    #[tokio::test]
    async fn create_toggle_and_delete_round_trip() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (card_id, owner_id) = seed_card(&state).await;

        let response = create_subtask_handler(
            State(state.clone()),
            Path(card_id),
            bearer_headers(&state, owner_id),
            Json(CreateSubtaskRequest {
                title: "Draft outline".into(),
            }),
        )
        .await
        .expect("create subtask");
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let subtask_id = json["id"].as_i64().unwrap();
        assert_eq!(json["is_done"], false);

        let updated = update_subtask_handler(
            State(state.clone()),
            Path(subtask_id),
            bearer_headers(&state, owner_id),
            Json(UpdateSubtaskRequest {
                title: None,
                is_done: Some(true),
            }),
        )
        .await
        .expect("toggle subtask");
        assert!(updated.0.is_done);
        assert_eq!(updated.0.title, "Draft outline");

        let status = delete_subtask_handler(
            State(state.clone()),
            Path(subtask_id),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect("delete subtask");
        assert_eq!(status, StatusCode::NO_CONTENT);

        let listed = list_subtasks_handler(
            State(state.clone()),
            Path(card_id),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect("list subtasks");
        assert!(listed.0.is_empty());
    }

    #[tokio::test]
    async fn subtask_requires_existing_card() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (_card_id, owner_id) = seed_card(&state).await;

        let err = create_subtask_handler(
            State(state.clone()),
            Path(777),
            bearer_headers(&state, owner_id),
            Json(CreateSubtaskRequest {
                title: "Orphan".into(),
            }),
        )
        .await
        .expect_err("missing card");
        let (status, payload) = err.into_payload();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload.name, "CARD_NOT_FOUND");
    }
}
