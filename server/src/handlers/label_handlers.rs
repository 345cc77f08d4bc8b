// Card label handlers.

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
    types::{CreateLabelRequest, LabelPayload, UpdateLabelRequest},
};

pub(crate) async fn list_labels_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<LabelPayload>>, AppError> {
    authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let labels = state
        .label_store
        .list_for_card(card_id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(labels.into_iter().map(Into::into).collect()))
}

pub(crate) async fn create_label_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<CreateLabelRequest>,
) -> Result<Response, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("label name must not be empty"));
    }
    if payload.color.trim().is_empty() {
        return Err(AppError::bad_request("label color must not be empty"));
    }

    let user = authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let label = state
        .label_store
        .create(card_id, payload.name.trim(), payload.color.trim())
        .await
        .map_err(AppError::from_anyhow)?;

    state.credit_streak(user.id).await;

    Ok((StatusCode::CREATED, Json(LabelPayload::from(label))).into_response())
}

pub(crate) async fn update_label_handler(
    State(state): State<AppState>,
    Path(label_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateLabelRequest>,
) -> Result<Json<LabelPayload>, AppError> {
    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("label name must not be empty"));
        }
    }
    if let Some(color) = payload.color.as_deref() {
        if color.trim().is_empty() {
            return Err(AppError::bad_request("label color must not be empty"));
        }
    }

    let user = authenticate(&state, &headers).await?;

    let label = state
        .label_store
        .update(
            label_id,
            payload.name.as_deref().map(str::trim),
            payload.color.as_deref().map(str::trim),
        )
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::card_item_not_found("Label", "LABEL_NOT_FOUND", label_id))?;

    state.credit_streak(user.id).await;

    Ok(Json(LabelPayload::from(label)))
}

pub(crate) async fn delete_label_handler(
    State(state): State<AppState>,
    Path(label_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;

    let deleted = state
        .label_store
        .delete(label_id)
        .await
        .map_err(AppError::from_anyhow)?;

    if !deleted {
        return Err(AppError::card_item_not_found(
            "Label",
            "LABEL_NOT_FOUND",
            label_id,
        ));
    }

    state.credit_streak(user.id).await;

    Ok(StatusCode::NO_CONTENT)
}
