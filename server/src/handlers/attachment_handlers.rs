// Card attachment handlers. Attachments are stored as URL references,
// the files themselves live in external storage.

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
    types::{AttachmentPayload, CreateAttachmentRequest, UpdateAttachmentRequest},
};

pub(crate) async fn list_attachments_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<AttachmentPayload>>, AppError> {
    authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let attachments = state
        .attachment_store
        .list_for_card(card_id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(attachments.into_iter().map(Into::into).collect()))
}

pub(crate) async fn create_attachment_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<CreateAttachmentRequest>,
) -> Result<Response, AppError> {
    if payload.file_name.trim().is_empty() {
        return Err(AppError::bad_request("file_name must not be empty"));
    }
    if payload.url.trim().is_empty() {
        return Err(AppError::bad_request("url must not be empty"));
    }

    let user = authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let attachment = state
        .attachment_store
        .create(card_id, payload.file_name.trim(), payload.url.trim())
        .await
        .map_err(AppError::from_anyhow)?;

    state.credit_streak(user.id).await;

    Ok((StatusCode::CREATED, Json(AttachmentPayload::from(attachment))).into_response())
}

pub(crate) async fn update_attachment_handler(
    State(state): State<AppState>,
    Path(attachment_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateAttachmentRequest>,
) -> Result<Json<AttachmentPayload>, AppError> {
    if let Some(file_name) = payload.file_name.as_deref() {
        if file_name.trim().is_empty() {
            return Err(AppError::bad_request("file_name must not be empty"));
        }
    }
    if let Some(url) = payload.url.as_deref() {
        if url.trim().is_empty() {
            return Err(AppError::bad_request("url must not be empty"));
        }
    }

    let user = authenticate(&state, &headers).await?;

    let attachment = state
        .attachment_store
        .update(
            attachment_id,
            payload.file_name.as_deref().map(str::trim),
            payload.url.as_deref().map(str::trim),
        )
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| {
            AppError::card_item_not_found("Attachment", "ATTACHMENT_NOT_FOUND", attachment_id)
        })?;

    state.credit_streak(user.id).await;

    Ok(Json(AttachmentPayload::from(attachment)))
}

pub(crate) async fn delete_attachment_handler(
    State(state): State<AppState>,
    Path(attachment_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;

    let deleted = state
        .attachment_store
        .delete(attachment_id)
        .await
        .map_err(AppError::from_anyhow)?;

    if !deleted {
        return Err(AppError::card_item_not_found(
            "Attachment",
            "ATTACHMENT_NOT_FOUND",
            attachment_id,
        ));
    }

    state.credit_streak(user.id).await;

    Ok(StatusCode::NO_CONTENT)
}
