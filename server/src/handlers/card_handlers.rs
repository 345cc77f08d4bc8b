// Card handlers. Reads need workspace membership through the board list,
// mutations need a privileged role.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    auth::authenticate,
    error::AppError,
    handlers::{fetch_card, require_member, require_privileged},
    state::AppState,
    types::{CardPayload, CreateCardRequest, UpdateCardRequest},
};

async fn workspace_of_card(state: &AppState, card_id: i64) -> Result<i64, AppError> {
    state
        .card_store
        .workspace_id_for_card(card_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::card_not_found(card_id))
}

pub(crate) async fn list_cards_handler(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<CardPayload>>, AppError> {
    let user = authenticate(&state, &headers).await?;

    let list = state
        .board_list_store
        .find_by_id(list_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::list_not_found(list_id))?;
    require_member(&state, user.id, list.workspace_id).await?;

    let cards = state
        .card_store
        .list_for_board_list(list_id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

pub(crate) async fn create_card_handler(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<CreateCardRequest>,
) -> Result<Response, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::bad_request("card title must not be empty"));
    }

    let user = authenticate(&state, &headers).await?;

    let list = state
        .board_list_store
        .find_by_id(list_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::list_not_found(list_id))?;
    require_privileged(&state, user.id, list.workspace_id).await?;

    let card = state
        .card_store
        .create(
            list_id,
            payload.title.trim(),
            payload.description.as_deref(),
            payload.deadline,
        )
        .await
        .map_err(AppError::from_anyhow)?;

    state.credit_streak(user.id).await;

    Ok((StatusCode::CREATED, Json(CardPayload::from(card))).into_response())
}

pub(crate) async fn get_card_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<CardPayload>, AppError> {
    let user = authenticate(&state, &headers).await?;

    let card = fetch_card(&state, card_id).await?;
    let workspace_id = workspace_of_card(&state, card_id).await?;
    require_member(&state, user.id, workspace_id).await?;

    Ok(Json(CardPayload::from(card)))
}

pub(crate) async fn update_card_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<CardPayload>, AppError> {
    if let Some(title) = payload.title.as_deref() {
        if title.trim().is_empty() {
            return Err(AppError::bad_request("card title must not be empty"));
        }
    }

    let user = authenticate(&state, &headers).await?;

    let workspace_id = workspace_of_card(&state, card_id).await?;
    require_privileged(&state, user.id, workspace_id).await?;

    let card = state
        .card_store
        .update(
            card_id,
            payload.title.as_deref().map(str::trim),
            payload.description.as_deref(),
            payload.deadline,
        )
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::card_not_found(card_id))?;

    state.credit_streak(user.id).await;

    Ok(Json(CardPayload::from(card)))
}

pub(crate) async fn delete_card_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;

    let workspace_id = workspace_of_card(&state, card_id).await?;
    require_privileged(&state, user.id, workspace_id).await?;

    let deleted = state
        .card_store
        .delete(card_id)
        .await
        .map_err(AppError::from_anyhow)?;

    if !deleted {
        return Err(AppError::card_not_found(card_id));
    }

    state.credit_streak(user.id).await;

    Ok(StatusCode::NO_CONTENT)
}
