// Board list handlers. Reads need workspace membership, mutations need
// a privileged role.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    auth::authenticate,
    error::AppError,
    handlers::{require_member, require_privileged},
    state::AppState,
    types::{BoardListPayload, CreateBoardListRequest, UpdateBoardListRequest},
};

pub(crate) async fn list_board_lists_handler(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<BoardListPayload>>, AppError> {
    let user = authenticate(&state, &headers).await?;
    require_member(&state, user.id, workspace_id).await?;

    let lists = state
        .board_list_store
        .list_for_workspace(workspace_id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(lists.into_iter().map(Into::into).collect()))
}

pub(crate) async fn create_board_list_handler(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<CreateBoardListRequest>,
) -> Result<Response, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("list name must not be empty"));
    }

    let user = authenticate(&state, &headers).await?;
    require_privileged(&state, user.id, workspace_id).await?;

    let list = state
        .board_list_store
        .create(workspace_id, payload.name.trim())
        .await
        .map_err(AppError::from_anyhow)?;

    state.credit_streak(user.id).await;

    Ok((StatusCode::CREATED, Json(BoardListPayload::from(list))).into_response())
}

pub(crate) async fn update_board_list_handler(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateBoardListRequest>,
) -> Result<Json<BoardListPayload>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("list name must not be empty"));
    }

    let user = authenticate(&state, &headers).await?;

    let list = state
        .board_list_store
        .find_by_id(list_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::list_not_found(list_id))?;
    require_privileged(&state, user.id, list.workspace_id).await?;

    let renamed = state
        .board_list_store
        .rename(list_id, payload.name.trim())
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::list_not_found(list_id))?;

    state.credit_streak(user.id).await;

    Ok(Json(BoardListPayload::from(renamed)))
}

pub(crate) async fn delete_board_list_handler(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;

    let list = state
        .board_list_store
        .find_by_id(list_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::list_not_found(list_id))?;
    require_privileged(&state, user.id, list.workspace_id).await?;

    let deleted = state
        .board_list_store
        .delete(list_id)
        .await
        .map_err(AppError::from_anyhow)?;

    if !deleted {
        return Err(AppError::list_not_found(list_id));
    }

    state.credit_streak(user.id).await;

    Ok(StatusCode::NO_CONTENT)
}
