// Workspace CRUD and collaborator management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use kelarin_core::{access::WorkspaceRole, db::is_unique_violation};

use crate::{
    auth::authenticate,
    error::AppError,
    handlers::{require_member, require_owner},
    state::AppState,
    types::{
        CollaboratorPayload, CreateWorkspaceRequest, ShareWorkspaceRequest,
        UpdateCollaboratorRequest, UpdateWorkspaceRequest, WorkspacePayload,
    },
};

pub(crate) async fn list_workspaces_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<WorkspacePayload>>, AppError> {
    let user = authenticate(&state, &headers).await?;

    let workspaces = state
        .workspace_store
        .list_accessible(user.id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(workspaces.into_iter().map(Into::into).collect()))
}

pub(crate) async fn create_workspace_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateWorkspaceRequest>,
) -> Result<Response, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("workspace name must not be empty"));
    }

    let user = authenticate(&state, &headers).await?;

    let workspace = state
        .workspace_store
        .create(user.id, payload.name.trim(), payload.description.as_deref())
        .await
        .map_err(AppError::from_anyhow)?;

    state.credit_streak(user.id).await;

    Ok((StatusCode::CREATED, Json(WorkspacePayload::from(workspace))).into_response())
}

pub(crate) async fn get_workspace_handler(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<WorkspacePayload>, AppError> {
    let user = authenticate(&state, &headers).await?;
    require_member(&state, user.id, workspace_id).await?;

    let workspace = state
        .workspace_store
        .find_by_id(workspace_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::workspace_not_found(workspace_id))?;

    Ok(Json(WorkspacePayload::from(workspace)))
}

pub(crate) async fn update_workspace_handler(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateWorkspaceRequest>,
) -> Result<Json<WorkspacePayload>, AppError> {
    let user = authenticate(&state, &headers).await?;
    require_owner(&state, user.id, workspace_id).await?;

    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("workspace name must not be empty"));
        }
    }

    let workspace = state
        .workspace_store
        .update(
            workspace_id,
            payload.name.as_deref().map(str::trim),
            payload.description.as_deref(),
        )
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::workspace_not_found(workspace_id))?;

    state.credit_streak(user.id).await;

    Ok(Json(WorkspacePayload::from(workspace)))
}

pub(crate) async fn delete_workspace_handler(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;
    require_owner(&state, user.id, workspace_id).await?;

    let deleted = state
        .workspace_store
        .delete(workspace_id)
        .await
        .map_err(AppError::from_anyhow)?;

    if !deleted {
        return Err(AppError::workspace_not_found(workspace_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn share_workspace_handler(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<ShareWorkspaceRequest>,
) -> Result<Response, AppError> {
    let user = authenticate(&state, &headers).await?;
    require_owner(&state, user.id, workspace_id).await?;

    let Some(role) = WorkspaceRole::parse(&payload.role) else {
        return Err(AppError::bad_request(format!(
            "unknown role '{}'",
            payload.role
        )));
    };

    let email = payload.email.trim();
    let target = state
        .user_store
        .find_by_email(email)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::user_not_found(email))?;

    match state
        .workspace_store
        .add_collaborator(workspace_id, target.id, role.as_str())
        .await
    {
        Ok(()) => {}
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::conflict(
                "user is already a collaborator of this workspace",
            ));
        }
        Err(err) => return Err(AppError::from_anyhow(err)),
    }

    state.credit_streak(user.id).await;

    Ok(StatusCode::CREATED.into_response())
}

pub(crate) async fn list_collaborators_handler(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<CollaboratorPayload>>, AppError> {
    let user = authenticate(&state, &headers).await?;
    require_member(&state, user.id, workspace_id).await?;

    let collaborators = state
        .workspace_store
        .list_collaborators(workspace_id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(collaborators.into_iter().map(Into::into).collect()))
}

pub(crate) async fn update_collaborator_handler(
    State(state): State<AppState>,
    Path((workspace_id, target_user_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(payload): Json<UpdateCollaboratorRequest>,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;
    require_owner(&state, user.id, workspace_id).await?;

    let Some(role) = WorkspaceRole::parse(&payload.role) else {
        return Err(AppError::bad_request(format!(
            "unknown role '{}'",
            payload.role
        )));
    };

    let updated = state
        .workspace_store
        .update_collaborator_role(workspace_id, target_user_id, role.as_str())
        .await
        .map_err(AppError::from_anyhow)?;

    if !updated {
        return Err(AppError::collaborator_not_found(workspace_id, target_user_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn remove_collaborator_handler(
    State(state): State<AppState>,
    Path((workspace_id, target_user_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;
    require_owner(&state, user.id, workspace_id).await?;

    if target_user_id == user.id {
        return Err(AppError::bad_request(
            "the workspace owner cannot be removed",
        ));
    }

    let removed = state
        .workspace_store
        .remove_collaborator(workspace_id, target_user_id)
        .await
        .map_err(AppError::from_anyhow)?;

    if !removed {
        return Err(AppError::collaborator_not_found(workspace_id, target_user_id));
    }

    Ok(StatusCode::NO_CONTENT)
}
