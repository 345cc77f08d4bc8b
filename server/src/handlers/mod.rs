pub(crate) mod assignee_handlers;
pub(crate) mod attachment_handlers;
pub(crate) mod auth_handlers;
pub(crate) mod card_handlers;
pub(crate) mod comment_handlers;
pub(crate) mod health_handlers;
pub(crate) mod label_handlers;
pub(crate) mod list_handlers;
pub(crate) mod subtask_handlers;
pub(crate) mod workspace_handlers;

use kelarin_core::{access::WorkspaceRole, card::CardRecord};

use crate::{error::AppError, state::AppState};

/// Membership of any role grants read access to a workspace.
pub(crate) async fn require_member(
    state: &AppState,
    user_id: i64,
    workspace_id: i64,
) -> Result<WorkspaceRole, AppError> {
    state
        .access_control
        .resolve_role(user_id, workspace_id)
        .await
        .map_err(AppError::from_access)
}

/// Board list and card mutations require editor, admin, or owner.
pub(crate) async fn require_privileged(
    state: &AppState,
    user_id: i64,
    workspace_id: i64,
) -> Result<(), AppError> {
    let role = require_member(state, user_id, workspace_id).await?;
    if role.is_privileged() {
        Ok(())
    } else {
        Err(AppError::insufficient_role(workspace_id, role.as_str()))
    }
}

/// Workspace administration (update, delete, sharing) is owner-only.
pub(crate) async fn require_owner(
    state: &AppState,
    user_id: i64,
    workspace_id: i64,
) -> Result<(), AppError> {
    let role = require_member(state, user_id, workspace_id).await?;
    if role == WorkspaceRole::Owner {
        Ok(())
    } else {
        Err(AppError::insufficient_role(workspace_id, role.as_str()))
    }
}

pub(crate) async fn fetch_card(state: &AppState, card_id: i64) -> Result<CardRecord, AppError> {
    state
        .card_store
        .find_by_id(card_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| AppError::card_not_found(card_id))
}
