// Card assignee handlers. Assigning someone to a card credits the
// assigned user's streak rather than the acting user's.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use kelarin_core::db::is_unique_violation;

use crate::{
    auth::authenticate,
    error::AppError,
    handlers::fetch_card,
    state::AppState,
    types::AssigneePayload,
};

pub(crate) async fn list_assignees_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<AssigneePayload>>, AppError> {
    authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let assignees = state
        .assignee_store
        .list_for_card(card_id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(assignees.into_iter().map(Into::into).collect()))
}

pub(crate) async fn add_assignee_handler(
    State(state): State<AppState>,
    Path((card_id, target_user_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let target = state
        .user_store
        .find_by_id(target_user_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| {
            AppError::card_item_not_found("User", "USER_NOT_FOUND", target_user_id)
        })?;

    match state.assignee_store.add(card_id, target.id).await {
        Ok(()) => {}
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::conflict("user is already assigned to this card"));
        }
        Err(err) => return Err(AppError::from_anyhow(err)),
    }

    state.credit_streak(target.id).await;

    Ok(StatusCode::CREATED)
}

pub(crate) async fn remove_assignee_handler(
    State(state): State<AppState>,
    Path((card_id, target_user_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let removed = state
        .assignee_store
        .remove(card_id, target_user_id)
        .await
        .map_err(AppError::from_anyhow)?;

    if !removed {
        return Err(AppError::card_item_not_found(
            "Assignee",
            "ASSIGNEE_NOT_FOUND",
            target_user_id,
        ));
    }

    state.credit_streak(target_user_id).await;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_support::{bearer_headers, seed_card, seed_user, setup_state};

    #[tokio::test]
    async fn assignment_credits_the_assigned_user() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (card_id, owner_id) = seed_card(&state).await;
        let assignee = seed_user(&state, "Worker", "worker@example.com").await;

        let status = add_assignee_handler(
            State(state.clone()),
            Path((card_id, assignee.id)),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect("assign");
        assert_eq!(status, StatusCode::CREATED);

        let refreshed = state
            .user_store
            .find_by_id(assignee.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.streak, 1);

        let owner = state.user_store.find_by_id(owner_id).await.unwrap().unwrap();
        assert_eq!(owner.streak, 0);

        let listed = list_assignees_handler(
            State(state.clone()),
            Path(card_id),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect("list assignees");
        assert_eq!(listed.0.len(), 1);
        assert_eq!(listed.0[0].user_id, assignee.id);
    }

    #[tokio::test]
    async fn double_assignment_conflicts() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (card_id, owner_id) = seed_card(&state).await;

        add_assignee_handler(
            State(state.clone()),
            Path((card_id, owner_id)),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect("assign");

        let err = add_assignee_handler(
            State(state.clone()),
            Path((card_id, owner_id)),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect_err("double assignment");
        let (status, payload) = err.into_payload();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(payload.name, "RESOURCE_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn removing_unassigned_user_is_not_found() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (card_id, owner_id) = seed_card(&state).await;

        let err = remove_assignee_handler(
            State(state.clone()),
            Path((card_id, owner_id)),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect_err("nothing to remove");
        let (status, payload) = err.into_payload();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload.name, "ASSIGNEE_NOT_FOUND");
    }
}
