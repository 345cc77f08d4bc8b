// Card comment handlers. Anyone authenticated can comment or edit, but a
// comment can only be deleted by its author.

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
    types::{CommentPayload, CreateCommentRequest, UpdateCommentRequest},
};

pub(crate) async fn list_comments_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<CommentPayload>>, AppError> {
    authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let comments = state
        .comment_store
        .list_for_card(card_id)
        .await
        .map_err(AppError::from_anyhow)?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

pub(crate) async fn create_comment_handler(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Response, AppError> {
    if payload.body.trim().is_empty() {
        return Err(AppError::bad_request("comment body must not be empty"));
    }

    let user = authenticate(&state, &headers).await?;
    fetch_card(&state, card_id).await?;

    let comment = state
        .comment_store
        .create(card_id, user.id, payload.body.trim())
        .await
        .map_err(AppError::from_anyhow)?;

    state.credit_streak(user.id).await;

    Ok((StatusCode::CREATED, Json(CommentPayload::from(comment))).into_response())
}

pub(crate) async fn update_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<CommentPayload>, AppError> {
    if let Some(body) = payload.body.as_deref() {
        if body.trim().is_empty() {
            return Err(AppError::bad_request("comment body must not be empty"));
        }
    }

    let user = authenticate(&state, &headers).await?;

    let comment = state
        .comment_store
        .update(comment_id, payload.body.as_deref().map(str::trim))
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| {
            AppError::card_item_not_found("Comment", "COMMENT_NOT_FOUND", comment_id)
        })?;

    state.credit_streak(user.id).await;

    Ok(Json(CommentPayload::from(comment)))
}

pub(crate) async fn delete_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = authenticate(&state, &headers).await?;

    let comment = state
        .comment_store
        .find_by_id(comment_id)
        .await
        .map_err(AppError::from_anyhow)?
        .ok_or_else(|| {
            AppError::card_item_not_found("Comment", "COMMENT_NOT_FOUND", comment_id)
        })?;

    if comment.user_id != user.id {
        return Err(AppError::forbidden(
            "only the author can delete a comment",
        ));
    }

    state
        .comment_store
        .delete(comment_id)
        .await
        .map_err(AppError::from_anyhow)?;

    state.credit_streak(user.id).await;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    use crate::test_support::{bearer_headers, seed_card, seed_user, setup_state};

    #[tokio::test]
    async fn comment_carries_author_name() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (card_id, owner_id) = seed_card(&state).await;

        let response = create_comment_handler(
            State(state.clone()),
            Path(card_id),
            bearer_headers(&state, owner_id),
            Json(CreateCommentRequest {
                body: "Looks good".into(),
            }),
        )
        .await
        .expect("create comment");
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["author_name"], "Tester");
        assert_eq!(json["body"], "Looks good");

        let comments = list_comments_handler(
            State(state.clone()),
            Path(card_id),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect("list comments");
        assert_eq!(comments.0.len(), 1);
    }

    #[tokio::test]
    async fn any_authenticated_user_edits_a_comment() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (card_id, owner_id) = seed_card(&state).await;
        let other = seed_user(&state, "Other", "other@example.com").await;

        let response = create_comment_handler(
            State(state.clone()),
            Path(card_id),
            bearer_headers(&state, owner_id),
            Json(CreateCommentRequest {
                body: "First draft".into(),
            }),
        )
        .await
        .expect("create comment");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let comment_id = json["id"].as_i64().unwrap();

        let updated = update_comment_handler(
            State(state.clone()),
            Path(comment_id),
            bearer_headers(&state, other.id),
            Json(UpdateCommentRequest {
                body: Some("Second draft".into()),
            }),
        )
        .await
        .expect("non-author edits");
        assert_eq!(updated.0.body, "Second draft");
        assert_eq!(updated.0.user_id, owner_id);
        assert_eq!(updated.0.author_name, "Tester");
    }

    #[tokio::test]
    async fn updating_missing_comment_is_not_found() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (_card_id, owner_id) = seed_card(&state).await;

        let err = update_comment_handler(
            State(state.clone()),
            Path(9001),
            bearer_headers(&state, owner_id),
            Json(UpdateCommentRequest {
                body: Some("Nothing here".into()),
            }),
        )
        .await
        .expect_err("missing comment");
        let (status, payload) = err.into_payload();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload.name, "COMMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn only_the_author_deletes_a_comment() {
        let (_temp_dir, _database, state) = setup_state().await;
        let (card_id, owner_id) = seed_card(&state).await;
        let other = seed_user(&state, "Other", "other@example.com").await;

        let response = create_comment_handler(
            State(state.clone()),
            Path(card_id),
            bearer_headers(&state, owner_id),
            Json(CreateCommentRequest {
                body: "Mine".into(),
            }),
        )
        .await
        .expect("create comment");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let comment_id = json["id"].as_i64().unwrap();

        let err = delete_comment_handler(
            State(state.clone()),
            Path(comment_id),
            bearer_headers(&state, other.id),
        )
        .await
        .expect_err("non-author must not delete");
        let (status, _) = err.into_payload();
        assert_eq!(status, StatusCode::FORBIDDEN);

        let status = delete_comment_handler(
            State(state.clone()),
            Path(comment_id),
            bearer_headers(&state, owner_id),
        )
        .await
        .expect("author deletes");
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
