use axum::{
    Router,
    http::Method,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    assignee_handlers::{add_assignee_handler, list_assignees_handler, remove_assignee_handler},
    attachment_handlers::{
        create_attachment_handler, delete_attachment_handler, list_attachments_handler,
        update_attachment_handler,
    },
    auth_handlers::{login_handler, profile_handler, register_handler},
    card_handlers::{
        create_card_handler, delete_card_handler, get_card_handler, list_cards_handler,
        update_card_handler,
    },
    comment_handlers::{
        create_comment_handler, delete_comment_handler, list_comments_handler,
        update_comment_handler,
    },
    health_handlers::health_handler,
    label_handlers::{
        create_label_handler, delete_label_handler, list_labels_handler, update_label_handler,
    },
    list_handlers::{
        create_board_list_handler, delete_board_list_handler, list_board_lists_handler,
        update_board_list_handler,
    },
    subtask_handlers::{
        create_subtask_handler, delete_subtask_handler, list_subtasks_handler,
        update_subtask_handler,
    },
    workspace_handlers::{
        create_workspace_handler, delete_workspace_handler, get_workspace_handler,
        list_collaborators_handler, list_workspaces_handler, remove_collaborator_handler,
        share_workspace_handler, update_collaborator_handler, update_workspace_handler,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/user/profile", get(profile_handler))
        .route(
            "/workspaces",
            get(list_workspaces_handler).post(create_workspace_handler),
        )
        .route(
            "/workspaces/{workspace_id}",
            get(get_workspace_handler)
                .put(update_workspace_handler)
                .delete(delete_workspace_handler),
        )
        .route("/workspaces/{workspace_id}/share", post(share_workspace_handler))
        .route(
            "/workspaces/{workspace_id}/collaborators",
            get(list_collaborators_handler),
        )
        .route(
            "/workspaces/{workspace_id}/collaborators/{user_id}",
            put(update_collaborator_handler).delete(remove_collaborator_handler),
        )
        .route(
            "/workspaces/{workspace_id}/lists",
            get(list_board_lists_handler).post(create_board_list_handler),
        )
        .route(
            "/lists/{list_id}",
            put(update_board_list_handler).delete(delete_board_list_handler),
        )
        .route(
            "/lists/{list_id}/cards",
            get(list_cards_handler).post(create_card_handler),
        )
        .route(
            "/cards/{card_id}",
            get(get_card_handler)
                .put(update_card_handler)
                .delete(delete_card_handler),
        )
        .route(
            "/cards/{card_id}/subtasks",
            get(list_subtasks_handler).post(create_subtask_handler),
        )
        .route(
            "/subtasks/{subtask_id}",
            put(update_subtask_handler).delete(delete_subtask_handler),
        )
        .route(
            "/cards/{card_id}/labels",
            get(list_labels_handler).post(create_label_handler),
        )
        .route(
            "/labels/{label_id}",
            put(update_label_handler).delete(delete_label_handler),
        )
        .route(
            "/cards/{card_id}/attachments",
            get(list_attachments_handler).post(create_attachment_handler),
        )
        .route(
            "/attachments/{attachment_id}",
            put(update_attachment_handler).delete(delete_attachment_handler),
        )
        .route(
            "/cards/{card_id}/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route(
            "/comments/{comment_id}",
            put(update_comment_handler).delete(delete_comment_handler),
        )
        .route("/cards/{card_id}/assignees", get(list_assignees_handler))
        .route(
            "/cards/{card_id}/assignees/{user_id}",
            post(add_assignee_handler).delete(remove_assignee_handler),
        );

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::test_support::setup_state;

    #[tokio::test]
    async fn health_endpoint_responds() {
        let (_temp_dir, _database, state) = setup_state().await;
        let router = build_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unauthenticated_profile_request_is_rejected() {
        let (_temp_dir, _database, state) = setup_state().await;
        let router = build_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/user/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["name"], "AUTHENTICATION_REQUIRED");
    }
}
