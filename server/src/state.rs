use kelarin_core::{
    access::AccessControl,
    assignee::CardAssigneeStore,
    attachment::CardAttachmentStore,
    board_list::BoardListStore,
    card::CardStore,
    comment::CardCommentStore,
    config::AppConfig,
    db::Database,
    label::CardLabelStore,
    streak::StreakStore,
    subtask::SubtaskStore,
    user::UserStore,
    workspace::WorkspaceStore,
};
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub user_store: UserStore,
    pub workspace_store: WorkspaceStore,
    pub board_list_store: BoardListStore,
    pub card_store: CardStore,
    pub subtask_store: SubtaskStore,
    pub label_store: CardLabelStore,
    pub attachment_store: CardAttachmentStore,
    pub comment_store: CardCommentStore,
    pub assignee_store: CardAssigneeStore,
    pub access_control: AccessControl,
    pub streak_store: StreakStore,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
}

pub fn build_state(database: &Database, config: &AppConfig) -> AppState {
    AppState {
        user_store: UserStore::new(database),
        workspace_store: WorkspaceStore::new(database),
        board_list_store: BoardListStore::new(database),
        card_store: CardStore::new(database),
        subtask_store: SubtaskStore::new(database),
        label_store: CardLabelStore::new(database),
        attachment_store: CardAttachmentStore::new(database),
        comment_store: CardCommentStore::new(database),
        assignee_store: CardAssigneeStore::new(database),
        access_control: AccessControl::new(database),
        streak_store: StreakStore::new(database),
        jwt_secret: config.jwt_secret.clone(),
        jwt_ttl_seconds: config.jwt_ttl_seconds,
    }
}

impl AppState {
    /// Streak accounting must never fail the request that triggered it.
    pub(crate) async fn credit_streak(&self, user_id: i64) {
        if let Err(err) = self.streak_store.record_activity(user_id).await {
            warn!(user_id, error = %err, "failed to record streak activity");
        }
    }
}
