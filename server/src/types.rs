// Request and response bodies for the REST API.

use chrono::Utc;
use kelarin_core::{
    assignee::CardAssigneeRecord, attachment::CardAttachmentRecord, board_list::BoardListRecord,
    card::CardRecord, comment::CardCommentRecord, label::CardLabelRecord,
    streak::has_streak_today, subtask::SubtaskRecord, user::UserRecord,
    workspace::{CollaboratorRecord, WorkspaceRecord},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub user: UserPayload,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserPayload {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub user_type: String,
    pub streak: i64,
    pub last_streak_at: Option<i64>,
    pub has_streak_today: bool,
    pub created_at: i64,
}

impl From<UserRecord> for UserPayload {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            email: record.email,
            user_type: record.user_type,
            streak: record.streak,
            last_streak_at: record.last_streak_at,
            has_streak_today: has_streak_today(record.last_streak_at, Utc::now()),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileResponse {
    pub user: UserPayload,
    pub workspaces: Vec<WorkspacePayload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WorkspacePayload {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub created_at: i64,
}

impl From<WorkspaceRecord> for WorkspacePayload {
    fn from(record: WorkspaceRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            owner_id: record.owner_id,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateWorkspaceRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateWorkspaceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareWorkspaceRequest {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateCollaboratorRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CollaboratorPayload {
    pub user_id: i64,
    pub workspace_id: i64,
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub created_at: i64,
}

impl From<CollaboratorRecord> for CollaboratorPayload {
    fn from(record: CollaboratorRecord) -> Self {
        Self {
            user_id: record.user_id,
            workspace_id: record.workspace_id,
            role: record.role,
            full_name: record.full_name,
            email: record.email,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateBoardListRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateBoardListRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BoardListPayload {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub created_at: i64,
}

impl From<BoardListRecord> for BoardListPayload {
    fn from(record: BoardListRecord) -> Self {
        Self {
            id: record.id,
            workspace_id: record.workspace_id,
            name: record.name,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateCardRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateCardRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CardPayload {
    pub id: i64,
    pub board_list_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<i64>,
    pub created_at: i64,
}

impl From<CardRecord> for CardPayload {
    fn from(record: CardRecord) -> Self {
        Self {
            id: record.id,
            board_list_id: record.board_list_id,
            title: record.title,
            description: record.description,
            deadline: record.deadline,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSubtaskRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateSubtaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_done: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubtaskPayload {
    pub id: i64,
    pub card_id: i64,
    pub title: String,
    pub is_done: bool,
    pub created_at: i64,
}

impl From<SubtaskRecord> for SubtaskPayload {
    fn from(record: SubtaskRecord) -> Self {
        Self {
            id: record.id,
            card_id: record.card_id,
            title: record.title,
            is_done: record.is_done,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateLabelRequest {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateLabelRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LabelPayload {
    pub id: i64,
    pub card_id: i64,
    pub name: String,
    pub color: String,
    pub created_at: i64,
}

impl From<CardLabelRecord> for LabelPayload {
    fn from(record: CardLabelRecord) -> Self {
        Self {
            id: record.id,
            card_id: record.card_id,
            name: record.name,
            color: record.color,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateAttachmentRequest {
    pub file_name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateAttachmentRequest {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttachmentPayload {
    pub id: i64,
    pub card_id: i64,
    pub file_name: String,
    pub url: String,
    pub created_at: i64,
}

impl From<CardAttachmentRecord> for AttachmentPayload {
    fn from(record: CardAttachmentRecord) -> Self {
        Self {
            id: record.id,
            card_id: record.card_id,
            file_name: record.file_name,
            url: record.url,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateCommentRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateCommentRequest {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentPayload {
    pub id: i64,
    pub card_id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub body: String,
    pub created_at: i64,
}

impl From<CardCommentRecord> for CommentPayload {
    fn from(record: CardCommentRecord) -> Self {
        Self {
            id: record.id,
            card_id: record.card_id,
            user_id: record.user_id,
            author_name: record.author_name,
            body: record.body,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssigneePayload {
    pub card_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub created_at: i64,
}

impl From<CardAssigneeRecord> for AssigneePayload {
    fn from(record: CardAssigneeRecord) -> Self {
        Self {
            card_id: record.card_id,
            user_id: record.user_id,
            full_name: record.full_name,
            email: record.email,
            created_at: record.created_at,
        }
    }
}
