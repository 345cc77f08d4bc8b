//! Workspace role resolution.
//!
//! A workspace's owner is determined by `workspaces.owner_id` and always
//! resolves to [`WorkspaceRole::Owner`], regardless of any stored
//! `workspace_users` row for the same user. Everyone else resolves through
//! their `workspace_users` row, and a missing row means no association.

use sqlx::{Pool, Sqlite};
use thiserror::Error;

use crate::db::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceRole {
    Viewer,
    Editor,
    Admin,
    Owner,
}

impl WorkspaceRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "viewer" => Some(Self::Viewer),
            "editor" => Some(Self::Editor),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Whether the role may mutate board lists and cards.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Editor | Self::Admin | Self::Owner)
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("workspace {0} not found")]
    WorkspaceNotFound(i64),
    #[error("user {user_id} is not associated with workspace {workspace_id}")]
    NotAssociated { user_id: i64, workspace_id: i64 },
    #[error("unknown role '{role}' stored for user {user_id} in workspace {workspace_id}")]
    UnknownRole {
        role: String,
        user_id: i64,
        workspace_id: i64,
    },
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct AccessControl {
    pool: Pool<Sqlite>,
}

impl AccessControl {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn resolve_role(
        &self,
        user_id: i64,
        workspace_id: i64,
    ) -> Result<WorkspaceRole, AccessError> {
        let owner_id: Option<i64> = sqlx::query_scalar("SELECT owner_id FROM workspaces WHERE id = ?")
            .bind(workspace_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(owner_id) = owner_id else {
            return Err(AccessError::WorkspaceNotFound(workspace_id));
        };

        if owner_id == user_id {
            return Ok(WorkspaceRole::Owner);
        }

        let stored: Option<String> = sqlx::query_scalar(
            "SELECT role FROM workspace_users WHERE workspace_id = ? AND user_id = ?",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match stored {
            None => Err(AccessError::NotAssociated {
                user_id,
                workspace_id,
            }),
            Some(role) => WorkspaceRole::parse(&role).ok_or(AccessError::UnknownRole {
                role,
                user_id,
                workspace_id,
            }),
        }
    }

    pub async fn is_privileged(&self, user_id: i64, workspace_id: i64) -> Result<bool, AccessError> {
        Ok(self.resolve_role(user_id, workspace_id).await?.is_privileged())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig, db::Database, user::UserStore, workspace::WorkspaceStore,
    };
    use tempfile::TempDir;

    async fn setup() -> anyhow::Result<(Database, TempDir)> {
        let temp_dir = tempfile::tempdir()?;
        let mut config = AppConfig::default();
        config.database_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .into_owned();
        let database = Database::connect(&config).await?;
        Ok((database, temp_dir))
    }

    #[test]
    fn parse_rejects_unknown_roles() {
        assert_eq!(WorkspaceRole::parse("editor"), Some(WorkspaceRole::Editor));
        assert_eq!(WorkspaceRole::parse("Editor"), None);
        assert_eq!(WorkspaceRole::parse("manager"), None);
        assert_eq!(WorkspaceRole::parse(""), None);
    }

    #[test]
    fn privilege_covers_editor_and_above() {
        assert!(!WorkspaceRole::Viewer.is_privileged());
        assert!(WorkspaceRole::Editor.is_privileged());
        assert!(WorkspaceRole::Admin.is_privileged());
        assert!(WorkspaceRole::Owner.is_privileged());
    }

    #[tokio::test]
    async fn owner_column_wins_over_stored_row() -> anyhow::Result<()> {
        let (database, _temp_dir) = setup().await?;
        let users = UserStore::new(&database);
        let workspaces = WorkspaceStore::new(&database);
        let access = AccessControl::new(&database);

        let owner = users.create("Owner", "owner@example.com", "hash").await?;
        let workspace = workspaces.create(owner.id, "Board", None).await?;

        // Creation stores an owner row; demote it directly and verify the
        // owner_id column still decides.
        sqlx::query("UPDATE workspace_users SET role = 'viewer' WHERE workspace_id = ? AND user_id = ?")
            .bind(workspace.id)
            .bind(owner.id)
            .execute(database.pool())
            .await?;

        let role = access.resolve_role(owner.id, workspace.id).await?;
        assert_eq!(role, WorkspaceRole::Owner);
        assert!(access.is_privileged(owner.id, workspace.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn collaborators_resolve_their_stored_role() -> anyhow::Result<()> {
        let (database, _temp_dir) = setup().await?;
        let users = UserStore::new(&database);
        let workspaces = WorkspaceStore::new(&database);
        let access = AccessControl::new(&database);

        let owner = users.create("Owner", "owner@example.com", "hash").await?;
        let viewer = users.create("Viewer", "viewer@example.com", "hash").await?;
        let editor = users.create("Editor", "editor@example.com", "hash").await?;
        let workspace = workspaces.create(owner.id, "Board", None).await?;

        workspaces
            .add_collaborator(workspace.id, viewer.id, "viewer")
            .await?;
        workspaces
            .add_collaborator(workspace.id, editor.id, "editor")
            .await?;

        assert_eq!(
            access.resolve_role(viewer.id, workspace.id).await?,
            WorkspaceRole::Viewer
        );
        assert!(!access.is_privileged(viewer.id, workspace.id).await?);
        assert_eq!(
            access.resolve_role(editor.id, workspace.id).await?,
            WorkspaceRole::Editor
        );
        assert!(access.is_privileged(editor.id, workspace.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn missing_workspace_and_membership_are_distinct() -> anyhow::Result<()> {
        let (database, _temp_dir) = setup().await?;
        let users = UserStore::new(&database);
        let workspaces = WorkspaceStore::new(&database);
        let access = AccessControl::new(&database);

        let owner = users.create("Owner", "owner@example.com", "hash").await?;
        let outsider = users
            .create("Outsider", "outsider@example.com", "hash")
            .await?;
        let workspace = workspaces.create(owner.id, "Board", None).await?;

        let err = access.resolve_role(owner.id, workspace.id + 100).await;
        assert!(matches!(err, Err(AccessError::WorkspaceNotFound(_))));

        let err = access.resolve_role(outsider.id, workspace.id).await;
        assert!(matches!(err, Err(AccessError::NotAssociated { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_stored_role_is_rejected() -> anyhow::Result<()> {
        let (database, _temp_dir) = setup().await?;
        let users = UserStore::new(&database);
        let workspaces = WorkspaceStore::new(&database);
        let access = AccessControl::new(&database);

        let owner = users.create("Owner", "owner@example.com", "hash").await?;
        let member = users.create("Member", "member@example.com", "hash").await?;
        let workspace = workspaces.create(owner.id, "Board", None).await?;

        sqlx::query(
            "INSERT INTO workspace_users (user_id, workspace_id, role, created_at) VALUES (?, ?, 'manager', 0)",
        )
        .bind(member.id)
        .bind(workspace.id)
        .execute(database.pool())
        .await?;

        let err = access.resolve_role(member.id, workspace.id).await;
        assert!(matches!(err, Err(AccessError::UnknownRole { .. })));

        Ok(())
    }
}
