use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::db::Database;

#[derive(Debug, Clone)]
pub struct WorkspaceRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct CollaboratorRecord {
    pub user_id: i64,
    pub workspace_id: i64,
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct WorkspaceStore {
    pool: Pool<Sqlite>,
}

impl WorkspaceStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    /// Create a workspace and record the owner as a collaborator in the same
    /// transaction. The stored owner row keeps collaborator listings complete;
    /// role resolution never consults it for the owner.
    pub async fn create(
        &self,
        owner_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<WorkspaceRecord> {
        let created_at = Utc::now().timestamp();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO workspaces (name, description, owner_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .with_context(|| "failed to insert workspace".to_string())?;

        let workspace_id = result.last_insert_rowid();

        sqlx::query(
            "INSERT INTO workspace_users (user_id, workspace_id, role, created_at) \
             VALUES (?, ?, 'owner', ?)",
        )
        .bind(owner_id)
        .bind(workspace_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .with_context(|| "failed to insert owner collaborator row".to_string())?;

        tx.commit().await?;

        Ok(WorkspaceRecord {
            id: workspace_id,
            name: name.to_owned(),
            description: description.map(|value| value.to_owned()),
            owner_id,
            created_at,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<WorkspaceRecord>> {
        let row = sqlx::query(
            "SELECT id, name, description, owner_id, created_at FROM workspaces WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    /// Workspaces the user owns or collaborates on.
    pub async fn list_accessible(&self, user_id: i64) -> Result<Vec<WorkspaceRecord>> {
        let rows = sqlx::query(
            "SELECT DISTINCT w.id, w.name, w.description, w.owner_id, w.created_at \
             FROM workspaces w \
             LEFT JOIN workspace_users wu ON wu.workspace_id = w.id AND wu.user_id = ? \
             WHERE w.owner_id = ? OR wu.user_id IS NOT NULL \
             ORDER BY w.created_at, w.id",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<WorkspaceRecord>> {
        if name.is_some() || description.is_some() {
            let mut builder = QueryBuilder::new("UPDATE workspaces SET ");
            let mut separated = builder.separated(", ");
            if let Some(name) = name {
                separated.push("name = ").push_bind_unseparated(name);
            }
            if let Some(description) = description {
                separated
                    .push("description = ")
                    .push_bind_unseparated(description);
            }
            builder.push(" WHERE id = ").push_bind(id);
            builder.build().execute(&self.pool).await?;
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn add_collaborator(
        &self,
        workspace_id: i64,
        user_id: i64,
        role: &str,
    ) -> Result<()> {
        let created_at = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO workspace_users (user_id, workspace_id, role, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(workspace_id)
        .bind(role)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .with_context(|| "failed to insert collaborator".to_string())?;
        Ok(())
    }

    pub async fn update_collaborator_role(
        &self,
        workspace_id: i64,
        user_id: i64,
        role: &str,
    ) -> Result<bool> {
        let result =
            sqlx::query("UPDATE workspace_users SET role = ? WHERE workspace_id = ? AND user_id = ?")
                .bind(role)
                .bind(workspace_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_collaborator(&self, workspace_id: i64, user_id: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM workspace_users WHERE workspace_id = ? AND user_id = ?")
                .bind(workspace_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_collaborators(&self, workspace_id: i64) -> Result<Vec<CollaboratorRecord>> {
        let rows = sqlx::query(
            "SELECT wu.user_id, wu.workspace_id, wu.role, wu.created_at, u.full_name, u.email \
             FROM workspace_users wu \
             JOIN users u ON u.id = wu.user_id \
             WHERE wu.workspace_id = ? \
             ORDER BY wu.created_at, wu.user_id",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CollaboratorRecord {
                user_id: row.get::<i64, _>("user_id"),
                workspace_id: row.get::<i64, _>("workspace_id"),
                role: row.get("role"),
                full_name: row.get("full_name"),
                email: row.get("email"),
                created_at: row.get::<i64, _>("created_at"),
            })
            .collect())
    }

    fn map_row(row: SqliteRow) -> WorkspaceRecord {
        WorkspaceRecord {
            id: row.get::<i64, _>("id"),
            name: row.get("name"),
            description: row.get::<Option<String>, _>("description"),
            owner_id: row.get::<i64, _>("owner_id"),
            created_at: row.get::<i64, _>("created_at"),
        }
    }
}
