use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::db::Database;

#[derive(Debug, Clone)]
pub struct SubtaskRecord {
    pub id: i64,
    pub card_id: i64,
    pub title: String,
    pub is_done: bool,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct SubtaskStore {
    pool: Pool<Sqlite>,
}

impl SubtaskStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn create(&self, card_id: i64, title: &str) -> Result<SubtaskRecord> {
        let created_at = Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO subtasks (card_id, title, is_done, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(card_id)
        .bind(title)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .with_context(|| "failed to insert subtask".to_string())?;

        Ok(SubtaskRecord {
            id: result.last_insert_rowid(),
            card_id,
            title: title.to_owned(),
            is_done: false,
            created_at,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<SubtaskRecord>> {
        let row = sqlx::query(
            "SELECT id, card_id, title, is_done, created_at FROM subtasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    pub async fn list_for_card(&self, card_id: i64) -> Result<Vec<SubtaskRecord>> {
        let rows = sqlx::query(
            "SELECT id, card_id, title, is_done, created_at FROM subtasks \
             WHERE card_id = ? ORDER BY created_at, id",
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        is_done: Option<bool>,
    ) -> Result<Option<SubtaskRecord>> {
        if title.is_some() || is_done.is_some() {
            let mut builder = QueryBuilder::new("UPDATE subtasks SET ");
            let mut separated = builder.separated(", ");
            if let Some(title) = title {
                separated.push("title = ").push_bind_unseparated(title);
            }
            if let Some(is_done) = is_done {
                separated
                    .push("is_done = ")
                    .push_bind_unseparated(if is_done { 1_i64 } else { 0_i64 });
            }
            builder.push(" WHERE id = ").push_bind(id);
            builder.build().execute(&self.pool).await?;
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn map_row(row: SqliteRow) -> SubtaskRecord {
        SubtaskRecord {
            id: row.get::<i64, _>("id"),
            card_id: row.get::<i64, _>("card_id"),
            title: row.get("title"),
            is_done: row.get::<i64, _>("is_done") != 0,
            created_at: row.get::<i64, _>("created_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board_list::BoardListStore, card::CardStore, config::AppConfig, db::Database,
        user::UserStore, workspace::WorkspaceStore,
    };
    use tempfile::TempDir;

    async fn setup_card() -> anyhow::Result<(Database, TempDir, i64)> {
        let temp_dir = tempfile::tempdir()?;
        let mut config = AppConfig::default();
        config.database_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .into_owned();
        let database = Database::connect(&config).await?;

        let owner = UserStore::new(&database)
            .create("Owner", "owner@example.com", "hash")
            .await?;
        let workspace = WorkspaceStore::new(&database)
            .create(owner.id, "Board", None)
            .await?;
        let list = BoardListStore::new(&database)
            .create(workspace.id, "To Do")
            .await?;
        let card = CardStore::new(&database)
            .create(list.id, "Task", None, None)
            .await?;

        Ok((database, temp_dir, card.id))
    }

    #[tokio::test]
    async fn toggling_done_keeps_title() -> anyhow::Result<()> {
        let (database, _temp_dir, card_id) = setup_card().await?;
        let subtasks = SubtaskStore::new(&database);

        let subtask = subtasks.create(card_id, "Draft outline").await?;
        assert!(!subtask.is_done);

        let updated = subtasks
            .update(subtask.id, None, Some(true))
            .await?
            .expect("subtask present");
        assert!(updated.is_done);
        assert_eq!(updated.title, "Draft outline");

        let listed = subtasks.list_for_card(card_id).await?;
        assert_eq!(listed.len(), 1);
        assert!(listed[0].is_done);

        Ok(())
    }
}
