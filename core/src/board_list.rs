use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::db::Database;

#[derive(Debug, Clone)]
pub struct BoardListRecord {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct BoardListStore {
    pool: Pool<Sqlite>,
}

impl BoardListStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn create(&self, workspace_id: i64, name: &str) -> Result<BoardListRecord> {
        let created_at = Utc::now().timestamp();
        let result =
            sqlx::query("INSERT INTO board_lists (workspace_id, name, created_at) VALUES (?, ?, ?)")
                .bind(workspace_id)
                .bind(name)
                .bind(created_at)
                .execute(&self.pool)
                .await
                .with_context(|| "failed to insert board list".to_string())?;

        Ok(BoardListRecord {
            id: result.last_insert_rowid(),
            workspace_id,
            name: name.to_owned(),
            created_at,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<BoardListRecord>> {
        let row = sqlx::query(
            "SELECT id, workspace_id, name, created_at FROM board_lists WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    pub async fn list_for_workspace(&self, workspace_id: i64) -> Result<Vec<BoardListRecord>> {
        let rows = sqlx::query(
            "SELECT id, workspace_id, name, created_at FROM board_lists \
             WHERE workspace_id = ? ORDER BY created_at, id",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Option<BoardListRecord>> {
        sqlx::query("UPDATE board_lists SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM board_lists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn map_row(row: SqliteRow) -> BoardListRecord {
        BoardListRecord {
            id: row.get::<i64, _>("id"),
            workspace_id: row.get::<i64, _>("workspace_id"),
            name: row.get("name"),
            created_at: row.get::<i64, _>("created_at"),
        }
    }
}
