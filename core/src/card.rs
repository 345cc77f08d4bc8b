use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::db::Database;

#[derive(Debug, Clone)]
pub struct CardRecord {
    pub id: i64,
    pub board_list_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<i64>,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct CardStore {
    pool: Pool<Sqlite>,
}

impl CardStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn create(
        &self,
        board_list_id: i64,
        title: &str,
        description: Option<&str>,
        deadline: Option<i64>,
    ) -> Result<CardRecord> {
        let created_at = Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO cards (board_list_id, title, description, deadline, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(board_list_id)
        .bind(title)
        .bind(description)
        .bind(deadline)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .with_context(|| "failed to insert card".to_string())?;

        Ok(CardRecord {
            id: result.last_insert_rowid(),
            board_list_id,
            title: title.to_owned(),
            description: description.map(|value| value.to_owned()),
            deadline,
            created_at,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CardRecord>> {
        let row = sqlx::query(
            "SELECT id, board_list_id, title, description, deadline, created_at \
             FROM cards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    pub async fn list_for_board_list(&self, board_list_id: i64) -> Result<Vec<CardRecord>> {
        let rows = sqlx::query(
            "SELECT id, board_list_id, title, description, deadline, created_at \
             FROM cards WHERE board_list_id = ? ORDER BY created_at, id",
        )
        .bind(board_list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
        deadline: Option<i64>,
    ) -> Result<Option<CardRecord>> {
        if title.is_some() || description.is_some() || deadline.is_some() {
            let mut builder = QueryBuilder::new("UPDATE cards SET ");
            let mut separated = builder.separated(", ");
            if let Some(title) = title {
                separated.push("title = ").push_bind_unseparated(title);
            }
            if let Some(description) = description {
                separated
                    .push("description = ")
                    .push_bind_unseparated(description);
            }
            if let Some(deadline) = deadline {
                separated
                    .push("deadline = ")
                    .push_bind_unseparated(deadline);
            }
            builder.push(" WHERE id = ").push_bind(id);
            builder.build().execute(&self.pool).await?;
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The workspace a card belongs to, through its board list.
    pub async fn workspace_id_for_card(&self, card_id: i64) -> Result<Option<i64>> {
        let workspace_id: Option<i64> = sqlx::query_scalar(
            "SELECT bl.workspace_id FROM cards c \
             JOIN board_lists bl ON bl.id = c.board_list_id \
             WHERE c.id = ?",
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workspace_id)
    }

    fn map_row(row: SqliteRow) -> CardRecord {
        CardRecord {
            id: row.get::<i64, _>("id"),
            board_list_id: row.get::<i64, _>("board_list_id"),
            title: row.get("title"),
            description: row.get::<Option<String>, _>("description"),
            deadline: row.get::<Option<i64>, _>("deadline"),
            created_at: row.get::<i64, _>("created_at"),
        }
    }
}
