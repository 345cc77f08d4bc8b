use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::db::Database;

#[derive(Debug, Clone)]
pub struct CardCommentRecord {
    pub id: i64,
    pub card_id: i64,
    pub user_id: i64,
    pub body: String,
    pub author_name: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct CardCommentStore {
    pool: Pool<Sqlite>,
}

impl CardCommentStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn create(&self, card_id: i64, user_id: i64, body: &str) -> Result<CardCommentRecord> {
        let created_at = Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO card_comments (card_id, user_id, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(card_id)
        .bind(user_id)
        .bind(body)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .with_context(|| "failed to insert card comment".to_string())?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .with_context(|| format!("comment {id} missing after insert"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CardCommentRecord>> {
        let row = sqlx::query(
            "SELECT cc.id, cc.card_id, cc.user_id, cc.body, cc.created_at, u.full_name \
             FROM card_comments cc JOIN users u ON u.id = cc.user_id WHERE cc.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    pub async fn list_for_card(&self, card_id: i64) -> Result<Vec<CardCommentRecord>> {
        let rows = sqlx::query(
            "SELECT cc.id, cc.card_id, cc.user_id, cc.body, cc.created_at, u.full_name \
             FROM card_comments cc JOIN users u ON u.id = cc.user_id \
             WHERE cc.card_id = ? ORDER BY cc.created_at, cc.id",
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    pub async fn update(&self, id: i64, body: Option<&str>) -> Result<Option<CardCommentRecord>> {
        if let Some(body) = body {
            sqlx::query("UPDATE card_comments SET body = ? WHERE id = ?")
                .bind(body)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM card_comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn map_row(row: SqliteRow) -> CardCommentRecord {
        CardCommentRecord {
            id: row.get::<i64, _>("id"),
            card_id: row.get::<i64, _>("card_id"),
            user_id: row.get::<i64, _>("user_id"),
            body: row.get("body"),
            author_name: row.get("full_name"),
            created_at: row.get::<i64, _>("created_at"),
        }
    }
}
