use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};

use crate::db::Database;

#[derive(Debug, Clone)]
pub struct CardAssigneeRecord {
    pub card_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct CardAssigneeStore {
    pool: Pool<Sqlite>,
}

impl CardAssigneeStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn add(&self, card_id: i64, user_id: i64) -> Result<()> {
        let created_at = Utc::now().timestamp();
        sqlx::query("INSERT INTO card_assignees (card_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(card_id)
            .bind(user_id)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .with_context(|| "failed to insert card assignee".to_string())?;
        Ok(())
    }

    pub async fn remove(&self, card_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM card_assignees WHERE card_id = ? AND user_id = ?")
            .bind(card_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_card(&self, card_id: i64) -> Result<Vec<CardAssigneeRecord>> {
        let rows = sqlx::query(
            "SELECT ca.card_id, ca.user_id, ca.created_at, u.full_name, u.email \
             FROM card_assignees ca JOIN users u ON u.id = ca.user_id \
             WHERE ca.card_id = ? ORDER BY ca.created_at, ca.user_id",
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CardAssigneeRecord {
                card_id: row.get::<i64, _>("card_id"),
                user_id: row.get::<i64, _>("user_id"),
                full_name: row.get("full_name"),
                email: row.get("email"),
                created_at: row.get::<i64, _>("created_at"),
            })
            .collect())
    }
}
