use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::db::Database;

/// Attachments reference externally stored files by URL; the server never
/// holds file bytes itself.
#[derive(Debug, Clone)]
pub struct CardAttachmentRecord {
    pub id: i64,
    pub card_id: i64,
    pub file_name: String,
    pub url: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct CardAttachmentStore {
    pool: Pool<Sqlite>,
}

impl CardAttachmentStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn create(
        &self,
        card_id: i64,
        file_name: &str,
        url: &str,
    ) -> Result<CardAttachmentRecord> {
        let created_at = Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO card_attachments (card_id, file_name, url, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(card_id)
        .bind(file_name)
        .bind(url)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .with_context(|| "failed to insert card attachment".to_string())?;

        Ok(CardAttachmentRecord {
            id: result.last_insert_rowid(),
            card_id,
            file_name: file_name.to_owned(),
            url: url.to_owned(),
            created_at,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CardAttachmentRecord>> {
        let row = sqlx::query(
            "SELECT id, card_id, file_name, url, created_at FROM card_attachments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    pub async fn list_for_card(&self, card_id: i64) -> Result<Vec<CardAttachmentRecord>> {
        let rows = sqlx::query(
            "SELECT id, card_id, file_name, url, created_at FROM card_attachments \
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
        file_name: Option<&str>,
        url: Option<&str>,
    ) -> Result<Option<CardAttachmentRecord>> {
        if file_name.is_some() || url.is_some() {
            let mut builder = QueryBuilder::new("UPDATE card_attachments SET ");
            let mut separated = builder.separated(", ");
            if let Some(file_name) = file_name {
                separated.push("file_name = ").push_bind_unseparated(file_name);
            }
            if let Some(url) = url {
                separated.push("url = ").push_bind_unseparated(url);
            }
            builder.push(" WHERE id = ").push_bind(id);
            builder.build().execute(&self.pool).await?;
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM card_attachments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn map_row(row: SqliteRow) -> CardAttachmentRecord {
        CardAttachmentRecord {
            id: row.get::<i64, _>("id"),
            card_id: row.get::<i64, _>("card_id"),
            file_name: row.get("file_name"),
            url: row.get("url"),
            created_at: row.get::<i64, _>("created_at"),
        }
    }
}
