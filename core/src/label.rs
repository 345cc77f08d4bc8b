use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::db::Database;

#[derive(Debug, Clone)]
pub struct CardLabelRecord {
    pub id: i64,
    pub card_id: i64,
    pub name: String,
    pub color: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct CardLabelStore {
    pool: Pool<Sqlite>,
}

impl CardLabelStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn create(&self, card_id: i64, name: &str, color: &str) -> Result<CardLabelRecord> {
        let created_at = Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO card_labels (card_id, name, color, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(card_id)
        .bind(name)
        .bind(color)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .with_context(|| "failed to insert card label".to_string())?;

        Ok(CardLabelRecord {
            id: result.last_insert_rowid(),
            card_id,
            name: name.to_owned(),
            color: color.to_owned(),
            created_at,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CardLabelRecord>> {
        let row = sqlx::query(
            "SELECT id, card_id, name, color, created_at FROM card_labels WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    pub async fn list_for_card(&self, card_id: i64) -> Result<Vec<CardLabelRecord>> {
        let rows = sqlx::query(
            "SELECT id, card_id, name, color, created_at FROM card_labels \
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
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<Option<CardLabelRecord>> {
        if name.is_some() || color.is_some() {
            let mut builder = QueryBuilder::new("UPDATE card_labels SET ");
            let mut separated = builder.separated(", ");
            if let Some(name) = name {
                separated.push("name = ").push_bind_unseparated(name);
            }
            if let Some(color) = color {
                separated.push("color = ").push_bind_unseparated(color);
            }
            builder.push(" WHERE id = ").push_bind(id);
            builder.build().execute(&self.pool).await?;
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM card_labels WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn map_row(row: SqliteRow) -> CardLabelRecord {
        CardLabelRecord {
            id: row.get::<i64, _>("id"),
            card_id: row.get::<i64, _>("card_id"),
            name: row.get("name"),
            color: row.get("color"),
            created_at: row.get::<i64, _>("created_at"),
        }
    }
}
