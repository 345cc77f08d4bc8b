//! Daily activity streak accounting.
//!
//! A user's streak increments at most once per UTC calendar day. The update
//! is a single conditional statement so concurrent same-day activity cannot
//! double-count.

use chrono::{DateTime, Datelike, Utc};
use sqlx::{Pool, Sqlite};
use thiserror::Error;

use crate::db::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    Incremented { streak: i64 },
    AlreadyCounted,
}

#[derive(Debug, Error)]
pub enum StreakError {
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Whether `last_streak_at` falls on the same UTC calendar day as `now`.
pub fn has_streak_today(last_streak_at: Option<i64>, now: DateTime<Utc>) -> bool {
    let Some(ts) = last_streak_at else {
        return false;
    };
    let Some(last) = DateTime::from_timestamp(ts, 0) else {
        return false;
    };
    last.year() == now.year() && last.ordinal() == now.ordinal()
}

#[derive(Clone)]
pub struct StreakStore {
    pool: Pool<Sqlite>,
}

impl StreakStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn record_activity(&self, user_id: i64) -> Result<StreakUpdate, StreakError> {
        self.record_activity_at(user_id, Utc::now()).await
    }

    pub async fn record_activity_at(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<StreakUpdate, StreakError> {
        let ts = now.timestamp();
        let result = sqlx::query(
            "UPDATE users SET streak = streak + 1, last_streak_at = ? \
             WHERE id = ? AND (last_streak_at IS NULL \
                OR date(last_streak_at, 'unixepoch') <> date(?, 'unixepoch'))",
        )
        .bind(ts)
        .bind(user_id)
        .bind(ts)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            let streak: i64 = sqlx::query_scalar("SELECT streak FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
            return Ok(StreakUpdate::Incremented { streak });
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_some() {
            Ok(StreakUpdate::AlreadyCounted)
        } else {
            Err(StreakError::UserNotFound(user_id))
        }
    }
}
