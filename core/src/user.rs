use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::db::Database;

pub const USER_TYPE_REGULAR: &str = "regular";

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
    pub streak: i64,
    pub last_streak_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct UserStore {
    pool: Pool<Sqlite>,
}

impl UserStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn create(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord> {
        let created_at = Utc::now().timestamp();

        let result = sqlx::query(
            "INSERT INTO users (full_name, email, password_hash, user_type, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(USER_TYPE_REGULAR)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .with_context(|| "failed to insert user".to_string())?;

        Ok(UserRecord {
            id: result.last_insert_rowid(),
            full_name: full_name.to_owned(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            user_type: USER_TYPE_REGULAR.to_owned(),
            streak: 0,
            last_streak_at: None,
            created_at,
        })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            "SELECT id, full_name, email, password_hash, user_type, streak, last_streak_at, created_at \
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            "SELECT id, full_name, email, password_hash, user_type, streak, last_streak_at, created_at \
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::map_row))
    }

    pub async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn map_row(row: SqliteRow) -> UserRecord {
        UserRecord {
            id: row.get::<i64, _>("id"),
            full_name: row.get("full_name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            user_type: row.get("user_type"),
            streak: row.get::<i64, _>("streak"),
            last_streak_at: row.get::<Option<i64>, _>("last_streak_at"),
            created_at: row.get::<i64, _>("created_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, db::Database};
    use tempfile::TempDir;

    async fn setup_database() -> anyhow::Result<(Database, TempDir)> {
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

    #[tokio::test]
    async fn create_assigns_ids_and_defaults() -> anyhow::Result<()> {
        let (database, _temp_dir) = setup_database().await?;
        let store = UserStore::new(&database);

        let user = store
            .create("Alice Smith", "alice@example.com", "hash")
            .await?;
        assert!(user.id > 0);
        assert_eq!(user.user_type, USER_TYPE_REGULAR);
        assert_eq!(user.streak, 0);
        assert!(user.last_streak_at.is_none());

        let fetched = store
            .find_by_email("alice@example.com")
            .await?
            .expect("user present");
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.full_name, "Alice Smith");

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() -> anyhow::Result<()> {
        let (database, _temp_dir) = setup_database().await?;
        let store = UserStore::new(&database);

        store
            .create("Alice Smith", "alice@example.com", "hash")
            .await?;
        let err = store
            .create("Other Alice", "alice@example.com", "hash")
            .await
            .expect_err("duplicate email must fail");
        assert!(crate::db::is_unique_violation(&err));

        Ok(())
    }

    #[tokio::test]
    async fn update_password_persists() -> anyhow::Result<()> {
        let (database, _temp_dir) = setup_database().await?;
        let store = UserStore::new(&database);

        let user = store.create("Bob", "bob@example.com", "old-hash").await?;
        store.update_password(user.id, "new-hash").await?;

        let fetched = store.find_by_id(user.id).await?.expect("user present");
        assert_eq!(fetched.password_hash, "new-hash");

        Ok(())
    }
}
