use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::AppConfig;

pub mod connection;
pub mod errors;

pub use connection::SqlitePool;
pub use errors::is_unique_violation;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Open the configured database file, creating parent directories as
    /// needed, and bring the schema up to date.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let db_file = resolve_db_path(&config.database_path)?;
        if let Some(parent) = db_file.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory: {}", parent.display())
            })?;
        }

        let pool = connection::create_pool(&db_file, config.database_max_connections).await?;
        connection::run_migrations(&pool).await?;
        info!(path = %db_file.display(), "database ready");

        Ok(Self {
            pool,
            path: db_file,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn database_path(&self) -> &PathBuf {
        &self.path
    }
}

fn resolve_db_path(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = std::env::current_dir().context("failed to obtain current directory")?;
        Ok(cwd.join(path))
    }
}
