// Kelarin Server - Main Entry Point
//
// This file contains only the application bootstrap logic and CLI commands.
// All handlers, routes, and business logic are in separate modules.

pub use kelarin_server::*;

use clap::{Parser, Subcommand};
use dotenvy::{Error as DotenvError, dotenv, from_filename};
use kelarin_core::{
    config::AppConfig,
    db::{Database, is_unique_violation},
    user::UserStore,
};
use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_appender::non_blocking;
use tracing_subscriber::EnvFilter;

use anyhow::Context;

static TRACING_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(author, version, about = "Kelarin server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Run database migrations
    Migrate,
    /// Create a user account, or reset its password if it already exists
    CreateUser {
        /// Display name for the account
        full_name: String,
        /// Email for the account
        email: String,
        /// Password for the account
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_status = load_env_file();
    init_tracing();
    report_env_status(&env_status);

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_serve(config).await,
        Command::Migrate => run_migrate(config).await,
        Command::CreateUser {
            full_name,
            email,
            password,
        } => run_create_user(config, full_name, email, password).await,
    }
}

async fn run_serve(config: AppConfig) -> anyhow::Result<()> {
    info!(
        database_path = %config.database_path,
        database_max_connections = config.database_max_connections,
        "Starting server with database configuration"
    );
    let database = Database::connect(&config).await?;
    let state = state::build_state(&database, &config);

    let app = router::build_router(state);

    let listener = TcpListener::bind(config.bind_address)
        .await
        .context("failed to bind socket")?;
    let actual_addr = listener
        .local_addr()
        .context("failed to read local address")?;

    info!("listening on {actual_addr}");

    if let Err(error) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(?error, "server terminated with error");
    }

    Ok(())
}

async fn run_migrate(config: AppConfig) -> anyhow::Result<()> {
    let _database = Database::connect(&config).await?;
    info!("migrations completed");
    Ok(())
}

async fn run_create_user(
    config: AppConfig,
    full_name: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    if full_name.trim().is_empty() {
        anyhow::bail!("full name must not be empty");
    }

    if email.trim().is_empty() {
        anyhow::bail!("email must not be empty");
    }

    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let database = Database::connect(&config).await?;
    let user_store = UserStore::new(&database);
    let password_hash = auth::generate_password_hash(&password)?;

    match user_store
        .create(full_name.trim(), email.trim(), &password_hash)
        .await
    {
        Ok(_) => {
            info!("created user {email}");
        }
        Err(err) => {
            if is_unique_violation(&err) {
                if let Some(existing) = user_store.find_by_email(email.trim()).await? {
                    user_store
                        .update_password(existing.id, &password_hash)
                        .await?;
                    info!("updated password for user {email}");
                } else {
                    return Err(err);
                }
            } else {
                return Err(err);
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    // Emit compact JSON to a rolling file by default; stdout is opt-in via
    // KELARIN_LOG_TO_STDOUT. Use RUST_LOG to control the level.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_to_stdout = std::env::var("KELARIN_LOG_TO_STDOUT")
        .map(|v| !v.trim().is_empty() && v.trim() != "0")
        .unwrap_or(false);

    if log_to_stdout {
        if tracing_subscriber::fmt()
            .with_env_filter(env_filter.clone())
            .with_ansi(false)
            .json()
            .with_writer(std::io::stdout)
            .try_init()
            .is_ok()
        {
            return;
        }
    }

    let log_dir = std::env::var("KELARIN_LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    if let Err(err) = std::fs::create_dir_all(&log_dir) {
        eprintln!("failed to create log dir '{log_dir}': {err}");
        std::process::exit(1);
    }
    let file_appender = tracing_appender::rolling::daily(&log_dir, "server.log");
    let (writer, guard) = non_blocking(file_appender);

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .json()
        .with_writer(writer)
        .try_init()
        .is_ok()
    {
        let _ = TRACING_GUARD.set(guard);
    }
}

enum EnvLoadStatus {
    Loaded(PathBuf),
    NotFound,
    Failed(DotenvError),
}

fn load_env_file() -> EnvLoadStatus {
    if let Ok(env_file) = std::env::var("KELARIN_ENV_FILE") {
        let trimmed = env_file.trim();
        if !trimmed.is_empty() {
            let path = PathBuf::from(trimmed);
            return match from_filename(&path) {
                Ok(_) => {
                    let display_path = make_relative(&path).unwrap_or_else(|| path.clone());
                    EnvLoadStatus::Loaded(display_path)
                }
                Err(err) => EnvLoadStatus::Failed(err),
            };
        }
    }

    match dotenv() {
        Ok(path) => {
            let display_path = make_relative(&path).unwrap_or_else(|| path.clone());
            EnvLoadStatus::Loaded(display_path)
        }
        Err(DotenvError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            EnvLoadStatus::NotFound
        }
        Err(err) => EnvLoadStatus::Failed(err),
    }
}

fn report_env_status(status: &EnvLoadStatus) {
    match status {
        EnvLoadStatus::Loaded(path) => {
            info!("Loaded environment variables from {}", path.display());
        }
        EnvLoadStatus::NotFound => {
            info!("No .env file found; using process environment only");
        }
        EnvLoadStatus::Failed(err) => {
            warn!("Failed to load .env file: {err:?}");
        }
    }
}

fn make_relative(path: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    path.strip_prefix(&cwd).map(|p| p.to_path_buf()).ok()
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut int = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

        tokio::select! {
            _ = term.recv() => {},
            _ = int.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
