//! Database connection bootstrap.

use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Connect to the database with sane pool defaults.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(url.to_string());
    opts.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Database::connect(opts)
        .await
        .map_err(|e| AppError::db(format!("failed to connect to database: {e}")))
}

/// Single entrypoint used by `StateBuilder`: connect, then bring the
/// schema up to date.
pub async fn bootstrap_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(url).await?;

    Migrator::up(&conn, None)
        .await
        .map_err(|e| AppError::db(format!("migration failed: {e}")))?;
    info!("database schema is up to date");

    Ok(conn)
}

/// Canonical way to access the database connection from application code.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state
        .db()
        .ok_or_else(|| AppError::db("database connection not available"))
}
