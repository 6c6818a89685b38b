pub mod loader;
pub mod models;
pub mod verifier;

use crate::error::Result;

/// Open a scoped connection pool to the local store, creating the file if
/// absent. Callers own the pool for the duration of their stage and close
/// it before returning.
pub async fn connect(db_path: &str) -> Result<sqlx::SqlitePool> {
    let pool = sqlx::SqlitePool::connect(&format!("sqlite:{db_path}?mode=rwc")).await?;
    Ok(pool)
}

/// Read-only variant for the verifier. Never creates the store file; a
/// missing store is a connect error.
pub async fn connect_read_only(db_path: &str) -> Result<sqlx::SqlitePool> {
    let pool = sqlx::SqlitePool::connect(&format!("sqlite:{db_path}?mode=ro")).await?;
    Ok(pool)
}
