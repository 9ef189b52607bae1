//! SQLite pool construction and embedded migrations.

use deadpool_diesel::sqlite::{Manager, Pool};
use deadpool_diesel::Runtime;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

// this embeds the migrations into the application binary
// the migration path is relative to the `CARGO_MANIFEST_DIR`
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to build pool: {0}")]
    Build(String),
    #[error("Pool error: {0}")]
    Pool(String),
    #[error("Database task failed: {0}")]
    Interact(String),
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Build a SQLite pool. An in-memory URL needs `max_size == 1`, since every
/// connection would otherwise get its own empty database.
pub fn build_pool(database_url: &str, max_size: usize) -> Result<Pool, StoreError> {
    let manager = Manager::new(database_url, Runtime::Tokio1);
    Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|e| StoreError::Build(e.to_string()))
}

pub async fn run_migrations(pool: &Pool) -> Result<(), StoreError> {
    let conn = pool
        .get()
        .await
        .map_err(|e| StoreError::Pool(e.to_string()))?;
    conn.interact(|conn| {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| StoreError::Interact(e.to_string()))?
    .map_err(StoreError::Migration)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> Pool {
    let pool = build_pool(":memory:", 1).unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
