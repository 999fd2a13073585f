use diesel::{
    PgConnection,
    r2d2::{self, ConnectionManager},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::domain::repositories::StorageError;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

pub fn create_connection_pool(database_url: &str, max_size: u32) -> Result<DbPool, StorageError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    r2d2::Pool::builder()
        .max_size(max_size)
        .min_idle(Some(1))
        .build(manager)
        .map_err(|e| StorageError::Connection(e.to_string()))
}

pub fn get_connection_from_pool(pool: &DbPool) -> Result<DbConnection, StorageError> {
    pool.get()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

pub fn run_migrations(pool: &DbPool) -> Result<(), StorageError> {
    let mut conn = get_connection_from_pool(pool)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::Query(e.to_string()))?;

    tracing::info!("Applied {} pending migrations", applied.len());
    Ok(())
}

/// Runs a blocking diesel call on the blocking thread pool with a pooled
/// connection.
pub async fn run_blocking<T, F>(pool: &DbPool, query: F) -> Result<T, StorageError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, StorageError> + Send + 'static,
{
    let pool = pool.clone();

    tokio::task::spawn_blocking(move || {
        let mut conn = get_connection_from_pool(&pool)?;
        query(&mut conn)
    })
    .await
    .map_err(|e| StorageError::Connection(format!("database task aborted: {}", e)))?
}

pub(crate) fn query_error(error: diesel::result::Error) -> StorageError {
    StorageError::Query(error.to_string())
}
