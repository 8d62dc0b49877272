//! Database layer for examdesk.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod retry;
pub mod test_utils;

use examdesk_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::log::LevelFilter;

pub use retry::RetryPolicy;

/// Initialize database connection.
///
/// The pool handle is owned by the caller and threaded through the
/// repositories; it is opened once at process start and closed at shutdown.
/// Acquisition waits are bounded so that an exhausted pool surfaces as
/// [`AppError::ServiceUnavailable`] instead of blocking indefinitely.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await.map_err(map_db_err)
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None).await.map_err(map_db_err)
}

/// Map a store error into the application taxonomy.
///
/// Pool-acquisition failures (bounded wait expired, pool closed) are
/// retryable by the caller and map to `ServiceUnavailable`; everything else
/// is an opaque `Database` error.
#[must_use]
pub fn map_db_err(err: DbErr) -> AppError {
    match err {
        DbErr::ConnectionAcquire(e) => AppError::ServiceUnavailable(e.to_string()),
        other => AppError::Database(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_acquire_errors_map_to_service_unavailable() {
        let err = map_db_err(DbErr::ConnectionAcquire(sea_orm::ConnAcquireErr::Timeout));
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_other_errors_map_to_database() {
        let err = map_db_err(DbErr::Conn(RuntimeErr::Internal("connection reset".into())));
        assert!(matches!(err, AppError::Database(_)));
    }
}
