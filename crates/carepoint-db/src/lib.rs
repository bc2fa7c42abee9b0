//! # CarePoint DB
//!
//! PostgreSQL pool setup and the principal repository for the CarePoint API.
//!
//! - [`repository`]: the [`UserRepository`] trait services depend on
//! - [`postgres`]: [`PgUserRepository`], the production implementation
//! - `memory`: `InMemoryUserRepository`, available with the `test-utils`
//!   feature
//!
//! # Example
//!
//! ```ignore
//! use carepoint_config::DatabaseConfig;
//! use carepoint_db::{PgUserRepository, init_db_pool, run_migrations};
//!
//! let config = DatabaseConfig::from_env();
//! let pool = init_db_pool(&config).await?;
//! run_migrations(&pool).await?;
//! let users = PgUserRepository::new(pool, config.timeout);
//! ```

use carepoint_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
pub use repository::{RepoFuture, UserRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a pool sized and bounded by `config`.
///
/// Acquiring a connection fails after `config.timeout` instead of queueing
/// forever behind a stalled database.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.timeout)
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        timeout = ?config.timeout,
        "Database pool ready"
    );

    Ok(pool)
}

/// Applies the migrations under the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
