use std::sync::Arc;

use anyhow::Context;
use carepoint_auth::SessionTokens;
use carepoint_config::{CookieConfig, CorsConfig, DatabaseConfig, JwtConfig, MediaConfig};
use carepoint_core::prepare_dummy_hash;
use carepoint_db::{PgUserRepository, UserRepository, init_db_pool, run_migrations};
use carepoint_media::{CloudinaryMediaHost, MediaHost};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub media: Arc<dyn MediaHost>,
    pub tokens: SessionTokens,
    pub cookie_config: CookieConfig,
    pub cors_config: CorsConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("cookie_config", &self.cookie_config)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        media: Arc<dyn MediaHost>,
        jwt_config: &JwtConfig,
        cookie_config: CookieConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            users,
            media,
            tokens: SessionTokens::new(jwt_config),
            cookie_config,
            cors_config,
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env();
    let pool = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    prepare_dummy_hash()
        .await
        .map_err(|e| e.error)
        .context("Failed to prepare login hashing")?;

    let media = CloudinaryMediaHost::new(&MediaConfig::from_env())
        .context("Failed to build media host client")?;

    Ok(AppState::new(
        Arc::new(PgUserRepository::new(pool, database_config.timeout)),
        Arc::new(media),
        &JwtConfig::from_env(),
        CookieConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
