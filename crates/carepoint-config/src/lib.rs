//! # CarePoint Config
//!
//! Configuration types for the CarePoint API, loaded once from environment
//! variables at startup and then passed around as immutable values.
//!
//! - [`jwt`]: session token signing secret and lifetime
//! - [`cookie`]: session cookie attributes driven by `ENVIRONMENT`
//! - [`cors`]: allowed browser origins
//! - [`database`]: PostgreSQL connection settings
//! - [`media`]: Cloudinary credentials for doctor avatars
//! - [`server`]: listen port
//!
//! # Example
//!
//! ```ignore
//! use carepoint_config::{CookieConfig, CorsConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cookie_config = CookieConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cookie;
pub mod cors;
pub mod database;
pub mod jwt;
pub mod media;
pub mod server;

pub use cookie::CookieConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use media::MediaConfig;
pub use server::ServerConfig;

/// Parses `key` through `lookup`, falling back to `default` when the variable
/// is absent or unparseable.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
