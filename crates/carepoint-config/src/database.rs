use std::time::Duration;

use crate::{env_lookup, parse_or};

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Upper bound for acquiring a connection and for each query.
    pub timeout: Duration,
}

impl DatabaseConfig {
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is not set.
    pub fn from_env() -> Self {
        let url = env_lookup("DATABASE_URL").expect("DATABASE_URL must be set");

        Self {
            url,
            max_connections: parse_or(&env_lookup, "DATABASE_MAX_CONNECTIONS", 10),
            timeout: Duration::from_secs(parse_or(&env_lookup, "DATABASE_TIMEOUT_SECS", 5)),
        }
    }
}
