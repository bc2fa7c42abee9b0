use crate::{env_lookup, parse_or};

const DEV_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Session lifetime in days; also the cookie lifetime.
    pub expiry_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            expiry_days: 7,
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET is not set, using the development secret");
            DEV_SECRET.to_string()
        });

        Self {
            secret,
            expiry_days: parse_or(&lookup, "JWT_EXPIRY_DAYS", 7),
        }
    }

    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_days * 24 * 60 * 60
    }
}
