use crate::env_lookup;

/// Attributes applied to every session cookie.
#[derive(Clone, Debug, Default)]
pub struct CookieConfig {
    /// Sets the `Secure` attribute. True only when `ENVIRONMENT=production`.
    pub secure: bool,
}

impl CookieConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Self {
            secure: environment.eq_ignore_ascii_case("production"),
        }
    }
}
