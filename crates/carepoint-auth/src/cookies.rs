//! Session cookie namespaces and builders.
//!
//! Each role keeps its session under its own cookie name, so one browser can
//! hold an admin session and a patient session side by side.

use axum_extra::extract::cookie::{Cookie, SameSite};
use carepoint_config::CookieConfig;
use carepoint_models::UserRole;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;

use crate::jwt::IssuedToken;

pub const ADMIN_COOKIE: &str = "adminToken";
pub const PATIENT_COOKIE: &str = "patientToken";
pub const DOCTOR_COOKIE: &str = "doctorToken";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionNamespace {
    Admin,
    Patient,
    Doctor,
}

impl SessionNamespace {
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Patient => Self::Patient,
            UserRole::Doctor => Self::Doctor,
        }
    }

    /// The only role a gate on this namespace admits.
    pub fn role(self) -> UserRole {
        match self {
            Self::Admin => UserRole::Admin,
            Self::Patient => UserRole::Patient,
            Self::Doctor => UserRole::Doctor,
        }
    }

    pub fn cookie_name(self) -> &'static str {
        match self {
            Self::Admin => ADMIN_COOKIE,
            Self::Patient => PATIENT_COOKIE,
            Self::Doctor => DOCTOR_COOKIE,
        }
    }

    /// Human label used in error messages ("Admin authentication required").
    pub fn label(self) -> &'static str {
        self.role().as_str()
    }
}

fn to_offset(at: DateTime<Utc>) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(at.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

fn base_cookie(
    namespace: SessionNamespace,
    value: String,
    expires: DateTime<Utc>,
    config: &CookieConfig,
) -> Cookie<'static> {
    Cookie::build((namespace.cookie_name(), value))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
        .path("/")
        .expires(to_offset(expires))
        .build()
}

/// Cookie carrying `issued`, expiring together with the token.
pub fn session_cookie(
    namespace: SessionNamespace,
    issued: &IssuedToken,
    config: &CookieConfig,
) -> Cookie<'static> {
    base_cookie(namespace, issued.token.clone(), issued.expires_at, config)
}

/// Empty cookie that tells the browser to drop the namespace's session now.
pub fn cleared_cookie(
    namespace: SessionNamespace,
    now: DateTime<Utc>,
    config: &CookieConfig,
) -> Cookie<'static> {
    let mut cookie = base_cookie(namespace, String::new(), now, config);
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}
