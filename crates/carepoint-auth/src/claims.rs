//! JWT claim structure for session tokens.

use carepoint_models::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every session token.
///
/// The role is carried for logging and diagnostics only. Gates always
/// reload the principal and compare the stored role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Principal ID (subject claim)
    pub sub: Uuid,
    pub role: UserRole,
    /// Expiration, seconds since the Unix epoch
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
}
