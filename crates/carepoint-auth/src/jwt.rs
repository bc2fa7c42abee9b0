//! Session token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the principal ID, its role and the
//! issue/expiry timestamps. Nothing is stored server-side: a token is valid
//! exactly when its signature checks out and `exp` is still in the future.
//!
//! # Example
//!
//! ```ignore
//! use carepoint_auth::SessionTokens;
//! use carepoint_config::JwtConfig;
//!
//! let tokens = SessionTokens::new(&JwtConfig::from_env());
//!
//! let issued = tokens.issue(user.id, user.role)?;
//! let claims = tokens.verify(&issued.token)?;
//! assert_eq!(claims.sub, user.id);
//! ```

use std::fmt;
use std::sync::Arc;

use carepoint_config::JwtConfig;
use carepoint_core::AppError;
use carepoint_models::UserRole;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::claims::SessionClaims;

/// A freshly minted token with the values needed to build its cookie.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
    pub expires_at: DateTime<Utc>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

/// Token issuer and verifier, built once from [`JwtConfig`] and shared
/// through application state. Cloning is cheap.
#[derive(Clone)]
pub struct SessionTokens {
    keys: Arc<Keys>,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("lifetime", &self.keys.lifetime)
            .finish_non_exhaustive()
    }
}

impl SessionTokens {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                lifetime: Duration::days(config.expiry_days),
            }),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.keys.lifetime
    }

    pub fn issue(&self, user_id: Uuid, role: UserRole) -> Result<IssuedToken, AppError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = now + self.keys.lifetime;

        let claims = SessionClaims {
            sub: user_id,
            role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))?;

        Ok(IssuedToken {
            token,
            claims,
            expires_at,
        })
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies the signature, then checks expiry against `now` with no
    /// leeway. A token is expired from the second its `exp` is reached.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<SessionClaims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AppError::invalid_token()
            })?;

        if claims.exp <= now.timestamp() {
            return Err(AppError::expired());
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepoint_core::ErrorCode;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            expiry_days: 7,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = SessionTokens::new(&get_test_jwt_config());
        let user_id = Uuid::new_v4();

        let issued = tokens.issue(user_id, UserRole::Patient).unwrap();
        let claims = tokens.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Patient);
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn test_expiry_is_now_plus_lifetime() {
        let tokens = SessionTokens::new(&get_test_jwt_config());
        let issued = tokens
            .issue_at(Uuid::new_v4(), UserRole::Admin, fixed_now())
            .unwrap();

        assert_eq!(issued.claims.iat, 1_700_000_000);
        assert_eq!(issued.claims.exp, 1_700_000_000 + 7 * 24 * 60 * 60);
        assert_eq!(issued.expires_at, fixed_now() + Duration::days(7));
    }

    #[test]
    fn test_valid_just_before_expiry() {
        let tokens = SessionTokens::new(&get_test_jwt_config());
        let issued = tokens
            .issue_at(Uuid::new_v4(), UserRole::Patient, fixed_now())
            .unwrap();

        let almost = fixed_now() + tokens.lifetime() - Duration::seconds(1);
        assert!(tokens.verify_at(&issued.token, almost).is_ok());
    }

    #[test]
    fn test_expired_just_after_expiry() {
        let tokens = SessionTokens::new(&get_test_jwt_config());
        let issued = tokens
            .issue_at(Uuid::new_v4(), UserRole::Patient, fixed_now())
            .unwrap();

        let later = fixed_now() + tokens.lifetime() + Duration::seconds(1);
        let err = tokens.verify_at(&issued.token, later).unwrap_err();
        assert!(err.is(ErrorCode::Expired));
    }

    #[test]
    fn test_token_issued_long_ago_is_expired() {
        let tokens = SessionTokens::new(&get_test_jwt_config());
        let issued = tokens
            .issue_at(Uuid::new_v4(), UserRole::Doctor, fixed_now())
            .unwrap();

        let err = tokens.verify(&issued.token).unwrap_err();
        assert!(err.is(ErrorCode::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let tokens = SessionTokens::new(&get_test_jwt_config());
        let issued = tokens.issue(Uuid::new_v4(), UserRole::Patient).unwrap();

        let other = SessionTokens::new(&JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            expiry_days: 7,
        });

        let err = other.verify(&issued.token).unwrap_err();
        assert!(err.is(ErrorCode::InvalidToken));
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let tokens = SessionTokens::new(&get_test_jwt_config());

        for token in ["", "invalid-token", "invalid.token.here"] {
            let err = tokens.verify(token).unwrap_err();
            assert!(err.is(ErrorCode::InvalidToken), "token {token:?}");
        }
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let tokens = SessionTokens::new(&get_test_jwt_config());
        let issued = tokens.issue(Uuid::new_v4(), UserRole::Patient).unwrap();

        let mut tampered = issued.token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let err = tokens.verify(&tampered).unwrap_err();
        assert!(err.is(ErrorCode::InvalidToken));
    }

    #[test]
    fn test_debug_hides_keys() {
        let tokens = SessionTokens::new(&get_test_jwt_config());
        let debug = format!("{:?}", tokens);
        assert!(!debug.contains("test-secret"));
    }
}
