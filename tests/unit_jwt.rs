use axum_extra::extract::cookie::SameSite;
use carepoint_auth::{SessionNamespace, SessionTokens, cleared_cookie, session_cookie};
use carepoint_config::{CookieConfig, JwtConfig};
use carepoint_core::ErrorCode;
use carepoint_models::UserRole;
use chrono::{Duration, Utc};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        expiry_days: 7,
    }
}

#[test]
fn test_issue_for_every_role() {
    let tokens = SessionTokens::new(&get_test_jwt_config());

    for role in UserRole::ALL {
        let user_id = Uuid::new_v4();
        let issued = tokens.issue(user_id, role).unwrap();
        let claims = tokens.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, role);
    }
}

#[test]
fn test_lifetime_follows_config() {
    let tokens = SessionTokens::new(&JwtConfig {
        expiry_days: 1,
        ..get_test_jwt_config()
    });
    let now = Utc::now();
    let issued = tokens.issue_at(Uuid::new_v4(), UserRole::Admin, now).unwrap();

    assert_eq!(issued.claims.exp - issued.claims.iat, 24 * 60 * 60);
    assert!(tokens.verify_at(&issued.token, now + Duration::hours(23)).is_ok());

    let err = tokens
        .verify_at(&issued.token, now + Duration::hours(25))
        .unwrap_err();
    assert!(err.is(ErrorCode::Expired));
}

#[test]
fn test_expired_and_invalid_look_the_same() {
    let tokens = SessionTokens::new(&get_test_jwt_config());
    let stale = tokens
        .issue_at(Uuid::new_v4(), UserRole::Patient, Utc::now() - Duration::days(8))
        .unwrap();

    let expired = tokens.verify(&stale.token).unwrap_err();
    let invalid = tokens.verify("garbage").unwrap_err();

    assert_eq!(expired.status(), invalid.status());
    assert_eq!(expired.public_message(), invalid.public_message());
}

#[test]
fn test_session_cookie_carries_token() {
    let tokens = SessionTokens::new(&get_test_jwt_config());
    let issued = tokens.issue(Uuid::new_v4(), UserRole::Doctor).unwrap();
    let namespace = SessionNamespace::for_role(UserRole::Doctor);

    let cookie = session_cookie(namespace, &issued, &CookieConfig::default());

    assert_eq!(cookie.name(), "doctorToken");
    assert_eq!(cookie.value(), issued.token);
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(
        cookie.expires_datetime().unwrap().unix_timestamp(),
        issued.claims.exp
    );
}

#[test]
fn test_cleared_cookie_per_namespace() {
    let now = Utc::now();

    for namespace in [
        SessionNamespace::Admin,
        SessionNamespace::Patient,
        SessionNamespace::Doctor,
    ] {
        let cookie = cleared_cookie(namespace, now, &CookieConfig::default());

        assert_eq!(cookie.name(), namespace.cookie_name());
        assert!(cookie.value().is_empty());
        assert_eq!(cookie.path(), Some("/"));
    }
}
