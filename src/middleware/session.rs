use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use carepoint_auth::{SessionClaims, SessionNamespace};
use carepoint_core::AppError;
use carepoint_models::User;
use tracing::debug;

use crate::state::AppState;

/// The principal admitted by a session gate.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub claims: SessionClaims,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::auth_required("User"))
    }
}

/// Runs the gate checks for `namespace`:
/// token present, token valid, principal loaded, role matches.
pub async fn admit(
    state: &AppState,
    jar: &CookieJar,
    namespace: SessionNamespace,
) -> Result<CurrentUser, AppError> {
    let label = namespace.label();

    let token = jar
        .get(namespace.cookie_name())
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::auth_required(label))?;
    debug!(namespace = label, "Session token present");

    let claims = state.tokens.verify(token)?;
    debug!(namespace = label, user_id = %claims.sub, "Session token valid");

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::authorization_failed(label))?;
    debug!(namespace = label, user_id = %user.id, "Principal loaded");

    if user.role != namespace.role() {
        debug!(namespace = label, role = %user.role, "Principal holds another role");
        return Err(AppError::authorization_failed(label));
    }
    debug!(namespace = label, user_id = %user.id, "Role authorized");

    Ok(CurrentUser { user, claims })
}

async fn gate(
    state: &AppState,
    jar: &CookieJar,
    namespace: SessionNamespace,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current = admit(state, jar, namespace).await?;
    req.extensions_mut().insert(current);
    debug!(namespace = namespace.label(), "Request admitted");
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(&state, &jar, SessionNamespace::Admin, req, next).await
}

pub async fn require_patient(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(&state, &jar, SessionNamespace::Patient, req, next).await
}

pub async fn require_doctor(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(&state, &jar, SessionNamespace::Doctor, req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::header;
    use axum_extra::extract::cookie::Cookie;
    use carepoint_config::{CookieConfig, CorsConfig, JwtConfig};
    use carepoint_core::ErrorCode;
    use carepoint_db::{InMemoryUserRepository, UserRepository};
    use carepoint_media::FakeMediaHost;
    use carepoint_models::{Gender, NewUser, UserRole};
    use chrono::NaiveDate;

    async fn state_with_user(role: UserRole) -> (AppState, User) {
        let users = Arc::new(InMemoryUserRepository::new());
        let user = users
            .insert(NewUser {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@x.com".to_string(),
                phone: "03001234567".to_string(),
                nic: "3520212345671".to_string(),
                dob: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
                gender: Gender::Female,
                role,
                password_hash: "unused".to_string(),
                doctor_department: None,
                doc_avatar: None,
            })
            .await
            .unwrap();

        let state = AppState::new(
            users,
            Arc::new(FakeMediaHost::new()),
            &JwtConfig::default(),
            CookieConfig::default(),
            CorsConfig {
                allowed_origins: vec![],
            },
        );
        (state, user)
    }

    fn jar_with(name: &'static str, value: String) -> CookieJar {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            header::COOKIE,
            Cookie::new(name, value).to_string().parse().unwrap(),
        );
        CookieJar::from_headers(&headers)
    }

    #[tokio::test]
    async fn test_missing_cookie_requires_authentication() {
        let (state, _) = state_with_user(UserRole::Admin).await;

        let err = admit(&state, &CookieJar::new(), SessionNamespace::Admin)
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::AuthRequired));
        assert_eq!(
            err.public_message(),
            "Admin authentication required. Please log in."
        );
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let (state, _) = state_with_user(UserRole::Patient).await;
        let jar = jar_with("patientToken", "garbage".to_string());

        let err = admit(&state, &jar, SessionNamespace::Patient)
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::InvalidToken));
    }

    #[tokio::test]
    async fn test_valid_session_is_admitted() {
        let (state, user) = state_with_user(UserRole::Doctor).await;
        let issued = state.tokens.issue(user.id, user.role).unwrap();
        let jar = jar_with("doctorToken", issued.token);

        let current = admit(&state, &jar, SessionNamespace::Doctor).await.unwrap();
        assert_eq!(current.user, user);
        assert_eq!(current.claims.sub, user.id);
    }

    #[tokio::test]
    async fn test_token_in_wrong_namespace_is_forbidden() {
        let (state, user) = state_with_user(UserRole::Patient).await;
        let issued = state.tokens.issue(user.id, user.role).unwrap();
        let jar = jar_with("adminToken", issued.token);

        let err = admit(&state, &jar, SessionNamespace::Admin)
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::AuthorizationFailed));
        assert_eq!(
            err.public_message(),
            "Admin authorization failed. Invalid credentials."
        );
    }

    #[tokio::test]
    async fn test_unknown_principal_is_forbidden() {
        let (state, _) = state_with_user(UserRole::Admin).await;
        let issued = state
            .tokens
            .issue(uuid::Uuid::new_v4(), UserRole::Admin)
            .unwrap();
        let jar = jar_with("adminToken", issued.token);

        let err = admit(&state, &jar, SessionNamespace::Admin)
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::AuthorizationFailed));
    }
}
