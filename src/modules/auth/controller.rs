use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::CookieJar;
use carepoint_auth::{SessionNamespace, cleared_cookie, session_cookie};
use carepoint_core::{AppError, ErrorResponse};
use carepoint_models::{
    AuthResponse, LoginRequest, MessageResponse, RegisterUserDto, User, UserResponse,
};
use chrono::Utc;
use tracing::instrument;

use super::service::AuthService;
use crate::metrics::track_session_issued;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Issues a token for `user` and stores it in the cookie of the user's role.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, String), AppError> {
    let issued = state.tokens.issue(user.id, user.role)?;
    let namespace = SessionNamespace::for_role(user.role);
    let jar = jar.add(session_cookie(namespace, &issued, &state.cookie_config));

    track_session_issued(user.role.as_str());
    tracing::info!(user_id = %user.id, namespace = namespace.label(), "Session started");

    Ok((jar, issued.token))
}

/// Expires the cookie of the current user's namespace.
fn end_session(
    state: &AppState,
    jar: CookieJar,
    current: &CurrentUser,
) -> (StatusCode, CookieJar, Json<MessageResponse>) {
    let namespace = SessionNamespace::for_role(current.user.role);
    let jar = jar.add(cleared_cookie(namespace, Utc::now(), &state.cookie_config));

    tracing::info!(user_id = %current.user.id, namespace = namespace.label(), "Session ended");

    (
        StatusCode::CREATED,
        jar,
        Json(MessageResponse::ok(format!(
            "{} Logged Out Successfully.",
            namespace.label()
        ))),
    )
}

/// Register a patient
///
/// Creates the account and starts a patient session right away.
#[utoipa::path(
    post,
    path = "/api/v1/user/patient/register",
    request_body = RegisterUserDto,
    responses(
        (status = 200, description = "Patient registered, `patientToken` cookie set", body = AuthResponse),
        (status = 400, description = "Incomplete form, invalid field or email taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn register_patient(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<RegisterUserDto>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user = AuthService::register_patient(state.users.as_ref(), dto).await?;
    let (jar, token) = start_session(&state, jar, &user)?;

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            message: "User Registered!".to_string(),
            user,
            token,
        }),
    ))
}

/// Log in with email, password and role
#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Logged in, role cookie set", body = AuthResponse),
        (status = 400, description = "Incomplete form or role does not match", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let user = AuthService::login(state.users.as_ref(), dto).await?;
    let (jar, token) = start_session(&state, jar, &user)?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            success: true,
            message: "Login Successfully!".to_string(),
            user,
            token,
        }),
    ))
}

/// Current admin
#[utoipa::path(
    get,
    path = "/api/v1/user/admin/me",
    responses(
        (status = 200, description = "The logged-in admin", body = UserResponse),
        (status = 401, description = "No valid admin session", body = ErrorResponse),
        (status = 403, description = "Session does not belong to an admin", body = ErrorResponse)
    ),
    security(("admin_cookie" = [])),
    tag = "Authentication"
)]
pub async fn get_admin_details(current: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user: current.user,
    })
}

/// Current patient
#[utoipa::path(
    get,
    path = "/api/v1/user/patient/me",
    responses(
        (status = 200, description = "The logged-in patient", body = UserResponse),
        (status = 401, description = "No valid patient session", body = ErrorResponse),
        (status = 403, description = "Session does not belong to a patient", body = ErrorResponse)
    ),
    security(("patient_cookie" = [])),
    tag = "Authentication"
)]
pub async fn get_patient_details(current: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user: current.user,
    })
}

/// Current doctor
#[utoipa::path(
    get,
    path = "/api/v1/user/doctor/me",
    responses(
        (status = 200, description = "The logged-in doctor", body = UserResponse),
        (status = 401, description = "No valid doctor session", body = ErrorResponse),
        (status = 403, description = "Session does not belong to a doctor", body = ErrorResponse)
    ),
    security(("doctor_cookie" = [])),
    tag = "Authentication"
)]
pub async fn get_doctor_details(current: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user: current.user,
    })
}

/// Log out an admin
///
/// Expires the `adminToken` cookie. The token itself stays valid until its
/// own expiry.
#[utoipa::path(
    get,
    path = "/api/v1/user/admin/logout",
    responses(
        (status = 201, description = "Cookie cleared", body = MessageResponse),
        (status = 401, description = "No valid admin session", body = ErrorResponse)
    ),
    security(("admin_cookie" = [])),
    tag = "Authentication"
)]
pub async fn logout_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    current: CurrentUser,
) -> (StatusCode, CookieJar, Json<MessageResponse>) {
    end_session(&state, jar, &current)
}

/// Log out a patient
#[utoipa::path(
    get,
    path = "/api/v1/user/patient/logout",
    responses(
        (status = 201, description = "Cookie cleared", body = MessageResponse),
        (status = 401, description = "No valid patient session", body = ErrorResponse)
    ),
    security(("patient_cookie" = [])),
    tag = "Authentication"
)]
pub async fn logout_patient(
    State(state): State<AppState>,
    jar: CookieJar,
    current: CurrentUser,
) -> (StatusCode, CookieJar, Json<MessageResponse>) {
    end_session(&state, jar, &current)
}

/// Log out a doctor
#[utoipa::path(
    get,
    path = "/api/v1/user/doctor/logout",
    responses(
        (status = 201, description = "Cookie cleared", body = MessageResponse),
        (status = 401, description = "No valid doctor session", body = ErrorResponse)
    ),
    security(("doctor_cookie" = [])),
    tag = "Authentication"
)]
pub async fn logout_doctor(
    State(state): State<AppState>,
    jar: CookieJar,
    current: CurrentUser,
) -> (StatusCode, CookieJar, Json<MessageResponse>) {
    end_session(&state, jar, &current)
}
