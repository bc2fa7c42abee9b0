//! Role-set authorization.
//!
//! Runs behind a session gate, which attaches the [`CurrentUser`]. Use it for
//! routes open to more than one role.
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use carepoint_models::UserRole;
//! use crate::middleware::role::require_roles;
//!
//! const STAFF: &[UserRole] = &[UserRole::Admin, UserRole::Doctor];
//!
//! let staff_routes = Router::new()
//!     .route("/rota", get(rota_handler))
//!     .route_layer(middleware::from_fn(|req, next| require_roles(req, next, STAFF)));
//! ```

use axum::{extract::Request, middleware::Next, response::Response};
use carepoint_core::AppError;
use carepoint_models::UserRole;

use crate::middleware::session::CurrentUser;

pub fn check_any_role(current: &CurrentUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&current.user.role) {
        Ok(())
    } else {
        Err(AppError::role_not_authorized(current.user.role.as_str()))
    }
}

pub async fn require_roles(
    req: Request,
    next: Next,
    allowed: &'static [UserRole],
) -> Result<Response, AppError> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::auth_required("User"))?;

    check_any_role(current, allowed)?;

    Ok(next.run(req).await)
}
