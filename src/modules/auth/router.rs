use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    get_admin_details, get_doctor_details, get_patient_details, login, logout_admin,
    logout_doctor, logout_patient, register_patient,
};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/patient/register", post(register_patient))
        .route("/login", post(login))
}

/// Routes for an admitted admin. Mount behind `require_admin`.
pub fn init_admin_session_router() -> Router<AppState> {
    Router::new()
        .route("/admin/me", get(get_admin_details))
        .route("/admin/logout", get(logout_admin))
}

pub fn init_patient_session_router() -> Router<AppState> {
    Router::new()
        .route("/patient/me", get(get_patient_details))
        .route("/patient/logout", get(logout_patient))
}

pub fn init_doctor_session_router() -> Router<AppState> {
    Router::new()
        .route("/doctor/me", get(get_doctor_details))
        .route("/doctor/logout", get(logout_doctor))
}
