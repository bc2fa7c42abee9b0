use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use super::controller::{add_new_admin, add_new_doctor, get_all_doctors};
use super::model::MAX_DOCTOR_FORM_BYTES;
use crate::state::AppState;

/// Staff creation routes. Mounted behind the admin gate.
pub fn init_staff_router() -> Router<AppState> {
    Router::new()
        .route("/admin/addnew", post(add_new_admin))
        .route(
            "/doctor/addnew",
            post(add_new_doctor).layer(DefaultBodyLimit::max(MAX_DOCTOR_FORM_BYTES)),
        )
}

pub fn init_directory_router() -> Router<AppState> {
    Router::new().route("/doctors", get(get_all_doctors))
}
