use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::session::{require_admin, require_doctor, require_patient};
use crate::modules::auth::router::{
    init_admin_session_router, init_auth_router, init_doctor_session_router,
    init_patient_session_router,
};
use crate::modules::users::router::{init_directory_router, init_staff_router};
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .merge(init_auth_router())
        .merge(init_directory_router())
        .merge(
            init_admin_session_router()
                .merge(init_staff_router())
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .merge(
            init_patient_session_router().route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_patient,
            )),
        )
        .merge(
            init_doctor_session_router().route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_doctor,
            )),
        );

    Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest("/api/v1/user", user_routes)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
