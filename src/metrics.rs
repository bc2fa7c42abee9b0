//! Prometheus metrics.
//!
//! The `metrics` macros are no-ops until [`init_metrics`] installs the
//! recorder, so handlers record unconditionally and tests need no setup.

use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const REQUEST_DURATION: &str = "http_request_duration_seconds";
const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Installs the global Prometheus recorder and spawns its upkeep task.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_owned()), LATENCY_BUCKETS)?
        .install_recorder()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            ticker.tick().await;
            upkeep.run_upkeep();
        }
    });

    Ok(handle)
}

/// Counts requests by route template, not raw URI, to keep label cardinality
/// bounded.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or("unmatched", |matched| matched.as_str())
        .to_owned();

    gauge!("http_requests_in_flight").increment(1.0);
    let response = next.run(req).await;
    gauge!("http_requests_in_flight").decrement(1.0);

    let status = response.status().as_u16().to_string();
    histogram!(REQUEST_DURATION, "method" => method.clone(), "route" => route.clone())
        .record(started.elapsed().as_secs_f64());
    counter!("http_requests_total", "method" => method, "route" => route, "status" => status)
        .increment(1);

    response
}

/// Router serving the exposition format at `/metrics`.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_user_created(role: &str) {
    counter!("users_created_total", "role" => role.to_owned()).increment(1);
}

pub fn track_user_login_success(role: &str) {
    counter!("user_logins_total", "status" => "success", "role" => role.to_owned()).increment(1);
}

/// `reason` is one of `unknown_email`, `wrong_password`, `unusable_hash`,
/// `role_mismatch`.
pub fn track_user_login_failure(reason: &'static str) {
    counter!("user_logins_total", "status" => "failure", "reason" => reason).increment(1);
}

pub fn track_session_issued(role: &str) {
    counter!("session_tokens_issued_total", "role" => role.to_owned()).increment(1);
}

pub fn track_avatar_upload(uploaded: bool) {
    let outcome = if uploaded { "uploaded" } else { "failed" };
    counter!("avatar_uploads_total", "outcome" => outcome).increment(1);
}
