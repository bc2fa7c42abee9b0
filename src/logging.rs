//! Tracing setup and per-request logging.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, Level, info, info_span};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const LOG_DIR: &str = "storage/logs";

fn completion_level(status: u16) -> Level {
    match status {
        500..=u16::MAX => Level::ERROR,
        400..=499 => Level::WARN,
        _ => Level::INFO,
    }
}

/// Wraps each request in a span carrying a fresh request id, and logs one
/// completion event with status and latency.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %req.method(),
        path = %path,
    );

    let response = next.run(req).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let level = completion_level(status);
    span.in_scope(|| {
        if level == Level::ERROR {
            tracing::error!(status, latency_ms, "Request failed");
        } else if level == Level::WARN {
            tracing::warn!(status, latency_ms, "Request rejected");
        } else {
            info!(status, latency_ms, "Request completed");
        }
    });

    response
}

fn daily_writer(file_name: &str) -> (NonBlocking, WorkerGuard) {
    tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        LOG_DIR,
        file_name,
    ))
}

/// Installs the global subscriber:
///
/// | layer   | sink                          | filter     |
/// |---------|-------------------------------|------------|
/// | console | stdout, compact               | `RUST_LOG` |
/// | errors  | `storage/logs/carepoint.log`  | `error`    |
/// | json    | `storage/logs/carepoint.json` | `info`     |
///
/// The returned guards flush the file writers on drop, so `main` holds them
/// until shutdown.
pub fn init_tracing() -> std::io::Result<Vec<WorkerGuard>> {
    std::fs::create_dir_all(LOG_DIR)?;

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=debug,carepoint_db=info,carepoint_auth=info,carepoint_media=info,tower_http=warn,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let (error_writer, error_guard) = daily_writer("carepoint.log");
    let (json_writer, json_guard) = daily_writer("carepoint.json");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_writer(error_writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new("error")),
        )
        .with(
            fmt::layer()
                .json()
                .with_writer(json_writer)
                .with_current_span(true)
                .with_filter(EnvFilter::new("info")),
        )
        .init();

    info!(log_dir = LOG_DIR, "Tracing initialized");

    Ok(vec![error_guard, json_guard])
}
