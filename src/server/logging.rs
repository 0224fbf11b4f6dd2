//! Request logging.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use super::response::CACHE_HIT_HEADER;

/// Emit one structured `request` event per HTTP request.
pub async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or_default().to_string();
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let forwarded_for = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let response = next.run(request).await;

    let cached = response.headers().contains_key(CACHE_HIT_HEADER);
    info!(
        target: "request",
        status = response.status().as_u16(),
        method = %method,
        path = %path,
        query = %query,
        ip = %ip,
        forwarded_for = %forwarded_for,
        latency_ms = start.elapsed().as_secs_f64() * 1000.0,
        cached,
        "request handled"
    );

    response
}

/// Install the global tracing subscriber.
///
/// Filtering comes from `RUST_LOG`, defaulting to `info`. Development mode
/// logs human-readable lines; otherwise one JSON object per event.
#[cfg(feature = "server")]
pub fn init_tracing(development: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if development {
        builder.pretty().init();
    } else {
        builder.json().init();
    }
}
