//! Mapping results onto HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::error;

use crate::ExhibitError;
use crate::cache::Cached;

/// Header set to `1` on responses served from a response cache.
pub const CACHE_HIT_HEADER: &str = "x-cache-hit";

/// Body message for server errors outside development mode.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

impl IntoResponse for Cached<Value> {
    fn into_response(self) -> Response {
        let mut response = Json(self.value).into_response();
        if self.hit {
            response
                .headers_mut()
                .insert(CACHE_HIT_HEADER, HeaderValue::from_static("1"));
        }
        response
    }
}

/// An [`ExhibitError`] on its way to a client.
///
/// Rendered as `{"error": "<message>"}`. Server errors hide their detail
/// unless `expose_internal` is set (development mode).
#[derive(Debug)]
pub struct ApiError {
    pub error: ExhibitError,
    pub expose_internal: bool,
}

impl ApiError {
    pub fn new(error: ExhibitError, expose_internal: bool) -> Self {
        Self {
            error,
            expose_internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.error.is_client_error() {
            self.error.to_string()
        } else {
            error!(error = %self.error, "request failed");
            if self.expose_internal {
                self.error.to_string()
            } else {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
