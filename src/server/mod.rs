//! HTTP surface.
//!
//! Every model endpoint is mounted under `/api/{model_id}` and the permalink
//! service under `/permalink`. Unmatched paths get a JSON 404.

pub mod logging;
pub mod permalinks;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, middleware};
use serde_json::json;

use crate::endpoint::ModelEndpoint;
use crate::permalink::PermalinkStore;

pub use logging::log_request;
pub use permalinks::permalink_router;
pub use response::{ApiError, CACHE_HIT_HEADER, GENERIC_ERROR_MESSAGE};
pub use routes::{NO_CACHE_PARAM, model_router};

/// Assemble the full application router.
pub fn app(
    endpoints: &[Arc<ModelEndpoint>],
    permalinks: Option<Arc<dyn PermalinkStore>>,
    development: bool,
) -> Router {
    let mut router = Router::new();
    for endpoint in endpoints {
        let prefix = format!("/api/{}", endpoint.id());
        router = router.nest(&prefix, model_router(Arc::clone(endpoint), development));
    }

    router
        .nest("/permalink", permalink_router(permalinks, development))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
