//! Permalink routes, mounted at `/permalink`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::info;

use super::response::ApiError;
use crate::ExhibitError;
use crate::permalink::{PermaLink, PermalinkStore, int_to_slug, slug_to_int};

#[derive(Clone)]
struct PermalinkState {
    store: Option<Arc<dyn PermalinkStore>>,
    development: bool,
}

impl PermalinkState {
    fn store(&self) -> Result<&Arc<dyn PermalinkStore>, ApiError> {
        self.store.as_ref().ok_or_else(|| self.fail(ExhibitError::PermalinksDisabled))
    }

    fn fail(&self, error: ExhibitError) -> ApiError {
        ApiError::new(error, self.development)
    }
}

/// Router for the permalink service. `store` is `None` when permalinks are
/// disabled; the routes still answer, with an error.
pub fn permalink_router(store: Option<Arc<dyn PermalinkStore>>, development: bool) -> Router {
    Router::new()
        .route("/", get(index).post(create))
        .route("/noop", post(noop))
        .route("/{slug}", get(fetch))
        .with_state(PermalinkState { store, development })
}

async fn index() -> Json<Value> {
    Json(json!({ "id": "permalinks" }))
}

async fn noop() {}

async fn fetch(
    State(state): State<PermalinkState>,
    Path(slug): Path<String>,
) -> Result<Json<PermaLink>, ApiError> {
    let store = state.store()?;
    let id = slug_to_int(&slug)
        .ok_or_else(|| state.fail(ExhibitError::UnrecognizedPermalink(slug.clone())))?;

    match store.get(id).await.map_err(|e| state.fail(e))? {
        Some(link) => Ok(Json(link)),
        None => Err(state.fail(ExhibitError::PermalinkNotFound(slug))),
    }
}

async fn create(
    State(state): State<PermalinkState>,
    body: Bytes,
) -> Result<Json<String>, ApiError> {
    let store = state.store()?;
    let link: PermaLink = serde_json::from_slice(&body)
        .map_err(|_| state.fail(invalid_request_data()))?;
    if is_falsy(&link.request_data) {
        return Err(state.fail(invalid_request_data()));
    }

    let id = store.insert(link).await.map_err(|e| state.fail(e))?;
    let slug = int_to_slug(id);
    info!(id, slug = %slug, "permalink stored");
    Ok(Json(slug))
}

fn invalid_request_data() -> ExhibitError {
    ExhibitError::InvalidInput("Invalid request_data".into())
}

/// Missing, null, false, zero and empty values do not count as request data.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
