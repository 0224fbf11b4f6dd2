//! HTTP routes for a single model endpoint.
//!
//! - `GET /`: model info
//! - `POST /predict`: prediction
//! - `POST /interpret/{interpreter_id}`: saliency interpretation
//! - `POST /attack/{attacker_id}`: adversarial attack
//!
//! Any request carrying a `no_cache` query parameter, whatever its value,
//! bypasses the response cache: nothing is read from it or written to it.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use super::response::ApiError;
use crate::cache::Cached;
use crate::endpoint::ModelEndpoint;

/// Query parameter that disables the response cache for one request.
pub const NO_CACHE_PARAM: &str = "no_cache";

#[derive(Clone)]
struct ModelState {
    endpoint: Arc<ModelEndpoint>,
    development: bool,
}

impl ModelState {
    fn fail(&self, error: crate::ExhibitError) -> ApiError {
        ApiError::new(error, self.development)
    }
}

type Params = Query<HashMap<String, String>>;

fn no_cache(params: &Params) -> bool {
    params.contains_key(NO_CACHE_PARAM)
}

/// Router serving one model endpoint at its root.
pub fn model_router(endpoint: Arc<ModelEndpoint>, development: bool) -> Router {
    Router::new()
        .route("/", get(info))
        .route("/predict", post(predict))
        .route("/interpret/{interpreter_id}", post(interpret))
        .route("/attack/{attacker_id}", post(attack))
        .with_state(ModelState {
            endpoint,
            development,
        })
}

async fn info(State(state): State<ModelState>) -> Json<Value> {
    Json(state.endpoint.info())
}

async fn predict(
    State(state): State<ModelState>,
    params: Params,
    body: Bytes,
) -> Result<Cached<Value>, ApiError> {
    state
        .endpoint
        .predict(&body, no_cache(&params))
        .await
        .map_err(|e| state.fail(e))
}

async fn interpret(
    State(state): State<ModelState>,
    Path(interpreter_id): Path<String>,
    params: Params,
    body: Bytes,
) -> Result<Cached<Value>, ApiError> {
    state
        .endpoint
        .interpret(&interpreter_id, &body, no_cache(&params))
        .await
        .map_err(|e| state.fail(e))
}

async fn attack(
    State(state): State<ModelState>,
    Path(attacker_id): Path<String>,
    params: Params,
    body: Bytes,
) -> Result<Cached<Value>, ApiError> {
    state
        .endpoint
        .attack(&attacker_id, &body, no_cache(&params))
        .await
        .map_err(|e| state.fail(e))
}
