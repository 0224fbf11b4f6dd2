//! Engine client for a remote inference worker.
//!
//! The worker hosts the loaded model and exposes the same three operations
//! over HTTP:
//!
//! - `POST {base_url}/{model_id}/predict`
//! - `POST {base_url}/{model_id}/interpret/{interpreter_id}`
//! - `POST {base_url}/{model_id}/attack/{attacker_id}`
//!
//! Request and response bodies are JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use super::{EngineError, EngineResult, Predictor};
use crate::types::{AttackRequest, Attacker, Capability, Interpreter};
use crate::{ExhibitError, Result};

/// Default request timeout. Interpretation and attacks can be slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for a remote inference worker serving one model.
#[derive(Clone)]
pub struct RemoteEngine {
    http: Client,
    base_url: String,
    model_id: String,
}

impl RemoteEngine {
    /// Create a client for `model_id` on the worker at `base_url`.
    pub fn new(base_url: impl Into<String>, model_id: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, model_id, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        model_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExhibitError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model_id: model_id.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.model_id, route)
    }

    async fn post<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> EngineResult<Value> {
        let response = self
            .http
            .post(self.url(route))
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EngineError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }
}

/// Pull the message out of a `{"error": "..."}` body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl Predictor for RemoteEngine {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(name = "engine.predict", skip(self, inputs), fields(model = %self.model_id))]
    async fn predict(&self, inputs: &Value) -> EngineResult<Value> {
        self.post("predict", inputs).await
    }

    #[instrument(name = "engine.interpret", skip(self, inputs), fields(model = %self.model_id))]
    async fn interpret(&self, interpreter: Interpreter, inputs: &Value) -> EngineResult<Value> {
        self.post(&format!("interpret/{}", interpreter.as_str()), inputs)
            .await
    }

    #[instrument(name = "engine.attack", skip(self, request), fields(model = %self.model_id))]
    async fn attack(&self, attacker: Attacker, request: &AttackRequest) -> EngineResult<Value> {
        self.post(&format!("attack/{}", attacker.as_str()), request)
            .await
    }
}
