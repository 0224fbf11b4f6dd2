//! Model endpoints.
//!
//! A [`ModelEndpoint`] serves one loaded model. It owns the engine handle,
//! the enabled interpreter and attacker sets, and one [`ResponseCache`] per
//! operation kind. Endpoints are immutable after construction apart from
//! cache contents, and caches are never shared between endpoints.
//!
//! Every operation validates before touching a cache:
//!
//! 1. interpreter/attacker id (unknown, then unsupported),
//! 2. request size against `max_request_length`,
//! 3. JSON decoding of the body.
//!
//! The body bytes themselves are the cache key, so two requests hit the
//! same entry only when they are byte-identical.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::cache::{
    CacheConfig, CacheStats, Cached, DEFAULT_MAX_ENTRIES, Fingerprint, ResponseCache,
    with_cache_hit_marker,
};
use crate::config::ModelConfig;
use crate::engine::{EngineResult, Predictor};
use crate::telemetry;
use crate::types::{
    AttackRequest, Attacker, Capability, CapabilitySet, Interpreter, OperationKind,
};
use crate::{ExhibitError, Result};

/// One model served over the predict / interpret / attack operations.
pub struct ModelEndpoint {
    config: ModelConfig,
    engine: Arc<dyn Predictor>,
    interpreters: CapabilitySet<Interpreter>,
    attackers: CapabilitySet<Attacker>,
    predict_cache: ResponseCache,
    interpret_cache: ResponseCache,
    attack_cache: ResponseCache,
}

impl ModelEndpoint {
    /// Build an endpoint for `config`, served by `engine`.
    ///
    /// Fails with a configuration error if the model's load options are
    /// incoherent.
    pub fn new(config: ModelConfig, engine: Arc<dyn Predictor>) -> Result<Self> {
        config.validate()?;

        let cache_config =
            CacheConfig::new().max_entries(config.cache_size.unwrap_or(DEFAULT_MAX_ENTRIES));
        let interpreters = CapabilitySet::from_config(config.interpreters.as_deref());
        let attackers = CapabilitySet::from_config(config.attackers.as_deref());

        info!(
            model = %config.id,
            engine = engine.name(),
            cache_entries = cache_config.max_entries,
            interpreters = ?interpreters.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            attackers = ?attackers.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "model endpoint ready"
        );

        Ok(Self {
            engine,
            interpreters,
            attackers,
            predict_cache: ResponseCache::new(&cache_config),
            interpret_cache: ResponseCache::new(&cache_config),
            attack_cache: ResponseCache::new(&cache_config),
            config,
        })
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn interpreters(&self) -> &CapabilitySet<Interpreter> {
        &self.interpreters
    }

    pub fn attackers(&self) -> &CapabilitySet<Attacker> {
        &self.attackers
    }

    /// The cache backing one operation kind.
    pub fn cache(&self, operation: OperationKind) -> &ResponseCache {
        match operation {
            OperationKind::Predict => &self.predict_cache,
            OperationKind::Interpret => &self.interpret_cache,
            OperationKind::Attack => &self.attack_cache,
        }
    }

    pub fn cache_stats(&self, operation: OperationKind) -> CacheStats {
        self.cache(operation).stats()
    }

    /// Static model information plus the server version. Never cached.
    pub fn info(&self) -> Value {
        let c = &self.config;
        json!({
            "id": c.id,
            "pretrained_model_id": c.pretrained_model_id,
            "archive_file": c.archive_file,
            "predictor_name": c.predictor_name,
            "overrides": c.overrides,
            "attackers": self.attackers,
            "interpreters": self.interpreters,
            "max_request_length": c.max_request_length,
            "library_version": crate::version_string(),
        })
    }

    /// Run a prediction on the JSON in `body`.
    #[instrument(skip(self, body), fields(model = %self.config.id, operation = "predict"))]
    pub async fn predict(&self, body: &[u8], no_cache: bool) -> Result<Cached<Value>> {
        self.check_length(body)?;
        let inputs: Value = serde_json::from_slice(body)?;

        self.run(OperationKind::Predict, None, body, no_cache, || async move {
            self.engine.predict(&inputs).await
        })
        .await
    }

    /// Run interpreter `interpreter_id` on the JSON in `body`.
    #[instrument(skip(self, body), fields(model = %self.config.id, operation = "interpret"))]
    pub async fn interpret(
        &self,
        interpreter_id: &str,
        body: &[u8],
        no_cache: bool,
    ) -> Result<Cached<Value>> {
        let interpreter = self.interpreters.resolve(interpreter_id)?;
        self.check_length(body)?;
        let inputs: Value = serde_json::from_slice(body)?;

        self.run(
            OperationKind::Interpret,
            Some(interpreter.as_str()),
            body,
            no_cache,
            || async move { self.engine.interpret(interpreter, &inputs).await },
        )
        .await
    }

    /// Run attacker `attacker_id` with the [`AttackRequest`] in `body`.
    #[instrument(skip(self, body), fields(model = %self.config.id, operation = "attack"))]
    pub async fn attack(
        &self,
        attacker_id: &str,
        body: &[u8],
        no_cache: bool,
    ) -> Result<Cached<Value>> {
        let attacker = self.attackers.resolve(attacker_id)?;
        self.check_length(body)?;
        let request: AttackRequest = serde_json::from_slice(body)?;

        self.run(
            OperationKind::Attack,
            Some(attacker.as_str()),
            body,
            no_cache,
            || async move { self.engine.attack(attacker, &request).await },
        )
        .await
    }

    fn check_length(&self, body: &[u8]) -> Result<()> {
        match self.config.max_request_length {
            Some(max) if body.len() > max => Err(ExhibitError::RequestTooLarge {
                model: self.config.id.clone(),
                max,
                actual: body.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Dispatch to the engine, through the operation's cache unless bypassed.
    async fn run<F, Fut>(
        &self,
        operation: OperationKind,
        selector: Option<&'static str>,
        body: &[u8],
        no_cache: bool,
        compute: F,
    ) -> Result<Cached<Value>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = EngineResult<Value>>,
    {
        let start = Instant::now();

        let outcome = if no_cache {
            compute().await.map(Cached::fresh)
        } else {
            let fingerprint = Fingerprint::new(operation, selector, body);
            with_cache_hit_marker(self.cache(operation), fingerprint, compute).await
        };

        self.record(operation, start, no_cache, &outcome);
        Ok(outcome?)
    }

    fn record(
        &self,
        operation: OperationKind,
        start: Instant,
        no_cache: bool,
        outcome: &EngineResult<Cached<Value>>,
    ) {
        let model = self.config.id.clone();
        let op = operation.as_str();
        let status = if outcome.is_ok() { "ok" } else { "error" };

        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "model" => model.clone(), "operation" => op, "status" => status)
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "model" => model.clone(), "operation" => op)
        .record(start.elapsed().as_secs_f64());

        match outcome {
            Ok(cached) if !no_cache => {
                let name = if cached.hit {
                    telemetry::CACHE_HITS_TOTAL
                } else {
                    telemetry::CACHE_MISSES_TOTAL
                };
                metrics::counter!(name, "model" => model, "operation" => op).increment(1);
            }
            Ok(_) => {}
            Err(err) => {
                metrics::counter!(telemetry::ENGINE_FAILURES_TOTAL,
                    "model" => model, "operation" => op)
                .increment(1);
                warn!(model = %self.config.id, operation = op, error = %err, "engine call failed");
            }
        }
    }
}

impl std::fmt::Debug for ModelEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEndpoint")
            .field("id", &self.config.id)
            .field("engine", &self.engine.name())
            .finish_non_exhaustive()
    }
}
