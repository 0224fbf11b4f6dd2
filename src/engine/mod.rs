//! Inference engines.
//!
//! A [`Predictor`] runs the actual model work behind an endpoint: plain
//! prediction, saliency interpretation and adversarial attacks. Endpoints
//! only validate, cache and dispatch; they never inspect or recover from
//! engine failures.
//!
//! # Example
//!
//! ```ignore
//! struct Echo;
//!
//! #[async_trait]
//! impl Predictor for Echo {
//!     fn name(&self) -> &str { "echo" }
//!
//!     async fn predict(&self, inputs: &Value) -> EngineResult<Value> {
//!         Ok(json!({ "echo": inputs }))
//!     }
//! }
//! ```

mod remote;

pub use remote::RemoteEngine;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{AttackRequest, Attacker, Interpreter};

/// Errors raised by an engine.
///
/// Cloneable so a single failure can be handed to every caller that was
/// waiting on the same computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("engine API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid engine response: {0}")]
    InvalidResponse(String),

    #[error("operation not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("{0}")]
    Failed(String),
}

/// Result type alias for engine calls.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// The model work behind one endpoint.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Engine name for logging/debugging.
    fn name(&self) -> &str;

    /// Run the model on `inputs`.
    async fn predict(&self, inputs: &Value) -> EngineResult<Value>;

    /// Assign saliency scores to the inputs of a prediction.
    async fn interpret(&self, _interpreter: Interpreter, _inputs: &Value) -> EngineResult<Value> {
        Err(EngineError::NotImplemented("interpret"))
    }

    /// Perturb the inputs to change the model's prediction.
    async fn attack(&self, _attacker: Attacker, _request: &AttackRequest) -> EngineResult<Value> {
        Err(EngineError::NotImplemented("attack"))
    }
}
