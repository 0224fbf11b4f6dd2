//! Exhibit - HTTP demo server for pretrained NLP models
//!
//! Each configured model is served by a [`ModelEndpoint`] exposing three
//! operations: predict, interpret (saliency maps) and attack (adversarial
//! examples). Model execution is delegated to a [`Predictor`]; the endpoint
//! layer adds request validation and a per-operation response cache, and
//! reports cache hits to HTTP clients through the `X-Cache-Hit` header.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use exhibit::{ModelConfig, ModelEndpoint};
//! use exhibit::engine::RemoteEngine;
//!
//! #[tokio::main]
//! async fn main() -> exhibit::Result<()> {
//!     let engine = RemoteEngine::new("http://127.0.0.1:8001", "sentiment")?;
//!     let endpoint = ModelEndpoint::new(
//!         ModelConfig::pretrained("sentiment", "roberta-sst").with_max_request_length(2048),
//!         Arc::new(engine),
//!     )?;
//!
//!     let first = endpoint.predict(br#"{"sentence": "a fine film"}"#, false).await?;
//!     let again = endpoint.predict(br#"{"sentence": "a fine film"}"#, false).await?;
//!     assert!(!first.hit && again.hit);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod permalink;
pub mod server;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use config::{Config, ModelConfig};
pub use endpoint::ModelEndpoint;
pub use engine::{EngineError, Predictor};
pub use error::{ExhibitError, Result};
pub use version::{PKG_VERSION, version_string};

pub use types::{AttackRequest, Attacker, Capability, CapabilityKind, Interpreter, OperationKind};
