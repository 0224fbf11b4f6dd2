//! Permalinks.
//!
//! A permalink stores the request a user made against a demo so the page can
//! be re-opened later. Stored requests are addressed by an integer id and
//! exposed to clients as a semi-opaque slug: the URL-safe base64 encoding of
//! the decimal id.
//!
//! Storage sits behind the [`PermalinkStore`] trait. [`InMemoryPermalinkStore`]
//! is the bundled implementation.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::Result;

/// A stored request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermaLink {
    /// Legacy model name, sent by older front-ends only.
    #[serde(default)]
    pub model_name: Option<String>,
    pub request_data: Value,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub task_name: Option<String>,
}

/// Turn an integer id into a slug.
pub fn int_to_slug(id: u64) -> String {
    URL_SAFE.encode(id.to_string())
}

/// Turn a slug back into an id. `None` if the slug is not well-formed.
pub fn slug_to_int(slug: &str) -> Option<u64> {
    let bytes = match URL_SAFE.decode(slug) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(slug, error = %e, "unable to decode slug");
            return None;
        }
    };
    std::str::from_utf8(&bytes).ok()?.parse().ok()
}

/// Backing store for permalinks.
#[async_trait]
pub trait PermalinkStore: Send + Sync {
    /// Store a request and return its new id.
    async fn insert(&self, link: PermaLink) -> Result<u64>;

    /// Fetch a stored request. `Ok(None)` if there is no such id.
    async fn get(&self, id: u64) -> Result<Option<PermaLink>>;
}

/// Process-local permalink store. Ids start at 1.
#[derive(Default)]
pub struct InMemoryPermalinkStore {
    links: RwLock<Vec<PermaLink>>,
}

impl InMemoryPermalinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PermalinkStore for InMemoryPermalinkStore {
    async fn insert(&self, link: PermaLink) -> Result<u64> {
        let mut links = self.links.write().await;
        links.push(link);
        Ok(links.len() as u64)
    }

    async fn get(&self, id: u64) -> Result<Option<PermaLink>> {
        let links = self.links.read().await;
        let index = match id.checked_sub(1) {
            Some(index) => index as usize,
            None => return Ok(None),
        };
        Ok(links.get(index).cloned())
    }
}
