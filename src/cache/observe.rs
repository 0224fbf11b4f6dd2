//! Cache-hit observability.
//!
//! [`with_cache_hit_marker`] wraps a cached call and carries the hit flag
//! alongside the value, so the HTTP layer can mark responses served from
//! storage with `X-Cache-Hit: 1`.

use std::future::Future;

use serde_json::Value;
use tracing::trace;

use super::{Fingerprint, ResponseCache};

/// A result plus whether it was served from a cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub hit: bool,
}

impl<T> Cached<T> {
    /// A value that was freshly computed, or never went through a cache.
    pub fn fresh(value: T) -> Self {
        Self { value, hit: false }
    }
}

/// Run `compute` through `cache` and report whether the call was a hit.
pub async fn with_cache_hit_marker<F, Fut, E>(
    cache: &ResponseCache,
    fingerprint: Fingerprint,
    compute: F,
) -> Result<Cached<Value>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, E>>,
    E: Clone + Send + Sync + 'static,
{
    let operation = fingerprint.operation();
    let (value, hit) = cache.get_or_compute(fingerprint, compute).await?;
    trace!(%operation, hit, "response cache lookup");
    Ok(Cached { value, hit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::types::OperationKind;
    use serde_json::json;

    #[tokio::test]
    async fn marker_follows_cache_state() {
        let cache = ResponseCache::new(&CacheConfig::default());
        let fp = Fingerprint::new(OperationKind::Attack, Some("hotflip"), b"{}");

        let first = with_cache_hit_marker(&cache, fp.clone(), || async {
            Ok::<_, String>(json!({"final": []}))
        })
        .await
        .unwrap();
        assert!(!first.hit);

        let second = with_cache_hit_marker(&cache, fp, || async {
            Ok::<_, String>(json!({"final": ["changed"]}))
        })
        .await
        .unwrap();
        assert!(second.hit);
        assert_eq!(second.value, first.value);
    }

    #[tokio::test]
    async fn disabled_cache_never_marks_hits() {
        let cache = ResponseCache::new(&CacheConfig::disabled());
        let fp = Fingerprint::new(OperationKind::Predict, None, b"{}");

        for _ in 0..3 {
            let out = with_cache_hit_marker(&cache, fp.clone(), || async {
                Ok::<_, String>(json!({}))
            })
            .await
            .unwrap();
            assert!(!out.hit);
        }
        assert_eq!(cache.misses(), 3);
        assert_eq!(cache.hits(), 0);
    }
}
