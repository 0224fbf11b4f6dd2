//! Caching subsystem.
//!
//! - [`Fingerprint`] — identity of a cacheable request: operation kind,
//!   optional interpreter/attacker selector, and the raw request bytes.
//!
//! - [`ResponseCache`] — bounded LRU memoizing cache from fingerprint to
//!   JSON result, with hit/miss accounting and per-key init coalescing.
//!   See [`response`] module docs for exact semantics.
//!
//! - [`with_cache_hit_marker`] — runs a call through a cache and returns a
//!   [`Cached`] value carrying the hit flag for the HTTP layer.

pub mod fingerprint;
pub mod observe;
pub mod response;

pub use fingerprint::Fingerprint;
pub use observe::{Cached, with_cache_hit_marker};
pub use response::{CacheConfig, CacheStats, DEFAULT_MAX_ENTRIES, ResponseCache};
