//! Telemetry metric name constants.
//!
//! Centralised metric names for exhibit endpoints. The daemon or embedding
//! application installs its own `metrics` recorder (e.g. prometheus); without
//! a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `exhibit_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `model` — endpoint model id
//! - `operation` — "predict", "interpret" or "attack"
//! - `status` — outcome: "ok" or "error"

/// Total operation requests handled by endpoints, cached or not.
///
/// Labels: `model`, `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "exhibit_requests_total";

/// Operation duration in seconds, including cache lookup.
///
/// Labels: `model`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "exhibit_request_duration_seconds";

/// Total response cache hits.
///
/// Labels: `model`, `operation`.
pub const CACHE_HITS_TOTAL: &str = "exhibit_cache_hits_total";

/// Total response cache misses (including calls on a disabled cache).
///
/// Labels: `model`, `operation`.
pub const CACHE_MISSES_TOTAL: &str = "exhibit_cache_misses_total";

/// Total engine failures.
///
/// Labels: `model`, `operation`.
pub const ENGINE_FAILURES_TOTAL: &str = "exhibit_engine_failures_total";
