//! Request fingerprints.
//!
//! A fingerprint is the tuple (operation kind, selector, raw payload bytes).
//! It is compared by value, so two fingerprints are equal exactly when the
//! inputs are byte-identical. Payloads are not normalized: `{"a":1,"b":2}`
//! and `{"b":2,"a":1}` are different fingerprints.

use std::fmt;
use std::sync::Arc;

use crate::types::OperationKind;

/// Identity of a cacheable request.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    operation: OperationKind,
    selector: Option<&'static str>,
    payload: Arc<[u8]>,
}

impl Fingerprint {
    /// Fingerprint a request.
    ///
    /// `selector` is the interpreter or attacker id for operations that take
    /// one. It is a `&'static str` because selectors are always members of a
    /// closed enumeration by the time a request reaches the cache.
    pub fn new(operation: OperationKind, selector: Option<&'static str>, payload: &[u8]) -> Self {
        Self {
            operation,
            selector,
            payload: Arc::from(payload),
        }
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn selector(&self) -> Option<&'static str> {
        self.selector
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("operation", &self.operation)
            .field("selector", &self.selector)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
