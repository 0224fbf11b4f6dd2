//! Public types for the Exhibit API.

mod attack;
mod capabilities;
mod operation;

pub use attack::AttackRequest;
pub use capabilities::{Attacker, Capability, CapabilityKind, CapabilitySet, Interpreter};
pub use operation::OperationKind;
