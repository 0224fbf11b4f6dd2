//! Attack request payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of an `/attack/{attacker_id}` request.
///
/// Only `inputs` is required; the field names and defaults are the ones
/// attack engines expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttackRequest {
    /// The model inputs to perturb.
    pub inputs: Value,
    /// Input field the attacker modifies.
    #[serde(default = "default_input_field_to_attack")]
    pub input_field_to_attack: String,
    /// Gradient field used to rank candidate edits.
    #[serde(default = "default_grad_input_field")]
    pub grad_input_field: String,
    /// Tokens the attacker must leave untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_tokens: Option<Vec<String>>,
    /// Optional target output for targeted attacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
}

fn default_input_field_to_attack() -> String {
    "tokens".to_string()
}

fn default_grad_input_field() -> String {
    "grad_input_1".to_string()
}

impl AttackRequest {
    /// An attack on `inputs` with default field names.
    pub fn new(inputs: Value) -> Self {
        Self {
            inputs,
            input_field_to_attack: default_input_field_to_attack(),
            grad_input_field: default_grad_input_field(),
            ignore_tokens: None,
            target: None,
        }
    }
}
