//! Interpreter and attacker capabilities.
//!
//! Both kinds are closed enumerations. A model endpoint enables a subset of
//! each, and requests are resolved in two tiers: an id outside the global
//! enumeration is *unknown*, an id inside it but not enabled for the model
//! is *unsupported*. The two are reported with distinct errors.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ExhibitError, Result};

/// Which capability enumeration an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Interpreter,
    Attacker,
}

impl CapabilityKind {
    /// Lowercase name, as used in "No interpreter with id ..." messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interpreter => "interpreter",
            Self::Attacker => "attacker",
        }
    }

    /// Capitalised name, as used at the start of a sentence.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Interpreter => "Interpreter",
            Self::Attacker => "Attacker",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of one of the fixed capability enumerations.
pub trait Capability: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// The enumeration this capability belongs to.
    const KIND: CapabilityKind;

    /// Every recognised member, in declaration order.
    const ALL: &'static [Self];

    /// Wire identifier (e.g. `"simple_gradient"`).
    fn as_str(&self) -> &'static str;

    /// Look up a member by its wire identifier.
    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == id)
    }
}

/// Saliency interpreters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpreter {
    SimpleGradient,
    SmoothGradient,
    IntegratedGradient,
}

impl Capability for Interpreter {
    const KIND: CapabilityKind = CapabilityKind::Interpreter;
    const ALL: &'static [Self] = &[
        Self::SimpleGradient,
        Self::SmoothGradient,
        Self::IntegratedGradient,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::SimpleGradient => "simple_gradient",
            Self::SmoothGradient => "smooth_gradient",
            Self::IntegratedGradient => "integrated_gradient",
        }
    }
}

/// Adversarial attackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attacker {
    Hotflip,
    InputReduction,
}

impl Capability for Attacker {
    const KIND: CapabilityKind = CapabilityKind::Attacker;
    const ALL: &'static [Self] = &[Self::Hotflip, Self::InputReduction];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Hotflip => "hotflip",
            Self::InputReduction => "input_reduction",
        }
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Attacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The members of one capability enumeration that a model has enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet<C: Capability> {
    enabled: BTreeSet<C>,
}

impl<C: Capability> CapabilitySet<C> {
    /// Every member of the enumeration enabled.
    pub fn all() -> Self {
        Self {
            enabled: C::ALL.iter().copied().collect(),
        }
    }

    /// Nothing enabled.
    pub fn none() -> Self {
        Self {
            enabled: BTreeSet::new(),
        }
    }

    /// Build from an optional configured list. `None` enables everything.
    pub fn from_config(configured: Option<&[C]>) -> Self {
        match configured {
            Some(list) => list.iter().copied().collect(),
            None => Self::all(),
        }
    }

    pub fn contains(&self, capability: C) -> bool {
        self.enabled.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = C> + '_ {
        self.enabled.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Resolve a requested id against the global enumeration, then against
    /// this set.
    pub fn resolve(&self, id: &str) -> Result<C> {
        let capability = C::from_id(id).ok_or_else(|| ExhibitError::UnknownCapability {
            kind: C::KIND,
            id: id.to_string(),
        })?;
        if !self.contains(capability) {
            return Err(ExhibitError::UnsupportedCapability {
                kind: C::KIND,
                id: id.to_string(),
            });
        }
        Ok(capability)
    }
}

impl<C: Capability> FromIterator<C> for CapabilitySet<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

impl<C: Capability> Serialize for CapabilitySet<C> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.enabled.iter().map(|c| c.as_str()))
    }
}
