//! Core type definitions used throughout the codebase

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for organisms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

impl OrganismId {
    /// Draws a fresh identifier from the given RNG.
    pub fn generate(rng: &mut impl Rng) -> Self {
        Self(rng.gen())
    }
}

impl std::fmt::Display for OrganismId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "organism-{:016x}", self.0)
    }
}

/// Unique identifier for colonies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColonyId(pub u64);

impl ColonyId {
    pub fn generate(rng: &mut impl Rng) -> Self {
        Self(rng.gen())
    }
}

impl std::fmt::Display for ColonyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "colony-{:016x}", self.0)
    }
}
