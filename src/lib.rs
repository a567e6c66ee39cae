//! Colonies - deterministic tick-driven ecological colony simulation

pub mod colony;
pub mod core;
pub mod event;
pub mod organism;
pub mod simulation;
pub mod stats;
pub mod world;
