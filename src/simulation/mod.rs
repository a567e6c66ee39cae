//! Simulation drivers: the logic manager and the tick clock

mod logic;
mod manager;
mod snapshot;

pub use logic::LogicManager;
pub use manager::{FrameTiming, SimulationManager};
pub use snapshot::SimSnapshot;

use crate::core::types::Tick;

/// Fixed simulation rate.
pub const TICKS_PER_SECOND: Tick = 30;

/// Wall-clock budget of one tick at the fixed rate.
pub const MILLIS_PER_TICK: u64 = 1000 / TICKS_PER_SECOND;
