//! Serializable image of a whole simulation

use serde::{Deserialize, Serialize};

use crate::colony::ColonySnapshot;
use crate::core::types::Tick;
use crate::world::WorldGrid;

/// Everything needed to resume a run: the tick counter, the pause flag,
/// the grid, and each colony's roster.
///
/// RNG streams are not captured; a restored run is reseeded and diverges
/// from the original from that point on. Presentation-side listeners are
/// transient and must re-subscribe after a restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub ticks: Tick,
    pub paused: bool,
    pub grid: WorldGrid,
    pub colonies: Vec<ColonySnapshot>,
}
