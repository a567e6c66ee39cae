//! Game events and the pub/sub bus that carries them
//!
//! Events are the only channel between the simulation core and anything
//! observing it. Producers publish at any time; delivery happens on the
//! simulation thread when the bus drains at the start of each tick.

mod bus;

pub use bus::{EventBus, EventListener, MAX_EVENTS_PER_DRAIN};

use serde::{Deserialize, Serialize};

use crate::core::error::{ColonyError, Result};
use crate::core::types::{ColonyId, OrganismId, Tick};
use crate::organism::attributes::{DynamicAttributes, Frequency, Preference, StaticAttributes};
use crate::world::GridPosition;

/// Request to found a new colony.
///
/// Validated at construction; a `ColonyPlacement` in hand always describes
/// a viable colony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyPlacement {
    pub name: String,
    pub organism_count: u32,
    pub position: GridPosition,
    pub health: f64,
    pub max_age: Tick,
    pub heat_preference: Preference,
    pub crowd_preference: Preference,
    pub reproductive_frequency: Frequency,
    /// Tick at which the placement was requested
    pub tick: Tick,
}

impl ColonyPlacement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        organism_count: u32,
        position: GridPosition,
        health: f64,
        max_age: Tick,
        heat_preference: Preference,
        crowd_preference: Preference,
        reproductive_frequency: Frequency,
        tick: Tick,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ColonyError::invalid("name", "must not be empty"));
        }
        if organism_count < 2 {
            return Err(ColonyError::invalid(
                "organism_count",
                format!("must be at least 2, got {organism_count}"),
            ));
        }
        if health <= 0.0 {
            return Err(ColonyError::invalid(
                "health",
                format!("must be positive, got {health}"),
            ));
        }
        if max_age == 0 {
            return Err(ColonyError::invalid("max_age", "must be positive"));
        }
        Ok(Self {
            name,
            organism_count,
            position,
            health,
            max_age,
            heat_preference,
            crowd_preference,
            reproductive_frequency,
            tick,
        })
    }
}

/// Announcement of a new organism joining the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismBorn {
    pub colony_id: ColonyId,
    pub organism_id: OrganismId,
    pub name: String,
    pub position: GridPosition,
}

/// Point-in-time copy of everything observable about one organism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismInfo {
    pub id: OrganismId,
    pub name: String,
    pub statics: StaticAttributes,
    pub dynamics: DynamicAttributes,
    pub position: GridPosition,
    pub tick: Tick,
}

/// Everything that can travel over the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new colony should be founded
    ColonyPlaced(ColonyPlacement),
    /// An organism was created, at placement or by reproduction
    OrganismBorn(OrganismBorn),
    /// An organism's age exceeded its maximum
    OrganismDied { position: GridPosition },
    /// An organism's derived happiness is being (re)reported
    HappinessChanged(OrganismInfo),
    /// Someone wants a snapshot of the organism at a cell
    InfoRequested { position: GridPosition },
    /// Someone wants snapshots of every living organism
    AllInfoRequested,
    /// Reply to an info request
    InfoResponse(OrganismInfo),
    /// The organism at a cell was removed from the world
    OrganismPopped { position: GridPosition },
    /// The simulation stopped advancing
    Paused,
    /// The simulation resumed
    Unpaused,
}

/// Discriminant of a [`GameEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ColonyPlaced,
    OrganismBorn,
    OrganismDied,
    HappinessChanged,
    InfoRequested,
    AllInfoRequested,
    InfoResponse,
    OrganismPopped,
    Paused,
    Unpaused,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::ColonyPlaced(_) => EventKind::ColonyPlaced,
            GameEvent::OrganismBorn(_) => EventKind::OrganismBorn,
            GameEvent::OrganismDied { .. } => EventKind::OrganismDied,
            GameEvent::HappinessChanged(_) => EventKind::HappinessChanged,
            GameEvent::InfoRequested { .. } => EventKind::InfoRequested,
            GameEvent::AllInfoRequested => EventKind::AllInfoRequested,
            GameEvent::InfoResponse(_) => EventKind::InfoResponse,
            GameEvent::OrganismPopped { .. } => EventKind::OrganismPopped,
            GameEvent::Paused => EventKind::Paused,
            GameEvent::Unpaused => EventKind::Unpaused,
        }
    }
}
