//! Colony management
//!
//! A [`ColonyManager`] owns the organisms founded by one placement request.
//! It drives their per-tick updates, pairs up reproducers, and answers
//! info/popped events from the bus.

use std::sync::{Arc, Mutex};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::lock;
use crate::core::types::{ColonyId, Tick};
use crate::event::{
    ColonyPlacement, EventBus, EventKind, EventListener, GameEvent, OrganismBorn, OrganismInfo,
};
use crate::organism::attributes::{Action, ColonyColor, Diet, FoodType, StaticAttributes};
use crate::organism::naming::NamePool;
use crate::organism::Organism;
use crate::world::{GridPosition, WorldGrid};

/// Attempts at finding a free cell for a newborn before giving up.
const MAX_REPRODUCTION_ATTEMPTS: usize = 5;

/// Upper bound (exclusive) of the random delay added to a parent's
/// last-reproduced time, spreading consecutive reproductions out.
const REPRODUCTION_JITTER: Tick = 3000;

/// Neighbor search order when placing an organism: up, right, up-right,
/// down, left, up-left, down-right, down-left. The candidate cell itself is
/// tried first.
const PLACEMENT_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (0, 1),
    (-1, 1),
    (1, 0),
    (0, -1),
    (-1, -1),
    (1, 1),
    (1, -1),
];

/// Mutable colony state, guarded by one lock.
struct ColonyState {
    organisms: Vec<Organism>,
    rng: ChaCha8Rng,
    last_tick: Tick,
}

pub struct ColonyManager {
    id: ColonyId,
    grid: Arc<Mutex<WorldGrid>>,
    bus: Arc<EventBus>,
    names: Arc<NamePool>,
    inner: Mutex<ColonyState>,
}

/// Serializable image of a colony for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub id: ColonyId,
    pub last_tick: Tick,
    pub organisms: Vec<Organism>,
}

impl ColonyManager {
    /// Founds a colony from a placement request: places organisms around
    /// the requested cell, publishes a birth per organism, and subscribes
    /// the manager to the events it serves.
    ///
    /// Placement stops early when no free cell remains near the request;
    /// a partially placed colony is not an error.
    pub fn new(
        placement: &ColonyPlacement,
        grid: Arc<Mutex<WorldGrid>>,
        bus: Arc<EventBus>,
        names: Arc<NamePool>,
        mut rng: ChaCha8Rng,
    ) -> crate::core::error::Result<Arc<Self>> {
        let tick = placement.tick;
        let id = ColonyId::generate(&mut rng);
        let color = ColonyColor::random(&mut rng);
        let statics = StaticAttributes::new(
            placement.health,
            placement.max_age,
            FoodType::Meat,
            Diet::Herbivore,
            placement.heat_preference,
            placement.crowd_preference,
            placement.reproductive_frequency,
            placement.name.clone(),
            color,
        )?;

        let mut organisms = Vec::new();
        let mut births = Vec::new();
        {
            let mut grid_guard = lock(&grid);
            for _ in 0..placement.organism_count {
                let Some(position) = find_empty_position(&grid_guard, placement.position) else {
                    warn!(colony = %id, placed = organisms.len(), "no free cell left near placement");
                    break;
                };
                let organism =
                    Organism::new(names.draw(), &statics, position, tick, &mut rng);
                grid_guard.set_occupant(position, Some(organism.id()));
                births.push(OrganismBorn {
                    colony_id: id,
                    organism_id: organism.id(),
                    name: organism.name().to_string(),
                    position,
                });
                organisms.push(organism);
            }
        }
        info!(colony = %id, name = %placement.name, placed = organisms.len(), "colony founded");
        for born in births {
            bus.publish(GameEvent::OrganismBorn(born));
        }

        let manager = Arc::new(Self {
            id,
            grid,
            bus,
            names,
            inner: Mutex::new(ColonyState {
                organisms,
                rng,
                last_tick: tick,
            }),
        });
        manager.clone().attach();
        Ok(manager)
    }

    /// Rebuilds a colony from a snapshot and re-subscribes it. The grid is
    /// restored separately; this does not place anyone.
    pub fn from_snapshot(
        snapshot: ColonySnapshot,
        grid: Arc<Mutex<WorldGrid>>,
        bus: Arc<EventBus>,
        names: Arc<NamePool>,
        rng: ChaCha8Rng,
    ) -> Arc<Self> {
        let manager = Arc::new(Self {
            id: snapshot.id,
            grid,
            bus,
            names,
            inner: Mutex::new(ColonyState {
                organisms: snapshot.organisms,
                rng,
                last_tick: snapshot.last_tick,
            }),
        });
        manager.clone().attach();
        manager
    }

    fn attach(self: Arc<Self>) {
        let bus = self.bus.clone();
        let listener: Arc<dyn EventListener> = self;
        bus.subscribe(EventKind::InfoRequested, listener.clone());
        bus.subscribe(EventKind::AllInfoRequested, listener.clone());
        bus.subscribe(EventKind::OrganismPopped, listener);
    }

    pub fn id(&self) -> ColonyId {
        self.id
    }

    /// Per-tick update: advances every organism, then lets the first two
    /// roster members ready to reproduce produce one child.
    pub fn update(&self, tick: Tick) {
        let mut state = lock(&self.inner);
        state.last_tick = tick;

        let mut ready = Vec::with_capacity(2);
        {
            let grid = lock(&self.grid);
            for (index, organism) in state.organisms.iter_mut().enumerate() {
                organism.update(tick, &grid, &self.bus);
                if ready.len() < 2 && organism.is_ready_to_reproduce(tick) {
                    ready.push(index);
                }
            }
        }

        if let [parent1, parent2] = ready[..] {
            self.reproduce(&mut state, parent1, parent2, tick);
        }
    }

    /// Tries up to [`MAX_REPRODUCTION_ATTEMPTS`] random roster members as
    /// placement anchors for the child; gives up quietly if every
    /// neighborhood is full.
    fn reproduce(&self, state: &mut ColonyState, parent1: usize, parent2: usize, tick: Tick) {
        for _ in 0..MAX_REPRODUCTION_ATTEMPTS {
            let roster_size = state.organisms.len();
            let anchor_index = state.rng.gen_range(0..roster_size);
            let anchor = state.organisms[anchor_index].position();

            let found = {
                let grid = lock(&self.grid);
                find_empty_position(&grid, anchor)
            };
            let Some(position) = found else {
                continue;
            };

            // Child takes parent 1's statics; the max age is re-jittered
            // at construction.
            let statics = state.organisms[parent1].statics().clone();
            let child = Organism::new(self.names.draw(), &statics, position, tick, &mut state.rng);
            lock(&self.grid).set_occupant(position, Some(child.id()));

            debug!(colony = %self.id, child = %child.id(), %position, "organism reproduced");
            self.bus.publish(GameEvent::OrganismBorn(OrganismBorn {
                colony_id: self.id,
                organism_id: child.id(),
                name: child.name().to_string(),
                position,
            }));
            state.organisms.push(child);

            for parent in [parent1, parent2] {
                let jitter = state.rng.gen_range(0..REPRODUCTION_JITTER);
                let dynamics = state.organisms[parent].dynamics_mut();
                dynamics.add_child();
                dynamics.set_last_reproduced(tick + jitter);
                dynamics.set_current_action(Action::Reproducing, tick);
            }
            return;
        }
    }

    /// Number of living organisms in the roster.
    pub fn living_count(&self) -> usize {
        lock(&self.inner)
            .organisms
            .iter()
            .filter(|o| o.is_alive())
            .count()
    }

    /// Total roster size, dead members included until popped.
    pub fn roster_count(&self) -> usize {
        lock(&self.inner).organisms.len()
    }

    pub fn living_positions(&self) -> Vec<GridPosition> {
        lock(&self.inner)
            .organisms
            .iter()
            .filter(|o| o.is_alive())
            .map(|o| o.position())
            .collect()
    }

    /// Info snapshots of the whole roster at the last updated tick.
    pub fn infos(&self) -> Vec<OrganismInfo> {
        let state = lock(&self.inner);
        state
            .organisms
            .iter()
            .map(|o| o.info(state.last_tick))
            .collect()
    }

    pub fn snapshot(&self) -> ColonySnapshot {
        let state = lock(&self.inner);
        ColonySnapshot {
            id: self.id,
            last_tick: state.last_tick,
            organisms: state.organisms.clone(),
        }
    }
}

impl EventListener for ColonyManager {
    fn notify(&self, event: &GameEvent) {
        match event {
            GameEvent::InfoRequested { position } => {
                let state = lock(&self.inner);
                for organism in &state.organisms {
                    if organism.is_alive() && organism.position() == *position {
                        self.bus
                            .publish(GameEvent::InfoResponse(organism.info(state.last_tick)));
                    }
                }
            }
            GameEvent::AllInfoRequested => {
                let state = lock(&self.inner);
                for organism in state.organisms.iter().filter(|o| o.is_alive()) {
                    self.bus
                        .publish(GameEvent::InfoResponse(organism.info(state.last_tick)));
                }
            }
            GameEvent::OrganismPopped { position } => {
                lock(&self.grid).set_occupant(*position, None);
                let mut state = lock(&self.inner);
                if let Some(index) = state
                    .organisms
                    .iter()
                    .position(|o| o.position() == *position)
                {
                    let removed = state.organisms.remove(index);
                    debug!(colony = %self.id, organism = %removed.id(), "organism popped");
                }
            }
            other => panic!(
                "colony manager received unhandled event kind {:?}",
                other.kind()
            ),
        }
    }
}

/// Finds a free cell at `candidate` or in its neighborhood, searching in
/// [`PLACEMENT_OFFSETS`] order. `None` means the whole neighborhood is full.
fn find_empty_position(grid: &WorldGrid, candidate: GridPosition) -> Option<GridPosition> {
    if grid.is_empty(candidate) {
        return Some(candidate);
    }
    PLACEMENT_OFFSETS
        .iter()
        .filter_map(|&(dr, dc)| candidate.offset(dr, dc))
        .find(|&p| grid.is_empty(p))
}
