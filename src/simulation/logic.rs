//! Colony roster and pause gating
//!
//! The logic manager owns the world grid and every colony founded during a
//! run. Colonies come into existence through ColonyPlaced events, so any
//! part of the system (or a presentation layer) can found one by
//! publishing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

use crate::colony::{ColonyManager, ColonySnapshot};
use crate::core::lock;
use crate::core::types::Tick;
use crate::event::{ColonyPlacement, EventBus, EventKind, EventListener, GameEvent};
use crate::organism::naming::NamePool;
use crate::world::WorldGrid;

pub struct LogicManager {
    grid: Arc<Mutex<WorldGrid>>,
    bus: Arc<EventBus>,
    names: Arc<NamePool>,
    colonies: Mutex<Vec<Arc<ColonyManager>>>,
    // Seeds per-colony RNG streams.
    master_rng: Mutex<ChaCha8Rng>,
    paused: AtomicBool,
}

impl LogicManager {
    pub fn new(bus: Arc<EventBus>, names: Arc<NamePool>, rng: ChaCha8Rng) -> Arc<Self> {
        let manager = Arc::new(Self {
            grid: Arc::new(Mutex::new(WorldGrid::new())),
            bus,
            names,
            colonies: Mutex::new(Vec::new()),
            master_rng: Mutex::new(rng),
            paused: AtomicBool::new(false),
        });
        manager.clone().attach();
        manager
    }

    fn attach(self: Arc<Self>) {
        let bus = self.bus.clone();
        let listener: Arc<dyn EventListener> = self;
        bus.subscribe(EventKind::ColonyPlaced, listener.clone());
        bus.subscribe(EventKind::Paused, listener.clone());
        bus.subscribe(EventKind::Unpaused, listener);
    }

    pub fn grid(&self) -> Arc<Mutex<WorldGrid>> {
        self.grid.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn colony_count(&self) -> usize {
        lock(&self.colonies).len()
    }

    pub fn colonies(&self) -> Vec<Arc<ColonyManager>> {
        lock(&self.colonies).clone()
    }

    pub fn colony_snapshots(&self) -> Vec<ColonySnapshot> {
        lock(&self.colonies).iter().map(|c| c.snapshot()).collect()
    }

    /// Founds a colony from a placement, at the placement's creation tick.
    pub fn place_colony(
        &self,
        placement: &ColonyPlacement,
    ) -> crate::core::error::Result<Arc<ColonyManager>> {
        let seed: u64 = lock(&self.master_rng).gen();
        let colony = ColonyManager::new(
            placement,
            self.grid.clone(),
            self.bus.clone(),
            self.names.clone(),
            ChaCha8Rng::seed_from_u64(seed),
        )?;
        lock(&self.colonies).push(colony.clone());
        Ok(colony)
    }

    /// Re-registers a colony restored from persistence.
    pub fn adopt_colony(&self, snapshot: ColonySnapshot) {
        let seed: u64 = lock(&self.master_rng).gen();
        let colony = ColonyManager::from_snapshot(
            snapshot,
            self.grid.clone(),
            self.bus.clone(),
            self.names.clone(),
            ChaCha8Rng::seed_from_u64(seed),
        );
        lock(&self.colonies).push(colony);
    }

    /// Advances every colony by one tick. Does nothing while paused.
    pub fn update(&self, tick: Tick) {
        if self.is_paused() {
            return;
        }
        for colony in self.colonies() {
            colony.update(tick);
        }
    }
}

impl EventListener for LogicManager {
    fn notify(&self, event: &GameEvent) {
        match event {
            GameEvent::ColonyPlaced(placement) => {
                // The placement was validated at construction, so failure
                // here means the world itself rejected it.
                if let Err(err) = self.place_colony(placement) {
                    error!(%err, name = %placement.name, "colony placement failed");
                }
            }
            GameEvent::Paused => {
                info!("simulation paused");
                self.paused.store(true, Ordering::SeqCst);
            }
            GameEvent::Unpaused => {
                info!("simulation resumed");
                self.paused.store(false, Ordering::SeqCst);
            }
            other => panic!(
                "logic manager received unhandled event kind {:?}",
                other.kind()
            ),
        }
    }
}
