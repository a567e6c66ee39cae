//! Top-level simulation clock
//!
//! `SimulationManager` owns the tick counter and turns the crank: each
//! step drains the event bus, updates every colony, and advances the
//! counter. A panic inside a step is caught and logged so one faulted tick
//! cannot take the run down.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::error;

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::lock;
use crate::core::types::Tick;
use crate::event::{EventBus, GameEvent};
use crate::organism::naming::NamePool;
use crate::simulation::{LogicManager, SimSnapshot};

/// Informational timing of recent steps; not authoritative for anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTiming {
    pub last_step_duration: Duration,
    pub steps_per_second: f64,
}

pub struct SimulationManager {
    bus: Arc<EventBus>,
    logic: Arc<LogicManager>,
    ticks: AtomicU64,
    paused: AtomicBool,
    timing: Mutex<FrameTiming>,
}

impl SimulationManager {
    pub fn new(config: &GameConfig) -> Self {
        let mut master = ChaCha8Rng::seed_from_u64(config.seed);
        let names_seed: u64 = master.gen();
        let logic_seed: u64 = master.gen();

        let bus = Arc::new(EventBus::new());
        let names = Arc::new(NamePool::new(
            config.organism_names.clone(),
            ChaCha8Rng::seed_from_u64(names_seed),
        ));
        let logic = LogicManager::new(bus.clone(), names, ChaCha8Rng::seed_from_u64(logic_seed));

        Self {
            bus,
            logic,
            ticks: AtomicU64::new(0),
            paused: AtomicBool::new(false),
            timing: Mutex::new(FrameTiming::default()),
        }
    }

    pub fn bus(&self) -> Arc<EventBus> {
        self.bus.clone()
    }

    pub fn logic(&self) -> Arc<LogicManager> {
        self.logic.clone()
    }

    pub fn ticks(&self) -> Tick {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Stops the clock and tells the world about it.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
        self.bus.publish(GameEvent::Paused);
    }

    pub fn unpause(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.bus.publish(GameEvent::Unpaused);
    }

    /// Runs one tick: drain the bus, update colonies, advance the counter.
    /// Does nothing while paused. A panic inside the tick body is logged
    /// and the next step carries on.
    pub fn step(&self) {
        if self.is_paused() {
            return;
        }
        let started = Instant::now();
        let tick = self.ticks.load(Ordering::SeqCst);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.bus.drain();
            self.logic.update(tick);
        }));
        if let Err(payload) = outcome {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(tick, %message, "tick faulted; continuing");
        }

        self.ticks.fetch_add(1, Ordering::SeqCst);

        let elapsed = started.elapsed();
        let mut timing = lock(&self.timing);
        timing.last_step_duration = elapsed;
        timing.steps_per_second = if elapsed.as_secs_f64() > 0.0 {
            1.0 / elapsed.as_secs_f64()
        } else {
            f64::INFINITY
        };
    }

    pub fn timing(&self) -> FrameTiming {
        *lock(&self.timing)
    }

    /// Serializes the current state to bytes.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        let snapshot = SimSnapshot {
            ticks: self.ticks(),
            paused: self.is_paused(),
            grid: lock(&self.logic.grid()).clone(),
            colonies: self.logic.colony_snapshots(),
        };
        Ok(serde_json::to_vec(&snapshot)?)
    }

    /// Builds a fresh simulation from snapshot bytes. The event bus is new,
    /// so transient listeners have to subscribe again; RNG streams are
    /// reseeded from the config.
    pub fn restore(bytes: &[u8], config: &GameConfig) -> Result<Self> {
        let snapshot: SimSnapshot = serde_json::from_slice(bytes)?;
        let manager = Self::new(config);

        manager.ticks.store(snapshot.ticks, Ordering::SeqCst);
        manager.paused.store(snapshot.paused, Ordering::SeqCst);
        *lock(&manager.logic.grid()) = snapshot.grid;
        for colony in snapshot.colonies {
            manager.logic.adopt_colony(colony);
        }
        Ok(manager)
    }
}
