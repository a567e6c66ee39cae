//! Run statistics driven purely by bus subscription
//!
//! Nothing in the core consults these numbers; the tracker exists for the
//! runner's summary output and demonstrates a presentation-side listener.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::event::{EventBus, EventKind, EventListener, GameEvent};
use crate::organism::attributes::Happiness;

#[derive(Default)]
pub struct StatsTracker {
    births: AtomicU64,
    deaths: AtomicU64,
    happy_reports: AtomicU64,
    neutral_reports: AtomicU64,
    unhappy_reports: AtomicU64,
}

impl StatsTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Subscribes this tracker to the events it counts.
    pub fn attach(self: Arc<Self>, bus: &EventBus) {
        let listener: Arc<dyn EventListener> = self;
        bus.subscribe(EventKind::OrganismBorn, listener.clone());
        bus.subscribe(EventKind::OrganismDied, listener.clone());
        bus.subscribe(EventKind::HappinessChanged, listener);
    }

    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    /// Counts of happiness reports seen, as (happy, neutral, unhappy).
    pub fn happiness_reports(&self) -> (u64, u64, u64) {
        (
            self.happy_reports.load(Ordering::Relaxed),
            self.neutral_reports.load(Ordering::Relaxed),
            self.unhappy_reports.load(Ordering::Relaxed),
        )
    }
}

impl EventListener for StatsTracker {
    fn notify(&self, event: &GameEvent) {
        match event {
            GameEvent::OrganismBorn(_) => {
                self.births.fetch_add(1, Ordering::Relaxed);
            }
            GameEvent::OrganismDied { .. } => {
                self.deaths.fetch_add(1, Ordering::Relaxed);
            }
            GameEvent::HappinessChanged(info) => {
                let counter = match info.dynamics.happiness() {
                    Happiness::Happy => &self.happy_reports,
                    Happiness::Neutral => &self.neutral_reports,
                    Happiness::Unhappy => &self.unhappy_reports,
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
            other => panic!(
                "stats tracker received unhandled event kind {:?}",
                other.kind()
            ),
        }
    }
}
