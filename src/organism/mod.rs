//! Organisms, the individual inhabitants of the world
//!
//! An organism sits on one grid cell for life. Each tick it ages, possibly
//! dies, refreshes its happiness-report debounce, and recomputes its crowd
//! mood from how many of its neighboring cells are occupied.

pub mod attributes;
pub mod naming;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{OrganismId, Tick};
use crate::event::{EventBus, GameEvent, OrganismInfo};
use crate::world::{GridPosition, WorldGrid};

use attributes::{Action, DynamicAttributes, Happiness, Preference, StaticAttributes};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    id: OrganismId,
    name: String,
    statics: StaticAttributes,
    dynamics: DynamicAttributes,
    position: GridPosition,
    death_age: Option<Tick>,
}

impl Organism {
    /// Creates an organism at `position`. The colony's max age is jittered
    /// per organism here.
    pub fn new(
        name: impl Into<String>,
        statics: &StaticAttributes,
        position: GridPosition,
        tick: Tick,
        rng: &mut impl Rng,
    ) -> Self {
        let id = OrganismId::generate(rng);
        let statics = statics.with_jittered_max_age(rng);
        let dynamics = DynamicAttributes::new(&statics, tick);
        Self {
            id,
            name: name.into(),
            statics,
            dynamics,
            position,
            death_age: None,
        }
    }

    pub fn id(&self) -> OrganismId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    pub fn statics(&self) -> &StaticAttributes {
        &self.statics
    }

    pub fn dynamics(&self) -> &DynamicAttributes {
        &self.dynamics
    }

    pub fn dynamics_mut(&mut self) -> &mut DynamicAttributes {
        &mut self.dynamics
    }

    pub fn is_alive(&self) -> bool {
        self.death_age.is_none()
    }

    /// The age this organism reached before dying, if it has died.
    pub fn death_age(&self) -> Option<Tick> {
        self.death_age
    }

    /// Whether this organism can take part in reproduction at `tick`.
    pub fn is_ready_to_reproduce(&self, tick: Tick) -> bool {
        if !self.is_alive() {
            return false;
        }
        let timeout = self.dynamics.last_reproduced()
            + self.statics.reproductive_frequency.reproductive_timeout();
        tick > timeout
    }

    /// Point-in-time snapshot for info and happiness events.
    pub fn info(&self, tick: Tick) -> OrganismInfo {
        OrganismInfo {
            id: self.id,
            name: self.name.clone(),
            statics: self.statics.clone(),
            dynamics: self.dynamics.clone(),
            position: self.position,
            tick,
        }
    }

    /// Per-tick update. Dead organisms are inert.
    pub fn update(&mut self, tick: Tick, grid: &WorldGrid, bus: &EventBus) {
        if self.death_age.is_some() {
            return;
        }

        self.dynamics.increment_age();

        if self.dynamics.age() > self.statics.max_age {
            self.death_age = Some(self.dynamics.age());
            debug!(organism = %self.id, name = %self.name, age = self.dynamics.age(), "organism died");
            bus.publish(GameEvent::OrganismDied {
                position: self.position,
            });
        }

        self.dynamics.update_happiness(tick);
        if self.dynamics.ready_to_report_happiness(tick) {
            bus.publish(GameEvent::HappinessChanged(self.info(tick)));
        }

        // A parent stays in Reproducing until its cooldown runs out.
        if self.dynamics.current_action() == Action::Reproducing
            && self.is_ready_to_reproduce(tick)
        {
            self.dynamics.set_current_action(Action::Nothing, tick);
        }

        let new_crowd = crowd_happiness(
            self.statics.crowd_preference,
            grid.neighbor_count(self.position),
        );
        if self.dynamics.crowd_happiness() != new_crowd {
            self.dynamics.set_crowd_happiness(new_crowd);
        }
    }
}

/// Maps a crowd preference and an occupied-neighbor count (0..=8) to a mood.
///
/// The Like/Dislike middle band deliberately treats 7 and 8 neighbors as
/// Neutral rather than extending the strong band upward.
pub fn crowd_happiness(preference: Preference, neighbor_count: u32) -> Happiness {
    let n = neighbor_count;
    match preference {
        Preference::Love => {
            if n >= 7 {
                Happiness::Happy
            } else if n >= 5 {
                Happiness::Neutral
            } else {
                Happiness::Unhappy
            }
        }
        Preference::Like => {
            if (3..7).contains(&n) {
                Happiness::Happy
            } else if n == 8 || n > 2 {
                Happiness::Neutral
            } else {
                Happiness::Unhappy
            }
        }
        Preference::None => Happiness::Neutral,
        Preference::Dislike => {
            if (3..7).contains(&n) {
                Happiness::Unhappy
            } else if n == 8 || n > 2 {
                Happiness::Neutral
            } else {
                Happiness::Happy
            }
        }
        Preference::Hate => {
            if n >= 7 {
                Happiness::Unhappy
            } else if n >= 5 {
                Happiness::Neutral
            } else {
                Happiness::Happy
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attributes::{ColonyColor, Diet, FoodType, Frequency};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn statics(max_age: Tick) -> StaticAttributes {
        StaticAttributes::new(
            100.0,
            max_age,
            FoodType::Meat,
            Diet::Herbivore,
            Preference::None,
            Preference::Like,
            Frequency::Frequent,
            "amoeba",
            ColonyColor { r: 1, g: 2, b: 3 },
        )
        .unwrap()
    }

    fn pos(row: usize, column: usize) -> GridPosition {
        GridPosition::new(row, column).unwrap()
    }

    #[test]
    fn test_crowd_happiness_love_bands() {
        for n in 0..=4 {
            assert_eq!(crowd_happiness(Preference::Love, n), Happiness::Unhappy);
        }
        for n in 5..=6 {
            assert_eq!(crowd_happiness(Preference::Love, n), Happiness::Neutral);
        }
        for n in 7..=8 {
            assert_eq!(crowd_happiness(Preference::Love, n), Happiness::Happy);
        }
    }

    #[test]
    fn test_crowd_happiness_like_bands() {
        for n in 0..=2 {
            assert_eq!(crowd_happiness(Preference::Like, n), Happiness::Unhappy);
        }
        for n in 3..=6 {
            assert_eq!(crowd_happiness(Preference::Like, n), Happiness::Happy);
        }
        for n in 7..=8 {
            assert_eq!(crowd_happiness(Preference::Like, n), Happiness::Neutral);
        }
    }

    #[test]
    fn test_crowd_happiness_none_always_neutral() {
        for n in 0..=8 {
            assert_eq!(crowd_happiness(Preference::None, n), Happiness::Neutral);
        }
    }

    #[test]
    fn test_crowd_happiness_mirrors() {
        for n in 0..=8 {
            let flip = |h: Happiness| match h {
                Happiness::Happy => Happiness::Unhappy,
                Happiness::Neutral => Happiness::Neutral,
                Happiness::Unhappy => Happiness::Happy,
            };
            assert_eq!(
                crowd_happiness(Preference::Dislike, n),
                flip(crowd_happiness(Preference::Like, n))
            );
            assert_eq!(
                crowd_happiness(Preference::Hate, n),
                flip(crowd_happiness(Preference::Love, n))
            );
        }
    }

    #[test]
    fn test_update_ages_and_kills() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = WorldGrid::new();
        let bus = EventBus::new();
        // Jitter keeps max age within +-15% of 100.
        let mut organism = Organism::new("Ada", &statics(100), pos(2, 2), 0, &mut rng);
        let limit = organism.statics().max_age;

        for tick in 1..=limit {
            organism.update(tick, &grid, &bus);
        }
        assert!(organism.is_alive());
        assert_eq!(organism.dynamics().age(), limit);

        organism.update(limit + 1, &grid, &bus);
        assert!(!organism.is_alive());
        assert_eq!(organism.death_age(), Some(limit + 1));
        assert_eq!(bus.pending(), 1);

        // Dead organisms no longer age.
        organism.update(limit + 2, &grid, &bus);
        assert_eq!(organism.dynamics().age(), limit + 1);
        assert_eq!(bus.pending(), 1);
    }

    #[test]
    fn test_death_records_age_not_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = WorldGrid::new();
        let bus = EventBus::new();
        // Born late in the run; the recorded value must still be the age.
        let mut organism = Organism::new("Ada", &statics(100), pos(2, 2), 5_000, &mut rng);
        let limit = organism.statics().max_age;

        for tick in 5_001..=5_000 + limit + 1 {
            organism.update(tick, &grid, &bus);
        }
        assert!(!organism.is_alive());
        assert_eq!(organism.death_age(), Some(limit + 1));
    }

    #[test]
    fn test_update_refreshes_crowd_happiness() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut grid = WorldGrid::new();
        let bus = EventBus::new();
        let mut organism = Organism::new("Ada", &statics(10_000), pos(2, 2), 0, &mut rng);

        organism.update(1, &grid, &bus);
        // Like with 0 neighbors.
        assert_eq!(organism.dynamics().crowd_happiness(), Happiness::Unhappy);

        for (row, column) in [(1, 2), (2, 3), (3, 2)] {
            grid.set_occupant(pos(row, column), Some(OrganismId(row as u64)));
        }
        organism.update(2, &grid, &bus);
        // Like with 3 neighbors.
        assert_eq!(organism.dynamics().crowd_happiness(), Happiness::Happy);
    }

    #[test]
    fn test_reproduction_readiness() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut organism = Organism::new("Ada", &statics(100_000), pos(0, 0), 0, &mut rng);
        // Frequent timeout is 600 ticks from the birth tick.
        assert!(!organism.is_ready_to_reproduce(600));
        assert!(organism.is_ready_to_reproduce(601));

        organism.dynamics_mut().set_last_reproduced(1000);
        assert!(!organism.is_ready_to_reproduce(1600));
        assert!(organism.is_ready_to_reproduce(1601));
    }

    #[test]
    fn test_reproducing_action_clears_after_cooldown() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = WorldGrid::new();
        let bus = EventBus::new();
        let mut organism = Organism::new("Ada", &statics(100_000), pos(2, 2), 0, &mut rng);

        organism.dynamics_mut().set_last_reproduced(1000);
        organism
            .dynamics_mut()
            .set_current_action(Action::Reproducing, 1000);

        // Frequent timeout is 600 ticks past the last reproduction.
        organism.update(1600, &grid, &bus);
        assert_eq!(organism.dynamics().current_action(), Action::Reproducing);

        organism.update(1601, &grid, &bus);
        assert_eq!(organism.dynamics().current_action(), Action::Nothing);
        assert_eq!(organism.dynamics().last_action_changed(), 1601);
    }

    #[test]
    fn test_dead_organism_not_ready_to_reproduce() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = WorldGrid::new();
        let bus = EventBus::new();
        let mut organism = Organism::new("Ada", &statics(10), pos(0, 0), 0, &mut rng);
        for tick in 1..=20 {
            organism.update(tick, &grid, &bus);
        }
        assert!(!organism.is_alive());
        assert!(!organism.is_ready_to_reproduce(100_000));
    }
}
