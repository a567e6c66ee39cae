//! Organism attributes, static and dynamic
//!
//! Static attributes are fixed at birth and shared across a colony (modulo
//! the per-organism max-age jitter). Dynamic attributes change every tick
//! and carry the happiness-reporting debounce state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{ColonyError, Result};
use crate::core::types::Tick;
use crate::simulation::TICKS_PER_SECOND;

/// Upper bound of the hunger scale; 0 is sated.
pub const MAX_HUNGER: f64 = 100.0;

/// Hunger at or above this forces derived happiness to Unhappy.
pub const HUNGER_UNHAPPY_THRESHOLD: f64 = 75.0;

/// Organisms younger than this never report happiness.
pub const HAPPINESS_REPORT_MIN_AGE: Tick = 10 * TICKS_PER_SECOND;

/// A heartbeat report fires when the scheduled report time is this far past.
pub const HAPPINESS_HEARTBEAT_WINDOW: Tick = 10 * TICKS_PER_SECOND;

/// How far ahead the next heartbeat is rescheduled after firing.
pub const HAPPINESS_RESCHEDULE_AHEAD: Tick = 120 * TICKS_PER_SECOND;

/// Percent range of the max-age jitter applied at birth.
const MAX_AGE_JITTER_PERCENT: u32 = 15;

/// Coarse mood level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Happiness {
    Happy,
    #[default]
    Neutral,
    Unhappy,
}

/// A like/dislike scale used for environmental preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    Love,
    Like,
    None,
    Dislike,
    Hate,
}

/// What an organism eats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    Carnivore,
    Herbivore,
    Omnivore,
    Scavenger,
    Photosynthesis,
}

/// What an organism's body counts as when eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodType {
    Meat,
    Plant,
}

/// How often an organism is willing to reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    VeryInfrequent,
    Infrequent,
    Frequent,
    VeryFrequent,
}

impl Frequency {
    /// Minimum ticks between reproductions.
    pub fn reproductive_timeout(&self) -> Tick {
        match self {
            Frequency::VeryFrequent => 300,
            Frequency::Frequent => 600,
            Frequency::Infrequent => 900,
            Frequency::VeryInfrequent => 1200,
        }
    }
}

/// What an organism is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Nothing,
    Eating,
    Moving,
    Reproducing,
}

/// Display color shared by a colony's organisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColonyColor {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
        }
    }
}

/// Attributes fixed at birth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticAttributes {
    pub max_health: f64,
    pub max_age: Tick,
    pub body_type: FoodType,
    pub diet: Diet,
    pub heat_preference: Preference,
    pub crowd_preference: Preference,
    pub reproductive_frequency: Frequency,
    pub colony_name: String,
    pub color: ColonyColor,
}

impl StaticAttributes {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_health: f64,
        max_age: Tick,
        body_type: FoodType,
        diet: Diet,
        heat_preference: Preference,
        crowd_preference: Preference,
        reproductive_frequency: Frequency,
        colony_name: impl Into<String>,
        color: ColonyColor,
    ) -> Result<Self> {
        if max_health <= 0.0 {
            return Err(ColonyError::invalid(
                "max_health",
                format!("must be positive, got {max_health}"),
            ));
        }
        if max_age == 0 {
            return Err(ColonyError::invalid("max_age", "must be positive"));
        }
        let colony_name = colony_name.into();
        if colony_name.is_empty() {
            return Err(ColonyError::invalid("colony_name", "must not be empty"));
        }
        Ok(Self {
            max_health,
            max_age,
            body_type,
            diet,
            heat_preference,
            crowd_preference,
            reproductive_frequency,
            colony_name,
            color,
        })
    }

    /// Copy of these attributes with the max age scaled by a random factor
    /// in `1 +- [0, 0.15)`, so colony-mates do not all die on the same tick.
    pub fn with_jittered_max_age(&self, rng: &mut impl Rng) -> StaticAttributes {
        let sign: f64 = if rng.gen_range(0..2) == 1 { -1.0 } else { 1.0 };
        let factor = 1.0 + sign * rng.gen_range(0..MAX_AGE_JITTER_PERCENT) as f64 / 100.0;
        let max_age = ((self.max_age as f64 * factor) as Tick).max(1);
        StaticAttributes {
            max_age,
            ..self.clone()
        }
    }
}

/// Attributes that change over an organism's life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicAttributes {
    health: f64,
    // Copied from the statics; setters clamp against it.
    max_health: f64,
    hunger: f64,
    age: Tick,
    last_reproduced: Tick,
    crowd_happiness: Happiness,
    heat_happiness: Happiness,
    children_count: u32,
    current_action: Action,
    last_action_changed: Tick,
    // Debounce state for happiness reporting.
    report_happiness_at: Tick,
    happiness_change_pending: bool,
    last_happiness: Happiness,
}

impl DynamicAttributes {
    pub fn new(statics: &StaticAttributes, tick: Tick) -> Self {
        Self {
            health: statics.max_health,
            max_health: statics.max_health,
            hunger: 0.0,
            age: 0,
            last_reproduced: tick,
            crowd_happiness: Happiness::Neutral,
            heat_happiness: Happiness::Neutral,
            children_count: 0,
            current_action: Action::Nothing,
            last_action_changed: tick,
            report_happiness_at: 0,
            happiness_change_pending: true,
            last_happiness: Happiness::Neutral,
        }
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn set_health(&mut self, health: f64) {
        self.health = health.clamp(0.0, self.max_health);
    }

    pub fn hunger(&self) -> f64 {
        self.hunger
    }

    pub fn set_hunger(&mut self, hunger: f64) {
        self.hunger = hunger.clamp(0.0, MAX_HUNGER);
    }

    pub fn age(&self) -> Tick {
        self.age
    }

    pub fn increment_age(&mut self) {
        self.age += 1;
    }

    pub fn last_reproduced(&self) -> Tick {
        self.last_reproduced
    }

    pub fn set_last_reproduced(&mut self, tick: Tick) {
        self.last_reproduced = tick;
    }

    pub fn children_count(&self) -> u32 {
        self.children_count
    }

    pub fn add_child(&mut self) {
        self.children_count += 1;
    }

    pub fn current_action(&self) -> Action {
        self.current_action
    }

    pub fn set_current_action(&mut self, action: Action, tick: Tick) {
        self.current_action = action;
        self.last_action_changed = tick;
    }

    pub fn last_action_changed(&self) -> Tick {
        self.last_action_changed
    }

    pub fn crowd_happiness(&self) -> Happiness {
        self.crowd_happiness
    }

    pub fn set_crowd_happiness(&mut self, happiness: Happiness) {
        self.crowd_happiness = happiness;
    }

    pub fn heat_happiness(&self) -> Happiness {
        self.heat_happiness
    }

    /// Overall derived happiness. Severe hunger dominates; otherwise the
    /// crowd component decides.
    ///
    /// TODO(heat): fold heat_happiness into the result once cell heat
    /// actually feeds it; today every cell is Temperate and the component
    /// never leaves Neutral.
    pub fn happiness(&self) -> Happiness {
        if self.hunger >= HUNGER_UNHAPPY_THRESHOLD {
            return Happiness::Unhappy;
        }
        self.crowd_happiness
    }

    /// Records a change of derived happiness so a report can fire, once the
    /// organism is old enough to report at all.
    pub fn update_happiness(&mut self, tick: Tick) {
        if self.age < HAPPINESS_REPORT_MIN_AGE {
            return;
        }
        let new_happiness = self.happiness();
        if self.last_happiness != new_happiness {
            self.report_happiness_at = tick;
            self.last_happiness = new_happiness;
            self.happiness_change_pending = true;
        }
    }

    /// Whether a happiness report should fire this tick. A pending change
    /// fires once its scheduled time has passed; absent changes, a
    /// heartbeat fires when the schedule has gone stale and pushes the next
    /// one far ahead.
    pub fn ready_to_report_happiness(&mut self, tick: Tick) -> bool {
        if self.age < HAPPINESS_REPORT_MIN_AGE {
            return false;
        }
        if self.report_happiness_at < tick && self.happiness_change_pending {
            self.happiness_change_pending = false;
            true
        } else if self.report_happiness_at + HAPPINESS_HEARTBEAT_WINDOW < tick {
            self.report_happiness_at = tick + HAPPINESS_RESCHEDULE_AHEAD;
            true
        } else {
            false
        }
    }
}
