//! End-to-end tests driving the simulation through its public surface:
//! the event bus, the simulation manager, and config.

use std::sync::{Arc, Mutex};

use colonies::core::config::{ColonyConfig, GameConfig};
use colonies::event::{
    ColonyPlacement, EventKind, EventListener, GameEvent, MAX_EVENTS_PER_DRAIN,
};
use colonies::organism::attributes::{Frequency, Preference};
use colonies::simulation::SimulationManager;
use colonies::stats::StatsTracker;
use colonies::world::GridPosition;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<GameEvent>>,
}

impl Recorder {
    fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl EventListener for Recorder {
    fn notify(&self, event: &GameEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn placement(count: u32, row: usize, column: usize, max_age: u64) -> ColonyPlacement {
    ColonyPlacement::new(
        "amoeba",
        count,
        GridPosition::new(row, column).unwrap(),
        100.0,
        max_age,
        Preference::None,
        Preference::Like,
        Frequency::Frequent,
        0,
    )
    .unwrap()
}

#[test]
fn placement_event_populates_the_grid() {
    let sim = SimulationManager::new(&GameConfig::default());
    let births = Arc::new(Recorder::default());
    sim.bus().subscribe(EventKind::OrganismBorn, births.clone());

    sim.bus()
        .publish(GameEvent::ColonyPlaced(placement(5, 4, 3, 18_000)));
    sim.step();
    // Births published during founding are delivered on the next drain.
    sim.step();

    assert_eq!(births.count(), 5);
    assert_eq!(sim.logic().colony_count(), 1);
    let grid = sim.logic().grid();
    assert_eq!(grid.lock().unwrap().population(), 5);
}

#[test]
fn corner_placement_stops_at_the_boundary() {
    let sim = SimulationManager::new(&GameConfig::default());
    sim.bus()
        .publish(GameEvent::ColonyPlaced(placement(9, 0, 0, 18_000)));
    sim.step();

    // The corner cell plus its three in-bounds neighbors.
    let colony = &sim.logic().colonies()[0];
    assert_eq!(colony.living_count(), 4);
}

#[test]
fn drain_bound_spreads_bursts_over_steps() {
    let sim = SimulationManager::new(&GameConfig::default());
    let recorder = Arc::new(Recorder::default());
    sim.bus().subscribe(EventKind::InfoRequested, recorder.clone());

    let position = GridPosition::new(9, 6).unwrap();
    for _ in 0..7 {
        sim.bus().publish(GameEvent::InfoRequested { position });
    }

    sim.step();
    assert_eq!(recorder.count(), MAX_EVENTS_PER_DRAIN);
    sim.step();
    assert_eq!(recorder.count(), 7);
}

#[test]
fn colonies_reproduce_after_the_timeout() {
    let sim = SimulationManager::new(&GameConfig::default());
    let stats = StatsTracker::new();
    stats.clone().attach(&sim.bus());

    sim.bus()
        .publish(GameEvent::ColonyPlaced(placement(2, 4, 3, 18_000)));
    // Frequent reproduction unlocks after tick 600.
    for _ in 0..700 {
        sim.step();
    }

    let colony = &sim.logic().colonies()[0];
    assert_eq!(colony.living_count(), 3);
    assert_eq!(stats.births(), 3);

    // Both parents credit the child; the child has none.
    let children: Vec<u32> = colony
        .infos()
        .iter()
        .map(|i| i.dynamics.children_count())
        .collect();
    assert_eq!(children.iter().filter(|&&c| c == 1).count(), 2);
    assert_eq!(children.iter().filter(|&&c| c == 0).count(), 1);
}

#[test]
fn death_reports_but_leaves_the_cell_occupied() {
    let sim = SimulationManager::new(&GameConfig::default());
    let stats = StatsTracker::new();
    stats.clone().attach(&sim.bus());

    // Short-lived colony; VeryInfrequent keeps reproduction out of the way.
    let short_lived = ColonyPlacement::new(
        "mayfly",
        2,
        GridPosition::new(4, 3).unwrap(),
        100.0,
        100,
        Preference::None,
        Preference::Like,
        Frequency::VeryInfrequent,
        0,
    )
    .unwrap();
    sim.bus().publish(GameEvent::ColonyPlaced(short_lived));
    // Max-age jitter tops out at 115 ticks.
    for _ in 0..200 {
        sim.step();
    }

    let colony = &sim.logic().colonies()[0];
    assert_eq!(colony.living_count(), 0);
    assert_eq!(stats.deaths(), 2);
    // Corpses stay on the grid until something pops them.
    let grid = sim.logic().grid();
    assert_eq!(grid.lock().unwrap().population(), 2);
}

#[test]
fn popping_clears_cell_and_roster() {
    let sim = SimulationManager::new(&GameConfig::default());
    sim.bus()
        .publish(GameEvent::ColonyPlaced(placement(3, 4, 3, 18_000)));
    sim.step();

    let colony = sim.logic().colonies()[0].clone();
    let victim = colony.living_positions()[0];
    sim.bus().publish(GameEvent::OrganismPopped { position: victim });
    for _ in 0..3 {
        sim.step();
    }

    assert_eq!(colony.living_count(), 2);
    let grid = sim.logic().grid();
    assert!(grid.lock().unwrap().is_empty(victim));
}

#[test]
fn info_requests_are_answered_by_position() {
    let sim = SimulationManager::new(&GameConfig::default());
    let responses = Arc::new(Recorder::default());
    sim.bus().subscribe(EventKind::InfoResponse, responses.clone());

    sim.bus()
        .publish(GameEvent::ColonyPlaced(placement(3, 4, 3, 18_000)));
    sim.step();
    sim.step();

    let colony = sim.logic().colonies()[0].clone();
    let target = colony.living_positions()[1];
    sim.bus().publish(GameEvent::InfoRequested { position: target });
    sim.step();

    let events = responses.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        GameEvent::InfoResponse(info) => assert_eq!(info.position, target),
        other => panic!("unexpected event: {other:?}"),
    }
    drop(events);

    sim.bus().publish(GameEvent::AllInfoRequested);
    sim.step();
    sim.step();
    assert_eq!(responses.count(), 1 + 3);
}

#[test]
fn pausing_freezes_the_world() {
    let sim = SimulationManager::new(&GameConfig::default());
    sim.bus()
        .publish(GameEvent::ColonyPlaced(placement(2, 4, 3, 18_000)));
    sim.step();
    let colony = sim.logic().colonies()[0].clone();
    let age = || colony.infos()[0].dynamics.age();
    let frozen_at = age();

    sim.pause();
    for _ in 0..10 {
        sim.step();
    }
    assert_eq!(sim.ticks(), 1);
    assert_eq!(age(), frozen_at);

    sim.unpause();
    sim.step();
    assert!(age() > frozen_at);
}

#[test]
fn snapshot_restore_resumes_the_run() {
    let mut config = GameConfig::default();
    config.colony = ColonyConfig {
        organism_count: 4,
        ..ColonyConfig::default()
    };

    let sim = SimulationManager::new(&config);
    sim.bus()
        .publish(GameEvent::ColonyPlaced(config.colony.to_placement(0).unwrap()));
    for _ in 0..50 {
        sim.step();
    }
    let bytes = sim.snapshot().unwrap();

    let restored = SimulationManager::restore(&bytes, &config).unwrap();
    assert_eq!(restored.ticks(), 50);
    assert_eq!(restored.logic().colony_count(), 1);
    let grid = restored.logic().grid();
    assert_eq!(grid.lock().unwrap().population(), 4);

    // Listeners are transient: a fresh tracker picks up from here.
    let stats = StatsTracker::new();
    stats.clone().attach(&restored.bus());
    for _ in 0..10 {
        restored.step();
    }
    assert_eq!(restored.ticks(), 60);

    // The restored colony still answers requests.
    let responses = Arc::new(Recorder::default());
    restored
        .bus()
        .subscribe(EventKind::InfoResponse, responses.clone());
    restored.bus().publish(GameEvent::AllInfoRequested);
    restored.step();
    restored.step();
    assert_eq!(responses.count(), 4);
}
