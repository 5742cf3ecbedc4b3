use claimfield_core::{Direction, DirectionKeys, Event, SessionConfig};
use claimfield_system_simulation::{ScoreEntry, Simulation};
use claimfield_world::query;

const TICKS: usize = 400;

#[test]
fn identical_seeds_replay_identically() {
    let first = replay(SessionConfig::default());
    let second = replay(SessionConfig::default());

    assert_eq!(first.events.len(), second.events.len());
    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn seed_is_taken_from_the_configuration() {
    let config = SessionConfig {
        seed: 0xdead_beef,
        ..SessionConfig::default()
    };
    let first = replay(config.clone());
    let second = replay(config);

    assert_eq!(first, second);
}

fn replay(config: SessionConfig) -> ReplayOutcome {
    let mut simulation = Simulation::new(config).expect("valid configuration");
    let mut events = Vec::new();

    for tick in 0..TICKS {
        simulation.step(scripted_keys(tick));
        events.extend_from_slice(simulation.events());
    }

    let territory = query::territory_view(simulation.world())
        .iter()
        .map(|(_, owner)| owner.map(|token| token.get()))
        .collect();

    ReplayOutcome {
        events,
        scoreboard: simulation.scoreboard(),
        territory,
    }
}

/// Loops a 30-tick square around the player's home corner.
fn scripted_keys(tick: usize) -> DirectionKeys {
    let direction = match (tick / 30) % 4 {
        0 => Direction::East,
        1 => Direction::South,
        2 => Direction::West,
        _ => Direction::North,
    };
    DirectionKeys::holding(direction)
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    scoreboard: Vec<ScoreEntry>,
    territory: Vec<Option<u8>>,
}
