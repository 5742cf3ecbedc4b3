#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Claimfield.
//!
//! The world owns the territory grid and the persistent agent roster. Nothing
//! outside this crate mutates them: systems describe changes as [`Command`]
//! values and [`apply`] executes them, reporting each accepted mutation as an
//! [`Event`]. Commands aimed at dead or unknown agents are dropped silently.

mod agents;
mod territory;

pub use agents::Spawn;
pub use territory::TerritoryMap;

use agents::Agent;
use claimfield_core::{
    AgentId, AgentKind, Board, CellCoord, Command, ConfigError, Event, SessionConfig,
};
use rand::Rng;

/// Represents the authoritative Claimfield world state.
#[derive(Debug)]
pub struct World {
    config: SessionConfig,
    board: Board,
    territory: TerritoryMap,
    agents: Vec<Agent>,
    tick_index: u64,
}

impl World {
    /// Creates a world with the player near the top-left corner and
    /// `config.bot_count` bots scattered with `rng`.
    pub fn new<R>(config: SessionConfig, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        let (player_color, bot_colors) =
            config
                .palette
                .split_first()
                .ok_or(ConfigError::PaletteTooSmall {
                    required: config.bot_count.saturating_add(1),
                    distinct: 0,
                })?;
        let spawns = agents::random_roster(&config, *player_color, bot_colors, rng);
        Self::from_spawns(config, &spawns)
    }

    /// Creates a world from an explicit roster. The first spawn receives
    /// [`AgentId::PLAYER`]; tokens follow roster order.
    pub fn from_spawns(config: SessionConfig, spawns: &[Spawn]) -> Result<Self, ConfigError> {
        config.validate()?;
        if spawns.len() > usize::from(u8::MAX) + 1 {
            return Err(ConfigError::TooManyBots(spawns.len().saturating_sub(1)));
        }

        let board = config.board();
        let mut world = Self {
            territory: TerritoryMap::new(board.columns(), board.rows()),
            agents: Vec::with_capacity(spawns.len()),
            board,
            config,
            tick_index: 0,
        };

        for (index, spawn) in spawns.iter().enumerate() {
            let agent = Agent::from_spawn(index as u8, *spawn, &world.config);
            world.agents.push(agent);
        }
        world.stamp_spawn_blobs();
        Ok(world)
    }

    /// Grants each agent the square of cells around its spawn cell, in roster
    /// order, then scores everyone once every blob is in place.
    fn stamp_spawn_blobs(&mut self) {
        let radius = i64::from(self.config.spawn_radius);
        let last_column = i64::from(self.board.columns()) - 1;
        let last_row = i64::from(self.board.rows()) - 1;
        for agent in &self.agents {
            let center = agent.position.cell(self.board.cell_size());
            let (column, row) = (i64::from(center.column()), i64::from(center.row()));
            let columns = (column - radius).max(0)..=(column + radius).min(last_column);
            let rows = (row - radius).max(0)..=(row + radius).min(last_row);
            for column in columns {
                for row in rows.clone() {
                    // Both bounds lie inside the grid, which fits in `i32`.
                    let cell = CellCoord::new(column as i32, row as i32);
                    self.territory.set_owner(cell, agent.token);
                }
            }
        }

        for agent in &mut self.agents {
            agent.score = self.territory.count_owned(agent.token);
        }
    }

    fn living_agent_mut(&mut self, agent: AgentId) -> Option<&mut Agent> {
        let index = usize::try_from(agent.get()).ok()?;
        self.agents.get_mut(index).filter(|agent| agent.alive)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SteerAgent { agent, direction } => {
            if let Some(state) = world.living_agent_mut(agent) {
                state.direction = direction;
                out_events.push(Event::AgentSteered { agent, direction });
            }
        }
        Command::MoveAgent { agent } => {
            if let Some(state) = world.living_agent_mut(agent) {
                let from = state.advance();
                out_events.push(Event::AgentMoved {
                    agent,
                    from,
                    to: state.position,
                });
            }
        }
        Command::ExtendTrail { agent, point } => {
            if let Some(state) = world.living_agent_mut(agent) {
                state.in_trail = true;
                state.trail.push(point);
                out_events.push(Event::TrailExtended {
                    agent,
                    point,
                    length: state.trail.len(),
                });
            }
        }
        Command::ClaimTrail { agent, cells } => {
            let World {
                territory, agents, ..
            } = world;
            let Some(state) = usize::try_from(agent.get())
                .ok()
                .and_then(|index| agents.get_mut(index))
                .filter(|state| state.alive)
            else {
                return;
            };

            let mut written = 0;
            for cell in cells {
                if territory.contains(cell) {
                    territory.set_owner(cell, state.token);
                    written += 1;
                }
            }
            state.trail.clear();
            state.in_trail = false;
            state.score = territory.count_owned(state.token);
            out_events.push(Event::TrailClaimed {
                agent,
                cells: written,
                score: state.score,
            });
        }
        Command::SetTurnCooldown { agent, ticks } => {
            if let Some(state) = world.living_agent_mut(agent) {
                if state.kind == AgentKind::Bot {
                    state.turn_cooldown = ticks;
                    out_events.push(Event::TurnCooldownSet { agent, ticks });
                }
            }
        }
        Command::KillAgent { agent, cause } => {
            if let Some(state) = world.living_agent_mut(agent) {
                state.alive = false;
                out_events.push(Event::AgentDied { agent, cause });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{TerritoryMap, World};
    use claimfield_core::{
        AgentColor, AgentId, AgentSnapshot, AgentView, Board, SessionConfig, TerritoryView,
    };

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SessionConfig {
        &world.config
    }

    /// Board geometry used for bounds and cell lookups.
    #[must_use]
    pub fn board(world: &World) -> Board {
        world.board
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Provides read-only access to the ownership grid.
    #[must_use]
    pub fn territory(world: &World) -> &TerritoryMap {
        &world.territory
    }

    /// Exposes a read-only view of the ownership grid.
    #[must_use]
    pub fn territory_view(world: &World) -> TerritoryView<'_> {
        world.territory.view()
    }

    /// Captures a read-only view of every agent, dead or alive, in roster order.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView<'_> {
        AgentView::from_snapshots(world.agents.iter().map(|agent| agent.snapshot()).collect())
    }

    /// Captures a snapshot of a single agent.
    #[must_use]
    pub fn agent(world: &World, agent: AgentId) -> Option<AgentSnapshot<'_>> {
        let index = usize::try_from(agent.get()).ok()?;
        world.agents.get(index).map(|agent| agent.snapshot())
    }

    /// Handles of every agent in processing order: the player, then bots in
    /// spawn order.
    #[must_use]
    pub fn roster(world: &World) -> Vec<AgentId> {
        world.agents.iter().map(|agent| agent.id).collect()
    }

    /// Display color for each token, indexed by token value.
    #[must_use]
    pub fn palette(world: &World) -> Vec<AgentColor> {
        world.agents.iter().map(|agent| agent.color).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimfield_core::{AgentColor, DeathCause, Direction, Position, Token, DEFAULT_PALETTE};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn solo_world(position: Position) -> World {
        let config = SessionConfig {
            bot_count: 0,
            ..SessionConfig::default()
        };
        World::from_spawns(
            config,
            &[Spawn::new(AgentKind::Player, position, DEFAULT_PALETTE[0])],
        )
        .expect("valid roster")
    }

    #[test]
    fn interior_spawn_claims_a_five_by_five_square() {
        let world = solo_world(Position::new(40.0, 40.0));
        let territory = query::territory(&world);

        for column in 0..5 {
            for row in 0..5 {
                assert_eq!(
                    territory.owner_of(CellCoord::new(column, row)),
                    Some(Token::new(0)),
                    "cell ({column}, {row}) should belong to the player",
                );
            }
        }
        assert_eq!(territory.owner_of(CellCoord::new(5, 2)), None);
        assert_eq!(territory.count_owned(Token::new(0)), 25);
        let player = query::agent(&world, AgentId::PLAYER).expect("player");
        assert_eq!(player.score, 25);
    }

    #[test]
    fn spawn_blob_is_clipped_at_the_board_edge() {
        let world = solo_world(Position::new(0.0, 0.0));
        let player = query::agent(&world, AgentId::PLAYER).expect("player");
        assert_eq!(player.score, 9);
    }

    #[test]
    fn oversized_spawn_radius_claims_the_whole_board() {
        let config = SessionConfig {
            bot_count: 0,
            spawn_radius: u32::MAX,
            ..SessionConfig::default()
        };
        let world = World::from_spawns(
            config,
            &[Spawn::new(
                AgentKind::Player,
                Position::new(40.0, 40.0),
                DEFAULT_PALETTE[0],
            )],
        )
        .expect("valid roster");

        let player = query::agent(&world, AgentId::PLAYER).expect("player");
        assert_eq!(player.score, 900);
    }

    #[test]
    fn later_spawn_blobs_overwrite_earlier_ones() {
        let config = SessionConfig {
            bot_count: 1,
            ..SessionConfig::default()
        };
        let world = World::from_spawns(
            config,
            &[
                Spawn::new(AgentKind::Player, Position::new(40.0, 40.0), DEFAULT_PALETTE[0]),
                Spawn::new(AgentKind::Bot, Position::new(80.0, 40.0), DEFAULT_PALETTE[1]),
            ],
        )
        .expect("valid roster");

        let territory = query::territory(&world);
        assert_eq!(territory.owner_of(CellCoord::new(2, 2)), Some(Token::new(1)));
        assert_eq!(territory.count_owned(Token::new(0)), 10);
        assert_eq!(territory.count_owned(Token::new(1)), 25);

        let view = query::agent_view(&world);
        let scores: Vec<u32> = view.iter().map(|agent| agent.score).collect();
        assert_eq!(scores, vec![10, 25]);
    }

    #[test]
    fn random_world_uses_configured_bot_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let world = World::new(SessionConfig::default(), &mut rng).expect("default config");
        let view = query::agent_view(&world);

        assert_eq!(view.iter().count(), 6);
        assert_eq!(view.iter().next().map(|agent| agent.kind), Some(AgentKind::Player));
        assert!(view
            .iter()
            .skip(1)
            .all(|agent| agent.kind == AgentKind::Bot && agent.score > 0));
    }

    #[test]
    fn world_creation_rejects_invalid_configuration() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = SessionConfig {
            palette: vec![AgentColor::from_rgb(1, 2, 3)],
            ..SessionConfig::default()
        };
        assert!(matches!(
            World::new(config, &mut rng),
            Err(ConfigError::PaletteTooSmall { .. })
        ));

        let unallocatable = SessionConfig {
            board_width: 1e12,
            board_height: 1e12,
            ..SessionConfig::default()
        };
        assert!(matches!(
            World::new(unallocatable, &mut rng),
            Err(ConfigError::BoardTooLarge { .. })
        ));
    }

    #[test]
    fn trail_extension_and_claim_update_state() {
        let mut world = solo_world(Position::new(40.0, 40.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ExtendTrail {
                agent: AgentId::PLAYER,
                point: Position::new(110.0, 50.0),
            },
            &mut events,
        );
        let player = query::agent(&world, AgentId::PLAYER).expect("player");
        assert!(player.in_trail);
        assert_eq!(player.trail, &[Position::new(110.0, 50.0)]);

        apply(
            &mut world,
            Command::ClaimTrail {
                agent: AgentId::PLAYER,
                cells: vec![CellCoord::new(5, 2), CellCoord::new(40, 2)],
            },
            &mut events,
        );

        let player = query::agent(&world, AgentId::PLAYER).expect("player");
        assert!(!player.in_trail);
        assert!(player.trail.is_empty());
        assert_eq!(player.score, 26);
        assert_eq!(
            events.last(),
            Some(&Event::TrailClaimed {
                agent: AgentId::PLAYER,
                cells: 1,
                score: 26,
            })
        );
    }

    #[test]
    fn claiming_an_empty_trail_changes_nothing() {
        let mut world = solo_world(Position::new(40.0, 40.0));
        let before: Vec<_> = query::territory_view(&world).iter().collect();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ClaimTrail {
                agent: AgentId::PLAYER,
                cells: Vec::new(),
            },
            &mut events,
        );

        let after: Vec<_> = query::territory_view(&world).iter().collect();
        assert_eq!(before, after);
        let player = query::agent(&world, AgentId::PLAYER).expect("player");
        assert_eq!(player.score, 25);
    }

    #[test]
    fn dead_agents_ignore_further_commands() {
        let mut world = solo_world(Position::new(40.0, 40.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::KillAgent {
                agent: AgentId::PLAYER,
                cause: DeathCause::OutOfBounds,
            },
            &mut events,
        );
        assert_eq!(events.len(), 1);

        events.clear();
        for command in [
            Command::SteerAgent {
                agent: AgentId::PLAYER,
                direction: Direction::North,
            },
            Command::MoveAgent {
                agent: AgentId::PLAYER,
            },
            Command::KillAgent {
                agent: AgentId::PLAYER,
                cause: DeathCause::OutOfBounds,
            },
        ] {
            apply(&mut world, command, &mut events);
        }

        assert!(events.is_empty(), "dead agents must stay inert: {events:?}");
        let player = query::agent(&world, AgentId::PLAYER).expect("player");
        assert!(!player.alive);
        assert_eq!(player.position, Position::new(40.0, 40.0));
    }

    #[test]
    fn player_ignores_turn_cooldown() {
        let mut world = solo_world(Position::new(40.0, 40.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetTurnCooldown {
                agent: AgentId::PLAYER,
                ticks: 5,
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn tick_advances_counter() {
        let mut world = solo_world(Position::new(40.0, 40.0));
        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(query::tick_index(&world), 2);
        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { tick: 1 },
                Event::TimeAdvanced { tick: 2 },
            ]
        );
    }
}
