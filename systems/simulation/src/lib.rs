#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order tick driver for Claimfield.
//!
//! A [`Simulation`] owns the world and every system. Each call to
//! [`Simulation::step`] advances the tick counter and then processes the roster
//! in order, the player first, so later agents observe the state left behind by
//! earlier ones within the same tick.

use claimfield_core::{
    AgentId, AgentKind, Command, ConfigError, DirectionKeys, Event, SessionConfig,
};
use claimfield_system_bot_planner::{BotPlanner, Config as PlannerConfig};
use claimfield_system_collision::CollisionEngine;
use claimfield_system_trail::TrailEngine;
use claimfield_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Mixed into the session seed so spawning and planning draw from unrelated
/// streams.
const PLANNER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// One row of the scoreboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Agent the row describes.
    pub agent: AgentId,
    /// Whether the agent is the player or a bot.
    pub kind: AgentKind,
    /// Number of cells the agent currently owns.
    pub score: u32,
    /// Whether the agent is still in play.
    pub alive: bool,
}

/// Owns the world and drives every system once per tick.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    trail: TrailEngine,
    collision: CollisionEngine,
    planner: BotPlanner,
    roster: Vec<AgentId>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    /// Builds a session from `config`, spawning agents with a generator seeded
    /// from `config.seed`.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let seed = config.seed;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let world = World::new(config, &mut rng)?;
        let simulation = Self::from_world(world, seed ^ PLANNER_SEED_SALT);

        let board = query::board(&simulation.world);
        info!(
            seed,
            bots = simulation.roster.len().saturating_sub(1),
            columns = board.columns(),
            rows = board.rows(),
            "session started"
        );
        Ok(simulation)
    }

    /// Wraps an existing world. `planner_seed` seeds the bots' random stream.
    #[must_use]
    pub fn from_world(world: World, planner_seed: u64) -> Self {
        let planner = BotPlanner::new(PlannerConfig::from_session(
            query::config(&world),
            planner_seed,
        ));
        let roster = query::roster(&world);
        Self {
            world,
            trail: TrailEngine::new(),
            collision: CollisionEngine::new(),
            planner,
            roster,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Advances the session by one tick using the player's held keys.
    pub fn step(&mut self, keys: DirectionKeys) {
        self.events.clear();
        self.commands.push(Command::Tick);
        self.flush();

        for index in 0..self.roster.len() {
            let agent = self.roster[index];
            self.advance_agent(agent, keys);
        }
    }

    fn advance_agent(&mut self, agent: AgentId, keys: DirectionKeys) {
        let board = query::board(&self.world);

        let Some(snapshot) = query::agent(&self.world, agent) else {
            return;
        };
        if !snapshot.alive {
            return;
        }
        match snapshot.kind {
            AgentKind::Player => {
                if let Some(direction) = keys.resolve() {
                    self.commands.push(Command::SteerAgent { agent, direction });
                }
            }
            AgentKind::Bot => {
                let player_position = query::agent(&self.world, AgentId::PLAYER)
                    .map_or(snapshot.position, |player| player.position);
                self.planner.handle(
                    &snapshot,
                    query::territory_view(&self.world),
                    player_position,
                    board,
                    &mut self.commands,
                );
            }
        }
        self.commands.push(Command::MoveAgent { agent });
        self.flush();

        if let Some(snapshot) = query::agent(&self.world, agent) {
            self.trail.handle(
                &snapshot,
                query::territory_view(&self.world),
                board.cell_size(),
                &mut self.commands,
            );
        }
        self.flush();

        if let Some(snapshot) = query::agent(&self.world, agent) {
            let agents = query::agent_view(&self.world);
            self.collision
                .handle(&snapshot, &agents, board, &mut self.commands);
        }
        self.flush();
    }

    fn flush(&mut self) {
        let first_new = self.events.len();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        for event in &self.events[first_new..] {
            match event {
                Event::TrailClaimed {
                    agent,
                    cells,
                    score,
                } => {
                    debug!(
                        agent = agent.get(),
                        cells = *cells,
                        score = *score,
                        "trail claimed"
                    );
                }
                Event::AgentDied { agent, cause } => {
                    info!(agent = agent.get(), cause = ?cause, "agent died");
                }
                _ => {}
            }
        }
    }

    /// Read-only access to the world, for rendering and inspection.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent [`Simulation::step`], in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        query::tick_index(&self.world)
    }

    /// Reports whether the player has died. Bots keep playing regardless.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::agent(&self.world, AgentId::PLAYER).map_or(true, |player| !player.alive)
    }

    /// Scores of every agent in roster order, dead ones included.
    #[must_use]
    pub fn scoreboard(&self) -> Vec<ScoreEntry> {
        query::agent_view(&self.world)
            .iter()
            .map(|agent| ScoreEntry {
                agent: agent.id,
                kind: agent.kind,
                score: agent.score,
                alive: agent.alive,
            })
            .collect()
    }
}
