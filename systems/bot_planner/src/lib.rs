#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy bot steering system.
//!
//! Each decision looks exactly one step ahead: the bot picks a target (the
//! nearest foreign-owned cell, or the player when no such cell exists) and
//! takes whichever cardinal step brings it closest, penalising steps that
//! leave the board or land on its own trail. Between decisions the bot keeps
//! its heading for a randomised number of ticks to mimic reaction delay.

use claimfield_core::{
    AgentKind, AgentSnapshot, Board, CellCoord, Command, Direction, Position, SessionConfig,
    TerritoryView,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const OUT_OF_BOUNDS_PENALTY: f32 = 1_000.0;
const OWN_TRAIL_PENALTY: f32 = 100.0;

/// Configuration parameters required to construct the bot planner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    bot_speed: f32,
    cooldown_min: u32,
    cooldown_max: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration. An inverted cooldown range is reordered.
    #[must_use]
    pub const fn new(
        bot_speed: f32,
        cooldown_min: u32,
        cooldown_max: u32,
        rng_seed: u64,
    ) -> Self {
        let (cooldown_min, cooldown_max) = if cooldown_min <= cooldown_max {
            (cooldown_min, cooldown_max)
        } else {
            (cooldown_max, cooldown_min)
        };
        Self {
            bot_speed,
            cooldown_min,
            cooldown_max,
            rng_seed,
        }
    }

    /// Derives the planner configuration from session options, using `rng_seed`
    /// for the planner's private random stream.
    #[must_use]
    pub fn from_session(session: &SessionConfig, rng_seed: u64) -> Self {
        Self::new(
            session.bot_speed,
            session.cooldown_min,
            session.cooldown_max,
            rng_seed,
        )
    }
}

/// Candidate step together with its heuristic score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredMove {
    /// Direction of the candidate step.
    pub direction: Direction,
    /// Heuristic value; higher is better.
    pub score: f32,
}

/// Outcome of a single planning decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    /// Point the bot is heading for.
    pub target: Position,
    /// Every evaluated step, in [`Direction::ALL`] order.
    pub moves: [ScoredMove; 4],
    /// Chosen direction; always one of the best-scoring moves.
    pub direction: Direction,
}

/// Bot steering system holding the random stream used for tie-breaks and
/// reaction delays.
#[derive(Debug)]
pub struct BotPlanner {
    bot_speed: f32,
    cooldown_min: u32,
    cooldown_max: u32,
    rng: ChaCha8Rng,
    best: Vec<Direction>,
}

impl BotPlanner {
    /// Creates a new planner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            bot_speed: config.bot_speed,
            cooldown_min: config.cooldown_min,
            cooldown_max: config.cooldown_max,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            best: Vec::with_capacity(Direction::ALL.len()),
        }
    }

    /// Emits steering and cooldown commands for a single bot.
    ///
    /// While the bot's cooldown is positive it only counts down and keeps its
    /// heading. At zero the planner decides a new heading and draws a fresh
    /// cooldown. The player and dead bots are ignored.
    pub fn handle(
        &mut self,
        bot: &AgentSnapshot<'_>,
        territory: TerritoryView<'_>,
        player_position: Position,
        board: Board,
        out: &mut Vec<Command>,
    ) {
        if !bot.alive || bot.kind != AgentKind::Bot {
            return;
        }

        if bot.turn_cooldown > 0 {
            out.push(Command::SetTurnCooldown {
                agent: bot.id,
                ticks: bot.turn_cooldown - 1,
            });
            return;
        }

        let decision = self.decide(bot, territory, player_position, board);
        let ticks = self.rng.gen_range(self.cooldown_min..=self.cooldown_max);
        out.push(Command::SteerAgent {
            agent: bot.id,
            direction: decision.direction,
        });
        out.push(Command::SetTurnCooldown {
            agent: bot.id,
            ticks,
        });
    }

    /// Evaluates every cardinal step and picks the best one, breaking ties
    /// uniformly at random.
    pub fn decide(
        &mut self,
        bot: &AgentSnapshot<'_>,
        territory: TerritoryView<'_>,
        player_position: Position,
        board: Board,
    ) -> Decision {
        let target = select_target(bot, territory, player_position, board.cell_size());
        let moves = score_moves(bot, target, board, self.bot_speed);

        let best_score = moves
            .iter()
            .map(|candidate| candidate.score)
            .fold(f32::NEG_INFINITY, f32::max);
        self.best.clear();
        self.best.extend(
            moves
                .iter()
                .filter(|candidate| candidate.score == best_score)
                .map(|candidate| candidate.direction),
        );

        let direction = match self.best.len() {
            0 => bot.direction,
            1 => self.best[0],
            count => self.best[self.rng.gen_range(0..count)],
        };

        Decision {
            target,
            moves,
            direction,
        }
    }
}

/// Picks the point a bot should chase.
///
/// Cells are scanned column by column; the first foreign-owned cell whose
/// corner is strictly closer (Manhattan distance from the bot's position)
/// than every earlier one wins, and its corner becomes the target. Without any
/// foreign-owned cell the bot chases `player_position`.
#[must_use]
pub fn select_target(
    bot: &AgentSnapshot<'_>,
    territory: TerritoryView<'_>,
    player_position: Position,
    cell_size: f32,
) -> Position {
    let (columns, rows) = territory.dimensions();
    let mut best: Option<(f32, Position)> = None;

    for column in 0..columns as i32 {
        for row in 0..rows as i32 {
            let cell = CellCoord::new(column, row);
            let Some(owner) = territory.owner(cell) else {
                continue;
            };
            if owner == bot.token {
                continue;
            }

            let corner = cell.origin(cell_size);
            let distance = bot.position.manhattan_distance(corner);
            if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                best = Some((distance, corner));
            }
        }
    }

    best.map_or(player_position, |(_, corner)| corner)
}

/// Scores a single `speed` step in every direction, in [`Direction::ALL`] order.
///
/// The base score is the negated Manhattan distance from the stepped position
/// to `target`. Leaving `[0, width) × [0, height)` costs 1000, and every point
/// of the bot's own trail lying in the stepped cell costs 100.
#[must_use]
pub fn score_moves(
    bot: &AgentSnapshot<'_>,
    target: Position,
    board: Board,
    speed: f32,
) -> [ScoredMove; 4] {
    let cell_size = board.cell_size();
    Direction::ALL.map(|direction| {
        let next = bot.position.stepped(direction, speed);
        let next_cell = next.cell(cell_size);

        let mut score = -next.manhattan_distance(target);
        if !board.contains(next) {
            score -= OUT_OF_BOUNDS_PENALTY;
        }
        let trail_hits = bot
            .trail
            .iter()
            .filter(|point| point.cell(cell_size) == next_cell)
            .count();
        score -= OWN_TRAIL_PENALTY * trail_hits as f32;

        ScoredMove { direction, score }
    })
}
