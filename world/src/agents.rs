//! Agent roster storage and spawn placement.

use claimfield_core::{
    AgentColor, AgentId, AgentKind, AgentSnapshot, Board, CellCoord, Direction, Position,
    SessionConfig, Token,
};
use rand::Rng;

/// Bots never spawn within this many cells of the board edge.
const SPAWN_MARGIN: u32 = 2;

/// Initial placement of a single agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawn {
    /// Whether the agent is the player or a bot.
    pub kind: AgentKind,
    /// Starting position in world units.
    pub position: Position,
    /// Display color of the agent.
    pub color: AgentColor,
}

impl Spawn {
    /// Creates a spawn descriptor.
    #[must_use]
    pub const fn new(kind: AgentKind, position: Position, color: AgentColor) -> Self {
        Self {
            kind,
            position,
            color,
        }
    }
}

/// Mutable state of one agent stored in the world's roster.
#[derive(Clone, Debug)]
pub(crate) struct Agent {
    pub(crate) id: AgentId,
    pub(crate) kind: AgentKind,
    pub(crate) token: Token,
    pub(crate) color: AgentColor,
    pub(crate) position: Position,
    pub(crate) direction: Direction,
    pub(crate) speed: f32,
    pub(crate) alive: bool,
    pub(crate) score: u32,
    pub(crate) in_trail: bool,
    pub(crate) trail: Vec<Position>,
    pub(crate) turn_cooldown: u32,
}

impl Agent {
    pub(crate) fn from_spawn(index: u8, spawn: Spawn, config: &SessionConfig) -> Self {
        let speed = match spawn.kind {
            AgentKind::Player => config.player_speed,
            AgentKind::Bot => config.bot_speed,
        };
        Self {
            id: AgentId::new(u32::from(index)),
            kind: spawn.kind,
            token: Token::new(index),
            color: spawn.color,
            position: spawn.position,
            direction: Direction::East,
            speed,
            alive: true,
            score: 0,
            in_trail: false,
            trail: Vec::new(),
            turn_cooldown: 0,
        }
    }

    pub(crate) fn snapshot(&self) -> AgentSnapshot<'_> {
        AgentSnapshot {
            id: self.id,
            kind: self.kind,
            token: self.token,
            color: self.color,
            position: self.position,
            direction: self.direction,
            alive: self.alive,
            score: self.score,
            in_trail: self.in_trail,
            trail: &self.trail,
            turn_cooldown: self.turn_cooldown,
        }
    }

    /// Advances one speed step along the current heading.
    pub(crate) fn advance(&mut self) -> Position {
        let from = self.position;
        self.position = from.stepped(self.direction, self.speed);
        from
    }
}

/// Places the player near the top-left corner and scatters bots across the
/// interior, each with a distinct palette color.
///
/// `player_color` and `bot_colors` must already be split off the validated
/// palette; `bot_colors` must hold at least `config.bot_count` entries.
pub(crate) fn random_roster<R>(
    config: &SessionConfig,
    player_color: AgentColor,
    bot_colors: &[AgentColor],
    rng: &mut R,
) -> Vec<Spawn>
where
    R: Rng + ?Sized,
{
    let board = config.board();
    let mut spawns = Vec::with_capacity(config.bot_count + 1);
    let player_cell = CellCoord::new(SPAWN_MARGIN as i32, SPAWN_MARGIN as i32);
    spawns.push(Spawn::new(
        AgentKind::Player,
        player_cell.origin(config.cell_size),
        player_color,
    ));

    let mut unused: Vec<AgentColor> = bot_colors.to_vec();
    for _ in 0..config.bot_count {
        if unused.is_empty() {
            break;
        }
        let color = unused.swap_remove(rng.gen_range(0..unused.len()));
        let cell = interior_cell(&board, rng);
        spawns.push(Spawn::new(
            AgentKind::Bot,
            cell.origin(config.cell_size),
            color,
        ));
    }

    spawns
}

fn interior_cell<R>(board: &Board, rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    let span = |cells: u32| cells.saturating_sub(SPAWN_MARGIN * 2).max(1);
    let column = rng.gen_range(0..span(board.columns())) + SPAWN_MARGIN;
    let row = rng.gen_range(0..span(board.rows())) + SPAWN_MARGIN;
    CellCoord::new(column as i32, row as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimfield_core::DEFAULT_PALETTE;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn player_spawns_two_cells_from_the_corner() {
        let config = SessionConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let spawns = random_roster(&config, DEFAULT_PALETTE[0], &DEFAULT_PALETTE[1..], &mut rng);

        assert_eq!(spawns[0].kind, AgentKind::Player);
        assert_eq!(spawns[0].position, Position::new(40.0, 40.0));
        assert_eq!(spawns[0].color, DEFAULT_PALETTE[0]);
    }

    #[test]
    fn bots_spawn_on_interior_cell_corners_with_distinct_colors() {
        let config = SessionConfig {
            bot_count: 7,
            ..SessionConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let spawns = random_roster(&config, DEFAULT_PALETTE[0], &DEFAULT_PALETTE[1..], &mut rng);

        assert_eq!(spawns.len(), 8);
        let mut colors: Vec<_> = spawns.iter().map(|spawn| spawn.color).collect();
        colors.sort_by_key(|color| (color.red(), color.green(), color.blue()));
        colors.dedup();
        assert_eq!(colors.len(), 8, "every agent needs its own color");

        for spawn in spawns.iter().filter(|spawn| spawn.kind == AgentKind::Bot) {
            let cell = spawn.position.cell(config.cell_size);
            assert!((2..28).contains(&cell.column()), "column {}", cell.column());
            assert!((2..28).contains(&cell.row()), "row {}", cell.row());
            assert_eq!(cell.origin(config.cell_size), spawn.position);
        }
    }

    #[test]
    fn agents_start_heading_east_with_kind_specific_speed() {
        let config = SessionConfig {
            player_speed: 3.0,
            bot_speed: 1.5,
            ..SessionConfig::default()
        };
        let origin = Position::new(100.0, 100.0);
        let mut bot = Agent::from_spawn(
            1,
            Spawn::new(AgentKind::Bot, origin, DEFAULT_PALETTE[1]),
            &config,
        );

        assert_eq!(bot.direction, Direction::East);
        assert_eq!(bot.token, Token::new(1));
        assert_eq!(bot.advance(), origin);
        assert_eq!(bot.position, Position::new(101.5, 100.0));
    }
}
