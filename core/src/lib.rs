#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Claimfield engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems inspect immutable
//! [`TerritoryView`] and [`AgentView`] snapshots and answer with [`Command`]
//! values describing desired mutations. The world executes those commands via
//! its `apply` entry point and reports every accepted mutation as an [`Event`].

mod config;

pub use config::{ConfigError, SessionConfig, DEFAULT_PALETTE, MAX_BOARD_CELLS};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the tick counter by one.
    Tick,
    /// Requests that an agent travel in the provided direction from now on.
    SteerAgent {
        /// Agent whose heading changes.
        agent: AgentId,
        /// Direction the agent should face.
        direction: Direction,
    },
    /// Requests that an agent advance one speed step along its heading.
    MoveAgent {
        /// Agent that should move.
        agent: AgentId,
    },
    /// Appends a point to the agent's trail and marks the agent as trailing.
    ExtendTrail {
        /// Agent leaving the trail.
        agent: AgentId,
        /// Exact continuous position recorded on the trail.
        point: Position,
    },
    /// Converts the listed cells into the agent's territory and clears its trail.
    ClaimTrail {
        /// Agent performing the claim.
        agent: AgentId,
        /// Cells covered by the trail, in trail order.
        cells: Vec<CellCoord>,
    },
    /// Replaces the number of ticks a bot waits before re-planning.
    SetTurnCooldown {
        /// Bot whose reaction delay changes.
        agent: AgentId,
        /// Remaining ticks before the next decision.
        ticks: u32,
    },
    /// Permanently removes an agent from play.
    KillAgent {
        /// Agent that died.
        agent: AgentId,
        /// Condition that triggered the death.
        cause: DeathCause,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced to a new tick.
    TimeAdvanced {
        /// Index of the tick that just started.
        tick: u64,
    },
    /// Confirms that an agent changed its heading.
    AgentSteered {
        /// Agent that turned.
        agent: AgentId,
        /// Heading after the turn.
        direction: Direction,
    },
    /// Confirms that an agent moved.
    AgentMoved {
        /// Agent that moved.
        agent: AgentId,
        /// Position before the step.
        from: Position,
        /// Position after the step.
        to: Position,
    },
    /// Confirms that a point was appended to an agent's trail.
    TrailExtended {
        /// Agent owning the trail.
        agent: AgentId,
        /// Point that was recorded.
        point: Position,
        /// Trail length after the append.
        length: usize,
    },
    /// Confirms that an agent converted its trail into territory.
    TrailClaimed {
        /// Agent that claimed.
        agent: AgentId,
        /// Number of in-bounds cells written by the claim.
        cells: usize,
        /// Score recomputed after the claim.
        score: u32,
    },
    /// Confirms that a bot's reaction delay changed.
    TurnCooldownSet {
        /// Bot whose cooldown changed.
        agent: AgentId,
        /// Remaining ticks before the next decision.
        ticks: u32,
    },
    /// Announces that an agent died.
    AgentDied {
        /// Agent that died.
        agent: AgentId,
        /// Condition that triggered the death.
        cause: DeathCause,
    },
}

/// Conditions that end an agent's participation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// The agent left the playable board.
    OutOfBounds,
    /// The agent stepped onto a cell covered by another agent's trail.
    TrailCut {
        /// Agent whose trail was touched.
        by: AgentId,
    },
}

/// Stable handle addressing an agent within the world's roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Handle reserved for the human-controlled player.
    pub const PLAYER: AgentId = AgentId(0);

    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Ownership identity recorded in territory cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Token(u8);

impl Token {
    /// Creates a token from its numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the token.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Display color assigned to an agent. Only presentation code reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl AgentColor {
    /// Creates a new agent color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Distinguishes the human-controlled agent from computer-controlled ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Agent steered by held direction keys.
    Player,
    /// Agent steered by the bot planner.
    Bot,
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing y.
    North,
    /// Movement toward increasing y.
    South,
    /// Movement toward decreasing x.
    West,
    /// Movement toward increasing x.
    East,
}

impl Direction {
    /// Every direction, in the order candidate moves are evaluated.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Unit offset applied to a position when travelling in this direction.
    #[must_use]
    pub const fn unit(self) -> (f32, f32) {
        match self {
            Self::North => (0.0, -1.0),
            Self::South => (0.0, 1.0),
            Self::West => (-1.0, 0.0),
            Self::East => (1.0, 0.0),
        }
    }
}

/// Continuous location on the board measured in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Position reached after travelling `distance` units in `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction, distance: f32) -> Self {
        let (dx, dy) = direction.unit();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    /// Grid cell containing the position. Positions off the board map to
    /// cells outside the grid rather than being clamped.
    #[must_use]
    pub fn cell(self, cell_size: f32) -> CellCoord {
        CellCoord::new(
            (self.x / cell_size).floor() as i32,
            (self.y / cell_size).floor() as i32,
        )
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Location of a single grid cell. Coordinates may be negative or exceed the
/// grid when derived from an off-board position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Upper-left corner of the cell in world units.
    #[must_use]
    pub fn origin(self, cell_size: f32) -> Position {
        Position::new(self.column as f32 * cell_size, self.row as f32 * cell_size)
    }
}

/// Playable rectangle and its subdivision into cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Board {
    width: f32,
    height: f32,
    cell_size: f32,
}

impl Board {
    /// Creates a board description.
    #[must_use]
    pub const fn new(width: f32, height: f32, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    /// Width of the board in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the board in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Side length of a square cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of whole cell columns.
    #[must_use]
    pub fn columns(&self) -> u32 {
        (self.width / self.cell_size) as u32
    }

    /// Number of whole cell rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        (self.height / self.cell_size) as u32
    }

    /// Reports whether the position lies within `[0, width) × [0, height)`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x() >= 0.0
            && position.y() >= 0.0
            && position.x() < self.width
            && position.y() < self.height
    }
}

/// Snapshot of the direction keys currently held by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionKeys {
    /// Up arrow or `w`.
    pub up: bool,
    /// Down arrow or `s`.
    pub down: bool,
    /// Left arrow or `a`.
    pub left: bool,
    /// Right arrow or `d`.
    pub right: bool,
}

impl DirectionKeys {
    /// Keys with only the key for `direction` held.
    #[must_use]
    pub const fn holding(direction: Direction) -> Self {
        Self {
            up: matches!(direction, Direction::North),
            down: matches!(direction, Direction::South),
            left: matches!(direction, Direction::West),
            right: matches!(direction, Direction::East),
        }
    }

    /// Direction requested by the held keys. When several keys are held the
    /// later axis wins: right over left over down over up.
    #[must_use]
    pub fn resolve(&self) -> Option<Direction> {
        if self.right {
            Some(Direction::East)
        } else if self.left {
            Some(Direction::West)
        } else if self.down {
            Some(Direction::South)
        } else if self.up {
            Some(Direction::North)
        } else {
            None
        }
    }
}

/// Read-only view into the dense territory grid.
#[derive(Clone, Copy, Debug)]
pub struct TerritoryView<'a> {
    cells: &'a [Option<Token>],
    columns: u32,
    rows: u32,
}

impl<'a> TerritoryView<'a> {
    /// Captures a new territory view backed by the provided row-major cells.
    #[must_use]
    pub fn new(cells: &'a [Option<Token>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the owner of the provided cell. Cells outside the grid are unowned.
    #[must_use]
    pub fn owner(&self, cell: CellCoord) -> Option<Token> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Counts the cells owned by `token`.
    #[must_use]
    pub fn count_owned(&self, token: Token) -> u32 {
        self.cells
            .iter()
            .filter(|owner| **owner == Some(token))
            .count() as u32
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Option<Token>)> + 'a {
        let columns = self.columns.max(1) as usize;
        self.cells.iter().enumerate().map(move |(index, owner)| {
            let column = (index % columns) as i32;
            let row = (index / columns) as i32;
            (CellCoord::new(column, row), *owner)
        })
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(row as usize * width + column as usize)
        } else {
            None
        }
    }
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot<'a> {
    /// Roster handle of the agent.
    pub id: AgentId,
    /// Whether the agent is the player or a bot.
    pub kind: AgentKind,
    /// Ownership identity written into claimed cells.
    pub token: Token,
    /// Display color of the agent.
    pub color: AgentColor,
    /// Current continuous position.
    pub position: Position,
    /// Current heading.
    pub direction: Direction,
    /// Whether the agent is still in play.
    pub alive: bool,
    /// Number of cells owned by the agent after its last claim.
    pub score: u32,
    /// Whether the agent carries an unclaimed trail.
    pub in_trail: bool,
    /// Points recorded outside the agent's territory, oldest first.
    pub trail: &'a [Position],
    /// Ticks remaining before a bot re-plans. Always zero for the player.
    pub turn_cooldown: u32,
}

impl AgentSnapshot<'_> {
    /// Grid cell containing the agent.
    #[must_use]
    pub fn cell(&self, cell_size: f32) -> CellCoord {
        self.position.cell(cell_size)
    }
}

/// Read-only snapshot describing every agent in roster order.
#[derive(Clone, Debug, Default)]
pub struct AgentView<'a> {
    snapshots: Vec<AgentSnapshot<'a>>,
}

impl<'a> AgentView<'a> {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot<'a>>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot<'a>> {
        self.snapshots.iter()
    }

    /// Iterator over the agents that are still alive, in roster order.
    pub fn living(&self) -> impl Iterator<Item = &AgentSnapshot<'a>> {
        self.snapshots.iter().filter(|snapshot| snapshot.alive)
    }

    /// Looks up the snapshot for the provided agent.
    #[must_use]
    pub fn get(&self, agent: AgentId) -> Option<&AgentSnapshot<'a>> {
        self.snapshots
            .binary_search_by_key(&agent, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }
}
