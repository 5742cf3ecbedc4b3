use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AgentColor, Board};

/// Palette shipped with the game: the player's blue followed by the bot colors.
pub const DEFAULT_PALETTE: [AgentColor; 8] = [
    AgentColor::from_rgb(0x55, 0x55, 0xff),
    AgentColor::from_rgb(0x33, 0x33, 0xee),
    AgentColor::from_rgb(0xee, 0x33, 0x33),
    AgentColor::from_rgb(0x33, 0xee, 0x33),
    AgentColor::from_rgb(0xee, 0xee, 0x33),
    AgentColor::from_rgb(0xee, 0x33, 0xee),
    AgentColor::from_rgb(0x33, 0xee, 0xee),
    AgentColor::from_rgb(0xee, 0xee, 0xee),
];

const DEFAULT_SEED: u64 = 0x5eed_c1a1_3f1e_1d00;

/// Smallest number of cells per axis that still leaves room to spawn bots
/// away from the board edge.
const MIN_CELLS_PER_AXIS: u32 = 5;

/// Largest number of cells a board may hold.
pub const MAX_BOARD_CELLS: u64 = 1 << 20;

/// Options fixed at session start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Side length of a territory cell in world units.
    pub cell_size: f32,
    /// Width of the board in world units.
    pub board_width: f32,
    /// Height of the board in world units.
    pub board_height: f32,
    /// Distance the player travels per tick.
    pub player_speed: f32,
    /// Distance each bot travels per tick.
    pub bot_speed: f32,
    /// Number of bots spawned alongside the player.
    pub bot_count: usize,
    /// Display colors; entry 0 belongs to the player, bots draw from the rest.
    pub palette: Vec<AgentColor>,
    /// Fewest ticks a bot waits between decisions.
    pub cooldown_min: u32,
    /// Most ticks a bot waits between decisions.
    pub cooldown_max: u32,
    /// Half-width, in cells, of the square of territory granted at spawn.
    pub spawn_radius: u32,
    /// Seed for every random stream used by the session.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            board_width: 600.0,
            board_height: 600.0,
            player_speed: 2.0,
            bot_speed: 2.0,
            bot_count: 5,
            palette: DEFAULT_PALETTE.to_vec(),
            cooldown_min: 4,
            cooldown_max: 9,
            spawn_radius: 2,
            seed: DEFAULT_SEED,
        }
    }
}

impl SessionConfig {
    /// Board geometry described by the configuration.
    #[must_use]
    pub fn board(&self) -> Board {
        Board::new(self.board_width, self.board_height, self.cell_size)
    }

    /// Checks that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }

        let board = self.board();
        let (columns, rows) = (board.columns(), board.rows());
        if columns < MIN_CELLS_PER_AXIS || rows < MIN_CELLS_PER_AXIS {
            return Err(ConfigError::BoardTooSmall { columns, rows });
        }
        if u64::from(columns) * u64::from(rows) > MAX_BOARD_CELLS {
            return Err(ConfigError::BoardTooLarge { columns, rows });
        }

        if !(self.player_speed.is_finite() && self.player_speed > 0.0) {
            return Err(ConfigError::InvalidSpeed {
                agent: "player",
                speed: self.player_speed,
            });
        }
        if !(self.bot_speed.is_finite() && self.bot_speed > 0.0) {
            return Err(ConfigError::InvalidSpeed {
                agent: "bot",
                speed: self.bot_speed,
            });
        }

        let required = self.bot_count.saturating_add(1);
        if required > usize::from(u8::MAX) + 1 {
            return Err(ConfigError::TooManyBots(self.bot_count));
        }

        let distinct = self.palette.iter().collect::<HashSet<_>>().len();
        if distinct < required || self.palette.len() != distinct {
            return Err(ConfigError::PaletteTooSmall {
                required,
                distinct,
            });
        }

        if self.cooldown_min > self.cooldown_max {
            return Err(ConfigError::InvertedCooldown {
                min: self.cooldown_min,
                max: self.cooldown_max,
            });
        }

        Ok(())
    }
}

/// Reasons a [`SessionConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Cells must have a positive, finite size.
    #[error("cell size must be positive (received {0})")]
    InvalidCellSize(f32),
    /// The board must span enough cells to place bots away from the edges.
    #[error("board must be at least 5x5 cells (received {columns}x{rows})")]
    BoardTooSmall {
        /// Whole cell columns on the configured board.
        columns: u32,
        /// Whole cell rows on the configured board.
        rows: u32,
    },
    /// The ownership grid must stay within [`MAX_BOARD_CELLS`].
    #[error("board must hold at most 1048576 cells (received {columns}x{rows})")]
    BoardTooLarge {
        /// Whole cell columns on the configured board.
        columns: u32,
        /// Whole cell rows on the configured board.
        rows: u32,
    },
    /// Movement speeds must be positive and finite.
    #[error("{agent} speed must be positive (received {speed})")]
    InvalidSpeed {
        /// Which kind of agent carries the bad speed.
        agent: &'static str,
        /// Rejected speed.
        speed: f32,
    },
    /// Every agent needs its own ownership token.
    #[error("at most 255 bots are supported (received {0})")]
    TooManyBots(usize),
    /// The palette must hold one distinct, unrepeated color per agent.
    #[error("palette needs {required} distinct colors without repeats (found {distinct} distinct)")]
    PaletteTooSmall {
        /// Colors needed for the player plus every bot.
        required: usize,
        /// Distinct colors found in the palette.
        distinct: usize,
    },
    /// The cooldown range must not be inverted.
    #[error("cooldown range is inverted ({min} > {max})")]
    InvertedCooldown {
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
}
