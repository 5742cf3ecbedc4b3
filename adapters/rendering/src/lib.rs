#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Claimfield adapters.

use anyhow::Result as AnyResult;
use claimfield_core::{AgentColor, AgentId, AgentKind, CellCoord, DirectionKeys, Token};
use claimfield_world::{query, World};
use glam::Vec2;
use std::time::Duration;
use thiserror::Error;

/// Font size of the score lines.
pub const SCORE_FONT_SIZE: f32 = 18.0;
/// Font size of the game-over banner.
pub const BANNER_FONT_SIZE: f32 = 40.0;

const HUD_MARGIN: f32 = 8.0;
const HUD_FIRST_BASELINE: f32 = 22.0;
const HUD_LINE_SPACING: f32 = 22.0;
const BANNER_HALF_WIDTH: f32 = 110.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, used for score lines.
    pub const WHITE: Self = Self::from_rgb_u8(0xff, 0xff, 0xff);
    /// Warning red, used for the game-over banner.
    pub const ALERT: Self = Self::from_rgb_u8(0xff, 0x44, 0x44);

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<AgentColor> for Color {
    fn from(color: AgentColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction keys held during this frame.
    pub keys: DirectionKeys,
}

/// Playing field dimensions expressed in cells and world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Side length of a cell in world units.
    pub cell_size: f32,
    /// Color of unclaimed ground.
    pub background: Color,
}

impl BoardPresentation {
    /// Creates a new board descriptor, rejecting degenerate cell sizes.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_size: f32,
        background: Color,
    ) -> Result<Self, RenderingError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            columns,
            rows,
            cell_size,
            background,
        })
    }

    /// Width of the board in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Height of the board in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Maps a world-space point to the cell containing it, if it lies on the board.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        if point.x < 0.0 || point.y < 0.0 || point.x >= self.width() || point.y >= self.height() {
            return None;
        }
        let column = (point.x / self.cell_size).floor() as i32;
        let row = (point.y / self.cell_size).floor() as i32;
        Some(CellCoord::new(column, row))
    }
}

/// A claimed cell painted in its owner's color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerritoryFill {
    /// Cell being painted.
    pub cell: CellCoord,
    /// Owner of the cell.
    pub token: Token,
    /// Fill color.
    pub color: Color,
}

/// Polyline through an agent's trail, expressed in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailStroke {
    /// Agent that laid the trail.
    pub agent: AgentId,
    /// Stroke color.
    pub color: Color,
    /// Stroke width in world units.
    pub width: f32,
    /// Vertices of the polyline in laying order.
    pub points: Vec<Vec2>,
}

/// Disc drawn at an agent's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentMarker {
    /// Agent being drawn.
    pub agent: AgentId,
    /// Whether the marker belongs to the player or a bot.
    pub kind: AgentKind,
    /// Token the agent paints territory with.
    pub token: Token,
    /// Fill color.
    pub color: Color,
    /// Center of the disc in world units.
    pub center: Vec2,
    /// Radius of the disc in world units.
    pub radius: f32,
}

/// Line of overlay text anchored at its baseline start.
#[derive(Clone, Debug, PartialEq)]
pub struct HudText {
    /// Text to display.
    pub text: String,
    /// Baseline start in world units.
    pub anchor: Vec2,
    /// Font size in world units.
    pub size: f32,
    /// Text color.
    pub color: Color,
}

impl HudText {
    /// Creates a new overlay line.
    #[must_use]
    pub fn new<T>(text: T, anchor: Vec2, size: f32, color: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            text: text.into(),
            anchor,
            size,
            color,
        }
    }
}

/// Scene description drawn back to front: territory, trails, agents, HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board the scene is drawn on.
    pub board: BoardPresentation,
    /// Every owned cell.
    pub territory: Vec<TerritoryFill>,
    /// Trails of living agents.
    pub trails: Vec<TrailStroke>,
    /// Living agents.
    pub agents: Vec<AgentMarker>,
    /// Score lines and, once the player has died, the game-over banner.
    pub hud: Vec<HudText>,
    /// Whether the player has died.
    pub game_over: bool,
}

impl Scene {
    /// Creates an empty scene for `board`.
    #[must_use]
    pub fn new(board: BoardPresentation) -> Self {
        Self {
            board,
            territory: Vec::new(),
            trails: Vec::new(),
            agents: Vec::new(),
            hud: Vec::new(),
            game_over: false,
        }
    }

    /// Captures the current state of `world`.
    #[must_use]
    pub fn from_world(world: &World, background: Color) -> Self {
        let board = query::board(world);
        let presentation = BoardPresentation {
            columns: board.columns(),
            rows: board.rows(),
            cell_size: board.cell_size(),
            background,
        };
        let mut scene = Self::new(presentation);
        scene.refresh(world);
        scene
    }

    /// Replaces the scene contents with the current state of `world`, keeping
    /// the board presentation.
    pub fn refresh(&mut self, world: &World) {
        let cell_size = self.board.cell_size;
        let half_cell = Vec2::splat(cell_size / 2.0);
        let palette = query::palette(world);
        let color_of = |token: Token| {
            palette
                .get(usize::from(token.get()))
                .copied()
                .map_or(Color::WHITE, Color::from)
        };

        self.territory.clear();
        self.territory.extend(
            query::territory_view(world)
                .iter()
                .filter_map(|(cell, owner)| owner.map(|token| (cell, token)))
                .map(|(cell, token)| TerritoryFill {
                    cell,
                    token,
                    color: color_of(token),
                }),
        );

        let agents = query::agent_view(world);
        self.trails.clear();
        self.agents.clear();
        for agent in agents.living() {
            if !agent.trail.is_empty() {
                self.trails.push(TrailStroke {
                    agent: agent.id,
                    color: Color::from(agent.color),
                    width: 2.0,
                    points: agent
                        .trail
                        .iter()
                        .map(|point| Vec2::new(point.x(), point.y()) + half_cell)
                        .collect(),
                });
            }
            self.agents.push(AgentMarker {
                agent: agent.id,
                kind: agent.kind,
                token: agent.token,
                color: Color::from(agent.color),
                center: Vec2::new(agent.position.x(), agent.position.y()) + half_cell,
                radius: (cell_size / 2.0 - 2.0).max(1.0),
            });
        }

        let player = agents.get(AgentId::PLAYER);
        self.game_over = player.map_or(true, |player| !player.alive);

        self.hud.clear();
        self.hud.push(HudText::new(
            format!("Your Score: {}", player.map_or(0, |player| player.score)),
            Vec2::new(HUD_MARGIN, HUD_FIRST_BASELINE),
            SCORE_FONT_SIZE,
            Color::WHITE,
        ));
        let bots = agents
            .iter()
            .filter(|agent| agent.kind == AgentKind::Bot)
            .enumerate();
        for (index, bot) in bots {
            if !bot.alive {
                continue;
            }
            let baseline = HUD_FIRST_BASELINE + HUD_LINE_SPACING * (index as f32 + 1.0);
            self.hud.push(HudText::new(
                format!("Bot{}: {}", index + 1, bot.score),
                Vec2::new(HUD_MARGIN, baseline),
                SCORE_FONT_SIZE,
                Color::WHITE,
            ));
        }
        if self.game_over {
            self.hud.push(HudText::new(
                "GAME OVER!",
                Vec2::new(
                    self.board.width() / 2.0 - BANNER_HALF_WIDTH,
                    self.board.height() / 2.0,
                ),
                BANNER_FONT_SIZE,
                Color::ALERT,
            ));
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window or report.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Claimfield scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive, finite side length.
    #[error("cell size must be positive and finite (received {cell_size})")]
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
}
