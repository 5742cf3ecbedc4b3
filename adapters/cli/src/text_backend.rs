use std::{io::Write, time::Duration};

use anyhow::{Context, Result as AnyResult};
use claimfield_core::{AgentKind, CellCoord};
use claimfield_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use glam::Vec2;

use crate::route::Route;

/// Nominal frame length reported to the scene update.
const FRAME_DURATION: Duration = Duration::from_millis(16);

const UNCLAIMED: char = '.';
const TRAIL: char = '+';
const PLAYER: char = '@';

/// Headless backend that feeds a scripted route for a fixed number of frames
/// and prints the last scene as text.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    frames: u64,
    route: Route,
    stop_on_game_over: bool,
    out: W,
}

impl<W> TextBackend<W>
where
    W: Write,
{
    pub(crate) fn new(frames: u64, route: Route, stop_on_game_over: bool, out: W) -> Self {
        Self {
            frames,
            route,
            stop_on_game_over,
            out,
        }
    }
}

impl<W> RenderingBackend for TextBackend<W>
where
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;

        for frame in 0..self.frames {
            let input = FrameInput {
                keys: self.route.keys_at(frame),
            };
            update_scene(FRAME_DURATION, input, &mut scene);
            if self.stop_on_game_over && scene.game_over {
                break;
            }
        }

        writeln!(self.out, "{window_title}").context("failed to write scene title")?;
        self.out
            .write_all(render_scene(&scene).as_bytes())
            .context("failed to write scene")?;
        self.out.flush().context("failed to flush scene output")?;
        Ok(())
    }
}

/// Draws `scene` as one character per cell followed by the HUD lines.
///
/// Territory uses the lowercase letter of its owner's token (`a` for the
/// player), trails `+`, the player `@` and bots the uppercase letter of their
/// token.
pub(crate) fn render_scene(scene: &Scene) -> String {
    let columns = scene.board.columns as usize;
    let rows = scene.board.rows as usize;
    let mut grid = vec![vec![UNCLAIMED; columns]; rows];
    let half_cell = Vec2::splat(scene.board.cell_size / 2.0);

    let mut paint = |cell: Option<CellCoord>, glyph: char| {
        let Some(cell) = cell else {
            return;
        };
        let (Ok(column), Ok(row)) = (usize::try_from(cell.column()), usize::try_from(cell.row()))
        else {
            return;
        };
        if let Some(slot) = grid.get_mut(row).and_then(|line| line.get_mut(column)) {
            *slot = glyph;
        }
    };

    for fill in &scene.territory {
        paint(Some(fill.cell), token_glyph(fill.token.get(), false));
    }
    for stroke in &scene.trails {
        for point in &stroke.points {
            paint(scene.board.cell_at(*point - half_cell), TRAIL);
        }
    }
    for marker in &scene.agents {
        let glyph = match marker.kind {
            AgentKind::Player => PLAYER,
            AgentKind::Bot => token_glyph(marker.token.get(), true),
        };
        paint(scene.board.cell_at(marker.center - half_cell), glyph);
    }

    let mut text = String::with_capacity((columns + 1) * rows);
    for line in grid {
        text.extend(line);
        text.push('\n');
    }
    for line in &scene.hud {
        text.push_str(&line.text);
        text.push('\n');
    }
    text
}

fn token_glyph(token: u8, upper: bool) -> char {
    let glyph = char::from(b'a' + token % 26);
    if upper {
        glyph.to_ascii_uppercase()
    } else {
        glyph
    }
}
