#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that records trails outside home territory and requests a
//! claim once an agent gets back home.

use claimfield_core::{AgentSnapshot, CellCoord, Command, Position, TerritoryView};

/// Trail bookkeeping system. Run once per agent per tick, after the agent moved.
#[derive(Debug, Default)]
pub struct TrailEngine;

impl TrailEngine {
    /// Creates a new trail engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Inspects the agent's current cell and emits either a trail extension or
    /// a claim command.
    ///
    /// Any cell not owned by the agent, including cells off the board, extends
    /// the trail with the agent's exact position. Landing on home territory
    /// while carrying a trail converts the trail. Dead agents are ignored.
    pub fn handle(
        &self,
        agent: &AgentSnapshot<'_>,
        territory: TerritoryView<'_>,
        cell_size: f32,
        out: &mut Vec<Command>,
    ) {
        if !agent.alive {
            return;
        }

        let cell = agent.cell(cell_size);
        if territory.owner(cell) != Some(agent.token) {
            out.push(Command::ExtendTrail {
                agent: agent.id,
                point: agent.position,
            });
        } else if agent.in_trail {
            out.push(Command::ClaimTrail {
                agent: agent.id,
                cells: trail_cells(agent.trail, cell_size),
            });
        }
    }
}

/// Converts trail points to the cells they cover, in trail order.
///
/// Consecutive points inside the same cell collapse into one entry; the
/// result still visits every covered cell.
#[must_use]
pub fn trail_cells(trail: &[Position], cell_size: f32) -> Vec<CellCoord> {
    let mut cells: Vec<CellCoord> = trail.iter().map(|point| point.cell(cell_size)).collect();
    cells.dedup();
    cells
}
