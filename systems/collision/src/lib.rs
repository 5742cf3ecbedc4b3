#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides whether an agent dies after moving.

use claimfield_core::{AgentSnapshot, AgentView, Board, Command, DeathCause};

/// Death detection system. Run once per agent per tick, after trail handling.
#[derive(Debug, Default)]
pub struct CollisionEngine;

impl CollisionEngine {
    /// Creates a new collision engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits a kill command when `agent` meets a death condition.
    pub fn handle(
        &self,
        agent: &AgentSnapshot<'_>,
        agents: &AgentView<'_>,
        board: Board,
        out: &mut Vec<Command>,
    ) {
        if !agent.alive {
            return;
        }

        if let Some(cause) = death_cause(agent, agents, board) {
            out.push(Command::KillAgent {
                agent: agent.id,
                cause,
            });
        }
    }
}

/// Evaluates the death conditions for `agent` in order.
///
/// Leaving `[0, width) × [0, height)` is checked first. Otherwise the agent
/// dies on the first living agent, in roster order, whose trail covers the
/// agent's cell and whose token differs from the agent's. Trails sharing the
/// agent's token never kill.
#[must_use]
pub fn death_cause(
    agent: &AgentSnapshot<'_>,
    agents: &AgentView<'_>,
    board: Board,
) -> Option<DeathCause> {
    if !board.contains(agent.position) {
        return Some(DeathCause::OutOfBounds);
    }

    let cell_size = board.cell_size();
    let cell = agent.cell(cell_size);
    agents
        .living()
        .filter(|other| other.token != agent.token)
        .find(|other| other.trail.iter().any(|point| point.cell(cell_size) == cell))
        .map(|other| DeathCause::TrailCut { by: other.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimfield_core::{AgentColor, AgentId, AgentKind, Direction, Position, Token};

    fn agent<'a>(index: u8, position: Position, trail: &'a [Position]) -> AgentSnapshot<'a> {
        AgentSnapshot {
            id: AgentId::new(u32::from(index)),
            kind: if index == 0 {
                AgentKind::Player
            } else {
                AgentKind::Bot
            },
            token: Token::new(index),
            color: AgentColor::from_rgb(index, index, index),
            position,
            direction: Direction::East,
            alive: true,
            score: 0,
            in_trail: !trail.is_empty(),
            trail,
            turn_cooldown: 0,
        }
    }

    fn board() -> Board {
        Board::new(600.0, 600.0, 20.0)
    }

    #[test]
    fn every_board_edge_is_lethal() {
        for position in [
            Position::new(-1.0, 100.0),
            Position::new(600.0, 100.0),
            Position::new(100.0, -1.0),
            Position::new(100.0, 600.0),
        ] {
            let checked = agent(0, position, &[]);
            let view = AgentView::from_snapshots(vec![checked]);
            assert_eq!(
                death_cause(&checked, &view, board()),
                Some(DeathCause::OutOfBounds),
                "{position:?} should be out of bounds"
            );
        }
    }

    #[test]
    fn bounds_are_checked_before_trails() {
        let red_trail = [Position::new(-5.0, 100.0)];
        let red = agent(1, Position::new(300.0, 300.0), &red_trail);
        let blue = agent(2, Position::new(-1.0, 100.0), &[]);
        let view = AgentView::from_snapshots(vec![red, blue]);

        assert_eq!(
            death_cause(&blue, &view, board()),
            Some(DeathCause::OutOfBounds)
        );
    }

    #[test]
    fn foreign_trail_on_current_cell_kills() {
        let red_trail = [Position::new(200.0, 200.0), Position::new(210.0, 200.0)];
        let blue_trail = [Position::new(400.0, 400.0); 6];
        let red = agent(1, Position::new(300.0, 300.0), &red_trail);
        let blue = agent(2, Position::new(205.0, 219.0), &blue_trail);
        let view = AgentView::from_snapshots(vec![red, blue]);

        assert_eq!(
            death_cause(&blue, &view, board()),
            Some(DeathCause::TrailCut { by: AgentId::new(1) })
        );
    }

    #[test]
    fn own_trail_never_kills() {
        let trail = [Position::new(200.0, 200.0), Position::new(202.0, 200.0)];
        let red = agent(1, Position::new(204.0, 200.0), &trail);
        let view = AgentView::from_snapshots(vec![red]);

        assert_eq!(death_cause(&red, &view, board()), None);
    }

    #[test]
    fn dead_agents_trails_are_harmless() {
        let red_trail = [Position::new(200.0, 200.0)];
        let mut red = agent(1, Position::new(300.0, 300.0), &red_trail);
        red.alive = false;
        let blue = agent(2, Position::new(200.0, 200.0), &[]);
        let view = AgentView::from_snapshots(vec![red, blue]);

        assert_eq!(death_cause(&blue, &view, board()), None);
    }

    #[test]
    fn handle_emits_a_single_kill_command() {
        let checked = agent(0, Position::new(600.0, 0.0), &[]);
        let view = AgentView::from_snapshots(vec![checked]);
        let mut commands = Vec::new();

        CollisionEngine::new().handle(&checked, &view, board(), &mut commands);

        assert_eq!(
            commands,
            vec![Command::KillAgent {
                agent: AgentId::PLAYER,
                cause: DeathCause::OutOfBounds,
            }]
        );
    }
}
