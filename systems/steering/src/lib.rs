#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement driver that turns waypoint queues into per-tick step commands.
//!
//! Each tick the system looks at every agent's current waypoint and emits a
//! single-axis [`Command::StepAgent`] toward it. Agents without an active
//! plan are left alone; the world requests a fresh route for them on its own.

use maze_chase_core::{AgentId, Command, Direction, Event, PixelPoint};
use maze_chase_world::query::{GhostView, PlayerSnapshot};

/// Computes the single-axis step direction from a position toward a target.
///
/// Aligned axes move along the remaining one; a diagonal offset, which can
/// appear after a mid-cell replan, resolves horizontally first so the agent
/// realigns with the waypoint column before closing the vertical gap.
/// `None` means the agent already sits on the target and should hold.
#[must_use]
pub fn direction_toward(from: PixelPoint, to: PixelPoint) -> Option<Direction> {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();

    if dx == 0 && dy == 0 {
        return None;
    }
    if dx == 0 {
        return Some(if dy > 0 { Direction::Down } else { Direction::Up });
    }
    if dy == 0 {
        return Some(if dx < 0 { Direction::Left } else { Direction::Right });
    }

    Some(if dx < 0 { Direction::Left } else { Direction::Right })
}

/// Pure system that derives one step command per agent per tick.
#[derive(Debug, Default)]
pub struct Steering;

impl Steering {
    /// Creates a new steering system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and immutable snapshots to emit step commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        ghosts: &GhostView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced))
        {
            return;
        }

        if let Some(target) = player.current_target {
            if let Some(direction) = direction_toward(player.position, target) {
                out.push(Command::StepAgent {
                    agent: AgentId::Player,
                    direction,
                });
            }
        }

        for ghost in ghosts.iter() {
            let Some(target) = ghost.current_target else {
                continue;
            };
            if let Some(direction) = direction_toward(ghost.position, target) {
                out.push(Command::StepAgent {
                    agent: AgentId::Ghost(ghost.id),
                    direction,
                });
            }
        }
    }
}
