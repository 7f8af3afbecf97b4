#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Target selection and route planning for every agent kind.
//!
//! The system answers `PlanNeeded` events: it picks a goal position through
//! the per-agent-kind policy, asks the planner for a pixel-space route, and
//! emits a `SetPlan` command when a route exists. A failed search emits
//! nothing; the world re-requests a plan on the next tick, so planning
//! failures stay soft.

use maze_chase_core::{
    AgentId, CellCoord, Command, Event, GhostMode, PixelPoint, WalkabilityGrid,
};
use maze_chase_system_pathfinding::Planner;
use maze_chase_world::query::{GhostView, PelletView, PlayerSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Distance in pixel units below which a ghost counts as an imminent threat.
pub const THREAT_RADIUS: f64 = 80.0;

/// Configuration parameters required to construct the navigation system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    cell_size: i32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from the cell size and the patrol RNG
    /// seed.
    #[must_use]
    pub const fn new(cell_size: i32, rng_seed: u64) -> Self {
        Self {
            cell_size,
            rng_seed,
        }
    }
}

/// Pixel-space extents used to clamp flee targets into the world.
#[derive(Clone, Copy, Debug)]
pub struct WorldBounds {
    width: i32,
    height: i32,
}

impl WorldBounds {
    /// Creates bounds covering `[0, width] x [0, height]` inclusive.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Selects the player's next goal position.
///
/// Decision table, evaluated with true Euclidean distances (a deliberately
/// different metric than the planner's heuristic):
///
/// | Condition | Target |
/// |---|---|
/// | power active, or a threat and a power pellet both within [`THREAT_RADIUS`] | nearest ghost, else nearest power pellet, else nearest dot |
/// | threat within [`THREAT_RADIUS`] | flee point, clamped to the world bounds |
/// | otherwise | nearest dot |
///
/// Returns `None` when the board offers nothing to chase, in which case the
/// agent holds position for the tick.
#[must_use]
pub fn select_player_target(
    position: PixelPoint,
    pellets: &PelletView,
    ghosts: &GhostView,
    power_active: bool,
    bounds: WorldBounds,
) -> Option<PixelPoint> {
    let nearest_dot = nearest(position, pellets.dots().iter().copied());
    let nearest_pellet = nearest(position, pellets.power_pellets().iter().copied());
    let nearest_ghost = nearest(position, ghosts.iter().map(|ghost| ghost.position));

    let ghost_distance = nearest_ghost
        .map(|ghost| position.distance_to(ghost))
        .unwrap_or(f64::INFINITY);
    let pellet_distance = nearest_pellet
        .map(|pellet| position.distance_to(pellet))
        .unwrap_or(f64::INFINITY);
    let ghost_nearby = ghost_distance <= THREAT_RADIUS;

    if power_active || (ghost_nearby && pellet_distance < THREAT_RADIUS) {
        return nearest_ghost.or(nearest_pellet).or(nearest_dot);
    }

    if ghost_nearby {
        let ghost = nearest_ghost.expect("a nearby ghost exists");
        return Some(flee_point(position, ghost, bounds));
    }

    nearest_dot
}

/// Point reached by extending the threat-to-player vector past the player,
/// clamped into the world bounds.
fn flee_point(position: PixelPoint, threat: PixelPoint, bounds: WorldBounds) -> PixelPoint {
    let dx = position.x() - threat.x();
    let dy = position.y() - threat.y();
    PixelPoint::new(position.x() + dx, position.y() + dy).clamped(bounds.width, bounds.height)
}

fn nearest(from: PixelPoint, candidates: impl Iterator<Item = PixelPoint>) -> Option<PixelPoint> {
    let mut best: Option<(f64, PixelPoint)> = None;
    for candidate in candidates {
        let distance = from.distance_to(candidate);
        let better = match best {
            None => true,
            Some((best_distance, _)) => distance < best_distance,
        };
        if better {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

/// Event-driven system that plans routes for agents requesting one.
#[derive(Debug)]
pub struct Navigation {
    planner: Planner,
    rng: ChaCha8Rng,
    patrol_cells: Vec<CellCoord>,
}

impl Navigation {
    /// Creates a new navigation system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            planner: Planner::new(config.cell_size),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            patrol_cells: Vec::new(),
        }
    }

    /// Consumes world events and immutable views to emit plan commands.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: &WalkabilityGrid,
        bounds: WorldBounds,
        player: &PlayerSnapshot,
        ghosts: &GhostView,
        pellets: &PelletView,
        ghost_mode: GhostMode,
        power_active: bool,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::PlanNeeded { agent } = event else {
                continue;
            };

            match agent {
                AgentId::Player => {
                    let Some(target) = select_player_target(
                        player.position,
                        pellets,
                        ghosts,
                        power_active,
                        bounds,
                    ) else {
                        continue;
                    };
                    self.emit_plan(grid, AgentId::Player, player.position, target, out);
                }
                AgentId::Ghost(id) => {
                    let Some(ghost) = ghosts.iter().find(|ghost| ghost.id == *id) else {
                        continue;
                    };
                    let Some(target) = self.select_ghost_target(
                        grid,
                        ghost_mode,
                        power_active,
                        player.position,
                    ) else {
                        continue;
                    };
                    self.emit_plan(grid, AgentId::Ghost(*id), ghost.position, target, out);
                }
            }
        }
    }

    /// Picks a ghost goal: the player's position while chasing without power
    /// active, otherwise a uniformly random reachable cell.
    fn select_ghost_target(
        &mut self,
        grid: &WalkabilityGrid,
        ghost_mode: GhostMode,
        power_active: bool,
        player_position: PixelPoint,
    ) -> Option<PixelPoint> {
        if ghost_mode == GhostMode::Chase && !power_active {
            return Some(player_position);
        }

        if self.patrol_cells.is_empty() {
            self.patrol_cells.extend(grid.walkable_cells());
        }
        if self.patrol_cells.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..self.patrol_cells.len());
        Some(self.patrol_cells[index].to_pixel(self.planner.cell_size()))
    }

    fn emit_plan(
        &self,
        grid: &WalkabilityGrid,
        agent: AgentId,
        from: PixelPoint,
        to: PixelPoint,
        out: &mut Vec<Command>,
    ) {
        let waypoints = self.planner.plan(grid, from, to);
        if waypoints.is_empty() {
            log::debug!("no route for {agent:?}; retrying next tick");
            return;
        }
        out.push(Command::SetPlan { agent, waypoints });
    }
}
