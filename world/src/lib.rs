#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.
//!
//! The world owns every mutable piece of the session: agent positions and
//! waypoint queues, remaining pellets, the power timer, and the shared ghost
//! mode. Mutation happens exclusively through [`apply`]; systems observe the
//! world through the read-only snapshots in [`query`].

pub mod layout;

use std::collections::{BTreeSet, VecDeque};

use maze_chase_core::{
    AgentId, CellCoord, Command, Direction, Event, GhostId, GhostMode, PixelPoint,
    WalkabilityGrid,
};

pub use crate::layout::MazeLayout;

const DEFAULT_CELL_SIZE: i32 = 32;
const DEFAULT_POWER_DURATION_TICKS: u32 = 1_800;

/// Configuration parameters required to construct a world.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    cell_size: i32,
    power_duration_ticks: u32,
}

impl Config {
    /// Creates a new configuration from an explicit cell size and power
    /// duration measured in ticks.
    #[must_use]
    pub const fn new(cell_size: i32, power_duration_ticks: u32) -> Self {
        Self {
            cell_size,
            power_duration_ticks,
        }
    }

    /// Pixel length of one grid cell edge.
    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE, DEFAULT_POWER_DURATION_TICKS)
    }
}

/// Pixel-space dimensions derived from the grid and the configured cell size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    columns: u32,
    rows: u32,
    cell_size: i32,
}

impl GridGeometry {
    const fn new(columns: u32, rows: u32, cell_size: i32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Number of cell columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Pixel length of one grid cell edge.
    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Total maze width in pixels.
    #[must_use]
    pub const fn pixel_width(&self) -> i32 {
        self.columns as i32 * self.cell_size
    }

    /// Total maze height in pixels.
    #[must_use]
    pub const fn pixel_height(&self) -> i32 {
        self.rows as i32 * self.cell_size
    }
}

/// Waypoint queue and current target for one agent.
///
/// `current_target == None` is the "no plan" state; the owning agent idles
/// until a new route arrives.
#[derive(Clone, Debug, Default)]
struct RouteFollower {
    queue: VecDeque<PixelPoint>,
    current_target: Option<PixelPoint>,
}

impl RouteFollower {
    fn assign(&mut self, waypoints: Vec<PixelPoint>) {
        self.queue = waypoints.into();
        self.current_target = self.queue.pop_front();
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.current_target = None;
    }

    fn current_target(&self) -> Option<PixelPoint> {
        self.current_target
    }

    fn has_plan(&self) -> bool {
        self.current_target.is_some()
    }

    /// Pops the head waypoint once the agent sits exactly on it.
    fn advance_if_reached(&mut self, position: PixelPoint) {
        if self.current_target == Some(position) {
            self.current_target = self.queue.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
struct PlayerState {
    position: PixelPoint,
    spawn: PixelPoint,
    direction: Option<Direction>,
    last_safe_position: PixelPoint,
    route: RouteFollower,
}

#[derive(Clone, Debug)]
struct GhostState {
    id: GhostId,
    position: PixelPoint,
    direction: Option<Direction>,
    route: RouteFollower,
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    geometry: GridGeometry,
    grid: WalkabilityGrid,
    player: PlayerState,
    ghosts: Vec<GhostState>,
    dots: BTreeSet<CellCoord>,
    power_pellets: BTreeSet<CellCoord>,
    ghost_mode: GhostMode,
    power_ticks_remaining: u32,
    power_duration_ticks: u32,
}

impl World {
    /// Creates a new world seeded from a parsed maze layout.
    #[must_use]
    pub fn new(layout: MazeLayout, config: Config) -> Self {
        let geometry = GridGeometry::new(
            layout.grid().columns(),
            layout.grid().rows(),
            config.cell_size,
        );
        let player_spawn = layout.player_spawn().to_pixel(config.cell_size);
        let ghosts = layout
            .ghost_spawns()
            .iter()
            .enumerate()
            .map(|(index, cell)| GhostState {
                id: GhostId::new(index as u32),
                position: cell.to_pixel(config.cell_size),
                direction: None,
                route: RouteFollower::default(),
            })
            .collect();

        Self {
            geometry,
            grid: layout.grid().clone(),
            player: PlayerState {
                position: player_spawn,
                spawn: player_spawn,
                direction: None,
                last_safe_position: player_spawn,
                route: RouteFollower::default(),
            },
            ghosts,
            dots: layout.dot_cells().iter().copied().collect(),
            power_pellets: layout.power_cells().iter().copied().collect(),
            ghost_mode: GhostMode::Patrol,
            power_ticks_remaining: 0,
            power_duration_ticks: config.power_duration_ticks,
        }
    }

    fn center_cell(&self, position: PixelPoint) -> CellCoord {
        let half = self.geometry.cell_size() / 2;
        PixelPoint::new(position.x() + half, position.y() + half)
            .to_cell(self.geometry.cell_size())
    }

    fn route_for_mut(&mut self, agent: AgentId) -> Option<&mut RouteFollower> {
        match agent {
            AgentId::Player => Some(&mut self.player.route),
            AgentId::Ghost(id) => self
                .ghosts
                .iter_mut()
                .find(|ghost| ghost.id == id)
                .map(|ghost| &mut ghost.route),
        }
    }

    fn plan_is_within_bounds(&self, waypoints: &[PixelPoint]) -> bool {
        waypoints.iter().all(|waypoint| {
            waypoint.x() >= 0
                && waypoint.y() >= 0
                && self.grid.contains(waypoint.to_cell(self.geometry.cell_size()))
        })
    }

    fn step_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        self.player.last_safe_position = self.player.position;
        self.player.direction = Some(direction);

        // Speculative move, validate, conditionally revert. The move happens
        // first so corner overlap is judged at the attempted position.
        let from = self.player.position;
        let attempted = from.stepped(direction);
        self.player.position = attempted;

        let cell_size = self.geometry.cell_size();
        if !self
            .grid
            .is_region_walkable(attempted, cell_size, cell_size)
        {
            self.player.position = self.player.last_safe_position;
            // A blocked step means the active route no longer fits the maze,
            // as when a diagonal waypoint's horizontal approach is walled
            // off. Dropping the route makes the next tick request a fresh
            // plan instead of stepping into the same wall forever.
            self.player.route.clear();
        } else {
            out_events.push(Event::AgentMoved {
                agent: AgentId::Player,
                from,
                to: attempted,
            });
        }

        self.resolve_pellet_pickup(out_events);
        self.resolve_ghost_contact(out_events);
    }

    fn step_ghost(&mut self, id: GhostId, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(ghost) = self.ghosts.iter_mut().find(|ghost| ghost.id == id) else {
            return;
        };

        let from = ghost.position;
        ghost.position = from.stepped(direction);
        ghost.direction = Some(direction);
        out_events.push(Event::AgentMoved {
            agent: AgentId::Ghost(id),
            from,
            to: ghost.position,
        });

        self.resolve_ghost_contact(out_events);
    }

    fn resolve_pellet_pickup(&mut self, out_events: &mut Vec<Event>) {
        let cell = self.center_cell(self.player.position);

        if self.dots.remove(&cell) {
            out_events.push(Event::DotEaten { cell });
            if self.dots.is_empty() {
                out_events.push(Event::MazeCleared);
            }
        }

        // A pellet eaten while power is already active would be wasted, so
        // it stays on the board until the timer runs out.
        if self.power_ticks_remaining == 0 && self.power_pellets.remove(&cell) {
            out_events.push(Event::PowerPelletEaten { cell });
            self.power_ticks_remaining = self.power_duration_ticks;
            out_events.push(Event::PowerStarted);
            self.set_ghost_mode(GhostMode::Patrol, out_events);
        }
    }

    fn resolve_ghost_contact(&mut self, out_events: &mut Vec<Event>) {
        let player_cell = self.center_cell(self.player.position);
        let half = self.geometry.cell_size() / 2;
        let cell_size = self.geometry.cell_size();
        let contacted: Vec<GhostId> = self
            .ghosts
            .iter()
            .filter(|ghost| {
                let center = PixelPoint::new(ghost.position.x() + half, ghost.position.y() + half);
                center.to_cell(cell_size) == player_cell
            })
            .map(|ghost| ghost.id)
            .collect();

        for id in contacted {
            if self.power_ticks_remaining > 0 {
                self.ghosts.retain(|ghost| ghost.id != id);
                out_events.push(Event::GhostEaten { ghost: id });
            } else {
                out_events.push(Event::PlayerCaught);
                self.player.position = self.player.spawn;
                self.player.last_safe_position = self.player.spawn;
                self.player.direction = None;
                self.player.route.clear();
                break;
            }
        }
    }

    fn set_ghost_mode(&mut self, mode: GhostMode, out_events: &mut Vec<Event>) {
        if self.ghost_mode != mode {
            self.ghost_mode = mode;
            out_events.push(Event::GhostModeChanged { mode });
        }
    }

    fn advance_tick(&mut self, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced);

        if self.power_ticks_remaining > 0 {
            self.power_ticks_remaining -= 1;
            if self.power_ticks_remaining == 0 {
                out_events.push(Event::PowerEnded);
            }
        }

        // Pickups and contacts are re-evaluated every tick, not only on
        // movement; the spawn-cell dot is eaten before the first step.
        self.resolve_pellet_pickup(out_events);
        self.resolve_ghost_contact(out_events);

        // Waypoints are consumed here, one pop per tick per agent; agents
        // left without a target request a fresh plan every tick until one
        // arrives, which bounds replanning to once per agent per tick.
        let position = self.player.position;
        self.player.route.advance_if_reached(position);
        if !self.player.route.has_plan() {
            out_events.push(Event::PlanNeeded {
                agent: AgentId::Player,
            });
        }

        for ghost in &mut self.ghosts {
            let position = ghost.position;
            ghost.route.advance_if_reached(position);
            if !ghost.route.has_plan() {
                out_events.push(Event::PlanNeeded {
                    agent: AgentId::Ghost(ghost.id),
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.advance_tick(out_events),
        Command::SetPlan { agent, waypoints } => {
            // An empty or out-of-bounds plan is dropped; the agent idles and
            // the next tick re-emits `PlanNeeded`.
            if waypoints.is_empty() || !world.plan_is_within_bounds(&waypoints) {
                return;
            }
            if let Some(route) = world.route_for_mut(agent) {
                route.assign(waypoints);
            }
        }
        Command::StepAgent { agent, direction } => match agent {
            AgentId::Player => world.step_player(direction, out_events),
            AgentId::Ghost(id) => world.step_ghost(id, direction, out_events),
        },
        Command::SetGhostMode { mode } => world.set_ghost_mode(mode, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{GridGeometry, World};
    use maze_chase_core::{Direction, GhostId, GhostMode, PixelPoint, WalkabilityGrid};

    /// Provides the pixel-space dimensions of the maze.
    #[must_use]
    pub fn geometry(world: &World) -> &GridGeometry {
        &world.geometry
    }

    /// Provides read-only access to the walkability grid.
    #[must_use]
    pub fn grid(world: &World) -> &WalkabilityGrid {
        &world.grid
    }

    /// Behaviour mode currently shared by the ghosts.
    #[must_use]
    pub fn ghost_mode(world: &World) -> GhostMode {
        world.ghost_mode
    }

    /// Reports whether the power mode is currently active.
    #[must_use]
    pub fn power_active(world: &World) -> bool {
        world.power_ticks_remaining > 0
    }

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            direction: world.player.direction,
            current_target: world.player.route.current_target(),
        }
    }

    /// Captures a read-only view of the ghosts inhabiting the maze.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        let snapshots: Vec<GhostSnapshot> = world
            .ghosts
            .iter()
            .map(|ghost| GhostSnapshot {
                id: ghost.id,
                position: ghost.position,
                direction: ghost.direction,
                current_target: ghost.route.current_target(),
            })
            .collect();
        GhostView::from_snapshots(snapshots)
    }

    /// Captures the pixel-space centers of the remaining pellets.
    #[must_use]
    pub fn pellet_view(world: &World) -> PelletView {
        let half = world.geometry.cell_size() / 2;
        let center = |cell: &maze_chase_core::CellCoord| {
            let corner = cell.to_pixel(world.geometry.cell_size());
            PixelPoint::new(corner.x() + half, corner.y() + half)
        };

        PelletView::from_positions(
            world.dots.iter().map(center).collect(),
            world.power_pellets.iter().map(center).collect(),
        )
    }

    /// Immutable representation of the player's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Pixel position of the player's upper-left corner.
        pub position: PixelPoint,
        /// Direction applied on the most recent step, if any.
        pub direction: Option<Direction>,
        /// Waypoint currently pursued, `None` when no plan is active.
        pub current_target: Option<PixelPoint>,
    }

    /// Immutable representation of a single ghost's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GhostSnapshot {
        /// Unique identifier assigned to the ghost.
        pub id: GhostId,
        /// Pixel position of the ghost's upper-left corner.
        pub position: PixelPoint,
        /// Direction applied on the most recent step, if any.
        pub direction: Option<Direction>,
        /// Waypoint currently pursued, `None` when no plan is active.
        pub current_target: Option<PixelPoint>,
    }

    /// Read-only view of the ghosts in deterministic identifier order.
    #[derive(Clone, Debug, Default)]
    pub struct GhostView {
        snapshots: Vec<GhostSnapshot>,
    }

    impl GhostView {
        /// Creates a view from raw snapshots, sorting them by identifier.
        #[must_use]
        pub fn from_snapshots(mut snapshots: Vec<GhostSnapshot>) -> Self {
            snapshots.sort_by_key(|snapshot| snapshot.id);
            Self { snapshots }
        }

        /// Iterator over the captured ghost snapshots.
        pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
            self.snapshots.iter()
        }

        /// Number of ghosts still inhabiting the maze.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether every ghost has been removed.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }
    }

    /// Read-only view of the remaining pellet positions.
    #[derive(Clone, Debug, Default)]
    pub struct PelletView {
        dots: Vec<PixelPoint>,
        power_pellets: Vec<PixelPoint>,
    }

    impl PelletView {
        /// Creates a view from pellet center positions.
        #[must_use]
        pub fn from_positions(dots: Vec<PixelPoint>, power_pellets: Vec<PixelPoint>) -> Self {
            Self {
                dots,
                power_pellets,
            }
        }

        /// Pixel centers of the remaining dots.
        #[must_use]
        pub fn dots(&self) -> &[PixelPoint] {
            &self.dots
        }

        /// Pixel centers of the remaining power pellets.
        #[must_use]
        pub fn power_pellets(&self) -> &[PixelPoint] {
            &self.power_pellets
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{AgentId, Command, Direction, Event, GhostId, GhostMode};

    fn open_world(rows: &[&str]) -> World {
        let layout = MazeLayout::parse(rows).expect("valid layout");
        World::new(layout, Config::default())
    }

    fn step(world: &mut World, agent: AgentId, direction: Direction) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::StepAgent { agent, direction }, &mut events);
        events
    }

    #[test]
    fn tick_requests_plans_for_agents_without_one() {
        let mut world = open_world(&["XXXXX", "XP GX", "XXXXX"]);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);

        assert!(events.contains(&Event::TimeAdvanced));
        assert!(events.contains(&Event::PlanNeeded {
            agent: AgentId::Player
        }));
        assert!(events.contains(&Event::PlanNeeded {
            agent: AgentId::Ghost(GhostId::new(0))
        }));
    }

    #[test]
    fn set_plan_installs_the_first_waypoint_as_target() {
        let mut world = open_world(&["XXXXX", "XP  X", "XXXXX"]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetPlan {
                agent: AgentId::Player,
                waypoints: vec![PixelPoint::new(64, 32), PixelPoint::new(96, 32)],
            },
            &mut events,
        );

        assert_eq!(
            query::player(&world).current_target,
            Some(PixelPoint::new(64, 32))
        );

        apply(&mut world, Command::Tick, &mut events);
        assert!(!events.contains(&Event::PlanNeeded {
            agent: AgentId::Player
        }));
    }

    #[test]
    fn empty_plans_are_dropped_and_replanning_retries_next_tick() {
        let mut world = open_world(&["XXXXX", "XP  X", "XXXXX"]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetPlan {
                agent: AgentId::Player,
                waypoints: Vec::new(),
            },
            &mut events,
        );
        assert_eq!(query::player(&world).current_target, None);

        apply(&mut world, Command::Tick, &mut events);
        assert!(events.contains(&Event::PlanNeeded {
            agent: AgentId::Player
        }));
    }

    #[test]
    fn out_of_bounds_plans_are_rejected() {
        let mut world = open_world(&["XXXXX", "XP  X", "XXXXX"]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetPlan {
                agent: AgentId::Player,
                waypoints: vec![PixelPoint::new(-32, 32)],
            },
            &mut events,
        );

        assert_eq!(query::player(&world).current_target, None);
    }

    #[test]
    fn reached_waypoints_are_consumed_one_per_tick() {
        let mut world = open_world(&["XXXXX", "XP  X", "XXXXX"]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetPlan {
                agent: AgentId::Player,
                waypoints: vec![PixelPoint::new(32, 32), PixelPoint::new(64, 32)],
            },
            &mut events,
        );

        // The player already sits on the first waypoint; one tick pops it.
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(
            query::player(&world).current_target,
            Some(PixelPoint::new(64, 32))
        );
    }

    #[test]
    fn player_steps_are_single_pixel_moves() {
        let mut world = open_world(&["XXXXX", "XP  X", "XXXXX"]);

        let events = step(&mut world, AgentId::Player, Direction::Right);

        assert_eq!(query::player(&world).position, PixelPoint::new(33, 32));
        assert!(events.contains(&Event::AgentMoved {
            agent: AgentId::Player,
            from: PixelPoint::new(32, 32),
            to: PixelPoint::new(33, 32),
        }));
    }

    #[test]
    fn player_move_into_wall_is_rolled_back() {
        let mut world = open_world(&["XXXXX", "XP  X", "XXXXX"]);

        let events = step(&mut world, AgentId::Player, Direction::Up);

        assert_eq!(query::player(&world).position, PixelPoint::new(32, 32));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::AgentMoved { .. })));
        // The attempted direction is still recorded on a blocked step.
        assert_eq!(query::player(&world).direction, Some(Direction::Up));
    }

    #[test]
    fn blocked_steps_drop_the_route_so_replanning_resumes() {
        let mut world = open_world(&["XXXX", "XPXX", "X  X", "XXXX"]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPlan {
                agent: AgentId::Player,
                waypoints: vec![PixelPoint::new(64, 64)],
            },
            &mut events,
        );
        assert_eq!(
            query::player(&world).current_target,
            Some(PixelPoint::new(64, 64))
        );

        // The waypoint sits diagonally below-right and the horizontal
        // approach is walled off; the step rolls back and the stale route
        // is dropped rather than retried forever.
        let events = step(&mut world, AgentId::Player, Direction::Right);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::AgentMoved { .. })));
        assert_eq!(query::player(&world).position, PixelPoint::new(32, 32));
        assert_eq!(query::player(&world).current_target, None);

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        assert!(events.contains(&Event::PlanNeeded {
            agent: AgentId::Player
        }));
    }

    #[test]
    fn first_step_eats_the_spawn_cell_dot() {
        let mut world = open_world(&["XXXXX", "XP  X", "XXXXX"]);

        let events = step(&mut world, AgentId::Player, Direction::Right);

        assert!(events.contains(&Event::DotEaten {
            cell: CellCoord::new(1, 1)
        }));
    }

    #[test]
    fn crossing_into_a_pellet_cell_starts_power_mode() {
        let mut world = open_world(&["XXXXX", "XP OX", "XXXXX"]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetGhostMode {
                mode: GhostMode::Chase,
            },
            &mut events,
        );

        let mut events = Vec::new();
        for _ in 0..64 {
            events.extend(step(&mut world, AgentId::Player, Direction::Right));
        }

        assert!(events.contains(&Event::PowerPelletEaten {
            cell: CellCoord::new(3, 1)
        }));
        assert!(events.contains(&Event::PowerStarted));
        assert!(events.contains(&Event::GhostModeChanged {
            mode: GhostMode::Patrol
        }));
        assert!(query::power_active(&world));
    }

    #[test]
    fn power_mode_expires_after_the_configured_ticks() {
        let layout = MazeLayout::parse(&["XXXXX", "XP OX", "XXXXX"]).expect("valid layout");
        let mut world = World::new(layout, Config::new(32, 2));

        let mut events = Vec::new();
        for _ in 0..64 {
            events.extend(step(&mut world, AgentId::Player, Direction::Right));
        }
        assert!(query::power_active(&world));

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        assert!(query::power_active(&world));
        apply(&mut world, Command::Tick, &mut events);
        assert!(!query::power_active(&world));
        assert!(events.contains(&Event::PowerEnded));
    }

    #[test]
    fn ghost_contact_without_power_resets_the_player() {
        let mut world = open_world(&["XXXXX", "XPG X", "XXXXX"]);

        let mut events = Vec::new();
        for _ in 0..17 {
            events.extend(step(
                &mut world,
                AgentId::Ghost(GhostId::new(0)),
                Direction::Left,
            ));
        }

        assert!(events.contains(&Event::PlayerCaught));
        assert_eq!(query::player(&world).position, PixelPoint::new(32, 32));
        assert_eq!(query::player(&world).current_target, None);
    }

    #[test]
    fn ghost_contact_with_power_removes_the_ghost() {
        let mut world = open_world(&["XXXXXX", "XPOG X", "XXXXXX"]);

        // Walk into the pellet first, then keep walking into the ghost.
        let mut events = Vec::new();
        for _ in 0..64 {
            events.extend(step(&mut world, AgentId::Player, Direction::Right));
        }

        assert!(events.contains(&Event::PowerStarted));
        assert!(events.contains(&Event::GhostEaten {
            ghost: GhostId::new(0)
        }));
        assert!(query::ghost_view(&world).is_empty());
    }

    #[test]
    fn eating_the_final_dot_clears_the_maze() {
        let mut world = open_world(&["XXX", "XPX", "XXX"]);

        // Every step is rolled back by the surrounding walls, but pellet
        // pickup still runs for the tick.
        let events = step(&mut world, AgentId::Player, Direction::Right);

        assert!(events.contains(&Event::DotEaten {
            cell: CellCoord::new(1, 1)
        }));
        assert!(events.contains(&Event::MazeCleared));
    }

    #[test]
    fn ghost_steps_follow_directions_without_a_guard() {
        let mut world = open_world(&["XXXXX", "XPG X", "XXXXX"]);

        let events = step(&mut world, AgentId::Ghost(GhostId::new(0)), Direction::Right);

        assert!(events.contains(&Event::AgentMoved {
            agent: AgentId::Ghost(GhostId::new(0)),
            from: PixelPoint::new(64, 32),
            to: PixelPoint::new(65, 32),
        }));
    }

    #[test]
    fn ghost_mode_changes_are_announced_once() {
        let mut world = open_world(&["XXXXX", "XP  X", "XXXXX"]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetGhostMode {
                mode: GhostMode::Chase,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetGhostMode {
                mode: GhostMode::Chase,
            },
            &mut events,
        );

        let changes = events
            .iter()
            .filter(|event| matches!(event, Event::GhostModeChanged { .. }))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn pellet_centers_sit_inside_their_cells() {
        let world = open_world(&["XXXXX", "XP OX", "XXXXX"]);
        let pellets = query::pellet_view(&world);

        assert_eq!(pellets.power_pellets(), &[PixelPoint::new(112, 48)]);
        for dot in pellets.dots() {
            assert!(query::grid(&world).is_walkable(dot.to_cell(32)));
        }
    }
}
