#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects the adapter, the
//! authoritative world, and the pure systems. The adapter submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! to react to deterministically. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position expressed in pixel space, anchored at an agent's upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PixelPoint {
    x: i32,
    y: i32,
}

impl PixelPoint {
    /// Creates a new pixel-space point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate, increasing to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel coordinate, increasing downward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Translates the point into the grid cell that contains it.
    ///
    /// Truncating integer division per axis; no bounds checking is performed
    /// against any particular grid. Negative coordinates clamp to the first
    /// cell because grid indices are unsigned.
    #[must_use]
    pub fn to_cell(self, cell_size: i32) -> CellCoord {
        debug_assert!(cell_size > 0, "cell size must be positive");
        let column = (self.x / cell_size).max(0);
        let row = (self.y / cell_size).max(0);
        CellCoord::new(column as u32, row as u32)
    }

    /// Returns the point shifted by one unit step in the provided direction.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// True Euclidean distance to another point, in pixel units.
    #[must_use]
    pub fn distance_to(self, other: PixelPoint) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Clamps both coordinates into the inclusive `[0, max]` range per axis.
    #[must_use]
    pub fn clamped(self, max_x: i32, max_y: i32) -> Self {
        Self::new(self.x.clamp(0, max_x), self.y.clamp(0, max_y))
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Translates the cell back into the pixel position of its upper-left
    /// corner. Inverse of [`PixelPoint::to_cell`] for in-grid coordinates.
    #[must_use]
    pub fn to_pixel(self, cell_size: i32) -> PixelPoint {
        PixelPoint::new(self.column as i32 * cell_size, self.row as i32 * cell_size)
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Reports whether two cells differ by exactly one unit on exactly one
    /// axis.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Cardinal movement directions available to agents.
///
/// There is no idle variant; "not moving" is `Option::<Direction>::None`
/// wherever a direction may be absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing pixel rows.
    Up,
    /// Movement toward increasing pixel rows.
    Down,
    /// Movement toward decreasing pixel columns.
    Left,
    /// Movement toward increasing pixel columns.
    Right,
}

impl Direction {
    /// Unit pixel offset `(dx, dy)` applied by one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Unique identifier assigned to a ghost.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
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

/// Identifies any mobile agent inhabiting the maze.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AgentId {
    /// The single player-controlled agent.
    Player,
    /// One of the adversarial ghosts.
    Ghost(GhostId),
}

/// Behaviour mode shared by every ghost, owned by the world and injected
/// into the target-selection policy as explicit read-only state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostMode {
    /// Ghosts path directly toward the player's current cell.
    Chase,
    /// Ghosts wander toward uniformly random reachable cells.
    Patrol,
}

/// Immutable boolean walkability matrix describing the maze.
///
/// Row-major storage, `true` marks a traversable cell. Constructed once per
/// session and shared read-only by every planner invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkabilityGrid {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl WalkabilityGrid {
    /// Builds a grid from row-major cell data.
    ///
    /// Returns `None` when the cell count does not match the dimensions.
    #[must_use]
    pub fn from_row_major(columns: u32, rows: u32, cells: Vec<bool>) -> Option<Self> {
        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).ok()?;
        if cells.len() != expected {
            return None;
        }
        Some(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies within the grid extents.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell is traversable. Out-of-bounds cells are not.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.cells.get(index).copied().unwrap_or(false))
    }

    /// Enumerates every walkable cell in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, walkable)| **walkable)
            .map(move |(index, _)| {
                let index = index as u32;
                CellCoord::new(index % columns, index / columns)
            })
    }

    /// Reports whether a square region of `extent` pixels anchored at
    /// `origin` overlaps only walkable cells.
    ///
    /// A region the size of one cell can straddle up to four cells while an
    /// agent travels between waypoints; every overlapped cell must be open.
    #[must_use]
    pub fn is_region_walkable(&self, origin: PixelPoint, extent: i32, cell_size: i32) -> bool {
        if extent <= 0 || cell_size <= 0 {
            return false;
        }
        if origin.x() < 0 || origin.y() < 0 {
            return false;
        }

        let corners = [
            origin,
            PixelPoint::new(origin.x() + extent - 1, origin.y()),
            PixelPoint::new(origin.x(), origin.y() + extent - 1),
            PixelPoint::new(origin.x() + extent - 1, origin.y() + extent - 1),
        ];

        corners.into_iter().all(|corner| {
            let cell = corner.to_cell(cell_size);
            self.contains(cell) && self.is_walkable(cell)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by one discrete game tick.
    Tick,
    /// Replaces an agent's waypoint queue with a freshly planned route.
    SetPlan {
        /// Agent receiving the plan.
        agent: AgentId,
        /// Pixel-space waypoints in travel order.
        waypoints: Vec<PixelPoint>,
    },
    /// Requests that an agent advance a single unit step in a direction.
    StepAgent {
        /// Agent attempting to move.
        agent: AgentId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Switches the shared ghost behaviour mode.
    SetGhostMode {
        /// Mode the ghosts should adopt.
        mode: GhostMode,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced,
    /// Signals that an agent has no active plan and awaits a new one.
    PlanNeeded {
        /// Agent that requires a fresh route.
        agent: AgentId,
    },
    /// Confirms that an agent moved between two pixel positions.
    AgentMoved {
        /// Agent that moved.
        agent: AgentId,
        /// Position occupied before the step.
        from: PixelPoint,
        /// Position occupied after the step.
        to: PixelPoint,
    },
    /// Confirms that the player consumed the dot occupying a cell.
    DotEaten {
        /// Cell the dot occupied.
        cell: CellCoord,
    },
    /// Confirms that the player consumed a power pellet.
    PowerPelletEaten {
        /// Cell the pellet occupied.
        cell: CellCoord,
    },
    /// Announces that the power mode became active.
    PowerStarted,
    /// Announces that the power mode timed out.
    PowerEnded,
    /// Confirms that the player removed a vulnerable ghost on contact.
    GhostEaten {
        /// Ghost that was removed from the maze.
        ghost: GhostId,
    },
    /// Reports that a ghost caught the player without power active.
    PlayerCaught,
    /// Announces that the shared ghost mode changed.
    GhostModeChanged {
        /// Mode that became active.
        mode: GhostMode,
    },
    /// Reports that the last dot was eaten and the maze is cleared.
    MazeCleared,
}

/// Failure raised by the route planner.
///
/// Recoverable by construction: the consumer idles for the tick and retries
/// target selection on the next opportunity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// Start and goal are disconnected or the goal is unreachable.
    #[error("no path from ({}, {}) to ({}, {})", from.column(), from.row(), to.column(), to.row())]
    NotFound {
        /// Cell the search started from.
        from: CellCoord,
        /// Cell the search tried to reach.
        to: CellCoord,
    },
}
