#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid path planner shared by every mobile agent.
//!
//! [`find_path`] runs an A* search over the walkability grid and returns the
//! cell sequence from start to goal. [`Planner`] wraps the search with the
//! pixel-space translation agents actually speak, normalizing failure to an
//! empty route.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use maze_chase_core::{CellCoord, PathError, PixelPoint, WalkabilityGrid};

/// Node recorded in the per-call search arena.
///
/// Parent links are indices into the arena, so every node created during one
/// [`find_path`] invocation is dropped with the call; the returned path is
/// copied out as plain cells.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cell: CellCoord,
    parent: Option<usize>,
    g: u32,
    f: u64,
}

/// Heap entry ordered by total cost, then by insertion sequence.
///
/// The sequence number makes the open-set tie-break explicit and
/// deterministic: on equal `f`, the entry inserted first pops first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f: u64,
    sequence: u64,
    node: usize,
}

/// Searches for a route between two cells over the walkability grid.
///
/// Standard A* with a squared-Euclidean heuristic, expanding the four
/// axis-aligned neighbors of each cell. The squared heuristic overestimates
/// true grid distance, so the search leans greedy and the returned path is
/// connected but not guaranteed shortest; that trade is deliberate. The
/// returned sequence starts at `start` and ends at `goal`.
pub fn find_path(
    grid: &WalkabilityGrid,
    start: CellCoord,
    goal: CellCoord,
) -> Result<Vec<CellCoord>, PathError> {
    let mut nodes = Vec::new();
    let mut open = BinaryHeap::new();
    let mut best_open: HashMap<CellCoord, usize> = HashMap::new();
    let mut closed: HashSet<CellCoord> = HashSet::new();
    let mut sequence = 0u64;

    let start_h = squared_euclidean(start, goal);
    nodes.push(SearchNode {
        cell: start,
        parent: None,
        g: 0,
        f: start_h,
    });
    open.push(Reverse(OpenEntry {
        f: start_h,
        sequence,
        node: 0,
    }));
    let _ = best_open.insert(start, 0);

    while let Some(Reverse(entry)) = open.pop() {
        let current = nodes[entry.node];

        // Superseded entries for already-expanded cells pop late and are
        // skipped here instead of being deleted from the heap.
        if !closed.insert(current.cell) {
            continue;
        }

        if current.cell == goal {
            return Ok(reconstruct(&nodes, entry.node));
        }

        for neighbor in neighbors(current.cell) {
            if !grid.is_walkable(neighbor) {
                continue;
            }
            if closed.contains(&neighbor) {
                continue;
            }

            let g = current.g + 1;
            let f = u64::from(g) + squared_euclidean(neighbor, goal);

            if let Some(&existing) = best_open.get(&neighbor) {
                if nodes[existing].f <= f {
                    continue;
                }
            }

            let index = nodes.len();
            nodes.push(SearchNode {
                cell: neighbor,
                parent: Some(entry.node),
                g,
                f,
            });
            let _ = best_open.insert(neighbor, index);
            sequence += 1;
            open.push(Reverse(OpenEntry {
                f,
                sequence,
                node: index,
            }));
        }
    }

    Err(PathError::NotFound {
        from: start,
        to: goal,
    })
}

/// Squared-Euclidean cost estimate between two cells.
///
/// Not admissible for 4-directional unit moves once the separation exceeds a
/// couple of cells; the greedy lean this produces is intended.
fn squared_euclidean(from: CellCoord, to: CellCoord) -> u64 {
    let dc = u64::from(from.column().abs_diff(to.column()));
    let dr = u64::from(from.row().abs_diff(to.row()));
    dc * dc + dr * dr
}

/// Candidate neighbors in fixed expansion order: left, right, up, down.
/// Bounds and walkability are judged by the caller against the grid.
fn neighbors(cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    let column = cell.column();
    let row = cell.row();
    let candidates = [
        column.checked_sub(1).map(|c| CellCoord::new(c, row)),
        column.checked_add(1).map(|c| CellCoord::new(c, row)),
        row.checked_sub(1).map(|r| CellCoord::new(column, r)),
        row.checked_add(1).map(|r| CellCoord::new(column, r)),
    ];
    candidates.into_iter().flatten()
}

fn reconstruct(nodes: &[SearchNode], goal_index: usize) -> Vec<CellCoord> {
    let mut path = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        path.push(nodes[index].cell);
        cursor = nodes[index].parent;
    }
    path.reverse();
    path
}

/// Pixel-space adapter over [`find_path`].
///
/// Owns the cell size used to translate between agent positions and grid
/// cells in both directions.
#[derive(Clone, Copy, Debug)]
pub struct Planner {
    cell_size: i32,
}

impl Planner {
    /// Creates a planner translating with the provided cell size in pixels.
    #[must_use]
    pub const fn new(cell_size: i32) -> Self {
        Self { cell_size }
    }

    /// Pixel length of one grid cell edge.
    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Plans a pixel-space route between two positions.
    ///
    /// Translates both endpoints into grid cells, invokes [`find_path`], and
    /// maps the resulting cells back into pixel waypoints. A failed search is
    /// normalized to an empty route rather than an error; callers treat that
    /// as "no plan available this tick".
    #[must_use]
    pub fn plan(
        &self,
        grid: &WalkabilityGrid,
        from: PixelPoint,
        to: PixelPoint,
    ) -> Vec<PixelPoint> {
        let start = from.to_cell(self.cell_size);
        let goal = to.to_cell(self.cell_size);

        match find_path(grid, start, goal) {
            Ok(cells) => cells
                .into_iter()
                .map(|cell| cell.to_pixel(self.cell_size))
                .collect(),
            Err(error) => {
                log::debug!("planning failed: {error}");
                Vec::new()
            }
        }
    }
}
