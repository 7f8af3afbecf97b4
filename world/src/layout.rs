//! ASCII maze layouts and their conversion into session data.
//!
//! A layout is a rectangular block of symbol rows: `X` marks a wall, a space
//! an open corridor, `O` a power pellet, `G` a ghost spawn, and `P` the
//! player spawn. Every walkable cell carries a dot, including pellet and
//! spawn cells.

use maze_chase_core::{CellCoord, WalkabilityGrid};
use thiserror::Error;

/// Symbol rows for the classic 28-column maze shipped with the game.
pub const CLASSIC_ROWS: [&str; 17] = [
    "XXXXXXXXXXXXXXXXXXXXXXXXXXXX",
    "XP     O     XX     O      X",
    "X XXXX XXXXX XX XXXXX XXXX X",
    "X XXXX XXXXX XX XXXXX XXXX X",
    "X XXXX XXXXX XX XXXXX XXXX X",
    "X                      O   X",
    "X XXXX XX XXXXXXXX XX XXXX X",
    "X XXXX XX XXXXXXXX XX XXXX X",
    "X      XXO   XX    XX      X",
    "XXXXXX XXXXX XX XXXXX XXXXXX",
    "XXXXXX XXXXX XX XXXXX XXXXXX",
    "XXXXXX XX          XX XXXXXX",
    "XXXXXX XX XXX  XXX XX XXXXXX",
    "XXXXXX XX X   G  X XX XXXXXX",
    "X         X G    X         X",
    "XXXXXX XX X   G  X XX XXXXXX",
    "XXXXXXXXXXXXXXXXXXXXXXXXXXXX",
];

/// Reasons an ASCII layout cannot be converted into session data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contains no rows or no columns.
    #[error("layout must contain at least one row and one column")]
    Empty,
    /// A row differs in length from the first row.
    #[error("row {row} spans {found} columns, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Column count established by the first row.
        expected: usize,
        /// Column count found in the offending row.
        found: usize,
    },
    /// The layout contains a symbol outside the supported alphabet.
    #[error("unsupported symbol {symbol:?} at column {column}, row {row}")]
    UnknownSymbol {
        /// Offending symbol.
        symbol: char,
        /// Zero-based column of the symbol.
        column: usize,
        /// Zero-based row of the symbol.
        row: usize,
    },
}

/// Parsed maze layout: walkability plus the initial session placements.
#[derive(Clone, Debug)]
pub struct MazeLayout {
    grid: WalkabilityGrid,
    dot_cells: Vec<CellCoord>,
    power_cells: Vec<CellCoord>,
    ghost_spawns: Vec<CellCoord>,
    player_spawn: CellCoord,
}

impl MazeLayout {
    /// Parses symbol rows into a layout.
    pub fn parse(rows: &[&str]) -> Result<Self, LayoutError> {
        let first = rows.first().ok_or(LayoutError::Empty)?;
        let columns = first.chars().count();
        if columns == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(columns * rows.len());
        let mut dot_cells = Vec::new();
        let mut power_cells = Vec::new();
        let mut ghost_spawns = Vec::new();
        let mut player_spawn = None;

        for (row_index, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != columns {
                return Err(LayoutError::Ragged {
                    row: row_index,
                    expected: columns,
                    found,
                });
            }

            for (column_index, symbol) in row.chars().enumerate() {
                let cell = CellCoord::new(column_index as u32, row_index as u32);
                match symbol {
                    'X' => {
                        cells.push(false);
                        continue;
                    }
                    ' ' => {}
                    'O' => power_cells.push(cell),
                    'G' => ghost_spawns.push(cell),
                    'P' => {
                        if player_spawn.is_none() {
                            player_spawn = Some(cell);
                        }
                    }
                    other => {
                        return Err(LayoutError::UnknownSymbol {
                            symbol: other,
                            column: column_index,
                            row: row_index,
                        })
                    }
                }
                cells.push(true);
                dot_cells.push(cell);
            }
        }

        let grid = WalkabilityGrid::from_row_major(columns as u32, rows.len() as u32, cells)
            .ok_or(LayoutError::Empty)?;

        Ok(Self {
            grid,
            dot_cells,
            power_cells,
            ghost_spawns,
            // Layouts without an explicit spawn place the player one cell
            // inside the outer wall.
            player_spawn: player_spawn.unwrap_or(CellCoord::new(1, 1)),
        })
    }

    /// Parses the classic maze shipped with the game.
    ///
    /// The classic rows are known-good, so this cannot fail.
    #[must_use]
    pub fn classic() -> Self {
        Self::parse(&CLASSIC_ROWS).expect("classic layout is well-formed")
    }

    /// Walkability matrix derived from the symbol rows.
    #[must_use]
    pub fn grid(&self) -> &WalkabilityGrid {
        &self.grid
    }

    /// Cells seeded with a dot, in row-major order.
    #[must_use]
    pub fn dot_cells(&self) -> &[CellCoord] {
        &self.dot_cells
    }

    /// Cells seeded with a power pellet.
    #[must_use]
    pub fn power_cells(&self) -> &[CellCoord] {
        &self.power_cells
    }

    /// Cells where ghosts start the session.
    #[must_use]
    pub fn ghost_spawns(&self) -> &[CellCoord] {
        &self.ghost_spawns
    }

    /// Cell where the player starts the session.
    #[must_use]
    pub fn player_spawn(&self) -> CellCoord {
        self.player_spawn
    }
}
