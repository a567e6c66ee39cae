//! World grid - fixed-size 2D space holding at most one occupant per cell
//!
//! The grid is the single source of truth for occupancy: colony managers
//! consult it before placing organisms, and organisms read their neighbor
//! counts from it. All mutation happens on the simulation thread during
//! tick processing, so no locking lives at this level.

use serde::{Deserialize, Serialize};

use crate::core::error::{ColonyError, Result};
use crate::core::types::OrganismId;

/// The number of rows in the world grid
pub const GRID_ROWS: usize = 10;

/// The number of columns in the world grid
pub const GRID_COLUMNS: usize = 7;

/// Offsets of the 8-cell Moore neighborhood, clipped at the grid boundary.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A row/column position within the world grid.
///
/// Bounds are validated at construction, so any `GridPosition` in hand is
/// known to address a real cell; grid lookups never range-check again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    row: usize,
    column: usize,
}

impl GridPosition {
    pub fn new(row: usize, column: usize) -> Result<Self> {
        if row >= GRID_ROWS || column >= GRID_COLUMNS {
            return Err(ColonyError::OutOfBounds { row, column });
        }
        Ok(Self { row, column })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// The position offset by (`dr`, `dc`) rows/columns, or `None` when it
    /// would fall off the grid.
    pub fn offset(&self, dr: i32, dc: i32) -> Option<GridPosition> {
        let row = self.row as i32 + dr;
        let column = self.column as i32 + dc;
        if row < 0 || column < 0 {
            return None;
        }
        GridPosition::new(row as usize, column as usize).ok()
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Ambient heat at a grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatLevel {
    Cold,
    #[default]
    Temperate,
    Hot,
}

/// Environmental attributes of a single grid cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CellAttributes {
    pub heat_level: HeatLevel,
    pub neighbor_count: u32,
}

/// Dense row-major grid of occupants plus per-cell attributes.
///
/// Cells hold organism ids, not organisms; the owning colony manager keeps
/// the entities themselves. Neighbor counts are maintained incrementally on
/// every occupancy change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGrid {
    occupants: Vec<Option<OrganismId>>,
    attributes: Vec<CellAttributes>,
}

impl WorldGrid {
    pub fn new() -> Self {
        Self {
            occupants: vec![None; GRID_ROWS * GRID_COLUMNS],
            attributes: vec![CellAttributes::default(); GRID_ROWS * GRID_COLUMNS],
        }
    }

    #[inline]
    fn index(position: GridPosition) -> usize {
        position.row() * GRID_COLUMNS + position.column()
    }

    pub fn occupant(&self, position: GridPosition) -> Option<OrganismId> {
        self.occupants[Self::index(position)]
    }

    pub fn is_empty(&self, position: GridPosition) -> bool {
        self.occupants[Self::index(position)].is_none()
    }

    /// Places or clears the occupant of a cell, updating the neighbor
    /// counts of all adjacent cells when the cell flips between empty and
    /// occupied.
    pub fn set_occupant(&mut self, position: GridPosition, occupant: Option<OrganismId>) {
        let idx = Self::index(position);
        let was_occupied = self.occupants[idx].is_some();
        self.occupants[idx] = occupant;

        let now_occupied = occupant.is_some();
        if was_occupied == now_occupied {
            return;
        }
        for (dr, dc) in NEIGHBOR_OFFSETS {
            if let Some(neighbor) = position.offset(dr, dc) {
                let attrs = &mut self.attributes[Self::index(neighbor)];
                if now_occupied {
                    attrs.neighbor_count += 1;
                } else {
                    attrs.neighbor_count = attrs.neighbor_count.saturating_sub(1);
                }
            }
        }
    }

    pub fn attributes(&self, position: GridPosition) -> &CellAttributes {
        &self.attributes[Self::index(position)]
    }

    pub fn set_heat_level(&mut self, position: GridPosition, heat_level: HeatLevel) {
        self.attributes[Self::index(position)].heat_level = heat_level;
    }

    /// Count of occupied cells in the Moore neighborhood of `position`.
    pub fn neighbor_count(&self, position: GridPosition) -> u32 {
        self.attributes[Self::index(position)].neighbor_count
    }

    /// Total number of occupied cells.
    pub fn population(&self) -> usize {
        self.occupants.iter().filter(|o| o.is_some()).count()
    }

    /// Iterator over all occupied positions, row-major order.
    pub fn occupied_positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.occupants.iter().enumerate().filter_map(|(i, occupant)| {
            occupant.map(|_| GridPosition {
                row: i / GRID_COLUMNS,
                column: i % GRID_COLUMNS,
            })
        })
    }
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self::new()
    }
}
