//! Tile grid storage and adjacency queries.
//!
//! The grid stores terrain state plus weak back-references to the unit and
//! structure on each tile. It owns neither; the simulation's arenas do.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::structures::StructureId;
use crate::units::UnitId;

/// Row/column coordinate of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Row index (top to bottom).
    pub row: u32,
    /// Column index (left to right).
    pub col: u32,
}

impl TileCoord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True if the tiles share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }

    /// Offset by a signed step, or `None` if it would leave the first quadrant.
    #[must_use]
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Self { row, col })
    }
}

/// Orthogonal neighbour offsets in a fixed order: left, right, up, down.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Traversability of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileState {
    /// Open ground.
    #[default]
    Empty,
    /// Impassable terrain.
    Blocked,
    /// Open ground highlighted as part of the selected unit's route.
    PathMarker,
}

impl TileState {
    /// Returns true if units may enter the tile.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Blocked)
    }
}

/// One cell of the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Where this tile is.
    pub coord: TileCoord,
    /// Terrain state.
    pub state: TileState,
    /// Unit standing here, if any.
    pub occupant: Option<UnitId>,
    /// Structure bound to this tile, if any.
    pub structure: Option<StructureId>,
}

impl Tile {
    fn new(coord: TileCoord) -> Self {
        Self {
            coord,
            state: TileState::Empty,
            occupant: None,
            structure: None,
        }
    }

    /// Traversable and unoccupied.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.state.is_traversable() && self.occupant.is_none()
    }
}

/// Fixed-size 2D board stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: u32,
    cols: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a board with every tile empty.
    ///
    /// # Panics
    ///
    /// Panics if `rows` or `cols` is zero.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        assert!(rows > 0, "Grid rows must be positive");
        assert!(cols > 0, "Grid cols must be positive");

        let tiles = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Tile::new(TileCoord::new(row, col))))
            .collect();
        Self { rows, cols, tiles }
    }

    /// Create a board whose outermost ring is blocked.
    #[must_use]
    pub fn walled(rows: u32, cols: u32) -> Self {
        let mut grid = Self::new(rows, cols);
        for tile in &mut grid.tiles {
            let c = tile.coord;
            if c.row == 0 || c.col == 0 || c.row == rows - 1 || c.col == cols - 1 {
                tile.state = TileState::Blocked;
            }
        }
        grid
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    fn index(&self, coord: TileCoord) -> usize {
        (coord.row as usize) * (self.cols as usize) + (coord.col as usize)
    }

    /// Check if a coordinate is on the board.
    #[must_use]
    pub fn in_bounds(&self, coord: TileCoord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Tile at a coordinate, or `None` if out of bounds.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        if self.in_bounds(coord) {
            Some(&self.tiles[self.index(coord)])
        } else {
            None
        }
    }

    /// Mutable tile at a coordinate, or `None` if out of bounds.
    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        if self.in_bounds(coord) {
            let index = self.index(coord);
            Some(&mut self.tiles[index])
        } else {
            None
        }
    }

    /// Tile at a coordinate, as an error if out of bounds.
    pub fn require(&self, coord: TileCoord) -> Result<&Tile> {
        self.tile(coord).ok_or(GameError::OutOfBounds(coord))
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Set the terrain state of a tile. Returns `false` if out of bounds.
    pub fn set_state(&mut self, coord: TileCoord, state: TileState) -> bool {
        match self.tile_mut(coord) {
            Some(tile) => {
                tile.state = state;
                true
            }
            None => false,
        }
    }

    /// Check if a tile can be entered, ignoring occupancy.
    #[must_use]
    pub fn is_traversable(&self, coord: TileCoord) -> bool {
        self.tile(coord).is_some_and(|t| t.state.is_traversable())
    }

    /// Unit on a tile, if any.
    #[must_use]
    pub fn occupant(&self, coord: TileCoord) -> Option<UnitId> {
        self.tile(coord).and_then(|t| t.occupant)
    }

    /// Structure on a tile, if any.
    #[must_use]
    pub fn structure_at(&self, coord: TileCoord) -> Option<StructureId> {
        self.tile(coord).and_then(|t| t.structure)
    }

    /// In-bounds orthogonal neighbours in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors4(&self, coord: TileCoord) -> impl Iterator<Item = TileCoord> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(dr, dc)| coord.offset(dr, dc))
            .filter(move |c| self.in_bounds(*c))
    }

    /// Record a unit on a tile.
    pub(crate) fn set_occupant(&mut self, coord: TileCoord, unit: Option<UnitId>) {
        if let Some(tile) = self.tile_mut(coord) {
            tile.occupant = unit;
        }
    }

    /// Bind a structure to a tile.
    pub(crate) fn set_structure(&mut self, coord: TileCoord, structure: Option<StructureId>) {
        if let Some(tile) = self.tile_mut(coord) {
            tile.structure = structure;
        }
    }

    /// Reset every path marker back to empty ground.
    pub fn clear_path_markers(&mut self) {
        for tile in &mut self.tiles {
            if tile.state == TileState::PathMarker {
                tile.state = TileState::Empty;
            }
        }
    }

    /// Mark the given route. Blocked tiles are left alone.
    pub fn mark_path<'a>(&mut self, path: impl IntoIterator<Item = &'a TileCoord>) {
        for &coord in path {
            if let Some(tile) = self.tile_mut(coord) {
                if tile.state == TileState::Empty {
                    tile.state = TileState::PathMarker;
                }
            }
        }
    }
}
