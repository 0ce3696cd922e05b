use rand::Rng;

use crate::error::GameError;
use crate::Cell;

/// Board dimensions in cells. Coordinates wrap around on both axes, so the
/// board behaves like a torus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    cols: u16,
    rows: u16,
}

impl Grid {
    pub fn new(cols: u16, rows: u16) -> Self {
        assert!(cols > 0 && rows > 0, "grid needs at least one cell");
        Grid { cols, rows }
    }

    /// Builds a grid from a pixel extent and a square cell size. Both extents
    /// must be exact multiples of the cell size.
    pub fn from_pixels(width: u32, height: u32, cell_size: u32) -> Result<Self, GameError> {
        let invalid = |reason| GameError::InvalidBoard { width, height, cell_size, reason };

        if cell_size == 0 {
            return Err(invalid("cell size must be positive"));
        }
        if width == 0 || height == 0 {
            return Err(invalid("board dimensions must be positive"));
        }
        if width % cell_size != 0 || height % cell_size != 0 {
            return Err(invalid("board dimensions must be multiples of the cell size"));
        }

        let cols = u16::try_from(width / cell_size).map_err(|_| invalid("too many columns"))?;
        let rows = u16::try_from(height / cell_size).map_err(|_| invalid("too many rows"))?;
        Ok(Grid { cols, rows })
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn total_cells(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn center(&self) -> Cell {
        (self.cols / 2, self.rows / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.cols && cell.1 < self.rows
    }

    /// Offsets `cell` by `delta`, re-entering from the opposite edge when the
    /// result falls off the board.
    pub fn wrap(&self, cell: Cell, delta: (i16, i16)) -> Cell {
        let x = (cell.0 as i32 + delta.0 as i32).rem_euclid(self.cols as i32);
        let y = (cell.1 as i32 + delta.1 as i32).rem_euclid(self.rows as i32);
        let wrapped = (x as u16, y as u16);
        debug_assert!(self.contains(wrapped));
        wrapped
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        (rng.gen_range(0..self.cols), rng.gen_range(0..self.rows))
    }

    /// Every cell on the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| (x, y)))
    }
}
