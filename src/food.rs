use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::error::GameError;
use crate::grid::Grid;
use crate::Cell;

/// Random samples tried per board cell before falling back to a full scan.
const ATTEMPTS_PER_CELL: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    position: Cell,
}

impl Food {
    pub fn new<R: Rng + ?Sized>(
        grid: &Grid,
        occupied: &HashSet<Cell>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let mut food = Food { position: grid.center() };
        food.relocate(grid, occupied, rng)?;
        Ok(food)
    }

    #[cfg(test)]
    /// Food at a fixed cell, for setting up known positions.
    pub fn at(position: Cell) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    /// Moves the food to a random cell outside `occupied`.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        occupied: &HashSet<Cell>,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let max_attempts = grid.total_cells().saturating_mul(ATTEMPTS_PER_CELL);

        for _ in 0..max_attempts {
            let candidate = grid.random_cell(rng);
            if !occupied.contains(&candidate) {
                self.position = candidate;
                return Ok(());
            }
        }

        let free: Vec<Cell> = grid.cells().filter(|cell| !occupied.contains(cell)).collect();
        warn!(free = free.len(), max_attempts, "Random food placement exhausted, scanning the board");

        match free.choose(rng) {
            Some(&cell) => {
                self.position = cell;
                Ok(())
            }
            None => Err(GameError::BoardFull { cells: grid.total_cells() }),
        }
    }
}
