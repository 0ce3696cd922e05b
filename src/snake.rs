use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::Grid;
use crate::Cell;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        *Self::ALL.choose(rng).unwrap_or(&Right)
    }
}

/// What a single step changed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub new_head: Cell,
    pub old_head: Cell,
    pub old_tail: Option<Cell>,
}

#[derive(Clone, Debug)]
pub struct Snake {
    // Head first, tail last
    body: VecDeque<Cell>,
    length: usize,
    direction: Direction,
    pending_direction: Option<Direction>,
    last_tail: Option<Cell>,
}

impl Snake {
    pub fn new(pos: Cell, direction: Direction) -> Self {
        Snake::from_body(vec![pos], direction)
    }

    /// Builds a snake from an explicit body, head first. The target length is
    /// the body length.
    pub fn from_body(body: Vec<Cell>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "snake body cannot be empty");
        let length = body.len();
        Snake {
            body: body.into(),
            length,
            direction,
            pending_direction: None,
            last_tail: None,
        }
    }

    /// A fresh single-cell snake in the middle of the board.
    pub fn spawn<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Self {
        Snake::new(grid.center(), Direction::random(rng))
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[cfg(test)]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn last_tail(&self) -> Option<Cell> {
        self.last_tail
    }

    pub fn head_position(&self) -> Cell {
        self.body[0]
    }

    /// Queues a turn for the next step. A request to reverse onto the current
    /// direction is dropped; returns whether the request was kept.
    pub fn set_pending_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        self.pending_direction = Some(new_direction);
        true
    }

    pub fn apply_pending_direction(&mut self) {
        if let Some(dir) = self.pending_direction.take() {
            self.direction = dir;
        }
    }

    /// Advances the head one cell. The tail is only dropped once the body is
    /// longer than the target length, which is how growth happens.
    pub fn move_step(&mut self, grid: &Grid) -> MoveResult {
        let old_head = self.head_position();
        let new_head = grid.wrap(old_head, self.direction.delta());

        self.body.push_front(new_head);

        self.last_tail = if self.body.len() > self.length {
            self.body.pop_back()
        } else {
            None
        };

        MoveResult { new_head, old_head, old_tail: self.last_tail }
    }

    pub fn collides_with_self(&self) -> bool {
        let head = self.head_position();
        self.body.iter().skip(1).any(|&segment| segment == head)
    }

    pub fn grow(&mut self) {
        self.length += 1;
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, center: Cell, rng: &mut R) {
        self.length = 1;
        self.body.clear();
        self.body.push_back(center);
        self.direction = Direction::random(rng);
        self.pending_direction = None;
        self.last_tail = None;
    }
}
