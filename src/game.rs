use std::collections::HashSet;
use std::ops::ControlFlow;

use crossterm::event::KeyEvent;
use crossterm::style::Color;
use rand::Rng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::food::Food;
use crate::grid::Grid;
use crate::input::{translate, Command, Speed};
use crate::snake::{MoveResult, Snake};
use crate::Cell;

pub const BOARD_BACKGROUND_COLOR: Color = Color::Reset;
pub const BORDER_COLOR: Color = Color::Rgb { r: 93, g: 216, b: 228 };
pub const APPLE_COLOR: Color = Color::Rgb { r: 255, g: 0, b: 0 };
pub const SNAKE_COLOR: Color = Color::Rgb { r: 0, g: 255, b: 0 };

/// Drawing surface for the board. Cells are board coordinates; text
/// positions are surface coordinates.
pub trait Screen {
    fn clear_board(&mut self) -> Result<(), GameError>;
    fn draw_rect(&mut self, cell: Cell, color: Color, filled: bool) -> Result<(), GameError>;
    fn render_text(&mut self, x: u16, y: u16, text: &str) -> Result<(), GameError>;
    fn present(&mut self) -> Result<(), GameError>;
}

/// Non-blocking source of key events queued since the last call.
pub trait EventSource {
    fn poll_events(&mut self) -> Result<Vec<KeyEvent>, GameError>;
}

pub trait TickClock {
    fn wait_for_tick(&mut self, ticks_per_second: u32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Moved { mov: MoveResult, ate: bool },
    Reset,
}

pub struct Session<R> {
    grid: Grid,
    speed: Speed,
    record_length: usize,
    snake: Snake,
    food: Food,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(config: &GameConfig, mut rng: R) -> Result<Self, GameError> {
        let grid = config.grid;
        let snake = Snake::spawn(&grid, &mut rng);
        let occupied: HashSet<Cell> = snake.body().iter().copied().collect();
        let food = Food::new(&grid, &occupied, &mut rng)?;

        Ok(Session { grid, speed: config.speed, record_length: 1, snake, food, rng })
    }

    #[cfg(test)]
    /// A session over an already placed snake and food. The record starts at
    /// the snake's length.
    pub fn with_entities(grid: Grid, speed: Speed, snake: Snake, food: Food, rng: R) -> Self {
        let record_length = snake.len();
        Session { grid, speed, record_length, snake, food, rng }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn record_length(&self) -> usize {
        self.record_length
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    /// Applies one player command. Quit breaks out of the game loop.
    pub fn apply(&mut self, cmd: Command) -> ControlFlow<()> {
        match cmd {
            Command::Turn(dir) => {
                if !self.snake.set_pending_direction(dir) {
                    debug!(requested = ?dir, current = ?self.snake.direction(), "Dropped reversal request");
                }
            }
            Command::SpeedUp => {
                self.speed.increase();
                debug!(speed = self.speed.get(), "Speed changed");
            }
            Command::SpeedDown => {
                self.speed.decrease();
                debug!(speed = self.speed.get(), "Speed changed");
            }
            Command::Quit => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }

    /// Runs one game update: turn, move, then resolve food and self-collision
    /// against the new head.
    pub fn step(&mut self) -> Result<Tick, GameError> {
        self.snake.apply_pending_direction();
        let mov = self.snake.move_step(&self.grid);

        let ate = mov.new_head == self.food.position();
        if ate {
            self.snake.grow();
            let occupied = self.occupied();
            self.food.relocate(&self.grid, &occupied, &mut self.rng)?;

            if self.snake.len() > self.record_length {
                self.record_length = self.snake.len();
            }
            info!(length = self.snake.len(), record = self.record_length, "Food eaten");
        }

        if self.snake.collides_with_self() {
            let reached = self.snake.len();
            self.snake.reset(self.grid.center(), &mut self.rng);
            let occupied = self.occupied();
            self.food.relocate(&self.grid, &occupied, &mut self.rng)?;

            info!(length = reached, record = self.record_length, "Snake ran into itself, resetting");
            return Ok(Tick::Reset);
        }

        Ok(Tick::Moved { mov, ate })
    }

    // The vacated tail counts as occupied so that erasing it never wipes
    // freshly placed food.
    fn occupied(&self) -> HashSet<Cell> {
        let mut cells: HashSet<Cell> = self.snake.body().iter().copied().collect();
        cells.extend(self.snake.last_tail());
        cells
    }
}

/// Runs the game until a quit command arrives.
pub fn run<R, S, E, C>(
    session: &mut Session<R>,
    screen: &mut S,
    events: &mut E,
    clock: &mut C,
) -> Result<(), GameError>
where
    R: Rng,
    S: Screen,
    E: EventSource,
    C: TickClock,
{
    info!(
        cols = session.grid().cols(),
        rows = session.grid().rows(),
        speed = session.speed().get(),
        "Starting game"
    );
    draw_frame(screen, session, None)?;

    loop {
        clock.wait_for_tick(session.speed().get());

        for ev in events.poll_events()? {
            if let Some(cmd) = translate(&ev) {
                if session.apply(cmd).is_break() {
                    info!(record = session.record_length(), "Quit requested");
                    return Ok(());
                }
            }
        }

        let tick = session.step()?;
        draw_frame(screen, session, Some(tick))?;
    }
}

/// Draws the board after a tick. A missing or reset tick redraws everything,
/// a plain move only touches the cells that changed. Food is never erased by
/// a move, so it is only redrawn when it was relocated.
pub fn draw_frame<R: Rng, S: Screen>(
    screen: &mut S,
    session: &Session<R>,
    tick: Option<Tick>,
) -> Result<(), GameError> {
    let snake = session.snake();

    match tick {
        Some(Tick::Moved { mov, ate }) => {
            if let Some(old_tail) = mov.old_tail {
                screen.draw_rect(old_tail, BOARD_BACKGROUND_COLOR, true)?;
            }
            // Skipped for a one-cell snake, whose old head was just erased as the tail
            if snake.body().get(1) == Some(&mov.old_head) {
                screen.draw_rect(mov.old_head, SNAKE_COLOR, true)?;
            }
            screen.draw_rect(mov.new_head, SNAKE_COLOR, false)?;
            if ate {
                screen.draw_rect(session.food().position(), APPLE_COLOR, true)?;
            }
        }
        None | Some(Tick::Reset) => {
            screen.clear_board()?;
            for &segment in snake.body().iter().skip(1) {
                screen.draw_rect(segment, SNAKE_COLOR, true)?;
            }
            screen.draw_rect(snake.head_position(), SNAKE_COLOR, false)?;
            screen.draw_rect(session.food().position(), APPLE_COLOR, true)?;
        }
    }

    draw_info(screen, session)?;
    screen.present()
}

fn draw_info<R: Rng, S: Screen>(screen: &mut S, session: &Session<R>) -> Result<(), GameError> {
    let status = format!(
        "Speed: {}  Record: {}  Length: {}",
        session.speed().get(),
        session.record_length(),
        session.snake().len()
    );
    screen.render_text(0, 0, &format!("{:<40}", status))
}
