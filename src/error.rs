use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no free cell left for food on a board of {cells} cells")]
    BoardFull { cells: usize },
    #[error("invalid board {width}x{height} with cell size {cell_size}: {reason}")]
    InvalidBoard {
        width: u32,
        height: u32,
        cell_size: u32,
        reason: &'static str,
    },
    #[error("invalid speed settings (initial {initial}, min {min}, max {max}): {reason}")]
    InvalidSpeed {
        initial: u32,
        min: u32,
        max: u32,
        reason: &'static str,
    },
    #[error("terminal is {actual:?} but the board needs at least {needed:?} (columns, rows)")]
    TerminalTooSmall { needed: (u16, u16), actual: (u16, u16) },
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
