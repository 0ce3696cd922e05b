use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};
use tracing::error;

use crate::error::GameError;
use crate::game::{EventSource, Screen, BOARD_BACKGROUND_COLOR, BORDER_COLOR};
use crate::grid::Grid;
use crate::Cell;

/// Terminal rows above the board's top border.
const STATUS_ROWS: u16 = 1;
/// Terminal columns per board cell, so cells look roughly square.
const CELL_WIDTH: u16 = 2;

const FILLED: &str = "██";
const OUTLINED: &str = "[]";
const ERASED: &str = "  ";

/// A terminal that has to be put back the way it was found.
pub trait TerminalGuard {
    fn setup(&mut self) -> Result<(), GameError>;
    fn restore(&mut self);
}

/// Sets the terminal up, runs `body` and restores the terminal afterwards,
/// including when setup itself fails halfway.
pub fn guarded<G, T, F>(term: &mut G, body: F) -> Result<T, GameError>
where
    G: TerminalGuard,
    F: FnOnce(&mut G) -> Result<T, GameError>,
{
    let result = term.setup().and_then(|_| body(term));
    term.restore();
    result
}

/// Glyph for one board cell. Erasing paints blanks so the terminal's own
/// background shows through.
fn cell_glyph(color: Color, filled: bool) -> &'static str {
    match (filled, color == BOARD_BACKGROUND_COLOR) {
        (true, true) => ERASED,
        (true, false) => FILLED,
        (false, _) => OUTLINED,
    }
}

pub struct TermManager {
    grid: Grid,
    board_size: (u16, u16),
    width: u16,
    height: u16,
    stdout: Stdout,
}

impl TermManager {
    pub fn new(grid: Grid) -> Result<Self, GameError> {
        let (width, height) = terminal::size()?;
        let too_small = |needed| GameError::TerminalTooSmall { needed, actual: (width, height) };

        // A board that does not even fit in u16 terminal coordinates can never be shown
        let board_size = Self::needed_size(&grid).ok_or_else(|| too_small((u16::MAX, u16::MAX)))?;
        if width < board_size.0 || height < board_size.1 {
            return Err(too_small(board_size));
        }

        Ok(TermManager { grid, board_size, width, height, stdout: stdout() })
    }

    /// Terminal (columns, rows) needed for the board, its border and the
    /// status line, or `None` if that exceeds terminal coordinates.
    pub fn needed_size(grid: &Grid) -> Option<(u16, u16)> {
        let cols = grid.cols().checked_mul(CELL_WIDTH)?.checked_add(2)?;
        let rows = grid.rows().checked_add(STATUS_ROWS + 2)?;
        Some((cols, rows))
    }

    pub fn draw_borders(&mut self) -> Result<(), GameError> {
        let (width, height) = self.board_size;
        let top = STATUS_ROWS;
        let bottom = height - 1;
        let end_x = width - 1;

        queue!(self.stdout, SetForegroundColor(BORDER_COLOR))?;

        for x in 0..width {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in top + 1..bottom {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        queue!(self.stdout, ResetColor)?;
        Ok(())
    }

    /// Shows a framed block of text in the middle of the terminal.
    pub fn show_message(&mut self, lines: &[&str]) -> Result<(), GameError> {
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        let blank = " ".repeat(msg_width as usize);
        queue!(self.stdout, ResetColor)?;
        queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1), Print(&blank))?;
        queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1 + msg_height - 1), Print(&blank))?;

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), Print(padded_line))?;
        }

        self.flush()
    }

    fn print_at(&mut self, pos: Cell, ch: char) -> Result<(), GameError> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), Print(ch))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), GameError> {
        self.stdout.flush()?;
        Ok(())
    }

    fn to_screen(&self, cell: Cell) -> Cell {
        (1 + cell.0 * CELL_WIDTH, STATUS_ROWS + 1 + cell.1)
    }
}

impl TerminalGuard for TermManager {
    fn setup(&mut self) -> Result<(), GameError> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    /// Puts the terminal back the way it was. Failures are logged since there
    /// is nothing left to do about them.
    fn restore(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            error!(?err, "failed to disable raw mode");
        }
        if let Err(err) = execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking) {
            error!(?err, "failed to restore cursor");
        }
        if let Err(err) = execute!(self.stdout, LeaveAlternateScreen) {
            error!(?err, "failed to leave alternate screen");
        }
    }
}

impl Screen for TermManager {
    fn clear_board(&mut self) -> Result<(), GameError> {
        queue!(self.stdout, ResetColor, terminal::Clear(ClearType::All))?;
        self.draw_borders()
    }

    fn draw_rect(&mut self, cell: Cell, color: Color, filled: bool) -> Result<(), GameError> {
        let (x, y) = self.to_screen(cell);
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            SetForegroundColor(color),
            Print(cell_glyph(color, filled)),
            ResetColor
        )?;
        Ok(())
    }

    fn render_text(&mut self, x: u16, y: u16, text: &str) -> Result<(), GameError> {
        queue!(self.stdout, ResetColor, cursor::MoveTo(x, y), Print(text))?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), GameError> {
        self.flush()
    }
}

/// Keyboard input read straight from the terminal.
pub struct TermEvents;

impl TermEvents {
    pub fn read_key_blocking(&mut self) -> Result<KeyEvent, GameError> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(ev);
                }
            }
        }
    }
}

impl EventSource for TermEvents {
    fn poll_events(&mut self) -> Result<Vec<KeyEvent>, GameError> {
        let mut events = vec![];

        while poll(Duration::ZERO)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{APPLE_COLOR, SNAKE_COLOR};
    use std::io;

    #[test]
    fn default_board_needs_room_for_border_and_status() {
        assert_eq!(TermManager::needed_size(&Grid::new(32, 24)), Some((66, 27)));
    }

    #[test]
    fn oversized_board_does_not_fit_terminal_coordinates() {
        assert_eq!(TermManager::needed_size(&Grid::new(40000, 20)), None);
        assert_eq!(TermManager::needed_size(&Grid::new(20, u16::MAX - 1)), None);
        assert_eq!(TermManager::needed_size(&Grid::new(32766, 10)), Some((u16::MAX - 1, 13)));
    }

    #[test]
    fn glyphs_for_filled_outlined_and_erased_cells() {
        assert_eq!(cell_glyph(SNAKE_COLOR, true), "██");
        assert_eq!(cell_glyph(APPLE_COLOR, true), "██");
        assert_eq!(cell_glyph(SNAKE_COLOR, false), "[]");
        assert_eq!(cell_glyph(BOARD_BACKGROUND_COLOR, true), "  ");
    }

    #[derive(Default)]
    struct FakeTerminal {
        fail_setup: bool,
        restored: bool,
    }

    impl TerminalGuard for FakeTerminal {
        fn setup(&mut self) -> Result<(), GameError> {
            if self.fail_setup {
                return Err(io::Error::new(io::ErrorKind::Other, "raw mode unsupported").into());
            }
            Ok(())
        }

        fn restore(&mut self) {
            self.restored = true;
        }
    }

    #[test]
    fn restores_after_failed_setup_without_running_body() {
        let mut term = FakeTerminal { fail_setup: true, ..FakeTerminal::default() };
        let mut ran = false;

        let result = guarded(&mut term, |_| {
            ran = true;
            Ok(())
        });
        assert!(matches!(result, Err(GameError::Terminal(_))));
        assert!(!ran);
        assert!(term.restored);
    }

    #[test]
    fn restores_after_body_error() {
        let mut term = FakeTerminal::default();
        let result: Result<(), GameError> =
            guarded(&mut term, |_| Err(GameError::BoardFull { cells: 4 }));
        assert!(matches!(result, Err(GameError::BoardFull { cells: 4 })));
        assert!(term.restored);
    }
}
