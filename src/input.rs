use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    SpeedUp,
    SpeedDown,
    Quit,
}

/// Maps a key press to a game command. Releases, repeats and unbound keys
/// map to nothing.
pub fn translate(ev: &KeyEvent) -> Option<Command> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Turn(Right)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::SpeedUp),
        KeyCode::Char('-') => Some(Command::SpeedDown),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

/// Ticks per second, kept within `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Speed {
    value: u32,
    min: u32,
    max: u32,
}

impl Speed {
    pub fn new(value: u32, min: u32, max: u32) -> Self {
        debug_assert!(min <= max);
        Speed { value: value.clamp(min, max), min, max }
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    pub fn increase(&mut self) {
        self.value = self.value.saturating_add(1).clamp(self.min, self.max);
    }

    pub fn decrease(&mut self) {
        self.value = self.value.saturating_sub(1).clamp(self.min, self.max);
    }
}
