use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::Result;
use crate::snake::Direction;

pub trait EventSource {
    /// Waits at most `timeout` for the next event. `Ok(None)` means nothing
    /// relevant arrived in time.
    fn wait(&mut self, timeout: Duration) -> Result<Option<GameEvent>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Quit,
    KeyDown(Key),
    TickDue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Pause,
    Restart,
    Escape,
}

impl GameEvent {
    /// Maps a terminal key press to a game event. Unbound keys give `None`.
    pub fn from_key_event(ev: KeyEvent) -> Option<GameEvent> {
        // Raw mode swallows SIGINT, so Ctrl+C shows up as a key.
        if is_ctrl_c(&ev) {
            return Some(GameEvent::Quit);
        }

        let key = match ev.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Key::Move(Direction::Up),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Key::Move(Direction::Left),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Key::Move(Direction::Down),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Key::Move(Direction::Right),
            KeyCode::Char('p') | KeyCode::Char('P') => Key::Pause,
            KeyCode::Char('r') | KeyCode::Char('R') => Key::Restart,
            KeyCode::Esc => Key::Escape,
            _ => return None,
        };

        Some(GameEvent::KeyDown(key))
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.modifiers.contains(KeyModifiers::CONTROL) && matches!(ev.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
