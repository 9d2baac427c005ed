use std::io::{Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, poll, read};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use tracing::debug;

use crate::config::GameConfig;
use crate::error::{Result, SnakeError};
use crate::event::{EventSource, GameEvent};
use crate::render::{self, Glyph, Presenter, Screen, Snapshot, Tone};

/// Owns the terminal: raw mode, the alternate screen, key input and frame
/// output. Frames are diffed against the last one drawn so only changed
/// characters are written. Dropping it after `setup` restores the terminal.
pub struct TermManager {
    config: GameConfig,
    stdout: Stdout,
    width: u16,
    height: u16,
    origin: (u16, u16),
    last_frame: Option<Screen>,
    active: bool,
}

impl TermManager {
    pub fn new(config: GameConfig) -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager::with_size(config, width, height))
    }

    fn with_size(config: GameConfig, width: u16, height: u16) -> Self {
        let mut term = TermManager {
            config,
            stdout: stdout(),
            width,
            height,
            origin: (0, 0),
            last_frame: None,
            active: false,
        };
        term.resize(width, height);
        term
    }

    /// Fails if the terminal cannot hold the whole field.
    pub fn ensure_fits(&self) -> Result<()> {
        let needed = Screen::size_for(&self.config);
        if self.width < needed.0 || self.height < needed.1 {
            return Err(SnakeError::TerminalTooSmall { needed, actual: (self.width, self.height) });
        }
        Ok(())
    }

    pub fn setup(&mut self) -> Result<()> {
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        let (needed_w, needed_h) = Screen::size_for(&self.config);
        self.width = width;
        self.height = height;
        self.origin = (width.saturating_sub(needed_w) / 2, height.saturating_sub(needed_h) / 2);
        self.last_frame = None;
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn draw(&mut self, frame: Screen) -> Result<()> {
        let (left, top) = self.origin;
        let mut color = None;

        for (x, y, glyph) in changed_glyphs(self.last_frame.as_ref(), &frame) {
            let fg = tone_color(glyph.tone);
            if color != Some(fg) {
                queue!(self.stdout, style::SetForegroundColor(fg))?;
                color = Some(fg);
            }
            queue!(self.stdout, cursor::MoveTo(left + x, top + y), style::Print(glyph.ch))?;
        }

        queue!(self.stdout, style::ResetColor)?;
        self.stdout.flush()?;
        self.last_frame = Some(frame);
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Error and panic paths end up here without an explicit restore.
        if let Err(e) = self.restore() {
            debug!(error = %e, "failed to restore terminal");
        }
    }
}

impl EventSource for TermManager {
    fn wait(&mut self, timeout: Duration) -> Result<Option<GameEvent>> {
        if !poll(timeout)? {
            return Ok(None);
        }

        match read()? {
            Event::Key(ev) => Ok(GameEvent::from_key_event(ev)),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.resize(width, height);
                self.clear()?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

impl Presenter for TermManager {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        let frame = render::compose(&self.config, snapshot);
        self.draw(frame)
    }
}

fn changed_glyphs<'a>(prev: Option<&'a Screen>, next: &'a Screen) -> impl Iterator<Item = (u16, u16, Glyph)> + 'a {
    let same_size = prev.map_or(false, |p| p.width() == next.width() && p.height() == next.height());

    (0..next.height())
        .flat_map(move |y| (0..next.width()).map(move |x| (x, y)))
        .filter_map(move |(x, y)| {
            let glyph = next.get(x, y)?;
            match prev {
                Some(p) if same_size && p.get(x, y) == Some(glyph) => None,
                _ => Some((x, y, glyph)),
            }
        })
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Text => Color::White,
        Tone::Hint => Color::Grey,
        Tone::Grid => Color::DarkGrey,
        Tone::Border => Color::Grey,
        Tone::Head => Color::Green,
        Tone::Body => Color::DarkGreen,
        Tone::Food => Color::Red,
        Tone::Alert => Color::Red,
        Tone::Dim => Color::DarkGrey,
    }
}
