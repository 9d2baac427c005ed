//! Drawing contract between the game loop and whatever puts pixels (or
//! characters) on screen.
//!
//! The loop hands a [`Snapshot`] to a [`Presenter`] once per frame. The
//! terminal presenter composes the whole frame into a [`Screen`] first, so
//! the layout can be checked without a terminal.

use crate::config::GameConfig;
use crate::error::Result;
use crate::game::{EndReason, Phase};
use crate::snake::{Cell, Snake};

pub const CONTROLS_HINT: &str = "P: Pause  R: Restart  ESC: Quit";

const CELL_COLUMNS: u16 = 2; // keeps cells roughly square
const HUD_ROWS: u16 = 1;

const HEAD_GLYPHS: [char; 2] = ['█', '█'];
const BODY_GLYPHS: [char; 2] = ['▓', '▓'];
const FOOD_GLYPHS: [char; 2] = ['(', ')'];
const EMPTY_GLYPHS: [char; 2] = ['·', ' '];

#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: Cell,
    pub score: u32,
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
}

/// Anything that can show a snapshot. Called every frame, whether or not a
/// tick happened since the last one.
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Text,
    Hint,
    Grid,
    Border,
    Head,
    Body,
    Food,
    Alert,
    Dim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub tone: Tone,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph { ch: ' ', tone: Tone::Text };

    pub const fn new(ch: char, tone: Tone) -> Self {
        Glyph { ch, tone }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl Screen {
    pub fn new(width: u16, height: u16) -> Self {
        Screen { width, height, glyphs: vec![Glyph::BLANK; width as usize * height as usize] }
    }

    pub fn size_for(config: &GameConfig) -> (u16, u16) {
        let width = config.grid_width.max(0) as u16 * CELL_COLUMNS + 2;
        let height = HUD_ROWS + config.grid_height.max(0) as u16 + 2;
        (width, height)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.glyphs[self.index(x, y)])
    }

    pub fn put(&mut self, x: u16, y: u16, glyph: Glyph) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.glyphs[i] = glyph;
        }
    }

    pub fn print(&mut self, x: u16, y: u16, text: &str, tone: Tone) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x.saturating_add(i as u16), y, Glyph::new(ch, tone));
        }
    }

    pub fn row_text(&self, y: u16) -> String {
        (0..self.width).filter_map(|x| self.get(x, y)).map(|g| g.ch).collect()
    }

    fn index(&self, x: u16, y: u16) -> usize {
        self.width as usize * y as usize + x as usize
    }

    fn dim(&mut self) {
        for glyph in self.glyphs.iter_mut() {
            glyph.tone = Tone::Dim;
        }
    }

    /// Centred box with one padding row above and below, like a dialog.
    fn message_box(&mut self, lines: &[(&str, Tone)]) {
        let box_width = lines.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0) as u16 + 2;
        let box_height = lines.len() as u16 + 2;
        let left = (self.width / 2).saturating_sub(box_width / 2);
        let top = (self.height / 2).saturating_sub(box_height / 2);

        for y in top..top + box_height {
            for x in left..left + box_width {
                self.put(x, y, Glyph::BLANK);
            }
        }

        for (i, (line, tone)) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = box_width as usize);
            self.print(left, top + 1 + i as u16, &padded, *tone);
        }
    }
}

/// Lays out one frame: HUD, bordered grid, snake, food and any overlay.
pub fn compose(config: &GameConfig, snapshot: &Snapshot<'_>) -> Screen {
    let (width, height) = Screen::size_for(config);
    let mut screen = Screen::new(width, height);

    let score = format!("Score: {}", snapshot.score);
    screen.print(0, 0, &score, Tone::Text);
    let hint_len = CONTROLS_HINT.chars().count() as u16;
    if width > hint_len + score.len() as u16 + 1 {
        screen.print(width - hint_len, 0, CONTROLS_HINT, Tone::Hint);
    }

    draw_borders(&mut screen);

    for y in 0..config.grid_height {
        for x in 0..config.grid_width {
            draw_cell(&mut screen, Cell::new(x, y), EMPTY_GLYPHS, Tone::Grid);
        }
    }

    draw_cell(&mut screen, snapshot.food, FOOD_GLYPHS, Tone::Food);
    for (i, cell) in snapshot.snake.cells().enumerate() {
        if i == 0 {
            draw_cell(&mut screen, cell, HEAD_GLYPHS, Tone::Head);
        } else {
            draw_cell(&mut screen, cell, BODY_GLYPHS, Tone::Body);
        }
    }

    match snapshot.phase {
        Phase::Running => {}
        Phase::Paused => {
            screen.message_box(&[("Paused", Tone::Text), ("Press P to resume", Tone::Hint)]);
        }
        Phase::GameOver => {
            let title = match snapshot.end_reason {
                Some(EndReason::BoardFilled) => "You won!",
                _ => "Game Over",
            };
            let final_score = format!("Final Score: {}", snapshot.score);

            screen.dim();
            screen.message_box(&[
                (title, Tone::Alert),
                (&final_score, Tone::Text),
                ("", Tone::Text),
                ("Press R to restart or ESC to quit", Tone::Hint),
            ]);
        }
    }

    screen
}

fn draw_borders(screen: &mut Screen) {
    let (width, height) = (screen.width(), screen.height());
    if width < 2 || height < HUD_ROWS + 2 {
        return;
    }

    let (top, bottom) = (HUD_ROWS, height - 1);
    for x in 0..width {
        let ch = if x == 0 || x == width - 1 { '+' } else { '-' };
        screen.put(x, top, Glyph::new(ch, Tone::Border));
        screen.put(x, bottom, Glyph::new(ch, Tone::Border));
    }

    for y in top + 1..bottom {
        screen.put(0, y, Glyph::new('|', Tone::Border));
        screen.put(width - 1, y, Glyph::new('|', Tone::Border));
    }
}

fn draw_cell(screen: &mut Screen, cell: Cell, glyphs: [char; 2], tone: Tone) {
    if cell.x < 0 || cell.y < 0 {
        return;
    }

    let x = 1 + cell.x as u16 * CELL_COLUMNS;
    let y = HUD_ROWS + 1 + cell.y as u16;
    for (i, ch) in glyphs.iter().enumerate() {
        screen.put(x + i as u16, y, Glyph::new(*ch, tone));
    }
}
