use std::collections::{HashSet, VecDeque};

use Direction::*;

/// A grid position. Coordinates are signed so a head stepping off the
/// field can be represented before it is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
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

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Snake body, head first. The deque keeps traversal order and the set
/// answers occupancy queries; both always hold the same cells.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    occupied: HashSet<Cell>,
}

impl Snake {
    pub fn new(head: Cell, size: usize, direction: Direction) -> Self {
        let diff = direction.delta();

        let cells = (0..size.max(1) as i32)
            .map(|i| Cell::new(head.x - diff.0 * i, head.y - diff.1 * i));
        Snake::from_cells(cells)
    }

    /// Builds a snake from explicit cells, head first. Panics on an empty or
    /// self-overlapping layout.
    pub fn from_cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut body = VecDeque::new();
        let mut occupied = HashSet::new();

        for cell in cells.into_iter().map(Into::into) {
            assert!(occupied.insert(cell), "snake overlaps itself at {:?}", cell);
            body.push_back(cell);
        }

        assert!(!body.is_empty(), "a snake needs at least one cell");
        Snake { body, occupied }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    pub(crate) fn push_head(&mut self, cell: Cell) {
        debug_assert!(!self.occupied.contains(&cell));
        self.occupied.insert(cell);
        self.body.push_front(cell);
    }

    pub(crate) fn pop_tail(&mut self) -> Option<Cell> {
        if self.body.len() <= 1 {
            return None;
        }

        let tail = self.body.pop_back()?;
        self.occupied.remove(&tail);
        Some(tail)
    }
}

impl PartialEq for Snake {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
    }
}

impl Eq for Snake {}
