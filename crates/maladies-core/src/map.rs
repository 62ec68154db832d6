//! Colony map grid and cell arithmetic.

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

/// A single map position. Coordinates may go negative during arithmetic;
/// [`MapGrid::clamp`] pulls them back onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, the move metric on a square grid with diagonals.
    #[must_use]
    pub fn distance_to(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

/// Rectangular grid of walkable flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGrid {
    width: u32,
    height: u32,
    walkable: Vec<bool>,
}

impl MapGrid {
    /// Fully walkable grid. Dimensions are raised to at least one cell.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            walkable: vec![true; (width as usize) * (height as usize)],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Nearest on-grid cell.
    #[must_use]
    pub fn clamp(&self, cell: Cell) -> Cell {
        Cell {
            x: cell.x.clamp(0, self.width as i32 - 1),
            y: cell.y.clamp(0, self.height as i32 - 1),
        }
    }

    /// Whether `cell` is on the grid and walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.walkable[self.index(cell)]
    }

    /// Mark a cell walkable or blocked. Returns false off-grid.
    pub fn set_walkable(&mut self, cell: Cell, walkable: bool) -> bool {
        if !self.in_bounds(cell) {
            return false;
        }
        let index = self.index(cell);
        self.walkable[index] = walkable;
        true
    }

    /// Uniformly random on-grid cell.
    #[must_use]
    pub fn random_cell(&self, rng: &mut SmallRng) -> Cell {
        Cell {
            x: rng.random_range(0..self.width as i32),
            y: rng.random_range(0..self.height as i32),
        }
    }

    /// Search outward from `origin` for a walkable cell that also satisfies
    /// `accepts`. The origin is tried first, then each ring out to `radius`
    /// gets a handful of random probes. Returns `None` when the search
    /// exhausts its probes, which callers treat as "stay put".
    pub fn find_free_cell_near(
        &self,
        origin: Cell,
        radius: u32,
        rng: &mut SmallRng,
        mut accepts: impl FnMut(Cell) -> bool,
    ) -> Option<Cell> {
        if self.is_walkable(origin) && accepts(origin) {
            return Some(origin);
        }
        const PROBES_PER_RING: u32 = 8;
        for ring in 1..=radius as i32 {
            for _ in 0..PROBES_PER_RING {
                let candidate = Cell {
                    x: origin.x + rng.random_range(-ring..=ring),
                    y: origin.y + rng.random_range(-ring..=ring),
                };
                if self.is_walkable(candidate) && accepts(candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    fn index(&self, cell: Cell) -> usize {
        (cell.y as usize) * (self.width as usize) + (cell.x as usize)
    }
}
