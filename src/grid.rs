//! Grid domain types: binary cells, the square grid, and its persisted snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Invalid position. Row and column must be between 0 and {max}.")]
    OutOfRange { row: i64, col: i64, max: usize },

    #[error("snapshot shape mismatch: {0}")]
    Shape(String),
}

/// State of one grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = " ")]
    Blank,
    #[serde(rename = "X")]
    Marked,
}

impl Cell {
    pub fn toggled(self) -> Self {
        match self {
            Cell::Blank => Cell::Marked,
            Cell::Marked => Cell::Blank,
        }
    }

    /// Marker character used in the state file and the text rendering.
    pub fn symbol(self) -> &'static str {
        match self {
            Cell::Blank => " ",
            Cell::Marked => "X",
        }
    }

    pub fn is_marked(self) -> bool {
        self == Cell::Marked
    }
}

/// Square matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// All-blank grid of `size x size` cells.
    pub fn blank(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::Blank; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        let n = self.size as i64;
        (0..n).contains(&row) && (0..n).contains(&col)
    }

    /// Returns `None` outside `[0, N)`.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Flip one cell and return its new state.
    ///
    /// Coordinates are signed because remote callers may send negatives; anything
    /// outside `[0, N)` is rejected rather than clamped.
    pub fn toggle(&mut self, row: i64, col: i64) -> Result<Cell, GridError> {
        if !self.contains(row, col) {
            return Err(GridError::OutOfRange {
                row,
                col,
                max: self.size.saturating_sub(1),
            });
        }
        let cell = &mut self.cells[row as usize][col as usize];
        *cell = cell.toggled();
        Ok(*cell)
    }

    pub fn marked_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_marked())
            .count()
    }

    /// Human-readable rendering: leading newline, one line per row, markers joined by
    /// single spaces.
    pub fn render_text(&self) -> String {
        let mut out = String::from("\n");
        for row in &self.cells {
            let line: Vec<&str> = row.iter().map(|cell| cell.symbol()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }

    pub fn to_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            grid: self.cells.clone(),
        }
    }
}

/// Persisted form of a grid. Fields other than `grid` are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub grid: Vec<Vec<Cell>>,
}

impl GridSnapshot {
    /// Validate the snapshot against the authoritative dimension.
    pub fn into_grid(self, size: usize) -> Result<Grid, GridError> {
        if self.grid.len() != size {
            return Err(GridError::Shape(format!(
                "expected {} rows, found {}",
                size,
                self.grid.len()
            )));
        }
        if let Some((i, row)) = self.grid.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(GridError::Shape(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                size
            )));
        }
        Ok(Grid {
            size,
            cells: self.grid,
        })
    }
}
