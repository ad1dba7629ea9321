//! 6x7 connect-four board with gravity.

use super::{PlaceError, symbol};
use crate::types::{Cell, Mark};
use serde::{Deserialize, Serialize};

/// Number of rows. Row 0 is the top.
pub const ROWS: usize = 6;
/// Number of columns.
pub const COLS: usize = 7;

/// Number of distinct 4-cell windows on the board.
pub(crate) const WINDOW_COUNT: usize = 69;

/// Every 4-cell window as row-major indices: horizontal, vertical,
/// rising diagonal, falling diagonal.
pub(crate) static WINDOWS: [[usize; 4]; WINDOW_COUNT] = build_windows();

/// Column search order, center first then alternating outward.
pub(crate) const CENTER_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

const fn idx(row: usize, col: usize) -> usize {
    row * COLS + col
}

const fn build_windows() -> [[usize; 4]; WINDOW_COUNT] {
    let mut out = [[0; 4]; WINDOW_COUNT];
    let mut n = 0;

    let mut row = 0;
    while row < ROWS {
        let mut col = 0;
        while col + 3 < COLS {
            out[n] = [idx(row, col), idx(row, col + 1), idx(row, col + 2), idx(row, col + 3)];
            n += 1;
            col += 1;
        }
        row += 1;
    }

    let mut col = 0;
    while col < COLS {
        let mut row = 0;
        while row + 3 < ROWS {
            out[n] = [idx(row, col), idx(row + 1, col), idx(row + 2, col), idx(row + 3, col)];
            n += 1;
            row += 1;
        }
        col += 1;
    }

    let mut row = 3;
    while row < ROWS {
        let mut col = 0;
        while col + 3 < COLS {
            out[n] = [
                idx(row, col),
                idx(row - 1, col + 1),
                idx(row - 2, col + 2),
                idx(row - 3, col + 3),
            ];
            n += 1;
            col += 1;
        }
        row += 1;
    }

    let mut row = 0;
    while row + 3 < ROWS {
        let mut col = 0;
        while col + 3 < COLS {
            out[n] = [
                idx(row, col),
                idx(row + 1, col + 1),
                idx(row + 2, col + 2),
                idx(row + 3, col + 3),
            ];
            n += 1;
            col += 1;
        }
        row += 1;
    }

    out
}

/// 6x7 connect-four board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ConnectFourBoard {
    rows: [[Cell; COLS]; ROWS],
}

impl ConnectFourBoard {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `row`, `col`.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Returns the cell at a row-major index (0-41).
    pub fn get_index(&self, index: usize) -> Option<Cell> {
        self.cell(index / COLS, index % COLS)
    }

    /// Returns all rows, top first.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.rows
    }

    /// Lowest empty row in `col`, or `None` if the column is full or absent.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.rows[row][col].is_empty())
    }

    /// Returns true if `col` exists and has no empty row.
    pub fn is_column_full(&self, col: usize) -> bool {
        col < COLS && self.landing_row(col).is_none()
    }

    /// Drops a mark into `col`, returning the new board.
    pub fn drop_mark(&self, col: usize, mark: Mark) -> Result<Self, PlaceError> {
        if col >= COLS {
            return Err(PlaceError::PositionOutOfRange(col));
        }
        let row = self.landing_row(col).ok_or(PlaceError::ColumnFull(col))?;
        let mut next = *self;
        next.rows[row][col] = Cell::Occupied(mark);
        Ok(next)
    }

    /// Columns that still accept a mark, ascending.
    pub fn open_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..COLS).filter(|&col| self.rows[0][col].is_empty())
    }

    /// Returns true when the top row is filled.
    pub fn is_full(&self) -> bool {
        self.rows[0].iter().all(|c| !c.is_empty())
    }

    pub(crate) fn window(&self, window: &[usize; 4]) -> [Cell; 4] {
        window.map(|i| self.rows[i / COLS][i % COLS])
    }
}

impl std::fmt::Display for ConnectFourBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "0 1 2 3 4 5 6")?;
        for (r, row) in self.rows.iter().enumerate() {
            let line: Vec<String> = row.iter().map(|c| symbol(*c).to_string()).collect();
            write!(f, "{}", line.join(" "))?;
            if r + 1 < ROWS {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
