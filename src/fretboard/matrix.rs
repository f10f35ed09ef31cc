//! Switch matrix geometry and the read-only matrix view

use std::fmt;

/// Rows in the physical switch matrix
pub const MATRIX_ROWS: usize = 5;
/// Columns in the physical switch matrix
pub const MATRIX_COLS: usize = 14;

/// A cell in the switch matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatrixPos {
    pub row: u8,
    pub col: u8,
}

impl MatrixPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check if this cell exists on the board
    #[inline]
    pub const fn in_bounds(self) -> bool {
        (self.row as usize) < MATRIX_ROWS && (self.col as usize) < MATRIX_COLS
    }
}

impl fmt::Display for MatrixPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Read-only query of raw switch state
///
/// The resolver only ever sees the matrix through this trait, so tests can
/// hand it any snapshot they like.
pub trait MatrixView {
    /// Whether the switch at `pos` is currently closed
    fn is_on(&self, pos: MatrixPos) -> bool;
}

impl<T: MatrixView + ?Sized> MatrixView for &T {
    fn is_on(&self, pos: MatrixPos) -> bool {
        (**self).is_on(pos)
    }
}

/// Debounced matrix snapshot, one bitmask per row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Matrix {
    rows: [u16; MATRIX_ROWS],
}

impl Matrix {
    /// Create a matrix with every switch open
    pub const fn new() -> Self {
        Self {
            rows: [0; MATRIX_ROWS],
        }
    }

    /// Create a matrix with the given switches closed
    pub fn with_pressed(cells: &[MatrixPos]) -> Self {
        let mut matrix = Self::new();
        for &pos in cells {
            matrix.set(pos, true);
        }
        matrix
    }

    /// Set a switch state. Returns true if the state changed.
    ///
    /// Out-of-range cells are ignored.
    pub fn set(&mut self, pos: MatrixPos, pressed: bool) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        let row = &mut self.rows[pos.row as usize];
        let mask = 1u16 << pos.col;
        let was = *row & mask != 0;
        if pressed {
            *row |= mask;
        } else {
            *row &= !mask;
        }
        was != pressed
    }

    pub fn press(&mut self, pos: MatrixPos) -> bool {
        self.set(pos, true)
    }

    pub fn release(&mut self, pos: MatrixPos) -> bool {
        self.set(pos, false)
    }

    /// Raw bitmask for a row (bit n = column n)
    pub fn row_bits(&self, row: usize) -> u16 {
        self.rows.get(row).copied().unwrap_or(0)
    }

    /// All closed switches in row-major order
    pub fn pressed(&self) -> impl Iterator<Item = MatrixPos> + '_ {
        (0..MATRIX_ROWS).flat_map(move |row| {
            (0..MATRIX_COLS)
                .map(move |col| MatrixPos::new(row as u8, col as u8))
                .filter(move |pos| self.is_on(*pos))
        })
    }

    pub fn is_idle(&self) -> bool {
        self.rows.iter().all(|row| *row == 0)
    }
}

impl MatrixView for Matrix {
    fn is_on(&self, pos: MatrixPos) -> bool {
        pos.in_bounds() && self.rows[pos.row as usize] & (1 << pos.col) != 0
    }
}
