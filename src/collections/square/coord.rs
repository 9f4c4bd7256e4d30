use std::fmt;
use std::fmt::{Debug, Display};

/// A `Coord` represents the position of an element in a `Square`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Coord([usize; 2]);

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self([row, col])
    }

    pub fn row(self) -> usize {
        self.0[0]
    }

    pub fn col(self) -> usize {
        self.0[1]
    }

    /// The row-major index of this position in a square of the given width
    pub fn as_index(self, width: usize) -> usize {
        self.row() * width + self.col()
    }
}

impl Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row(), self.col())
    }
}
