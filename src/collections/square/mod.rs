mod coord;

pub use self::coord::Coord;

use std::fmt;
use std::fmt::Display;
use std::ops::{Index, IndexMut};

/// A value that can be converted to a row-major index given the square width
pub trait AsSquareIndex: Copy {
    fn as_square_index(self, width: usize) -> usize;
}

impl AsSquareIndex for usize {
    fn as_square_index(self, _width: usize) -> usize {
        self
    }
}

impl AsSquareIndex for Coord {
    fn as_square_index(self, width: usize) -> usize {
        self.as_index(width)
    }
}

/// A container of elements represented in a square grid
#[derive(Clone, Debug, PartialEq)]
pub struct Square<T> {
    width: usize,
    elements: Vec<T>,
}

impl<T> Square<T> {
    /// Create a new `Square` of a specified width and fill with a specified value
    pub fn with_width_and_value(width: usize, val: T) -> Square<T>
    where
        T: Clone,
    {
        Square {
            width,
            elements: vec![val; width.pow(2)],
        }
    }

    /// Returns the width (and height) of the grid
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn coord_at(&self, index: usize) -> Coord {
        Coord::new(index / self.width, index % self.width)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }

    /// Returns an iterator over the rows of the square
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.elements.chunks(self.width)
    }

    /// Returns an iterator over every element, paired with its `Coord`
    pub fn iter_coord(&self) -> impl Iterator<Item = (Coord, &T)> {
        self.elements
            .iter()
            .enumerate()
            .map(move |(i, e)| (self.coord_at(i), e))
    }
}

impl<T, I: AsSquareIndex> Index<I> for Square<T> {
    type Output = T;

    fn index(&self, index: I) -> &Self::Output {
        &self.elements[index.as_square_index(self.width)]
    }
}

impl<T, I: AsSquareIndex> IndexMut<I> for Square<T> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.elements[index.as_square_index(self.width)]
    }
}

impl<T> Display for Square<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .elements
            .iter()
            .map(|e| e.to_string().len())
            .max()
            .unwrap_or(0);
        for row in self.rows() {
            for element in row {
                write!(f, "{:>1$} ", element, len)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
