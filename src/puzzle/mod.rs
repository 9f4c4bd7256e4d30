//! Calcudoku puzzles

pub use self::cage::{Cage, Operator};
pub use self::generate::GenerateOptions;
pub use self::puzzle::{CageRef, Puzzle};

mod cage;
mod generate;
mod parse;
mod puzzle;
mod validate;

use crate::collections::square::Square;

pub type CageId = usize;
pub type CellId = usize;
pub type Value = i32;
pub type Solution = Square<Value>;
