use std::fmt;
use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use itertools::Itertools;
use rand::Rng;

use crate::collections::square::{Coord, Square};
use crate::error::{
    InvalidPuzzle, InvalidWidth, ParsePuzzleError, PuzzleFromFileError, ValidateError,
};
use crate::puzzle::generate::generate_puzzle;
use crate::puzzle::parse::parse_puzzle;
use crate::puzzle::validate::validate_answer;
use crate::puzzle::{Cage, CageId, GenerateOptions, Operator, Solution, Value};

/// A calcudoku puzzle, with or without its answer
///
/// A puzzle is constructed once, by the generator or the parser, and is
/// read-only afterwards.
#[derive(Debug, PartialEq)]
pub struct Puzzle {
    /// the width and height of the puzzle
    width: usize,
    /// contains all cages in the puzzle
    cages: Vec<Cage>,
    /// the cage ID at each cell
    cage_map: Square<CageId>,
    /// the answer grid, if known
    answer: Option<Solution>,
}

const NO_CAGE: CageId = usize::MAX;

impl Puzzle {
    /// Creates a puzzle with a specified width and set of cages.
    /// The cages must partition the grid.
    pub fn new(width: usize, cages: Vec<Cage>) -> Result<Self, InvalidPuzzle> {
        Self::build(width, cages, None)
    }

    /// Creates a puzzle with its answer grid attached
    pub fn with_answer(
        width: usize,
        cages: Vec<Cage>,
        answer: Solution,
    ) -> Result<Self, InvalidPuzzle> {
        Self::build(width, cages, Some(answer))
    }

    fn build(
        width: usize,
        cages: Vec<Cage>,
        answer: Option<Solution>,
    ) -> Result<Self, InvalidPuzzle> {
        let cage_map = cage_map(width, &cages)?;
        if let Some(answer) = &answer {
            if answer.width() != width {
                return Err(InvalidPuzzle::new(format!(
                    "answer grid width {} does not match puzzle width {}",
                    answer.width(),
                    width
                )));
            }
        }
        Ok(Self {
            width,
            cages,
            cage_map,
            answer,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PuzzleFromFileError> {
        let mut file = File::open(path)?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        let puzzle = Self::parse(&buf)?;
        Ok(puzzle)
    }

    /// Parse a `Puzzle` from a string
    pub fn parse(s: &str) -> Result<Self, ParsePuzzleError> {
        parse_puzzle(s)
    }

    /// Generate a random puzzle, complete with its answer
    pub fn generate<R: Rng>(width: usize, rng: &mut R) -> Result<Self, InvalidWidth> {
        generate_puzzle(width, GenerateOptions::default(), rng)
    }

    /// Generate a random puzzle with tuned probabilities
    pub fn generate_with_options<R: Rng>(
        width: usize,
        options: GenerateOptions,
        rng: &mut R,
    ) -> Result<Self, InvalidWidth> {
        generate_puzzle(width, options, rng)
    }

    /// Check the puzzle answer against every row, column and cage.
    /// Stops at the first violation.
    pub fn validate(&self) -> Result<(), ValidateError> {
        validate_answer(self)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell_count(&self) -> usize {
        self.width.pow(2)
    }

    pub fn cage(&self, id: CageId) -> CageRef<'_> {
        CageRef { puzzle: self, id }
    }

    pub fn cages(&self) -> impl Iterator<Item = CageRef<'_>> {
        (0..self.cages.len()).map(move |id| self.cage(id))
    }

    pub fn cage_count(&self) -> usize {
        self.cages.len()
    }

    /// The ID of the cage containing the given cell
    pub fn cage_at(&self, cell: Coord) -> CageId {
        self.cage_map[cell]
    }

    pub fn in_same_cage(&self, a: Coord, b: Coord) -> bool {
        self.cage_map[a] == self.cage_map[b]
    }

    pub fn cell_cage_ids(&self) -> &Square<CageId> {
        &self.cage_map
    }

    pub fn answer(&self) -> Option<&Solution> {
        self.answer.as_ref()
    }

    /// The answer at the given cell, if known
    pub fn answer_at(&self, cell: Coord) -> Option<Value> {
        self.answer.as_ref().map(|answer| answer[cell])
    }
}

/// Create a square of values where each value is the ID of the cage
/// containing that position, verifying that the cages partition the grid
fn cage_map(width: usize, cages: &[Cage]) -> Result<Square<CageId>, InvalidPuzzle> {
    let mut cage_map = Square::with_width_and_value(width, NO_CAGE);
    for (id, cage) in cages.iter().enumerate() {
        check_cell_count(id, cage)?;
        for &cell in cage.cell_ids() {
            if cell >= cage_map.len() {
                return Err(InvalidPuzzle::new(format!(
                    "cage {} contains out-of-bounds cell {}",
                    id, cell
                )));
            }
            if cage_map[cell] != NO_CAGE {
                return Err(InvalidPuzzle::new(format!(
                    "cell {} is in two cages",
                    cage_map.coord_at(cell)
                )));
            }
            cage_map[cell] = id;
        }
    }
    if let Some(cell) = cage_map.iter().position(|&id| id == NO_CAGE) {
        return Err(InvalidPuzzle::new(format!(
            "cell {} is not in a cage",
            cage_map.coord_at(cell)
        )));
    }
    Ok(cage_map)
}

fn check_cell_count(id: CageId, cage: &Cage) -> Result<(), InvalidPuzzle> {
    let count = cage.cell_ids().len();
    let valid = match cage.operator() {
        Operator::Given => count == 1,
        Operator::Subtract | Operator::Divide => count == 2,
        Operator::Add | Operator::Multiply => count >= 1,
    };
    if !valid {
        return Err(InvalidPuzzle::new(format!(
            "cage {} has {} cells with operator '{}'",
            id,
            count,
            cage.operator().symbol()
        )));
    }
    Ok(())
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.width)?;
        writeln!(f, "{}", self.cages.len())?;
        for cage in &self.cages {
            let cells = cage
                .cell_ids()
                .iter()
                .map(|&cell| self.cage_map.coord_at(cell))
                .join(" ");
            writeln!(f, "{} {} {}", cage.operator().symbol(), cage.target(), cells)?;
        }
        if let Some(answer) = &self.answer {
            for row in answer.rows() {
                writeln!(f, "{}", row.iter().join(" "))?;
            }
        }
        Ok(())
    }
}

/// A cage in the context of its puzzle
#[derive(Clone, Copy)]
pub struct CageRef<'a> {
    puzzle: &'a Puzzle,
    id: CageId,
}

impl<'a> CageRef<'a> {
    pub fn cage(self) -> &'a Cage {
        &self.puzzle.cages[self.id]
    }

    pub fn id(self) -> CageId {
        self.id
    }

    pub fn cells(self) -> impl Iterator<Item = Coord> + 'a {
        self.cage()
            .cell_ids()
            .iter()
            .map(move |&cell| self.puzzle.cage_map.coord_at(cell))
    }

    /// The cell where the cage label is displayed: the topmost,
    /// then leftmost, of the cage's cells
    pub fn label_cell(self) -> Coord {
        let cell = self
            .cage()
            .cell_ids()
            .iter()
            .copied()
            .min()
            .expect("cage has at least one cell");
        self.puzzle.cage_map.coord_at(cell)
    }

    /// The label displayed on the cage: the target followed by the
    /// operator symbol, or the bare target for a given cell
    pub fn label(self) -> String {
        match self.operator().display_symbol() {
            Some(symbol) => format!("{}{}", self.target(), symbol),
            None => self.target().to_string(),
        }
    }
}

impl Deref for CageRef<'_> {
    type Target = Cage;

    fn deref(&self) -> &Self::Target {
        self.cage()
    }
}

#[cfg(test)]
mod test {
    use super::Puzzle;
    use crate::collections::square::Coord;
    use crate::puzzle::{Cage, Operator};

    fn two_by_two() -> Puzzle {
        Puzzle::new(
            2,
            vec![
                Cage::new(3, Operator::Add, vec![0, 1]),
                Cage::new(3, Operator::Add, vec![2, 3]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn cage_map() {
        let puzzle = two_by_two();
        assert_eq!(0, puzzle.cage_at(Coord::new(0, 1)));
        assert_eq!(1, puzzle.cage_at(Coord::new(1, 0)));
        assert!(puzzle.in_same_cage(Coord::new(0, 0), Coord::new(0, 1)));
        assert!(!puzzle.in_same_cage(Coord::new(0, 1), Coord::new(1, 1)));
    }

    #[test]
    fn overlapping_cages() {
        let result = Puzzle::new(
            2,
            vec![
                Cage::new(3, Operator::Add, vec![0, 1]),
                Cage::new(3, Operator::Add, vec![1, 2, 3]),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn uncovered_cell() {
        let result = Puzzle::new(
            2,
            vec![
                Cage::new(3, Operator::Add, vec![0, 1]),
                Cage::new(2, Operator::Given, vec![2]),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn subtract_cage_needs_two_cells() {
        let result = Puzzle::new(
            2,
            vec![
                Cage::new(1, Operator::Subtract, vec![0, 1, 2]),
                Cage::new(2, Operator::Given, vec![3]),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn label_cell_is_topmost_leftmost() {
        let puzzle = Puzzle::new(
            2,
            vec![
                Cage::new(2, Operator::Given, vec![1]),
                Cage::new(4, Operator::Add, vec![3, 2, 0]),
            ],
        )
        .unwrap();
        assert_eq!(Coord::new(0, 0), puzzle.cage(1).label_cell());
        assert_eq!("4+", puzzle.cage(1).label());
        assert_eq!("2", puzzle.cage(0).label());
    }

    #[test]
    fn display_round_trips() {
        let puzzle = two_by_two();
        assert_eq!(puzzle, Puzzle::parse(&puzzle.to_string()).unwrap());
    }
}
