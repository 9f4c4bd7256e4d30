use std::fmt::{self, Display, Formatter};
use std::io;

use thiserror::Error;

use crate::collections::square::Coord;
use crate::puzzle::{CageId, Value};

/// A structurally invalid puzzle, e.g. cages that do not partition the grid
#[derive(Error, Debug)]
#[error("invalid puzzle: {}", msg)]
pub struct InvalidPuzzle {
    msg: String,
}

impl InvalidPuzzle {
    pub(crate) fn new(msg: String) -> Self {
        Self { msg }
    }
}

#[derive(Error, Debug)]
#[error("invalid puzzle width: {0}")]
pub struct InvalidWidth(pub usize);

#[derive(Error, Debug)]
pub enum PuzzleFromFileError {
    #[error("error reading puzzle file")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParsePuzzleError),
}

#[derive(Debug, Error)]
pub enum ParsePuzzleError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    InvalidPuzzle(#[from] InvalidPuzzle),
}

pub(crate) const UNEXPECTED_END: ParseError =
    ParseError::from_type(ParseErrorType::UnexpectedEnd);

#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub struct ParseError {
    error_type: ParseErrorType,
    token: Option<String>,
    line: Option<usize>,
}

impl ParseError {
    pub(crate) fn new(error_type: ParseErrorType, token: impl Display, line: usize) -> Self {
        Self {
            error_type,
            token: Some(token.to_string()),
            line: Some(line),
        }
    }

    pub(crate) const fn from_type(error_type: ParseErrorType) -> Self {
        Self {
            error_type,
            token: None,
            line: None,
        }
    }
}

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub enum ParseErrorType {
    InvalidAnswer,
    InvalidCageCount,
    InvalidCell,
    InvalidOperator,
    InvalidSize,
    InvalidTarget,
    MissingCells,
    SizeTooBig,
    UnexpectedEnd,
    UnexpectedToken,
}

impl Display for ParseErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorType::InvalidAnswer => "Invalid answer row",
            ParseErrorType::InvalidCageCount => "Invalid cage count",
            ParseErrorType::InvalidCell => "Invalid cell",
            ParseErrorType::InvalidOperator => "Invalid operator",
            ParseErrorType::InvalidSize => "Invalid puzzle size",
            ParseErrorType::InvalidTarget => "Invalid cage target",
            ParseErrorType::MissingCells => "Cage has no cells",
            ParseErrorType::SizeTooBig => "Puzzle size too big",
            ParseErrorType::UnexpectedEnd => "Unexpected end",
            ParseErrorType::UnexpectedToken => "Unexpected token",
        };
        write!(f, "{}", s)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_type)?;
        if let Some(token) = &self.token {
            write!(f, ": \"{}\"", token)?;
        }
        if let Some(line) = &self.line {
            write!(f, " on line {}", line)?;
        }
        Ok(())
    }
}

/// The first rule broken by a puzzle answer
#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum ValidateError {
    #[error("the puzzle has no answer to check")]
    MissingAnswer,
    #[error("answer {} at {} is out of range", value, cell)]
    OutOfRange { cell: Coord, value: Value },
    #[error("row {} has a repeated value at {}", row, cell)]
    RowViolation { row: usize, cell: Coord },
    #[error("column {} has a repeated value at {}", col, cell)]
    ColumnViolation { col: usize, cell: Coord },
    #[error("cage \"{}\" at {} is not satisfied", label, cell)]
    CageViolation {
        cage: CageId,
        label: String,
        cell: Coord,
    },
}
