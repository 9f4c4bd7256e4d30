//! Parse puzzles from text
//!
//! ```text
//! line 1:          n
//! line 2:          C (cage count)
//! next C lines:    <operator> <target> <cell>...   cell = "row,col"
//! next n lines:    optional answer grid, one row per line
//! ```

use std::str::FromStr;

use crate::collections::square::Square;
use crate::error::{ParseError, ParseErrorType, ParsePuzzleError, UNEXPECTED_END};
use crate::puzzle::{Cage, CellId, Operator, Puzzle, Solution, Value};

pub(crate) fn parse_puzzle(s: &str) -> Result<Puzzle, ParsePuzzleError> {
    let mut lines = Lines::new(s);
    let (i, line) = lines.next().ok_or(UNEXPECTED_END)?;
    let width: usize = parse_number(line, ParseErrorType::InvalidSize, i)?;
    if width == 0 {
        return Err(ParseError::new(ParseErrorType::InvalidSize, line, i).into());
    }
    // every cell must appear as a "row,col" token, so a width whose grid
    // outsizes the input cannot be right, and nothing bigger is allocated
    if width.checked_mul(width).map_or(true, |cells| cells > s.len()) {
        return Err(ParseError::new(ParseErrorType::SizeTooBig, line, i).into());
    }
    let (i, line) = lines.next().ok_or(UNEXPECTED_END)?;
    let cage_count: usize = parse_number(line, ParseErrorType::InvalidCageCount, i)?;
    // cages are non-empty and disjoint, so there are at most width² of them
    if cage_count > width.pow(2) {
        return Err(ParseError::new(ParseErrorType::InvalidCageCount, line, i).into());
    }
    let mut cages = Vec::with_capacity(cage_count);
    for _ in 0..cage_count {
        let (i, line) = lines.next().ok_or(UNEXPECTED_END)?;
        cages.push(parse_cage(line, width, i)?);
    }
    let answer = read_answer(&mut lines, width)?;
    if let Some((i, line)) = lines.next() {
        return Err(ParseError::new(ParseErrorType::UnexpectedToken, line, i).into());
    }
    let puzzle = match answer {
        Some(answer) => Puzzle::with_answer(width, cages, answer)?,
        None => Puzzle::new(width, cages)?,
    };
    Ok(puzzle)
}

/// Non-blank lines of the input, paired with 1-based line numbers
struct Lines<'a> {
    iter: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            iter: s.lines().enumerate(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    fn next(&mut self) -> Option<(usize, &'a str)> {
        self.iter
            .by_ref()
            .map(|(i, line)| (i + 1, line.trim()))
            .find(|(_, line)| !line.is_empty())
    }
}

fn parse_cage(line: &str, width: usize, line_no: usize) -> Result<Cage, ParseError> {
    let mut tokens = line.split_whitespace();
    let operator = tokens
        .next()
        .filter(|t| t.chars().count() == 1)
        .and_then(|t| Operator::from_symbol(t.chars().next().expect("one char")))
        .ok_or_else(|| ParseError::new(ParseErrorType::InvalidOperator, line, line_no))?;
    let target = tokens
        .next()
        .and_then(|t| Value::from_str(t).ok())
        .ok_or_else(|| ParseError::new(ParseErrorType::InvalidTarget, line, line_no))?;
    let cell_ids = tokens
        .map(|t| parse_cell(t, width, line_no))
        .collect::<Result<Vec<CellId>, _>>()?;
    if cell_ids.is_empty() {
        return Err(ParseError::new(ParseErrorType::MissingCells, line, line_no));
    }
    Ok(Cage::new(target, operator, cell_ids))
}

/// Parse a "row,col" token into a cell ID, bounds-checked
fn parse_cell(token: &str, width: usize, line_no: usize) -> Result<CellId, ParseError> {
    let invalid = || ParseError::new(ParseErrorType::InvalidCell, token, line_no);
    let mut parts = token.splitn(2, ',');
    let mut coord = || {
        parts
            .next()
            .and_then(|p| usize::from_str(p).ok())
            .filter(|&p| p < width)
    };
    let row = coord().ok_or_else(&invalid)?;
    let col = coord().ok_or_else(&invalid)?;
    Ok(row * width + col)
}

/// Read the optional answer section: exactly `width` rows of `width`
/// integers, or nothing at all
fn read_answer(lines: &mut Lines<'_>, width: usize) -> Result<Option<Solution>, ParseError> {
    let first = match lines.next() {
        Some(first) => first,
        None => return Ok(None),
    };
    let mut answer = Square::with_width_and_value(width, 0);
    let mut row = parse_answer_row(first, width)?;
    for i in 0..width {
        for (j, value) in row.iter().enumerate() {
            answer[i * width + j] = *value;
        }
        if i + 1 < width {
            let line = lines.next().ok_or(UNEXPECTED_END)?;
            row = parse_answer_row(line, width)?;
        }
    }
    Ok(Some(answer))
}

fn parse_answer_row((line_no, line): (usize, &str), width: usize) -> Result<Vec<Value>, ParseError> {
    let values = line
        .split_whitespace()
        .map(|t| Value::from_str(t).ok())
        .collect::<Option<Vec<_>>>()
        .filter(|values| values.len() == width)
        .ok_or_else(|| ParseError::new(ParseErrorType::InvalidAnswer, line, line_no))?;
    Ok(values)
}

fn parse_number<T: FromStr>(
    token: &str,
    error_type: ParseErrorType,
    line_no: usize,
) -> Result<T, ParseError> {
    T::from_str(token).map_err(|_| ParseError::new(error_type, token, line_no))
}
