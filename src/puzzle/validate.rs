//! Check puzzle answers
//!
//! Checks run in a fixed order and stop at the first violation:
//! value range, row uniqueness, column uniqueness, then cage arithmetic.

use crate::collections::square::Coord;
use crate::error::ValidateError;
use crate::puzzle::{Puzzle, Value};

pub(crate) fn validate_answer(puzzle: &Puzzle) -> Result<(), ValidateError> {
    let answer = puzzle.answer().ok_or(ValidateError::MissingAnswer)?;
    let width = puzzle.width();

    for (cell, &value) in answer.iter_coord() {
        if value < 1 || value > width as Value {
            return Err(ValidateError::OutOfRange { cell, value });
        }
    }

    for row in 0..width {
        let mut used = vec![false; width];
        for col in 0..width {
            let cell = Coord::new(row, col);
            let value = answer[cell] as usize;
            if used[value - 1] {
                return Err(ValidateError::RowViolation { row, cell });
            }
            used[value - 1] = true;
        }
    }

    for col in 0..width {
        let mut used = vec![false; width];
        for row in 0..width {
            let cell = Coord::new(row, col);
            let value = answer[cell] as usize;
            if used[value - 1] {
                return Err(ValidateError::ColumnViolation { col, cell });
            }
            used[value - 1] = true;
        }
    }

    for cage in puzzle.cages() {
        let values = cage
            .cell_ids()
            .iter()
            .map(|&cell| answer[cell])
            .collect::<Vec<_>>();
        if !cage.check(&values) {
            return Err(ValidateError::CageViolation {
                cage: cage.id(),
                label: cage.label(),
                cell: cage.label_cell(),
            });
        }
    }
    Ok(())
}
