use crate::puzzle::{CellId, Value};

pub use self::operator::Operator;

mod operator;

/// A cage in a calcudoku puzzle
///
/// Every cell in the puzzle belongs to exactly one cage.
/// Every cage has an operator and a target number.
#[derive(Clone, Debug, PartialEq)]
pub struct Cage {
    /// The target number that must be produced using the numbers in this cage
    target: Value,

    /// The math operator that must be used with the numbers in the cage
    /// to produce the target number
    operator: Operator,

    /// The positions of the cells in this cage
    cell_ids: Vec<CellId>,
}

impl Cage {
    pub fn new(target: Value, operator: Operator, cell_ids: Vec<CellId>) -> Self {
        Self {
            target,
            operator,
            cell_ids,
        }
    }

    /// The number on the cage
    pub fn target(&self) -> Value {
        self.target
    }

    /// The math operator on the cage
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The IDs of the cells in the cage
    pub fn cell_ids(&self) -> &[CellId] {
        &self.cell_ids
    }

    /// Whether the given cell values satisfy the cage
    pub fn check(&self, values: &[Value]) -> bool {
        self.operator.check(self.target, values)
    }
}
