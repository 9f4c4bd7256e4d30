use crate::puzzle::Value;

/// The `Operator` enum represents each of the possible math operators
/// that can be on a cage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// A single-cell cage whose value is given outright
    Given,
}

impl Operator {
    /// The character representing the operator in puzzle files
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => 'x',
            Operator::Divide => '/',
            Operator::Given => '!',
        }
    }

    /// Retrieve an `Operator` from its corresponding symbol
    pub fn from_symbol(c: char) -> Option<Operator> {
        let operator = match c {
            '+' => Operator::Add,
            '-' => Operator::Subtract,
            'x' => Operator::Multiply,
            '/' => Operator::Divide,
            '!' => Operator::Given,
            _ => return None,
        };
        Some(operator)
    }

    /// The symbol shown next to the target on a rendered cage.
    /// Given cages show the bare target.
    pub fn display_symbol(self) -> Option<char> {
        match self {
            Operator::Given => None,
            _ => Some(self.symbol()),
        }
    }

    /// Whether the given values combine to the target under this operator.
    ///
    /// A wrong number of values for `Given`, `Subtract` or `Divide` is a
    /// failed check, not a panic. `Divide` is compared exactly with
    /// integer cross-multiplication, never floating point.
    pub fn check(self, target: Value, values: &[Value]) -> bool {
        match self {
            Operator::Add => {
                values.iter().try_fold(0, |acc: Value, &v| acc.checked_add(v)) == Some(target)
            }
            Operator::Multiply => {
                values.iter().try_fold(1, |acc: Value, &v| acc.checked_mul(v)) == Some(target)
            }
            Operator::Subtract => match *values {
                [a, b] => (a - b).abs() == target,
                _ => false,
            },
            Operator::Divide => match *values {
                [a, b] => {
                    let (min, max) = if a < b { (a, b) } else { (b, a) };
                    min != 0 && target.checked_mul(min) == Some(max)
                }
                _ => false,
            },
            Operator::Given => match *values {
                [value] => value == target,
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::Operator;

    #[test]
    fn symbol_round_trip() {
        for &operator in &[
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
            Operator::Given,
        ] {
            assert_eq!(Some(operator), Operator::from_symbol(operator.symbol()));
        }
        assert_eq!(None, Operator::from_symbol('?'));
    }

    #[test]
    fn add() {
        assert!(Operator::Add.check(6, &[1, 2, 3]));
        assert!(Operator::Add.check(2, &[2]));
        assert!(!Operator::Add.check(7, &[1, 2, 3]));
    }

    #[test]
    fn multiply() {
        assert!(Operator::Multiply.check(24, &[2, 3, 4]));
        assert!(!Operator::Multiply.check(25, &[2, 3, 4]));
    }

    #[test]
    fn subtract_is_unordered() {
        assert!(Operator::Subtract.check(2, &[1, 3]));
        assert!(Operator::Subtract.check(2, &[3, 1]));
        assert!(!Operator::Subtract.check(1, &[1, 3]));
    }

    #[test]
    fn subtract_wrong_arity() {
        assert!(!Operator::Subtract.check(2, &[1, 3, 5]));
        assert!(!Operator::Subtract.check(2, &[2]));
    }

    #[test]
    fn divide_exact() {
        assert!(Operator::Divide.check(2, &[2, 4]));
        assert!(Operator::Divide.check(2, &[4, 2]));
        // 5 / 2 is not exactly 2
        assert!(!Operator::Divide.check(2, &[5, 2]));
        assert!(!Operator::Divide.check(3, &[1, 2, 6]));
    }

    #[test]
    fn given() {
        assert!(Operator::Given.check(3, &[3]));
        assert!(!Operator::Given.check(3, &[4]));
        assert!(!Operator::Given.check(3, &[3, 3]));
    }
}
