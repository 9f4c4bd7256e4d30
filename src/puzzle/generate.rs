//! Generate calcudoku puzzles

use std::mem;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::collections::square::{Coord, Square};
use crate::error::InvalidWidth;
use crate::puzzle::{Cage, CellId, Operator, Puzzle, Solution, Value};

/// Tunable probabilities for the generator
#[derive(Clone, Copy, Debug)]
pub struct GenerateOptions {
    /// Base probability of merging two adjacent cages. The actual
    /// probability is divided by the size of the larger cage.
    pub union_prob: f64,
    /// Probability of a two-cell cage falling through to the
    /// add/multiply branch instead of subtract/divide
    pub pair_add_prob: f64,
    /// Probability of choosing multiply over add
    pub multiply_prob: f64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            union_prob: 0.7,
            pair_add_prob: 0.2,
            multiply_prob: 0.5,
        }
    }
}

pub(crate) fn generate_puzzle<R: Rng>(
    width: usize,
    options: GenerateOptions,
    rng: &mut R,
) -> Result<Puzzle, InvalidWidth> {
    if width == 0 {
        return Err(InvalidWidth(width));
    }
    let solution = random_latin_square(width, rng);
    debug!("solution:\n{}", solution);
    let cage_cells = random_cage_cells(width, options.union_prob, rng);
    let cages = cage_cells
        .into_iter()
        .map(|cells| {
            let values = cells.iter().map(|&cell| solution[cell]).collect::<Vec<_>>();
            let (operator, target) = random_operator(&values, options, rng);
            Cage::new(target, operator, cells)
        })
        .collect();
    let puzzle =
        Puzzle::with_answer(width, cages, solution).expect("generated cages partition the grid");
    Ok(puzzle)
}

/// Build a cyclic Latin square where cell (i, j) holds `(i + j) % n + 1`,
/// then scramble it with independent random row, column and value
/// permutations. Each permutation preserves the Latin property, so the
/// result is always a Latin square.
fn random_latin_square<R: Rng>(width: usize, rng: &mut R) -> Solution {
    let mut permutation = || {
        let mut p = (0..width).collect::<Vec<_>>();
        p.shuffle(rng);
        p
    };
    let rows = permutation();
    let cols = permutation();
    let values = permutation();
    let mut square = Square::with_width_and_value(width, 0);
    for i in 0..width {
        for j in 0..width {
            square[Coord::new(rows[i], cols[j])] = values[(i + j) % width] as Value + 1;
        }
    }
    square
}

/// Partition the grid into connected cages with a randomized union-find.
/// Cells are scanned in row-major order, attempting a union with the right
/// and below neighbors. A union gets less likely as cages grow, which keeps
/// cage sizes small and varied.
fn random_cage_cells<R: Rng>(width: usize, union_prob: f64, rng: &mut R) -> Vec<Vec<CellId>> {
    let num_cells = width.pow(2);
    let mut partition = Partition::new(num_cells);
    for cell in 0..num_cells {
        let (row, col) = (cell / width, cell % width);
        if col + 1 < width {
            partition.maybe_union(cell, cell + 1, union_prob, rng);
        }
        if row + 1 < width {
            partition.maybe_union(cell, cell + width, union_prob, rng);
        }
    }
    let mut cells_by_root: Vec<Vec<CellId>> = vec![Vec::new(); num_cells];
    for cell in 0..num_cells {
        cells_by_root[partition.find(cell)].push(cell);
    }
    cells_by_root.retain(|cells| !cells.is_empty());
    cells_by_root
}

/// Disjoint sets of cells: a union-find with path compression
struct Partition {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl Partition {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, cell: usize) -> usize {
        let mut root = cell;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = cell;
        while cur != root {
            cur = mem::replace(&mut self.parent[cur], root);
        }
        root
    }

    /// Union the sets containing `a` and `b` with probability
    /// `prob / max(size_a, size_b)`, sampled at the current sizes
    fn maybe_union<R: Rng>(&mut self, a: usize, b: usize, prob: f64, rng: &mut R) {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        let factor = self.size[a].max(self.size[b]);
        if rng.gen::<f64>() < prob / factor as f64 {
            self.parent[b] = a;
            self.size[a] += self.size[b];
        }
    }
}

/// Pick an operator for a cage with the given answer values, along with
/// the target it produces.
///
/// A single cell is always given outright. A pair usually becomes a
/// subtract or divide cage (divide whenever one value divides the other);
/// otherwise the pair falls through to the add/multiply branch used for
/// larger cages. A multiply cage whose product does not fit in a target
/// becomes an add cage instead.
fn random_operator<R: Rng>(
    values: &[Value],
    options: GenerateOptions,
    rng: &mut R,
) -> (Operator, Value) {
    if let [value] = *values {
        return (Operator::Given, value);
    }
    if let [a, b] = *values {
        if rng.gen::<f64>() >= options.pair_add_prob {
            let (min, max) = if a < b { (a, b) } else { (b, a) };
            return if max % min == 0 {
                (Operator::Divide, max / min)
            } else {
                (Operator::Subtract, max - min)
            };
        }
    }
    if rng.gen::<f64>() < options.multiply_prob {
        if let Some(target) = checked_product(values) {
            return (Operator::Multiply, target);
        }
    }
    // values are in [1, width] and cages stay small, so the sum fits
    let target = checked_sum(values).expect("cage sum fits in a target");
    (Operator::Add, target)
}

fn checked_product(values: &[Value]) -> Option<Value> {
    values.iter().try_fold(1, |acc: Value, &v| acc.checked_mul(v))
}

fn checked_sum(values: &[Value]) -> Option<Value> {
    values.iter().try_fold(0, |acc: Value, &v| acc.checked_add(v))
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{random_cage_cells, random_latin_square, random_operator, GenerateOptions};
    use crate::puzzle::{Operator, Puzzle, Value};

    #[test]
    fn rejects_zero_width() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Puzzle::generate(0, &mut rng).is_err());
    }

    #[test]
    fn latin_square_property() {
        let mut rng = StdRng::seed_from_u64(5);
        for width in 1..=9 {
            let square = random_latin_square(width, &mut rng);
            let expected: Vec<Value> = (1..=width as Value).collect();
            for row in square.rows() {
                let mut row = row.to_vec();
                row.sort_unstable();
                assert_eq!(expected, row);
            }
            for col in 0..width {
                let mut column: Vec<Value> =
                    (0..width).map(|row| square[row * width + col]).collect();
                column.sort_unstable();
                assert_eq!(expected, column);
            }
        }
    }

    #[test]
    fn cage_cells_partition_the_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        for width in 1..=9 {
            let cage_cells = random_cage_cells(width, 0.7, &mut rng);
            let mut seen = vec![false; width * width];
            for cells in &cage_cells {
                assert!(!cells.is_empty());
                for &cell in cells {
                    assert!(!seen[cell], "cell {} in two cages", cell);
                    seen[cell] = true;
                }
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn cages_are_connected() {
        let mut rng = StdRng::seed_from_u64(11);
        let width = 8;
        for cells in random_cage_cells(width, 0.7, &mut rng) {
            let mut reached = vec![cells[0]];
            let mut frontier = vec![cells[0]];
            while let Some(cell) = frontier.pop() {
                for &other in &cells {
                    if reached.contains(&other) {
                        continue;
                    }
                    let adjacent = (other == cell + 1 && cell % width + 1 < width)
                        || (cell == other + 1 && other % width + 1 < width)
                        || other == cell + width
                        || cell == other + width;
                    if adjacent {
                        reached.push(other);
                        frontier.push(other);
                    }
                }
            }
            assert_eq!(cells.len(), reached.len(), "cage {:?} is not connected", cells);
        }
    }

    #[test]
    fn operator_for_single_cell_is_given() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = GenerateOptions::default();
        assert_eq!(
            (Operator::Given, 4),
            random_operator(&[4], options, &mut rng)
        );
    }

    #[test]
    fn pair_prefers_divide_when_divisible() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = GenerateOptions {
            pair_add_prob: 0.0,
            ..GenerateOptions::default()
        };
        assert_eq!(
            (Operator::Divide, 2),
            random_operator(&[2, 4], options, &mut rng)
        );
        assert_eq!(
            (Operator::Subtract, 1),
            random_operator(&[3, 2], options, &mut rng)
        );
    }

    #[test]
    fn pair_falls_through_to_add_or_multiply() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = GenerateOptions {
            pair_add_prob: 1.0,
            multiply_prob: 0.0,
            ..GenerateOptions::default()
        };
        assert_eq!(
            (Operator::Add, 6),
            random_operator(&[2, 4], options, &mut rng)
        );
        let options = GenerateOptions {
            pair_add_prob: 1.0,
            multiply_prob: 1.0,
            ..GenerateOptions::default()
        };
        assert_eq!(
            (Operator::Multiply, 8),
            random_operator(&[2, 4], options, &mut rng)
        );
    }

    #[test]
    fn large_cage_uses_add_or_multiply() {
        let mut rng = StdRng::seed_from_u64(3);
        let options = GenerateOptions::default();
        for _ in 0..20 {
            let (operator, target) = random_operator(&[1, 2, 3], options, &mut rng);
            match operator {
                Operator::Add => assert_eq!(6, target),
                Operator::Multiply => assert_eq!(6, target),
                _ => panic!("unexpected operator {:?}", operator),
            }
        }
    }

    #[test]
    fn unrepresentable_product_falls_back_to_add() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = GenerateOptions {
            multiply_prob: 1.0,
            ..GenerateOptions::default()
        };
        // the product of these values exceeds i32::MAX
        let values = [200, 199, 198, 197, 196];
        assert_eq!(
            (Operator::Add, 990),
            random_operator(&values, options, &mut rng)
        );
    }

    #[test]
    fn wide_board_with_multiply_cages() {
        let mut rng = StdRng::seed_from_u64(29);
        let options = GenerateOptions {
            multiply_prob: 1.0,
            ..GenerateOptions::default()
        };
        let puzzle = Puzzle::generate_with_options(200, options, &mut rng).unwrap();
        assert_eq!(Ok(()), puzzle.validate());
    }

    #[test]
    fn same_seed_same_puzzle() {
        let puzzle = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            Puzzle::generate(6, &mut rng).unwrap()
        };
        assert_eq!(puzzle(42), puzzle(42));
    }
}
