//! Odometer enumeration of operand class tuples.
//!
//! A base-K counter over n positions: the rightmost position moves fastest
//! and carries into its left neighbour on overflow. Every tuple of
//! {0, ..., K-1}^n is visited once, in lexicographic order.

#[derive(Debug, Clone)]
pub struct ClassTuples {
    radix: usize,
    digits: Vec<usize>,
    done: bool,
}

impl ClassTuples {
    pub fn new(radix: usize, arity: usize) -> ClassTuples {
        ClassTuples {
            radix,
            digits: vec![0; arity],
            done: radix == 0,
        }
    }

    /// Number of tuples a full enumeration yields.
    pub fn total(radix: usize, arity: usize) -> u128 {
        (radix as u128).pow(arity as u32)
    }

    fn advance(&mut self) {
        for position in (0..self.digits.len()).rev() {
            if self.digits[position] + 1 < self.radix {
                self.digits[position] += 1;
                return;
            }
            self.digits[position] = 0;
        }
        self.done = true;
    }
}

impl Iterator for ClassTuples {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.digits.clone();
        self.advance();
        Some(current)
    }
}
