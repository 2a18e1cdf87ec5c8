//! Fixed-width bitvectors.
//!
//! Bits are stored most significant first, so `bits[0]` is the sign bit of a
//! signed interpretation and `bits[width - 1]` is the least significant bit.

use std::fmt;
use std::ops::{Index, IndexMut};

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    bits: Vec<bool>,
}

impl BitVector {
    /// An all-zero bitvector of the given width.
    pub fn new(width: usize) -> BitVector {
        assert!(width >= 1, "bitvectors have at least one bit");
        BitVector {
            bits: vec![false; width],
        }
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn from_unsigned(width: usize, value: &BigUint) -> BitVector {
        let mut bv = BitVector::new(width);
        for i in 0..width {
            bv.bits[width - 1 - i] = value.bit(i as u64);
        }
        bv
    }

    /// Two's complement encoding of `value`, which must fit in `width` bits.
    pub fn from_signed(width: usize, value: &BigInt) -> BitVector {
        let modulus = BigInt::one() << width;
        let wrapped = ((value % &modulus) + &modulus) % &modulus;
        let unsigned = wrapped.to_biguint().unwrap_or_else(BigUint::zero);
        BitVector::from_unsigned(width, &unsigned)
    }

    pub fn to_unsigned(&self) -> BigUint {
        let mut v = BigUint::zero();
        for &b in &self.bits {
            v <<= 1;
            if b {
                v |= BigUint::one();
            }
        }
        v
    }

    pub fn to_signed(&self) -> BigInt {
        let u = BigInt::from(self.to_unsigned());
        if self.bits[0] {
            u - (BigInt::one() << self.width())
        } else {
            u
        }
    }

    /// Overwrite `bits[start..end]` with uniformly random bits.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R, start: usize, end: usize) {
        for b in &mut self.bits[start..end] {
            *b = rng.gen::<bool>();
        }
    }

    pub fn fill(&mut self, start: usize, end: usize, value: bool) {
        for b in &mut self.bits[start..end] {
            *b = value;
        }
    }

    pub fn min_unsigned(_width: usize) -> BigInt {
        BigInt::zero()
    }

    pub fn max_unsigned(width: usize) -> BigInt {
        (BigInt::one() << width) - 1
    }

    pub fn min_signed(width: usize) -> BigInt {
        -(BigInt::one() << (width - 1))
    }

    pub fn max_signed(width: usize) -> BigInt {
        (BigInt::one() << (width - 1)) - 1
    }

    pub fn smtlib_sort(&self) -> String {
        format!("(_ BitVec {})", self.width())
    }

    pub fn smtlib_binary(&self) -> String {
        let body: String = self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
        format!("#b{}", body)
    }

    /// Hex literal; only available when the width is a multiple of four.
    pub fn smtlib_hex(&self) -> Option<String> {
        if self.width() % 4 != 0 {
            return None;
        }
        let digits = self.width() / 4;
        Some(format!("#x{:0>width$x}", self.to_unsigned(), width = digits))
    }

    pub fn smtlib_literal(&self) -> String {
        self.smtlib_binary()
    }

    /// Either the binary or (when possible) the hex spelling of this literal.
    pub fn smtlib_random_literal<R: Rng>(&self, rng: &mut R) -> String {
        match self.smtlib_hex() {
            Some(hex) if rng.gen::<bool>() => hex,
            _ => self.smtlib_binary(),
        }
    }
}

impl Index<usize> for BitVector {
    type Output = bool;

    fn index(&self, i: usize) -> &bool {
        &self.bits[i]
    }
}

impl IndexMut<usize> for BitVector {
    fn index_mut(&mut self, i: usize) -> &mut bool {
        &mut self.bits[i]
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.smtlib_binary())
    }
}
