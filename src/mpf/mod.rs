//! Arbitrary-width IEEE 754 binary floating point values.
//!
//! An `Mpf` is the packed triple (sign, biased exponent field, trailing
//! significand field) of a format with `eb` exponent bits and `sb` significand
//! bits (hidden bit included). All conversions go through exact rationals, so
//! rounding is correct by construction rather than by emulation.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bitvector::BitVector;
use crate::rational::{self, Rational};
use crate::rounding::RoundingMode;

/// Exponent and significand widths of a binary interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Format {
    pub eb: u32,
    pub sb: u32,
}

impl Format {
    pub const FLOAT16: Format = Format { eb: 5, sb: 11 };
    pub const FLOAT32: Format = Format { eb: 8, sb: 24 };
    pub const FLOAT64: Format = Format { eb: 11, sb: 53 };
    pub const FLOAT128: Format = Format { eb: 15, sb: 113 };

    pub const fn new(eb: u32, sb: u32) -> Format {
        Format { eb, sb }
    }

    /// Precision in bits, hidden bit included.
    pub fn precision(self) -> i64 {
        self.sb as i64
    }

    /// Width of the trailing significand field.
    pub fn t(self) -> u32 {
        self.sb - 1
    }

    pub fn width(self) -> usize {
        (self.eb + self.sb) as usize
    }

    pub fn bias(self) -> i64 {
        (1i64 << (self.eb - 1)) - 1
    }

    pub fn emax(self) -> i64 {
        self.bias()
    }

    pub fn emin(self) -> i64 {
        1 - self.bias()
    }

    /// The all-ones exponent field used by infinities and NaNs.
    pub fn max_exponent_field(self) -> u64 {
        (1u64 << self.eb) - 1
    }

    pub fn max_significand_field(self) -> BigUint {
        (BigUint::one() << self.t()) - BigUint::one()
    }

    pub fn smtlib_sort(self) -> String {
        format!("(_ FloatingPoint {} {})", self.eb, self.sb)
    }

    /// The `to_fp` indexed function symbol for this format.
    pub fn smtlib_to_fp(self) -> String {
        format!("(_ to_fp {} {})", self.eb, self.sb)
    }

    pub fn smtlib_to_fp_unsigned(self) -> String {
        format!("(_ to_fp_unsigned {} {})", self.eb, self.sb)
    }

    /// Smallest magnitude that rounds to infinity under RNE: the largest
    /// finite value plus half of its unit in the last place.
    pub fn inf_boundary(self) -> Rational {
        let max = Mpf::max_normal(self, false).value();
        max + rational::pow2(self.emax() - self.precision())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Float({}, {})", self.eb, self.sb)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mpf {
    format: Format,
    sign: bool,
    exponent: u64,
    significand: BigUint,
}

impl Mpf {
    /// Positive zero.
    pub fn new(format: Format) -> Mpf {
        Mpf::zero(format, false)
    }

    pub fn pack(format: Format, sign: bool, exponent: u64, significand: BigUint) -> Mpf {
        assert!(exponent <= format.max_exponent_field());
        assert!(significand.bits() <= format.t() as u64);
        Mpf {
            format,
            sign,
            exponent,
            significand,
        }
    }

    pub fn zero(format: Format, negative: bool) -> Mpf {
        Mpf::pack(format, negative, 0, BigUint::zero())
    }

    pub fn infinity(format: Format, negative: bool) -> Mpf {
        Mpf::pack(format, negative, format.max_exponent_field(), BigUint::zero())
    }

    /// The canonical quiet NaN.
    pub fn nan(format: Format) -> Mpf {
        Mpf::pack(
            format,
            false,
            format.max_exponent_field(),
            BigUint::one() << (format.t() - 1),
        )
    }

    pub fn max_normal(format: Format, negative: bool) -> Mpf {
        Mpf::pack(
            format,
            negative,
            format.max_exponent_field() - 1,
            format.max_significand_field(),
        )
    }

    pub fn min_subnormal(format: Format, negative: bool) -> Mpf {
        Mpf::pack(format, negative, 0, BigUint::one())
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn sign(&self) -> bool {
        self.sign
    }

    pub fn exponent(&self) -> u64 {
        self.exponent
    }

    pub fn significand(&self) -> &BigUint {
        &self.significand
    }

    pub fn set_sign(&mut self, negative: bool) {
        self.sign = negative;
    }

    pub fn negated(&self) -> Mpf {
        let mut rv = self.clone();
        rv.sign = !rv.sign;
        rv
    }

    pub fn abs(&self) -> Mpf {
        let mut rv = self.clone();
        rv.sign = false;
        rv
    }

    /// Same format, compared by format only.
    pub fn compatible(&self, other: &Mpf) -> bool {
        self.format == other.format
    }

    pub fn is_zero(&self) -> bool {
        self.exponent == 0 && self.significand.is_zero()
    }

    pub fn is_subnormal(&self) -> bool {
        self.exponent == 0 && !self.significand.is_zero()
    }

    pub fn is_normal(&self) -> bool {
        self.exponent != 0 && self.exponent != self.format.max_exponent_field()
    }

    pub fn is_infinite(&self) -> bool {
        self.exponent == self.format.max_exponent_field() && self.significand.is_zero()
    }

    pub fn is_nan(&self) -> bool {
        self.exponent == self.format.max_exponent_field() && !self.significand.is_zero()
    }

    pub fn is_finite(&self) -> bool {
        self.exponent != self.format.max_exponent_field()
    }

    pub fn is_negative(&self) -> bool {
        self.sign && !self.is_nan()
    }

    pub fn is_positive(&self) -> bool {
        !self.sign && !self.is_nan()
    }

    pub fn is_integral(&self) -> bool {
        self.is_finite() && rational::is_integral(&self.value())
    }

    /// Whether the last bit of the significand field is clear.
    pub fn is_even(&self) -> bool {
        !self.significand.bit(0)
    }

    /// Full encoding as an unsigned integer: sign, exponent, significand.
    pub fn bits(&self) -> BigUint {
        let mut rv = BigUint::from(self.sign as u8);
        rv <<= self.format.eb;
        rv |= BigUint::from(self.exponent);
        rv <<= self.format.t();
        rv |= &self.significand;
        rv
    }

    pub fn from_bits(format: Format, bits: &BigUint) -> Mpf {
        let t = format.t();
        let significand = bits & format.max_significand_field();
        let exponent_mask = BigUint::from(format.max_exponent_field());
        let exponent = (bits >> t) & exponent_mask;
        let sign = bits.bit((format.eb + t) as u64);
        let exponent = exponent.iter_u64_digits().next().unwrap_or(0);
        Mpf::pack(format, sign, exponent, significand)
    }

    pub fn to_bitvector(&self) -> BitVector {
        BitVector::from_unsigned(self.format.width(), &self.bits())
    }

    /// Exact value for finite inputs.
    pub fn to_rational(&self) -> Option<Rational> {
        if self.is_finite() {
            Some(self.value())
        } else {
            None
        }
    }

    // Exact value; callers guarantee the value is finite.
    pub(crate) fn value(&self) -> Rational {
        debug_assert!(self.is_finite());
        let f = self.format;
        let (mantissa, exp) = if self.exponent == 0 {
            (self.significand.clone(), f.emin() - f.precision() + 1)
        } else {
            (
                (BigUint::one() << f.t()) + &self.significand,
                self.exponent as i64 - f.bias() - f.precision() + 1,
            )
        };
        let magnitude = Rational::from_integer(BigInt::from(mantissa)) * rational::pow2(exp);
        if self.sign {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Correctly rounded conversion of an exact rational.
    ///
    /// An exact zero becomes `+0`; a nonzero value that underflows to zero
    /// keeps its sign.
    pub fn from_rational(format: Format, rm: RoundingMode, q: &Rational) -> Mpf {
        if q.is_zero() {
            return Mpf::zero(format, false);
        }
        let negative = q.is_negative();
        let magnitude = q.abs();
        let p = format.precision();

        let mut e = rational::ilog2(&magnitude).max(format.emin());
        let scaled = &magnitude * rational::pow2(p - 1 - e);
        let (mut n, rest) = rational::floor_split(&scaled);
        if !rest.is_zero() && rm.rounds_away(rest.cmp(&rational::half()), n.is_odd(), negative) {
            n += 1;
        }

        let hidden = BigInt::one() << (p - 1) as usize;
        if n == (BigInt::one() << p as usize) {
            n = hidden.clone();
            e += 1;
        }
        if n.is_zero() {
            return Mpf::zero(format, negative);
        }
        if e > format.emax() {
            return Mpf::overflow(format, rm, negative);
        }

        let (exponent, significand) = if n < hidden {
            (0, n)
        } else {
            ((e + format.bias()) as u64, n - hidden)
        };
        let significand = significand.to_biguint().unwrap_or_else(BigUint::zero);
        Mpf::pack(format, negative, exponent, significand)
    }

    fn overflow(format: Format, rm: RoundingMode, negative: bool) -> Mpf {
        let to_infinity = match rm {
            RoundingMode::RNE | RoundingMode::RNA => true,
            RoundingMode::RTZ => false,
            RoundingMode::RTP => !negative,
            RoundingMode::RTN => negative,
        };
        if to_infinity {
            Mpf::infinity(format, negative)
        } else {
            Mpf::max_normal(format, negative)
        }
    }

    /// Convert to another format (`fp.cast` / `to_fp` of a float).
    pub fn convert(&self, format: Format, rm: RoundingMode) -> Mpf {
        if self.is_nan() {
            Mpf::nan(format)
        } else if self.is_infinite() {
            Mpf::infinity(format, self.sign)
        } else if self.is_zero() {
            Mpf::zero(format, self.sign)
        } else {
            Mpf::from_rational(format, rm, &self.value())
        }
    }

    // Exponent and significand fields read as one integer; monotonic in the
    // magnitude of non-NaN values.
    fn magnitude_code(&self) -> BigUint {
        (BigUint::from(self.exponent) << self.format.t()) | &self.significand
    }

    fn from_magnitude_code(format: Format, negative: bool, code: &BigUint) -> Mpf {
        let mut rv = Mpf::from_bits(format, code);
        rv.sign = negative;
        rv
    }

    /// The least value that compares greater (IEEE nextUp).
    pub fn next_up(&self) -> Mpf {
        let f = self.format;
        if self.is_nan() {
            return self.clone();
        }
        if self.is_infinite() {
            return if self.sign {
                Mpf::max_normal(f, true)
            } else {
                self.clone()
            };
        }
        if self.is_zero() {
            return Mpf::min_subnormal(f, false);
        }
        let code = self.magnitude_code();
        if self.sign {
            Mpf::from_magnitude_code(f, true, &(code - BigUint::one()))
        } else {
            Mpf::from_magnitude_code(f, false, &(code + BigUint::one()))
        }
    }

    /// The greatest value that compares less (IEEE nextDown).
    pub fn next_down(&self) -> Mpf {
        self.negated().next_up().negated()
    }

    /// Round to an integral value in the same format, keeping the sign of
    /// zero results.
    pub fn round_to_integral(&self, rm: RoundingMode) -> Mpf {
        if !self.is_finite() || self.is_zero() {
            return self.clone();
        }
        let n = round_integer(rm, &self.value());
        if n.is_zero() {
            Mpf::zero(self.format, self.sign)
        } else {
            Mpf::from_rational(self.format, RoundingMode::RNE, &Rational::from_integer(n))
        }
    }

    /// IEEE total ordering on non-NaN values where `-0 == +0`.
    pub fn partial_cmp_value(&self, other: &Mpf) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => Some(other.sign.cmp(&self.sign)),
            (true, false) => Some(if self.sign { Ordering::Less } else { Ordering::Greater }),
            (false, true) => Some(if other.sign { Ordering::Greater } else { Ordering::Less }),
            (false, false) => Some(self.value().cmp(&other.value())),
        }
    }

    pub fn smtlib_sort(&self) -> String {
        self.format.smtlib_sort()
    }

    /// The `(fp sign exponent significand)` literal.
    pub fn smtlib_literal(&self) -> String {
        format!(
            "(fp #b{} #b{:0>ew$b} #b{:0>tw$b})",
            self.sign as u8,
            self.exponent,
            self.significand,
            ew = self.format.eb as usize,
            tw = self.format.t() as usize,
        )
    }

    /// One of the equivalent spellings of this value, chosen at random.
    pub fn smtlib_random_literal<R: Rng>(&self, rng: &mut R) -> String {
        let f = self.format;
        let special = if self.is_nan() {
            Some(format!("(_ NaN {} {})", f.eb, f.sb))
        } else if self.is_infinite() {
            Some(format!("(_ {}oo {} {})", if self.sign { "-" } else { "+" }, f.eb, f.sb))
        } else if self.is_zero() {
            Some(format!("(_ {}zero {} {})", if self.sign { "-" } else { "+" }, f.eb, f.sb))
        } else {
            None
        };
        match (special, rng.gen_range(0..3)) {
            (Some(text), 0) => text,
            (_, 1) => format!(
                "({} {})",
                f.smtlib_to_fp(),
                self.to_bitvector().smtlib_random_literal(rng)
            ),
            _ => self.smtlib_literal(),
        }
    }
}

/// Round a rational to an integer under `rm`.
pub fn round_integer(rm: RoundingMode, q: &Rational) -> BigInt {
    let negative = q.is_negative();
    let (floor, rest) = rational::floor_split(&q.abs());
    let magnitude = if !rest.is_zero()
        && rm.rounds_away(rest.cmp(&rational::half()), floor.is_odd(), negative)
    {
        floor + 1
    } else {
        floor
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

impl fmt::Display for Mpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = if self.sign { "-" } else { "+" };
        if self.is_nan() {
            write!(f, "NaN")
        } else if self.is_infinite() {
            write!(f, "{}inf", s)
        } else if self.is_zero() {
            write!(f, "{}0", s)
        } else {
            write!(f, "{}", self.value())
        }
    }
}
