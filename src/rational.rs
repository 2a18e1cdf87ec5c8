//! Exact rational helpers on top of num-rational.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

pub type Rational = BigRational;

pub fn int(n: impl Into<BigInt>) -> Rational {
    Rational::from_integer(n.into())
}

pub fn frac(a: impl Into<BigInt>, b: impl Into<BigInt>) -> Rational {
    Rational::new(a.into(), b.into())
}

/// `2^e` for any signed exponent.
pub fn pow2(e: i64) -> Rational {
    if e >= 0 {
        Rational::from_integer(BigInt::one() << (e as usize))
    } else {
        Rational::new(BigInt::one(), BigInt::one() << ((-e) as usize))
    }
}

pub fn is_integral(q: &Rational) -> bool {
    q.denom().is_one()
}

pub fn half() -> Rational {
    frac(1, 2)
}

/// `floor(log2(|q|))` for nonzero `q`.
pub fn ilog2(q: &Rational) -> i64 {
    debug_assert!(!q.is_zero());
    let a = q.numer().abs();
    let b = q.denom();
    let mut e = a.bits() as i64 - b.bits() as i64;
    // a/b is now in [2^(e-1), 2^(e+1)); settle on one side
    if scale2(&a, -e) < *b {
        e -= 1;
    }
    e
}

// compare helper: a * 2^k as an integer-valued comparison target
fn scale2(a: &BigInt, k: i64) -> BigInt {
    if k >= 0 {
        a << (k as usize)
    } else {
        a >> ((-k) as usize)
    }
}

/// Split `q` into `floor(q)` and the remaining fraction in `[0, 1)`.
pub fn floor_split(q: &Rational) -> (BigInt, Rational) {
    let (d, _) = q.numer().div_mod_floor(q.denom());
    let rest = q - Rational::from_integer(d.clone());
    (d, rest)
}

/// Render an SMT-LIB real literal: `5.0`, `(/ 1.0 3.0)`, `(- (/ 7.0 2.0))`.
pub fn to_smtlib(q: &Rational) -> String {
    let body = if is_integral(q) {
        format!("{}.0", q.numer().abs())
    } else {
        format!("(/ {}.0 {}.0)", q.numer().abs(), q.denom())
    };
    if q.is_negative() {
        format!("(- {})", body)
    } else {
        body
    }
}

/// Render an SMT-LIB integer literal: `12` or `(- 12)`.
pub fn int_to_smtlib(n: &BigInt) -> String {
    if n.is_negative() {
        format!("(- {})", -n)
    } else {
        n.to_string()
    }
}
