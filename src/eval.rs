//! Reference semantics for the floating-point operators.
//!
//! Every operation computes the exact rational result and rounds once, so the
//! expected answers written into benchmarks are correct by construction.
//! Partial operations (the ones SMT-LIB leaves unspecified) return
//! [`Outcome::Unspecified`] instead of a value and the caller decides whether
//! to skip the benchmark or to fall back to an arbitrary answer.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::bitvector::BitVector;
use crate::error::{GenError, GenResult};
use crate::mpf::{round_integer, Format, Mpf};
use crate::ops::Operator;
use crate::rational::{self, Rational};
use crate::rounding::RoundingMode;

/// Result of an operation that may be undefined for some inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Value(T),
    Unspecified,
}

impl<T> Outcome<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Unspecified => None,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, Outcome::Unspecified)
    }
}

fn check_operands(op: &Operator, args: &[Mpf]) -> GenResult<()> {
    if args.len() != op.arity {
        return Err(GenError::evaluation(format!(
            "{} expects {} operands, got {}",
            op.name,
            op.arity,
            args.len()
        )));
    }
    if let Some(first) = args.first() {
        if args.iter().any(|a| !a.compatible(first)) {
            return Err(GenError::evaluation(format!(
                "{} applied to operands of different formats",
                op.name
            )));
        }
    }
    Ok(())
}

/// Evaluate a classification predicate or a relation.
pub fn fp_eval_predicate(op: &Operator, args: &[Mpf]) -> GenResult<bool> {
    check_operands(op, args)?;
    let result = match (op.name, args) {
        ("fp.isNormal", [x]) => x.is_normal(),
        ("fp.isSubnormal", [x]) => x.is_subnormal(),
        ("fp.isZero", [x]) => x.is_zero(),
        ("fp.isInfinite", [x]) => x.is_infinite(),
        ("fp.isNaN", [x]) => x.is_nan(),
        ("fp.isNegative", [x]) => x.is_negative(),
        ("fp.isPositive", [x]) => x.is_positive(),
        ("fp.eq", [x, y]) => x.partial_cmp_value(y).map_or(false, |o| o.is_eq()),
        ("fp.lt", [x, y]) => x.partial_cmp_value(y).map_or(false, |o| o.is_lt()),
        ("fp.leq", [x, y]) => x.partial_cmp_value(y).map_or(false, |o| o.is_le()),
        ("fp.gt", [x, y]) => x.partial_cmp_value(y).map_or(false, |o| o.is_gt()),
        ("fp.geq", [x, y]) => x.partial_cmp_value(y).map_or(false, |o| o.is_ge()),
        ("smtlib.eq", [x, y]) => smtlib_eq(x, y),
        _ => {
            return Err(GenError::evaluation(format!(
                "{} is not a predicate",
                op.name
            )))
        }
    };
    Ok(result)
}

/// Evaluate a float-valued operator.
pub fn fp_eval_function(op: &Operator, rm: RoundingMode, args: &[Mpf]) -> GenResult<Outcome<Mpf>> {
    check_operands(op, args)?;
    use Outcome::Value;
    let result = match (op.name, args) {
        ("fp.abs", [x]) => Value(x.abs()),
        ("fp.neg", [x]) => Value(x.negated()),
        ("fp.sqrt", [x]) => Value(fp_sqrt(rm, x)),
        ("fp.roundToIntegral", [x]) => Value(fp_round_to_integral(rm, x)),
        ("fp.add", [x, y]) => Value(fp_add(rm, x, y)),
        ("fp.sub", [x, y]) => Value(fp_sub(rm, x, y)),
        ("fp.mul", [x, y]) => Value(fp_mul(rm, x, y)),
        ("fp.div", [x, y]) => Value(fp_div(rm, x, y)),
        ("fp.rem", [x, y]) => Value(fp_rem(x, y)),
        ("fp.min", [x, y]) => fp_min(x, y),
        ("fp.max", [x, y]) => fp_max(x, y),
        ("fp.fma", [x, y, z]) => Value(fp_fma(rm, x, y, z)),
        _ => {
            return Err(GenError::evaluation(format!(
                "{} is not a float function",
                op.name
            )))
        }
    };
    Ok(result)
}

/// SMT-LIB `=`: identical encodings, except that all NaNs are one value.
pub fn smtlib_eq(x: &Mpf, y: &Mpf) -> bool {
    (x.is_nan() && y.is_nan()) || x == y
}

// The sign of an exact zero sum: -0 only when both addends are -0, or when
// rounding toward negative.
fn zero_sum(format: Format, rm: RoundingMode, a_zero_sign: Option<bool>, b_zero_sign: Option<bool>) -> Mpf {
    match (a_zero_sign, b_zero_sign) {
        (Some(a), Some(b)) if a == b => Mpf::zero(format, a),
        _ => Mpf::zero(format, rm == RoundingMode::RTN),
    }
}

fn zero_sign(x: &Mpf) -> Option<bool> {
    if x.is_zero() {
        Some(x.sign())
    } else {
        None
    }
}

pub fn fp_add(rm: RoundingMode, x: &Mpf, y: &Mpf) -> Mpf {
    let f = x.format();
    if x.is_nan() || y.is_nan() {
        return Mpf::nan(f);
    }
    match (x.is_infinite(), y.is_infinite()) {
        (true, true) if x.sign() != y.sign() => return Mpf::nan(f),
        (true, _) => return x.clone(),
        (false, true) => return y.clone(),
        _ => {}
    }
    let q = x.value() + y.value();
    if q.is_zero() {
        zero_sum(f, rm, zero_sign(x), zero_sign(y))
    } else {
        Mpf::from_rational(f, rm, &q)
    }
}

pub fn fp_sub(rm: RoundingMode, x: &Mpf, y: &Mpf) -> Mpf {
    if y.is_nan() {
        return Mpf::nan(x.format());
    }
    fp_add(rm, x, &y.negated())
}

pub fn fp_mul(rm: RoundingMode, x: &Mpf, y: &Mpf) -> Mpf {
    let f = x.format();
    let sign = x.sign() != y.sign();
    if x.is_nan() || y.is_nan() {
        return Mpf::nan(f);
    }
    if x.is_infinite() || y.is_infinite() {
        if x.is_zero() || y.is_zero() {
            return Mpf::nan(f);
        }
        return Mpf::infinity(f, sign);
    }
    if x.is_zero() || y.is_zero() {
        return Mpf::zero(f, sign);
    }
    Mpf::from_rational(f, rm, &(x.value() * y.value()))
}

pub fn fp_div(rm: RoundingMode, x: &Mpf, y: &Mpf) -> Mpf {
    let f = x.format();
    let sign = x.sign() != y.sign();
    if x.is_nan() || y.is_nan() {
        return Mpf::nan(f);
    }
    match (x.is_infinite(), y.is_infinite()) {
        (true, true) => return Mpf::nan(f),
        (true, false) => return Mpf::infinity(f, sign),
        (false, true) => return Mpf::zero(f, sign),
        _ => {}
    }
    match (x.is_zero(), y.is_zero()) {
        (true, true) => Mpf::nan(f),
        (false, true) => Mpf::infinity(f, sign),
        (true, false) => Mpf::zero(f, sign),
        (false, false) => Mpf::from_rational(f, rm, &(x.value() / y.value())),
    }
}

pub fn fp_fma(rm: RoundingMode, x: &Mpf, y: &Mpf, z: &Mpf) -> Mpf {
    let f = x.format();
    let product_sign = x.sign() != y.sign();
    if x.is_nan() || y.is_nan() || z.is_nan() {
        return Mpf::nan(f);
    }
    let product_infinite = x.is_infinite() || y.is_infinite();
    if product_infinite && (x.is_zero() || y.is_zero()) {
        return Mpf::nan(f);
    }
    if product_infinite {
        if z.is_infinite() && z.sign() != product_sign {
            return Mpf::nan(f);
        }
        return Mpf::infinity(f, product_sign);
    }
    if z.is_infinite() {
        return z.clone();
    }
    let product = x.value() * y.value();
    let product_zero = if product.is_zero() {
        Some(product_sign)
    } else {
        None
    };
    let q = product + z.value();
    if q.is_zero() {
        zero_sum(f, rm, product_zero, zero_sign(z))
    } else {
        Mpf::from_rational(f, rm, &q)
    }
}

pub fn fp_sqrt(rm: RoundingMode, x: &Mpf) -> Mpf {
    let f = x.format();
    if x.is_nan() || (x.sign() && !x.is_zero()) {
        return Mpf::nan(f);
    }
    if x.is_zero() || x.is_infinite() {
        return x.clone();
    }
    Mpf::from_rational(f, rm, &sqrt_sticky(&x.value(), f.precision()))
}

// A rational that rounds exactly like sqrt(q) in any format of precision at
// most `p`. `q` must be positive with a power-of-two denominator: the root is
// taken on a dyadic grid fine enough that no rounding boundary falls strictly
// between two grid points, and an inexact root is replaced by the midpoint
// of its grid cell.
fn sqrt_sticky(q: &Rational, p: i64) -> Rational {
    let a = q.numer();
    let b = q.denom();
    let ab = a * b;
    let need = 2 * (p + 3) - ab.bits() as i64;
    let k = if need > 0 { need / 2 + 1 } else { 0 };
    let n = ab << (2 * k) as usize;
    let m = n.sqrt();
    let sticky: u32 = if &m * &m == n { 0 } else { 1 };
    let denominator = b * (BigInt::one() << (k + 1) as usize);
    Rational::new(m * 2u32 + sticky, denominator)
}

pub fn fp_round_to_integral(rm: RoundingMode, x: &Mpf) -> Mpf {
    if x.is_nan() {
        return Mpf::nan(x.format());
    }
    x.round_to_integral(rm)
}

/// IEEE remainder: `x - y * n` with `n` the integer nearest to `x / y`
/// (ties to even). The result is always exact.
pub fn fp_rem(x: &Mpf, y: &Mpf) -> Mpf {
    let f = x.format();
    if x.is_nan() || y.is_nan() || x.is_infinite() || y.is_zero() {
        return Mpf::nan(f);
    }
    if y.is_infinite() || x.is_zero() {
        return x.clone();
    }
    let (vx, vy) = (x.value(), y.value());
    let n = round_integer(RoundingMode::RNE, &(&vx / &vy));
    let r = vx - vy * Rational::from_integer(n);
    if r.is_zero() {
        Mpf::zero(f, x.sign())
    } else {
        Mpf::from_rational(f, RoundingMode::RNE, &r)
    }
}

fn min_max(x: &Mpf, y: &Mpf, want_less: bool) -> Outcome<Mpf> {
    if x.is_nan() {
        return Outcome::Value(y.clone());
    }
    if y.is_nan() {
        return Outcome::Value(x.clone());
    }
    if x.is_zero() && y.is_zero() && x.sign() != y.sign() {
        return Outcome::Unspecified;
    }
    let x_first = match x.partial_cmp_value(y) {
        Some(o) if want_less => o.is_le(),
        Some(o) => o.is_ge(),
        None => true,
    };
    Outcome::Value(if x_first { x.clone() } else { y.clone() })
}

pub fn fp_min(x: &Mpf, y: &Mpf) -> Outcome<Mpf> {
    min_max(x, y, true)
}

pub fn fp_max(x: &Mpf, y: &Mpf) -> Outcome<Mpf> {
    min_max(x, y, false)
}

pub fn fp_from_float(format: Format, rm: RoundingMode, x: &Mpf) -> Mpf {
    x.convert(format, rm)
}

fn fp_to_bitvector(rm: RoundingMode, x: &Mpf, min: BigInt, max: BigInt, width: usize) -> Outcome<BitVector> {
    if !x.is_finite() {
        return Outcome::Unspecified;
    }
    let n = round_integer(rm, &x.value());
    if n < min || n > max {
        return Outcome::Unspecified;
    }
    Outcome::Value(BitVector::from_signed(width, &n))
}

pub fn fp_to_ubv(rm: RoundingMode, x: &Mpf, width: usize) -> Outcome<BitVector> {
    fp_to_bitvector(
        rm,
        x,
        BitVector::min_unsigned(width),
        BitVector::max_unsigned(width),
        width,
    )
}

pub fn fp_to_sbv(rm: RoundingMode, x: &Mpf, width: usize) -> Outcome<BitVector> {
    fp_to_bitvector(
        rm,
        x,
        BitVector::min_signed(width),
        BitVector::max_signed(width),
        width,
    )
}

pub fn fp_to_int(rm: RoundingMode, x: &Mpf) -> Outcome<BigInt> {
    if !x.is_finite() {
        return Outcome::Unspecified;
    }
    Outcome::Value(round_integer(rm, &x.value()))
}

pub fn fp_to_real(x: &Mpf) -> Outcome<Rational> {
    match x.to_rational() {
        Some(q) => Outcome::Value(q),
        None => Outcome::Unspecified,
    }
}

/// The exact value of an unsigned or signed bitvector rounded into `format`.
pub fn fp_from_bitvector(format: Format, rm: RoundingMode, bv: &BitVector, signed: bool) -> Mpf {
    let n = if signed {
        bv.to_signed()
    } else {
        BigInt::from(bv.to_unsigned())
    };
    Mpf::from_rational(format, rm, &rational::int(n))
}
