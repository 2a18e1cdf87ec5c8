//! Rational intervals that round onto a given float.
//!
//! For a float `x` and rounding mode `rm` the set of rationals `q` with
//! `to_fp(rm, q) == x` is an interval. Its endpoints are either neighbouring
//! floats or midpoints between neighbours, and whether an endpoint belongs to
//! the set is decided by the tie-breaking rule of the mode. Sampling inside,
//! on and just outside these intervals produces conversions whose rounding
//! is as tight as it can get.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use rand::Rng;

use crate::entropy::randint;
use crate::mpf::Mpf;
use crate::rational::{self, Rational};
use crate::rounding::RoundingMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Infinite,
    Inclusive(Rational),
    Exclusive(Rational),
}

impl Bound {
    pub fn value(&self) -> Option<&Rational> {
        match self {
            Bound::Infinite => None,
            Bound::Inclusive(q) | Bound::Exclusive(q) => Some(q),
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Bound::Infinite)
    }

    fn inclusive_if(value: Rational, inclusive: bool) -> Bound {
        if inclusive {
            Bound::Inclusive(value)
        } else {
            Bound::Exclusive(value)
        }
    }

    fn negated(&self) -> Bound {
        match self {
            Bound::Infinite => Bound::Infinite,
            Bound::Inclusive(q) => Bound::Inclusive(-q),
            Bound::Exclusive(q) => Bound::Exclusive(-q),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub low: Bound,
    pub high: Bound,
}

impl Interval {
    pub fn new(low: Bound, high: Bound) -> Interval {
        Interval { low, high }
    }

    pub fn contains(&self, q: &Rational) -> bool {
        let above_low = match &self.low {
            Bound::Infinite => true,
            Bound::Inclusive(l) => q >= l,
            Bound::Exclusive(l) => q > l,
        };
        let below_high = match &self.high {
            Bound::Infinite => true,
            Bound::Inclusive(h) => q <= h,
            Bound::Exclusive(h) => q < h,
        };
        above_low && below_high
    }

    fn negated(&self) -> Interval {
        Interval {
            low: self.high.negated(),
            high: self.low.negated(),
        }
    }

    /// The rationals that round to `x` under `rm`, or `None` when no rational
    /// does (NaN, and signed zeros or infinities the mode can never reach).
    pub fn of(rm: RoundingMode, x: &Mpf) -> Option<Interval> {
        if x.is_nan() {
            return None;
        }
        if x.is_zero() {
            return Interval::of_zero(rm, x);
        }
        if x.sign() {
            let mirrored = match rm {
                RoundingMode::RTP => RoundingMode::RTN,
                RoundingMode::RTN => RoundingMode::RTP,
                other => other,
            };
            return Interval::of_positive(mirrored, &x.negated()).map(|i| i.negated());
        }
        Interval::of_positive(rm, x)
    }

    fn of_zero(rm: RoundingMode, x: &Mpf) -> Option<Interval> {
        let f = x.format();
        let minsub = Mpf::min_subnormal(f, false).value();
        let half_minsub = &minsub * rational::half();
        let zero = Rational::zero();
        let interval = match (x.sign(), rm) {
            (false, RoundingMode::RNE) => {
                Interval::new(Bound::Inclusive(zero), Bound::Inclusive(half_minsub))
            }
            (false, RoundingMode::RNA) => {
                Interval::new(Bound::Inclusive(zero), Bound::Exclusive(half_minsub))
            }
            (false, RoundingMode::RTZ) | (false, RoundingMode::RTN) => {
                Interval::new(Bound::Inclusive(zero), Bound::Exclusive(minsub))
            }
            (false, RoundingMode::RTP) => {
                Interval::new(Bound::Inclusive(zero.clone()), Bound::Inclusive(zero))
            }
            (true, RoundingMode::RNE) => {
                Interval::new(Bound::Inclusive(-half_minsub), Bound::Exclusive(zero))
            }
            (true, RoundingMode::RNA) => {
                Interval::new(Bound::Exclusive(-half_minsub), Bound::Exclusive(zero))
            }
            (true, RoundingMode::RTZ) | (true, RoundingMode::RTP) => {
                Interval::new(Bound::Exclusive(-minsub), Bound::Exclusive(zero))
            }
            (true, RoundingMode::RTN) => return None,
        };
        Some(interval)
    }

    fn of_positive(rm: RoundingMode, x: &Mpf) -> Option<Interval> {
        let f = x.format();
        if x.is_infinite() {
            return match rm {
                RoundingMode::RNE | RoundingMode::RNA => Some(Interval::new(
                    Bound::Inclusive(f.inf_boundary()),
                    Bound::Infinite,
                )),
                RoundingMode::RTP => Some(Interval::new(
                    Bound::Exclusive(Mpf::max_normal(f, false).value()),
                    Bound::Infinite,
                )),
                RoundingMode::RTN | RoundingMode::RTZ => None,
            };
        }

        let v = x.value();
        let up = x.next_up();
        let down = x.next_down().value();
        let low_mid = (&down + &v) * rational::half();
        let high_mid = if up.is_infinite() {
            f.inf_boundary()
        } else {
            (&v + up.value()) * rational::half()
        };

        let interval = match rm {
            RoundingMode::RNE => Interval::new(
                Bound::inclusive_if(low_mid, x.is_even()),
                Bound::inclusive_if(high_mid, x.is_even()),
            ),
            RoundingMode::RNA => {
                Interval::new(Bound::Inclusive(low_mid), Bound::Exclusive(high_mid))
            }
            RoundingMode::RTZ | RoundingMode::RTN => {
                let high = if up.is_infinite() {
                    Bound::Infinite
                } else {
                    Bound::Exclusive(up.value())
                };
                Interval::new(Bound::Inclusive(v), high)
            }
            RoundingMode::RTP => Interval::new(Bound::Exclusive(down), Bound::Inclusive(v)),
        };
        Some(interval)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Infinite => write!(f, "oo"),
            Bound::Inclusive(q) => write!(f, "{} (inclusive)", q),
            Bound::Exclusive(q) => write!(f, "{} (exclusive)", q),
        }
    }
}

/// Draw a rational that respects both bounds.
///
/// Denominators stay bounded: a half-infinite interval is sampled on the
/// grid of its finite bound scaled by at most 10000, a finite one on the
/// common denominator scaled by 25. A degenerate finite interval yields the
/// low bound's value. Returns `None` only when both bounds are infinite.
pub fn random_rational<R: Rng>(rng: &mut R, low: &Bound, high: &Bound) -> Option<Rational> {
    match (low, high) {
        (Bound::Infinite, Bound::Infinite) => None,

        (Bound::Infinite, high) => {
            let q = high.value()?;
            let factor = scale_factor(q.denom());
            let mut high_a = q.numer() * &factor;
            let b = q.denom() * &factor;
            if matches!(high, Bound::Exclusive(_)) {
                high_a -= 1;
            }
            let low_a = -high_a.abs() - &factor;
            Some(Rational::new(randint(rng, &low_a, &high_a), b))
        }

        (low, Bound::Infinite) => {
            let q = low.value()?;
            let factor = scale_factor(q.denom());
            let mut low_a = q.numer() * &factor;
            let b = q.denom() * &factor;
            if matches!(low, Bound::Exclusive(_)) {
                low_a += 1;
            }
            let high_a = low_a.abs() + &factor;
            Some(Rational::new(randint(rng, &low_a, &high_a), b))
        }

        (low, high) => {
            let (l, h) = (low.value()?, high.value()?);
            let mut low_a = l.numer() * h.denom() * 25;
            let mut high_a = h.numer() * l.denom() * 25;
            let b = l.denom() * h.denom() * 25;
            if matches!(low, Bound::Exclusive(_)) {
                low_a += 1;
            }
            if matches!(high, Bound::Exclusive(_)) {
                high_a -= 1;
            }
            if low_a > high_a {
                return Some(l.clone());
            }
            Some(Rational::new(randint(rng, &low_a, &high_a), b))
        }
    }
}

// min(10000, denominator^3)
fn scale_factor(denominator: &BigInt) -> BigInt {
    let cubed = denominator * denominator * denominator;
    cubed.min(BigInt::from(10000))
}
