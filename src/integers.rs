//! Integer magnitudes for conversions from integers to floats.
//!
//! Magnitudes are classified against two thresholds of the target format:
//! `2^sb`, below which every integer is exact, and `inf_boundary`, from which
//! on everything rounds to infinity. Between the two, integers that lie
//! exactly halfway between neighbouring floats exercise tie breaking.

use std::fmt;

use log::debug;
use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::entropy::Entropy;
use crate::error::{GenError, GenResult};
use crate::mpf::{Format, Mpf};
use crate::ops::Operator;
use crate::rational::{self, Rational};
use crate::rounding::RoundingMode;
use crate::vectors::{rounding_modes, Expectation, History};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntClass {
    /// 0
    Zero,
    /// `[1, 2^sb]`
    PreciseInt,
    /// A tie moved by one, so never a tie.
    RoundedInt,
    /// A tie above `2^sb`.
    HalfpointInt,
    /// Exactly `inf_boundary`.
    InfBoundary,
    /// Beyond `inf_boundary`.
    Inf,
}

impl IntClass {
    pub const ALL: [IntClass; 6] = [
        IntClass::Zero,
        IntClass::PreciseInt,
        IntClass::RoundedInt,
        IntClass::HalfpointInt,
        IntClass::InfBoundary,
        IntClass::Inf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntClass::Zero => "zero",
            IntClass::PreciseInt => "precise_int",
            IntClass::RoundedInt => "rounded_int",
            IntClass::HalfpointInt => "halfpoint_int",
            IntClass::InfBoundary => "inf_boundary",
            IntClass::Inf => "inf",
        }
    }
}

impl fmt::Display for IntClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntVector {
    pub op: Operator,
    pub rounding: RoundingMode,
    pub expectation: Expectation,
    pub format: Format,
    pub class: IntClass,
    pub value: BigInt,
    pub comment: String,
}

fn pow2_int(e: u32) -> BigInt {
    BigInt::one() << e as usize
}

fn integral(q: &Rational, what: &str) -> GenResult<BigInt> {
    if rational::is_integral(q) {
        Ok(q.to_integer())
    } else {
        Err(GenError::construction(format!("{} {} is not an integer", what, q)))
    }
}

/// The integer halfway between the float `n` truncates to and its neighbour
/// away from zero (towards zero when there is no finite neighbour). Requires
/// `n >= 2^sb` so that the midpoint is integral.
pub fn mk_int_halfpoint(format: Format, n: &BigInt) -> GenResult<BigInt> {
    if *n < pow2_int(format.sb) {
        return Err(GenError::construction(format!(
            "{} is below 2^{} and has no integral tie in {}",
            n, format.sb, format
        )));
    }
    let truncated = Mpf::from_rational(format, RoundingMode::RTZ, &rational::int(n.clone()));
    let q1 = integral(&truncated.value(), "truncated value")?;
    let mut neighbour = truncated.next_up();
    if neighbour.is_infinite() {
        neighbour = truncated.next_down();
    }
    let q2 = integral(&neighbour.value(), "neighbour")?;
    let sum = q1 + q2;
    if !(&sum % 2u32).is_zero() {
        return Err(GenError::construction(format!("tie near {} is not integral", n)));
    }
    Ok(sum / 2u32)
}

fn draw_between(
    entropy: &mut Entropy,
    format: Format,
    class: IntClass,
    low: &BigInt,
    high: &BigInt,
) -> GenResult<BigInt> {
    if low > high {
        return Err(GenError::construction(format!(
            "{} has no {} magnitudes: [{}, {}] is empty",
            format, class, low, high
        )));
    }
    Ok(entropy.randint(low, high))
}

/// Draw a non-negative magnitude of `class` for `format`.
pub fn sample(class: IntClass, format: Format, entropy: &mut Entropy) -> GenResult<BigInt> {
    let exact_limit = pow2_int(format.sb);
    let inf = integral(&format.inf_boundary(), "inf_boundary")?;
    let value = match class {
        IntClass::Zero => BigInt::zero(),
        IntClass::PreciseInt => entropy.randint(&BigInt::one(), &exact_limit),
        IntClass::RoundedInt => {
            // starting one float step above 2^(sb+1) keeps hp - 1 above
            // 2^(sb+1) + 1
            let low = pow2_int(format.sb + 1) + 4;
            let n = draw_between(entropy, format, class, &low, &(&inf - 1))?;
            let hp = mk_int_halfpoint(format, &n)?;
            if entropy.coin() {
                hp + 1
            } else {
                hp - 1
            }
        }
        IntClass::HalfpointInt => {
            let n = draw_between(entropy, format, class, &(&exact_limit + 1), &(&inf - 1))?;
            mk_int_halfpoint(format, &n)?
        }
        IntClass::InfBoundary => inf,
        IntClass::Inf => {
            let step = entropy.randint(&BigInt::one(), &inf);
            inf + step
        }
    };
    Ok(value)
}

/// Generate integer vectors for `op` over `formats`, reseeding per draw and
/// deduplicating by value within each (class, format, rounding mode).
pub fn gen_int_vectors<F>(
    op: &Operator,
    formats: &[Format],
    test_dup: u32,
    entropy: &mut Entropy,
    mut sink: F,
) -> GenResult<usize>
where
    F: FnMut(IntVector, &mut Entropy) -> GenResult<()>,
{
    let mut accepted = 0;
    for rm in rounding_modes(op) {
        for &format in formats {
            for class in IntClass::ALL {
                let mut history = History::new();
                let comment = format!("({} {} {})", op.name, rm.name(), class.name());
                for duplicate in 0..test_dup {
                    entropy.reseed(&format!(
                        "{}__{}_{}__{}__{}__{}",
                        op.name,
                        format.eb,
                        format.sb,
                        rm.name(),
                        class.name(),
                        duplicate
                    ));
                    let expectation = Expectation::random(entropy);
                    let mut value = sample(class, format, entropy)?;
                    if entropy.coin() {
                        value = -value;
                    }
                    if !history.accept(value.clone()) {
                        debug!("dropping duplicate {} = {}", comment, value);
                        continue;
                    }
                    accepted += 1;
                    let vector = IntVector {
                        op: *op,
                        rounding: rm,
                        expectation,
                        format,
                        class,
                        value,
                        comment: comment.clone(),
                    };
                    sink(vector, entropy)?;
                }
            }
        }
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Signed;

    #[test]
    fn test_halfpoint_is_midpoint() {
        let f = Format::FLOAT32;
        // above 2^25 floats are 4 apart
        let n = pow2_int(25) + 5;
        let hp = mk_int_halfpoint(f, &n).unwrap();
        assert_eq!(hp, pow2_int(25) + 6);
        let down = Mpf::from_rational(f, RoundingMode::RTZ, &rational::int(hp.clone()));
        let away = Mpf::from_rational(f, RoundingMode::RNA, &rational::int(hp));
        assert_eq!(down.value(), rational::int(pow2_int(25) + 4));
        assert_eq!(away.value(), rational::int(pow2_int(25) + 8));
    }

    #[test]
    fn test_halfpoint_at_largest_float_looks_down() {
        let f = Format::FLOAT32;
        let max = Mpf::max_normal(f, false).value().to_integer();
        let hp = mk_int_halfpoint(f, &max).unwrap();
        assert!(hp < max);
        assert_eq!(hp, max - pow2_int(103));
    }

    #[test]
    fn test_halfpoint_rejects_small_values() {
        assert!(mk_int_halfpoint(Format::FLOAT32, &BigInt::from(1000)).is_err());
    }

    #[test]
    fn test_sample_ranges() {
        let f = Format::FLOAT32;
        let inf = f.inf_boundary().to_integer();
        let mut entropy = Entropy::new("");
        for i in 0..200 {
            entropy.reseed(&format!("ranges__{}", i));
            let precise = sample(IntClass::PreciseInt, f, &mut entropy).unwrap();
            assert!(precise >= BigInt::one() && precise <= pow2_int(24));
            let rounded = sample(IntClass::RoundedInt, f, &mut entropy).unwrap();
            assert!(rounded > pow2_int(25) + 1 && rounded < &inf - 1, "{}", rounded);
            let hp = sample(IntClass::HalfpointInt, f, &mut entropy).unwrap();
            assert!(hp > pow2_int(24) && hp < inf);
            let beyond = sample(IntClass::Inf, f, &mut entropy).unwrap();
            assert!(beyond > inf);
        }
        assert_eq!(sample(IntClass::InfBoundary, f, &mut entropy).unwrap(), inf);
    }

    #[test]
    fn test_narrow_exponent_range_is_an_error() {
        // emax == sb: inf_boundary is 2^(sb+1) - 1, leaving no room above 2^(sb+1)
        let f = Format::new(3, 3);
        assert_eq!(f.inf_boundary(), rational::int(15));
        let mut entropy = Entropy::new("");
        assert!(matches!(
            sample(IntClass::RoundedInt, f, &mut entropy),
            Err(GenError::Construction(_))
        ));
        assert!(sample(IntClass::PreciseInt, f, &mut entropy).is_ok());
    }

    #[test]
    fn test_rounded_ints_are_not_ties() {
        let f = Format::FLOAT64;
        let mut entropy = Entropy::new("");
        for i in 0..50 {
            entropy.reseed(&format!("rounded__{}", i));
            let n = sample(IntClass::RoundedInt, f, &mut entropy).unwrap();
            let q = rational::int(n);
            let rne = Mpf::from_rational(f, RoundingMode::RNE, &q);
            let rna = Mpf::from_rational(f, RoundingMode::RNA, &q);
            assert_eq!(rne, rna);
        }
    }

    #[test]
    fn test_int_vectors_deduplicate_per_class() {
        let op = Operator::named("fp.from.int");
        let mut entropy = Entropy::new("");
        let mut vectors = Vec::new();
        gen_int_vectors(&op, &[Format::FLOAT32], 4, &mut entropy, |v, _| {
            vectors.push(v);
            Ok(())
        })
        .unwrap();
        let zeros = vectors.iter().filter(|v| v.class == IntClass::Zero).count();
        // zero is one value per rounding mode
        assert_eq!(zeros, 5);
        let boundaries: Vec<_> = vectors
            .iter()
            .filter(|v| v.class == IntClass::InfBoundary && v.rounding == RoundingMode::RNE)
            .collect();
        assert!(!boundaries.is_empty() && boundaries.len() <= 2);
        assert!(boundaries.iter().all(|v| v.value.abs() == Format::FLOAT32.inf_boundary().to_integer()));
    }
}
