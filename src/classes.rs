//! Named float classes and the registry the enumerator walks.
//!
//! A class is a kind of value (zero, subnormal, halfpoint, ...) paired with a
//! sign policy. Construction only draws from the random stream it is handed,
//! and a constructed value never leaves its class. The registry is sorted by
//! class name; that order fixes enumeration indices.

use std::fmt;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;

use crate::bitvector::BitVector;
use crate::mpf::{Format, Mpf};
use crate::ops::Operator;
use crate::rational::{self, Rational};
use crate::rounding::RoundingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
    /// Decided by a coin flip at construction time.
    Random,
}

impl Sign {
    fn prefix(self) -> &'static str {
        match self {
            Sign::Positive => "+",
            Sign::Negative => "-",
            Sign::Random => "",
        }
    }

    fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        match self {
            Sign::Positive => false,
            Sign::Negative => true,
            Sign::Random => rng.gen::<bool>(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Zero,
    MinSubnormal,
    Subnormal,
    MaxSubnormal,
    MinNormal,
    Normal,
    /// An integer plus one half.
    Halfpoint,
    MaxNormal,
    Infinity,
    NaN,
    /// Smallest (negative sign) or largest signed integer of a bitvector width.
    SignedBound(usize),
    /// Zero (negative sign) or the largest unsigned integer of a bitvector width.
    UnsignedBound(usize),
}

impl ClassKind {
    fn stem(self) -> String {
        match self {
            ClassKind::Zero => "0".to_string(),
            ClassKind::MinSubnormal => "minsub".to_string(),
            ClassKind::Subnormal => "subnormal".to_string(),
            ClassKind::MaxSubnormal => "maxsub".to_string(),
            ClassKind::MinNormal => "minnormal".to_string(),
            ClassKind::Normal => "normal".to_string(),
            ClassKind::Halfpoint => "halfpoint".to_string(),
            ClassKind::MaxNormal => "maxnormal".to_string(),
            ClassKind::Infinity => "inf".to_string(),
            ClassKind::NaN => "nan".to_string(),
            ClassKind::SignedBound(width) => format!("sbv_{}_bound", width),
            ClassKind::UnsignedBound(width) => format!("ubv_{}_bound", width),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatClass {
    name: String,
    kind: ClassKind,
    sign: Sign,
}

impl FloatClass {
    pub fn new(kind: ClassKind, sign: Sign) -> FloatClass {
        // NaN has no meaningful sign; its sign bit is always random.
        let sign = if kind == ClassKind::NaN { Sign::Random } else { sign };
        FloatClass {
            name: format!("{}{}", sign.prefix(), kind.stem()),
            kind,
            sign,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Build a value of this class in `format`.
    pub fn construct<R: Rng + ?Sized>(&self, format: Format, rng: &mut R) -> Mpf {
        let t_limit = BigUint::one() << format.t();
        let max_exponent = format.max_exponent_field();
        match self.kind {
            ClassKind::Zero => Mpf::zero(format, self.sign.resolve(rng)),
            ClassKind::Infinity => Mpf::infinity(format, self.sign.resolve(rng)),
            ClassKind::MinSubnormal => Mpf::min_subnormal(format, self.sign.resolve(rng)),
            ClassKind::MaxSubnormal => {
                let sign = self.sign.resolve(rng);
                Mpf::pack(format, sign, 0, format.max_significand_field())
            }
            ClassKind::Subnormal => {
                let sign = self.sign.resolve(rng);
                let t = rng.gen_biguint_range(&BigUint::one(), &t_limit);
                Mpf::pack(format, sign, 0, t)
            }
            ClassKind::MinNormal => {
                let sign = self.sign.resolve(rng);
                Mpf::pack(format, sign, 1, BigUint::zero())
            }
            ClassKind::MaxNormal => Mpf::max_normal(format, self.sign.resolve(rng)),
            ClassKind::Normal => {
                let sign = self.sign.resolve(rng);
                let e = rng.gen_range(1..max_exponent);
                let t = rng.gen_biguint_range(&BigUint::zero(), &t_limit);
                Mpf::pack(format, sign, e, t)
            }
            ClassKind::NaN => {
                let sign = rng.gen::<bool>();
                let t = rng.gen_biguint_range(&BigUint::one(), &t_limit);
                Mpf::pack(format, sign, max_exponent, t)
            }
            ClassKind::Halfpoint => {
                let limit = BigUint::one() << (format.precision() - 1) as usize;
                let i = rng.gen_biguint_range(&BigUint::zero(), &limit);
                let mut x = Mpf::from_rational(format, RoundingMode::RNE, &halfpoint(&i));
                x.set_sign(self.sign.resolve(rng));
                x
            }
            ClassKind::SignedBound(width) => {
                let n = if self.sign.resolve(rng) {
                    BitVector::min_signed(width)
                } else {
                    BitVector::max_signed(width)
                };
                Mpf::from_rational(format, RoundingMode::RNE, &rational::int(n))
            }
            ClassKind::UnsignedBound(width) => {
                let n = if self.sign.resolve(rng) {
                    BitVector::min_unsigned(width)
                } else {
                    BitVector::max_unsigned(width)
                };
                Mpf::from_rational(format, RoundingMode::RNE, &rational::int(n))
            }
        }
    }
}

impl fmt::Display for FloatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The tie `(2i + 1) / 2`.
pub fn halfpoint(i: &BigUint) -> Rational {
    let numerator = BigInt::from(i.clone()) * 2 + 1;
    Rational::new(numerator, BigInt::from(2))
}

/// Immutable, name-sorted class table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    classes: Vec<FloatClass>,
}

impl Registry {
    /// Sorts by name and drops later classes whose name repeats an earlier one.
    pub fn new(mut classes: Vec<FloatClass>) -> Registry {
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        classes.dedup_by(|a, b| a.name == b.name);
        Registry { classes }
    }

    /// The nineteen classes used for most operators.
    pub fn standard() -> Registry {
        Registry::new(Registry::standard_classes())
    }

    fn standard_classes() -> Vec<FloatClass> {
        use ClassKind::*;
        let signed = [
            Zero,
            MinSubnormal,
            Subnormal,
            MaxSubnormal,
            MinNormal,
            Normal,
            Halfpoint,
            MaxNormal,
            Infinity,
        ];
        let mut classes = Vec::with_capacity(2 * signed.len() + 1);
        for kind in signed {
            classes.push(FloatClass::new(kind, Sign::Negative));
            classes.push(FloatClass::new(kind, Sign::Positive));
        }
        classes.push(FloatClass::new(NaN, Sign::Random));
        classes
    }

    /// Conversions to bitvectors trade the subnormal extremes, which all
    /// round to zero anyway, for values on the 8-bit integer boundaries.
    pub fn for_bitvector_conversion() -> Registry {
        let mut classes: Vec<FloatClass> = Registry::standard_classes()
            .into_iter()
            .filter(|c| !matches!(c.kind, ClassKind::MinSubnormal | ClassKind::MaxSubnormal))
            .collect();
        classes.push(FloatClass::new(ClassKind::SignedBound(8), Sign::Negative));
        classes.push(FloatClass::new(ClassKind::SignedBound(8), Sign::Positive));
        classes.push(FloatClass::new(ClassKind::UnsignedBound(8), Sign::Positive));
        Registry::new(classes)
    }

    pub fn for_operator(op: &Operator) -> Registry {
        match op.name {
            "fp.to.ubv" | "fp.to.sbv" => Registry::for_bitvector_conversion(),
            _ => Registry::standard(),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FloatClass> {
        self.classes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatClass> {
        self.classes.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name()).collect()
    }

    pub fn find(&self, name: &str) -> Option<&FloatClass> {
        self.classes
            .binary_search_by(|c| c.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.classes[i])
    }
}
