//! Conversion families: between floats and bitvectors, reals, other float
//! formats and integers.
//!
//! Conversions are where SMT-LIB leaves results unspecified (NaN or infinity
//! to a bitvector, integer or real, out-of-range bitvector targets). Such
//! benchmarks are still written, with a random stand-in result, a forced
//! `sat` status and a note in the file.

use log::{info, warn};
use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::{write_vars, Emitter};
use crate::bitpattern::gen_bv_vectors;
use crate::bitvector::BitVector;
use crate::classes::Registry;
use crate::config::GeneratorConfig;
use crate::entropy::Entropy;
use crate::error::{GenError, GenResult};
use crate::eval::{
    fp_add, fp_from_bitvector, fp_from_float, fp_to_int, fp_to_real, fp_to_sbv, fp_to_ubv, Outcome,
};
use crate::integers::gen_int_vectors;
use crate::interval::{random_rational, Bound, Interval};
use crate::mpf::Mpf;
use crate::ops::Operator;
use crate::rational::{self, Rational};
use crate::rounding::RoundingMode;
use crate::smtlib::DEFAULT_LOGIC;
use crate::vectors::{gen_vectors, Expectation, TestVector};

pub(super) const OPERATORS: &[&str] = &[
    "fp.from.ubv",
    "fp.from.sbv",
    "fp.to.ubv",
    "fp.to.sbv",
    "fp.from.binary",
    "fp.from.real",
    "fp.to.real",
    "fp.cast",
    "fp.from.int",
    "fp.to.int",
];

pub(super) const PARTIAL_NOTE: &str = "This benchmark relies on unspecified behaviour.";

pub(super) fn all(
    config: &GeneratorConfig,
    entropy: &mut Entropy,
    emitter: &mut Emitter,
    test_dup: u32,
) -> GenResult<usize> {
    let before = emitter.written();
    on_bitvector(config, entropy, emitter, test_dup)?;
    on_real(config, entropy, emitter, test_dup)?;
    on_float(config, entropy, emitter, test_dup)?;
    on_int(config, entropy, emitter, test_dup)?;
    Ok(emitter.written() - before)
}

fn bitvector_value(bv: &BitVector, signed: bool) -> BigInt {
    if signed {
        bv.to_signed()
    } else {
        BigInt::from(bv.to_unsigned())
    }
}

fn on_bitvector(
    config: &GeneratorConfig,
    entropy: &mut Entropy,
    emitter: &mut Emitter,
    test_dup: u32,
) -> GenResult<()> {
    for name in ["fp.from.ubv", "fp.from.sbv"] {
        let op = Operator::named(name);
        gen_bv_vectors(&op, &config.bitvector_widths, test_dup, entropy, |vector, entropy| {
            from_bitvector_test(config, emitter, entropy, &vector)
        })?;
    }

    let half = rational::half();
    let shifts = [Rational::zero(), half.clone(), -half];
    for name in ["fp.to.ubv", "fp.to.sbv"] {
        let op = Operator::named(name);
        let registry = Registry::for_operator(&op);
        gen_vectors(&op, &registry, &config.precisions, test_dup, entropy, |vector, entropy| {
            for &width in &config.to_bitvector_widths {
                for shift in &shifts {
                    to_bitvector_test(emitter, entropy, &vector, width, shift)?;
                }
            }
            Ok(())
        })?;
    }

    let op = Operator::named("fp.from.binary");
    let registry = Registry::for_operator(&op);
    gen_vectors(&op, &registry, &config.precisions, test_dup, entropy, |vector, entropy| {
        binary_interchange_tests(emitter, entropy, &vector)
    })?;
    info!("{} benchmarks written so far", emitter.written());
    Ok(())
}

/// Convert a corner bitvector and compare the result against the conversion
/// of a literal related to it by `=`, `<=` or `>=`; conversion is monotonic,
/// so the comparison always holds.
fn from_bitvector_test(
    config: &GeneratorConfig,
    emitter: &mut Emitter,
    entropy: &mut Entropy,
    vector: &TestVector<BitVector>,
) -> GenResult<()> {
    let signed = vector.op.name == "fp.from.sbv";
    let x = &vector.operands[0];
    let relation = *entropy.choose(&["<=", "=", ">="]);
    let format = *entropy.choose(&config.from_bitvector_formats);
    let value = bitvector_value(x, signed);
    let result = fp_from_bitvector(format, vector.rounding, x, signed);

    let (bv_relation, fp_relation) = match (relation, signed) {
        ("<=", false) => ("bvule", "fp.leq"),
        (">=", false) => ("bvuge", "fp.geq"),
        ("<=", true) => ("bvsle", "fp.leq"),
        (">=", true) => ("bvsge", "fp.geq"),
        _ => ("=", "fp.eq"),
    };
    let conversion = if signed {
        format.smtlib_to_fp()
    } else {
        format.smtlib_to_fp_unsigned()
    };

    let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
    w.header(vector.expectation, Some(&vector.comment), "QF_FPBV")?;
    let pin = format!("({} x {})", bv_relation, x.smtlib_random_literal(entropy));
    w.var("x", &x.smtlib_sort(), Some(&pin), Some(&value.to_string()))?;
    let definition = format!("(= r ({} {} x))", conversion, vector.rounding);
    w.var("r", &format.smtlib_sort(), Some(&definition), None)?;
    let goal = format!("({} r {})", fp_relation, result.smtlib_random_literal(entropy));
    w.goal(&goal, vector.expectation, true)?;
    w.footer()?;
    Ok(())
}

/// Convert `x + shift` to a bitvector of `width` bits. Shifted variants of
/// infinities and NaN are skipped.
pub(super) fn to_bitvector_test(
    emitter: &mut Emitter,
    entropy: &mut Entropy,
    vector: &TestVector,
    width: usize,
    shift: &Rational,
) -> GenResult<()> {
    let rm = vector.rounding;
    let signed = vector.op.name == "fp.to.sbv";
    let mut x = vector.operands[0].clone();
    if !shift.is_zero() {
        if !x.is_finite() {
            return Ok(());
        }
        let fudge = Mpf::from_rational(x.format(), rm, shift);
        x = fp_add(RoundingMode::RNE, &x, &fudge);
    }

    let outcome = if signed {
        fp_to_sbv(rm, &x, width)
    } else {
        fp_to_ubv(rm, &x, width)
    };
    let (bv, y_expectation, unspecified) = match outcome {
        Outcome::Value(bv) => {
            let n = bitvector_value(&bv, signed).to_string();
            (bv, n, false)
        }
        Outcome::Unspecified => {
            let mut bv = BitVector::new(width);
            bv.randomize(entropy, 0, width);
            (bv, "unspecified".to_string(), true)
        }
    };
    let expectation = if unspecified {
        Expectation::Sat
    } else {
        vector.expectation
    };

    let mut w = emitter.new_test(&vector.op, rm, &vector.comment)?;
    w.header(expectation, Some(&vector.comment), "QF_FPBV")?;
    if unspecified {
        w.comment(PARTIAL_NOTE)?;
    }
    let pin = format!("(= x {})", x.smtlib_random_literal(entropy));
    w.var("x", &x.smtlib_sort(), Some(&pin), Some(&x.to_string()))?;
    let definition = format!("(= y ((_ {} {}) {} x))", vector.op.smtlib_name(), width, rm);
    w.var("y", &bv.smtlib_sort(), Some(&definition), Some(&y_expectation))?;
    if !unspecified || entropy.coin() {
        let pin = format!("(= z {})", bv.smtlib_random_literal(entropy));
        let value = bitvector_value(&bv, signed).to_string();
        w.var("z", &bv.smtlib_sort(), Some(&pin), Some(&value))?;
    } else {
        w.var("z", &bv.smtlib_sort(), None, None)?;
    }
    let holds = if unspecified { entropy.coin() } else { true };
    w.goal("(= y z)", expectation, holds)?;
    w.footer()?;
    Ok(())
}

/// Two benchmarks per vector: the interchange bitvector read as a float, and
/// the float written back as a bitvector. The latter is unspecified for NaN,
/// which has many encodings.
pub(super) fn binary_interchange_tests(emitter: &mut Emitter, entropy: &mut Entropy, vector: &TestVector) -> GenResult<()> {
    let value = &vector.operands[0];
    let bits = value.to_bitvector();
    let conversion = value.format().smtlib_to_fp();

    let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
    w.header(vector.expectation, Some(&vector.comment), "QF_FPBV")?;
    w.comment("binary interchange -> float")?;
    let pin = format!("(= x {})", bits.smtlib_random_literal(entropy));
    w.var("x", &bits.smtlib_sort(), Some(&pin), Some(&format!("{:x}", bits.to_unsigned())))?;
    let definition = format!("(= y ({} x))", conversion);
    w.var("y", &value.smtlib_sort(), Some(&definition), Some(&value.to_string()))?;
    w.goal(&format!("(= y {})", value.smtlib_literal()), vector.expectation, true)?;
    w.footer()?;

    let unspecified = value.is_nan();
    let expectation = if unspecified {
        Expectation::Sat
    } else {
        vector.expectation
    };
    let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
    w.header(expectation, Some(&vector.comment), "QF_FPBV")?;
    w.comment("float -> binary interchange")?;
    if unspecified {
        w.comment(PARTIAL_NOTE)?;
    }
    write_vars(&mut w, vector, entropy)?;
    let definition = format!("(= ({} y) x)", conversion);
    w.var("y", &bits.smtlib_sort(), Some(&definition), Some(&bits.smtlib_literal()))?;
    w.goal(&format!("(= y {})", bits.smtlib_literal()), expectation, true)?;
    w.footer()?;
    Ok(())
}

fn on_real(
    config: &GeneratorConfig,
    entropy: &mut Entropy,
    emitter: &mut Emitter,
    test_dup: u32,
) -> GenResult<()> {
    let op = Operator::named("fp.from.real");
    let registry = Registry::for_operator(&op);
    gen_vectors(&op, &registry, &config.precisions, test_dup, entropy, |vector, entropy| {
        from_real_tests(emitter, entropy, &vector)
    })?;

    let op = Operator::named("fp.to.real");
    let registry = Registry::for_operator(&op);
    gen_vectors(&op, &registry, &config.precisions, test_dup, entropy, |vector, entropy| {
        to_real_value_test(emitter, entropy, &vector)?;
        to_real_membership_test(emitter, entropy, &vector)
    })?;
    Ok(())
}

/// One literal conversion of `q` under the vector's rounding mode, checked
/// with `=` or `distinct` against `x`.
fn real_literal_test(
    emitter: &mut Emitter,
    entropy: &mut Entropy,
    vector: &TestVector,
    q: &Rational,
    equal: bool,
    expectation: Expectation,
    note: &str,
) -> GenResult<()> {
    let x = &vector.operands[0];
    let rm = vector.rounding;
    let rounded = Mpf::from_rational(x.format(), rm, q);
    let comment = format!("{} {}", vector.comment, note);

    let mut w = emitter.new_test(&vector.op, rm, &comment)?;
    w.header(expectation, Some(&comment), DEFAULT_LOGIC)?;
    write_vars(&mut w, vector, entropy)?;
    let definition = format!(
        "(= w ({} {} {}))",
        x.format().smtlib_to_fp(),
        rm,
        rational::to_smtlib(q)
    );
    w.var("w", &x.smtlib_sort(), Some(&definition), Some(&rounded.to_string()))?;
    let relation = if equal { "=" } else { "distinct" };
    w.goal(&format!("({} x w)", relation), expectation, true)?;
    w.footer()?;
    Ok(())
}

/// Rationals inside, on and beyond the interval that rounds onto `x`, and
/// one benchmark over an unconstrained real limited to that interval.
pub(super) fn from_real_tests(emitter: &mut Emitter, entropy: &mut Entropy, vector: &TestVector) -> GenResult<()> {
    let x = &vector.operands[0];
    if x.is_nan() {
        return Ok(());
    }
    let interval = match Interval::of(vector.rounding, x) {
        Some(interval) => interval,
        None => {
            warn!("skipping {}: no real rounds to {}", vector.comment, x);
            return Ok(());
        }
    };
    let base = vector.expectation;

    if let Some(q) = random_rational(entropy, &interval.low, &interval.high) {
        real_literal_test(emitter, entropy, vector, &q, true, base, "inside interval")?;
    }

    for (bound, side) in [(&interval.low, "on low bound"), (&interval.high, "on high bound")] {
        match bound {
            Bound::Inclusive(q) => {
                let note = format!("{} (inclusive)", side);
                real_literal_test(emitter, entropy, vector, q, true, base, &note)?;
            }
            Bound::Exclusive(q) => {
                let note = format!("{} (exclusive)", side);
                real_literal_test(emitter, entropy, vector, q, false, base.inverted(), &note)?;
            }
            Bound::Infinite => {}
        }
    }

    if let Some(low) = interval.low.value() {
        let q = random_rational(entropy, &Bound::Infinite, &Bound::Exclusive(low.clone()));
        if let Some(q) = q {
            real_literal_test(emitter, entropy, vector, &q, false, base, "below")?;
        }
    }
    if let Some(high) = interval.high.value() {
        let q = random_rational(entropy, &Bound::Exclusive(high.clone()), &Bound::Infinite);
        if let Some(q) = q {
            real_literal_test(emitter, entropy, vector, &q, false, base, "above")?;
        }
    }

    let mut bounds = Vec::new();
    match &interval.low {
        Bound::Inclusive(q) => bounds.push(format!("(>= r {})", rational::to_smtlib(q))),
        Bound::Exclusive(q) => bounds.push(format!("(> r {})", rational::to_smtlib(q))),
        Bound::Infinite => {}
    }
    match &interval.high {
        Bound::Inclusive(q) => bounds.push(format!("(<= r {})", rational::to_smtlib(q))),
        Bound::Exclusive(q) => bounds.push(format!("(< r {})", rational::to_smtlib(q))),
        Bound::Infinite => {}
    }
    let range = match bounds.len() {
        0 => None,
        1 => bounds.pop(),
        _ => Some(format!("(and {})", bounds.join(" "))),
    };

    let comment = format!("{} non-literal interval check", vector.comment);
    let mut w = emitter.new_test(&vector.op, vector.rounding, &comment)?;
    w.header(base, Some(&comment), "QF_FPLRA")?;
    write_vars(&mut w, vector, entropy)?;
    w.var("r", "Real", range.as_deref(), None)?;
    let definition = format!("(= w ({} {} r))", x.format().smtlib_to_fp(), vector.rounding);
    w.var("w", &x.smtlib_sort(), Some(&definition), None)?;
    w.goal("(= x w)", base, true)?;
    w.footer()?;
    Ok(())
}

fn random_wide_rational(entropy: &mut Entropy) -> Rational {
    let bound: BigInt = BigInt::one() << 64usize;
    let numerator = entropy.randint(&-bound.clone(), &bound);
    let denominator = entropy.randint(&BigInt::one(), &(BigInt::one() << 32usize));
    Rational::new(numerator, denominator)
}

/// `fp.to_real` of a pinned float against its exact value.
pub(super) fn to_real_value_test(emitter: &mut Emitter, entropy: &mut Entropy, vector: &TestVector) -> GenResult<()> {
    let x = &vector.operands[0];
    let (q, expectation, logic, unspecified) = match fp_to_real(x) {
        Outcome::Value(q) => (q, vector.expectation, "QF_FPLRA", false),
        Outcome::Unspecified => (random_wide_rational(entropy), Expectation::Sat, "QF_UFFPLRA", true),
    };

    let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
    w.header(expectation, Some(&vector.comment), logic)?;
    write_vars(&mut w, vector, entropy)?;
    if unspecified {
        w.comment(PARTIAL_NOTE)?;
    }
    w.var("y", "Real", Some("(= y (fp.to_real x))"), Some(&q.to_string()))?;
    w.goal(&format!("(= y {})", rational::to_smtlib(&q)), expectation, true)?;
    w.footer()?;
    Ok(())
}

/// An unpinned `x` whose real value must equal a chosen rational: its own
/// value (representable) or a nearby one (not representable). The status
/// follows from whether `x` is forced finite and whether the one float with
/// that value is excluded.
pub(super) fn to_real_membership_test(emitter: &mut Emitter, entropy: &mut Entropy, vector: &TestVector) -> GenResult<()> {
    let x = &vector.operands[0];
    let (q, sat, logic, assert_finite, exclude_x, note) = match x.to_rational() {
        None => (
            random_wide_rational(entropy),
            true,
            "QF_UFFPLRA",
            false,
            false,
            "a random rational",
        ),
        Some(value) => {
            let sat = vector.expectation.is_sat();
            let representable = entropy.coin();
            let (logic, assert_finite, exclude_x) = match (sat, representable) {
                (true, true) => ("QF_FPLRA", entropy.coin(), false),
                (true, false) => ("QF_UFFPLRA", false, false),
                (false, representable) => ("QF_FPLRA", true, representable),
            };
            if representable {
                (value, sat, logic, assert_finite, exclude_x, "a representable real")
            } else {
                let q = non_representable_near(entropy, x, &value)?;
                (q, sat, logic, assert_finite, exclude_x, "a non-representable real")
            }
        }
    };
    let expectation = Expectation::from_sat(sat);

    let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
    w.header(expectation, Some(&vector.comment), logic)?;
    w.var("x", &x.smtlib_sort(), None, None)?;
    if assert_finite {
        w.assertion("(or (fp.isZero x) (fp.isSubnormal x) (fp.isNormal x))")?;
    }
    if exclude_x {
        if x.is_zero() {
            // both zeros have the real value 0
            w.assertion("(not (fp.isZero x))")?;
        } else {
            w.assertion(&format!("(distinct x {})", x.smtlib_random_literal(entropy)))?;
        }
    }
    w.var("y", "Real", Some("(= y (fp.to_real x))"), None)?;
    let pin = format!("(= z {})", rational::to_smtlib(&q));
    w.var("z", "Real", Some(&pin), Some(note))?;
    // the goal itself is always asserted; the status carries the verdict
    w.goal("(= y z)", Expectation::Sat, true)?;
    w.footer()?;
    Ok(())
}

/// A rational other than `value` that still rounds to `x` under RNA, and
/// therefore is no float's value.
fn non_representable_near(entropy: &mut Entropy, x: &Mpf, value: &Rational) -> GenResult<Rational> {
    let interval = Interval::of(RoundingMode::RNA, x)
        .ok_or_else(|| GenError::construction(format!("no RNA interval around {}", x)))?;
    for _ in 0..64 {
        if let Some(q) = random_rational(entropy, &interval.low, &interval.high) {
            if q != *value {
                return Ok(q);
            }
        }
    }
    Err(GenError::construction(format!(
        "could not find a non-representable real near {}",
        x
    )))
}

fn on_float(
    config: &GeneratorConfig,
    entropy: &mut Entropy,
    emitter: &mut Emitter,
    test_dup: u32,
) -> GenResult<()> {
    let op = Operator::named("fp.cast");
    let registry = Registry::for_operator(&op);
    gen_vectors(&op, &registry, &config.precisions, test_dup, entropy, |vector, entropy| {
        let src = &vector.operands[0];
        let rm = vector.rounding;
        for &target in &config.cast_formats {
            if target == src.format() {
                continue;
            }
            let dst = fp_from_float(target, rm, src);
            let comment = format!(
                "{} conversion of {}({}) -> {}",
                rm,
                src.smtlib_sort(),
                vector.classes[0],
                dst.smtlib_sort()
            );
            let mut w = emitter.new_test(&vector.op, rm, &comment)?;
            w.header(vector.expectation, Some(&comment), DEFAULT_LOGIC)?;
            write_vars(&mut w, &vector, entropy)?;
            let definition = format!("(= y ({} {} x))", target.smtlib_to_fp(), rm);
            w.var("y", &dst.smtlib_sort(), Some(&definition), Some(&dst.to_string()))?;
            let pin = format!("(= z {})", dst.smtlib_random_literal(entropy));
            w.var("z", &dst.smtlib_sort(), Some(&pin), Some("y"))?;
            w.goal("(= y z)", vector.expectation, true)?;
            w.footer()?;
        }
        Ok(())
    })?;
    Ok(())
}

fn on_int(
    config: &GeneratorConfig,
    entropy: &mut Entropy,
    emitter: &mut Emitter,
    test_dup: u32,
) -> GenResult<()> {
    let op = Operator::named("fp.from.int");
    gen_int_vectors(&op, &config.int_formats, test_dup, entropy, |vector, entropy| {
        let f = Mpf::from_rational(vector.format, vector.rounding, &rational::int(vector.value.clone()));
        let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
        w.header(vector.expectation, Some(&vector.comment), "QF_FPLIA")?;
        let pin = format!("(= x {})", rational::int_to_smtlib(&vector.value));
        w.var("x", "Int", Some(&pin), None)?;
        let definition = format!(
            "(= y ({} {} (to_real x)))",
            vector.format.smtlib_to_fp(),
            vector.rounding
        );
        w.var("y", &f.smtlib_sort(), Some(&definition), Some(&f.to_string()))?;
        let pin = format!("(= z {})", f.smtlib_random_literal(entropy));
        w.var("z", &f.smtlib_sort(), Some(&pin), None)?;
        w.goal("(= y z)", vector.expectation, true)?;
        w.footer()?;
        Ok(())
    })?;

    let op = Operator::named("fp.to.int");
    let registry = Registry::for_operator(&op);
    gen_vectors(&op, &registry, &config.precisions, test_dup, entropy, |vector, entropy| {
        to_int_test(emitter, entropy, &vector)
    })?;
    Ok(())
}

/// `fp.to_int` rendered through `fp.roundToIntegral` and `to_int`. Infinities
/// and NaN get a random stand-in integer.
pub(super) fn to_int_test(emitter: &mut Emitter, entropy: &mut Entropy, vector: &TestVector) -> GenResult<()> {
    let x = &vector.operands[0];
    let (n, expectation, y_expectation, logic, unspecified) = match fp_to_int(vector.rounding, x) {
        Outcome::Value(n) => {
            let shown = n.to_string();
            (n, vector.expectation, shown, "QF_FPLIA", false)
        }
        Outcome::Unspecified => {
            let inf = x.format().inf_boundary().to_integer();
            let n = entropy.randint(&-(&inf * 2u32), &inf);
            (n, Expectation::Sat, "unspecified".to_string(), "QF_UFFPLIA", true)
        }
    };
    let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
    w.header(expectation, Some(&vector.comment), logic)?;
    write_vars(&mut w, vector, entropy)?;
    if unspecified {
        w.comment(PARTIAL_NOTE)?;
    }
    let definition = format!(
        "(= y (to_int (fp.to_real (fp.roundToIntegral {} x))))",
        vector.rounding
    );
    w.var("y", "Int", Some(&definition), Some(&y_expectation))?;
    let pin = format!("(= z {})", rational::int_to_smtlib(&n));
    w.var("z", "Int", Some(&pin), None)?;
    w.goal("(= y z)", expectation, true)?;
    w.footer()?;
    Ok(())
}
