//! Vector generation through the public API: enumeration coverage, duplicate
//! suppression and seed stability.

use std::collections::HashSet;

use fpgen::vectors::gen_vectors;
use fpgen::{
    ClassKind, ClassTuples, Entropy, FloatClass, Format, Operator, Registry, RoundingMode, Sign,
    TestVector,
};

fn vectors(op: &str, registry: &Registry, format: Format, test_dup: u32, salt: &str) -> Vec<TestVector> {
    let op = Operator::lookup(op).unwrap();
    let mut entropy = Entropy::new(salt);
    let mut out = Vec::new();
    gen_vectors(&op, registry, &[format], test_dup, &mut entropy, |v, _| {
        out.push(v);
        Ok(())
    })
    .unwrap();
    out
}

#[test]
fn test_every_class_pair_is_visited() {
    let registry = Registry::standard();
    let k = registry.len();
    let tuples: Vec<Vec<usize>> = ClassTuples::new(k, 2).collect();
    assert_eq!(tuples.len() as u128, ClassTuples::total(k, 2));
    let distinct: HashSet<_> = tuples.iter().cloned().collect();
    assert_eq!(distinct.len(), k * k);

    let add = vectors("fp.add", &registry, Format::FLOAT32, 1, "");
    let pairs: HashSet<(String, String)> = add
        .iter()
        .filter(|v| v.rounding == RoundingMode::RTZ)
        .map(|v| (v.classes[0].clone(), v.classes[1].clone()))
        .collect();
    assert_eq!(pairs.len(), k * k);
}

#[test]
fn test_fixed_classes_collapse_to_two_expectations() {
    let registry = Registry::new(vec![
        FloatClass::new(ClassKind::Zero, Sign::Negative),
        FloatClass::new(ClassKind::Infinity, Sign::Positive),
    ]);
    let out = vectors("fp.isZero", &registry, Format::FLOAT64, 20, "");
    // each class has a single value, so only the status can vary
    for name in ["-0", "+inf"] {
        let n = out.iter().filter(|v| v.classes[0] == name).count();
        assert!((1..=2).contains(&n), "{}: {}", name, n);
    }
}

#[test]
fn test_random_classes_keep_their_variants() {
    let registry = Registry::new(vec![FloatClass::new(ClassKind::Normal, Sign::Positive)]);
    let out = vectors("fp.isNormal", &registry, Format::FLOAT64, 10, "");
    assert_eq!(out.len(), 10);
    assert!(out.iter().all(|v| v.operands[0].is_normal() && v.operands[0].is_positive()));
}

#[test]
fn test_seed_depends_on_class_names_only() {
    let wide = Registry::standard();
    let narrow = Registry::new(vec![
        FloatClass::new(ClassKind::Subnormal, Sign::Negative),
        FloatClass::new(ClassKind::Halfpoint, Sign::Positive),
    ]);
    let from_wide = vectors("fp.neg", &wide, Format::FLOAT32, 3, "");
    let from_narrow = vectors("fp.neg", &narrow, Format::FLOAT32, 3, "");
    for v in &from_narrow {
        let twin = from_wide
            .iter()
            .find(|w| w.classes == v.classes && w.expectation == v.expectation && w.operands == v.operands);
        assert!(twin.is_some(), "{} has no twin", v.comment);
    }
}
