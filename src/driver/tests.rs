use num_traits::Zero;

use super::conversions::{
    binary_interchange_tests, from_real_tests, to_bitvector_test, to_int_test, to_real_value_test,
    PARTIAL_NOTE,
};
use super::*;
use crate::mpf::{Format, Mpf};
use crate::rational::{self, Rational};
use crate::vectors::Expectation;

fn op(name: &'static str) -> Operator {
    Operator::named(name)
}

fn small_config(root: &Path) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: root.to_path_buf(),
        precisions: vec![Format::FLOAT16],
        bitvector_widths: vec![8],
        to_bitvector_widths: vec![8],
        from_bitvector_formats: vec![Format::FLOAT16],
        cast_formats: vec![Format::FLOAT16, Format::FLOAT32],
        int_formats: vec![Format::FLOAT16],
        ..GeneratorConfig::default()
    }
}

#[test]
fn test_file_names() {
    assert_eq!(test_file_name(&op("fp.add"), RoundingMode::RNE, 1), "add_rne_00001.smt2");
    assert_eq!(test_file_name(&op("fp.isNaN"), RoundingMode::RTZ, 42), "isNaN_00042.smt2");
    assert_eq!(test_file_name(&op("smtlib.eq"), RoundingMode::RNA, 7), "smtlib.eq_00007.smt2");
}

#[test]
fn test_sequence_is_per_operator() {
    let mut counter = SequenceCounter::new();
    let add = op("fp.add");
    let mul = op("fp.mul");
    assert_eq!(counter.next(&add), 1);
    assert_eq!(counter.next(&add), 2);
    assert_eq!(counter.next(&mul), 1);
    assert_eq!(counter.issued(&add), 2);
    assert_eq!(counter.issued(&op("fp.sub")), 0);
}

#[test]
fn test_apply() {
    assert_eq!(apply(&op("fp.fma"), RoundingMode::RTP, 3), "(fp.fma RTP x y z)");
    assert_eq!(apply(&op("fp.isZero"), RoundingMode::RNE, 1), "(fp.isZero x)");
    assert_eq!(apply(&op("smtlib.eq"), RoundingMode::RNE, 2), "(= x y)");
}

#[test]
fn test_family_operators() {
    let classify = Family::Classify.operators();
    assert!(classify.iter().all(|o| o.arity == 1));
    assert!(classify.iter().any(|o| o.name == "fp.isNaN"));
    assert!(Family::Unary.operators().iter().all(|o| o.name != "fp.cast"));
    assert!(Family::Ternary.operators().iter().any(|o| o.name == "fp.fma"));
    assert_eq!(Family::Conversion.operators().len(), 10);
}

#[test]
fn test_counts_enabled_keeps_order() {
    let counts = Counts {
        conversion: 1,
        classify: 2,
        ..Counts::default()
    };
    assert_eq!(counts.enabled(), vec![Family::Classify, Family::Conversion]);
    assert!(Counts::default().enabled().is_empty());
}

#[test]
fn test_emitter_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut emitter = Emitter::new(dir.path());
    let add = op("fp.add");
    for _ in 0..2 {
        let mut w = emitter.new_test(&add, RoundingMode::RTN, "(fp.add RTN +0 -0)").unwrap();
        w.header(Expectation::Sat, None, "QF_FP").unwrap();
        w.footer().unwrap();
    }
    assert_eq!(emitter.written(), 2);
    assert!(dir.path().join("fp.add").join("add_rtn_00002.smt2").is_file());

    let stale = dir.path().join("fp.sub");
    fs::create_dir_all(&stale).unwrap();
    let removed = clear_output(dir.path(), &[add, op("fp.sub"), op("fp.mul")]).unwrap();
    assert_eq!(removed, 2);
    assert!(!dir.path().join("fp.add").exists());
    assert!(!stale.exists());
}

#[test]
fn test_rejects_invalid_config() {
    let mut config = GeneratorConfig::default();
    config.precisions.clear();
    assert!(Generator::new(config).is_err());
}

#[test]
fn test_classify_family_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut generator = Generator::new(small_config(dir.path())).unwrap();
    let written = generator.family(Family::Classify, 1).unwrap();
    assert!(written > 0);
    assert_eq!(generator.emitter().written(), written);

    let first = fs::read_to_string(dir.path().join("fp.isNaN").join("isNaN_00001.smt2")).unwrap();
    assert!(first.starts_with("(set-info :smt-lib-version 2.6)"));
    assert!(first.contains("(set-logic QF_FP)"));
    assert!(first.contains("(declare-const x (_ FloatingPoint 5 11))"));
    assert!(first.contains("(check-sat)"));
    assert!(first.trim_end().ends_with("(exit)"));
}

#[test]
fn test_conversion_family_covers_every_operator() {
    let dir = tempfile::tempdir().unwrap();
    let mut generator = Generator::new(small_config(dir.path())).unwrap();
    let written = generator.family(Family::Conversion, 1).unwrap();
    assert!(written > 0);
    for name in conversions::OPERATORS {
        let count = fs::read_dir(dir.path().join(name)).unwrap().count();
        assert!(count > 0, "{} produced nothing", name);
    }

    let cast = fs::read_to_string(dir.path().join("fp.cast").join("cast_rne_00001.smt2")).unwrap();
    assert!(cast.contains("((_ to_fp 8 24) RNE x)"));

    let text = fs::read_to_string(dir.path().join("fp.from.ubv").join("from.ubv_rne_00001.smt2")).unwrap();
    assert!(text.contains("(set-logic QF_FPBV)"));
    assert!(text.contains("(declare-const x (_ BitVec 8))"));
}

fn single(name: &'static str, rm: RoundingMode, expectation: Expectation, x: Mpf, class: &str) -> TestVector {
    let op = op(name);
    let comment = crate::vectors::vector_comment(&op, rm, &[class]);
    TestVector {
        op,
        rounding: rm,
        expectation,
        operands: vec![x],
        comment,
        classes: vec![class.to_string()],
    }
}

/// Contents of every benchmark of `op` below `root`, in sequence order.
fn benchmarks(root: &Path, op: &str) -> Vec<String> {
    let mut paths: Vec<_> = fs::read_dir(root.join(op))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    paths.sort();
    paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect()
}

fn status(text: &str) -> &str {
    if text.contains("(set-info :status sat)") {
        "sat"
    } else {
        assert!(text.contains("(set-info :status unsat)"), "no status in {}", text);
        "unsat"
    }
}

#[test]
fn test_real_bound_kinds_decide_relation_and_status() {
    // RTZ maps [1.5, next_up(1.5)) onto 1.5: inclusive low, exclusive high
    let x = Mpf::from_rational(Format::FLOAT32, RoundingMode::RTZ, &rational::frac(3, 2));
    for base in [Expectation::Sat, Expectation::Unsat] {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = Emitter::new(dir.path());
        let mut entropy = Entropy::new("");
        let vector = single("fp.from.real", RoundingMode::RTZ, base, x.clone(), "+normal");
        from_real_tests(&mut emitter, &mut entropy, &vector).unwrap();
        let files = benchmarks(dir.path(), "fp.from.real");

        let inclusive: Vec<_> = files.iter().filter(|t| t.contains("on low bound (inclusive)")).collect();
        assert_eq!(inclusive.len(), 1);
        assert_eq!(status(inclusive[0]), base.as_str());
        assert!(inclusive[0].contains("(= x w)"));
        assert!(!inclusive[0].contains("distinct"));

        let exclusive: Vec<_> = files.iter().filter(|t| t.contains("on high bound (exclusive)")).collect();
        assert_eq!(exclusive.len(), 1);
        assert_eq!(status(exclusive[0]), base.inverted().as_str());
        assert!(exclusive[0].contains("(distinct x w)"));
    }
}

#[test]
fn test_to_bitvector_of_special_values_is_forced_sat() {
    let specials = [
        Mpf::nan(Format::FLOAT32),
        Mpf::infinity(Format::FLOAT32, false),
        Mpf::infinity(Format::FLOAT32, true),
    ];
    for name in ["fp.to.ubv", "fp.to.sbv"] {
        for x in &specials {
            for base in [Expectation::Sat, Expectation::Unsat] {
                let dir = tempfile::tempdir().unwrap();
                let mut emitter = Emitter::new(dir.path());
                let mut entropy = Entropy::new("");
                let vector = single(name, RoundingMode::RNE, base, x.clone(), "special");
                to_bitvector_test(&mut emitter, &mut entropy, &vector, 8, &Rational::zero()).unwrap();
                // shifted variants of non-finite operands are skipped
                to_bitvector_test(&mut emitter, &mut entropy, &vector, 8, &rational::half()).unwrap();
                let files = benchmarks(dir.path(), name);
                assert_eq!(files.len(), 1);
                assert_eq!(status(&files[0]), "sat");
                assert!(files[0].contains(PARTIAL_NOTE));
                assert!(files[0].contains(";; y should be unspecified"));
                assert!(files[0].contains("(declare-const y (_ BitVec 8))"));
            }
        }
    }
}

#[test]
fn test_out_of_range_bitvector_is_forced_sat() {
    let x = Mpf::from_rational(Format::FLOAT32, RoundingMode::RNE, &rational::int(300));
    let dir = tempfile::tempdir().unwrap();
    let mut emitter = Emitter::new(dir.path());
    let mut entropy = Entropy::new("");
    let vector = single("fp.to.ubv", RoundingMode::RNE, Expectation::Unsat, x, "+normal");
    to_bitvector_test(&mut emitter, &mut entropy, &vector, 8, &Rational::zero()).unwrap();
    let files = benchmarks(dir.path(), "fp.to.ubv");
    assert_eq!(status(&files[0]), "sat");
    assert!(files[0].contains(PARTIAL_NOTE));
}

#[test]
fn test_to_int_of_special_values_is_forced_sat() {
    for x in [Mpf::nan(Format::FLOAT32), Mpf::infinity(Format::FLOAT32, true)] {
        for base in [Expectation::Sat, Expectation::Unsat] {
            let dir = tempfile::tempdir().unwrap();
            let mut emitter = Emitter::new(dir.path());
            let mut entropy = Entropy::new("");
            let vector = single("fp.to.int", RoundingMode::RTN, base, x.clone(), "special");
            to_int_test(&mut emitter, &mut entropy, &vector).unwrap();
            let files = benchmarks(dir.path(), "fp.to.int");
            assert_eq!(files.len(), 1);
            assert_eq!(status(&files[0]), "sat");
            assert!(files[0].contains(PARTIAL_NOTE));
            assert!(files[0].contains("(set-logic QF_UFFPLIA)"));
            assert!(files[0].contains(";; y should be unspecified"));
        }
    }
}

#[test]
fn test_to_int_of_finite_value_keeps_status() {
    let x = Mpf::from_rational(Format::FLOAT32, RoundingMode::RNE, &rational::frac(5, 2));
    let dir = tempfile::tempdir().unwrap();
    let mut emitter = Emitter::new(dir.path());
    let mut entropy = Entropy::new("");
    let vector = single("fp.to.int", RoundingMode::RNE, Expectation::Unsat, x, "+halfpoint");
    to_int_test(&mut emitter, &mut entropy, &vector).unwrap();
    let files = benchmarks(dir.path(), "fp.to.int");
    assert_eq!(status(&files[0]), "unsat");
    assert!(!files[0].contains(PARTIAL_NOTE));
    assert!(files[0].contains(";; y should be 2"));
}

#[test]
fn test_to_real_of_special_values_is_forced_sat() {
    for x in [Mpf::nan(Format::FLOAT64), Mpf::infinity(Format::FLOAT64, false)] {
        for base in [Expectation::Sat, Expectation::Unsat] {
            let dir = tempfile::tempdir().unwrap();
            let mut emitter = Emitter::new(dir.path());
            let mut entropy = Entropy::new("");
            let vector = single("fp.to.real", RoundingMode::RNE, base, x.clone(), "special");
            to_real_value_test(&mut emitter, &mut entropy, &vector).unwrap();
            let files = benchmarks(dir.path(), "fp.to.real");
            assert_eq!(files.len(), 1);
            assert_eq!(status(&files[0]), "sat");
            assert!(files[0].contains(PARTIAL_NOTE));
            assert!(files[0].contains("(set-logic QF_UFFPLRA)"));
        }
    }
}

#[test]
fn test_nan_to_binary_interchange_is_forced_sat() {
    for base in [Expectation::Sat, Expectation::Unsat] {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = Emitter::new(dir.path());
        let mut entropy = Entropy::new("");
        let vector = single("fp.from.binary", RoundingMode::RNE, base, Mpf::nan(Format::FLOAT16), "nan");
        binary_interchange_tests(&mut emitter, &mut entropy, &vector).unwrap();
        let files = benchmarks(dir.path(), "fp.from.binary");
        assert_eq!(files.len(), 2);

        // bitvector to float is fully specified, even for NaN encodings
        assert!(files[0].contains(";; binary interchange -> float"));
        assert_eq!(status(&files[0]), base.as_str());
        assert!(!files[0].contains(PARTIAL_NOTE));

        assert!(files[1].contains(";; float -> binary interchange"));
        assert_eq!(status(&files[1]), "sat");
        assert!(files[1].contains(PARTIAL_NOTE));
    }
}
