//! # fpgen
//!
//! Generator of edge-case dense SMT-LIB2 benchmarks for the theory of
//! floating-point arithmetic.
//!
//! Operands are drawn from named value classes (zeros, subnormal and normal
//! boundaries, infinities, NaN and friends), every combination of classes is
//! enumerated for every operator and rounding mode, and each benchmark
//! carries an expected `sat`/`unsat` status computed by an exact evaluator.
//! All randomness flows through a stream reseeded from a readable seed
//! string, so a run is reproducible and independent of generation order.

pub mod bitpattern;
pub mod bitvector;
pub mod classes;
pub mod config;
pub mod driver;
pub mod entropy;
pub mod enumerate;
pub mod error;
pub mod eval;
pub mod integers;
pub mod interval;
pub mod mpf;
pub mod ops;
pub mod rational;
pub mod rounding;
pub mod smtlib;
pub mod vectors;

// Re-export core types for easy access
pub use bitvector::BitVector;
pub use classes::{ClassKind, FloatClass, Registry, Sign};
pub use config::GeneratorConfig;
pub use driver::{test_file_name, Counts, Emitter, Family, Generator};
pub use entropy::Entropy;
pub use enumerate::ClassTuples;
pub use error::{GenError, GenResult};
pub use eval::Outcome;
pub use integers::IntClass;
pub use interval::{random_rational, Bound, Interval};
pub use mpf::{Format, Mpf};
pub use ops::{Operator, Sort};
pub use rational::Rational;
pub use rounding::RoundingMode;
pub use smtlib::BenchmarkWriter;
pub use vectors::{Expectation, TestVector};
