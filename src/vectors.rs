//! Test vectors and the seeded variant generator.
//!
//! Every vector is built right after reseeding the shared stream from the
//! names of its operand classes and its duplicate index. A class combination
//! therefore always produces the same operands, whatever else the registry
//! contains and whichever combinations were generated before it.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use log::debug;
use num_bigint::BigUint;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classes::Registry;
use crate::entropy::Entropy;
use crate::enumerate::ClassTuples;
use crate::error::GenResult;
use crate::mpf::{Format, Mpf};
use crate::ops::Operator;
use crate::rounding::RoundingMode;

/// Expected verdict of a benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Sat,
    Unsat,
}

impl Expectation {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Expectation {
        if rng.gen::<bool>() {
            Expectation::Sat
        } else {
            Expectation::Unsat
        }
    }

    pub fn from_sat(sat: bool) -> Expectation {
        if sat {
            Expectation::Sat
        } else {
            Expectation::Unsat
        }
    }

    pub fn is_sat(self) -> bool {
        self == Expectation::Sat
    }

    pub fn inverted(self) -> Expectation {
        match self {
            Expectation::Sat => Expectation::Unsat,
            Expectation::Unsat => Expectation::Sat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Expectation::Sat => "sat",
            Expectation::Unsat => "unsat",
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVector<T = Mpf> {
    pub op: Operator,
    pub rounding: RoundingMode,
    pub expectation: Expectation,
    pub operands: Vec<T>,
    pub comment: String,
    pub classes: Vec<String>,
}

/// Deduplication key: expectation, rounding mode and operand encodings.
pub type Fingerprint = (Expectation, RoundingMode, Vec<BigUint>);

impl TestVector<Mpf> {
    pub fn fingerprint(&self) -> Fingerprint {
        (
            self.expectation,
            self.rounding,
            self.operands.iter().map(|x| x.bits()).collect(),
        )
    }
}

/// Keys already accepted in one generation session.
#[derive(Debug, Clone)]
pub struct History<K: Hash + Eq> {
    seen: HashSet<K>,
}

impl<K: Hash + Eq> History<K> {
    pub fn new() -> Self {
        History {
            seen: HashSet::new(),
        }
    }

    /// True when `key` is new, in which case it is recorded.
    pub fn accept(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl<K: Hash + Eq> Default for History<K> {
    fn default() -> Self {
        History::new()
    }
}

/// The rounding modes a vector for `op` is generated under.
pub fn rounding_modes(op: &Operator) -> Vec<RoundingMode> {
    if op.rounding {
        RoundingMode::ALL.to_vec()
    } else {
        vec![RoundingMode::RNE]
    }
}

pub fn seed_string(class_names: &[&str], duplicate: u32) -> String {
    let mut seed = class_names.join("__");
    seed.push_str("__");
    seed.push_str(&duplicate.to_string());
    seed
}

pub fn vector_comment(op: &Operator, rm: RoundingMode, class_names: &[&str]) -> String {
    let mut comment = format!("({}", op.name);
    if op.rounding {
        comment.push(' ');
        comment.push_str(rm.name());
    }
    for name in class_names {
        comment.push(' ');
        comment.push_str(name);
    }
    comment.push(')');
    comment
}

/// Generate `test_dup` variants of every class tuple for `op`, per format and
/// rounding mode, handing each accepted vector to `sink` together with the
/// stream it was built from. Returns the number of accepted vectors.
pub fn gen_vectors<F>(
    op: &Operator,
    registry: &Registry,
    formats: &[Format],
    test_dup: u32,
    entropy: &mut Entropy,
    mut sink: F,
) -> GenResult<usize>
where
    F: FnMut(TestVector, &mut Entropy) -> GenResult<()>,
{
    let mut accepted = 0;
    for &format in formats {
        for rm in rounding_modes(op) {
            let mut history = History::new();
            for tuple in ClassTuples::new(registry.len(), op.arity) {
                let classes: Vec<_> = tuple.iter().filter_map(|&i| registry.get(i)).collect();
                let names: Vec<&str> = classes.iter().map(|c| c.name()).collect();
                for duplicate in 0..test_dup {
                    entropy.reseed(&seed_string(&names, duplicate));
                    let expectation = Expectation::random(entropy);
                    let operands: Vec<Mpf> = classes
                        .iter()
                        .map(|c| c.construct(format, entropy))
                        .collect();
                    let vector = TestVector {
                        op: *op,
                        rounding: rm,
                        expectation,
                        operands,
                        comment: vector_comment(op, rm, &names),
                        classes: names.iter().map(|n| n.to_string()).collect(),
                    };
                    if !history.accept(vector.fingerprint()) {
                        debug!("dropping duplicate {} #{}", vector.comment, duplicate);
                        continue;
                    }
                    accepted += 1;
                    sink(vector, entropy)?;
                }
            }
        }
    }
    Ok(accepted)
}
