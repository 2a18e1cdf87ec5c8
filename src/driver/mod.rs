//! Benchmark emission.
//!
//! The driver walks the operator families, asks the generators for vectors,
//! computes expected results with the evaluator and writes one benchmark file
//! per test. Each operator gets its own output directory and its own
//! sequence counter; files are opened, written and closed one at a time.
//!
//! # Example
//!
//! ```no_run
//! use fpgen::{Counts, Generator, GeneratorConfig};
//!
//! let mut generator = Generator::new(GeneratorConfig::default())?;
//! let counts = Counts { classify: 1, ..Counts::default() };
//! let written = generator.run(&counts)?;
//! # Ok::<(), fpgen::GenError>(())
//! ```

mod conversions;
mod floats;

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::GeneratorConfig;
use crate::entropy::Entropy;
use crate::error::GenResult;
use crate::ops::{all_ops_where, Operator, Sort};
use crate::rounding::RoundingMode;
use crate::smtlib::BenchmarkWriter;
use crate::vectors::TestVector;

pub type Benchmark = BenchmarkWriter<BufWriter<File>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Classify,
    Relations,
    Unary,
    Binary,
    Ternary,
    Conversion,
}

impl Family {
    /// Generation order.
    pub const ALL: [Family; 6] = [
        Family::Classify,
        Family::Relations,
        Family::Unary,
        Family::Binary,
        Family::Ternary,
        Family::Conversion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::Classify => "classify",
            Family::Relations => "relations",
            Family::Unary => "unary",
            Family::Binary => "binary",
            Family::Ternary => "ternary",
            Family::Conversion => "conversion",
        }
    }

    pub fn operators(self) -> Vec<Operator> {
        match self {
            Family::Classify => all_ops_where(1, None, Some(Sort::Bool)),
            Family::Relations => all_ops_where(2, None, Some(Sort::Bool)),
            Family::Unary => all_ops_where(1, Some(Sort::Float), Some(Sort::Float))
                .into_iter()
                .filter(|o| o.name != "fp.cast")
                .collect(),
            Family::Binary => all_ops_where(2, None, Some(Sort::Float)),
            Family::Ternary => all_ops_where(3, None, Some(Sort::Float)),
            Family::Conversion => conversions::OPERATORS
                .iter()
                .map(|&name| Operator::named(name))
                .collect(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Duplicate counts per family; zero disables a family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub classify: u32,
    pub relations: u32,
    pub unary: u32,
    pub binary: u32,
    pub ternary: u32,
    pub conversion: u32,
}

impl Counts {
    pub fn get(&self, family: Family) -> u32 {
        match family {
            Family::Classify => self.classify,
            Family::Relations => self.relations,
            Family::Unary => self.unary,
            Family::Binary => self.binary,
            Family::Ternary => self.ternary,
            Family::Conversion => self.conversion,
        }
    }

    pub fn enabled(&self) -> Vec<Family> {
        Family::ALL
            .into_iter()
            .filter(|&f| self.get(f) > 0)
            .collect()
    }
}

/// Per-operator file sequence numbers, starting at 1.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    issued: HashMap<&'static str, u32>,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, op: &Operator) -> u32 {
        let n = self.issued.entry(op.name).or_insert(0);
        *n += 1;
        *n
    }

    pub fn issued(&self, op: &Operator) -> u32 {
        self.issued.get(op.name).copied().unwrap_or(0)
    }
}

/// `<short name>[_<rounding mode>]_<sequence>.smt2`
pub fn test_file_name(op: &Operator, rm: RoundingMode, sequence: u32) -> String {
    let mut name = op.short_name().to_string();
    if op.rounding {
        name.push('_');
        name.push_str(&rm.name().to_lowercase());
    }
    format!("{}_{:05}.smt2", name, sequence)
}

/// Opens benchmark files under an output root.
#[derive(Debug)]
pub struct Emitter {
    root: PathBuf,
    sequence: SequenceCounter,
    written: usize,
}

impl Emitter {
    pub fn new(root: impl Into<PathBuf>) -> Emitter {
        Emitter {
            root: root.into(),
            sequence: SequenceCounter::new(),
            written: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn sequence(&self) -> &SequenceCounter {
        &self.sequence
    }

    /// Create the next benchmark file for `op`.
    pub fn new_test(&mut self, op: &Operator, rm: RoundingMode, comment: &str) -> GenResult<Benchmark> {
        let dir = self.root.join(op.name);
        fs::create_dir_all(&dir)?;
        let n = self.sequence.next(op);
        let path = dir.join(test_file_name(op, rm, n));
        debug!("generating {} test {} {}", op.name, n, comment);
        let file = File::create(&path)?;
        self.written += 1;
        Ok(BenchmarkWriter::new(BufWriter::new(file)))
    }
}

/// Remove the output directories of `ops` below `root`. Returns how many
/// directories existed.
pub fn clear_output(root: &Path, ops: &[Operator]) -> GenResult<usize> {
    let mut removed = 0;
    for op in ops {
        let dir = root.join(op.name);
        if dir.is_dir() {
            fs::remove_dir_all(&dir)?;
            removed += 1;
        }
    }
    Ok(removed)
}

const OPERAND_NAMES: [&str; 3] = ["x", "y", "z"];

/// `(op [rm] x y ...)` over the first `arity` operand names.
fn apply(op: &Operator, rm: RoundingMode, arity: usize) -> String {
    let mut text = format!("({}", op.smtlib_name());
    if op.rounding {
        text.push(' ');
        text.push_str(rm.name());
    }
    for name in OPERAND_NAMES.iter().take(arity) {
        text.push(' ');
        text.push_str(name);
    }
    text.push(')');
    text
}

/// Declare and pin the operands of `vector` as `x`, `y`, `z`.
fn write_vars(w: &mut Benchmark, vector: &TestVector, entropy: &mut Entropy) -> GenResult<()> {
    for (name, value) in OPERAND_NAMES.iter().zip(&vector.operands) {
        let assertion = format!("(= {} {})", name, value.smtlib_random_literal(entropy));
        w.var(name, &value.smtlib_sort(), Some(&assertion), Some(&value.to_string()))?;
    }
    Ok(())
}

/// Runs the operator families against one configuration.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    entropy: Entropy,
    emitter: Emitter,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> GenResult<Generator> {
        config.validate()?;
        Ok(Generator {
            entropy: Entropy::new(&config.seed_salt),
            emitter: Emitter::new(config.output_dir.clone()),
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Clear the output of every enabled family, then generate them in
    /// order. Returns the number of files written.
    pub fn run(&mut self, counts: &Counts) -> GenResult<usize> {
        let enabled = counts.enabled();
        let ops: Vec<Operator> = enabled.iter().flat_map(|f| f.operators()).collect();
        let removed = clear_output(self.emitter.root(), &ops)?;
        if removed > 0 {
            info!("removed {} stale output directories", removed);
        }
        let before = self.emitter.written();
        for family in enabled {
            let n = self.family(family, counts.get(family))?;
            info!("generated {} {} benchmarks", n, family);
        }
        Ok(self.emitter.written() - before)
    }

    /// Generate one family with `test_dup` variants per class tuple.
    pub fn family(&mut self, family: Family, test_dup: u32) -> GenResult<usize> {
        let ops = family.operators();
        let (config, entropy, emitter) = (&self.config, &mut self.entropy, &mut self.emitter);
        match family {
            Family::Classify | Family::Relations => {
                floats::predicates(&ops, config, entropy, emitter, test_dup)
            }
            Family::Unary | Family::Binary | Family::Ternary => {
                floats::functions(&ops, config, entropy, emitter, test_dup)
            }
            Family::Conversion => conversions::all(config, entropy, emitter, test_dup),
        }
    }
}

#[cfg(test)]
mod tests;
