//! Catalog of the floating-point operators benchmarks are generated for.
//!
//! Operator names use the dotted spelling of the output directories
//! (`fp.to.ubv`), which is not always the SMT-LIB symbol (`fp.to_ubv`).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    Bool,
    Float,
    BitVec,
    Real,
    Int,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator {
    pub name: &'static str,
    pub arity: usize,
    pub args: Sort,
    pub result: Sort,
    pub rounding: bool,
}

const fn op(name: &'static str, arity: usize, args: Sort, result: Sort, rounding: bool) -> Operator {
    Operator {
        name,
        arity,
        args,
        result,
        rounding,
    }
}

use Sort::*;

pub const CATALOG: &[Operator] = &[
    // classification
    op("fp.isNormal", 1, Float, Bool, false),
    op("fp.isSubnormal", 1, Float, Bool, false),
    op("fp.isZero", 1, Float, Bool, false),
    op("fp.isInfinite", 1, Float, Bool, false),
    op("fp.isNaN", 1, Float, Bool, false),
    op("fp.isNegative", 1, Float, Bool, false),
    op("fp.isPositive", 1, Float, Bool, false),
    // relations
    op("fp.eq", 2, Float, Bool, false),
    op("fp.lt", 2, Float, Bool, false),
    op("fp.leq", 2, Float, Bool, false),
    op("fp.gt", 2, Float, Bool, false),
    op("fp.geq", 2, Float, Bool, false),
    op("smtlib.eq", 2, Float, Bool, false),
    // arithmetic
    op("fp.abs", 1, Float, Float, false),
    op("fp.neg", 1, Float, Float, false),
    op("fp.sqrt", 1, Float, Float, true),
    op("fp.roundToIntegral", 1, Float, Float, true),
    op("fp.add", 2, Float, Float, true),
    op("fp.sub", 2, Float, Float, true),
    op("fp.mul", 2, Float, Float, true),
    op("fp.div", 2, Float, Float, true),
    op("fp.rem", 2, Float, Float, false),
    op("fp.min", 2, Float, Float, false),
    op("fp.max", 2, Float, Float, false),
    op("fp.fma", 3, Float, Float, true),
    // conversions
    op("fp.cast", 1, Float, Float, true),
    op("fp.from.binary", 1, BitVec, Float, false),
    op("fp.from.ubv", 1, BitVec, Float, true),
    op("fp.from.sbv", 1, BitVec, Float, true),
    op("fp.to.ubv", 1, Float, BitVec, true),
    op("fp.to.sbv", 1, Float, BitVec, true),
    op("fp.from.real", 1, Real, Float, true),
    op("fp.to.real", 1, Float, Real, false),
    op("fp.from.int", 1, Int, Float, true),
    op("fp.to.int", 1, Float, Int, true),
];

impl Operator {
    pub fn lookup(name: &str) -> Option<Operator> {
        CATALOG.iter().find(|o| o.name == name).copied()
    }

    /// Like `lookup`, for names the generator itself hard-codes.
    pub(crate) fn named(name: &'static str) -> Operator {
        match Operator::lookup(name) {
            Some(o) => o,
            None => panic!("operator {} missing from catalog", name),
        }
    }

    /// Operator name without the `fp.` prefix, used for file names.
    pub fn short_name(&self) -> &'static str {
        self.name.strip_prefix("fp.").unwrap_or(self.name)
    }

    /// The SMT-LIB function symbol.
    pub fn smtlib_name(&self) -> &'static str {
        match self.name {
            "smtlib.eq" => "=",
            "fp.to.ubv" => "fp.to_ubv",
            "fp.to.sbv" => "fp.to_sbv",
            "fp.to.real" => "fp.to_real",
            other => other,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Operators matching an arity and optionally argument and result sorts, in
/// catalog order.
pub fn all_ops_where(arity: usize, args: Option<Sort>, result: Option<Sort>) -> Vec<Operator> {
    CATALOG
        .iter()
        .filter(|o| o.arity == arity)
        .filter(|o| args.map_or(true, |s| o.args == s))
        .filter(|o| result.map_or(true, |s| o.result == s))
        .copied()
        .collect()
}
