//! Families over float operands: classification predicates, relations and
//! the arithmetic operators.

use log::warn;

use super::{apply, write_vars, Emitter};
use crate::classes::Registry;
use crate::config::GeneratorConfig;
use crate::entropy::Entropy;
use crate::error::GenResult;
use crate::eval::{fp_eval_function, fp_eval_predicate, Outcome};
use crate::ops::Operator;
use crate::smtlib::DEFAULT_LOGIC;
use crate::vectors::gen_vectors;

/// `result` is bound to the predicate applied to the operands and the goal
/// checks it against the evaluated truth.
pub(super) fn predicates(
    ops: &[Operator],
    config: &GeneratorConfig,
    entropy: &mut Entropy,
    emitter: &mut Emitter,
    test_dup: u32,
) -> GenResult<usize> {
    let mut written = 0;
    for op in ops {
        let registry = Registry::for_operator(op);
        written += gen_vectors(op, &registry, &config.precisions, test_dup, entropy, |vector, entropy| {
            let truth = fp_eval_predicate(&vector.op, &vector.operands)?;
            let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
            w.header(vector.expectation, Some(&vector.comment), DEFAULT_LOGIC)?;
            write_vars(&mut w, &vector, entropy)?;
            let definition = format!("(= result {})", apply(&vector.op, vector.rounding, vector.op.arity));
            w.var("result", "Bool", Some(&definition), None)?;
            w.goal("result", vector.expectation, truth)?;
            w.footer()?;
            Ok(())
        })?;
    }
    Ok(written)
}

/// `result` is bound to the operator applied to the operands and the goal
/// compares it with a literal of the evaluated value. Vectors whose result
/// is unspecified are skipped.
pub(super) fn functions(
    ops: &[Operator],
    config: &GeneratorConfig,
    entropy: &mut Entropy,
    emitter: &mut Emitter,
    test_dup: u32,
) -> GenResult<usize> {
    let mut written = 0;
    for op in ops {
        let registry = Registry::for_operator(op);
        gen_vectors(op, &registry, &config.precisions, test_dup, entropy, |vector, entropy| {
            let result = match fp_eval_function(&vector.op, vector.rounding, &vector.operands)? {
                Outcome::Value(result) => result,
                Outcome::Unspecified => {
                    warn!("skipping {}: result is unspecified", vector.comment);
                    return Ok(());
                }
            };
            let mut w = emitter.new_test(&vector.op, vector.rounding, &vector.comment)?;
            w.header(vector.expectation, Some(&vector.comment), DEFAULT_LOGIC)?;
            write_vars(&mut w, &vector, entropy)?;
            let definition = format!("(= result {})", apply(&vector.op, vector.rounding, vector.op.arity));
            w.var("result", &result.smtlib_sort(), Some(&definition), Some(&result.to_string()))?;
            let goal = format!("(= result {})", result.smtlib_random_literal(entropy));
            w.goal(&goal, vector.expectation, true)?;
            w.footer()?;
            written += 1;
            Ok(())
        })?;
    }
    Ok(written)
}
