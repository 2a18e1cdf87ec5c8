//! SMT-LIB benchmark text.
//!
//! A benchmark is a status header, a sequence of declaration/assertion
//! blocks, a single goal and a closing section. Expected values are written
//! as comments next to the declaration they belong to, so a failing solver
//! run can be diagnosed by reading the file alone.

use std::io::{self, Write};

use crate::vectors::Expectation;

pub const DEFAULT_LOGIC: &str = "QF_FP";

pub struct BenchmarkWriter<W: Write> {
    out: W,
}

impl<W: Write> BenchmarkWriter<W> {
    pub fn new(out: W) -> Self {
        BenchmarkWriter { out }
    }

    pub fn header(&mut self, status: Expectation, comment: Option<&str>, logic: &str) -> io::Result<()> {
        writeln!(self.out, "(set-info :smt-lib-version 2.6)")?;
        writeln!(self.out, "(set-logic {})", logic)?;
        writeln!(self.out, "(set-info :source |")?;
        writeln!(self.out, "Generated by: fpgen")?;
        if let Some(comment) = comment {
            writeln!(self.out, "Generator: {}", comment.replace('|', "/"))?;
        }
        writeln!(self.out, "|)")?;
        writeln!(self.out, "(set-info :category \"crafted\")")?;
        writeln!(self.out, "(set-info :status {})", status)?;
        Ok(())
    }

    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        for line in text.lines() {
            writeln!(self.out, ";; {}", line)?;
        }
        Ok(())
    }

    /// Declare a constant, optionally constrain it and note its expected value.
    pub fn var(
        &mut self,
        name: &str,
        sort: &str,
        assertion: Option<&str>,
        expectation: Option<&str>,
    ) -> io::Result<()> {
        writeln!(self.out, "(declare-const {} {})", name, sort)?;
        if let Some(assertion) = assertion {
            self.assertion(assertion)?;
        }
        if let Some(expectation) = expectation {
            writeln!(self.out, ";; {} should be {}", name, expectation)?;
        }
        Ok(())
    }

    pub fn assertion(&mut self, expr: &str) -> io::Result<()> {
        writeln!(self.out, "(assert {})", expr)
    }

    /// Assert `expr` when its truth value `holds` agrees with the expected
    /// status, and its negation otherwise. A sat benchmark thus asserts
    /// something true, an unsat benchmark something false.
    pub fn goal(&mut self, expr: &str, expectation: Expectation, holds: bool) -> io::Result<()> {
        writeln!(self.out, "(define-fun goal () Bool")?;
        if expectation.is_sat() == holds {
            writeln!(self.out, "  {})", expr)?;
        } else {
            writeln!(self.out, "  (not {}))", expr)?;
        }
        writeln!(self.out, "(assert goal)")?;
        writeln!(self.out, "(check-sat)")
    }

    pub fn footer(&mut self) -> io::Result<()> {
        writeln!(self.out, "(exit)")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
