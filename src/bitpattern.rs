//! Bit-pattern probing for conversions from bitvectors.
//!
//! The sign-adjacent top bits and the bottom bits decide most of the
//! interesting behaviour (sign, magnitude class, rounding of the last place),
//! so all sixteen settings of the first two and last two bits are tried, each
//! with an all-zero, an all-one and `test_dup` random interiors.

use crate::bitvector::BitVector;
use crate::entropy::Entropy;
use crate::error::{GenError, GenResult};
use crate::ops::Operator;
use crate::rounding::RoundingMode;
use crate::vectors::{rounding_modes, Expectation, TestVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interior {
    Zeros,
    Ones,
    Random(u32),
}

impl Interior {
    fn label(self) -> String {
        match self {
            Interior::Zeros => "zeros".to_string(),
            Interior::Ones => "ones".to_string(),
            Interior::Random(i) => format!("random__{}", i),
        }
    }
}

/// Number of vectors `gen_bv_vectors` yields for one width.
pub fn vectors_per_width(op: &Operator, test_dup: u32) -> usize {
    16 * rounding_modes(op).len() * (2 + test_dup as usize)
}

fn corner_seed(op: &Operator, width: usize, corners: [bool; 4], rm: RoundingMode, interior: Interior) -> String {
    let bits: String = corners.iter().map(|&b| if b { '1' } else { '0' }).collect();
    format!("{}__{}__{}__{}__{}", op.name, width, bits, rm.name(), interior.label())
}

/// Walk every width in `widths`, handing each vector to `sink`. Returns the
/// number of vectors produced.
pub fn gen_bv_vectors<F>(
    op: &Operator,
    widths: &[usize],
    test_dup: u32,
    entropy: &mut Entropy,
    mut sink: F,
) -> GenResult<usize>
where
    F: FnMut(TestVector<BitVector>, &mut Entropy) -> GenResult<()>,
{
    let mut produced = 0;
    for &width in widths {
        if width < 4 {
            return Err(GenError::Config(format!(
                "bitvector width {} leaves no interior bits",
                width
            )));
        }
        let comment = format!("{}(BitVec {})", op.name, width);
        for code in 0..16u8 {
            let corners = [code & 8 != 0, code & 4 != 0, code & 2 != 0, code & 1 != 0];
            let mut bv = BitVector::new(width);
            bv[0] = corners[0];
            bv[1] = corners[1];
            bv[width - 2] = corners[2];
            bv[width - 1] = corners[3];

            for rm in rounding_modes(op) {
                let interiors = [Interior::Zeros, Interior::Ones]
                    .into_iter()
                    .chain((0..test_dup).map(Interior::Random));
                for interior in interiors {
                    entropy.reseed(&corner_seed(op, width, corners, rm, interior));
                    let expectation = Expectation::random(entropy);
                    match interior {
                        Interior::Zeros => bv.fill(2, width - 2, false),
                        Interior::Ones => bv.fill(2, width - 2, true),
                        Interior::Random(_) => bv.randomize(entropy, 2, width - 2),
                    }
                    let vector = TestVector {
                        op: *op,
                        rounding: rm,
                        expectation,
                        operands: vec![bv.clone()],
                        comment: comment.clone(),
                        classes: vec![interior.label()],
                    };
                    produced += 1;
                    sink(vector, entropy)?;
                }
            }
        }
    }
    Ok(produced)
}
