//! The seeded pseudorandom stream shared by every construction path.
//!
//! Seeds are strings derived from class names (never from enumeration
//! positions). A seed string is hashed with SHA-256 and the digest keys a
//! ChaCha8 stream, so the values drawn after `reseed(s)` depend only on `s`
//! and the optional run salt.

use num_bigint::{BigInt, RandBigInt};
use num_traits::One;
use rand::{Error, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct Entropy {
    salt: String,
    rng: ChaCha8Rng,
}

impl Entropy {
    /// A stream keyed by `salt`; an empty salt is the canonical run.
    pub fn new(salt: &str) -> Entropy {
        Entropy {
            salt: salt.to_string(),
            rng: ChaCha8Rng::from_seed(Entropy::digest(salt, "")),
        }
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Restart the stream from a seed string.
    pub fn reseed(&mut self, seed: &str) {
        self.rng = ChaCha8Rng::from_seed(Entropy::digest(&self.salt, seed));
    }

    fn digest(salt: &str, seed: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        if !salt.is_empty() {
            hasher.update(salt.as_bytes());
            hasher.update(b"::");
        }
        hasher.update(seed.as_bytes());
        hasher.finalize().into()
    }

    pub fn coin(&mut self) -> bool {
        self.rng.gen::<bool>()
    }

    /// Uniform pick from a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "cannot choose from an empty slice");
        &items[self.rng.gen_range(0..items.len())]
    }

    pub fn randint(&mut self, lo: &BigInt, hi: &BigInt) -> BigInt {
        randint(&mut self.rng, lo, hi)
    }
}

impl RngCore for Entropy {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Uniform integer in the closed range `[lo, hi]`.
pub fn randint<R: Rng + ?Sized>(rng: &mut R, lo: &BigInt, hi: &BigInt) -> BigInt {
    assert!(lo <= hi, "empty range [{}, {}]", lo, hi);
    rng.gen_bigint_range(lo, &(hi + BigInt::one()))
}
