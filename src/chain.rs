//! Hash-chain one-time codes ([RFC 2289][2289]).
//!
//! A chain is seeded once from a seed and passphrase, then each code is the
//! digest of the previous state folded back down to eight bytes. The party
//! holding the passphrase walks the chain backwards, which is why the moving
//! factor here is a strictly decreasing remaining-iteration count.
//!
//! [2289]: https://tools.ietf.org/html/rfc2289

use core::str::FromStr;

use md4::{Digest, Md4};
use md5::Md5;

use crate::{OtpError, Result};

const SEED_LEN: core::ops::RangeInclusive<usize> = 2..=16;
const PASSPHRASE_LEN: core::ops::RangeInclusive<usize> = 11..=63;

/// Digest algorithm used to advance a hash chain.
///
/// RFC 2289 defines MD4 and MD5 parameterizations; nothing newer is part of
/// the scheme.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChainAlgorithm {
    Md4,
    Md5,
}

impl ChainAlgorithm {
    fn digest(self, data: &[u8]) -> [u8; 16] {
        match self {
            Self::Md4 => Md4::digest(data).into(),
            Self::Md5 => Md5::digest(data).into(),
        }
    }
}

impl FromStr for ChainAlgorithm {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md4" => Ok(Self::Md4),
            "md5" => Ok(Self::Md5),
            _ => Err(OtpError::UnsupportedAlgorithm),
        }
    }
}

/// Hash-chain one-time code generator.
///
/// The initial chain state is derived once at construction; every code is a
/// pure function of that state and an iteration count, so codes for a given
/// (seed, passphrase, algorithm) are reproducible without replaying prior
/// calls. The only mutable state is the remaining-iteration count consumed by
/// [`next`](HashChain::next).
pub struct HashChain {
    algorithm: ChainAlgorithm,
    initial: [u8; 8],
    remaining: u64,
}

impl HashChain {
    /// Derives a chain from a seed and passphrase.
    ///
    /// The seed is lowercased, concatenated with the passphrase, hashed, and
    /// folded to produce the initial state.
    ///
    /// # Errors
    ///
    /// Fails with [`OtpError::InvalidSeed`] unless the seed is 2-16
    /// alphanumeric characters, or [`OtpError::InvalidPassphrase`] unless the
    /// passphrase is 11-63 characters. Parsing an algorithm name with
    /// [`ChainAlgorithm::from_str`] reports unknown names as
    /// [`OtpError::UnsupportedAlgorithm`].
    pub fn new(
        seed: &str,
        passphrase: &str,
        iterations: u64,
        algorithm: ChainAlgorithm,
    ) -> Result<Self> {
        if !SEED_LEN.contains(&seed.len()) || !seed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(OtpError::InvalidSeed);
        }
        if !PASSPHRASE_LEN.contains(&passphrase.len()) {
            return Err(OtpError::InvalidPassphrase);
        }
        let mut material = seed.to_lowercase().into_bytes();
        material.extend_from_slice(passphrase.as_bytes());
        Ok(Self {
            algorithm,
            initial: fold(algorithm.digest(&material)),
            remaining: iterations,
        })
    }

    /// Codes left before the chain is exhausted.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Computes the code after `count` chain steps.
    ///
    /// Pure function of the initial state: `count` applications of
    /// fold-of-digest, with `at(0)` formatting the initial state itself. The
    /// remaining-iteration count is neither read nor consumed.
    pub fn at(&self, count: u64) -> String {
        let mut state = self.initial;
        for _ in 0..count {
            state = fold(self.algorithm.digest(&state));
        }
        format_state(&state)
    }

    /// Computes the code for the current remaining-iteration count, then
    /// decrements it by one.
    ///
    /// # Errors
    ///
    /// Fails with [`OtpError::ChainExhausted`] once the count has reached
    /// zero; the exhausted chain is left untouched.
    pub fn next(&mut self) -> Result<String> {
        if self.remaining == 0 {
            return Err(OtpError::ChainExhausted);
        }
        let code = self.at(self.remaining);
        self.remaining -= 1;
        Ok(code)
    }
}

// The chain state is one hash away from a valid code, so it stays out of
// debug output just like a secret would.
impl core::fmt::Debug for HashChain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashChain")
            .field("algorithm", &self.algorithm)
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

// RFC 2289 §6.0: XOR the high half of the digest into the low half.
fn fold(digest: [u8; 16]) -> [u8; 8] {
    let mut state = [0u8; 8];
    for (i, byte) in state.iter_mut().enumerate() {
        *byte = digest[i] ^ digest[i + 8];
    }
    state
}

// Four uppercase-hex groups, e.g. "1122 3344 5566 7788".
fn format_state(state: &[u8; 8]) -> String {
    state
        .chunks(2)
        .map(|pair| format!("{:02X}{:02X}", pair[0], pair[1]))
        .collect::<Vec<_>>()
        .join(" ")
}
