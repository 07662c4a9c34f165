//! One-time authentication codes derived from a shared secret and a moving
//! factor.
//!
//! Three related families are provided:
//!
//! - [`Hotp`]: counter-based codes per [RFC 4226][4226]. The moving factor is
//!   an eight-byte synchronized counter.
//! - [`Totp`]: time-based codes per [RFC 6238][6238], layered over the
//!   counter scheme by deriving the counter from elapsed wall-clock time.
//! - [`HashChain`]: lock-step hash-chain codes per [RFC 2289][2289], built
//!   from iterated MD4/MD5 folding rather than an HMAC.
//!
//! Each generator is a self-contained value: it owns its secret material and
//! the minimal moving-factor state (a counter, or a remaining-iteration
//! count), and nothing else. Provisioning, persistence, and transport of
//! codes are the caller's concern.
//!
//! Mutating operations (`next`, `sync`, counter-advancing `drift`) take
//! `&mut self`, so the "each factor issued at most once" invariant is
//! enforced by exclusive access; wrap a generator in a `Mutex` to share it
//! across threads. Read-only operations (`at`, `verify`) may be called
//! concurrently through shared references.
//!
//! [4226]: https://tools.ietf.org/html/rfc4226
//! [6238]: https://tools.ietf.org/html/rfc6238
//! [2289]: https://tools.ietf.org/html/rfc2289

mod chain;
mod hotp;
mod totp;
mod truncate;

pub use chain::{ChainAlgorithm, HashChain};
pub use hotp::Hotp;
pub use totp::Totp;

use thiserror::Error;

/// One-time-code error type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Error)]
pub enum OtpError {
    /// The shared secret was shorter than 16 bytes (128 bits).
    ///
    /// [RFC 4226][4226] requires a secret of at least 128 bits and
    /// recommends 160.
    ///
    /// [4226]: https://tools.ietf.org/html/rfc4226
    #[error("secret must be at least 16 bytes (128 bits)")]
    InvalidSecretLength,
    /// The requested code width was below six digits.
    #[error("codes must be at least 6 digits wide")]
    InvalidDigitCount,
    /// A counter value supplied to `sync` was not representable as `u64`.
    #[error("counter value is not representable as an unsigned 64-bit integer")]
    InvalidCounter,
    /// A drift window extended past the representable counter range.
    #[error("drift window extends outside the representable counter range")]
    InvalidDriftRange,
    /// The configured epoch was zero or negative.
    #[error("epoch must be a positive point in time")]
    InvalidEpoch,
    /// The hash-chain seed was not 2-16 alphanumeric characters.
    #[error("seed must be 2-16 alphanumeric characters")]
    InvalidSeed,
    /// The hash-chain passphrase was not 11-63 characters.
    #[error("passphrase must be 11-63 characters")]
    InvalidPassphrase,
    /// The requested hash-chain algorithm is not MD4 or MD5.
    #[error("unsupported hash algorithm (expected md4 or md5)")]
    UnsupportedAlgorithm,
    /// The hash chain has no remaining codes.
    #[error("hash chain exhausted; a new seed and passphrase are required")]
    ChainExhausted,
}

pub type Result<T> = std::result::Result<T, OtpError>;
