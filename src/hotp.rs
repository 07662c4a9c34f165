//! Counter-based one-time codes ([RFC 4226][4226]).
//!
//! [4226]: https://tools.ietf.org/html/rfc4226

use core::fmt;

use ring::constant_time::verify_slices_are_equal;

use crate::truncate::hotp_code;
use crate::{OtpError, Result};

const MIN_DIGITS: u32 = 6;
const MIN_SECRET_BYTES: usize = 16;

/// Counter-based one-time code generator.
///
/// Owns a shared secret and an eight-byte synchronized moving counter. The
/// secret is immutable once constructed; the counter is the only mutable
/// state, advanced by [`next`](Hotp::next), by an advancing
/// [`drift`](Hotp::drift), or overwritten by [`sync`](Hotp::sync).
///
/// As per [RFC 4226][4226], the secret must be at least 128 bits (16 bytes),
/// with 160 bits recommended, and codes must be at least six digits wide.
///
/// [4226]: https://tools.ietf.org/html/rfc4226
pub struct Hotp {
    secret: Vec<u8>,
    digits: u32,
    counter: u64,
}

impl Hotp {
    /// Creates a generator with the given secret, initial counter value, and
    /// code width.
    ///
    /// # Errors
    ///
    /// Fails with [`OtpError::InvalidSecretLength`] if the secret is shorter
    /// than 16 bytes, or [`OtpError::InvalidDigitCount`] if `digits < 6`.
    pub fn new(secret: impl Into<Vec<u8>>, counter: u64, digits: u32) -> Result<Self> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_BYTES {
            return Err(OtpError::InvalidSecretLength);
        }
        if digits < MIN_DIGITS {
            return Err(OtpError::InvalidDigitCount);
        }
        Ok(Self {
            secret,
            digits,
            counter,
        })
    }

    /// The current value of the internal counter.
    ///
    /// This is the moving factor the next [`next`](Hotp::next) call will
    /// consume; callers persisting generator state store this value.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Computes the code for an arbitrary counter value.
    ///
    /// Pure with respect to the generator: the internal counter is neither
    /// read nor advanced.
    pub fn at(&self, factor: u64) -> String {
        hotp_code(&self.secret, factor, self.digits)
    }

    /// Computes the code for the current counter value, then increments the
    /// counter by one.
    ///
    /// Each counter value is consumed exactly once; a value is never reissued
    /// without an explicit [`sync`](Hotp::sync).
    pub fn next(&mut self) -> String {
        let code = self.at(self.counter);
        self.counter += 1;
        code
    }

    /// Checks a received code against the code for the given counter value.
    ///
    /// The comparison runs in constant time with respect to the mismatch
    /// position. The internal counter is untouched; resynchronizing after a
    /// successful match is the caller's decision (see [`sync`](Hotp::sync)).
    pub fn verify(&self, code: &str, factor: u64) -> bool {
        verify_slices_are_equal(code.as_bytes(), self.at(factor).as_bytes()).is_ok()
    }

    /// Computes the codes for every counter in
    /// `[initial - backwards, initial + forwards]`, in ascending counter
    /// order.
    ///
    /// This is the resynchronization primitive: a verifier derives the window
    /// around its expected counter and checks the received code for
    /// membership. If `advance` is true the internal counter is increased by
    /// `step` unconditionally — whether any code in the window matched is not
    /// this method's concern.
    ///
    /// # Errors
    ///
    /// Fails with [`OtpError::InvalidDriftRange`] if `backwards > initial`
    /// (the window would extend below counter zero; wraparound is never
    /// performed) or if `initial + forwards` overflows.
    pub fn drift(
        &mut self,
        initial: u64,
        backwards: u64,
        forwards: u64,
        advance: bool,
        step: u64,
    ) -> Result<Vec<String>> {
        let codes = self.window(initial, backwards, forwards)?;
        if advance {
            self.counter += step;
        }
        Ok(codes)
    }

    /// Unconditionally overwrites the internal counter.
    ///
    /// Used when a verifier has independently confirmed a match at a
    /// higher-than-expected counter and wants subsequent [`next`](Hotp::next)
    /// calls to resume from there.
    ///
    /// # Errors
    ///
    /// Fails with [`OtpError::InvalidCounter`] if `new_counter` does not
    /// convert to `u64` (a negative value from a signed source type).
    pub fn sync(&mut self, new_counter: impl TryInto<u64>) -> Result<()> {
        self.counter = new_counter
            .try_into()
            .map_err(|_| OtpError::InvalidCounter)?;
        Ok(())
    }

    // Shared with the time-based generator, which drifts over timesteps.
    pub(crate) fn window(
        &self,
        initial: u64,
        backwards: u64,
        forwards: u64,
    ) -> Result<Vec<String>> {
        let start = initial
            .checked_sub(backwards)
            .ok_or(OtpError::InvalidDriftRange)?;
        let end = initial
            .checked_add(forwards)
            .ok_or(OtpError::InvalidDriftRange)?;
        Ok((start..=end).map(|factor| self.at(factor)).collect())
    }
}

// The secret never appears in logs or debug output.
impl fmt::Debug for Hotp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hotp")
            .field("digits", &self.digits)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"12345678901234567890";
    const RFC4226_CODES: [&str; 10] = [
        "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583", "399871",
        "520489",
    ];

    fn generator() -> Hotp {
        Hotp::new(SECRET, 0, 6).unwrap()
    }

    #[test]
    fn rfc4226_appendix_d_vectors() {
        let hotp = generator();
        for (i, expected) in RFC4226_CODES.iter().enumerate() {
            assert_eq!(hotp.at(i as u64), *expected);
        }
    }

    #[test]
    fn short_secret_rejected() {
        let err = Hotp::new(&b"1234"[..], 0, 6).unwrap_err();
        assert_eq!(err, OtpError::InvalidSecretLength);
    }

    #[test]
    fn narrow_codes_rejected() {
        assert!(matches!(
            Hotp::new(SECRET, 0, 5),
            Err(OtpError::InvalidDigitCount)
        ));
        assert!(Hotp::new(SECRET, 0, 6).is_ok());
    }

    #[test]
    fn next_consumes_each_counter_once() {
        let mut hotp = generator();
        for expected in RFC4226_CODES {
            assert_eq!(hotp.next(), expected);
        }
        assert_eq!(hotp.counter(), 10);
    }

    #[test]
    fn at_does_not_touch_counter() {
        let hotp = generator();
        assert_eq!(hotp.at(3), hotp.at(3));
        assert_eq!(hotp.counter(), 0);
    }

    #[test]
    fn verify_matches_only_the_right_factor() {
        let hotp = generator();
        for (i, code) in RFC4226_CODES.iter().enumerate() {
            assert!(hotp.verify(code, i as u64));
            assert!(!hotp.verify(code, i as u64 + 1));
        }
    }

    #[test]
    fn drift_window_is_ascending_and_inclusive() {
        let mut hotp = generator();
        let codes = hotp.drift(3, 1, 1, false, 1).unwrap();
        assert_eq!(codes, vec![hotp.at(2), hotp.at(3), hotp.at(4)]);
        assert_eq!(hotp.counter(), 0);
    }

    #[test]
    fn drift_underflow_is_fatal() {
        let mut hotp = generator();
        assert_eq!(
            hotp.drift(0, 1, 0, false, 1),
            Err(OtpError::InvalidDriftRange)
        );
    }

    #[test]
    fn drift_advance_moves_counter_unconditionally() {
        let mut hotp = generator();
        // No membership check happens here; the step applies regardless.
        hotp.drift(100, 2, 2, true, 3).unwrap();
        assert_eq!(hotp.counter(), 3);
        hotp.drift(100, 2, 2, true, 1).unwrap();
        assert_eq!(hotp.counter(), 4);
    }

    #[test]
    fn sync_overwrites_counter() {
        let mut hotp = generator();
        hotp.sync(42u64).unwrap();
        assert_eq!(hotp.counter(), 42);
        assert_eq!(hotp.next(), hotp.at(42));
    }

    #[test]
    fn sync_rejects_negative_counters() {
        let mut hotp = generator();
        assert_eq!(hotp.sync(-1i64), Err(OtpError::InvalidCounter));
        assert_eq!(hotp.counter(), 0);
        assert_eq!(hotp.sync(7i64), Ok(()));
        assert_eq!(hotp.counter(), 7);
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", generator());
        assert!(!rendered.contains("12345678901234567890"));
        assert!(rendered.contains("counter"));
    }
}
