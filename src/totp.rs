//! Time-based one-time codes ([RFC 6238][6238]).
//!
//! [6238]: https://tools.ietf.org/html/rfc6238

use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::hotp::Hotp;
use crate::{OtpError, Result};

// RFC 6238 §5.2 recommends a 30-second step; shorter steps are accepted but
// reported through the warning channel.
const RECOMMENDED_MIN_STEP: u64 = 30;

/// Time-based one-time code generator.
///
/// Holds a counter-based [`Hotp`] generator and maps wall-clock time onto its
/// moving factor: `timestep = floor((unix_time - epoch) / step_seconds)`.
/// Time is the only moving factor — unlike [`Hotp`], nothing here advances on
/// [`next`](Totp::next), and the inner generator's counter is unused.
///
/// The raw-counter surface of [`Hotp`] is deliberately not re-exposed;
/// mixing explicit counters with derived timesteps on one value was a known
/// ambiguity in earlier designs of this scheme.
pub struct Totp {
    hotp: Hotp,
    epoch: f64,
    step_seconds: u64,
}

impl Totp {
    /// Creates a generator with the given secret, epoch start (seconds since
    /// the Unix epoch), step duration in seconds, and code width.
    ///
    /// A step below 30 seconds is accepted unmodified but logged at warning
    /// level, per the soft RFC 6238 recommendation.
    ///
    /// # Errors
    ///
    /// Fails with [`OtpError::InvalidEpoch`] if `epoch <= 0`, and with the
    /// same secret/digit errors as [`Hotp::new`].
    pub fn new(
        secret: impl Into<Vec<u8>>,
        epoch: f64,
        step_seconds: u64,
        digits: u32,
    ) -> Result<Self> {
        let hotp = Hotp::new(secret, 0, digits)?;
        if epoch <= 0.0 {
            return Err(OtpError::InvalidEpoch);
        }
        if step_seconds < RECOMMENDED_MIN_STEP {
            log::warn!(
                "time step of {step_seconds}s is below the 30s recommended by RFC 6238; \
                 continuing with the configured value"
            );
        }
        Ok(Self {
            hotp,
            epoch,
            step_seconds,
        })
    }

    /// The timestep a given Unix timestamp falls in.
    pub fn timestep(&self, unix_time: f64) -> u64 {
        ((unix_time - self.epoch) / self.step_seconds as f64).floor() as u64
    }

    /// The timestep the wall clock currently falls in.
    pub fn current_timestep(&self) -> u64 {
        self.timestep(unix_now())
    }

    /// Computes the code that applies at the given Unix timestamp.
    pub fn at(&self, unix_time: f64) -> String {
        self.hotp.at(self.timestep(unix_time))
    }

    /// Computes the code for the current wall-clock time.
    pub fn next(&self) -> String {
        self.at(unix_now())
    }

    /// Checks a received code against the code for the timestep containing
    /// `unix_time`.
    ///
    /// The configured epoch is subtracted before the step division; compare
    /// [`verify_seconds`](Totp::verify_seconds), which takes an already
    /// epoch-relative duration. The comparison runs in constant time.
    pub fn verify_timestamp(&self, code: &str, unix_time: f64) -> bool {
        self.hotp.verify(code, self.timestep(unix_time))
    }

    /// Checks a received code against the code for the timestep
    /// `floor(seconds_since_epoch / step_seconds)`.
    ///
    /// The supplied duration is treated as already relative to the epoch; no
    /// subtraction happens here. The comparison runs in constant time.
    pub fn verify_seconds(&self, code: &str, seconds_since_epoch: f64) -> bool {
        let step = (seconds_since_epoch / self.step_seconds as f64).floor() as u64;
        self.hotp.verify(code, step)
    }

    /// Computes the codes for every timestep in
    /// `[initial - backwards, initial + forwards]`, in ascending order.
    ///
    /// Used to tolerate clock skew between the code generator and verifier.
    /// Read-only: unlike the counter generator's drift, there is no internal
    /// state to advance.
    ///
    /// # Errors
    ///
    /// Fails with [`OtpError::InvalidDriftRange`] if the window extends below
    /// timestep zero or overflows.
    pub fn drift(&self, initial: u64, backwards: u64, forwards: u64) -> Result<Vec<String>> {
        self.hotp.window(initial, backwards, forwards)
    }
}

impl fmt::Debug for Totp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Totp")
            .field("epoch", &self.epoch)
            .field("step_seconds", &self.step_seconds)
            .finish_non_exhaustive()
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
