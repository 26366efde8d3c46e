//! Randomness abstraction for deterministic testing.
//!
//! Every operation that needs fresh entropy (ephemeral keys, IVs) draws it
//! from a caller-supplied [`RandomSource`]. Production code passes
//! [`OsRandom`]; tests pass a seeded or fixed source instead of stubbing any
//! global generator.

use crate::error::{EciesError, Result};

/// Source of cryptographically secure random bytes.
///
/// # Invariants
///
/// - Production implementations MUST use cryptographically secure entropy
/// - Implementations MUST be safe to share across threads
/// - A failed fill MUST return an error rather than leave the buffer
///   partially written and report success
pub trait RandomSource: Send + Sync {
    /// Fills the provided buffer with random bytes.
    fn fill_bytes(&self, buffer: &mut [u8]) -> Result<()>;
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn fill_bytes(&self, buffer: &mut [u8]) -> Result<()> {
        (**self).fill_bytes(buffer)
    }
}

/// Operating system CSPRNG backed by `getrandom`.
///
/// Uses `/dev/urandom`/`getrandom(2)` on Linux and the platform equivalent
/// elsewhere. Stateless, so a single value can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, buffer: &mut [u8]) -> Result<()> {
        getrandom::fill(buffer).map_err(|err| EciesError::Randomness { reason: err.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_random_bytes_are_random() {
        let mut bytes1 = [0u8; 32];
        let mut bytes2 = [0u8; 32];

        OsRandom.fill_bytes(&mut bytes1).unwrap();
        OsRandom.fill_bytes(&mut bytes2).unwrap();

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "random bytes should differ");
    }

    #[test]
    fn os_random_fills_empty_buffer() {
        let mut bytes = [0u8; 0];
        assert!(OsRandom.fill_bytes(&mut bytes).is_ok());
    }

    #[test]
    fn reference_forwards_to_source() {
        let source = OsRandom;
        let by_ref = &source;

        let mut bytes = [0u8; 64];
        by_ref.fill_bytes(&mut bytes).unwrap();

        let non_zero_count = bytes.iter().filter(|&&b| b != 0).count();
        assert!(non_zero_count > 32, "most bytes should be non-zero");
    }
}
