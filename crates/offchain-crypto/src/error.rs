//! Error types for ECIES operations

use thiserror::Error;

/// Errors from envelope encryption and decryption
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EciesError {
    /// The MAC embedded in the envelope does not match the recomputed MAC.
    ///
    /// Either the envelope was tampered with or it was not encrypted to the
    /// key used for decryption. No plaintext is produced.
    #[error("MAC mismatch")]
    MacMismatch,

    /// Envelope is too short to contain every fixed-size section
    #[error("malformed envelope: expected at least {expected_at_least} bytes, got {actual}")]
    MalformedEnvelope {
        /// Minimum length for the section being parsed
        expected_at_least: usize,
        /// Actual input length
        actual: usize,
    },

    /// Public key bytes do not decode to a point on secp256k1
    #[error("invalid public key: {reason}")]
    InvalidPublicKey {
        /// Why the key was rejected
        reason: String,
    },

    /// Private key bytes are not a valid secp256k1 scalar
    #[error("invalid private key: {reason}")]
    InvalidPrivateKey {
        /// Why the key was rejected
        reason: String,
    },

    /// Key material was not valid hexadecimal
    #[error("invalid hex encoding: {reason}")]
    InvalidHex {
        /// Decoder error message
        reason: String,
    },

    /// The random source could not produce bytes
    #[error("random source failure: {reason}")]
    Randomness {
        /// Description from the underlying source
        reason: String,
    },

    /// The random source never produced a scalar in `[1, n)`
    #[error("ephemeral key generation failed after {attempts} attempts")]
    KeyGeneration {
        /// Number of draws made before giving up
        attempts: u32,
    },
}

impl EciesError {
    /// Returns true if the envelope failed authentication.
    ///
    /// Callers storing encrypted data off-chain usually treat this as "not
    /// readable with this key" rather than as a hard failure.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::MacMismatch)
    }

    /// Returns true if the input was structurally invalid (bad lengths,
    /// encodings or curve points).
    pub fn is_malformed_input(&self) -> bool {
        match self {
            Self::MalformedEnvelope { .. }
            | Self::InvalidPublicKey { .. }
            | Self::InvalidPrivateKey { .. }
            | Self::InvalidHex { .. } => true,

            Self::MacMismatch | Self::Randomness { .. } | Self::KeyGeneration { .. } => false,
        }
    }
}

impl From<hex::FromHexError> for EciesError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidHex { reason: err.to_string() }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, EciesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_mismatch_is_authentication_failure() {
        assert!(EciesError::MacMismatch.is_authentication_failure());
        assert!(!EciesError::MacMismatch.is_malformed_input());
    }

    #[test]
    fn short_envelope_is_malformed() {
        let err = EciesError::MalformedEnvelope { expected_at_least: 113, actual: 10 };
        assert!(err.is_malformed_input());
        assert!(!err.is_authentication_failure());
    }

    #[test]
    fn randomness_is_neither() {
        let err = EciesError::Randomness { reason: "unavailable".to_string() };
        assert!(!err.is_malformed_input());
        assert!(!err.is_authentication_failure());
    }

    #[test]
    fn hex_errors_convert() {
        let err: EciesError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, EciesError::InvalidHex { .. }));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn error_display() {
        let err = EciesError::MalformedEnvelope { expected_at_least: 113, actual: 112 };
        assert_eq!(
            err.to_string(),
            "malformed envelope: expected at least 113 bytes, got 112"
        );
        assert_eq!(EciesError::MacMismatch.to_string(), "MAC mismatch");
    }
}
