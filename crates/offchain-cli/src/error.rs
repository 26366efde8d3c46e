//! CLI error types.

use offchain_crypto::EciesError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading input or writing output failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Envelope input was not valid hexadecimal
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Encryption, decryption or key parsing failed
    #[error(transparent)]
    Crypto(#[from] EciesError),

    /// No private key was configured for a command that needs one
    #[error("no private key configured: pass --key-file or set OFFCHAIN_PRIVATE_KEY")]
    MissingKey,
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Authentication failures get their own code so scripts can tell
    /// "not for this key / tampered" apart from bad input.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Crypto(err) if err.is_authentication_failure() => 3,
            Self::Io(_) => 1,
            Self::Hex(_) | Self::Crypto(_) | Self::MissingKey => 2,
        }
    }
}
