//! Private key configuration.
//!
//! The key is read from `--key-file` when given, otherwise from `--key` /
//! the `OFFCHAIN_PRIVATE_KEY` environment variable. Key files hold a single
//! hex scalar, optionally `0x`-prefixed, surrounding whitespace ignored.

use std::{fmt, path::PathBuf};

use offchain_crypto::PrivateKey;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::CliError;

/// Environment variable holding the hex-encoded private key
pub const PRIVATE_KEY_ENV: &str = "OFFCHAIN_PRIVATE_KEY";

/// Where to load the private key from.
#[derive(clap::Args, Clone, Default)]
pub struct KeyConfig {
    /// File containing the hex-encoded private key
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    /// Hex-encoded private key
    #[arg(long = "key", env = PRIVATE_KEY_ENV, hide_env_values = true)]
    pub key_hex: Option<String>,
}

impl KeyConfig {
    /// Load the configured private key. The key file takes precedence.
    pub fn load(&self) -> Result<PrivateKey, CliError> {
        if let Some(path) = &self.key_file {
            debug!(path = %path.display(), "loading private key from file");
            let contents = Zeroizing::new(std::fs::read_to_string(path)?);
            return Ok(PrivateKey::from_hex(&contents)?);
        }

        if let Some(encoded) = &self.key_hex {
            debug!("loading private key from argument or environment");
            return Ok(PrivateKey::from_hex(encoded)?);
        }

        Err(CliError::MissingKey)
    }
}

impl fmt::Debug for KeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyConfig")
            .field("key_file", &self.key_file)
            .field("key_hex", &self.key_hex.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Drop for KeyConfig {
    fn drop(&mut self) {
        if let Some(encoded) = self.key_hex.as_mut() {
            zeroize::Zeroize::zeroize(encoded);
        }
    }
}
