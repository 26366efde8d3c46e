//! secp256k1 key types
//!
//! Public keys are accepted in the encodings used across the Ethereum
//! ecosystem (64-byte raw `X || Y`, 65-byte SEC1 uncompressed, 33-byte SEC1
//! compressed) and always re-serialized in the 65-byte uncompressed form that
//! the envelope format carries.

use std::fmt;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use zeroize::Zeroizing;

use crate::{
    error::{EciesError, Result},
    random::RandomSource,
};

/// Size of a secp256k1 private scalar in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of a raw `X || Y` public key (no SEC1 prefix)
pub const RAW_PUBLIC_KEY_SIZE: usize = 64;

/// Size of an uncompressed SEC1 public key (`0x04 || X || Y`)
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// Size of a compressed SEC1 public key (`0x02|0x03 || X`)
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// SEC1 tag for uncompressed points
pub(crate) const UNCOMPRESSED_TAG: u8 = 0x04;

/// Number of 32-byte draws before key generation gives up.
///
/// A uniformly random draw falls outside `[1, n)` with probability below
/// 2^-127, so hitting this bound means the random source is broken.
const MAX_KEYGEN_ATTEMPTS: u32 = 16;

/// A secp256k1 private key.
///
/// The underlying scalar is zeroized on drop. `Debug` never prints it.
#[derive(Clone)]
pub struct PrivateKey(k256::SecretKey);

impl PrivateKey {
    /// Parse a 32-byte big-endian scalar.
    ///
    /// # Errors
    ///
    /// - `InvalidPrivateKey`: wrong length, zero, or not below the curve
    ///   order
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(EciesError::InvalidPrivateKey {
                reason: format!("expected {PRIVATE_KEY_SIZE} bytes, got {}", bytes.len()),
            });
        }

        k256::SecretKey::from_slice(bytes).map(Self).map_err(|_| EciesError::InvalidPrivateKey {
            reason: "scalar is zero or not below the curve order".to_string(),
        })
    }

    /// Parse a hex-encoded scalar, with or without a `0x` prefix.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(hex::decode(strip_hex_prefix(encoded))?);
        Self::from_bytes(&bytes)
    }

    /// Generate a fresh private key from the given random source.
    ///
    /// Draws 32 bytes at a time and rejects values outside `[1, n)`.
    ///
    /// # Errors
    ///
    /// - `Randomness`: the source failed to produce bytes
    /// - `KeyGeneration`: no valid scalar after a bounded number of draws
    pub fn generate(rng: &impl RandomSource) -> Result<Self> {
        let mut candidate = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);

        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            rng.fill_bytes(candidate.as_mut_slice())?;
            if let Ok(secret) = k256::SecretKey::from_slice(candidate.as_slice()) {
                return Ok(Self(secret));
            }
        }

        Err(EciesError::KeyGeneration { attempts: MAX_KEYGEN_ATTEMPTS })
    }

    /// Big-endian scalar bytes, zeroized when the returned value is dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        out.copy_from_slice(self.0.to_bytes().as_slice());
        out
    }

    /// Hex encoding of the scalar (no `0x` prefix).
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_bytes().as_slice()))
    }

    /// The public key corresponding to this private key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }

    pub(crate) fn as_inner(&self) -> &k256::SecretKey {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("public_key", &self.public_key()).finish_non_exhaustive()
    }
}

/// A secp256k1 public key (a point on the curve, never the identity).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(k256::PublicKey);

impl PublicKey {
    /// Parse a public key from its raw, uncompressed or compressed encoding.
    ///
    /// | Length | Encoding |
    /// | ------ | -------- |
    /// | 64 | raw `X \|\| Y`, normalized by prepending `0x04` |
    /// | 65 | `0x04 \|\| X \|\| Y` |
    /// | 33 | `0x02 \|\| X` or `0x03 \|\| X`, decompressed |
    ///
    /// # Errors
    ///
    /// - `InvalidPublicKey`: unsupported length, wrong SEC1 tag, or the
    ///   coordinates are not on secp256k1
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut normalized = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];

        let sec1: &[u8] = match bytes.len() {
            RAW_PUBLIC_KEY_SIZE => {
                normalized[0] = UNCOMPRESSED_TAG;
                normalized[1..].copy_from_slice(bytes);
                &normalized
            },
            UNCOMPRESSED_PUBLIC_KEY_SIZE => {
                if bytes[0] != UNCOMPRESSED_TAG {
                    return Err(EciesError::InvalidPublicKey {
                        reason: format!("expected uncompressed tag 0x04, got {:#04x}", bytes[0]),
                    });
                }
                bytes
            },
            COMPRESSED_PUBLIC_KEY_SIZE => {
                if bytes[0] != 0x02 && bytes[0] != 0x03 {
                    return Err(EciesError::InvalidPublicKey {
                        reason: format!(
                            "expected compressed tag 0x02 or 0x03, got {:#04x}",
                            bytes[0]
                        ),
                    });
                }
                bytes
            },
            other => {
                return Err(EciesError::InvalidPublicKey {
                    reason: format!("unsupported length {other}, expected 33, 64 or 65 bytes"),
                });
            },
        };

        k256::PublicKey::from_sec1_bytes(sec1).map(Self).map_err(|_| {
            EciesError::InvalidPublicKey { reason: "point is not on secp256k1".to_string() }
        })
    }

    /// Parse a hex-encoded public key, with or without a `0x` prefix.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(strip_hex_prefix(encoded))?;
        Self::from_bytes(&bytes)
    }

    /// 65-byte uncompressed encoding `0x04 || X || Y`.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        let point = self.0.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// 64-byte raw encoding `X || Y`, as used by Ethereum tooling.
    pub fn to_raw(&self) -> [u8; RAW_PUBLIC_KEY_SIZE] {
        let uncompressed = self.to_uncompressed();
        let mut out = [0u8; RAW_PUBLIC_KEY_SIZE];
        out.copy_from_slice(&uncompressed[1..]);
        out
    }

    /// 33-byte compressed encoding.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        let point = self.0.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        out.copy_from_slice(point.as_bytes());
        out
    }

    pub(crate) fn as_inner(&self) -> &k256::PublicKey {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_uncompressed()))
    }
}

/// Trim whitespace and an optional `0x`/`0X` prefix from hex text.
pub fn strip_hex_prefix(encoded: &str) -> &str {
    let trimmed = encoded.trim();
    trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed)
}
