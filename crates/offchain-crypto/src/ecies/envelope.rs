//! ECIES envelope: ephemeral ECDH on secp256k1 wrapped around the symmetric
//! layer
//!
//! ```text
//! envelope := ephemeral_pubkey(65) || iv(16) || ciphertext(n) || mac(32)
//! ```

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{
    kdf::DerivedKeys,
    symmetric::{
        IV_SIZE, MAC_SIZE, aes128_decrypt_and_hmac_with_info, aes128_encrypt_and_hmac_with_iv,
    },
};
use crate::{
    error::{EciesError, Result},
    keys::{PrivateKey, PublicKey, UNCOMPRESSED_PUBLIC_KEY_SIZE, UNCOMPRESSED_TAG},
    random::RandomSource,
};

/// Size of the ephemeral public key at the start of every envelope
pub const EPHEMERAL_PUBLIC_KEY_SIZE: usize = UNCOMPRESSED_PUBLIC_KEY_SIZE;

/// Fixed bytes added to every plaintext (ephemeral key, IV and MAC)
pub const ENVELOPE_OVERHEAD: usize = EPHEMERAL_PUBLIC_KEY_SIZE + IV_SIZE + MAC_SIZE;

/// Size of the ECDH shared secret (X coordinate)
const SHARED_SECRET_SIZE: usize = 32;

/// Envelope length for a plaintext of `plaintext_len` bytes.
pub const fn envelope_len(plaintext_len: usize) -> usize {
    ENVELOPE_OVERHEAD + plaintext_len
}

/// Optional shared information bound into the envelope.
///
/// `kdf` (geth's `s1`) is appended to every KDF round input; `mac` (geth's
/// `s2`) is appended to the MAC input. Both default to empty, which yields
/// the plain envelope format. Both sides MUST use identical values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SharedInfo<'a> {
    /// Shared info mixed into key derivation
    pub kdf: &'a [u8],
    /// Shared info mixed into the MAC
    pub mac: &'a [u8],
}

impl SharedInfo<'static> {
    /// No shared info.
    pub const NONE: Self = SharedInfo { kdf: &[], mac: &[] };
}

/// A length-checked view over envelope bytes.
///
/// Parsing only validates the layout; the ephemeral key is decoded and the
/// MAC verified by [`decrypt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    bytes: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Validate the envelope layout.
    ///
    /// # Errors
    ///
    /// - `MalformedEnvelope`: fewer than [`ENVELOPE_OVERHEAD`] bytes
    /// - `InvalidPublicKey`: the ephemeral key does not carry the
    ///   uncompressed `0x04` tag
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < ENVELOPE_OVERHEAD {
            return Err(EciesError::MalformedEnvelope {
                expected_at_least: ENVELOPE_OVERHEAD,
                actual: bytes.len(),
            });
        }

        if bytes[0] != UNCOMPRESSED_TAG {
            return Err(EciesError::InvalidPublicKey {
                reason: format!(
                    "ephemeral key must be uncompressed (0x04), got tag {:#04x}",
                    bytes[0]
                ),
            });
        }

        Ok(Self { bytes })
    }

    /// The complete envelope.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// 65-byte uncompressed ephemeral public key.
    pub fn ephemeral_public_key_bytes(&self) -> &'a [u8] {
        &self.bytes[..EPHEMERAL_PUBLIC_KEY_SIZE]
    }

    /// Decode the ephemeral public key, checking it lies on the curve.
    pub fn ephemeral_public_key(&self) -> Result<PublicKey> {
        PublicKey::from_bytes(self.ephemeral_public_key_bytes())
    }

    /// `iv || ciphertext || mac`, the input to the symmetric layer.
    pub fn symmetric_message(&self) -> &'a [u8] {
        &self.bytes[EPHEMERAL_PUBLIC_KEY_SIZE..]
    }

    /// 16-byte AES-CTR IV.
    pub fn iv(&self) -> &'a [u8] {
        &self.bytes[EPHEMERAL_PUBLIC_KEY_SIZE..EPHEMERAL_PUBLIC_KEY_SIZE + IV_SIZE]
    }

    /// AES-CTR ciphertext, same length as the plaintext.
    pub fn ciphertext(&self) -> &'a [u8] {
        &self.bytes[EPHEMERAL_PUBLIC_KEY_SIZE + IV_SIZE..self.bytes.len() - MAC_SIZE]
    }

    /// 32-byte HMAC-SHA256 tag.
    pub fn mac(&self) -> &'a [u8] {
        &self.bytes[self.bytes.len() - MAC_SIZE..]
    }

    /// Length of the plaintext this envelope decrypts to.
    pub fn plaintext_len(&self) -> usize {
        self.bytes.len() - ENVELOPE_OVERHEAD
    }
}

/// Encrypt `plaintext` to `recipient`.
///
/// A fresh ephemeral key and IV are drawn from `rng` on every call.
///
/// # Errors
///
/// - `Randomness`, `KeyGeneration`: the random source failed
pub fn encrypt(
    recipient: &PublicKey,
    plaintext: &[u8],
    rng: &impl RandomSource,
) -> Result<Vec<u8>> {
    encrypt_with_shared_info(recipient, plaintext, SharedInfo::NONE, rng)
}

/// [`encrypt`] with explicit shared info.
pub fn encrypt_with_shared_info(
    recipient: &PublicKey,
    plaintext: &[u8],
    info: SharedInfo<'_>,
    rng: &impl RandomSource,
) -> Result<Vec<u8>> {
    let ephemeral = PrivateKey::generate(rng)?;

    let mut iv = [0u8; IV_SIZE];
    rng.fill_bytes(&mut iv)?;

    Ok(encrypt_with_ephemeral(recipient, plaintext, &ephemeral, &iv, info))
}

/// Deterministic encryption with a caller-chosen ephemeral key and IV.
///
/// # Security
///
/// The ephemeral key and IV MUST be fresh for every envelope. Reusing an
/// ephemeral key for the same recipient reuses the symmetric keys. Meant for
/// known-answer tests and callers that manage their own entropy.
pub fn encrypt_with_ephemeral(
    recipient: &PublicKey,
    plaintext: &[u8],
    ephemeral: &PrivateKey,
    iv: &[u8; IV_SIZE],
    info: SharedInfo<'_>,
) -> Vec<u8> {
    let shared = shared_secret(ephemeral, recipient);
    let keys = DerivedKeys::derive(shared.as_slice(), info.kdf);

    let message = aes128_encrypt_and_hmac_with_iv(
        keys.encryption_key(),
        keys.mac_key(),
        iv,
        plaintext,
        info.mac,
    );

    let mut envelope = Vec::with_capacity(EPHEMERAL_PUBLIC_KEY_SIZE + message.len());
    envelope.extend_from_slice(&ephemeral.public_key().to_uncompressed());
    envelope.extend_from_slice(&message);

    trace!(plaintext_len = plaintext.len(), envelope_len = envelope.len(), "encrypted envelope");
    envelope
}

/// Decrypt an envelope with the recipient's private key.
///
/// # Errors
///
/// - `MalformedEnvelope`: shorter than [`ENVELOPE_OVERHEAD`]
/// - `InvalidPublicKey`: the ephemeral key is not an uncompressed curve
///   point
/// - `MacMismatch`: tampered envelope or wrong private key. No plaintext is
///   returned.
pub fn decrypt(private_key: &PrivateKey, envelope: &[u8]) -> Result<Vec<u8>> {
    decrypt_with_shared_info(private_key, envelope, SharedInfo::NONE)
}

/// [`decrypt`] with explicit shared info.
pub fn decrypt_with_shared_info(
    private_key: &PrivateKey,
    envelope: &[u8],
    info: SharedInfo<'_>,
) -> Result<Vec<u8>> {
    let envelope = Envelope::parse(envelope)?;
    let ephemeral = envelope.ephemeral_public_key()?;

    let shared = shared_secret(private_key, &ephemeral);
    let keys = DerivedKeys::derive(shared.as_slice(), info.kdf);

    let plaintext = aes128_decrypt_and_hmac_with_info(
        keys.encryption_key(),
        keys.mac_key(),
        envelope.symmetric_message(),
        info.mac,
    )
    .inspect_err(|err| {
        if err.is_authentication_failure() {
            debug!(envelope_len = envelope.as_bytes().len(), "envelope MAC mismatch");
        }
    })?;

    trace!(plaintext_len = plaintext.len(), "decrypted envelope");
    Ok(plaintext)
}

/// ECDH X coordinate, left-padded to 32 bytes.
fn shared_secret(
    private_key: &PrivateKey,
    public_key: &PublicKey,
) -> Zeroizing<[u8; SHARED_SECRET_SIZE]> {
    let shared = k256::ecdh::diffie_hellman(
        private_key.as_inner().to_nonzero_scalar(),
        public_key.as_inner().as_affine(),
    );

    let mut out = Zeroizing::new([0u8; SHARED_SECRET_SIZE]);
    out.copy_from_slice(shared.raw_secret_bytes().as_slice());
    out
}
