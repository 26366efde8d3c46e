//! AES-128-CTR encryption with HMAC-SHA256 authentication
//!
//! Encrypt-then-MAC over `iv || ciphertext`. The counter is the full
//! 128-bit IV incremented big-endian, matching Go's `cipher.NewCTR` and
//! Node's `aes-128-ctr`.

use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{
    error::{EciesError, Result},
    random::RandomSource,
};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// AES-CTR IV size in bytes
pub const IV_SIZE: usize = 16;

/// HMAC-SHA256 tag size in bytes
pub const MAC_SIZE: usize = 32;

/// AES-128 key size in bytes
pub const ENCRYPTION_KEY_SIZE: usize = 16;

/// HMAC-SHA256 key size in bytes
pub const MAC_KEY_SIZE: usize = 32;

/// Smallest authenticated message: IV and MAC around an empty ciphertext
pub const MIN_AUTHENTICATED_SIZE: usize = IV_SIZE + MAC_SIZE;

/// Encrypt with AES-128-CTR, returning `iv || ciphertext`.
///
/// Deterministic for a given IV. Each IV MUST be used once per key.
pub fn aes128_encrypt(
    key: &[u8; ENCRYPTION_KEY_SIZE],
    iv: &[u8; IV_SIZE],
    plaintext: &[u8],
) -> Vec<u8> {
    let mut output = Vec::with_capacity(IV_SIZE + plaintext.len());
    output.extend_from_slice(iv);
    output.extend_from_slice(plaintext);

    apply_keystream(key, iv, &mut output[IV_SIZE..]);
    output
}

/// Decrypt AES-128-CTR ciphertext (without IV prefix).
pub fn aes128_decrypt(
    key: &[u8; ENCRYPTION_KEY_SIZE],
    iv: &[u8; IV_SIZE],
    ciphertext: &[u8],
) -> Vec<u8> {
    let mut output = ciphertext.to_vec();
    apply_keystream(key, iv, &mut output);
    output
}

/// Encrypt with a fresh random IV and append an HMAC-SHA256 tag.
///
/// Returns `iv || ciphertext || mac`.
///
/// # Errors
///
/// - `Randomness`: the random source failed to produce an IV
pub fn aes128_encrypt_and_hmac(
    encryption_key: &[u8; ENCRYPTION_KEY_SIZE],
    mac_key: &[u8; MAC_KEY_SIZE],
    plaintext: &[u8],
    rng: &impl RandomSource,
) -> Result<Vec<u8>> {
    let mut iv = [0u8; IV_SIZE];
    rng.fill_bytes(&mut iv)?;

    Ok(aes128_encrypt_and_hmac_with_iv(encryption_key, mac_key, &iv, plaintext, &[]))
}

/// Encrypt under an explicit IV and append `HMAC-SHA256(mac_key, iv ||
/// ciphertext || s2)`.
///
/// Callers MUST NOT reuse an IV with the same encryption key.
pub fn aes128_encrypt_and_hmac_with_iv(
    encryption_key: &[u8; ENCRYPTION_KEY_SIZE],
    mac_key: &[u8; MAC_KEY_SIZE],
    iv: &[u8; IV_SIZE],
    plaintext: &[u8],
    s2: &[u8],
) -> Vec<u8> {
    let mut message = aes128_encrypt(encryption_key, iv, plaintext);
    message.reserve_exact(MAC_SIZE);

    let tag = keyed_mac(mac_key, &message, s2).finalize().into_bytes();
    message.extend_from_slice(&tag);
    message
}

/// Verify the HMAC of `iv || ciphertext || mac` and decrypt.
///
/// # Errors
///
/// - `MalformedEnvelope`: message shorter than IV plus MAC
/// - `MacMismatch`: the tag does not verify. No plaintext is returned.
pub fn aes128_decrypt_and_hmac(
    encryption_key: &[u8; ENCRYPTION_KEY_SIZE],
    mac_key: &[u8; MAC_KEY_SIZE],
    message: &[u8],
) -> Result<Vec<u8>> {
    aes128_decrypt_and_hmac_with_info(encryption_key, mac_key, message, &[])
}

/// [`aes128_decrypt_and_hmac`] with MAC shared info `s2`.
pub fn aes128_decrypt_and_hmac_with_info(
    encryption_key: &[u8; ENCRYPTION_KEY_SIZE],
    mac_key: &[u8; MAC_KEY_SIZE],
    message: &[u8],
    s2: &[u8],
) -> Result<Vec<u8>> {
    if message.len() < MIN_AUTHENTICATED_SIZE {
        return Err(EciesError::MalformedEnvelope {
            expected_at_least: MIN_AUTHENTICATED_SIZE,
            actual: message.len(),
        });
    }

    let (authenticated, tag) = message.split_at(message.len() - MAC_SIZE);

    // Constant-time comparison
    keyed_mac(mac_key, authenticated, s2)
        .verify_slice(tag)
        .map_err(|_| EciesError::MacMismatch)?;

    let (iv_bytes, ciphertext) = authenticated.split_at(IV_SIZE);
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(iv_bytes);

    Ok(aes128_decrypt(encryption_key, &iv, ciphertext))
}

fn keyed_mac(mac_key: &[u8; MAC_KEY_SIZE], authenticated: &[u8], s2: &[u8]) -> HmacSha256 {
    let Ok(mut mac) = HmacSha256::new_from_slice(mac_key) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac.update(authenticated);
    mac.update(s2);
    mac
}

fn apply_keystream(key: &[u8; ENCRYPTION_KEY_SIZE], iv: &[u8; IV_SIZE], data: &mut [u8]) {
    let mut cipher = Aes128Ctr::new(key.into(), iv.into());
    cipher.apply_keystream(data);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRandom(u8);

    impl RandomSource for FixedRandom {
        fn fill_bytes(&self, buffer: &mut [u8]) -> Result<()> {
            buffer.fill(self.0);
            Ok(())
        }
    }

    struct FailingRandom;

    impl RandomSource for FailingRandom {
        fn fill_bytes(&self, _buffer: &mut [u8]) -> Result<()> {
            Err(EciesError::Randomness { reason: "exhausted".to_string() })
        }
    }

    const ENC_KEY: [u8; ENCRYPTION_KEY_SIZE] = [0x01; ENCRYPTION_KEY_SIZE];
    const MAC_KEY: [u8; MAC_KEY_SIZE] = [0x02; MAC_KEY_SIZE];

    #[test]
    fn ctr_known_vector() {
        // AES-128(0^128) under the all-zero key
        let output = aes128_encrypt(&[0u8; 16], &[0u8; 16], &[0u8; 16]);
        assert_eq!(&output[..IV_SIZE], &[0u8; 16]);
        assert_eq!(hex::encode(&output[IV_SIZE..]), "66e94bd4ef8a2c3b884cfa59ca342b2e");
    }

    #[test]
    fn ctr_counter_wraps_full_128_bits() {
        // Second block uses counter 0 after 0xff..ff
        let output = aes128_encrypt(&[0u8; 16], &[0xFF; 16], &[0u8; 32]);
        assert_eq!(
            hex::encode(&output[IV_SIZE..]),
            "3f5b8cc9ea855a0afa7347d23e8d664e66e94bd4ef8a2c3b884cfa59ca342b2e"
        );
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let iv = [0x33; IV_SIZE];
        let plaintext = b"Hello, World!";

        let output = aes128_encrypt(&ENC_KEY, &iv, plaintext);
        assert_eq!(output.len(), IV_SIZE + plaintext.len());

        let decrypted = aes128_decrypt(&ENC_KEY, &iv, &output[IV_SIZE..]);
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn authenticated_roundtrip() {
        let plaintext = b"authenticated message";

        let message =
            aes128_encrypt_and_hmac(&ENC_KEY, &MAC_KEY, plaintext, &FixedRandom(0xAB)).unwrap();
        assert_eq!(message.len(), MIN_AUTHENTICATED_SIZE + plaintext.len());
        assert_eq!(&message[..IV_SIZE], &[0xAB; IV_SIZE]);

        let decrypted = aes128_decrypt_and_hmac(&ENC_KEY, &MAC_KEY, &message).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn authenticated_empty_plaintext() {
        let message = aes128_encrypt_and_hmac(&ENC_KEY, &MAC_KEY, b"", &FixedRandom(0)).unwrap();
        assert_eq!(message.len(), MIN_AUTHENTICATED_SIZE);

        let decrypted = aes128_decrypt_and_hmac(&ENC_KEY, &MAC_KEY, &message).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn random_source_failure_propagates() {
        let result = aes128_encrypt_and_hmac(&ENC_KEY, &MAC_KEY, b"data", &FailingRandom);
        assert!(matches!(result, Err(EciesError::Randomness { .. })));
    }

    #[test]
    fn mac_covers_iv_and_ciphertext() {
        let iv = [0x44; IV_SIZE];
        let message = aes128_encrypt_and_hmac_with_iv(&ENC_KEY, &MAC_KEY, &iv, b"covered", &[]);

        let mut expected = HmacSha256::new_from_slice(&MAC_KEY).unwrap();
        expected.update(&message[..message.len() - MAC_SIZE]);
        let expected = expected.finalize().into_bytes();

        assert_eq!(&message[message.len() - MAC_SIZE..], expected.as_slice());
    }

    #[test]
    fn every_flipped_byte_fails_verification() {
        let message =
            aes128_encrypt_and_hmac_with_iv(&ENC_KEY, &MAC_KEY, &[0x55; IV_SIZE], b"tamper", &[]);

        for index in 0..message.len() {
            let mut tampered = message.clone();
            tampered[index] ^= 0x01;

            let result = aes128_decrypt_and_hmac(&ENC_KEY, &MAC_KEY, &tampered);
            assert_eq!(result, Err(EciesError::MacMismatch), "byte {index} must be covered");
        }
    }

    #[test]
    fn wrong_mac_key_fails() {
        let message =
            aes128_encrypt_and_hmac_with_iv(&ENC_KEY, &MAC_KEY, &[0; IV_SIZE], b"secret", &[]);

        let result = aes128_decrypt_and_hmac(&ENC_KEY, &[0x03; MAC_KEY_SIZE], &message);
        assert_eq!(result, Err(EciesError::MacMismatch));
    }

    #[test]
    fn mac_shared_info_must_match() {
        let message =
            aes128_encrypt_and_hmac_with_iv(&ENC_KEY, &MAC_KEY, &[0; IV_SIZE], b"secret", b"s2");

        assert_eq!(
            aes128_decrypt_and_hmac(&ENC_KEY, &MAC_KEY, &message),
            Err(EciesError::MacMismatch)
        );
        assert_eq!(
            aes128_decrypt_and_hmac_with_info(&ENC_KEY, &MAC_KEY, &message, b"s2").unwrap(),
            b"secret"
        );
    }

    #[test]
    fn short_message_is_malformed() {
        let short = [0u8; MIN_AUTHENTICATED_SIZE - 1];
        let result = aes128_decrypt_and_hmac(&ENC_KEY, &MAC_KEY, &short);
        assert_eq!(
            result,
            Err(EciesError::MalformedEnvelope {
                expected_at_least: MIN_AUTHENTICATED_SIZE,
                actual: MIN_AUTHENTICATED_SIZE - 1,
            })
        );
    }
}
