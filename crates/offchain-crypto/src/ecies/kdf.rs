//! Key derivation using the NIST SP 800-56C one-step `ConcatKDF` with SHA-256

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::symmetric::{ENCRYPTION_KEY_SIZE, MAC_KEY_SIZE};

/// Size of the big-endian KDF round counter
pub const COUNTER_SIZE: usize = 4;

/// SHA-256 output size
const HASH_SIZE: usize = 32;

/// Bytes of key material derived from an ECDH shared secret
pub const DERIVED_KEY_MATERIAL_SIZE: usize = 32;

/// Increment a big-endian unsigned integer by one.
///
/// The carry propagates from the last byte towards the first. Overflow of
/// the whole buffer wraps silently to zero. Returns the same buffer for
/// chaining.
pub fn increment_counter(counter: &mut [u8]) -> &mut [u8] {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
    counter
}

/// Derive `kd_len` bytes from a shared secret.
///
/// Equivalent to [`concat_kdf_with_info`] with empty shared info.
pub fn concat_kdf(px: &[u8], kd_len: usize) -> Vec<u8> {
    concat_kdf_with_info(px, &[], kd_len)
}

/// Derive `kd_len` bytes as `SHA-256(counter || px || s1)` over counters
/// `1, 2, ...`, truncated to `kd_len`.
///
/// The round count is `floor((kd_len + 7) / 32) + 1`, which over-derives by
/// one block for some lengths. Existing producers use the same bound, and
/// the output is a prefix of the hash chain regardless.
///
/// # Panics
///
/// If the derived buffer cannot be allocated.
pub fn concat_kdf_with_info(px: &[u8], s1: &[u8], kd_len: usize) -> Vec<u8> {
    let rounds = kdf_rounds(kd_len);
    let mut counter = [0u8; COUNTER_SIZE];
    counter[COUNTER_SIZE - 1] = 1;
    let mut derived = Vec::with_capacity(rounds.saturating_mul(HASH_SIZE));

    for _ in 0..rounds {
        let mut hasher = Sha256::new();
        hasher.update(counter);
        hasher.update(px);
        hasher.update(s1);
        derived.extend_from_slice(&hasher.finalize());
        increment_counter(&mut counter);
    }

    // Zeroize the discarded tail before shrinking
    if let Some(tail) = derived.get_mut(kd_len..) {
        tail.zeroize();
    }
    derived.truncate(kd_len);
    derived
}

fn kdf_rounds(kd_len: usize) -> usize {
    kd_len.saturating_add(7) / HASH_SIZE + 1
}

/// Encryption and MAC keys derived from one ECDH shared secret.
///
/// The encryption key is the first half of the KDF output. The MAC key is
/// `SHA-256` of the second half, so the two keys never share bytes.
pub struct DerivedKeys {
    encryption_key: [u8; ENCRYPTION_KEY_SIZE],
    mac_key: [u8; MAC_KEY_SIZE],
}

impl DerivedKeys {
    /// Derive the key pair from a shared secret and optional KDF shared info.
    pub fn derive(shared_secret: &[u8], s1: &[u8]) -> Self {
        let mut material = concat_kdf_with_info(shared_secret, s1, DERIVED_KEY_MATERIAL_SIZE);

        let mut encryption_key = [0u8; ENCRYPTION_KEY_SIZE];
        encryption_key.copy_from_slice(&material[..ENCRYPTION_KEY_SIZE]);

        let mut mac_key = [0u8; MAC_KEY_SIZE];
        mac_key.copy_from_slice(&Sha256::digest(&material[ENCRYPTION_KEY_SIZE..]));

        material.zeroize();

        Self { encryption_key, mac_key }
    }

    /// 16-byte AES-128 key.
    pub fn encryption_key(&self) -> &[u8; ENCRYPTION_KEY_SIZE] {
        &self.encryption_key
    }

    /// 32-byte HMAC-SHA256 key.
    pub fn mac_key(&self) -> &[u8; MAC_KEY_SIZE] {
        &self.mac_key
    }
}

impl Drop for DerivedKeys {
    fn drop(&mut self) {
        self.encryption_key.zeroize();
        self.mac_key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_without_carry() {
        let mut counter = [0u8, 0, 0, 1];
        increment_counter(&mut counter);
        assert_eq!(counter, [0, 0, 0, 2]);
    }

    #[test]
    fn increment_propagates_carry() {
        let mut counter = [0u8, 0, 0xFF, 0xFF];
        increment_counter(&mut counter);
        assert_eq!(counter, [0, 1, 0, 0]);
    }

    #[test]
    fn increment_wraps_on_overflow() {
        let mut counter = [0xFFu8; 4];
        increment_counter(&mut counter);
        assert_eq!(counter, [0, 0, 0, 0]);
    }

    #[test]
    fn increment_returns_same_buffer_for_chaining() {
        let mut counter = [0u8, 0, 0, 0];
        increment_counter(increment_counter(&mut counter));
        assert_eq!(counter, [0, 0, 0, 2]);
    }

    #[test]
    fn increment_empty_buffer_is_noop() {
        let mut counter: [u8; 0] = [];
        assert!(increment_counter(&mut counter).is_empty());
    }

    #[test]
    fn kdf_known_vector() {
        // SHA-256(00000001 || "abc")
        assert_eq!(
            hex::encode(concat_kdf(b"abc", 32)),
            "f9c4a2ab4de81ade0bbf55389f4a5002ad85ee56ce51f84f159a1e32a7292411"
        );
    }

    #[test]
    fn kdf_two_blocks_known_vector() {
        assert_eq!(
            hex::encode(concat_kdf(b"abc", 64)),
            "f9c4a2ab4de81ade0bbf55389f4a5002ad85ee56ce51f84f159a1e32a7292411\
             3dc693fb05f87048570cb494badaae90fe011e14b93ac478d40d02462b39b9b3"
        );
    }

    #[test]
    fn kdf_empty_secret_known_vector() {
        assert_eq!(hex::encode(concat_kdf(b"", 16)), "b40711a88c7039756fb8a73827eabe2c");
    }

    #[test]
    fn kdf_rounds_cover_requested_length() {
        assert_eq!(kdf_rounds(0), 1);
        assert_eq!(kdf_rounds(24), 1);
        assert_eq!(kdf_rounds(25), 2);
        assert_eq!(kdf_rounds(32), 2);
        assert_eq!(kdf_rounds(57), 3);
        for len in 0..=256 {
            assert!(kdf_rounds(len) * HASH_SIZE >= len, "length {len}");
        }
    }

    #[test]
    fn kdf_rounds_do_not_overflow() {
        assert_eq!(kdf_rounds(usize::MAX), usize::MAX / HASH_SIZE + 1);
        assert_eq!(kdf_rounds(usize::MAX - 7), usize::MAX / HASH_SIZE + 1);
    }

    #[test]
    fn kdf_produces_requested_length() {
        for len in [0, 1, 16, 24, 25, 31, 32, 33, 57, 64, 65, 100] {
            assert_eq!(concat_kdf(b"secret", len).len(), len, "length {len}");
        }
    }

    #[test]
    fn kdf_is_prefix_consistent() {
        let full = concat_kdf(b"shared secret", 96);
        for len in 0..=96 {
            assert_eq!(concat_kdf(b"shared secret", len), full[..len], "prefix of length {len}");
        }
    }

    #[test]
    fn kdf_is_deterministic() {
        assert_eq!(concat_kdf(b"px", 32), concat_kdf(b"px", 32));
    }

    #[test]
    fn kdf_shared_info_changes_output() {
        assert_ne!(concat_kdf_with_info(b"px", b"info", 32), concat_kdf(b"px", 32));
        assert_eq!(concat_kdf_with_info(b"px", b"", 32), concat_kdf(b"px", 32));
    }

    #[test]
    fn derived_keys_split_material() {
        let keys = DerivedKeys::derive(b"abc", b"");
        let material = concat_kdf(b"abc", DERIVED_KEY_MATERIAL_SIZE);

        assert_eq!(keys.encryption_key().as_slice(), &material[..16]);
        assert_eq!(keys.mac_key().as_slice(), Sha256::digest(&material[16..]).as_slice());
    }

    #[test]
    fn derived_keys_are_independent() {
        let keys = DerivedKeys::derive(&[0x42; 32], b"");
        assert_ne!(&keys.mac_key()[..16], keys.encryption_key().as_slice());
        assert_ne!(&keys.mac_key()[16..], keys.encryption_key().as_slice());
    }
}
