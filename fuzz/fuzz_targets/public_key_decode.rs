//! Fuzz target for public key decoding
//!
//! # Invariants
//!
//! - Never panics
//! - Any accepted key re-encodes to the same point in every form

#![no_main]

use libfuzzer_sys::fuzz_target;
use offchain_crypto::PublicKey;

fuzz_target!(|data: &[u8]| {
    if let Ok(key) = PublicKey::from_bytes(data) {
        assert_eq!(PublicKey::from_bytes(&key.to_uncompressed()), Ok(key));
        assert_eq!(PublicKey::from_bytes(&key.to_raw()), Ok(key));
        assert_eq!(PublicKey::from_bytes(&key.to_compressed()), Ok(key));
    }
});
