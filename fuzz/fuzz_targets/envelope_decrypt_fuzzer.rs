//! Fuzz target for envelope parsing and decryption
//!
//! Feeds arbitrary bytes to `decrypt` under a fixed private key.
//!
//! # Invariants
//!
//! - Never panics on any input
//! - Inputs shorter than the envelope overhead are always `MalformedEnvelope`
//! - Arbitrary bytes never authenticate (a success would mean a MAC forgery)

#![no_main]

use libfuzzer_sys::fuzz_target;
use offchain_crypto::{ENVELOPE_OVERHEAD, EciesError, Envelope, PrivateKey, decrypt};

fuzz_target!(|data: &[u8]| {
    let mut scalar = [0u8; 32];
    scalar[31] = 1;
    let Ok(key) = PrivateKey::from_bytes(&scalar) else {
        return;
    };

    // INVARIANT 1: Parsing never panics and agrees with the length bound
    match Envelope::parse(data) {
        Ok(envelope) => {
            assert!(data.len() >= ENVELOPE_OVERHEAD);
            assert_eq!(envelope.plaintext_len(), data.len() - ENVELOPE_OVERHEAD);
            assert_eq!(envelope.ciphertext().len(), envelope.plaintext_len());
        },
        Err(EciesError::MalformedEnvelope { actual, .. }) => {
            assert_eq!(actual, data.len());
            assert!(data.len() < ENVELOPE_OVERHEAD);
        },
        Err(_) => {},
    }

    // INVARIANT 2: Random input is rejected
    assert!(decrypt(&key, data).is_err(), "arbitrary bytes must not authenticate");
});
