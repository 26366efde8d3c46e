//! Fuzz target for envelope round-trips under adversarial keys and messages
//!
//! # Strategy
//!
//! - Arbitrary recipient and ephemeral scalars (most are valid)
//! - Arbitrary IVs and plaintexts, including empty
//! - Optional shared info on either side
//! - Single-bit corruption at an arbitrary position
//!
//! # Invariants
//!
//! - Encrypt/decrypt roundtrip succeeds
//! - Envelope length is plaintext length plus the fixed overhead
//! - Corrupting any byte after the ephemeral key fails with `MacMismatch`
//! - Mismatched shared info fails with `MacMismatch`

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use offchain_crypto::{
    EciesError, PrivateKey, SharedInfo, decrypt, decrypt_with_shared_info,
    ecies::EPHEMERAL_PUBLIC_KEY_SIZE, encrypt_with_ephemeral, envelope_len,
};

#[derive(Debug, Clone, Arbitrary)]
struct RoundtripScenario {
    recipient: [u8; 32],
    ephemeral: [u8; 32],
    iv: [u8; 16],
    plaintext: Vec<u8>,
    kdf_info: Vec<u8>,
    mac_info: Vec<u8>,
    corrupt_at: u16,
    corrupt_bit: u8,
}

fuzz_target!(|scenario: RoundtripScenario| {
    let (Ok(recipient), Ok(ephemeral)) =
        (PrivateKey::from_bytes(&scenario.recipient), PrivateKey::from_bytes(&scenario.ephemeral))
    else {
        return;
    };

    let info = SharedInfo { kdf: &scenario.kdf_info, mac: &scenario.mac_info };
    let envelope = encrypt_with_ephemeral(
        &recipient.public_key(),
        &scenario.plaintext,
        &ephemeral,
        &scenario.iv,
        info,
    );

    // INVARIANT 1: Length is exact
    assert_eq!(envelope.len(), envelope_len(scenario.plaintext.len()));

    // INVARIANT 2: Roundtrip succeeds
    let decrypted = decrypt_with_shared_info(&recipient, &envelope, info);
    assert_eq!(decrypted.as_deref(), Ok(scenario.plaintext.as_slice()));

    // INVARIANT 3: Corruption is detected
    let authenticated_len = envelope.len() - EPHEMERAL_PUBLIC_KEY_SIZE;
    let index = EPHEMERAL_PUBLIC_KEY_SIZE + usize::from(scenario.corrupt_at) % authenticated_len;
    let mut corrupted = envelope.clone();
    corrupted[index] ^= 1 << (scenario.corrupt_bit % 8);
    assert_eq!(decrypt_with_shared_info(&recipient, &corrupted, info), Err(EciesError::MacMismatch));

    // INVARIANT 4: Shared info is bound
    if !scenario.kdf_info.is_empty() || !scenario.mac_info.is_empty() {
        assert_eq!(decrypt(&recipient, &envelope), Err(EciesError::MacMismatch));
    }
});
