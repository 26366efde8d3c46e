//! ECIES: Elliptic Curve Integrated Encryption Scheme over secp256k1
//!
//! Wire compatible with geth's `crypto/ecies` using the
//! `ECIES_AES128_SHA256` parameters.
//!
//! # Architecture
//!
//! ```text
//! Ephemeral Key × Recipient Public Key
//!        │
//!        ▼ ECDH (X coordinate)
//! Shared Secret (32 bytes)
//!        │
//!        ▼ ConcatKDF (SHA-256)
//! Key Material (32 bytes)
//!        │
//!        ├──▶ bytes 0..16            → AES-128 key
//!        └──▶ SHA-256(bytes 16..32)  → HMAC key
//!        │
//!        ▼ AES-128-CTR, then HMAC-SHA256(iv || ciphertext)
//! ephemeral_pubkey || iv || ciphertext || mac
//! ```
//!
//! # Security Properties
//!
//! - Fresh ephemeral key and IV per envelope
//! - Encrypt-then-MAC: the MAC is verified before any decryption happens
//! - Encryption and MAC keys never share derived bytes

pub mod envelope;
pub mod kdf;
pub mod symmetric;

pub use envelope::{
    ENVELOPE_OVERHEAD, EPHEMERAL_PUBLIC_KEY_SIZE, Envelope, SharedInfo, decrypt,
    decrypt_with_shared_info, encrypt, encrypt_with_ephemeral, encrypt_with_shared_info,
    envelope_len,
};
pub use kdf::{DerivedKeys, concat_kdf, concat_kdf_with_info, increment_counter};
pub use symmetric::{
    IV_SIZE, MAC_SIZE, aes128_decrypt, aes128_decrypt_and_hmac, aes128_decrypt_and_hmac_with_info,
    aes128_encrypt, aes128_encrypt_and_hmac, aes128_encrypt_and_hmac_with_iv,
};
