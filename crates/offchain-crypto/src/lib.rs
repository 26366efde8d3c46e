//! Off-chain Data Cryptographic Primitives
//!
//! Authenticated ECIES over secp256k1 for encrypting user comments and
//! metadata before they are uploaded to off-chain storage. Envelopes are
//! byte-compatible with geth's `crypto/ecies` package, so data written by
//! existing producers decrypts here and vice versa.
//!
//! All operations are stateless. Randomness is drawn from a caller-provided
//! [`RandomSource`] so tests can be deterministic without global state.
//!
//! # Envelope Format
//!
//! ```text
//! ┌──────────────────────┬──────────┬─────────────────┬───────────┐
//! │ ephemeral pubkey (65)│ iv (16)  │ ciphertext (n)  │ mac (32)  │
//! │ 0x04 || X || Y       │ AES-CTR  │ len(plaintext)  │ HMAC-256  │
//! └──────────────────────┴──────────┴─────────────────┴───────────┘
//! ```
//!
//! An empty plaintext produces a 113-byte envelope.
//!
//! # Usage
//!
//! ```
//! use offchain_crypto::{OsRandom, PrivateKey, decrypt, encrypt};
//!
//! let recipient = PrivateKey::generate(&OsRandom).unwrap();
//! let envelope = encrypt(&recipient.public_key(), b"hello", &OsRandom).unwrap();
//!
//! assert_eq!(envelope.len(), 118);
//! assert_eq!(decrypt(&recipient, &envelope).unwrap(), b"hello");
//! ```
//!
//! # Security
//!
//! Authenticity:
//! - HMAC-SHA256 over `iv || ciphertext`, verified in constant time
//! - MAC failure -> [`EciesError::MacMismatch`], no plaintext returned
//!
//! Key Hygiene:
//! - Ephemeral keys are generated per call and dropped after ECDH
//! - Shared secrets and derived keys are zeroized on drop
//! - Key `Debug` output never includes secret scalars

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ecies;
pub mod error;
pub mod keys;
pub mod random;

pub use ecies::{
    DerivedKeys, ENVELOPE_OVERHEAD, Envelope, SharedInfo, concat_kdf, decrypt,
    decrypt_with_shared_info, encrypt, encrypt_with_ephemeral, encrypt_with_shared_info,
    envelope_len, increment_counter,
};
pub use error::{EciesError, Result};
pub use keys::{PrivateKey, PublicKey};
pub use random::{OsRandom, RandomSource};
