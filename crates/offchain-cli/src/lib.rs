//! Command line front end for off-chain envelope encryption.
//!
//! Thin wrapper over [`offchain_crypto`]: parses keys and hex envelopes,
//! streams plaintext, and maps failures to exit codes. All cryptography lives
//! in the library crate.

pub mod commands;
pub mod config;
pub mod error;

pub use config::{KeyConfig, PRIVATE_KEY_ENV};
pub use error::CliError;
