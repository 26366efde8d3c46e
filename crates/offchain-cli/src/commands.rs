//! Command implementations.
//!
//! Each command reads from and writes to caller-provided streams so it can be
//! driven by tests without touching stdin/stdout.

use std::io::{Read, Write};

use offchain_crypto::{
    Envelope, PrivateKey, PublicKey, RandomSource, decrypt, encrypt, keys::strip_hex_prefix,
};
use tracing::info;

use crate::error::CliError;

/// Generate a key pair and print both halves as hex.
pub fn keygen(out: &mut impl Write, rng: &impl RandomSource) -> Result<(), CliError> {
    let key = PrivateKey::generate(rng)?;

    writeln!(out, "private_key: 0x{}", key.to_hex().as_str())?;
    writeln!(out, "public_key: 0x{}", hex::encode(key.public_key().to_raw()))?;

    info!("generated key pair");
    Ok(())
}

/// Print the 64-byte raw public key for `key`.
pub fn pubkey(key: &PrivateKey, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "0x{}", hex::encode(key.public_key().to_raw()))?;
    Ok(())
}

/// Encrypt all of `input` to `recipient` and print the envelope as hex.
pub fn encrypt_stream(
    recipient: &PublicKey,
    input: &mut impl Read,
    out: &mut impl Write,
    rng: &impl RandomSource,
) -> Result<(), CliError> {
    let mut plaintext = Vec::new();
    input.read_to_end(&mut plaintext)?;

    let envelope = encrypt(recipient, &plaintext, rng)?;
    writeln!(out, "0x{}", hex::encode(&envelope))?;

    info!(plaintext_len = plaintext.len(), envelope_len = envelope.len(), "encrypted input");
    Ok(())
}

/// Decrypt a hex envelope from `input` and write the raw plaintext.
pub fn decrypt_stream(
    key: &PrivateKey,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let envelope = read_hex(input)?;

    let plaintext = decrypt(key, &envelope)?;
    out.write_all(&plaintext)?;
    out.flush()?;

    info!(plaintext_len = plaintext.len(), "decrypted envelope");
    Ok(())
}

/// Print the section layout of a hex envelope without decrypting it.
pub fn inspect(input: &mut impl Read, out: &mut impl Write) -> Result<(), CliError> {
    let bytes = read_hex(input)?;
    let envelope = Envelope::parse(&bytes)?;
    let ephemeral = envelope.ephemeral_public_key()?;

    writeln!(out, "envelope_len: {}", envelope.as_bytes().len())?;
    writeln!(out, "ephemeral_public_key: 0x{ephemeral}")?;
    writeln!(out, "iv: 0x{}", hex::encode(envelope.iv()))?;
    writeln!(out, "ciphertext_len: {}", envelope.ciphertext().len())?;
    writeln!(out, "mac: 0x{}", hex::encode(envelope.mac()))?;
    Ok(())
}

fn read_hex(input: &mut impl Read) -> Result<Vec<u8>, CliError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    Ok(hex::decode(strip_hex_prefix(&text))?)
}
