//! Off-chain envelope tool.
//!
//! # Usage
//!
//! ```bash
//! # Create a key pair
//! offchain keygen
//!
//! # Encrypt a comment to a recipient's 64-byte public key
//! echo -n "dinner" | offchain encrypt --to 0x79be...10d4b8 > envelope.hex
//!
//! # Decrypt with the private key from the environment
//! OFFCHAIN_PRIVATE_KEY=0x... offchain decrypt --input envelope.hex
//! ```

use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use offchain_cli::{CliError, KeyConfig, commands};
use offchain_crypto::{OsRandom, PublicKey};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Encrypt and decrypt off-chain data envelopes
#[derive(Parser, Debug)]
#[command(name = "offchain")]
#[command(about = "Geth-compatible ECIES envelopes for off-chain data")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new private key and print it with its public key
    Keygen,

    /// Print the public key of the configured private key
    Pubkey {
        #[command(flatten)]
        key: KeyConfig,
    },

    /// Encrypt stdin (or a file) to a public key, printing a hex envelope
    Encrypt {
        /// Recipient public key (hex, 33/64/65 bytes)
        #[arg(short, long)]
        to: String,

        /// Read plaintext from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Decrypt a hex envelope from stdin (or a file) to stdout
    Decrypt {
        #[command(flatten)]
        key: KeyConfig,

        /// Read the envelope from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show envelope sections without decrypting
    Inspect {
        /// Read the envelope from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.exit_code())
        },
    }
}

fn run(command: Command) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Keygen => commands::keygen(&mut out, &OsRandom),
        Command::Pubkey { key } => commands::pubkey(&key.load()?, &mut out),
        Command::Encrypt { to, input } => {
            let recipient = PublicKey::from_hex(&to)?;
            let mut input = open_input(input.as_deref())?;
            commands::encrypt_stream(&recipient, &mut input, &mut out, &OsRandom)
        },
        Command::Decrypt { key, input } => {
            let key = key.load()?;
            commands::decrypt_stream(&key, &mut open_input(input.as_deref())?, &mut out)
        },
        Command::Inspect { input } => commands::inspect(&mut open_input(input.as_deref())?, &mut out),
    }
}

fn open_input(path: Option<&Path>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(path) => Ok(Box::new(File::open(path)?)),
        None => Ok(Box::new(io::stdin().lock())),
    }
}
