// src/bin/passfile.rs
//! passfile — encrypt or decrypt a single file with a passphrase
//!
//! The identity (normally an email address) salts the key derivation. The
//! passphrase is always prompted for without echo, never taken from argv.
//!
//! Exit codes: 0 success, 2 bad arguments, 3 missing passphrase,
//! 4 operation failed.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use passfile_cipher::{
    config, decrypt_file, encrypt_file, CancelFlag, CipherConfig, OperationReport, Passphrase,
};
use regex::Regex;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const EXIT_BAD_ARGUMENTS: u8 = 2;
const EXIT_MISSING_PASSPHRASE: u8 = 3;
const EXIT_OPERATION_FAILED: u8 = 4;

const IDENTITY_PATTERN: &str = r"^[A-Za-z0-9+_.-]+@(.+)$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Operation {
    Encrypt,
    Decrypt,
}

#[derive(Debug, Parser)]
#[command(name = "passfile")]
#[command(version, about = "Passphrase-based AES-256 file encryption")]
#[command(after_help = "The passphrase is prompted interactively and never read from the command line.")]
struct Cli {
    /// Operation to perform
    #[arg(value_enum)]
    operation: Operation,

    /// Identity used as the key-derivation salt (an email address)
    identity: String,

    /// File to read
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// File to write
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// TOML file overriding the cipher parameters. Without it, PASSFILE_CONFIG
    /// or ./passfile.toml is used when present, else the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn identity_is_valid(identity: &str) -> bool {
    Regex::new(IDENTITY_PATTERN)
        .map(|re| re.is_match(identity))
        .unwrap_or(false)
}

fn load_config(path: Option<&PathBuf>) -> Result<CipherConfig> {
    match path {
        Some(path) => config::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(config::load().context("failed to load default config")?.clone()),
    }
}

fn accept_passphrase(typed: std::io::Result<String>) -> Option<Passphrase> {
    let typed = match typed {
        Ok(typed) => typed,
        Err(e) => {
            error!(error = %e, "could not read passphrase from the terminal");
            eprintln!("Could not read passphrase: {e}");
            return None;
        }
    };
    let passphrase = Passphrase::from(typed);
    if passphrase.is_empty() {
        return None;
    }
    Some(passphrase)
}

fn prompt_passphrase() -> Option<Passphrase> {
    accept_passphrase(rpassword::prompt_password("Enter your passphrase: "))
}

fn run(cli: &Cli, config: &CipherConfig, passphrase: &mut Passphrase) -> Result<OperationReport> {
    let cancel = CancelFlag::new();
    let identity = Some(cli.identity.as_str());
    match cli.operation {
        Operation::Encrypt => {
            encrypt_file(&cli.input, &cli.output, identity, passphrase, config, &cancel)
                .with_context(|| format!("encrypting {}", cli.input.display()))
        }
        Operation::Decrypt => {
            decrypt_file(&cli.input, &cli.output, identity, passphrase, config, &cancel)
                .with_context(|| format!("decrypting {}", cli.input.display()))
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_BAD_ARGUMENTS)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);
    debug!(operation = ?cli.operation, input = %cli.input.display(), "starting");

    if !identity_is_valid(&cli.identity) {
        eprintln!("Error: second argument must be a correctly formatted email address.");
        return ExitCode::from(EXIT_BAD_ARGUMENTS);
    }

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(EXIT_BAD_ARGUMENTS);
        }
    };

    let Some(mut passphrase) = prompt_passphrase() else {
        eprintln!("Passphrase is required.");
        return ExitCode::from(EXIT_MISSING_PASSPHRASE);
    };

    match run(&cli, &config, &mut passphrase) {
        Ok(report) => {
            let verb = match cli.operation {
                Operation::Encrypt => "encrypted",
                Operation::Decrypt => "decrypted",
            };
            info!(bytes = report.plaintext_bytes, "done");
            println!(
                "File {verb} successfully in {} ms.",
                report.elapsed.as_millis()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            eprintln!("Operation failed: {e:#}");
            ExitCode::from(EXIT_OPERATION_FAILED)
        }
    }
}
