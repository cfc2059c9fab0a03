// src/file_ops.rs
//! File-level encryption/decryption operations
//!
//! These build on the streaming pipelines in [`crate::crypto`]. Output is
//! staged in a temporary file next to the destination and renamed into place
//! only after the stream has been finalized, so a failed or cancelled call
//! never leaves something at `output_path` that looks like a finished file.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;

use crate::cancel::CancelFlag;
use crate::config::CipherConfig;
use crate::crypto::{decrypt_pipeline, encrypt_pipeline, ContainerStats};
use crate::error::{CipherError, Result};
use crate::lifecycle::{Direction, Operation, Passphrase, SecretScope};

/// What a successful file operation reports back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationReport {
    pub elapsed: Duration,
    pub plaintext_bytes: u64,
    pub container_bytes: u64,
}

fn staging_file(output_path: &Path) -> Result<NamedTempFile> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(tempfile::Builder::new()
        .prefix(".passfile-")
        .suffix(".partial")
        .tempfile_in(dir)?)
}

fn run_file_op<F>(
    direction: Direction,
    input_path: &Path,
    output_path: &Path,
    passphrase: &mut Passphrase,
    pipeline: F,
) -> Result<OperationReport>
where
    F: FnOnce(&mut Operation, File, &mut dyn Write, &Passphrase) -> Result<ContainerStats>,
{
    let started = Instant::now();
    // Acquired first so that even an unopenable input wipes the passphrase.
    let scope = SecretScope::acquire(passphrase)?;
    let mut op = Operation::new(direction);

    let result: Result<ContainerStats> = (|| {
        let input = File::open(input_path)?;
        let mut staged = staging_file(output_path)?;

        // No BufReader/BufWriter: plaintext may only sit in buffers the codec zeroizes.
        let stats = pipeline(&mut op, input, staged.as_file_mut(), scope.passphrase())?;
        staged.as_file_mut().flush()?;

        staged.as_file().sync_all()?;
        staged
            .persist(output_path)
            .map_err(|e| CipherError::Io(e.error))?;
        Ok(stats)
    })();
    op.finish(&result);
    drop(scope);

    let stats = result?;
    let report = OperationReport {
        elapsed: started.elapsed(),
        plaintext_bytes: stats.plaintext_bytes,
        container_bytes: stats.container_bytes,
    };
    tracing::info!(
        direction = ?op.direction(),
        state = ?op.state(),
        input = %input_path.display(),
        output = %output_path.display(),
        plaintext_bytes = report.plaintext_bytes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "file operation complete"
    );
    Ok(report)
}

/// Encrypt a file on disk into an `IV || ciphertext` container.
///
/// `identity` is the salt source (UTF-8 bytes; 8 zero bytes when `None`).
/// `passphrase` is wiped on every exit path.
pub fn encrypt_file<P, Q>(
    input_path: P,
    output_path: Q,
    identity: Option<&str>,
    passphrase: &mut Passphrase,
    config: &CipherConfig,
    cancel: &CancelFlag,
) -> Result<OperationReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    run_file_op(
        Direction::Encrypt,
        input_path.as_ref(),
        output_path.as_ref(),
        passphrase,
        |op, input, output, secret| {
            encrypt_pipeline(op, input, output, identity, secret, config, cancel)
        },
    )
}

/// Decrypt a container file on disk.
///
/// Must be given the same identity, passphrase and config that produced the
/// file; nothing in the container records them. `passphrase` is wiped on
/// every exit path.
pub fn decrypt_file<P, Q>(
    input_path: P,
    output_path: Q,
    identity: Option<&str>,
    passphrase: &mut Passphrase,
    config: &CipherConfig,
    cancel: &CancelFlag,
) -> Result<OperationReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    run_file_op(
        Direction::Decrypt,
        input_path.as_ref(),
        output_path.as_ref(),
        passphrase,
        |op, input, output, secret| {
            decrypt_pipeline(op, input, output, identity, secret, config, cancel)
        },
    )
}

/// [`encrypt_file`] with the default parameters and no cancellation.
pub fn encrypt_file_default<P, Q>(
    input_path: P,
    output_path: Q,
    identity: Option<&str>,
    passphrase: &mut Passphrase,
) -> Result<OperationReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    encrypt_file(
        input_path,
        output_path,
        identity,
        passphrase,
        &CipherConfig::default(),
        &CancelFlag::new(),
    )
}

/// [`decrypt_file`] with the default parameters and no cancellation.
pub fn decrypt_file_default<P, Q>(
    input_path: P,
    output_path: Q,
    identity: Option<&str>,
    passphrase: &mut Passphrase,
) -> Result<OperationReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    decrypt_file(
        input_path,
        output_path,
        identity,
        passphrase,
        &CipherConfig::default(),
        &CancelFlag::new(),
    )
}
