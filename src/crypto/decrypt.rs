// src/crypto/decrypt.rs
use crate::aliases::PlainText;
use crate::cancel::CancelFlag;
use crate::config::CipherConfig;
use crate::consts::IV_LENGTH;
use crate::container::read_header;
use crate::crypto::{decrypt_stream, derive_key, ContainerStats, Salt};
use crate::error::Result;
use crate::lifecycle::{Direction, Operation, OperationState, Passphrase, SecretScope};
use std::io::{Read, Write};

/// KDF → IV from header → streamed body. The caller owns the secret scope.
pub(crate) fn decrypt_pipeline<R, W>(
    op: &mut Operation,
    mut source: R,
    destination: W,
    identity: Option<&str>,
    passphrase: &Passphrase,
    config: &CipherConfig,
    cancel: &CancelFlag,
) -> Result<ContainerStats>
where
    R: Read,
    W: Write,
{
    config.validate()?;
    cancel.check()?;

    let key = derive_key(passphrase, &Salt::from_identity(identity), config)?;
    op.enter(OperationState::KeyDerived);

    let iv = read_header(&mut source)?;
    op.enter(OperationState::IvRead);

    op.enter(OperationState::Streaming);
    let stats = decrypt_stream(source, destination, &key, &iv, config.chunk_size, cancel)?;

    Ok(ContainerStats {
        plaintext_bytes: stats.bytes_written,
        container_bytes: stats.bytes_read + IV_LENGTH as u64,
    })
}

/// Decrypt a complete container from `source` onto `destination`.
///
/// On error `destination` may already hold a prefix of the plaintext; use
/// [`crate::file_ops::decrypt_file`] when that must never be observable.
/// `passphrase` is wiped before this returns, whatever the outcome.
pub fn decrypt_container<R, W>(
    source: R,
    destination: W,
    identity: Option<&str>,
    passphrase: &mut Passphrase,
    config: &CipherConfig,
    cancel: &CancelFlag,
) -> Result<ContainerStats>
where
    R: Read,
    W: Write,
{
    let scope = SecretScope::acquire(passphrase)?;
    let mut op = Operation::new(Direction::Decrypt);
    let result = decrypt_pipeline(
        &mut op,
        source,
        destination,
        identity,
        scope.passphrase(),
        config,
        cancel,
    );
    op.finish(&result);
    result
}

/// Decrypt container bytes in memory → returns plaintext
pub fn decrypt_to_vec(
    container: &[u8],
    identity: Option<&str>,
    passphrase: &mut Passphrase,
    config: &CipherConfig,
) -> Result<PlainText> {
    let mut out = Vec::with_capacity(container.len());
    let result = decrypt_container(
        container,
        &mut out,
        identity,
        passphrase,
        config,
        &CancelFlag::new(),
    );
    let plaintext = PlainText::new(out);
    result?;
    Ok(plaintext)
}
