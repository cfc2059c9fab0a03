// src/crypto/encrypt.rs
use crate::aliases::PlainText;
use crate::cancel::CancelFlag;
use crate::config::CipherConfig;
use crate::consts::IV_LENGTH;
use crate::container::write_header;
use crate::crypto::{derive_key, encrypt_stream, generate_iv, ContainerStats, Salt};
use crate::error::Result;
use crate::lifecycle::{Direction, Operation, OperationState, Passphrase, SecretScope};
use std::io::{Read, Write};

/// KDF → fresh IV → header → streamed body. The caller owns the secret scope.
pub(crate) fn encrypt_pipeline<R, W>(
    op: &mut Operation,
    source: R,
    mut destination: W,
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

    let iv = generate_iv()?;
    op.enter(OperationState::IvGenerated);

    write_header(&mut destination, &iv)?;
    op.enter(OperationState::Streaming);

    let stats = encrypt_stream(
        source,
        &mut destination,
        &key,
        &iv,
        config.chunk_size,
        cancel,
    )?;

    Ok(ContainerStats {
        plaintext_bytes: stats.bytes_read,
        container_bytes: stats.bytes_written + IV_LENGTH as u64,
    })
}

/// Encrypt `source` into a complete container on `destination`.
///
/// `passphrase` is wiped before this returns, whatever the outcome.
pub fn encrypt_container<R, W>(
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
    let mut op = Operation::new(Direction::Encrypt);
    let result = encrypt_pipeline(
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

/// Encrypt plaintext in memory → returns the container bytes
pub fn encrypt_to_vec(
    plaintext: &PlainText,
    identity: Option<&str>,
    passphrase: &mut Passphrase,
    config: &CipherConfig,
) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(plaintext.expose_secret().len() + 2 * IV_LENGTH);
    encrypt_container(
        plaintext.expose_secret().as_slice(),
        &mut out,
        identity,
        passphrase,
        config,
        &CancelFlag::new(),
    )?;
    Ok(out)
}
