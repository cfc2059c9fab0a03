// src/container.rs
//! On-disk container layout
//!
//! ```text
//! offset 0..16   : IV, raw bytes
//! offset 16..EOF : AES-256-CBC body, PKCS#7 padded, positive multiple of 16
//! ```
//!
//! No magic, version, length field or authentication tag. The KDF
//! parameters are not recorded either.

use crate::aliases::Iv16;
use crate::consts::{BLOCK_SIZE, IV_LENGTH};
use crate::error::{CipherError, Result};
use std::io::{self, Read, Write};

/// Write the IV header. The ciphertext body follows directly.
pub fn write_header<W: Write>(writer: &mut W, iv: &Iv16) -> Result<()> {
    writer.write_all(iv.expose_secret()).map_err(CipherError::Io)
}

/// Read the 16-byte IV header, leaving `reader` positioned at the body.
///
/// # Errors
/// [`CipherError::Format`] if the input ends before 16 bytes.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Iv16> {
    let mut iv = Iv16::new([0u8; IV_LENGTH]);
    match reader.read_exact(iv.expose_secret_mut()) {
        Ok(()) => Ok(iv),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(CipherError::Format(format!(
            "container is shorter than the {IV_LENGTH}-byte IV header"
        ))),
        Err(e) => Err(CipherError::Io(e)),
    }
}

/// Split an in-memory container into its IV and ciphertext body.
pub fn split(container: &[u8]) -> Result<(Iv16, &[u8])> {
    let mut reader = container;
    let iv = read_header(&mut reader)?;
    Ok((iv, reader))
}

/// Ciphertext body length for `plaintext_len` bytes of input.
pub const fn body_len(plaintext_len: u64) -> u64 {
    let block = BLOCK_SIZE as u64;
    block * (plaintext_len / block) + block
}

/// Total container length (IV + body) for `plaintext_len` bytes of input.
pub const fn container_len(plaintext_len: u64) -> u64 {
    body_len(plaintext_len) + IV_LENGTH as u64
}
