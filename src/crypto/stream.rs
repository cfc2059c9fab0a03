//! src/crypto/stream.rs
//! AES-256-CBC streaming codec with PKCS#7 padding
//!
//! Both directions keep only the chaining block and at most one partial block
//! between calls, so memory use is bounded by the chunk size regardless of
//! the stream length.

use crate::aliases::{Aes256Key32, Block16, Iv16};
use crate::cancel::CancelFlag;
use crate::consts::BLOCK_SIZE;
use crate::error::{CipherError, Result};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block as AesBlock};
use std::io::{self, Read, Write};
use zeroize::Zeroizing;

/// Byte counts of one streaming pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub bytes_read: u64,
    pub bytes_written: u64,
}

#[inline(always)]
fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8]) {
    for ((out, a), b) in output.iter_mut().zip(block_a).zip(block_b).take(BLOCK_SIZE) {
        *out = a ^ b;
    }
}

#[inline]
fn encrypt_block(
    cipher: &Aes256Enc,
    chain: &mut [u8; BLOCK_SIZE],
    plaintext: &[u8],
    out: &mut Vec<u8>,
) {
    let mut block = AesBlock::default();
    xor_blocks(plaintext, &chain[..], block.as_mut_slice());
    cipher.encrypt_block(&mut block);
    chain.copy_from_slice(&block);
    out.extend_from_slice(&block);
}

#[inline]
fn decrypt_block(cipher: &Aes256Dec, chain: &mut [u8; BLOCK_SIZE], ciphertext: &[u8]) -> Block16 {
    let mut block = AesBlock::clone_from_slice(ciphertext);
    cipher.decrypt_block(&mut block);
    let mut plaintext = Block16::new([0u8; BLOCK_SIZE]);
    xor_blocks(&block, &chain[..], plaintext.expose_secret_mut());
    chain.copy_from_slice(ciphertext);
    plaintext
}

/// Number of payload bytes in a decrypted final block.
///
/// Every padding byte is inspected regardless of where a mismatch occurs.
pub fn strip_padding(block: &[u8; BLOCK_SIZE]) -> Result<usize> {
    let pad = block[BLOCK_SIZE - 1];
    let pad_len = pad as usize;
    let mut bad = u8::from(pad == 0) | u8::from(pad_len > BLOCK_SIZE);
    let pad_start = BLOCK_SIZE.saturating_sub(pad_len);
    for (i, &byte) in block.iter().enumerate() {
        bad |= u8::from(i >= pad_start) & u8::from(byte != pad);
    }
    if bad != 0 {
        return Err(CipherError::Padding);
    }
    Ok(BLOCK_SIZE - pad_len)
}

/// Incremental CBC encryptor. Feed any number of `update` calls, then `finalize`.
pub struct CbcEncryptor {
    cipher: Aes256Enc,
    chain: [u8; BLOCK_SIZE],
    partial: Block16,
    partial_len: usize,
}

impl CbcEncryptor {
    pub fn new(key: &Aes256Key32, iv: &Iv16) -> Self {
        Self {
            cipher: Aes256Enc::new(key.expose_secret().into()),
            chain: *iv.expose_secret(),
            partial: Block16::new([0u8; BLOCK_SIZE]),
            partial_len: 0,
        }
    }

    /// Encrypt every complete block available, carrying the remainder.
    pub fn update(&mut self, mut input: &[u8], out: &mut Vec<u8>) {
        if self.partial_len > 0 {
            let take = (BLOCK_SIZE - self.partial_len).min(input.len());
            self.partial.expose_secret_mut()[self.partial_len..self.partial_len + take]
                .copy_from_slice(&input[..take]);
            self.partial_len += take;
            input = &input[take..];
            if self.partial_len < BLOCK_SIZE {
                return;
            }
            encrypt_block(&self.cipher, &mut self.chain, self.partial.expose_secret(), out);
            self.partial_len = 0;
        }

        let mut blocks = input.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            encrypt_block(&self.cipher, &mut self.chain, block, out);
        }
        let rest = blocks.remainder();
        self.partial.expose_secret_mut()[..rest.len()].copy_from_slice(rest);
        self.partial_len = rest.len();
    }

    /// Pad the carried bytes and emit the final block. Block-aligned input
    /// (including empty input) gets a full block of padding.
    pub fn finalize(mut self, out: &mut Vec<u8>) {
        let pad = (BLOCK_SIZE - self.partial_len) as u8;
        self.partial.expose_secret_mut()[self.partial_len..].fill(pad);
        encrypt_block(&self.cipher, &mut self.chain, self.partial.expose_secret(), out);
    }
}

/// Incremental CBC decryptor. The most recent plaintext block is held back
/// until `finalize`, which strips its padding.
pub struct CbcDecryptor {
    cipher: Aes256Dec,
    chain: [u8; BLOCK_SIZE],
    partial: [u8; BLOCK_SIZE],
    partial_len: usize,
    held: Option<Block16>,
}

impl CbcDecryptor {
    pub fn new(key: &Aes256Key32, iv: &Iv16) -> Self {
        Self {
            cipher: Aes256Dec::new(key.expose_secret().into()),
            chain: *iv.expose_secret(),
            partial: [0u8; BLOCK_SIZE],
            partial_len: 0,
            held: None,
        }
    }

    fn push_block(&mut self, ciphertext: &[u8], out: &mut Vec<u8>) {
        let plaintext = decrypt_block(&self.cipher, &mut self.chain, ciphertext);
        if let Some(previous) = self.held.replace(plaintext) {
            out.extend_from_slice(previous.expose_secret());
        }
    }

    pub fn update(&mut self, mut input: &[u8], out: &mut Vec<u8>) {
        if self.partial_len > 0 {
            let take = (BLOCK_SIZE - self.partial_len).min(input.len());
            self.partial[self.partial_len..self.partial_len + take].copy_from_slice(&input[..take]);
            self.partial_len += take;
            input = &input[take..];
            if self.partial_len < BLOCK_SIZE {
                return;
            }
            let block = self.partial;
            self.push_block(&block, out);
            self.partial_len = 0;
        }

        let mut blocks = input.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            self.push_block(block, out);
        }
        let rest = blocks.remainder();
        self.partial[..rest.len()].copy_from_slice(rest);
        self.partial_len = rest.len();
    }

    /// # Errors
    /// - [`CipherError::Format`] if the body was empty or not block-aligned
    /// - [`CipherError::Padding`] if the final block's padding is invalid
    pub fn finalize(self, out: &mut Vec<u8>) -> Result<()> {
        if self.partial_len != 0 {
            return Err(CipherError::Format(format!(
                "ciphertext body is not a multiple of {BLOCK_SIZE} bytes"
            )));
        }
        let last = self
            .held
            .ok_or_else(|| CipherError::Format("ciphertext body is empty".into()))?;
        let len = strip_padding(last.expose_secret())?;
        out.extend_from_slice(&last.expose_secret()[..len]);
        Ok(())
    }
}

fn read_some<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match source.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Encrypt `source` into `destination` in `chunk_size` reads.
///
/// `cancel` is checked before every chunk; a cancelled pass returns
/// [`CipherError::Cancelled`] and leaves `destination` holding an unpadded,
/// unusable prefix.
pub fn encrypt_stream<R, W>(
    mut source: R,
    mut destination: W,
    key: &Aes256Key32,
    iv: &Iv16,
    chunk_size: usize,
    cancel: &CancelFlag,
) -> Result<StreamStats>
where
    R: Read,
    W: Write,
{
    let mut encryptor = CbcEncryptor::new(key, iv);
    let mut chunk = Zeroizing::new(vec![0u8; chunk_size.max(1)]);
    let mut ciphertext = Vec::with_capacity(chunk.len() + BLOCK_SIZE);
    let mut stats = StreamStats::default();
    let mut chunks = 0u64;

    loop {
        cancel.check()?;
        let n = read_some(&mut source, &mut chunk)?;
        if n == 0 {
            break;
        }
        encryptor.update(&chunk[..n], &mut ciphertext);
        destination.write_all(&ciphertext)?;
        stats.bytes_read += n as u64;
        stats.bytes_written += ciphertext.len() as u64;
        ciphertext.clear();
        chunks += 1;
    }

    encryptor.finalize(&mut ciphertext);
    destination.write_all(&ciphertext)?;
    destination.flush()?;
    stats.bytes_written += ciphertext.len() as u64;

    tracing::debug!(chunks, bytes = stats.bytes_read, "encrypted stream");
    Ok(stats)
}

/// Decrypt a ciphertext body (no IV header) from `source` into `destination`.
///
/// On a padding or format error everything but the final block has already
/// been written; callers that care must discard `destination`.
pub fn decrypt_stream<R, W>(
    mut source: R,
    mut destination: W,
    key: &Aes256Key32,
    iv: &Iv16,
    chunk_size: usize,
    cancel: &CancelFlag,
) -> Result<StreamStats>
where
    R: Read,
    W: Write,
{
    let mut decryptor = CbcDecryptor::new(key, iv);
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut plaintext = Zeroizing::new(Vec::with_capacity(chunk.len() + BLOCK_SIZE));
    let mut stats = StreamStats::default();
    let mut chunks = 0u64;

    loop {
        cancel.check()?;
        let n = read_some(&mut source, &mut chunk)?;
        if n == 0 {
            break;
        }
        decryptor.update(&chunk[..n], &mut plaintext);
        destination.write_all(&plaintext)?;
        stats.bytes_read += n as u64;
        stats.bytes_written += plaintext.len() as u64;
        plaintext.clear();
        chunks += 1;
    }

    decryptor.finalize(&mut plaintext)?;
    destination.write_all(&plaintext)?;
    destination.flush()?;
    stats.bytes_written += plaintext.len() as u64;

    tracing::debug!(chunks, bytes = stats.bytes_written, "decrypted stream");
    Ok(stats)
}
