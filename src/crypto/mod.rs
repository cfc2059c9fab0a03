// src/crypto/mod.rs
//! Cryptographic core — key derivation, IVs, the CBC codec and the
//! container pipelines built from them.
//!
//! Everything here works on `Read`/`Write` streams or in-memory buffers;
//! file handling lives in [`crate::file_ops`].
mod decrypt;
mod encrypt;
pub mod iv;
pub mod kdf;
pub mod stream;

pub use decrypt::{decrypt_container, decrypt_to_vec};
pub use encrypt::{encrypt_container, encrypt_to_vec};
pub use iv::generate_iv;
pub use kdf::{derive_key, Salt};
pub use stream::{decrypt_stream, encrypt_stream, CbcDecryptor, CbcEncryptor, StreamStats};

pub(crate) use decrypt::decrypt_pipeline;
pub(crate) use encrypt::encrypt_pipeline;

/// Sizes of one container operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStats {
    pub plaintext_bytes: u64,
    pub container_bytes: u64,
}
