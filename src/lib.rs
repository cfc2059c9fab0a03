// src/lib.rs
//! passfile-cipher — passphrase-derived streaming file encryption
//!
//! Features:
//! - PBKDF2-HMAC-SHA256 key derivation salted with an identity string
//! - AES-256-CBC with PKCS#7 padding, streamed in bounded chunks
//! - `IV || ciphertext` container, compatible with existing files
//! - Passphrase wiped on every exit path, full secure-gate integration
//!
//! The container carries no authentication tag: corrupted or tampered data is
//! rejected only when it happens to break the padding.

pub mod aliases;
pub mod cancel;
pub mod config;
pub mod consts;
pub mod container;
pub mod crypto;
pub mod file_ops;
pub mod lifecycle;

pub mod error;

// Re-export everything users need at the crate root
pub use cancel::CancelFlag;
pub use config::{load as load_config, CipherConfig};
pub use crypto::{
    decrypt_container, decrypt_to_vec, derive_key, encrypt_container, encrypt_to_vec,
    generate_iv, ContainerStats, Salt,
};
pub use error::{CipherError, Result};
pub use file_ops::{
    decrypt_file, decrypt_file_default, encrypt_file, encrypt_file_default, OperationReport,
};
pub use lifecycle::{OperationState, Passphrase, SecretScope};
