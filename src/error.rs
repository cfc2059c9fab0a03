// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherError {
    /// A cryptographic primitive or the OS random source is unusable,
    /// or the configured parameters are unsupported. Not retryable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Container too short to hold an IV, or a body that is empty or not
    /// block-aligned.
    #[error("Invalid container: {0}")]
    Format(String),

    /// Bad padding after decryption. Deliberately says nothing about whether
    /// the key, the IV or the ciphertext was at fault.
    #[error("decryption failed: wrong passphrase, wrong identity or corrupted data")]
    Padding,

    #[error("Operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, CipherError>;
