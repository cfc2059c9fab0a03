// src/consts.rs
//! Shared constants — security parameters and defaults

/// PBKDF2-HMAC-SHA256 iteration count used by every container written so far.
/// Not stored in the file, so changing it breaks decryption of old files.
pub const DEFAULT_KDF_ITERATIONS: u32 = 65_536;

/// Derived key length in bits (AES-256)
pub const KEY_LENGTH_BITS: u32 = 256;

/// Derived key length in bytes
pub const KEY_LENGTH_BYTES: usize = 32;

/// IV header length, always the first 16 bytes of a container
pub const IV_LENGTH: usize = 16;

/// AES block size
pub const BLOCK_SIZE: usize = 16;

/// Read/write chunk size for the streaming codec
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Salt used when no identity string is supplied
pub const EMPTY_IDENTITY_SALT: [u8; 8] = [0u8; 8];

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "PASSFILE_CONFIG";

/// Config file looked up when `PASSFILE_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "passfile.toml";
