// src/config/app.rs
use super::defaults::*;
use crate::consts::{BLOCK_SIZE, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, IV_LENGTH, KEY_LENGTH_BITS};
use crate::error::{CipherError, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

/// Parameters shared by encryption and decryption.
///
/// None of these are written into the container. A file can only be
/// decrypted with the exact values it was encrypted with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CipherConfig {
    #[serde(default = "default_iteration_count")]
    pub iteration_count: u32,
    #[serde(default = "default_key_length_bits")]
    pub key_length_bits: u32,
    #[serde(default = "default_iv_length_bytes")]
    pub iv_length_bytes: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            iteration_count: default_iteration_count(),
            key_length_bits: default_key_length_bits(),
            iv_length_bytes: default_iv_length_bytes(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl CipherConfig {
    /// Same config with a different PBKDF2 iteration count
    #[must_use]
    pub fn with_iterations(mut self, iteration_count: u32) -> Self {
        self.iteration_count = iteration_count;
        self
    }

    /// Same config with a different streaming chunk size
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn key_length_bytes(&self) -> usize {
        (self.key_length_bits / 8) as usize
    }

    /// Reject KDF parameters PBKDF2-HMAC-SHA256 cannot turn into an AES-256 key.
    pub fn validate_kdf(&self) -> Result<()> {
        if self.iteration_count == 0 {
            return Err(CipherError::Configuration(
                "PBKDF2 iteration count must be at least 1".into(),
            ));
        }
        if self.key_length_bits != KEY_LENGTH_BITS {
            return Err(CipherError::Configuration(format!(
                "unsupported key length {} bits (only {KEY_LENGTH_BITS} is available)",
                self.key_length_bits
            )));
        }
        Ok(())
    }

    /// Reject anything the AES-256-CBC container cannot express.
    pub fn validate(&self) -> Result<()> {
        self.validate_kdf()?;
        if self.iv_length_bytes != IV_LENGTH {
            return Err(CipherError::Configuration(format!(
                "unsupported IV length {} bytes (AES-CBC needs {IV_LENGTH})",
                self.iv_length_bytes
            )));
        }
        if self.chunk_size == 0 || self.chunk_size % BLOCK_SIZE != 0 {
            return Err(CipherError::Configuration(format!(
                "chunk size {} must be a non-zero multiple of {BLOCK_SIZE}",
                self.chunk_size
            )));
        }
        Ok(())
    }
}

static CONFIG: OnceLock<CipherConfig> = OnceLock::new();

/// Read and validate a TOML config file.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CipherConfig> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let conf: CipherConfig = toml::from_str(&content).map_err(|e| {
        CipherError::Configuration(format!("invalid TOML in {}: {e}", path.as_ref().display()))
    })?;
    conf.validate()?;
    Ok(conf)
}

/// Resolve the config file named by `PASSFILE_CONFIG` (or `passfile.toml`)
/// without touching the process-wide cache.
fn load_uncached() -> Result<CipherConfig> {
    let config_path =
        std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    if Path::new(&config_path).exists() {
        tracing::debug!(path = %config_path, "loading cipher config");
        from_path(&config_path)
    } else {
        tracing::debug!(path = %config_path, "config file not found, using built-in defaults");
        Ok(CipherConfig::default())
    }
}

/// Load config at runtime, falling back to defaults if the file is missing.
/// The first successful load is cached for the life of the process.
pub fn load() -> Result<&'static CipherConfig> {
    if let Some(conf) = CONFIG.get() {
        return Ok(conf);
    }
    let conf = load_uncached()?;
    Ok(CONFIG.get_or_init(|| conf))
}
