//! src/crypto/kdf.rs
//! PBKDF2-HMAC-SHA256 — passphrase + identity salt → AES-256 key

use crate::aliases::Aes256Key32;
use crate::config::CipherConfig;
use crate::consts::{EMPTY_IDENTITY_SALT, KEY_LENGTH_BYTES};
use crate::error::{CipherError, Result};
use crate::lifecycle::Passphrase;

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;

/// Non-secret KDF salt derived from the caller's identity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// UTF-8 bytes of the identity, or 8 zero bytes when there is none.
    pub fn from_identity(identity: Option<&str>) -> Self {
        match identity {
            Some(id) => Self(id.as_bytes().to_vec()),
            None => Self(EMPTY_IDENTITY_SALT.to_vec()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Derive the 256-bit file key.
///
/// Deterministic for identical `(passphrase, salt, iteration_count)`. An empty
/// passphrase is accepted and still yields a key.
///
/// # Errors
/// [`CipherError::Configuration`] if the config asks for parameters the
/// primitive cannot provide, or if PBKDF2 itself refuses to run.
pub fn derive_key(
    passphrase: &Passphrase,
    salt: &Salt,
    config: &CipherConfig,
) -> Result<Aes256Key32> {
    config.validate_kdf()?;
    if passphrase.is_empty() {
        tracing::warn!("deriving key from an empty passphrase");
    }

    let mut key = Aes256Key32::new([0u8; KEY_LENGTH_BYTES]);
    pbkdf2::<Hmac<Sha256>>(
        passphrase.expose_secret(),
        salt.as_bytes(),
        config.iteration_count,
        key.expose_secret_mut(),
    )
    .map_err(|e| CipherError::Configuration(format!("PBKDF2-HMAC-SHA256 failed: {e}")))?;

    tracing::debug!(
        iterations = config.iteration_count,
        salt_len = salt.as_bytes().len(),
        "derived file key"
    );
    Ok(key)
}
