//! src/crypto/iv.rs
//! Fresh CBC initialization vectors from the OS random source

use crate::aliases::Iv16;
use crate::consts::IV_LENGTH;
use crate::error::{CipherError, Result};
use rand::{rngs::OsRng, TryRngCore};

/// Draw 16 bytes from the OS CSPRNG.
///
/// Nothing tracks previously issued IVs; uniqueness per key rests on the
/// 128 bits of entropy. An RNG failure is fatal.
pub fn generate_iv() -> Result<Iv16> {
    let mut iv = Iv16::new([0u8; IV_LENGTH]);
    OsRng
        .try_fill_bytes(iv.expose_secret_mut())
        .map_err(|e| CipherError::Configuration(format!("secure random source failed: {e}")))?;
    Ok(iv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ivs_do_not_repeat() {
        let seen: HashSet<[u8; IV_LENGTH]> = (0..1000)
            .map(|_| *generate_iv().unwrap().expose_secret())
            .collect();
        assert_eq!(seen.len(), 1000);
    }
}
