// src/aliases.rs
//! secure-gate secret types used throughout passfile-cipher
//!
//! Every buffer that ever holds key material is one of these and is zeroized
//! on drop.

pub use secure_gate::{Dynamic, Fixed};

// Fixed-size secrets
pub type Aes256Key32 = Fixed<[u8; 32]>; // PBKDF2 output, AES-256 key
pub type Iv16 = Fixed<[u8; 16]>; // CBC initialization vector
pub type Block16 = Fixed<[u8; 16]>; // one AES block of plaintext

// Dynamic secrets
pub type PassphraseBytes = Dynamic<Vec<u8>>; // UTF-8 passphrase as typed
pub type PlainText = Dynamic<Vec<u8>>; // decrypted file contents
