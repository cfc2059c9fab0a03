// src/config/mod.rs
//! Configuration system for passfile-cipher
//!
//! The derivation and format parameters are data, not code: one
//! [`CipherConfig`] value drives every encrypt/decrypt call. A process-wide
//! copy is lazily loaded from TOML with a built-in fallback.

pub use app::{from_path, load, CipherConfig};

mod app;
mod defaults;
