// tests/common.rs
//! Shared test utilities — logging setup and fast cipher parameters

#![allow(dead_code)]

use passfile_cipher::CipherConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const IDENTITY: &str = "a@b.com";

/// Initialize test-friendly logging. Idempotent; respects RUST_LOG.
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// Low iteration count and a small chunk size, so tests stay fast and
/// still cross chunk boundaries.
pub fn fast_config() -> CipherConfig {
    CipherConfig::default()
        .with_iterations(1_000)
        .with_chunk_size(64)
}

/// Deterministic, non-repeating test data
pub fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}
