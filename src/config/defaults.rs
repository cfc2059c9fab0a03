// src/config/defaults.rs
use crate::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_KDF_ITERATIONS, IV_LENGTH, KEY_LENGTH_BITS};

pub fn default_iteration_count() -> u32 {
    DEFAULT_KDF_ITERATIONS
}

pub fn default_key_length_bits() -> u32 {
    KEY_LENGTH_BITS
}

pub fn default_iv_length_bytes() -> usize {
    IV_LENGTH
}

pub fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
