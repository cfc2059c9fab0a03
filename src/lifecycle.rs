// src/lifecycle.rs
//! Passphrase ownership and per-operation state
//!
//! A [`SecretScope`] borrows the caller's [`Passphrase`] for exactly one
//! encrypt/decrypt call and overwrites it with zeros when dropped. Because the
//! wipe lives in `Drop`, it runs on normal return, on `?` propagation, on
//! cancellation and while unwinding from a panic.

use crate::aliases::PassphraseBytes;
use crate::error::{CipherError, Result};
use std::fmt;
use zeroize::Zeroize;

/// Sensitive passphrase bytes (UTF-8 as typed by the user).
pub struct Passphrase {
    bytes: PassphraseBytes,
    wiped: bool,
}

impl Passphrase {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: PassphraseBytes::new(bytes),
            wiped: false,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.expose_secret().is_empty()
    }

    /// True once the buffer has been zeroed by [`Passphrase::wipe`].
    pub fn is_wiped(&self) -> bool {
        self.wiped
    }

    /// Overwrite every byte (and the spare capacity) with zeros.
    pub fn wipe(&mut self) {
        self.bytes.expose_secret_mut().zeroize();
        self.wiped = true;
    }

    pub(crate) fn expose_secret(&self) -> &[u8] {
        self.bytes.expose_secret()
    }
}

impl From<String> for Passphrase {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Passphrase {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passphrase")
            .field("bytes", &"[REDACTED]")
            .field("wiped", &self.wiped)
            .finish()
    }
}

/// Exclusive, scoped access to a passphrase. Dropping the scope wipes it.
pub struct SecretScope<'a> {
    passphrase: &'a mut Passphrase,
}

impl<'a> SecretScope<'a> {
    /// # Errors
    /// A passphrase that was already wiped by an earlier operation is
    /// rejected; it would otherwise silently act as an empty passphrase.
    pub fn acquire(passphrase: &'a mut Passphrase) -> Result<Self> {
        if passphrase.is_wiped() {
            return Err(CipherError::Configuration(
                "passphrase was already consumed by a previous operation".into(),
            ));
        }
        Ok(Self { passphrase })
    }

    pub fn passphrase(&self) -> &Passphrase {
        self.passphrase
    }
}

impl Drop for SecretScope<'_> {
    fn drop(&mut self) {
        self.passphrase.wipe();
        tracing::trace!("passphrase wiped");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// `Idle → KeyDerived → {IvGenerated | IvRead} → Streaming → Finalized`,
/// with `Failed` reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    KeyDerived,
    IvGenerated,
    IvRead,
    Streaming,
    Finalized,
    Failed,
}

impl OperationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized | Self::Failed)
    }

    /// The next state, or `None` if `next` is not reachable from `self`.
    pub fn advance(self, next: Self) -> Option<Self> {
        use OperationState::*;
        let legal = match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Idle, KeyDerived)
            | (KeyDerived, IvGenerated)
            | (KeyDerived, IvRead)
            | (IvGenerated, Streaming)
            | (IvRead, Streaming)
            | (Streaming, Finalized) => true,
            _ => false,
        };
        legal.then_some(next)
    }
}

/// State tracker for one encrypt or decrypt call.
#[derive(Debug)]
pub(crate) struct Operation {
    direction: Direction,
    state: OperationState,
}

impl Operation {
    pub(crate) fn new(direction: Direction) -> Self {
        Self {
            direction,
            state: OperationState::Idle,
        }
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn state(&self) -> OperationState {
        self.state
    }

    pub(crate) fn enter(&mut self, next: OperationState) {
        match self.state.advance(next) {
            Some(state) => {
                tracing::debug!(direction = ?self.direction, from = ?self.state, to = ?state, "operation state");
                self.state = state;
            }
            None => {
                debug_assert!(false, "illegal transition {:?} -> {next:?}", self.state);
                tracing::warn!(from = ?self.state, to = ?next, "illegal operation transition");
                self.state = OperationState::Failed;
            }
        }
    }

    /// Move to `Finalized` or `Failed` depending on `result`.
    pub(crate) fn finish<T>(&mut self, result: &Result<T>) {
        match result {
            Ok(_) => self.enter(OperationState::Finalized),
            Err(e) if !self.state.is_terminal() => {
                tracing::debug!(direction = ?self.direction, from = ?self.state, error = %e, "operation failed");
                self.state = OperationState::Failed;
            }
            Err(_) => {}
        }
    }
}
