// src/cancel.rs
//! Cooperative cancellation for streaming operations

use crate::error::{CipherError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation handle.
///
/// Hand a clone to another thread and call [`CancelFlag::cancel`]; the
/// running operation notices between chunks and returns
/// [`CipherError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancellation has been requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(CipherError::Cancelled);
        }
        Ok(())
    }
}
