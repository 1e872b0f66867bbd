//! Shared gate handle for multi-threaded callers
//!
//! `accept` is a read-then-write on the gate. Holding one lock across the
//! whole call keeps the last history entry equal to the current state even
//! when several threads feed the same gate.

use parking_lot::Mutex;
use std::sync::Arc;

use super::gate::IdentityGate;
use super::validator::Verdict;
use super::vector::Vector;
use crate::error::ShapeError;

/// Cloneable, thread-safe handle to one [`IdentityGate`]
#[derive(Debug, Clone)]
pub struct SharedGate {
    inner: Arc<Mutex<IdentityGate>>,
}

impl SharedGate {
    /// Wrap a gate for shared use
    pub fn new(gate: IdentityGate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(gate)),
        }
    }

    /// Validate without mutating
    pub fn validate(&self, candidate: &Vector) -> Result<Verdict, ShapeError> {
        self.inner.lock().validate(candidate)
    }

    /// Validate and accept under a single lock
    pub fn accept(&self, candidate: &Vector) -> Result<Verdict, ShapeError> {
        self.inner.lock().accept(candidate)
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> Vector {
        self.inner.lock().current_state().clone()
    }

    /// Number of retained history entries
    pub fn history_len(&self) -> usize {
        self.inner.lock().history().len()
    }

    /// Run a closure with exclusive access to the gate
    pub fn with_gate<R>(&self, f: impl FnOnce(&mut IdentityGate) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl From<IdentityGate> for SharedGate {
    fn from(gate: IdentityGate) -> Self {
        Self::new(gate)
    }
}
