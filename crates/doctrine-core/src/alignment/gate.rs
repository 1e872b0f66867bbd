//! Identity Gate - the stateful Möbius Lock
//!
//! The gate owns the origin anchor, the current state and the history of
//! accepted states. Candidates are validated against the current state and
//! the anchor; only valid candidates move the state forward.
//!
//! # Invariants
//!
//! - the origin anchor never changes after construction
//! - every stored vector has the anchor's dimensionality
//! - the last history entry always equals the current state
//! - with the default policy, history grows by exactly one entry per
//!   successful `accept`
//!
//! # Example
//!
//! ```
//! use doctrine_core::alignment::{IdentityGate, Vector};
//!
//! let origin = Vector::from([1.0, 0.0, 0.0]);
//! let mut gate = IdentityGate::new(origin.clone(), origin).unwrap();
//!
//! let verdict = gate.accept(&Vector::from([1.0, 0.1, 0.0])).unwrap();
//! assert!(verdict.is_valid);
//! assert_eq!(gate.history().len(), 2);
//!
//! let verdict = gate.accept(&Vector::from([2.0, 0.0, 0.0])).unwrap();
//! assert!(!verdict.is_valid);
//! assert_eq!(gate.current_state(), &Vector::from([1.0, 0.1, 0.0]));
//! ```

use super::validator::{evaluate_with, Thresholds, Verdict};
use super::vector::Vector;
use crate::config::{GateConfig, HistoryPolicy};
use crate::error::{Result, ShapeError};

/// Stateful guardrail over an identity vector
#[derive(Debug, Clone)]
pub struct IdentityGate {
    /// Fixed reference point for radial checks
    origin: Vector,

    /// Most recently accepted state
    current: Vector,

    /// Accepted states, oldest first
    history: Vec<Vector>,

    /// Successful accepts since construction
    accepted: usize,

    thresholds: Thresholds,

    policy: HistoryPolicy,
}

impl IdentityGate {
    /// Create a gate with the default thresholds and unbounded history
    ///
    /// Fails if `origin` and `initial_state` differ in dimension.
    pub fn new(
        origin: impl Into<Vector>,
        initial_state: impl Into<Vector>,
    ) -> std::result::Result<Self, ShapeError> {
        Self::build(
            origin.into(),
            initial_state.into(),
            Thresholds::default(),
            HistoryPolicy::Unbounded,
        )
    }

    /// Create a gate with custom configuration
    pub fn with_config(
        origin: impl Into<Vector>,
        initial_state: impl Into<Vector>,
        config: &GateConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            origin.into(),
            initial_state.into(),
            config.thresholds,
            config.history,
        )?)
    }

    fn build(
        origin: Vector,
        initial_state: Vector,
        thresholds: Thresholds,
        policy: HistoryPolicy,
    ) -> std::result::Result<Self, ShapeError> {
        ShapeError::check("initial state", origin.dimension(), initial_state.dimension())?;

        tracing::debug!(
            "Identity gate created: dimension={}, origin={}",
            origin.dimension(),
            origin
        );

        Ok(Self {
            history: vec![initial_state.clone()],
            current: initial_state,
            origin,
            accepted: 0,
            thresholds,
            policy,
        })
    }

    /// Validate a candidate against the current state without mutating
    pub fn validate(&self, candidate: &Vector) -> std::result::Result<Verdict, ShapeError> {
        ShapeError::check("candidate", self.current.dimension(), candidate.dimension())?;
        evaluate_with(&self.thresholds, &self.current, candidate, &self.origin)
    }

    /// Validate a candidate and, if valid, make it the current state
    ///
    /// Returns the same verdict `validate` would. Rejected candidates leave
    /// the gate untouched.
    pub fn accept(&mut self, candidate: &Vector) -> std::result::Result<Verdict, ShapeError> {
        let verdict = self.validate(candidate)?;

        if verdict.is_valid {
            self.current = candidate.clone();
            self.history.push(candidate.clone());
            self.accepted += 1;
            self.enforce_history_policy();

            tracing::trace!(
                "Candidate accepted: cosine={:.4}, radial={:.4}",
                verdict.metrics.cosine,
                verdict.metrics.radial
            );
        } else {
            tracing::debug!(
                "Candidate rejected: severity={}, cosine={:.4}, radial={:.4}",
                verdict.severity,
                verdict.metrics.cosine,
                verdict.metrics.radial
            );
        }

        Ok(verdict)
    }

    fn enforce_history_policy(&mut self) {
        if let HistoryPolicy::Capped { max_entries } = self.policy {
            let max_entries = max_entries.max(1);
            if self.history.len() > max_entries {
                let excess = self.history.len() - max_entries;
                self.history.drain(..excess);
            }
        }
    }

    /// The fixed origin anchor
    pub fn origin(&self) -> &Vector {
        &self.origin
    }

    /// The current state
    pub fn current_state(&self) -> &Vector {
        &self.current
    }

    /// Accepted states, oldest first, ending with the current state
    pub fn history(&self) -> &[Vector] {
        &self.history
    }

    /// Number of successful accepts since construction
    pub fn accepted_count(&self) -> usize {
        self.accepted
    }

    /// Dimensionality shared by every vector in this gate
    pub fn dimension(&self) -> usize {
        self.origin.dimension()
    }

    /// Thresholds in force
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// History retention policy
    pub fn history_policy(&self) -> HistoryPolicy {
        self.policy
    }
}
