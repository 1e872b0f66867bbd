//! Doctrine Core - the Möbius Lock identity guardrail
//!
//! Doctrine Core decides whether a proposed update to a vector-valued
//! identity state may be accepted, based on two geometric checks against a
//! fixed origin anchor and the current state.
//!
//! # Architecture
//!
//! Doctrine is built on four components, leaves first:
//!
//! 1. **Geometric Validator** (`alignment::validator`): pure cosine/radial evaluation
//! 2. **Identity Gate** (`alignment::gate`): owns the current state and its history
//! 3. **Expansion Controller** (`framework::controller`): emergency bypass policy
//! 4. **Perception Smoother** (`framework::perception`): windowed display values and labels
//!
//! ```text
//! candidate -> Validator -> IdentityGate -> ExpansionController -> PerceptionSmoother
//!              (pure)       (mutates)       (bypass policy)        (display)
//! ```
//!
//! # Quick Start
//!
//! ```
//! use doctrine_core::{ExpansionController, ExpansionStatus, PerceptionSmoother, Vector};
//!
//! let origin = Vector::from([1.0, 0.0, 0.0]);
//! let mut controller = ExpansionController::new(origin.clone(), origin).unwrap();
//! let mut smoother = PerceptionSmoother::new(3);
//!
//! let outcome = controller.process(&Vector::from([1.0, 0.1, 0.0]), 0.0).unwrap();
//! assert_eq!(outcome.status, ExpansionStatus::Success);
//!
//! let shown = smoother.perceptual_output(&outcome.vector, 1.0, 0.0).unwrap();
//! println!("{} -> {}", smoother.rank_label(outcome.severity.value()), shown);
//! ```
//!
//! # Design Principles
//!
//! 1. **Errors, not coercion**: a vector of the wrong dimension is a `ShapeError`, never a verdict
//! 2. **Owned state**: the gate keeps its own copies of every stored vector
//! 3. **Append-only history**: the last entry always equals the current state

#![deny(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod alignment;
pub mod audit;
pub mod config;
pub mod error;
pub mod framework;

// Re-export commonly used types for convenience
pub use alignment::{
    evaluate, IdentityGate, Metrics, Severity, SharedGate, Thresholds, Vector, Verdict,
};
pub use audit::{run_audit, AuditReport};
pub use config::{DoctrineConfig, HistoryPolicy};
pub use error::{DoctrineError, Result, ShapeError};
pub use framework::{
    rank_label, DriftRank, ExpansionController, ExpansionOutcome, ExpansionStatus,
    PerceptionSmoother,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
