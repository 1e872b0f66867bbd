//! Alignment System - the Möbius Lock
//!
//! This module decides whether a proposed update to the identity vector may
//! be accepted.
//!
//! # Architecture
//!
//! ## 1. Vector (`vector`)
//!
//! Fixed-dimension points in identity space with checked arithmetic.
//!
//! ## 2. Geometric Validator (`validator`)
//!
//! Pure evaluation of a candidate:
//! - Local alignment: cosine similarity with the current state (>= 0.90)
//! - Identity creep: distance from the origin anchor (<= 0.25)
//! - Severity score in {0, 2, 3, 5}
//!
//! ## 3. IdentityGate (`gate`)
//!
//! Owns the origin anchor, the current state and the history of accepted
//! states. Only valid candidates advance the state.
//!
//! ## 4. SharedGate (`shared`)
//!
//! A mutex-guarded handle for callers that share one gate across threads.
//!
//! # How It Works
//!
//! ```text
//!  candidate --> validate() --> Verdict { is_valid, severity, metrics }
//!                   |
//!                   +-- reference = current state
//!                   +-- anchor    = origin
//!
//!  accept(candidate):
//!      valid   -> current state := candidate, history.push(candidate)
//!      invalid -> no change
//! ```
//!
//! # Severity Table
//!
//! | cosine >= 0.90 | radial <= 0.25 | severity |
//! |----------------|----------------|----------|
//! | yes            | yes            | 0        |
//! | no             | yes            | 2        |
//! | yes            | no             | 3        |
//! | no             | no             | 5        |

pub mod gate;
pub mod shared;
pub mod validator;
pub mod vector;

// Re-export main types for convenience
pub use gate::IdentityGate;
pub use shared::SharedGate;
pub use validator::{
    cosine_similarity, evaluate, evaluate_with, Metrics, Severity, Thresholds, Verdict,
    COSINE_THRESHOLD, RADIAL_THRESHOLD,
};
pub use vector::Vector;
