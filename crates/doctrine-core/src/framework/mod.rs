//! Framework - policy and presentation around the lock
//!
//! - `controller`: emergency bypass policy in front of the gate
//! - `perception`: windowed smoothing and drift labels for display

pub mod controller;
pub mod perception;

pub use controller::{ExpansionController, ExpansionOutcome, ExpansionStatus};
pub use perception::{rank_label, DriftRank, PerceptionSmoother};
