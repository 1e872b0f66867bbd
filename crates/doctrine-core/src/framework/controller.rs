//! Expansion Controller - policy in front of the identity gate
//!
//! Routes candidates through [`IdentityGate::accept`], except under
//! emergency distress where the gate is bypassed entirely and the candidate
//! is returned as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::alignment::gate::IdentityGate;
use crate::alignment::validator::{Metrics, Severity};
use crate::alignment::vector::Vector;
use crate::config::{ControllerConfig, DoctrineConfig};
use crate::error::{Result, ShapeError};

/// Outcome status of one expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpansionStatus {
    /// Candidate accepted by the gate
    Success,

    /// Candidate rejected; the gate kept its state
    RollbackTriggered,

    /// Gate bypassed under emergency distress
    EmergencyAscentActive,
}

impl ExpansionStatus {
    /// The status label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::RollbackTriggered => "ROLLBACK_TRIGGERED",
            Self::EmergencyAscentActive => "EMERGENCY_ASCENT_ACTIVE",
        }
    }
}

impl fmt::Display for ExpansionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of processing one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionOutcome {
    /// The candidate on success or bypass, the retained state on rollback
    pub vector: Vector,

    /// Verdict severity, 0 on bypass
    pub severity: Severity,

    /// What happened
    pub status: ExpansionStatus,

    /// Gate measurements, absent on bypass
    pub metrics: Option<Metrics>,
}

/// Gate wrapper applying the emergency bypass policy
#[derive(Debug, Clone)]
pub struct ExpansionController {
    gate: IdentityGate,
    config: ControllerConfig,
}

impl ExpansionController {
    /// Create a controller over a default gate
    pub fn new(
        origin: impl Into<Vector>,
        initial_state: impl Into<Vector>,
    ) -> std::result::Result<Self, ShapeError> {
        Ok(Self {
            gate: IdentityGate::new(origin, initial_state)?,
            config: ControllerConfig::default(),
        })
    }

    /// Create a controller from a full configuration
    pub fn with_config(
        origin: impl Into<Vector>,
        initial_state: impl Into<Vector>,
        config: &DoctrineConfig,
    ) -> Result<Self> {
        config.controller.validate()?;
        Ok(Self {
            gate: IdentityGate::with_config(origin, initial_state, &config.gate)?,
            config: config.controller.clone(),
        })
    }

    /// Wrap an existing gate
    pub fn from_gate(gate: IdentityGate, config: ControllerConfig) -> Self {
        Self { gate, config }
    }

    /// Process a candidate with no distress signal
    pub fn process_calm(
        &mut self,
        candidate: &Vector,
    ) -> std::result::Result<ExpansionOutcome, ShapeError> {
        self.process(candidate, 0.0)
    }

    /// Process a candidate under the given distress level
    ///
    /// Distress strictly above the emergency threshold skips the gate: no
    /// validation, no state change, severity 0.
    pub fn process(
        &mut self,
        candidate: &Vector,
        user_distress: f64,
    ) -> std::result::Result<ExpansionOutcome, ShapeError> {
        if user_distress > self.config.emergency_threshold {
            tracing::warn!(
                "Emergency ascent: gate bypassed at distress {:.2}",
                user_distress
            );
            return Ok(ExpansionOutcome {
                vector: candidate.clone(),
                severity: Severity::NONE,
                status: ExpansionStatus::EmergencyAscentActive,
                metrics: None,
            });
        }

        let verdict = self.gate.accept(candidate)?;

        if verdict.is_valid {
            Ok(ExpansionOutcome {
                vector: candidate.clone(),
                severity: verdict.severity,
                status: ExpansionStatus::Success,
                metrics: Some(verdict.metrics),
            })
        } else {
            tracing::info!(
                "Rollback triggered: severity={}, cosine={:.4}, radial={:.4}",
                verdict.severity,
                verdict.metrics.cosine,
                verdict.metrics.radial
            );
            Ok(ExpansionOutcome {
                vector: self.gate.current_state().clone(),
                severity: verdict.severity,
                status: ExpansionStatus::RollbackTriggered,
                metrics: Some(verdict.metrics),
            })
        }
    }

    /// The wrapped gate
    pub fn gate(&self) -> &IdentityGate {
        &self.gate
    }

    /// Distress level above which the gate is bypassed
    pub fn emergency_threshold(&self) -> f64 {
        self.config.emergency_threshold
    }
}
