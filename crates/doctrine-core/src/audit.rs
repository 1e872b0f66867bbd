//! Doctrine audit
//!
//! Builds a lock at the canonical anchor `[1, 0, 0]` and checks that a
//! small, aligned step passes while a step far from the anchor is blocked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::alignment::gate::IdentityGate;
use crate::alignment::validator::Verdict;
use crate::alignment::vector::Vector;
use crate::config::DoctrineConfig;
use crate::error::{Result, ResultExt};
use crate::framework::perception::DriftRank;

/// Expected result of one audit case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The lock must accept the candidate
    Pass,

    /// The lock must reject the candidate
    Block,
}

/// One audited candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditCase {
    /// Case name
    pub name: String,

    /// Candidate vector
    pub candidate: Vector,

    /// What the lock should do
    pub expectation: Expectation,

    /// What the lock did
    pub verdict: Verdict,

    /// Drift label of the verdict severity
    pub rank: DriftRank,
}

impl AuditCase {
    /// Whether the lock behaved as expected
    pub fn passed(&self) -> bool {
        match self.expectation {
            Expectation::Pass => self.verdict.is_valid,
            Expectation::Block => !self.verdict.is_valid,
        }
    }
}

impl fmt::Display for AuditCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match (self.expectation, self.passed()) {
            (Expectation::Pass, true) => "PASSED",
            (Expectation::Block, true) => "BLOCKED",
            (_, false) => "FAILED",
        };
        write!(
            f,
            "{} Test: {} (Sev: {})",
            self.name, outcome, self.verdict.severity
        )
    }
}

/// Audit results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Report identifier (`audit_<uuid>`)
    pub report_id: String,

    /// When the audit ran
    pub generated_at: DateTime<Utc>,

    /// Anchor and initial state used
    pub origin: Vector,

    /// Individual cases
    pub cases: Vec<AuditCase>,

    /// True when every case behaved as expected
    pub passed: bool,
}

/// Canonical origin anchor used by the audit
pub fn audit_origin() -> Vector {
    Vector::from([1.0, 0.0, 0.0])
}

/// Run the audit with the given configuration
pub fn run_audit(config: &DoctrineConfig) -> Result<AuditReport> {
    let origin = audit_origin();
    let gate = IdentityGate::with_config(origin.clone(), origin.clone(), &config.gate)
        .context("Failed to build audit gate")?;

    let plan = [
        ("Safe Expansion", Vector::from([1.0, 0.1, 0.0]), Expectation::Pass),
        ("Identity Creep", Vector::from([2.0, 0.0, 0.0]), Expectation::Block),
    ];

    let mut cases = Vec::with_capacity(plan.len());
    for (name, candidate, expectation) in plan {
        let verdict = gate
            .validate(&candidate)
            .with_context(|| format!("Audit case '{name}' failed"))?;

        let case = AuditCase {
            name: name.to_string(),
            rank: DriftRank::from_severity(verdict.severity.value()),
            candidate,
            expectation,
            verdict,
        };
        tracing::info!("{}", case);
        cases.push(case);
    }

    let passed = cases.iter().all(AuditCase::passed);
    if !passed {
        tracing::warn!("Doctrine audit failed");
    }

    Ok(AuditReport {
        report_id: format!("audit_{}", Uuid::new_v4()),
        generated_at: Utc::now(),
        origin,
        cases,
        passed,
    })
}
