//! Geometric Validator - pure evaluation of a candidate against a reference
//!
//! A candidate is an acceptable successor of a reference vector when it is
//! locally aligned with it (cosine similarity) and stays close to the fixed
//! origin anchor (radial displacement).
//!
//! ```text
//!   cosine = <reference, candidate> / (|reference| * |candidate|)
//!   radial = |candidate - origin|
//!
//!   severity = 2 * [cosine < 0.90] + 3 * [radial > 0.25]
//! ```
//!
//! Severity is therefore always one of {0, 2, 3, 5}.

use super::vector::Vector;
use crate::error::ShapeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum cosine similarity between the current state and a candidate
pub const COSINE_THRESHOLD: f64 = 0.90;

/// Maximum Euclidean distance between a candidate and the origin anchor
pub const RADIAL_THRESHOLD: f64 = 0.25;

/// Cosine reported when either vector has zero norm
pub const DEGENERATE_COSINE: f64 = -1.0;

/// Acceptance thresholds used by the validator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Candidates below this cosine are misaligned
    pub cosine: f64,

    /// Candidates beyond this radius from the origin are creeping
    pub radial: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cosine: COSINE_THRESHOLD,
            radial: RADIAL_THRESHOLD,
        }
    }
}

/// Geometric measurements for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Local alignment of the candidate with the reference, in [-1, 1]
    pub cosine: f64,

    /// Distance of the candidate from the origin anchor
    pub radial: f64,
}

impl Metrics {
    /// Whether the cosine meets the alignment threshold
    pub fn is_aligned(&self, thresholds: &Thresholds) -> bool {
        self.cosine >= thresholds.cosine
    }

    /// Whether the candidate stays inside the radial threshold
    pub fn is_within_radius(&self, thresholds: &Thresholds) -> bool {
        self.radial <= thresholds.radial
    }
}

/// Severity score of a verdict
///
/// Produced by the validator only as 0, 2, 3 or 5. Arbitrary values can be
/// built with `Severity::new` so that labelling code can handle anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u32);

impl Severity {
    /// Penalty for a misaligned candidate
    pub const MISALIGNMENT_PENALTY: u32 = 2;

    /// Penalty for a candidate outside the radial threshold
    pub const RADIAL_PENALTY: u32 = 3;

    /// No violation
    pub const NONE: Severity = Severity(0);

    /// Wrap a raw score
    pub const fn new(score: u32) -> Self {
        Self(score)
    }

    /// Score the metrics against the thresholds
    ///
    /// Penalties are charged only on a definite breach. A NaN measurement
    /// charges nothing, though the verdict built from it is still invalid.
    pub fn from_metrics(metrics: &Metrics, thresholds: &Thresholds) -> Self {
        let mut score = 0;
        if metrics.cosine < thresholds.cosine {
            score += Self::MISALIGNMENT_PENALTY;
        }
        if metrics.radial > thresholds.radial {
            score += Self::RADIAL_PENALTY;
        }
        Self(score)
    }

    /// Raw integer score
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Severity> for u32 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

/// Outcome of validating one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the candidate passes both checks
    pub is_valid: bool,

    /// Severity of the violations, 0 when valid
    pub severity: Severity,

    /// Measurements the decision was based on
    pub metrics: Metrics,
}

/// Evaluate a candidate with the default thresholds
///
/// # Examples
///
/// ```
/// use doctrine_core::alignment::validator::evaluate;
/// use doctrine_core::alignment::vector::Vector;
///
/// let origin = Vector::from([1.0, 0.0, 0.0]);
/// let verdict = evaluate(&origin, &Vector::from([2.0, 0.0, 0.0]), &origin).unwrap();
///
/// assert!(!verdict.is_valid);
/// assert_eq!(verdict.severity.value(), 3);
/// ```
pub fn evaluate(
    reference: &Vector,
    candidate: &Vector,
    origin: &Vector,
) -> Result<Verdict, ShapeError> {
    evaluate_with(&Thresholds::default(), reference, candidate, origin)
}

/// Evaluate a candidate against a reference vector and an origin anchor
///
/// All three vectors must share one dimensionality.
pub fn evaluate_with(
    thresholds: &Thresholds,
    reference: &Vector,
    candidate: &Vector,
    origin: &Vector,
) -> Result<Verdict, ShapeError> {
    ShapeError::check("candidate", reference.dimension(), candidate.dimension())?;
    ShapeError::check("origin anchor", reference.dimension(), origin.dimension())?;

    let metrics = Metrics {
        cosine: cosine_similarity(reference, candidate)?,
        radial: candidate.distance(origin)?,
    };

    let severity = Severity::from_metrics(&metrics, thresholds);
    let is_valid = metrics.is_aligned(thresholds) && metrics.is_within_radius(thresholds);

    Ok(Verdict {
        is_valid,
        severity,
        metrics,
    })
}

/// Cosine similarity, or `DEGENERATE_COSINE` if either norm is zero
pub fn cosine_similarity(a: &Vector, b: &Vector) -> Result<f64, ShapeError> {
    let dot = a.dot(b)?;
    let norm_a = a.magnitude();
    let norm_b = b.magnitude();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(DEGENERATE_COSINE);
    }

    Ok(dot / (norm_a * norm_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(components: &[f64]) -> Vector {
        Vector::from(components)
    }

    #[test]
    fn test_safe_expansion() {
        let origin = v(&[1.0, 0.0, 0.0]);
        let verdict = evaluate(&origin, &v(&[1.0, 0.1, 0.0]), &origin).unwrap();

        assert!(verdict.is_valid);
        assert_eq!(verdict.severity, Severity::NONE);
        assert!((verdict.metrics.cosine - 0.995037).abs() < 1e-6);
        assert!((verdict.metrics.radial - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_identity_creep() {
        let origin = v(&[1.0, 0.0, 0.0]);
        let verdict = evaluate(&origin, &v(&[2.0, 0.0, 0.0]), &origin).unwrap();

        assert!(!verdict.is_valid);
        assert_eq!(verdict.severity.value(), 3);
        assert_eq!(verdict.metrics.cosine, 1.0);
        assert_eq!(verdict.metrics.radial, 1.0);
    }

    #[test]
    fn test_critical_breach() {
        let origin = v(&[1.0, 0.0, 0.0]);
        let verdict = evaluate(&origin, &v(&[-1.0, 0.0, 0.0]), &origin).unwrap();

        assert!(!verdict.is_valid);
        assert_eq!(verdict.severity.value(), 5);
        assert_eq!(verdict.metrics.cosine, -1.0);
        assert_eq!(verdict.metrics.radial, 2.0);
    }

    #[test]
    fn test_local_drift_only() {
        // Orthogonal to the reference but right on the origin
        let reference = v(&[0.0, 1.0]);
        let origin = v(&[1.0, 0.0]);
        let verdict = evaluate(&reference, &v(&[1.0, 0.0]), &origin).unwrap();

        assert!(!verdict.is_valid);
        assert_eq!(verdict.severity.value(), 2);
        assert_eq!(verdict.metrics.radial, 0.0);
    }

    #[test]
    fn test_zero_norm_guard() {
        let origin = v(&[0.0, 0.0]);
        let zero = v(&[0.0, 0.0]);
        let unit = v(&[1.0, 0.0]);

        let verdict = evaluate(&zero, &unit, &origin).unwrap();
        assert_eq!(verdict.metrics.cosine, DEGENERATE_COSINE);

        let verdict = evaluate(&unit, &zero, &origin).unwrap();
        assert_eq!(verdict.metrics.cosine, DEGENERATE_COSINE);
        assert_eq!(verdict.metrics.radial, 0.0);
        assert_eq!(verdict.severity.value(), 2);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let thresholds = Thresholds {
            cosine: 1.0,
            radial: 1.0,
        };
        let origin = v(&[1.0, 0.0]);
        let verdict = evaluate_with(&thresholds, &origin, &v(&[2.0, 0.0]), &origin).unwrap();

        // cosine == 1.0 and radial == 1.0 sit exactly on the boundary
        assert!(verdict.is_valid);
        assert_eq!(verdict.severity, Severity::NONE);
    }

    #[test]
    fn test_nan_metrics_are_invalid_without_penalty() {
        let origin = v(&[1.0, 0.0]);
        let verdict = evaluate(&origin, &v(&[f64::NAN, 0.0]), &origin).unwrap();

        assert!(!verdict.is_valid);
        assert_eq!(verdict.severity, Severity::NONE);
    }

    #[test]
    fn test_overflowing_norm_is_invalid_without_penalty() {
        let huge = v(&[1e200, 0.0, 0.0]);
        let verdict = evaluate(&huge, &huge, &huge).unwrap();

        // |huge|^2 overflows, so cosine is inf / inf
        assert!(verdict.metrics.cosine.is_nan());
        assert_eq!(verdict.metrics.radial, 0.0);
        assert!(!verdict.is_valid);
        assert_eq!(verdict.severity, Severity::NONE);
    }

    #[test]
    fn test_shape_mismatch() {
        let origin = v(&[1.0, 0.0, 0.0]);

        let err = evaluate(&origin, &v(&[1.0, 0.0]), &origin).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::DimensionMismatch {
                context: "candidate",
                expected: 3,
                actual: 2,
            }
        ));

        let err = evaluate(&origin, &origin, &v(&[1.0])).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::DimensionMismatch {
                context: "origin anchor",
                ..
            }
        ));
    }

    #[test]
    fn test_verdict_serialization() {
        let origin = v(&[1.0, 0.0]);
        let verdict = evaluate(&origin, &v(&[2.0, 0.0]), &origin).unwrap();
        let json = serde_json::to_value(verdict).unwrap();

        assert_eq!(json["is_valid"], false);
        assert_eq!(json["severity"], 3);
        assert_eq!(json["metrics"]["radial"], 1.0);
    }
}
