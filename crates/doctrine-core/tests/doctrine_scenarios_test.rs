//! Scenario tests for the Möbius Lock
//!
//! Walks through the canonical cases: safe expansion, identity creep,
//! critical breach, perception averaging and the emergency bypass.

use doctrine_core::alignment::validator::evaluate;
use doctrine_core::{
    DoctrineConfig, DriftRank, ExpansionController, ExpansionStatus, HistoryPolicy, IdentityGate,
    PerceptionSmoother, Severity, ShapeError, Vector,
};

fn canonical_gate() -> IdentityGate {
    IdentityGate::new([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]).unwrap()
}

#[test]
fn safe_expansion_is_valid() {
    let gate = canonical_gate();
    let verdict = gate.validate(&Vector::from([1.0, 0.1, 0.0])).unwrap();

    assert!(verdict.metrics.cosine >= 0.90);
    assert!((verdict.metrics.cosine - 0.995).abs() < 1e-3);
    assert!((verdict.metrics.radial - 0.1).abs() < 1e-9);
    assert!(verdict.is_valid);
    assert_eq!(verdict.severity, Severity::NONE);
}

#[test]
fn identity_creep_is_blocked() {
    let gate = canonical_gate();
    let verdict = gate.validate(&Vector::from([2.0, 0.0, 0.0])).unwrap();

    assert_eq!(verdict.metrics.cosine, 1.0);
    assert_eq!(verdict.metrics.radial, 1.0);
    assert!(!verdict.is_valid);
    assert_eq!(verdict.severity.value(), 3);
}

#[test]
fn reversed_candidate_is_a_critical_breach() {
    let origin = Vector::from([1.0, 0.0, 0.0]);
    let verdict = evaluate(&origin, &Vector::from([-1.0, 0.0, 0.0]), &origin).unwrap();

    assert_eq!(verdict.metrics.cosine, -1.0);
    assert_eq!(verdict.metrics.radial, 2.0);
    assert_eq!(verdict.severity.value(), 5);
    assert!(!verdict.is_valid);
    assert_eq!(
        DriftRank::from_severity(verdict.severity.value()),
        DriftRank::CriticalBreach
    );
}

#[test]
fn perception_window_reports_mean() {
    let mut smoother = PerceptionSmoother::new(2);

    let mut last = None;
    for x in [1.0, 2.0, 3.0] {
        last = Some(
            smoother
                .perceptual_output(&Vector::from([x, 0.0]), 1.0, 0.0)
                .unwrap(),
        );
    }

    assert_eq!(last, Some(Vector::from([2.0, 0.0])));
}

#[test]
fn emergency_distress_bypasses_the_gate() {
    let mut controller = ExpansionController::new([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]).unwrap();

    for candidate in [
        Vector::from([1.0, 0.1, 0.0]),
        Vector::from([-1.0, 0.0, 0.0]),
        Vector::from([0.0, 0.0, 0.0]),
    ] {
        let outcome = controller.process(&candidate, 0.95).unwrap();
        assert_eq!(outcome.vector, candidate);
        assert_eq!(outcome.severity.value(), 0);
        assert_eq!(outcome.status, ExpansionStatus::EmergencyAscentActive);
    }

    assert_eq!(controller.gate().history().len(), 1);
}

#[test]
fn zero_vectors_never_divide_by_zero() {
    let mut gate = IdentityGate::new([0.0, 0.0], [0.0, 0.0]).unwrap();

    let verdict = gate.validate(&Vector::from([0.1, 0.0])).unwrap();
    assert_eq!(verdict.metrics.cosine, -1.0);
    assert!(!verdict.is_valid);

    let verdict = gate.accept(&Vector::zero(2)).unwrap();
    assert_eq!(verdict.metrics.cosine, -1.0);
    assert_eq!(verdict.severity.value(), 2);
    assert_eq!(gate.history().len(), 1);
}

#[test]
fn history_counts_only_successful_accepts() {
    let mut gate = canonical_gate();
    let candidates = [
        ([1.0, 0.05, 0.0], true),
        ([3.0, 0.0, 0.0], false),
        ([1.0, 0.1, 0.0], true),
        ([0.0, 1.0, 0.0], false),
        ([1.0, 0.1, 0.05], true),
    ];

    for (components, expected) in candidates {
        let verdict = gate.accept(&Vector::from(components)).unwrap();
        assert_eq!(verdict.is_valid, expected);
        assert_eq!(gate.history().last(), Some(gate.current_state()));
    }

    assert_eq!(gate.history().len(), 4);
    assert_eq!(gate.accepted_count(), 3);
}

#[test]
fn mismatched_shapes_are_errors_everywhere() {
    let err = IdentityGate::new([1.0, 0.0], [1.0, 0.0, 0.0]).unwrap_err();
    assert!(matches!(err, ShapeError::DimensionMismatch { .. }));

    let mut gate = canonical_gate();
    assert!(gate.validate(&Vector::from([1.0])).is_err());
    assert!(gate.accept(&Vector::from([1.0, 0.0, 0.0, 0.0])).is_err());

    let mut smoother = PerceptionSmoother::new(3);
    assert!(smoother
        .perceptual_output(&Vector::from([1.0]), 1.0, 0.0)
        .is_err());

    assert!(matches!(
        Vector::parse("1.0, zero, 0"),
        Err(ShapeError::NotNumeric(_))
    ));
}

#[test]
fn controller_built_from_config_uses_capped_history() {
    let config = DoctrineConfig::new().with_history(HistoryPolicy::Capped { max_entries: 2 });
    let mut controller =
        ExpansionController::with_config([1.0, 0.0], [1.0, 0.0], &config).unwrap();

    for y in [0.02, 0.04, 0.06, 0.08] {
        let outcome = controller.process_calm(&Vector::from([1.0, y])).unwrap();
        assert_eq!(outcome.status, ExpansionStatus::Success);
    }

    let gate = controller.gate();
    assert_eq!(gate.history().len(), 2);
    assert_eq!(gate.accepted_count(), 4);
    assert_eq!(gate.history().last(), Some(&Vector::from([1.0, 0.08])));
}
