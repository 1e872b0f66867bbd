//! Perception Smoother - display-side view of raw candidates
//!
//! Keeps a short FIFO window of recent raw candidates and reports their mean
//! for display. Under high distress or low context stability the window
//! collapses to the raw candidate ("truth shock"), though the candidate is
//! still recorded for later calls.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::alignment::vector::Vector;
use crate::config::PerceptionConfig;
use crate::error::{Result, ShapeError};

/// Bounded window of recent raw candidates
#[derive(Debug, Clone)]
pub struct PerceptionSmoother {
    /// Dimensionality of every candidate
    vector_dim: usize,

    /// Recent candidates (most recent at back)
    window: VecDeque<Vector>,

    config: PerceptionConfig,
}

impl PerceptionSmoother {
    /// Create a smoother with the default window of 3
    pub fn new(vector_dim: usize) -> Self {
        let config = PerceptionConfig::default();
        Self {
            vector_dim,
            window: VecDeque::with_capacity(config.window_size),
            config,
        }
    }

    /// Create a smoother with custom configuration
    pub fn with_config(vector_dim: usize, config: &PerceptionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            vector_dim,
            window: VecDeque::with_capacity(config.window_size),
            config: config.clone(),
        })
    }

    /// Record `raw` and return the vector to display
    ///
    /// Returns `raw` when the window collapses (distress above the
    /// threshold, or stability below the floor) or when fewer than two
    /// candidates have been seen. Otherwise returns the element-wise mean
    /// of the window.
    pub fn perceptual_output(
        &mut self,
        raw: &Vector,
        context_stability: f64,
        user_distress: f64,
    ) -> std::result::Result<Vector, ShapeError> {
        ShapeError::check("raw candidate", self.vector_dim, raw.dimension())?;

        if self.window.len() >= self.config.window_size {
            self.window.pop_front();
        }
        self.window.push_back(raw.clone());

        if self.is_truth_shock(context_stability, user_distress) {
            tracing::debug!(
                "Perception window collapsed: stability={:.2}, distress={:.2}",
                context_stability,
                user_distress
            );
            return Ok(raw.clone());
        }

        if self.window.len() < 2 {
            return Ok(raw.clone());
        }

        Ok(Vector::mean(&self.window)?.unwrap_or_else(|| raw.clone()))
    }

    /// Whether the inputs collapse the window to one sample
    pub fn is_truth_shock(&self, context_stability: f64, user_distress: f64) -> bool {
        user_distress > self.config.distress_threshold
            || context_stability < self.config.stability_floor
    }

    /// Map a severity score to its drift label
    pub fn rank_label(&self, severity: u32) -> DriftRank {
        DriftRank::from_severity(severity)
    }

    /// Candidates currently in the window, oldest first
    pub fn window(&self) -> impl Iterator<Item = &Vector> {
        self.window.iter()
    }

    /// Number of candidates in the window
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Check if the window is empty
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Configured window capacity
    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    /// Dimensionality of accepted candidates
    pub fn vector_dim(&self) -> usize {
        self.vector_dim
    }

    /// Forget every recorded candidate
    pub fn clear(&mut self) {
        self.window.clear();
    }
}

/// Human label for a severity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftRank {
    /// Severity 0
    Stable,

    /// Severity 2: misaligned with the current state
    LocalDrift,

    /// Severity 3: too far from the origin anchor
    IdentityCreep,

    /// Severity 5: both checks failed
    CriticalBreach,

    /// Any other score
    Anomaly,
}

impl DriftRank {
    /// Label a raw severity score
    pub fn from_severity(severity: u32) -> Self {
        match severity {
            0 => Self::Stable,
            2 => Self::LocalDrift,
            3 => Self::IdentityCreep,
            5 => Self::CriticalBreach,
            _ => Self::Anomaly,
        }
    }

    /// The label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "STABLE",
            Self::LocalDrift => "LOCAL_DRIFT",
            Self::IdentityCreep => "IDENTITY_CREEP",
            Self::CriticalBreach => "CRITICAL_BREACH",
            Self::Anomaly => "ANOMALY",
        }
    }
}

impl fmt::Display for DriftRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Map a severity score to its drift label
pub fn rank_label(severity: u32) -> DriftRank {
    DriftRank::from_severity(severity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v2(x: f64, y: f64) -> Vector {
        Vector::from([x, y])
    }

    #[test]
    fn test_mean_of_full_window() {
        let mut smoother = PerceptionSmoother::new(2);

        assert_eq!(smoother.perceptual_output(&v2(1.0, 0.0), 1.0, 0.0).unwrap(), v2(1.0, 0.0));
        assert_eq!(smoother.perceptual_output(&v2(2.0, 0.0), 1.0, 0.0).unwrap(), v2(1.5, 0.0));
        assert_eq!(smoother.perceptual_output(&v2(3.0, 0.0), 1.0, 0.0).unwrap(), v2(2.0, 0.0));
    }

    #[test]
    fn test_fifo_eviction() {
        let mut smoother = PerceptionSmoother::new(2);
        for x in [1.0, 2.0, 3.0] {
            smoother.perceptual_output(&v2(x, 0.0), 1.0, 0.0).unwrap();
        }

        // [1, 0] is evicted
        let out = smoother.perceptual_output(&v2(7.0, 0.0), 1.0, 0.0).unwrap();
        assert_eq!(out, v2(4.0, 0.0));
        assert_eq!(smoother.len(), 3);
        assert_eq!(smoother.window().next(), Some(&v2(2.0, 0.0)));
    }

    #[test]
    fn test_truth_shock_returns_raw_but_records() {
        let mut smoother = PerceptionSmoother::new(2);
        smoother.perceptual_output(&v2(1.0, 0.0), 1.0, 0.0).unwrap();

        // High distress
        let out = smoother.perceptual_output(&v2(5.0, 0.0), 1.0, 0.85).unwrap();
        assert_eq!(out, v2(5.0, 0.0));

        // Low stability
        let out = smoother.perceptual_output(&v2(3.0, 0.0), 0.3, 0.0).unwrap();
        assert_eq!(out, v2(3.0, 0.0));
        assert_eq!(smoother.len(), 3);

        // Calm again: window now holds [5, 3, 3]
        let out = smoother.perceptual_output(&v2(3.0, 0.0), 1.0, 0.0).unwrap();
        assert_eq!(out, v2(11.0 / 3.0, 0.0));
    }

    #[test]
    fn test_truth_shock_boundaries_are_strict() {
        let smoother = PerceptionSmoother::new(2);
        assert!(!smoother.is_truth_shock(0.4, 0.8));
        assert!(smoother.is_truth_shock(0.39, 0.0));
        assert!(smoother.is_truth_shock(1.0, 0.81));
    }

    #[test]
    fn test_window_of_one_never_averages() {
        let config = PerceptionConfig {
            window_size: 1,
            ..PerceptionConfig::default()
        };
        let mut smoother = PerceptionSmoother::with_config(1, &config).unwrap();

        for x in [1.0, 9.0, 4.0] {
            let raw = Vector::from([x]);
            assert_eq!(smoother.perceptual_output(&raw, 1.0, 0.0).unwrap(), raw);
        }
        assert_eq!(smoother.len(), 1);
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = PerceptionConfig {
            window_size: 0,
            ..PerceptionConfig::default()
        };
        assert!(PerceptionSmoother::with_config(2, &config).is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut smoother = PerceptionSmoother::new(2);
        assert!(smoother
            .perceptual_output(&Vector::from([1.0, 2.0, 3.0]), 1.0, 0.0)
            .is_err());
        assert!(smoother.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut smoother = PerceptionSmoother::new(2);
        smoother.perceptual_output(&v2(1.0, 0.0), 1.0, 0.0).unwrap();
        smoother.clear();
        assert!(smoother.is_empty());
    }

    #[test]
    fn test_rank_labels() {
        assert_eq!(rank_label(0).as_str(), "STABLE");
        assert_eq!(rank_label(2).as_str(), "LOCAL_DRIFT");
        assert_eq!(rank_label(3).as_str(), "IDENTITY_CREEP");
        assert_eq!(rank_label(5).as_str(), "CRITICAL_BREACH");
        assert_eq!(rank_label(1), DriftRank::Anomaly);
        assert_eq!(rank_label(4), DriftRank::Anomaly);
        assert_eq!(rank_label(u32::MAX).to_string(), "ANOMALY");

        let smoother = PerceptionSmoother::new(3);
        assert_eq!(smoother.rank_label(5), DriftRank::CriticalBreach);
    }

    #[test]
    fn test_rank_serialization() {
        let json = serde_json::to_string(&DriftRank::IdentityCreep).unwrap();
        assert_eq!(json, "\"IDENTITY_CREEP\"");
    }
}
