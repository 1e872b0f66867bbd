//! Doctrine configuration
//!
//! Every field has a default matching the canonical lock parameters, so an
//! empty file (or no file at all) yields the standard behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::alignment::validator::Thresholds;
use crate::error::{DoctrineError, Result, ResultExt};

/// Default perception window size
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Distress above which the perception window collapses to one sample
pub const DEFAULT_DISTRESS_THRESHOLD: f64 = 0.8;

/// Context stability below which the perception window collapses
pub const DEFAULT_STABILITY_FLOOR: f64 = 0.4;

/// Distress above which the controller bypasses the lock
pub const DEFAULT_EMERGENCY_THRESHOLD: f64 = 0.9;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctrineConfig {
    /// Lock configuration
    pub gate: GateConfig,

    /// Perception smoother configuration
    pub perception: PerceptionConfig,

    /// Expansion controller configuration
    pub controller: ControllerConfig,
}

impl DoctrineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validator thresholds
    pub fn with_thresholds(mut self, cosine: f64, radial: f64) -> Self {
        self.gate.thresholds = Thresholds { cosine, radial };
        self
    }

    /// Set the history policy
    pub fn with_history(mut self, history: HistoryPolicy) -> Self {
        self.gate.history = history;
        self
    }

    /// Set the perception window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.perception.window_size = window_size;
        self
    }

    /// Set the emergency bypass threshold
    pub fn with_emergency_threshold(mut self, threshold: f64) -> Self {
        self.controller.emergency_threshold = threshold;
        self
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        self.gate.validate()?;
        self.perception.validate()?;
        self.controller.validate()
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a file
    ///
    /// Files ending in `.toml` are read as TOML, anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: Self = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config
            .validate()
            .with_context(|| format!("Rejected configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a file, in the format implied by its extension
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            self.to_toml_string()?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}

fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DoctrineError::InvalidConfig(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}

/// Lock settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Acceptance thresholds
    pub thresholds: Thresholds,

    /// How accepted states are retained
    pub history: HistoryPolicy,
}

impl GateConfig {
    /// Check thresholds and history policy
    pub fn validate(&self) -> Result<()> {
        ensure_finite("gate.thresholds.cosine", self.thresholds.cosine)?;
        ensure_finite("gate.thresholds.radial", self.thresholds.radial)?;

        if let HistoryPolicy::Capped { max_entries: 0 } = self.history {
            return Err(DoctrineError::InvalidConfig(
                "gate.history.max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Retention policy for the accepted-state history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum HistoryPolicy {
    /// Keep every accepted state
    #[default]
    Unbounded,

    /// Keep only the most recent `max_entries` states
    Capped {
        /// Number of states retained, including the current one
        max_entries: usize,
    },
}

/// Perception smoother settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Number of recent candidates averaged for display
    pub window_size: usize,

    /// Distress strictly above this collapses the window
    pub distress_threshold: f64,

    /// Stability strictly below this collapses the window
    pub stability_floor: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            distress_threshold: DEFAULT_DISTRESS_THRESHOLD,
            stability_floor: DEFAULT_STABILITY_FLOOR,
        }
    }
}

impl PerceptionConfig {
    /// Check window size and thresholds
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(DoctrineError::InvalidConfig(
                "perception.window_size must be at least 1".to_string(),
            ));
        }
        ensure_finite("perception.distress_threshold", self.distress_threshold)?;
        ensure_finite("perception.stability_floor", self.stability_floor)
    }
}

/// Expansion controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Distress strictly above this bypasses the lock
    pub emergency_threshold: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            emergency_threshold: DEFAULT_EMERGENCY_THRESHOLD,
        }
    }
}

impl ControllerConfig {
    /// Check the bypass threshold
    pub fn validate(&self) -> Result<()> {
        ensure_finite("controller.emergency_threshold", self.emergency_threshold)
    }
}
