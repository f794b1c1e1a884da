use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{AssessmentError, AssessmentResult};
use crate::services::geometry::CoordinateScaling;
use crate::services::posture_classifier::ArmSelection;

/// Settings shared by the session accumulator and the report builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: f64,

    #[serde(default)]
    pub arm_selection: ArmSelection,

    /// Give the pose held at stream end one extra frame
    #[serde(default = "default_true")]
    pub session_end_adjustment: bool,

    // Kept last: serializes as a TOML table
    #[serde(default)]
    pub coordinate_scaling: CoordinateScaling,
}

fn default_frames_per_second() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            frames_per_second: default_frames_per_second(),
            arm_selection: ArmSelection::default(),
            session_end_adjustment: default_true(),
            coordinate_scaling: CoordinateScaling::default(),
        }
    }
}

impl AssessmentConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AssessmentConfig =
            toml::from_str(contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Apply POSTURE_RISK_* environment variables on top of this config
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment, test fixtures)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(fps) = lookup("POSTURE_RISK_FPS") {
            self.frames_per_second = fps
                .trim()
                .parse()
                .with_context(|| format!("POSTURE_RISK_FPS is not a number: {}", fps))?;
        }

        if let Some(selection) = lookup("POSTURE_RISK_ARM_SELECTION") {
            self.arm_selection = selection.parse()?;
        }

        if let Some(scaling) = lookup("POSTURE_RISK_SCALING") {
            self.coordinate_scaling = scaling.parse()?;
        }

        Ok(self)
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        if !self.frames_per_second.is_finite() || self.frames_per_second <= 0.0 {
            return Err(AssessmentError::InvalidConfig(format!(
                "frames_per_second must be positive, got {}",
                self.frames_per_second
            )));
        }

        self.coordinate_scaling.validate()
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
