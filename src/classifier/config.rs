//! Configuration for the hybrid classifier.

use serde::{Deserialize, Serialize};

use crate::classifier::calibration::Calibration;
use crate::error::{Result, VitrineError};

/// Configuration for blending keyword and semantic scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Blend weight α of the keyword score (0.0-1.0); the semantic score gets 1 - α.
    pub keyword_weight: f32,
    /// Secondary categories need at least this fraction of the primary's score.
    pub secondary_relative_threshold: f32,
    /// Secondary categories need at least this absolute score.
    pub secondary_absolute_floor: f32,
    /// Maximum number of secondary categories, unlimited when `None`.
    pub max_secondary: Option<usize>,
    /// Optional calibration curve applied to the primary's combined score.
    pub calibration: Option<Calibration>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keyword_weight: 0.65,
            secondary_relative_threshold: 0.5,
            secondary_absolute_floor: 0.3,
            max_secondary: None,
            calibration: None,
        }
    }
}

impl ClassifierConfig {
    /// Check that weights and thresholds are within [0, 1].
    pub fn validate(&self) -> Result<()> {
        let bounded = [
            ("keyword_weight", self.keyword_weight),
            (
                "secondary_relative_threshold",
                self.secondary_relative_threshold,
            ),
            ("secondary_absolute_floor", self.secondary_absolute_floor),
        ];
        for (name, value) in bounded {
            if !(0.0..=1.0).contains(&value) {
                return Err(VitrineError::config(
                    "classifier",
                    format!("{name} must be within [0, 1], got {value}"),
                ));
            }
        }
        if let Some(calibration) = &self.calibration {
            calibration.validate()?;
        }
        Ok(())
    }

    /// Score a secondary category must reach given the primary's score.
    ///
    /// A primary scoring 0 admits no secondaries.
    pub fn secondary_threshold(&self, primary: f32) -> f32 {
        (self.secondary_relative_threshold * primary).max(self.secondary_absolute_floor)
    }
}
