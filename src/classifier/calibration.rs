//! Piecewise-linear confidence calibration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VitrineError};

/// Monotone curve mapping raw confidence to calibrated confidence.
///
/// Points are `(raw, calibrated)` pairs sorted by `raw`, both in [0, 1].
/// Values outside the covered range take the nearest end point.
///
/// ```
/// use vitrine::classifier::Calibration;
///
/// let curve = Calibration::new(vec![(0.0, 0.0), (0.5, 0.8), (1.0, 1.0)]).unwrap();
/// assert!((curve.apply(0.25) - 0.4).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f32, f32)>", into = "Vec<(f32, f32)>")]
pub struct Calibration {
    points: Vec<(f32, f32)>,
}

impl Calibration {
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self> {
        let calibration = Self { points };
        calibration.validate()?;
        Ok(calibration)
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Check the curve is non-empty, within [0, 1] and monotone.
    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(VitrineError::config(
                "calibration",
                "calibration curve has no points",
            ));
        }
        for &(raw, calibrated) in &self.points {
            if !(0.0..=1.0).contains(&raw) || !(0.0..=1.0).contains(&calibrated) {
                return Err(VitrineError::config(
                    "calibration",
                    format!("point ({raw}, {calibrated}) is outside [0, 1]"),
                ));
            }
        }
        for pair in self.points.windows(2) {
            let ((r0, c0), (r1, c1)) = (pair[0], pair[1]);
            if r1 <= r0 || c1 < c0 {
                return Err(VitrineError::config(
                    "calibration",
                    format!("points ({r0}, {c0}) and ({r1}, {c1}) are not increasing"),
                ));
            }
        }
        Ok(())
    }

    /// Calibrate a raw confidence.
    pub fn apply(&self, raw: f32) -> f32 {
        let Some(&(first_raw, first_cal)) = self.points.first() else {
            return raw;
        };
        if raw <= first_raw {
            return first_cal;
        }
        for pair in self.points.windows(2) {
            let ((r0, c0), (r1, c1)) = (pair[0], pair[1]);
            if raw <= r1 {
                let t = (raw - r0) / (r1 - r0);
                return c0 + t * (c1 - c0);
            }
        }
        self.points.last().map(|&(_, c)| c).unwrap_or(raw)
    }
}

impl TryFrom<Vec<(f32, f32)>> for Calibration {
    type Error = VitrineError;

    fn try_from(points: Vec<(f32, f32)>) -> Result<Self> {
        Calibration::new(points)
    }
}

impl From<Calibration> for Vec<(f32, f32)> {
    fn from(calibration: Calibration) -> Self {
        calibration.points
    }
}
