// THEORY:
// `RunParameters` is the full set of knobs a caller can turn. Three of them shape
// the clustering (`step`, `iterations`, `color_weight`); the fourth (`block_size`)
// only shapes the rendering. Keeping that split explicit is what lets the
// pixelator re-render without re-clustering.

use crate::error::{PixelateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one pixelation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParameters {
    /// Seed grid spacing and half-width of each center's search window, in pixels.
    pub step: usize,
    /// Number of assign/update rounds. Zero leaves every pixel unassigned.
    pub iterations: usize,
    /// Edge length of a rendered tile, in pixels.
    pub block_size: usize,
    /// Divides the color term of the distance. Larger values give more compact,
    /// grid-like superpixels; smaller values let color edges dominate.
    pub color_weight: f64,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            step: 16,
            iterations: 10,
            block_size: 8,
            color_weight: 10.0,
        }
    }
}

impl RunParameters {
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(PixelateError::InvalidConfig("step must be at least 1".to_string()));
        }
        if self.block_size == 0 {
            return Err(PixelateError::InvalidConfig(
                "block_size must be at least 1".to_string(),
            ));
        }
        if !self.color_weight.is_finite() || self.color_weight <= 0.0 {
            return Err(PixelateError::InvalidConfig(format!(
                "color_weight must be a positive finite number, got {}",
                self.color_weight
            )));
        }
        Ok(())
    }

    /// True when going from `self` to `other` requires a new clustering run.
    pub fn requires_reclustering(&self, other: &RunParameters) -> bool {
        self.step != other.step
            || self.iterations != other.iterations
            || self.color_weight != other.color_weight
    }

    /// Reads parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: RunParameters = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RunParameters::default().validate().expect("defaults validate");
    }

    #[test]
    fn rejects_degenerate_values() {
        let bad = [
            RunParameters { step: 0, ..Default::default() },
            RunParameters { block_size: 0, ..Default::default() },
            RunParameters { color_weight: 0.0, ..Default::default() },
            RunParameters { color_weight: -3.0, ..Default::default() },
            RunParameters { color_weight: f64::NAN, ..Default::default() },
        ];
        for params in bad {
            assert!(
                matches!(params.validate(), Err(PixelateError::InvalidConfig(_))),
                "{params:?}"
            );
        }
    }

    #[test]
    fn block_size_alone_does_not_require_reclustering() {
        let base = RunParameters::default();
        let resized = RunParameters { block_size: 3, ..base };
        let restepped = RunParameters { step: 5, ..base };

        assert!(!base.requires_reclustering(&resized));
        assert!(base.requires_reclustering(&restepped));
        assert!(base.requires_reclustering(&RunParameters { iterations: 1, ..base }));
        assert!(base.requires_reclustering(&RunParameters { color_weight: 40.0, ..base }));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let params: RunParameters = serde_json::from_str(r#"{ "step": 5, "color_weight": 2.5 }"#).expect("valid json");
        assert_eq!(params.step, 5);
        assert_eq!(params.color_weight, 2.5);
        assert_eq!(params.iterations, RunParameters::default().iterations);
    }
}
