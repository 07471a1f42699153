use std::path::Path;

use serde::Deserialize;

use crate::error::ReconstructError;

/// All pipeline parameters in one struct.
/// Deserializable (for presets loaded from JSON) and overridable
/// field by field from the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // -- Bitmap stage --
    /// Mean-RGB luminance below which a pixel counts as ink (0-255).
    pub threshold: u8,

    // -- Contour stage --
    /// RDP tolerance in pixel units.
    pub rdp_epsilon: f64,
    /// Traced rings with fewer points than this are dropped as noise.
    pub min_ring_points: usize,

    // -- Rasterization --
    /// Canvas edge length in pixels when a request does not name one.
    pub resolution: u32,
    /// Smallest canvas a request may ask for.
    pub min_resolution: u32,
    /// Largest canvas a request may ask for. Memory and tracing cost grow
    /// quadratically with this.
    pub max_resolution: u32,
    /// Font size as a fraction of the canvas edge.
    pub font_size_fraction: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: 128,
            rdp_epsilon: 1.5,
            min_ring_points: 6,
            resolution: 256,
            min_resolution: 32,
            max_resolution: 1024,
            font_size_fraction: 0.8,
        }
    }
}

impl PipelineConfig {
    /// Load a preset from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ReconstructError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReconstructError::Config(format!("{}: {}", path.display(), e)))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .map_err(|e| ReconstructError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no request could satisfy.
    pub fn validate(&self) -> Result<(), ReconstructError> {
        if self.min_resolution == 0 || self.min_resolution > self.max_resolution {
            return Err(ReconstructError::Config(format!(
                "resolution bounds {}..={} are empty",
                self.min_resolution, self.max_resolution
            )));
        }
        if !self.rdp_epsilon.is_finite() || self.rdp_epsilon < 0.0 {
            return Err(ReconstructError::Config(format!(
                "rdp_epsilon must be a non-negative number, got {}",
                self.rdp_epsilon
            )));
        }
        if !(self.font_size_fraction > 0.0 && self.font_size_fraction.is_finite()) {
            return Err(ReconstructError::Config(format!(
                "font_size_fraction must be positive, got {}",
                self.font_size_fraction
            )));
        }
        Ok(())
    }

    /// Clamp a requested canvas size into the configured range.
    pub fn clamp_resolution(&self, requested: i64) -> u32 {
        requested.clamp(self.min_resolution as i64, self.max_resolution as i64) as u32
    }

    /// Clamp a requested threshold into 0-255.
    pub fn clamp_threshold(requested: i64) -> u8 {
        requested.clamp(0, 255) as u8
    }
}
