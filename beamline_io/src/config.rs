//! Preprocessing configuration types.

use crate::error::{BeamlineIoError, Result};

/// Preprocessing parameters (immutable after construction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessConfig {
    /// Crop divisor: each axis keeps the central `1 - 2/divisor` span,
    /// so 3 keeps the central third.
    pub crop_divisor: usize,
    /// Additive epsilon applied before log transforms.
    pub log_epsilon: f32,
    /// Per-image standard deviation at or below which a sample is rejected.
    pub std_threshold: f32,
    /// Image height after resizing.
    pub target_height: usize,
    /// Image width after resizing.
    pub target_width: usize,
}

impl PreprocessConfig {
    /// Create a new preprocessing configuration.
    #[inline]
    pub const fn new(
        crop_divisor: usize,
        log_epsilon: f32,
        std_threshold: f32,
        target_height: usize,
        target_width: usize,
    ) -> Self {
        Self {
            crop_divisor,
            log_epsilon,
            std_threshold,
            target_height,
            target_width,
        }
    }

    /// Target (height, width) of every output image.
    #[inline]
    pub const fn target_shape(&self) -> (usize, usize) {
        (self.target_height, self.target_width)
    }

    /// Check the configuration for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.crop_divisor < 3 {
            return Err(BeamlineIoError::InvalidConfig {
                message: format!(
                    "crop divisor must be at least 3, got {}",
                    self.crop_divisor
                ),
            });
        }
        if !(self.log_epsilon > 0.0) {
            return Err(BeamlineIoError::InvalidConfig {
                message: format!("log epsilon must be positive, got {}", self.log_epsilon),
            });
        }
        if !(self.std_threshold >= 0.0) {
            return Err(BeamlineIoError::InvalidConfig {
                message: format!(
                    "std threshold must be non-negative, got {}",
                    self.std_threshold
                ),
            });
        }
        if self.target_height == 0 || self.target_width == 0 {
            return Err(BeamlineIoError::InvalidConfig {
                message: format!(
                    "target shape must be non-zero, got {}x{}",
                    self.target_height, self.target_width
                ),
            });
        }
        Ok(())
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            crop_divisor: 3,
            log_epsilon: 1e-10,
            std_threshold: 1e-10,
            target_height: 128,
            target_width: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreprocessConfig::default();
        assert_eq!(config.crop_divisor, 3);
        assert_eq!(config.target_shape(), (128, 128));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PreprocessConfig::default();
        config.crop_divisor = 2;
        assert!(config.validate().is_err());

        let mut config = PreprocessConfig::default();
        config.log_epsilon = 0.0;
        assert!(config.validate().is_err());

        let mut config = PreprocessConfig::default();
        config.std_threshold = -1.0;
        assert!(config.validate().is_err());

        let mut config = PreprocessConfig::default();
        config.target_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_epsilon_rejected() {
        let mut config = PreprocessConfig::default();
        config.log_epsilon = f32::NAN;
        assert!(config.validate().is_err());
    }
}
