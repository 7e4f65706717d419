//! Training configuration types.

use burn::config::Config;

use super::BeamlineSurrogateConfig;

/// Configuration for the surrogate trainer.
#[derive(Config, Debug)]
pub struct TrainingConfig {
    /// Model configuration.
    pub model: BeamlineSurrogateConfig,

    /// Number of training epochs.
    #[config(default = 10)]
    pub epochs: usize,

    /// Batch size shared by the training and test partitions.
    #[config(default = 50)]
    pub batch_size: usize,

    /// Adam learning rate.
    #[config(default = 1e-3)]
    pub learning_rate: f64,

    /// Epoch interval between progress log lines.
    #[config(default = 100)]
    pub log_interval: usize,

    /// Seed for the per-epoch training batch shuffle.
    #[config(default = 42)]
    pub seed: u64,
}

impl TrainingConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.model.validate()?;

        if self.epochs == 0 {
            return Err("epochs must be positive".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be positive".to_string());
        }
        if self.learning_rate <= 0.0 {
            return Err("learning_rate must be positive".to_string());
        }
        if self.log_interval == 0 {
            return Err("log_interval must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_training_config() {
        let config = TrainingConfig::new(BeamlineSurrogateConfig::new(3));
        assert!(config.validate().is_ok());
        assert_eq!(config.epochs, 10);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.learning_rate, 1e-3);
        assert_eq!(config.log_interval, 100);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainingConfig::new(BeamlineSurrogateConfig::new(3))
            .with_epochs(1000)
            .with_learning_rate(0.01);

        assert_eq!(config.epochs, 1000);
        assert_eq!(config.learning_rate, 0.01);
    }

    #[test]
    fn test_validate_rejects_zero_epochs() {
        let config = TrainingConfig::new(BeamlineSurrogateConfig::new(3)).with_epochs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_learning_rate() {
        let config = TrainingConfig::new(BeamlineSurrogateConfig::new(3)).with_learning_rate(0.0);
        assert!(config.validate().is_err());
    }
}
