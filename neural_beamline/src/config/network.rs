//! Neural network configuration types.

use burn::config::Config;

/// Configuration for the convolutional beamline surrogate.
///
/// The defaults reproduce the TES-beamline architecture: three encoder
/// stages at 16/32/64 channels over 128x128 images, a parameter embedding
/// through 8 and 64 hidden units, and a decoder that mirrors the encoder
/// back up to a single-channel image.
#[derive(Config, Debug)]
pub struct BeamlineSurrogateConfig {
    /// Number of scalar beamline parameters fed to the embedding branch.
    pub parameter_count: usize,

    /// Side length of the square input and output images.
    #[config(default = 128)]
    pub image_size: usize,

    /// Channels of the input and output images.
    #[config(default = 1)]
    pub image_channels: usize,

    /// Channel widths of the encoder stages. Each stage applies two 3x3
    /// convolutions; a 2x2 max-pool follows every stage except the last.
    #[config(default = "vec![16, 32, 64]")]
    pub encoder_channels: Vec<usize>,

    /// Hidden widths of the parameter embedding MLP.
    #[config(default = "vec![8, 64]")]
    pub embedding_hidden: Vec<usize>,
}

impl BeamlineSurrogateConfig {
    /// Number of 2x2 pooling steps in the encoder.
    pub fn pool_count(&self) -> usize {
        self.encoder_channels.len().saturating_sub(1)
    }

    /// Side length of the latent feature maps after encoder pooling.
    pub fn latent_size(&self) -> usize {
        self.image_size >> self.pool_count()
    }

    /// Channels of the deepest encoder feature maps.
    pub fn latent_channels(&self) -> usize {
        self.encoder_channels.last().copied().unwrap_or(0)
    }

    /// Output width of the embedding branch: one extra latent plane.
    pub fn embedding_dim(&self) -> usize {
        self.latent_size() * self.latent_size()
    }

    /// Flattened length of the encoder output for one sample.
    pub fn latent_len(&self) -> usize {
        self.latent_channels() * self.embedding_dim()
    }

    /// Channels entering the decoder: encoder features plus the embedded
    /// parameter plane.
    pub fn decoder_input_channels(&self) -> usize {
        self.latent_channels() + 1
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.parameter_count == 0 {
            return Err("parameter_count must be positive".to_string());
        }
        if self.image_channels == 0 {
            return Err("image_channels must be positive".to_string());
        }
        if self.encoder_channels.is_empty() || self.encoder_channels.contains(&0) {
            return Err("encoder_channels must be non-empty and positive".to_string());
        }
        if self.embedding_hidden.contains(&0) {
            return Err("embedding_hidden widths must be positive".to_string());
        }

        let pool_factor = 1usize << self.pool_count();
        if self.image_size == 0 || self.image_size % pool_factor != 0 {
            return Err(format!(
                "image_size {} is not divisible by the pooling factor {}",
                self.image_size, pool_factor
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let config = BeamlineSurrogateConfig::new(3);
        assert_eq!(config.parameter_count, 3);
        assert_eq!(config.encoder_channels, vec![16, 32, 64]);
        assert_eq!(config.embedding_hidden, vec![8, 64]);

        // 128x128 input halves twice: 32x32 latent maps
        assert_eq!(config.pool_count(), 2);
        assert_eq!(config.latent_size(), 32);
        assert_eq!(config.latent_channels(), 64);
        assert_eq!(config.embedding_dim(), 1024);
        assert_eq!(config.latent_len(), 64 * 1024);
        assert_eq!(config.decoder_input_channels(), 65);
    }

    #[test]
    fn test_validate_default() {
        assert!(BeamlineSurrogateConfig::new(3).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_parameters() {
        let config = BeamlineSurrogateConfig::new(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_indivisible_image_size() {
        let config = BeamlineSurrogateConfig::new(3).with_image_size(126);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_smaller_image_size() {
        let config = BeamlineSurrogateConfig::new(2).with_image_size(64);
        assert!(config.validate().is_ok());
        assert_eq!(config.latent_size(), 16);
        assert_eq!(config.embedding_dim(), 256);
    }
}
