//! Convolutional decoder producing the predicted intensity image.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig, ConvTranspose2d, ConvTranspose2dConfig};
use burn::nn::{PaddingConfig2d, Relu};
use burn::prelude::*;

use crate::config::BeamlineSurrogateConfig;

/// Up branch of the surrogate: stride-2 transposed convolutions doubling
/// the resolution, each followed by a refining 3x3 convolution.
///
/// Channel widths mirror the encoder stages in reverse; the last
/// refinement maps down to the image channel count, and a final 3x3
/// convolution without activation produces the output, so predictions are
/// not clamped to non-negative values.
#[derive(Module, Debug)]
pub struct IntensityDecoder<B: Backend> {
    /// 2x2 stride-2 transposed convolutions, one per upsampling step.
    upsamples: Vec<ConvTranspose2d<B>>,
    /// 3x3 refinement convolution after each upsampling step.
    refines: Vec<Conv2d<B>>,
    /// Output head without activation.
    head: Conv2d<B>,
    /// Activation function.
    activation: Relu,
}

impl<B: Backend> IntensityDecoder<B> {
    /// Create a new decoder from configuration.
    pub fn new(config: &BeamlineSurrogateConfig, device: &B::Device) -> Self {
        // one upsampling step per encoder pool, channel widths reversed
        let steps: Vec<usize> = config.encoder_channels[..config.pool_count()]
            .iter()
            .rev()
            .copied()
            .collect();

        let mut upsamples = Vec::new();
        let mut refines = Vec::new();
        let mut channels = config.decoder_input_channels();

        for (i, &width) in steps.iter().enumerate() {
            upsamples.push(
                ConvTranspose2dConfig::new([channels, width], [2, 2])
                    .with_stride([2, 2])
                    .init(device),
            );
            let refined = if i + 1 < steps.len() {
                width
            } else {
                config.image_channels
            };
            refines.push(conv3x3(width, refined, device));
            channels = refined;
        }

        Self {
            upsamples,
            refines,
            head: conv3x3(channels, config.image_channels, device),
            activation: Relu::new(),
        }
    }

    /// Forward pass.
    ///
    /// Input: latent maps of shape [batch, latent_channels + 1, latent, latent]
    /// Output: images of shape [batch, image_channels, height, width]
    pub fn forward(&self, latent: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = latent;
        for (up, refine) in self.upsamples.iter().zip(&self.refines) {
            x = self.activation.forward(up.forward(x));
            x = self.activation.forward(refine.forward(x));
        }
        self.head.forward(x)
    }
}

fn conv3x3<B: Backend>(input: usize, output: usize, device: &B::Device) -> Conv2d<B> {
    Conv2dConfig::new([input, output], [3, 3])
        .with_padding(PaddingConfig2d::Explicit(1, 1))
        .init(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_decoder_output_shape() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(3).with_image_size(32);
        let decoder = IntensityDecoder::<TestBackend>::new(&config, &device);

        // default stages decode a 65x8x8 latent block back to 1x32x32
        let latent = Tensor::zeros([2, 65, 8, 8], &device);
        assert_eq!(decoder.forward(latent).dims(), [2, 1, 32, 32]);
    }

    #[test]
    fn test_decoder_allows_negative_output() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(3).with_image_size(16);
        let decoder = IntensityDecoder::<TestBackend>::new(&config, &device);

        let latent = Tensor::random(
            [4, 65, 4, 4],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let values: Vec<f32> = decoder.forward(latent).to_data().to_vec().unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
        // the head carries no activation, so some output is negative in
        // practice for random weights and inputs
        assert_eq!(values.len(), 4 * 16 * 16);
    }
}
