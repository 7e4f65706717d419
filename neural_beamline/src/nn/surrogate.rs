//! The composed three-branch surrogate model.

use burn::module::Module;
use burn::prelude::*;

use crate::config::BeamlineSurrogateConfig;
use crate::nn::{IntensityDecoder, IntensityEncoder, ParamEmbedding};

/// Convolutional surrogate predicting a beam-intensity image from the
/// initial intensity and the run's parameter values.
///
/// The encoded image features flatten to one vector per sample, the
/// embedded parameters contribute one extra latent plane, and the merged
/// block decodes back to image resolution.
#[derive(Module, Debug)]
pub struct BeamlineSurrogate<B: Backend> {
    /// Down branch over the initial intensity.
    encoder: IntensityEncoder<B>,
    /// Middle branch over the parameter values.
    embedding: ParamEmbedding<B>,
    /// Up branch producing the prediction.
    decoder: IntensityDecoder<B>,
}

impl<B: Backend> BeamlineSurrogate<B> {
    /// Create a new surrogate from configuration.
    pub fn new(config: &BeamlineSurrogateConfig, device: &B::Device) -> Self {
        Self {
            encoder: IntensityEncoder::new(config, device),
            embedding: ParamEmbedding::new(config, device),
            decoder: IntensityDecoder::new(config, device),
        }
    }

    /// Forward pass.
    ///
    /// Inputs:
    /// - initials: [batch, image_channels, height, width]
    /// - params: [batch, parameter_count]
    ///
    /// Output: predicted intensities of shape [batch, image_channels, height, width]
    pub fn forward(&self, initials: Tensor<B, 4>, params: Tensor<B, 2>) -> Tensor<B, 4> {
        let encoded = self.encoder.forward(initials);
        let [batch, channels, height, width] = encoded.dims();

        let features = encoded.reshape([batch, channels * height * width]);
        let embedded = self.embedding.forward(params);

        let merged = Tensor::cat(vec![features, embedded], 1);
        let latent: Tensor<B, 4> = merged.reshape([batch, channels + 1, height, width]);

        self.decoder.forward(latent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_forward_output_shape() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(3).with_image_size(32);
        let model = BeamlineSurrogate::<TestBackend>::new(&config, &device);

        let initials = Tensor::zeros([2, 1, 32, 32], &device);
        let params = Tensor::zeros([2, 3], &device);
        let prediction = model.forward(initials, params);

        assert_eq!(prediction.dims(), [2, 1, 32, 32]);
    }

    #[test]
    fn test_forward_single_sample() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(2).with_image_size(16);
        let model = BeamlineSurrogate::<TestBackend>::new(&config, &device);

        let initials = Tensor::zeros([1, 1, 16, 16], &device);
        let params = Tensor::zeros([1, 2], &device);

        assert_eq!(model.forward(initials, params).dims(), [1, 1, 16, 16]);
    }

    #[test]
    fn test_forward_values_finite() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(3).with_image_size(16);
        let model = BeamlineSurrogate::<TestBackend>::new(&config, &device);

        let initials = Tensor::random(
            [2, 1, 16, 16],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let params = Tensor::random(
            [2, 3],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );

        let values: Vec<f32> = model.forward(initials, params).to_data().to_vec().unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_parameters_change_prediction() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(3).with_image_size(16);
        let model = BeamlineSurrogate::<TestBackend>::new(&config, &device);

        let initials = Tensor::<TestBackend, 4>::ones([1, 1, 16, 16], &device);
        let params_a = Tensor::<TestBackend, 2>::ones([1, 3], &device);
        let params_b = Tensor::<TestBackend, 2>::ones([1, 3], &device) * 3.0;

        let pred_a = model.forward(initials.clone(), params_a);
        let pred_b = model.forward(initials, params_b);

        let diff: f32 = (pred_a - pred_b).abs().max().into_scalar();
        assert!(diff > 0.0, "parameter branch had no effect on the output");
    }
}
