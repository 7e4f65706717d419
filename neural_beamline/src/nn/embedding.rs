//! Scalar parameter embedding branch.

use burn::module::Module;
use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;

use crate::config::BeamlineSurrogateConfig;

/// Middle branch of the surrogate: embeds the per-run parameter vector
/// into one latent plane that joins the encoded image features.
///
/// Hidden layers apply ReLU; the output projection is linear so the
/// embedded plane can carry negative values.
#[derive(Module, Debug)]
pub struct ParamEmbedding<B: Backend> {
    /// Hidden layers.
    layers: Vec<Linear<B>>,
    /// Projection to the latent plane.
    output: Linear<B>,
    /// Activation function.
    activation: Relu,
}

impl<B: Backend> ParamEmbedding<B> {
    /// Create a new embedding from configuration.
    pub fn new(config: &BeamlineSurrogateConfig, device: &B::Device) -> Self {
        let mut layers = Vec::new();
        let mut in_dim = config.parameter_count;

        for &out_dim in &config.embedding_hidden {
            layers.push(LinearConfig::new(in_dim, out_dim).init(device));
            in_dim = out_dim;
        }

        let output = LinearConfig::new(in_dim, config.embedding_dim()).init(device);

        Self {
            layers,
            output,
            activation: Relu::new(),
        }
    }

    /// Forward pass.
    ///
    /// Input: parameter values of shape [batch, parameter_count]
    /// Output: latent plane of shape [batch, latent_size * latent_size]
    pub fn forward(&self, params: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = params;
        for layer in &self.layers {
            x = self.activation.forward(layer.forward(x));
        }
        self.output.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_embedding_output_shape() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(3);
        let embedding = ParamEmbedding::<TestBackend>::new(&config, &device);

        // default 128x128 images pool to a 32x32 latent plane
        let params = Tensor::zeros([4, 3], &device);
        assert_eq!(embedding.forward(params).dims(), [4, 1024]);
    }

    #[test]
    fn test_embedding_smaller_image() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(2).with_image_size(64);
        let embedding = ParamEmbedding::<TestBackend>::new(&config, &device);

        let params = Tensor::zeros([2, 2], &device);
        assert_eq!(embedding.forward(params).dims(), [2, 256]);
    }

    #[test]
    fn test_embedding_values_finite() {
        let device = Default::default();
        let config = BeamlineSurrogateConfig::new(3).with_image_size(32);
        let embedding = ParamEmbedding::<TestBackend>::new(&config, &device);

        let params = Tensor::random(
            [4, 3],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let values: Vec<f32> = embedding.forward(params).to_data().to_vec().unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }
}
