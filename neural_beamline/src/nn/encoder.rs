//! Convolutional encoder for intensity images.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{MaxPool2d, MaxPool2dConfig};
use burn::nn::{PaddingConfig2d, Relu};
use burn::prelude::*;

use crate::config::BeamlineSurrogateConfig;

/// Down branch of the surrogate: stacked 3x3 convolutions with 2x2
/// max-pooling between stages.
///
/// Each configured stage applies two same-padding convolutions at one
/// channel width; pooling halves the resolution after every stage except
/// the last. The default stages take a 1x128x128 image to 64x32x32.
#[derive(Module, Debug)]
pub struct IntensityEncoder<B: Backend> {
    /// Two convolutions per stage, in stage order.
    convs: Vec<Conv2d<B>>,
    /// Pooling step between stages.
    pool: MaxPool2d,
    /// Activation function.
    activation: Relu,
}

impl<B: Backend> IntensityEncoder<B> {
    /// Create a new encoder from configuration.
    pub fn new(config: &BeamlineSurrogateConfig, device: &B::Device) -> Self {
        let mut convs = Vec::new();
        let mut in_channels = config.image_channels;

        for &channels in &config.encoder_channels {
            convs.push(conv3x3(in_channels, channels, device));
            convs.push(conv3x3(channels, channels, device));
            in_channels = channels;
        }

        Self {
            convs,
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            activation: Relu::new(),
        }
    }

    /// Forward pass.
    ///
    /// Input: images of shape [batch, channels, height, width]
    /// Output: feature maps of shape [batch, last_stage_channels, height >> pools, width >> pools]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4> {
        let stages = self.convs.len() / 2;
        let mut x = images;

        for (i, pair) in self.convs.chunks(2).enumerate() {
            for conv in pair {
                x = self.activation.forward(conv.forward(x));
            }
            if i + 1 < stages {
                x = self.pool.forward(x);
            }
        }

        x
    }
}

fn conv3x3<B: Backend>(input: usize, output: usize, device: &B::Device) -> Conv2d<B> {
    Conv2dConfig::new([input, output], [3, 3])
        .with_padding(PaddingConfig2d::Explicit(1, 1))
        .init(device)
}
