//! Per-epoch metrics and the cropped-region loss.

use burn::nn::loss::{MseLoss, Reduction};
use burn::prelude::*;

/// Fraction of each image border stripped by the cropped-region loss.
///
/// Matches the central-third window used during preprocessing.
const CROP_DIVISOR: usize = 3;

/// Aggregated losses of one training epoch.
///
/// Losses are summed over batches, not averaged, so the values scale
/// with the number of batches per pass.
#[derive(Debug, Clone, Default)]
pub struct EpochMetrics {
    /// Epoch index, starting at zero.
    pub epoch: usize,
    /// Training loss summed over all training batches.
    pub training_loss: f32,
    /// Test loss summed over all evaluation batches.
    pub testing_loss: f32,
    /// Cropped-region loss summed over all evaluation batches.
    pub crop_loss: f32,
}

impl EpochMetrics {
    /// Create metrics for a single epoch.
    pub fn new(epoch: usize, training_loss: f32, testing_loss: f32, crop_loss: f32) -> Self {
        Self {
            epoch,
            training_loss,
            testing_loss,
            crop_loss,
        }
    }

    /// Log the epoch summary at info level.
    pub fn log(&self) {
        log::info!(
            "Epoch: {}, Training Loss: {:.5}, Test Loss: {:.5}",
            self.epoch,
            self.training_loss,
            self.testing_loss,
        );
    }
}

/// Strip `1/divisor` of the image from each border of a `[batch, channel, height, width]` stack.
///
/// A dimension too small to lose a full margin (`extent / divisor == 0`)
/// is kept whole.
pub fn central_crop<B: Backend>(images: Tensor<B, 4>, divisor: usize) -> Tensor<B, 4> {
    let [batch, channels, height, width] = images.dims();
    let row_margin = height / divisor;
    let col_margin = width / divisor;

    images.slice([
        0..batch,
        0..channels,
        row_margin..height - row_margin,
        col_margin..width - col_margin,
    ])
}

/// Mean squared error restricted to the central third of each image.
///
/// Predictions tend to be weakest at the borders, where the beam carries
/// little intensity; this metric tracks fit over the beam core alone.
pub fn central_crop_mse<B: Backend>(prediction: Tensor<B, 4>, target: Tensor<B, 4>) -> Tensor<B, 1> {
    let prediction = central_crop(prediction, CROP_DIVISOR);
    let target = central_crop(target, CROP_DIVISOR);

    MseLoss::new().forward(prediction, target, Reduction::Mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn filled(value: f32, shape: [usize; 4], device: &NdArrayDevice) -> Tensor<TestBackend, 4> {
        Tensor::ones(shape, device) * value
    }

    #[test]
    fn test_central_crop_keeps_middle_third() {
        let device = NdArrayDevice::Cpu;
        let images = Tensor::<TestBackend, 4>::zeros([2, 1, 9, 12], &device);

        let cropped = central_crop(images, 3);

        // rows 3..6, cols 4..8
        assert_eq!(cropped.dims(), [2, 1, 3, 4]);
    }

    #[test]
    fn test_central_crop_small_dimension_kept_whole() {
        let device = NdArrayDevice::Cpu;
        let images = Tensor::<TestBackend, 4>::zeros([1, 1, 2, 9], &device);

        let cropped = central_crop(images, 3);

        assert_eq!(cropped.dims(), [1, 1, 2, 3]);
    }

    #[test]
    fn test_crop_mse_zero_for_identical_images() {
        let device = NdArrayDevice::Cpu;
        let prediction = filled(0.7, [2, 1, 9, 9], &device);
        let target = filled(0.7, [2, 1, 9, 9], &device);

        let loss: f32 = central_crop_mse(prediction, target).into_scalar();

        assert!(loss.abs() < 1e-7);
    }

    #[test]
    fn test_crop_mse_ignores_border_error() {
        let device = NdArrayDevice::Cpu;
        let target = Tensor::<TestBackend, 4>::zeros([1, 1, 9, 9], &device);

        // Perturb a single corner pixel, outside rows/cols 3..6.
        let corner = Tensor::<TestBackend, 4>::ones([1, 1, 1, 1], &device) * 5.0;
        let prediction = target.clone().slice_assign([0..1, 0..1, 0..1, 0..1], corner);

        let full: f32 = MseLoss::new()
            .forward(prediction.clone(), target.clone(), Reduction::Mean)
            .into_scalar();
        let cropped: f32 = central_crop_mse(prediction, target).into_scalar();

        assert!(full > 0.0);
        assert!(cropped.abs() < 1e-7);
    }

    #[test]
    fn test_crop_mse_counts_center_error() {
        let device = NdArrayDevice::Cpu;
        let target = Tensor::<TestBackend, 4>::zeros([1, 1, 9, 9], &device);

        // Perturb the middle pixel, inside the central third.
        let center = Tensor::<TestBackend, 4>::ones([1, 1, 1, 1], &device) * 3.0;
        let prediction = target.clone().slice_assign([0..1, 0..1, 4..5, 4..5], center);

        let cropped: f32 = central_crop_mse(prediction, target).into_scalar();

        // One pixel off by 3.0 over a 3x3 window.
        assert!((cropped - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_epoch_metrics_fields() {
        let metrics = EpochMetrics::new(4, 1.5, 0.75, 0.25);

        assert_eq!(metrics.epoch, 4);
        assert!((metrics.training_loss - 1.5).abs() < f32::EPSILON);
        assert!((metrics.testing_loss - 0.75).abs() < f32::EPSILON);
        assert!((metrics.crop_loss - 0.25).abs() < f32::EPSILON);
    }
}
