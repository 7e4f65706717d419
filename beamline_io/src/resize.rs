//! Image resizing helpers.
//!
//! Intensity images are resampled as single-channel float buffers with
//! bilinear filtering. Resizing never touches the value scale, so it can run
//! before or after standardization.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use ndarray::{Array2, ArrayView2};

use crate::error::{BeamlineIoError, Result};

/// Resize one intensity image to `(target_height, target_width)` with
/// bilinear filtering.
pub fn resize_bilinear(
    image: ArrayView2<'_, f32>,
    target_height: usize,
    target_width: usize,
) -> Result<Array2<f32>> {
    let (height, width) = image.dim();
    if height == 0 || width == 0 {
        return Err(BeamlineIoError::EmptyInput(format!(
            "cannot resize a {}x{} image",
            height, width
        )));
    }
    if target_height == 0 || target_width == 0 {
        return Err(BeamlineIoError::InvalidConfig {
            message: format!(
                "target shape must be non-zero, got {}x{}",
                target_height, target_width
            ),
        });
    }

    let pixels: Vec<f32> = image.iter().copied().collect();
    let buffer = ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(width as u32, height as u32, pixels)
        .ok_or_else(|| BeamlineIoError::ShapeMismatch {
            expected: vec![height, width],
            got: vec![height * width],
        })?;

    let resized = imageops::resize(
        &buffer,
        target_width as u32,
        target_height as u32,
        FilterType::Triangle,
    );

    Array2::from_shape_vec((target_height, target_width), resized.into_raw()).map_err(|_| {
        BeamlineIoError::ShapeMismatch {
            expected: vec![target_height, target_width],
            got: vec![target_height * target_width],
        }
    })
}

/// Smallest (height, width) across a set of images, computed per axis.
pub fn smallest_image_size(images: &[Array2<f32>]) -> Result<(usize, usize)> {
    if images.is_empty() {
        return Err(BeamlineIoError::EmptyInput(
            "cannot take the smallest size of zero images".into(),
        ));
    }
    let mut height = usize::MAX;
    let mut width = usize::MAX;
    for image in images {
        let (h, w) = image.dim();
        height = height.min(h);
        width = width.min(w);
    }
    Ok((height, width))
}
