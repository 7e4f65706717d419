//! The preprocessing pipeline for raw beamline simulation results.
//!
//! The pipeline turns a raw results file plus an initial-intensity CSV into
//! the fixed-shape training input:
//!
//! 1. crop every image to its central third along both axes,
//! 2. log-transform with a small additive epsilon,
//! 3. standardize over the full cropped stack (zero mean, unit variance),
//! 4. reject samples whose per-image standard deviation sits at or below a
//!    near-zero threshold,
//! 5. resize accepted images and the initial intensity to the target shape,
//! 6. standardize the parameter-value matrix globally and keep the accepted
//!    rows.
//!
//! Rejections are logged and returned in a [`SampleSelection`] so the
//! decision is recorded, not just printed.

use ndarray::parallel::prelude::*;
use ndarray::{s, Array, Array2, Array3, ArrayView2, Axis, Dimension};

use crate::config::PreprocessConfig;
use crate::csv_import::read_intensity_csv;
use crate::error::{BeamlineIoError, Result};
use crate::format::{PreprocessedBeamData, RawResults};
use crate::resize::resize_bilinear;

/// Half-open crop window shared by every image in a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// First kept row.
    pub row_start: usize,
    /// One past the last kept row.
    pub row_end: usize,
    /// First kept column.
    pub col_start: usize,
    /// One past the last kept column.
    pub col_end: usize,
}

impl CropWindow {
    /// Central window dropping `1/divisor` of each axis from both ends.
    ///
    /// Divisor 3 keeps rows `[h/3, h - h/3)` and columns likewise, the
    /// central third.
    pub fn central(height: usize, width: usize, divisor: usize) -> Result<Self> {
        if divisor == 0 {
            return Err(BeamlineIoError::InvalidConfig {
                message: "crop divisor must be non-zero".into(),
            });
        }
        let window = Self {
            row_start: height / divisor,
            row_end: height - height / divisor,
            col_start: width / divisor,
            col_end: width - width / divisor,
        };
        if window.row_start >= window.row_end || window.col_start >= window.col_end {
            return Err(BeamlineIoError::EmptyInput(format!(
                "central crop window of {}x{} with divisor {} is empty",
                height, width, divisor
            )));
        }
        Ok(window)
    }

    /// Number of kept rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.row_end - self.row_start
    }

    /// Number of kept columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.col_end - self.col_start
    }
}

/// Crop every image in the stack to the window.
pub fn crop_stack(stack: &Array3<f32>, window: CropWindow) -> Array3<f32> {
    stack
        .slice(s![
            ..,
            window.row_start..window.row_end,
            window.col_start..window.col_end
        ])
        .to_owned()
}

/// Crop a single image to the window.
pub fn crop_image(image: ArrayView2<'_, f32>, window: CropWindow) -> Array2<f32> {
    image
        .slice(s![
            window.row_start..window.row_end,
            window.col_start..window.col_end
        ])
        .to_owned()
}

/// Natural log of `value + epsilon`, applied elementwise in place.
pub fn log_transform<D: Dimension>(values: &mut Array<f32, D>, epsilon: f32) {
    values.mapv_inplace(|v| (v + epsilon).ln());
}

/// Standardize in place to zero mean and unit variance over all elements.
///
/// Returns the (mean, std) that were removed. Uses the population standard
/// deviation (ddof 0).
pub fn standardize<D: Dimension>(values: &mut Array<f32, D>) -> Result<(f32, f32)> {
    let mean = values.mean().ok_or_else(|| {
        BeamlineIoError::EmptyInput("cannot standardize an empty array".into())
    })?;
    let std = values.std(0.0);
    if std == 0.0 {
        return Err(BeamlineIoError::Degenerate(
            "cannot standardize constant data (zero variance)".into(),
        ));
    }
    values.mapv_inplace(|v| (v - mean) / std);
    Ok((mean, std))
}

/// Epsilon added to the initial intensity before its log transform.
///
/// Strictly positive data needs no shift, data touching zero gets the
/// configured epsilon, and negative data is first shifted fully above zero.
pub fn initial_intensity_epsilon(min_value: f32, epsilon: f32) -> f32 {
    if min_value > 0.0 {
        0.0
    } else if min_value == 0.0 {
        epsilon
    } else {
        epsilon + min_value.abs()
    }
}

/// Accept/reject partition of an image stack, by stack index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSelection {
    /// Indices of samples kept for training, ascending.
    pub accepted: Vec<usize>,
    /// Indices of rejected samples, ascending.
    pub rejected: Vec<usize>,
}

impl SampleSelection {
    /// Number of accepted samples.
    #[inline]
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Number of rejected samples.
    #[inline]
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Total number of samples that were examined.
    #[inline]
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    /// Copy the accepted rows of a matrix, in accepted order.
    pub fn filter_rows(&self, values: &Array2<f32>) -> Array2<f32> {
        let cols = values.dim().1;
        let mut filtered = Array2::zeros((self.accepted.len(), cols));
        for (k, &i) in self.accepted.iter().enumerate() {
            filtered.row_mut(k).assign(&values.row(i));
        }
        filtered
    }
}

/// Partition samples by per-image standard deviation.
///
/// A sample is accepted only when its std lies strictly above the threshold;
/// every rejection is logged with its index and std.
pub fn select_by_std(stack: &Array3<f32>, threshold: f32) -> SampleSelection {
    let stds: Vec<f32> = stack
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|image| image.std(0.0))
        .collect();

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for (i, &std) in stds.iter().enumerate() {
        if threshold < std {
            accepted.push(i);
        } else {
            log::warn!("rejecting image {} with std {:.3e}", i, std);
            rejected.push(i);
        }
    }
    SampleSelection { accepted, rejected }
}

/// Run the preprocessing pipeline over in-memory raw data.
///
/// Consumes the initial-intensity image as read from its CSV export and
/// returns the preprocessed arrays together with the accept/reject record.
pub fn preprocess(
    raw: &RawResults,
    mut initial_intensity: Array2<f32>,
    config: PreprocessConfig,
) -> Result<(PreprocessedBeamData, SampleSelection)> {
    config.validate()?;
    raw.validate()?;

    let (height, width) = raw.image_shape();
    let (target_height, target_width) = config.target_shape();
    let window = CropWindow::central(height, width, config.crop_divisor)?;
    log::info!(
        "preprocessing {} simulations: {}x{} images cropped to {}x{}, resized to {}x{}",
        raw.simulation_count(),
        height,
        width,
        window.height(),
        window.width(),
        target_height,
        target_width,
    );

    let mut stack = crop_stack(&raw.beam_intensities, window);
    log_transform(&mut stack, config.log_epsilon);
    standardize(&mut stack)?;

    let selection = select_by_std(&stack, config.std_threshold);
    if selection.accepted.is_empty() {
        return Err(BeamlineIoError::EmptyInput(format!(
            "all {} samples were rejected by the std threshold {:.1e}",
            selection.total(),
            config.std_threshold
        )));
    }

    let resized: Vec<Array2<f32>> = selection
        .accepted
        .par_iter()
        .map(|&i| resize_bilinear(stack.index_axis(Axis(0), i), target_height, target_width))
        .collect::<Result<Vec<_>>>()?;

    let mut beam_intensities = Array3::zeros((resized.len(), target_height, target_width));
    for (k, image) in resized.iter().enumerate() {
        beam_intensities.index_axis_mut(Axis(0), k).assign(image);
    }

    let min_initial = initial_intensity
        .iter()
        .cloned()
        .fold(f32::INFINITY, f32::min);
    if !min_initial.is_finite() {
        return Err(BeamlineIoError::EmptyInput(
            "initial intensity holds no finite values".into(),
        ));
    }
    let shift = initial_intensity_epsilon(min_initial, config.log_epsilon);
    log_transform(&mut initial_intensity, shift);
    standardize(&mut initial_intensity)?;
    let initial_resized =
        resize_bilinear(initial_intensity.view(), target_height, target_width)?;

    let mut param_vals = raw.param_vals.clone();
    standardize(&mut param_vals)?;
    let param_vals = selection.filter_rows(&param_vals);

    let data = PreprocessedBeamData::new(
        initial_resized,
        raw.params.clone(),
        beam_intensities,
        param_vals,
    )?;

    log::info!(
        "accepted {} of {} samples ({} rejected)",
        selection.accepted_count(),
        selection.total(),
        selection.rejected_count(),
    );

    Ok((data, selection))
}

/// Run the full preprocessing pipeline between files.
///
/// Reads the raw results file and the initial-intensity CSV, writes the
/// preprocessed results file, and returns the in-memory output.
pub fn preprocess_files<P, Q, R>(
    results_path: P,
    initial_csv_path: Q,
    output_path: R,
    config: PreprocessConfig,
) -> Result<(PreprocessedBeamData, SampleSelection)>
where
    P: AsRef<std::path::Path>,
    Q: AsRef<std::path::Path>,
    R: AsRef<std::path::Path>,
{
    let raw = RawResults::read_from(results_path)?;
    let initial_intensity = read_intensity_csv(initial_csv_path)?;
    let (data, selection) = preprocess(&raw, initial_intensity, config)?;
    data.write_to(output_path)?;
    Ok((data, selection))
}
