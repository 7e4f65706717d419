//! Preprocessed results file layout.
//!
//! The preprocessing pipeline writes this file once; training treats it as
//! immutable input. Four datasets, all float32:
//!
//! ```text
//! preprocessed_initial_beam_intensity  (height, width)
//! params                               (parameter_count,)
//! preprocessed_beam_intensities        (n_accepted, height, width)
//! preprocessed_param_vals              (n_accepted, parameter_count)
//! ```
//!
//! Row `i` of the image stack and row `i` of the parameter values belong to
//! the same accepted simulation run; rejected runs appear in neither.

use std::path::Path;

use ndarray::{Array1, Array2, Array3, Ix1, Ix2, Ix3};

use crate::error::{BeamlineIoError, Result};
use crate::format::{open_dataset, read_f32_dyn, PARAMS_DATASET};

/// Name of the resized initial-intensity dataset.
pub const PREPROCESSED_INITIAL_DATASET: &str = "preprocessed_initial_beam_intensity";
/// Name of the preprocessed image stack dataset.
pub const PREPROCESSED_INTENSITIES_DATASET: &str = "preprocessed_beam_intensities";
/// Name of the filtered, standardized parameter value dataset.
pub const PREPROCESSED_PARAM_VALS_DATASET: &str = "preprocessed_param_vals";

/// In-memory contents of a preprocessed results file.
#[derive(Debug, Clone)]
pub struct PreprocessedBeamData {
    /// Resized, standardized initial intensity shared by every run.
    pub initial_intensity: Array2<f32>,
    /// Parameter descriptions copied from the raw file.
    pub params: Array1<f32>,
    /// Preprocessed beam intensities, accepted runs only.
    pub beam_intensities: Array3<f32>,
    /// Standardized parameter values, accepted runs only.
    pub param_vals: Array2<f32>,
}

impl PreprocessedBeamData {
    /// Bundle preprocessed arrays, validating their alignment.
    pub fn new(
        initial_intensity: Array2<f32>,
        params: Array1<f32>,
        beam_intensities: Array3<f32>,
        param_vals: Array2<f32>,
    ) -> Result<Self> {
        let data = Self {
            initial_intensity,
            params,
            beam_intensities,
            param_vals,
        };
        data.validate()?;
        Ok(data)
    }

    /// Number of accepted simulation runs.
    #[inline]
    pub fn accepted_count(&self) -> usize {
        self.beam_intensities.dim().0
    }

    /// Number of beamline parameters.
    #[inline]
    pub fn parameter_count(&self) -> usize {
        self.params.len()
    }

    /// (height, width) shared by the initial intensity and every image.
    #[inline]
    pub fn image_shape(&self) -> (usize, usize) {
        self.initial_intensity.dim()
    }

    /// Check alignment between images, parameter values, and the initial
    /// intensity.
    pub fn validate(&self) -> Result<()> {
        let (n, h, w) = self.beam_intensities.dim();
        if n == 0 {
            return Err(BeamlineIoError::EmptyInput(
                "no accepted beam intensities".into(),
            ));
        }
        let (ih, iw) = self.initial_intensity.dim();
        if (ih, iw) != (h, w) {
            return Err(BeamlineIoError::ShapeMismatch {
                expected: vec![h, w],
                got: vec![ih, iw],
            });
        }
        let (rows, cols) = self.param_vals.dim();
        if rows != n || cols != self.params.len() {
            return Err(BeamlineIoError::ShapeMismatch {
                expected: vec![n, self.params.len()],
                got: vec![rows, cols],
            });
        }
        Ok(())
    }

    /// Read a preprocessed results file.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = hdf5::File::open(path)?;

        let initial_ds = open_dataset(&file, PREPROCESSED_INITIAL_DATASET)?;
        let initial = read_f32_dyn(&initial_ds, PREPROCESSED_INITIAL_DATASET)?;
        let got = initial.shape().to_vec();
        let initial_intensity = initial
            .into_dimensionality::<Ix2>()
            .map_err(|_| BeamlineIoError::ShapeMismatch {
                expected: vec![2],
                got,
            })?;

        let params_ds = open_dataset(&file, PARAMS_DATASET)?;
        let params = read_f32_dyn(&params_ds, PARAMS_DATASET)?;
        let got = params.shape().to_vec();
        let params = params
            .into_dimensionality::<Ix1>()
            .map_err(|_| BeamlineIoError::ShapeMismatch {
                expected: vec![1],
                got,
            })?;

        let intensities_ds = open_dataset(&file, PREPROCESSED_INTENSITIES_DATASET)?;
        let intensities = read_f32_dyn(&intensities_ds, PREPROCESSED_INTENSITIES_DATASET)?;
        let got = intensities.shape().to_vec();
        let beam_intensities = intensities
            .into_dimensionality::<Ix3>()
            .map_err(|_| BeamlineIoError::ShapeMismatch {
                expected: vec![3],
                got,
            })?;

        let vals_ds = open_dataset(&file, PREPROCESSED_PARAM_VALS_DATASET)?;
        let vals = read_f32_dyn(&vals_ds, PREPROCESSED_PARAM_VALS_DATASET)?;
        let got = vals.shape().to_vec();
        let param_vals = vals
            .into_dimensionality::<Ix2>()
            .map_err(|_| BeamlineIoError::ShapeMismatch {
                expected: vec![2],
                got,
            })?;

        Self::new(initial_intensity, params, beam_intensities, param_vals)
    }

    /// Write a preprocessed results file, replacing any existing file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let file = hdf5::File::create(path)?;
        file.new_dataset_builder()
            .with_data(&self.initial_intensity)
            .create(PREPROCESSED_INITIAL_DATASET)?;
        file.new_dataset_builder()
            .with_data(&self.params)
            .create(PARAMS_DATASET)?;
        file.new_dataset_builder()
            .with_data(&self.beam_intensities)
            .create(PREPROCESSED_INTENSITIES_DATASET)?;
        file.new_dataset_builder()
            .with_data(&self.param_vals)
            .create(PREPROCESSED_PARAM_VALS_DATASET)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, Array3};
    use tempfile::TempDir;

    fn make_data(n: usize, h: usize, w: usize, p: usize) -> PreprocessedBeamData {
        PreprocessedBeamData::new(
            Array2::from_shape_fn((h, w), |(r, c)| (r * w + c) as f32 * 0.01),
            Array1::from_shape_fn(p, |i| i as f32),
            Array3::from_shape_fn((n, h, w), |(i, r, c)| (i + r + c) as f32 * 0.5),
            Array2::from_shape_fn((n, p), |(i, j)| i as f32 - j as f32),
        )
        .unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preprocessed_results.h5");

        let original = make_data(5, 16, 16, 4);
        original.write_to(&path).unwrap();

        let loaded = PreprocessedBeamData::read_from(&path).unwrap();
        assert_eq!(loaded.accepted_count(), 5);
        assert_eq!(loaded.parameter_count(), 4);
        assert_eq!(loaded.image_shape(), (16, 16));
        assert_eq!(loaded.initial_intensity, original.initial_intensity);
        assert_eq!(loaded.beam_intensities, original.beam_intensities);
        assert_eq!(loaded.param_vals, original.param_vals);
    }

    #[test]
    fn test_validate_rejects_initial_shape_mismatch() {
        let result = PreprocessedBeamData::new(
            Array2::<f32>::zeros((8, 8)),
            Array1::<f32>::zeros(2),
            Array3::<f32>::zeros((3, 16, 16)),
            Array2::<f32>::zeros((3, 2)),
        );
        assert!(matches!(
            result,
            Err(BeamlineIoError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_misaligned_param_vals() {
        let result = PreprocessedBeamData::new(
            Array2::<f32>::zeros((16, 16)),
            Array1::<f32>::zeros(2),
            Array3::<f32>::zeros((3, 16, 16)),
            Array2::<f32>::zeros((2, 2)),
        );
        assert!(matches!(
            result,
            Err(BeamlineIoError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let result = PreprocessedBeamData::new(
            Array2::<f32>::zeros((16, 16)),
            Array1::<f32>::zeros(2),
            Array3::<f32>::zeros((0, 16, 16)),
            Array2::<f32>::zeros((0, 2)),
        );
        assert!(matches!(result, Err(BeamlineIoError::EmptyInput(_))));
    }

    #[test]
    fn test_overwrite_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preprocessed_results.h5");

        make_data(5, 8, 8, 2).write_to(&path).unwrap();
        make_data(3, 8, 8, 2).write_to(&path).unwrap();

        let loaded = PreprocessedBeamData::read_from(&path).unwrap();
        assert_eq!(loaded.accepted_count(), 3);
    }
}
