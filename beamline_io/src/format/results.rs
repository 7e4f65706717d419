//! Raw simulation results file layout.
//!
//! A results file is produced by a simulation campaign scanning beamline
//! parameters. Three datasets describe the scan:
//!
//! ```text
//! beamIntensities   (n_simulations, height, width)   float
//! params            (parameter_count,)               float
//! paramVals         (n_simulations, parameter_count) float
//! ```

use std::path::Path;

use ndarray::{Array1, Array2, Array3, Ix1, Ix2, Ix3};

use crate::error::{BeamlineIoError, Result};
use crate::format::{open_dataset, read_f32_dyn};

/// Name of the beam-intensity image stack dataset.
pub const BEAM_INTENSITIES_DATASET: &str = "beamIntensities";
/// Name of the per-parameter description dataset.
pub const PARAMS_DATASET: &str = "params";
/// Name of the per-run parameter value dataset.
pub const PARAM_VALS_DATASET: &str = "paramVals";

/// In-memory contents of a raw simulation results file.
#[derive(Debug, Clone)]
pub struct RawResults {
    /// Beam-intensity images, one per simulation run.
    pub beam_intensities: Array3<f32>,
    /// One entry per scanned beamline parameter.
    pub params: Array1<f32>,
    /// Per-run parameter values, one row per simulation run.
    pub param_vals: Array2<f32>,
}

impl RawResults {
    /// Bundle raw arrays, validating their shape agreement.
    pub fn new(
        beam_intensities: Array3<f32>,
        params: Array1<f32>,
        param_vals: Array2<f32>,
    ) -> Result<Self> {
        let results = Self {
            beam_intensities,
            params,
            param_vals,
        };
        results.validate()?;
        Ok(results)
    }

    /// Number of simulation runs.
    #[inline]
    pub fn simulation_count(&self) -> usize {
        self.beam_intensities.dim().0
    }

    /// Number of scanned beamline parameters.
    #[inline]
    pub fn parameter_count(&self) -> usize {
        self.params.len()
    }

    /// (height, width) of every raw image.
    #[inline]
    pub fn image_shape(&self) -> (usize, usize) {
        let (_, h, w) = self.beam_intensities.dim();
        (h, w)
    }

    /// Check the cross-dataset shape invariants.
    pub fn validate(&self) -> Result<()> {
        let (n, h, w) = self.beam_intensities.dim();
        if n == 0 || h == 0 || w == 0 {
            return Err(BeamlineIoError::EmptyInput(format!(
                "beam intensity stack is {}x{}x{}",
                n, h, w
            )));
        }
        if self.params.is_empty() {
            return Err(BeamlineIoError::EmptyInput(
                "parameter description is empty".into(),
            ));
        }
        let (rows, cols) = self.param_vals.dim();
        if rows != n {
            return Err(BeamlineIoError::ShapeMismatch {
                expected: vec![n, self.params.len()],
                got: vec![rows, cols],
            });
        }
        if cols != self.params.len() {
            return Err(BeamlineIoError::ShapeMismatch {
                expected: vec![n, self.params.len()],
                got: vec![rows, cols],
            });
        }
        Ok(())
    }

    /// Read a results file, converting float64 storage to f32.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = hdf5::File::open(path)?;

        let intensities_ds = open_dataset(&file, BEAM_INTENSITIES_DATASET)?;
        let beam_intensities = read_f32_dyn(&intensities_ds, BEAM_INTENSITIES_DATASET)?;
        let got = beam_intensities.shape().to_vec();
        let beam_intensities = beam_intensities
            .into_dimensionality::<Ix3>()
            .map_err(|_| BeamlineIoError::ShapeMismatch {
                expected: vec![3],
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

        let param_vals_ds = open_dataset(&file, PARAM_VALS_DATASET)?;
        let param_vals = read_f32_dyn(&param_vals_ds, PARAM_VALS_DATASET)?;
        let got = param_vals.shape().to_vec();
        let param_vals = param_vals
            .into_dimensionality::<Ix2>()
            .map_err(|_| BeamlineIoError::ShapeMismatch {
                expected: vec![2],
                got,
            })?;

        Self::new(beam_intensities, params, param_vals)
    }

    /// Write a results file in f32 storage.
    ///
    /// Used by synthetic data generators and tests; campaign files come from
    /// the simulation side.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let file = hdf5::File::create(path)?;
        file.new_dataset_builder()
            .with_data(&self.beam_intensities)
            .create(BEAM_INTENSITIES_DATASET)?;
        file.new_dataset_builder()
            .with_data(&self.params)
            .create(PARAMS_DATASET)?;
        file.new_dataset_builder()
            .with_data(&self.param_vals)
            .create(PARAM_VALS_DATASET)?;
        Ok(())
    }
}
