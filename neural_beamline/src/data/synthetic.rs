//! Synthetic beamline data for examples and integration tests.
//!
//! Generates raw-format simulation stacks without a beamline: each run is
//! an elliptical Gaussian beam spot whose brightness and widths derive from
//! the run's parameter values, plus a clean Gaussian initial-intensity
//! profile. Written through `beamline_io`, the output exercises the full
//! preprocess-then-train path.

use std::f32::consts::PI;
use std::path::Path;

use ndarray::{Array1, Array2, Array3};

use beamline_io::{write_intensity_csv, RawResults};

use crate::error::{NeuralBeamlineError, Result};

/// Synthetic beam-spot generator.
#[derive(Debug, Clone)]
pub struct SyntheticBeamline {
    /// Raw image height in pixels.
    pub height: usize,
    /// Raw image width in pixels.
    pub width: usize,
    /// Relative per-pixel noise level.
    pub noise_sigma: f32,
    /// Random seed for parameter draws and noise.
    seed: u64,
}

impl SyntheticBeamline {
    /// Create a generator for `height` x `width` raw images.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            noise_sigma: 0.01,
            seed: 42,
        }
    }

    /// Set the noise level.
    pub fn with_noise(mut self, sigma: f32) -> Self {
        self.noise_sigma = sigma;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate a random number using a simple LCG.
    fn rand(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.seed >> 33) as f32) / (1u64 << 31) as f32
    }

    /// Generate Gaussian noise using Box-Muller transform.
    fn gaussian_noise(&mut self) -> f32 {
        let u1 = self.rand().max(1e-10);
        let u2 = self.rand();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Generate a raw results stack of `simulation_count` runs over
    /// `parameter_count` beamline parameters.
    pub fn generate(
        &mut self,
        simulation_count: usize,
        parameter_count: usize,
    ) -> Result<RawResults> {
        if simulation_count == 0 || parameter_count == 0 {
            return Err(NeuralBeamlineError::InvalidConfig {
                message: "synthetic stack needs at least one run and one parameter".into(),
            });
        }

        // nominal settings for the scanned parameters
        let params = Array1::from_shape_fn(parameter_count, |i| 1.0 + 0.1 * i as f32);

        let mut param_vals = Array2::zeros((simulation_count, parameter_count));
        for value in param_vals.iter_mut() {
            *value = 0.5 + self.rand();
        }

        let mut images = Array3::zeros((simulation_count, self.height, self.width));
        for run in 0..simulation_count {
            let amplitude = 500.0 + 1000.0 * param_vals[[run, 0]];
            let sigma_rows =
                self.height as f32 / 12.0 * (0.5 + param_vals[[run, 1 % parameter_count]]);
            let sigma_cols =
                self.width as f32 / 12.0 * (0.5 + param_vals[[run, 2 % parameter_count]]);

            let center_row = (self.height / 2) as f32;
            let center_col = (self.width / 2) as f32;

            for row in 0..self.height {
                for col in 0..self.width {
                    let dr = (row as f32 - center_row) / sigma_rows;
                    let dc = (col as f32 - center_col) / sigma_cols;
                    let clean = amplitude * (-(dr * dr + dc * dc) / 2.0).exp();
                    let noisy = clean * (1.0 + self.noise_sigma * self.gaussian_noise());
                    images[[run, row, col]] = noisy.max(0.0);
                }
            }
        }

        Ok(RawResults::new(images, params, param_vals)?)
    }

    /// Clean Gaussian illumination profile shared by every run. Strictly
    /// positive everywhere.
    pub fn initial_intensity(&self) -> Array2<f32> {
        let center_row = (self.height / 2) as f32;
        let center_col = (self.width / 2) as f32;
        let sigma_rows = self.height as f32 / 6.0;
        let sigma_cols = self.width as f32 / 6.0;

        Array2::from_shape_fn((self.height, self.width), |(row, col)| {
            let dr = (row as f32 - center_row) / sigma_rows;
            let dc = (col as f32 - center_col) / sigma_cols;
            1000.0 * (-(dr * dr + dc * dc) / 2.0).exp()
        })
    }

    /// Write a raw results file and its matching initial-intensity CSV.
    pub fn write_fixture<P, Q>(
        &mut self,
        results_path: P,
        csv_path: Q,
        simulation_count: usize,
        parameter_count: usize,
    ) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let raw = self.generate(simulation_count, parameter_count)?;
        raw.write_to(results_path)?;
        write_intensity_csv(csv_path, self.initial_intensity().view())?;
        Ok(())
    }
}
