//! In-memory training dataset built from preprocessed beamline data.

use std::path::Path;

use ndarray::{s, Array2, Array3, ArrayView1, ArrayView2};

use beamline_io::PreprocessedBeamData;

use crate::error::{NeuralBeamlineError, Result};

/// Aligned training samples: one target image and one parameter row per
/// accepted simulation run, plus the initial-intensity image shared by all
/// of them.
///
/// Sample `i` is the tuple (target `i`, initial intensity, parameter row
/// `i`), matching the column order the surrogate trains on.
#[derive(Debug, Clone)]
pub struct BeamDataset {
    /// Initial intensity shared by every sample.
    initial: Array2<f32>,
    /// Target beam intensities, one per run.
    targets: Array3<f32>,
    /// Parameter values aligned with `targets` rows.
    param_vals: Array2<f32>,
}

impl BeamDataset {
    /// Create a dataset, validating sample alignment.
    pub fn new(
        initial: Array2<f32>,
        targets: Array3<f32>,
        param_vals: Array2<f32>,
    ) -> Result<Self> {
        let (n, h, w) = targets.dim();
        let (ih, iw) = initial.dim();
        if (ih, iw) != (h, w) {
            return Err(NeuralBeamlineError::ShapeMismatch {
                expected: vec![h, w],
                got: vec![ih, iw],
            });
        }
        if param_vals.dim().0 != n {
            return Err(NeuralBeamlineError::ShapeMismatch {
                expected: vec![n, param_vals.dim().1],
                got: vec![param_vals.dim().0, param_vals.dim().1],
            });
        }

        Ok(Self {
            initial,
            targets,
            param_vals,
        })
    }

    /// Build a dataset from preprocessed file contents.
    pub fn from_preprocessed(data: PreprocessedBeamData) -> Self {
        Self {
            initial: data.initial_intensity,
            targets: data.beam_intensities,
            param_vals: data.param_vals,
        }
    }

    /// Load a dataset from a preprocessed HDF5 file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = PreprocessedBeamData::read_from(path)?;
        Ok(Self::from_preprocessed(data))
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.targets.dim().0
    }

    /// Check if the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (height, width) of every image.
    pub fn image_shape(&self) -> (usize, usize) {
        self.initial.dim()
    }

    /// Number of parameter values per sample.
    pub fn parameter_count(&self) -> usize {
        self.param_vals.dim().1
    }

    /// Target image of sample `index`.
    pub fn target(&self, index: usize) -> ArrayView2<'_, f32> {
        self.targets.slice(s![index, .., ..])
    }

    /// Initial intensity shared by every sample.
    pub fn initial(&self) -> ArrayView2<'_, f32> {
        self.initial.view()
    }

    /// Parameter values of sample `index`.
    pub fn params_row(&self, index: usize) -> ArrayView1<'_, f32> {
        self.param_vals.row(index)
    }

    /// Number of samples that fall into the training partition.
    pub fn train_count(&self) -> usize {
        2 * (self.len() / 3)
    }

    /// Split into training and test partitions by position: the first
    /// `2 * (n / 3)` samples train, the remainder test. Sample order is
    /// preserved on both sides.
    pub fn split(&self) -> (Self, Self) {
        let k = self.train_count();

        let train = Self {
            initial: self.initial.clone(),
            targets: self.targets.slice(s![..k, .., ..]).to_owned(),
            param_vals: self.param_vals.slice(s![..k, ..]).to_owned(),
        };
        let test = Self {
            initial: self.initial.clone(),
            targets: self.targets.slice(s![k.., .., ..]).to_owned(),
            param_vals: self.param_vals.slice(s![k.., ..]).to_owned(),
        };

        (train, test)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, Array3};

    fn make_dataset(n: usize) -> BeamDataset {
        // target i is constant i, parameter row i is [i, i + 0.5]
        let targets = Array3::from_shape_fn((n, 4, 4), |(i, _, _)| i as f32);
        let param_vals = Array2::from_shape_fn((n, 2), |(i, j)| i as f32 + j as f32 * 0.5);
        let initial = Array2::from_elem((4, 4), 7.0);
        BeamDataset::new(initial, targets, param_vals).unwrap()
    }

    #[test]
    fn test_accessors() {
        let dataset = make_dataset(5);
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.image_shape(), (4, 4));
        assert_eq!(dataset.parameter_count(), 2);
        assert_eq!(dataset.target(3)[[0, 0]], 3.0);
        assert_eq!(dataset.params_row(3)[1], 3.5);
        assert_eq!(dataset.initial()[[2, 2]], 7.0);
    }

    #[test]
    fn test_split_two_thirds() {
        let dataset = make_dataset(9);
        let (train, test) = dataset.split();
        assert_eq!(train.len(), 6);
        assert_eq!(test.len(), 3);
    }

    #[test]
    fn test_split_non_multiple_of_three() {
        // 2 * (10 / 3) = 6 training samples
        let dataset = make_dataset(10);
        let (train, test) = dataset.split();
        assert_eq!(train.len(), 6);
        assert_eq!(test.len(), 4);
    }

    #[test]
    fn test_split_preserves_alignment() {
        let dataset = make_dataset(9);
        let (train, test) = dataset.split();

        for i in 0..train.len() {
            assert_eq!(train.target(i)[[0, 0]], i as f32);
            assert_eq!(train.params_row(i)[0], i as f32);
        }
        for i in 0..test.len() {
            let original = train.len() + i;
            assert_eq!(test.target(i)[[0, 0]], original as f32);
            assert_eq!(test.params_row(i)[0], original as f32);
        }
    }

    #[test]
    fn test_split_tiny_dataset() {
        let dataset = make_dataset(2);
        let (train, test) = dataset.split();
        assert_eq!(train.len(), 0);
        assert!(train.is_empty());
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn test_new_rejects_misaligned_params() {
        let targets = Array3::zeros((4, 4, 4));
        let param_vals = Array2::zeros((3, 2));
        let initial = Array2::zeros((4, 4));
        assert!(BeamDataset::new(initial, targets, param_vals).is_err());
    }

    #[test]
    fn test_new_rejects_mismatched_initial() {
        let targets = Array3::zeros((4, 4, 4));
        let param_vals = Array2::zeros((4, 2));
        let initial = Array2::zeros((8, 8));
        assert!(BeamDataset::new(initial, targets, param_vals).is_err());
    }

    #[test]
    fn test_from_preprocessed() {
        let data = PreprocessedBeamData::new(
            Array2::from_elem((4, 4), 1.0),
            Array1::from_vec(vec![0.1, 0.2]),
            Array3::from_shape_fn((3, 4, 4), |(i, _, _)| i as f32),
            Array2::zeros((3, 2)),
        )
        .unwrap();

        let dataset = BeamDataset::from_preprocessed(data);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.parameter_count(), 2);
    }
}
