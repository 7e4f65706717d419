//! Batch construction for surrogate training.

use burn::prelude::*;

use super::BeamDataset;

/// One batch of aligned training tensors.
#[derive(Debug, Clone)]
pub struct BeamBatch<B: Backend> {
    /// Target beam intensities, shape `[batch, 1, height, width]`.
    pub targets: Tensor<B, 4>,
    /// Initial intensity replicated per sample, shape `[batch, 1, height, width]`.
    pub initials: Tensor<B, 4>,
    /// Parameter values, shape `[batch, parameter_count]`.
    pub params: Tensor<B, 2>,
}

impl<B: Backend> BeamBatch<B> {
    /// Create a new batch.
    pub fn new(targets: Tensor<B, 4>, initials: Tensor<B, 4>, params: Tensor<B, 2>) -> Self {
        Self {
            targets,
            initials,
            params,
        }
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.targets.dims()[0]
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the device of the batch tensors.
    pub fn device(&self) -> B::Device {
        self.targets.device()
    }
}

/// Builds fixed-size batches from a dataset, optionally shuffling the
/// sample order with a deterministic pseudo-random permutation.
#[derive(Debug, Clone)]
pub struct BeamBatcher {
    /// Number of samples per batch; the final batch may be shorter.
    batch_size: usize,
    /// Shuffle seed, advanced by every pseudo-random draw.
    seed: u64,
}

impl BeamBatcher {
    /// Create a new batcher.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            seed: 42,
        }
    }

    /// Set the random seed for shuffling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate a random number using a simple LCG.
    fn rand(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.seed >> 33) as f32) / (1u64 << 31) as f32
    }

    /// Draw a pseudo-random index in `0..bound`.
    fn rand_below(&mut self, bound: usize) -> usize {
        ((self.rand() * bound as f32) as usize).min(bound - 1)
    }

    /// Fisher-Yates permutation of `0..n`. Advances the seed, so two
    /// consecutive calls return different permutations.
    pub fn shuffled_indices(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = self.rand_below(i + 1);
            indices.swap(i, j);
        }
        indices
    }

    /// Batches over the dataset in a freshly shuffled order.
    pub fn shuffled_batches<B: Backend>(
        &mut self,
        dataset: &BeamDataset,
        device: &B::Device,
    ) -> Vec<BeamBatch<B>> {
        let indices = self.shuffled_indices(dataset.len());
        self.batches_for(dataset, &indices, device)
    }

    /// Batches over the dataset in sample order, for evaluation passes.
    pub fn sequential_batches<B: Backend>(
        &self,
        dataset: &BeamDataset,
        device: &B::Device,
    ) -> Vec<BeamBatch<B>> {
        let indices: Vec<usize> = (0..dataset.len()).collect();
        self.batches_for(dataset, &indices, device)
    }

    fn batches_for<B: Backend>(
        &self,
        dataset: &BeamDataset,
        indices: &[usize],
        device: &B::Device,
    ) -> Vec<BeamBatch<B>> {
        let (height, width) = dataset.image_shape();
        let parameter_count = dataset.parameter_count();

        indices
            .chunks(self.batch_size)
            .map(|chunk| {
                let batch = chunk.len();
                let mut targets = Vec::with_capacity(batch * height * width);
                let mut initials = Vec::with_capacity(batch * height * width);
                let mut params = Vec::with_capacity(batch * parameter_count);

                for &index in chunk {
                    targets.extend(dataset.target(index).iter().copied());
                    initials.extend(dataset.initial().iter().copied());
                    params.extend(dataset.params_row(index).iter().copied());
                }

                BeamBatch::new(
                    Tensor::from_data(
                        TensorData::new(targets, [batch, 1, height, width]),
                        device,
                    ),
                    Tensor::from_data(
                        TensorData::new(initials, [batch, 1, height, width]),
                        device,
                    ),
                    Tensor::from_data(TensorData::new(params, [batch, parameter_count]), device),
                )
            })
            .collect()
    }
}
