//! Epoch-driven trainer for the beamline surrogate.

use burn::module::AutodiffModule;
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::ElementConversion;

use crate::config::TrainingConfig;
use crate::data::{BeamBatcher, BeamDataset};
use crate::error::{NeuralBeamlineError, Result};
use crate::nn::BeamlineSurrogate;

use super::history::TrainingHistory;
use super::metrics::{central_crop_mse, EpochMetrics};

/// Trainer that fits a [`BeamlineSurrogate`] to a preprocessed dataset.
///
/// Each call to [`train`](SurrogateTrainer::train) splits the dataset
/// two-thirds/one-third, runs Adam over shuffled training batches, and
/// evaluates the gradient-free model on the unshuffled remainder after
/// every epoch.
#[derive(Debug)]
pub struct SurrogateTrainer<B: Backend> {
    model: BeamlineSurrogate<B>,
    config: TrainingConfig,
}

impl<B: Backend> SurrogateTrainer<B> {
    /// Create a trainer with a freshly initialized model.
    pub fn new(config: TrainingConfig, device: &B::Device) -> Result<Self> {
        config
            .validate()
            .map_err(|message| NeuralBeamlineError::InvalidConfig { message })?;

        let model = BeamlineSurrogate::new(&config.model, device);

        Ok(Self { model, config })
    }

    /// Get the training configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Get the current model.
    pub fn model(&self) -> &BeamlineSurrogate<B> {
        &self.model
    }

    /// Consume the trainer and return the model.
    pub fn into_model(self) -> BeamlineSurrogate<B> {
        self.model
    }

    /// Check that the dataset geometry matches the model configuration.
    fn check_dataset(&self, dataset: &BeamDataset) -> Result<()> {
        let size = self.config.model.image_size;
        let (height, width) = dataset.image_shape();
        if (height, width) != (size, size) {
            return Err(NeuralBeamlineError::ShapeMismatch {
                expected: vec![size, size],
                got: vec![height, width],
            });
        }

        let parameters = self.config.model.parameter_count;
        if dataset.parameter_count() != parameters {
            return Err(NeuralBeamlineError::ShapeMismatch {
                expected: vec![parameters],
                got: vec![dataset.parameter_count()],
            });
        }

        Ok(())
    }
}

impl<B: AutodiffBackend> SurrogateTrainer<B> {
    /// Train the surrogate on a dataset, returning the per-epoch loss history.
    ///
    /// The first two thirds of the dataset feed the optimizer; the rest is
    /// held out for evaluation. Epoch losses are sums over batches. A
    /// summary line is logged every `log_interval` epochs, starting with
    /// epoch zero.
    pub fn train(&mut self, dataset: &BeamDataset, device: &B::Device) -> Result<TrainingHistory> {
        self.check_dataset(dataset)?;

        let (train_set, test_set) = dataset.split();
        if train_set.is_empty() {
            return Err(NeuralBeamlineError::EmptyDataset(format!(
                "training partition is empty ({} samples, at least 3 required)",
                dataset.len()
            )));
        }

        log::info!(
            "training surrogate: {} training / {} test samples, {} epochs, batch size {}",
            train_set.len(),
            test_set.len(),
            self.config.epochs,
            self.config.batch_size,
        );

        let mut batcher = BeamBatcher::new(self.config.batch_size).with_seed(self.config.seed);
        let mut optimizer = AdamConfig::new().init();
        let mut history = TrainingHistory::new();
        let mut model = self.model.clone();

        for epoch in 0..self.config.epochs {
            let mut training_loss = 0.0_f32;
            for batch in batcher.shuffled_batches::<B>(&train_set, device) {
                let prediction = model.forward(batch.initials.clone(), batch.params.clone());
                let loss = MseLoss::new().forward(prediction, batch.targets, Reduction::Mean);

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optimizer.step(self.config.learning_rate, model, grads);

                training_loss += loss.into_scalar().elem::<f32>();
            }

            let (testing_loss, crop_loss) =
                eval_pass(&model.valid(), &test_set, self.config.batch_size, device);

            let metrics = EpochMetrics::new(epoch, training_loss, testing_loss, crop_loss);
            if epoch % self.config.log_interval == 0 {
                metrics.log();
            }
            history.push(metrics.training_loss, metrics.testing_loss, metrics.crop_loss);
        }

        self.model = model;

        Ok(history)
    }

    /// Evaluate the current model on a dataset without touching gradients.
    ///
    /// Returns the summed batch loss and the summed cropped-region loss.
    pub fn evaluate(&self, dataset: &BeamDataset, device: &B::Device) -> (f32, f32) {
        eval_pass(&self.model.valid(), dataset, self.config.batch_size, device)
    }
}

/// Run the model over sequential batches and sum the full and cropped losses.
fn eval_pass<B: Backend>(
    model: &BeamlineSurrogate<B>,
    dataset: &BeamDataset,
    batch_size: usize,
    device: &B::Device,
) -> (f32, f32) {
    let batcher = BeamBatcher::new(batch_size);
    let mut testing_loss = 0.0_f32;
    let mut crop_loss = 0.0_f32;

    for batch in batcher.sequential_batches::<B>(dataset, device) {
        let prediction = model.forward(batch.initials.clone(), batch.params.clone());
        let loss = MseLoss::new().forward(prediction.clone(), batch.targets.clone(), Reduction::Mean);

        testing_loss += loss.into_scalar().elem::<f32>();
        crop_loss += central_crop_mse(prediction, batch.targets)
            .into_scalar()
            .elem::<f32>();
    }

    (testing_loss, crop_loss)
}
