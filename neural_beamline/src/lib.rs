//! # neural_beamline
//!
//! Convolutional surrogate training for synchrotron beamline simulations
//! with Burn.
//!
//! This crate is the model layer of the beamline surrogate pipeline. It
//! consumes the preprocessed files written by `beamline_io` and trains an
//! encoder-decoder network that predicts the beam-intensity image a
//! simulation would produce for a given set of beamline parameters.
//!
//! ## Features
//!
//! - **Three-branch surrogate**: `BeamlineSurrogate<B>` composes a
//!   convolutional encoder over the initial intensity, an MLP embedding of
//!   the parameter values, and a transposed-convolution decoder
//! - **Epoch trainer**: `SurrogateTrainer<B>` runs Adam over shuffled
//!   batches with a gradient-free evaluation pass after every epoch
//! - **Loss artifacts**: `TrainingHistory` writes flat loss files and the
//!   cropped-region series; `plot_loss_curves` renders the PNG chart
//! - **Synthetic fixtures**: `SyntheticBeamline` generates raw files for
//!   demos and tests without a simulation backend
//!
//! ## Quick Start
//!
//! ```ignore
//! use neural_beamline::{
//!     config::{BeamlineSurrogateConfig, TrainingConfig},
//!     data::BeamDataset,
//!     training::SurrogateTrainer,
//! };
//! use burn::backend::{Autodiff, NdArray};
//!
//! type MyBackend = Autodiff<NdArray>;
//!
//! // Load the preprocessed file written by beamline_io
//! let dataset = BeamDataset::load("preprocessed_results.h5")?;
//!
//! // Train
//! let config = TrainingConfig::new(BeamlineSurrogateConfig::new(dataset.parameter_count()));
//! let device = Default::default();
//! let mut trainer = SurrogateTrainer::<MyBackend>::new(config, &device)?;
//! let history = trainer.train(&dataset, &device)?;
//!
//! // Artifacts
//! history.write_loss_files("training_loss.txt", "testing_loss.txt")?;
//! neural_beamline::plot::plot_loss_curves("loss_curves.png", "TES 500 simulations", &history)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! results.h5 + tes_init.csv
//!         │
//!         ▼
//!    beamline_io ──► preprocessed_results.h5
//!   (data layer)           │
//!                          ▼
//!                   neural_beamline
//!                 (model + training)
//!                          │
//!                          ▼
//!        loss files + loss_curves.png
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod data;
pub mod error;
pub mod nn;
pub mod plot;
pub mod training;

// Re-export key types for convenience
pub use config::{BeamlineSurrogateConfig, TrainingConfig};
pub use error::{NeuralBeamlineError, Result};
pub use nn::BeamlineSurrogate;
pub use training::{SurrogateTrainer, TrainingHistory};

// Re-export from beamline_io for convenience
pub use beamline_io::{PreprocessConfig, PreprocessedBeamData, RawResults};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{BeamlineSurrogateConfig, TrainingConfig};
    pub use crate::data::{BeamBatch, BeamBatcher, BeamDataset, SyntheticBeamline};
    pub use crate::error::{NeuralBeamlineError, Result};
    pub use crate::nn::{BeamlineSurrogate, IntensityDecoder, IntensityEncoder, ParamEmbedding};
    pub use crate::plot::plot_loss_curves;
    pub use crate::training::{
        central_crop, central_crop_mse, write_series, EpochMetrics, SurrogateTrainer,
        TrainingHistory,
    };

    pub use beamline_io::{preprocess_files, PreprocessConfig, PreprocessedBeamData, RawResults};
}
