//! beamline_io - data preparation and storage for beamline surrogate training.
//!
//! This crate is the data layer of the beamline surrogate pipeline. It reads
//! raw simulation results (HDF5) and initial-intensity exports (CSV), runs
//! the preprocessing pipeline, and writes the fixed-shape preprocessed file
//! that training consumes.
//!
//! # Pipeline
//!
//! Raw beam-intensity images pass through, in order: central-third crop,
//! log transform with epsilon, global standardization, near-zero-variance
//! rejection, and bilinear resizing to a fixed target resolution. Parameter
//! values are standardized globally and filtered to the accepted runs; the
//! initial intensity gets its own epsilon shift, log transform,
//! standardization and resize.
//!
//! # Core Types
//!
//! - [`RawResults`]: the raw results file (`beamIntensities`, `params`,
//!   `paramVals`)
//! - [`PreprocessedBeamData`]: the preprocessed file the pipeline writes
//! - [`PreprocessConfig`]: crop, epsilon, threshold and target-shape knobs
//! - [`SampleSelection`]: the recorded accept/reject decision
//!
//! # Example
//!
//! ```ignore
//! use beamline_io::{preprocess_files, PreprocessConfig};
//!
//! let (data, selection) = preprocess_files(
//!     "results.h5",
//!     "tes_init.csv",
//!     "preprocessed_results.h5",
//!     PreprocessConfig::default(),
//! )?;
//! println!(
//!     "accepted {} of {} simulations",
//!     selection.accepted_count(),
//!     selection.total(),
//! );
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod csv_import;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod resize;

// Re-export main types
pub use config::PreprocessConfig;
pub use error::{BeamlineIoError, Result};

// Re-export format types
pub use format::{
    PreprocessedBeamData, RawResults, BEAM_INTENSITIES_DATASET, PARAMS_DATASET,
    PARAM_VALS_DATASET, PREPROCESSED_INITIAL_DATASET, PREPROCESSED_INTENSITIES_DATASET,
    PREPROCESSED_PARAM_VALS_DATASET,
};

// Re-export pipeline operations
pub use pipeline::{
    crop_image, crop_stack, initial_intensity_epsilon, log_transform, preprocess,
    preprocess_files, select_by_std, standardize, CropWindow, SampleSelection,
};

// Re-export I/O helpers
pub use csv_import::{read_intensity_csv, write_intensity_csv};
pub use resize::{resize_bilinear, smallest_image_size};
