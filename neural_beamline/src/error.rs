//! Error types for neural_beamline.

use thiserror::Error;

/// Errors that can occur while building datasets, training, or writing
/// training artifacts.
#[derive(Error, Debug)]
pub enum NeuralBeamlineError {
    /// Preprocessing-stage failure surfaced through beamline_io.
    #[error("beamline I/O error: {0}")]
    Io(#[from] beamline_io::BeamlineIoError),

    /// Filesystem failure while writing loss files or charts.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),

    /// Tensor or array shape mismatch.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// A dataset partition ended up with no samples.
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    /// Chart rendering failure.
    #[error("plot error: {0}")]
    Plot(String),
}

/// Result type for neural_beamline operations.
pub type Result<T> = std::result::Result<T, NeuralBeamlineError>;
