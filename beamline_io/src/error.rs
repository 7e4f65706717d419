//! Error types for beamline_io operations.

use thiserror::Error;

/// Errors that can occur while reading, preprocessing, or writing beamline data.
#[derive(Error, Debug)]
pub enum BeamlineIoError {
    /// Underlying HDF5 library failure.
    #[error("hdf5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// CSV reader failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure outside the HDF5 layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV cell could not be parsed as a float.
    #[error("invalid float {value:?} at row {row}, column {column}")]
    InvalidFloat {
        /// The offending cell contents.
        value: String,
        /// Zero-based row index in the file, counting the header.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },

    /// Array shape disagreement between datasets or against a contract.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// A required dataset is absent from the file.
    #[error("dataset {name:?} not found in file")]
    MissingDataset {
        /// Name of the missing dataset.
        name: String,
    },

    /// Dataset element type is not convertible to f32.
    #[error("unsupported dtype in dataset {dataset:?}: expected float32 or float64")]
    UnsupportedDtype {
        /// Name of the offending dataset.
        dataset: String,
    },

    /// An input collection was empty where data is required.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Data whose statistics break an operation (e.g. zero variance).
    #[error("degenerate data: {0}")]
    Degenerate(String),

    /// Invalid preprocessing configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

/// Result type alias for beamline_io operations.
pub type Result<T> = std::result::Result<T, BeamlineIoError>;
