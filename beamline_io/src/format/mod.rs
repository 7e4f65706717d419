//! Beamline HDF5 file layouts.
//!
//! Two file layouts pass through this module:
//!
//! - **Raw results**: the file a simulation campaign produces, holding one
//!   beam-intensity image per run plus the scanned parameters
//!   (`beamIntensities`, `params`, `paramVals`).
//! - **Preprocessed results**: the file the preprocessing pipeline writes,
//!   holding fixed-shape standardized images aligned with filtered
//!   parameter values, plus the resized initial intensity.
//!
//! Readers accept float32 or float64 storage and hand back f32 arrays;
//! writers always store float32.
//!
//! # Example
//!
//! ```ignore
//! use beamline_io::{RawResults, PreprocessedBeamData};
//!
//! let raw = RawResults::read_from("results.h5")?;
//! println!("{} simulations of {:?}", raw.simulation_count(), raw.image_shape());
//!
//! let data = PreprocessedBeamData::read_from("preprocessed_results.h5")?;
//! println!("{} accepted samples", data.accepted_count());
//! ```

pub mod preprocessed;
pub mod results;

pub use preprocessed::{
    PreprocessedBeamData, PREPROCESSED_INITIAL_DATASET, PREPROCESSED_INTENSITIES_DATASET,
    PREPROCESSED_PARAM_VALS_DATASET,
};
pub use results::{RawResults, BEAM_INTENSITIES_DATASET, PARAMS_DATASET, PARAM_VALS_DATASET};

use ndarray::ArrayD;

use crate::error::{BeamlineIoError, Result};

/// Open a named dataset, mapping absence to a typed error.
pub(crate) fn open_dataset(file: &hdf5::File, name: &str) -> Result<hdf5::Dataset> {
    file.dataset(name).map_err(|_| BeamlineIoError::MissingDataset {
        name: name.to_string(),
    })
}

/// Read a dataset into an f32 array, converting from float64 storage when
/// needed.
pub(crate) fn read_f32_dyn(dataset: &hdf5::Dataset, name: &str) -> Result<ArrayD<f32>> {
    use hdf5::types::{FloatSize, TypeDescriptor};

    let descriptor = dataset.dtype()?.to_descriptor()?;
    match descriptor {
        TypeDescriptor::Float(FloatSize::U4) => Ok(dataset.read_dyn::<f32>()?),
        TypeDescriptor::Float(FloatSize::U8) => {
            Ok(dataset.read_dyn::<f64>()?.mapv(|v| v as f32))
        }
        _ => Err(BeamlineIoError::UnsupportedDtype {
            dataset: name.to_string(),
        }),
    }
}
