//! Dataset construction and batching for surrogate training.

mod batch;
mod dataset;
mod synthetic;

pub use batch::{BeamBatch, BeamBatcher};
pub use dataset::BeamDataset;
pub use synthetic::SyntheticBeamline;
