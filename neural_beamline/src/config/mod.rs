//! Configuration types for neural_beamline.
//!
//! Burn-style configuration structs for the surrogate model and its
//! training loop.

mod network;
mod training;

pub use network::BeamlineSurrogateConfig;
pub use training::TrainingConfig;
