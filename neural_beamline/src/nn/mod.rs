//! Neural network modules for the beamline surrogate.
//!
//! This module provides the three branches of the surrogate and their
//! composition:
//! - `IntensityEncoder`: convolutional down branch over the initial intensity
//! - `ParamEmbedding`: MLP branch embedding scalar parameter values
//! - `IntensityDecoder`: transposed-convolution up branch
//! - `BeamlineSurrogate`: the composed three-branch model

pub mod decoder;
pub mod embedding;
pub mod encoder;
pub mod surrogate;

pub use decoder::IntensityDecoder;
pub use embedding::ParamEmbedding;
pub use encoder::IntensityEncoder;
pub use surrogate::BeamlineSurrogate;
