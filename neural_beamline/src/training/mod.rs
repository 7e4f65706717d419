//! Training loop, metrics, and loss artifacts.
//!
//! [`SurrogateTrainer`] drives the Adam epoch loop over shuffled batches
//! and evaluates on the held-out partition after every epoch.
//! [`TrainingHistory`] collects the per-epoch loss series and writes them
//! as flat text files, one value per line. The cropped-region loss in
//! [`metrics`](self) tracks fit over the beam core alone.

mod history;
mod metrics;
mod trainer;

pub use history::{write_series, TrainingHistory};
pub use metrics::{central_crop, central_crop_mse, EpochMetrics};
pub use trainer::SurrogateTrainer;
