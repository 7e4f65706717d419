//! Per-epoch loss history and flat-file loss artifacts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Loss series accumulated during training, one entry per epoch.
///
/// Losses are summed over the batches of an epoch, not averaged, so the
/// series scales with the partition size.
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    /// Summed training loss per epoch.
    pub training_loss: Vec<f32>,
    /// Summed test loss per epoch.
    pub testing_loss: Vec<f32>,
    /// Summed cropped-region test loss per epoch.
    pub crop_loss: Vec<f32>,
}

impl TrainingHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one epoch's losses.
    pub fn push(&mut self, training: f32, testing: f32, crop: f32) {
        self.training_loss.push(training);
        self.testing_loss.push(testing);
        self.crop_loss.push(crop);
    }

    /// Number of recorded epochs.
    pub fn len(&self) -> usize {
        self.training_loss.len()
    }

    /// Check if no epochs were recorded.
    pub fn is_empty(&self) -> bool {
        self.training_loss.is_empty()
    }

    /// Final (training, testing) losses, if any epoch was recorded.
    pub fn final_losses(&self) -> Option<(f32, f32)> {
        match (self.training_loss.last(), self.testing_loss.last()) {
            (Some(&train), Some(&test)) => Some((train, test)),
            _ => None,
        }
    }

    /// Write the training and testing series as flat text files, one loss
    /// value per line.
    pub fn write_loss_files<P, Q>(&self, training_path: P, testing_path: Q) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        write_series(training_path, &self.training_loss)?;
        write_series(testing_path, &self.testing_loss)
    }

    /// Write the cropped-region series as a flat text file.
    pub fn write_crop_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_series(path, &self.crop_loss)
    }
}

/// Write a loss series as text, one value per line.
pub fn write_series<P: AsRef<Path>>(path: P, values: &[f32]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for value in values {
        writeln!(writer, "{}", value)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_push_and_final_losses() {
        let mut history = TrainingHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.final_losses(), None);

        history.push(1.5, 2.5, 0.5);
        history.push(1.0, 2.0, 0.4);

        assert_eq!(history.len(), 2);
        assert_eq!(history.final_losses(), Some((1.0, 2.0)));
        assert_eq!(history.crop_loss, vec![0.5, 0.4]);
    }

    #[test]
    fn test_write_loss_files_one_value_per_line() {
        let dir = TempDir::new().unwrap();
        let training_path = dir.path().join("training_loss.txt");
        let testing_path = dir.path().join("testing_loss.txt");

        let mut history = TrainingHistory::new();
        history.push(3.25, 4.5, 1.0);
        history.push(2.0, 3.75, 0.75);
        history.push(1.5, 3.0, 0.5);

        history
            .write_loss_files(&training_path, &testing_path)
            .unwrap();

        let training = std::fs::read_to_string(&training_path).unwrap();
        let values: Vec<f32> = training
            .lines()
            .map(|line| line.parse().unwrap())
            .collect();
        assert_eq!(values, vec![3.25, 2.0, 1.5]);

        let testing = std::fs::read_to_string(&testing_path).unwrap();
        assert_eq!(testing.lines().count(), 3);
    }

    #[test]
    fn test_write_crop_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crop_loss.txt");

        let mut history = TrainingHistory::new();
        history.push(1.0, 1.0, 0.25);

        history.write_crop_file(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim().parse::<f32>().unwrap(), 0.25);
    }

    #[test]
    fn test_write_series_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");

        write_series(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
