//! CSV intensity-image import and export.
//!
//! Beamline exports store one intensity image per CSV file: a header line
//! followed by rows of float cells, one row per detector row. The header
//! line is skipped without being interpreted, so metadata-style first lines
//! are fine.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use ndarray::{Array2, ArrayView2};

use crate::error::{BeamlineIoError, Result};

/// Read one intensity image from a CSV file, skipping the header line.
///
/// Every data row must hold the same number of float cells.
pub fn read_intensity_csv<P: AsRef<Path>>(path: P) -> Result<Array2<f32>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut values: Vec<f32> = Vec::new();
    let mut width: Option<usize> = None;
    let mut rows = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if row == 0 {
            // Header line, contents unused.
            continue;
        }

        match width {
            None => width = Some(record.len()),
            Some(w) if w != record.len() => {
                return Err(BeamlineIoError::ShapeMismatch {
                    expected: vec![w],
                    got: vec![record.len()],
                });
            }
            Some(_) => {}
        }

        for (column, cell) in record.iter().enumerate() {
            let value = cell.trim().parse::<f32>().map_err(|_| {
                BeamlineIoError::InvalidFloat {
                    value: cell.to_string(),
                    row,
                    column,
                }
            })?;
            values.push(value);
        }
        rows += 1;
    }

    let width = width.ok_or_else(|| {
        BeamlineIoError::EmptyInput("csv file holds no data rows".into())
    })?;
    if width == 0 {
        return Err(BeamlineIoError::EmptyInput("csv rows hold no cells".into()));
    }

    Array2::from_shape_vec((rows, width), values).map_err(|_| BeamlineIoError::ShapeMismatch {
        expected: vec![rows, width],
        got: vec![rows * width],
    })
}

/// Write one intensity image to a CSV file with a single header line.
pub fn write_intensity_csv<P: AsRef<Path>>(path: P, image: ArrayView2<'_, f32>) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(["beam intensity"])?;
    for row in image.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
