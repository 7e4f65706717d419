//! End-to-end preprocessing tests: raw files in, preprocessed files out.

use beamline_io::{
    preprocess_files, write_intensity_csv, PreprocessConfig, PreprocessedBeamData, RawResults,
};
use ndarray::{Array1, Array2, Array3, Axis};
use tempfile::TempDir;

/// Gaussian-spot image stack with a few degenerate (constant) runs mixed in.
fn make_raw(n: usize, h: usize, w: usize, p: usize, constant_runs: &[usize]) -> RawResults {
    let mut intensities = Array3::from_shape_fn((n, h, w), |(i, r, c)| {
        let sigma = 2.0 + i as f32 * 0.25;
        let x = (r as f32 - h as f32 / 2.0) / sigma;
        let y = (c as f32 - w as f32 / 2.0) / sigma;
        (i as f32 + 1.0) * (-(x * x + y * y)).exp()
    });
    for &i in constant_runs {
        intensities.index_axis_mut(Axis(0), i).fill(0.0);
    }
    RawResults::new(
        intensities,
        Array1::from_shape_fn(p, |i| (i + 1) as f32),
        Array2::from_shape_fn((n, p), |(i, j)| i as f32 * 0.5 + j as f32),
    )
    .unwrap()
}

#[test]
fn preprocess_files_writes_aligned_output() {
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("results.h5");
    let csv_path = dir.path().join("tes_init.csv");
    let output_path = dir.path().join("preprocessed_results.h5");

    let raw = make_raw(9, 36, 30, 4, &[2, 7]);
    raw.write_to(&results_path).unwrap();

    let initial = Array2::from_shape_fn((24, 20), |(i, j)| ((i + 1) * (j + 2)) as f32 * 0.5);
    write_intensity_csv(&csv_path, initial.view()).unwrap();

    let config = PreprocessConfig {
        target_height: 16,
        target_width: 16,
        ..PreprocessConfig::default()
    };
    let (data, selection) = preprocess_files(&results_path, &csv_path, &output_path, config).unwrap();

    assert_eq!(selection.total(), 9);
    assert_eq!(selection.rejected, vec![2, 7]);
    assert_eq!(data.accepted_count(), 7);

    // The written file reads back equal to the returned data.
    let loaded = PreprocessedBeamData::read_from(&output_path).unwrap();
    assert_eq!(loaded.accepted_count(), data.accepted_count());
    assert_eq!(loaded.image_shape(), (16, 16));
    assert_eq!(loaded.parameter_count(), 4);
    assert_eq!(loaded.params, data.params);
    assert_eq!(loaded.beam_intensities, data.beam_intensities);
    assert_eq!(loaded.param_vals, data.param_vals);
    assert_eq!(loaded.initial_intensity, data.initial_intensity);
}

#[test]
fn preprocess_files_standardizes_images() {
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("results.h5");
    let csv_path = dir.path().join("init.csv");
    let output_path = dir.path().join("out.h5");

    let raw = make_raw(6, 30, 30, 2, &[]);
    raw.write_to(&results_path).unwrap();
    let initial = Array2::from_shape_fn((30, 30), |(i, j)| (i * j + 1) as f32);
    write_intensity_csv(&csv_path, initial.view()).unwrap();

    let config = PreprocessConfig {
        target_height: 12,
        target_width: 12,
        ..PreprocessConfig::default()
    };
    let (data, _) = preprocess_files(&results_path, &csv_path, &output_path, config).unwrap();

    // Standardization happened before resizing, so values are finite and
    // centered roughly around zero.
    for &v in data.beam_intensities.iter() {
        assert!(v.is_finite());
    }
    let mean = data.beam_intensities.mean().unwrap();
    assert!(mean.abs() < 2.0, "stack mean {} looks unstandardized", mean);

    // Same for the initial intensity.
    for &v in data.initial_intensity.iter() {
        assert!(v.is_finite());
    }
}

#[test]
fn preprocess_files_error_on_missing_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.h5");
    let csv_path = dir.path().join("init.csv");
    let output_path = dir.path().join("out.h5");

    let result = preprocess_files(
        &missing,
        &csv_path,
        &output_path,
        PreprocessConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn raw_results_roundtrip_preserves_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.h5");

    let raw = make_raw(4, 18, 22, 3, &[]);
    raw.write_to(&path).unwrap();

    let loaded = RawResults::read_from(&path).unwrap();
    assert_eq!(loaded.beam_intensities, raw.beam_intensities);
    assert_eq!(loaded.params, raw.params);
    assert_eq!(loaded.param_vals, raw.param_vals);
}
