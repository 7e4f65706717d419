//! Example: Training a beamline surrogate end to end on synthetic data.
//!
//! This example demonstrates the complete TES-style workflow:
//! 1. Generate a raw results file and its initial-intensity CSV
//! 2. Preprocess (crop, log transform, standardize, reject, resize)
//! 3. Load the preprocessed file as a dataset and split it
//! 4. Train the convolutional surrogate with Adam
//! 5. Write per-epoch loss files and the loss-curve chart
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -p neural_beamline --example tes_surrogate
//! ```
//!
//! Output files are saved to `target/tes_surrogate/`.

use std::fs;
use std::path::Path;

use burn::backend::{Autodiff, NdArray};

use beamline_io::{preprocess_files, PreprocessConfig};
use neural_beamline::{
    config::{BeamlineSurrogateConfig, TrainingConfig},
    data::{BeamDataset, SyntheticBeamline},
    plot::plot_loss_curves,
    training::SurrogateTrainer,
};

type MyBackend = Autodiff<NdArray>;

/// Output directory for generated files.
const OUTPUT_DIR: &str = "target/tes_surrogate";

/// Name of the simulated beamline, used in artifact titles.
const BEAMLINE: &str = "TES";

fn main() {
    // Initialize logging
    env_logger::init();

    // Ensure output directory exists
    if let Err(e) = fs::create_dir_all(OUTPUT_DIR) {
        eprintln!("Warning: Could not create output directory: {}", e);
    }

    let out_dir = Path::new(OUTPUT_DIR);
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;

    println!("═══════════════════════════════════════════════════════════════");
    println!("          Beamline Surrogate Training ({} beamline)", BEAMLINE);
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    // =========================================================================
    // Step 1: Generate a synthetic simulation campaign
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 1: Generating Synthetic Simulations                   │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let raw_height = 96;
    let raw_width = 96;
    let simulation_count = 60;
    let parameter_count = 3;

    let results_path = out_dir.join("results.h5");
    let csv_path = out_dir.join("tes_init.csv");

    let mut beamline = SyntheticBeamline::new(raw_height, raw_width)
        .with_noise(0.02)
        .with_seed(7);
    beamline
        .write_fixture(&results_path, &csv_path, simulation_count, parameter_count)
        .unwrap();

    println!("  Raw resolution:  {}x{}", raw_height, raw_width);
    println!("  Simulations:     {}", simulation_count);
    println!("  Parameters:      {}", parameter_count);
    println!("  Results file:    {}", results_path.display());
    println!("  Initial CSV:     {}", csv_path.display());
    println!();

    // =========================================================================
    // Step 2: Preprocess the raw files
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 2: Preprocessing                                      │");
    println!("└─────────────────────────────────────────────────────────────┘");

    // 64x64 keeps the CPU demo quick; the config default of 128x128
    // matches the full TES campaign resolution.
    let preprocess_config = PreprocessConfig {
        target_height: 64,
        target_width: 64,
        ..PreprocessConfig::default()
    };
    let preprocessed_path = out_dir.join("preprocessed_results.h5");

    let (data, selection) = preprocess_files(
        &results_path,
        &csv_path,
        &preprocessed_path,
        preprocess_config,
    )
    .unwrap();

    println!("  Accepted:        {} simulations", selection.accepted_count());
    println!("  Rejected:        {} simulations", selection.rejected_count());
    println!("  Target shape:    {:?}", data.image_shape());
    println!("  Output file:     {}", preprocessed_path.display());
    println!();

    // =========================================================================
    // Step 3: Load the dataset
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 3: Loading the Dataset                                │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let dataset = BeamDataset::load(&preprocessed_path).unwrap();

    println!("  Samples:         {}", dataset.len());
    println!("  Image shape:     {:?}", dataset.image_shape());
    println!("  Parameters:      {}", dataset.parameter_count());
    println!(
        "  Split:           {} training / {} test",
        dataset.train_count(),
        dataset.len() - dataset.train_count()
    );
    println!();

    // =========================================================================
    // Step 4: Configure training
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 4: Configuring Training                               │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let model_config = BeamlineSurrogateConfig::new(dataset.parameter_count()).with_image_size(64);
    let config = TrainingConfig::new(model_config)
        .with_batch_size(10)
        .with_log_interval(1);

    println!("  Epochs:          {}", config.epochs);
    println!("  Batch size:      {}", config.batch_size);
    println!("  Learning rate:   {}", config.learning_rate);
    println!("  Encoder:         {:?} channels", config.model.encoder_channels);
    println!("  Embedding:       {:?} hidden widths", config.model.embedding_hidden);
    println!(
        "  Latent:          {} x {}x{}",
        config.model.latent_channels(),
        config.model.latent_size(),
        config.model.latent_size()
    );
    println!();

    // =========================================================================
    // Step 5: Train
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 5: Training                                           │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let mut trainer = SurrogateTrainer::<MyBackend>::new(config, &device).unwrap();
    let history = trainer.train(&dataset, &device).unwrap();

    println!("  Training Progress:");
    let first_loss = history.training_loss[0];
    for (epoch, loss) in history.training_loss.iter().enumerate() {
        let bar_len = (50.0 * (1.0 - (loss / first_loss).min(1.0))) as usize;
        let bar: String = "█".repeat(bar_len) + &"░".repeat(50 - bar_len);
        println!(
            "    Epoch {:3}: training = {:.5}  [{}]",
            epoch, loss, bar
        );
    }

    if let Some((training, testing)) = history.final_losses() {
        println!();
        println!("  Initial loss:    {:.5}", first_loss);
        println!("  Final training:  {:.5}", training);
        println!("  Final testing:   {:.5}", testing);
    }
    println!();

    // =========================================================================
    // Step 6: Write loss artifacts
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 6: Writing Loss Artifacts                             │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let training_path = out_dir.join("training_loss.txt");
    let testing_path = out_dir.join("testing_loss.txt");
    let crop_path = out_dir.join("crop_loss.txt");
    let chart_path = out_dir.join("loss_curves.png");

    match history.write_loss_files(&training_path, &testing_path) {
        Ok(()) => {
            println!("  Loss files:      {}", training_path.display());
            println!("                   {}", testing_path.display());
        }
        Err(e) => {
            eprintln!("    Error: Failed to write loss files: {}", e);
        }
    }

    match history.write_crop_file(&crop_path) {
        Ok(()) => println!("  Crop losses:     {}", crop_path.display()),
        Err(e) => eprintln!("    Error: Failed to write crop-loss file: {}", e),
    }

    let title = format!("{} {} simulations", BEAMLINE, dataset.len());
    match plot_loss_curves(&chart_path, &title, &history) {
        Ok(()) => {
            let file_size = fs::metadata(&chart_path).map(|m| m.len()).unwrap_or(0);
            println!("  Loss chart:      {}", chart_path.display());
            println!(
                "    File size:     {} bytes ({:.2} KB)",
                file_size,
                file_size as f64 / 1024.0
            );
        }
        Err(e) => {
            eprintln!("    Error: Failed to render loss chart: {}", e);
        }
    }
    println!();

    // Summary
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Training complete!");
    println!("  Output files: {}/", OUTPUT_DIR);
    println!("═══════════════════════════════════════════════════════════════");
}
