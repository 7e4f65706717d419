//! Loss-curve chart rendering.

use std::path::Path;

use plotters::prelude::*;

use crate::error::{NeuralBeamlineError, Result};
use crate::training::TrainingHistory;

/// Render the training and testing loss series as a PNG chart.
///
/// The x axis counts epochs and the y axis spans the losses from zero,
/// with one line per series and a legend naming both. The title is
/// caller-supplied, typically `"{beamline} {n} simulations"`.
pub fn plot_loss_curves<P: AsRef<Path>>(
    path: P,
    title: &str,
    history: &TrainingHistory,
) -> Result<()> {
    if history.is_empty() {
        return Err(NeuralBeamlineError::Plot(
            "cannot plot an empty loss history".to_string(),
        ));
    }

    let epochs = history.len();
    let top = history
        .training_loss
        .iter()
        .chain(history.testing_loss.iter())
        .cloned()
        .fold(f32::MIN, f32::max)
        .max(1e-6)
        * 1.05;

    let root = BitMapBackend::new(path.as_ref(), (720, 560)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| NeuralBeamlineError::Plot(format!("backend error: {e}")))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(title, ("sans-serif", 24.0))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0..epochs.saturating_sub(1).max(1), 0.0_f32..top)
        .map_err(|e| NeuralBeamlineError::Plot(format!("chart build error: {e}")))?;

    chart
        .configure_mesh()
        .x_desc("epoch")
        .y_desc("loss")
        .draw()
        .map_err(|e| NeuralBeamlineError::Plot(format!("mesh error: {e}")))?;

    chart
        .draw_series(LineSeries::new(
            history.training_loss.iter().enumerate().map(|(i, &v)| (i, v)),
            &BLUE,
        ))
        .map_err(|e| NeuralBeamlineError::Plot(format!("draw error: {e}")))?
        .label("training loss")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            history.testing_loss.iter().enumerate().map(|(i, &v)| (i, v)),
            &RED,
        ))
        .map_err(|e| NeuralBeamlineError::Plot(format!("draw error: {e}")))?
        .label("testing loss")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| NeuralBeamlineError::Plot(format!("legend error: {e}")))?;

    root.present()
        .map_err(|e| NeuralBeamlineError::Plot(format!("render error: {e}")))?;

    Ok(())
}
