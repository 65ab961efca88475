//! Samples an analytic surrogate, corrects it against synthetic measurements
//! and prints both grids as JSON.
//!
//! Usage: `cargo run -p gridtune --example finetune [config.yaml]`

use std::path::Path;

use anyhow::Context;
use common::Buffer2;
use gridtune::{
    GridPlanes, GridSampler, GridTuneConfig, MeasurementTable, PredictorError,
    SurrogatePredictor, correct_grid,
};

/// Smooth bowl standing in for a trained model: `yield = 50 - (temp - 60)^2 / 40 - speed`.
struct BowlModel {
    features: Vec<String>,
    targets: Vec<String>,
}

impl SurrogatePredictor for BowlModel {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn target_names(&self) -> &[String] {
        &self.targets
    }

    fn predict(&self, inputs: &Buffer2<f64>) -> Result<Buffer2<f64>, PredictorError> {
        let data = inputs
            .rows()
            .map(|row| {
                let (temp, speed, offset) = (row[0], row[1], row[2]);
                50.0 - (temp - 60.0).powi(2) / 40.0 - speed + offset
            })
            .collect();
        Ok(Buffer2::new(1, inputs.height(), data))
    }
}

fn main() -> anyhow::Result<()> {
    common::log_setup::setup_logging("info", Path::new("logs"))?;

    let config = match std::env::args().nth(1) {
        Some(path) => GridTuneConfig::load(Path::new(&path))?,
        None => GridTuneConfig {
            correction: gridtune::CorrectionParams::new(8.0, 2.0),
            ..GridTuneConfig::default()
        },
    };

    let model = BowlModel {
        features: vec!["temp".into(), "speed".into(), "offset".into()],
        targets: vec!["yield".into()],
    };

    let mut table = MeasurementTable::new(["main_id", "temp", "speed", "yield"]);
    for (id, (temp, speed, measured)) in [
        (20.0, 1.0, 8.0),
        (45.0, 3.5, 46.0),
        (60.0, 2.0, 51.5),
        (75.0, 4.0, 40.0),
        (90.0, 5.0, 20.0),
    ]
    .into_iter()
    .enumerate()
    {
        table.push_row(&[id as f64, temp, speed, measured])?;
    }

    let sampler = GridSampler::new("temp", "speed", "yield")
        .with_constant("offset", 0.0)
        .with_config(&config.sampling);
    let grid = sampler.sample(
        &model,
        table.column_range("temp")?,
        table.column_range("speed")?,
    )?;

    let tuned = correct_grid(
        &grid,
        &table,
        "temp",
        "speed",
        "yield",
        &config.correction,
    )?;

    let changed = grid
        .values()
        .iter()
        .zip(tuned.values())
        .filter(|(a, b)| a != b)
        .count();
    tracing::info!("{} of {} cells changed", changed, grid.values().len());

    let out = serde_json::json!({
        "predicted": GridPlanes::from(&grid),
        "corrected": GridPlanes::from(&tuned),
    });
    println!(
        "{}",
        serde_json::to_string(&out).context("Failed to serialize grids")?
    );

    Ok(())
}
