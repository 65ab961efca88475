//! Sampling a surrogate model over a rectangular design window.

use common::Buffer2;

use crate::config::SamplingConfig;
use crate::error::{Error, PredictorError, Result};
use crate::grid::PredictionGrid;

pub const DEFAULT_RESOLUTION: usize = 50;

/// A fitted model that maps feature rows to target rows.
///
/// The model itself (architecture, scaling, persistence) is opaque here.
pub trait SurrogatePredictor {
    /// Input columns, in the order `predict` expects them.
    fn feature_names(&self) -> &[String];

    /// Output columns, in the order `predict` returns them.
    fn target_names(&self) -> &[String];

    /// `inputs` has one row per sample and `feature_names().len()` columns.
    /// Must return one row per sample with `target_names().len()` columns.
    fn predict(&self, inputs: &Buffer2<f64>)
    -> std::result::Result<Buffer2<f64>, PredictorError>;
}

/// `n` evenly spaced values from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FeatureSource {
    X,
    Y,
    Constant(f64),
}

/// Builds a [`PredictionGrid`] for one target over two varying features,
/// holding every other feature at a constant.
#[derive(Debug, Clone)]
pub struct GridSampler {
    x_field: String,
    y_field: String,
    z_field: String,
    constants: Vec<(String, f64)>,
    resolution: usize,
}

impl GridSampler {
    pub fn new(
        x_field: impl Into<String>,
        y_field: impl Into<String>,
        z_field: impl Into<String>,
    ) -> Self {
        Self {
            x_field: x_field.into(),
            y_field: y_field.into(),
            z_field: z_field.into(),
            constants: Vec::new(),
            resolution: DEFAULT_RESOLUTION,
        }
    }

    /// Fixes a non-axis feature. A later value for the same name wins.
    pub fn with_constant(mut self, name: impl Into<String>, value: f64) -> Self {
        let name = name.into();
        self.constants.retain(|(n, _)| *n != name);
        self.constants.push((name, value));
        self
    }

    /// Number of samples along each axis.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Applies resolution and constants from a config section.
    pub fn with_config(self, config: &SamplingConfig) -> Self {
        config
            .constants
            .iter()
            .fold(self.with_resolution(config.resolution), |sampler, (name, &value)| {
                sampler.with_constant(name.clone(), value)
            })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Evaluates `predictor` on a `resolution x resolution` lattice spanning
    /// `x_range` and `y_range` and returns the `z_field` target as a grid with
    /// `values[row = y][col = x]`.
    pub fn sample<P: SurrogatePredictor + ?Sized>(
        &self,
        predictor: &P,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Result<PredictionGrid> {
        if self.resolution == 0 {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: 0.0,
            });
        }
        for (name, (lo, hi)) in [("x_range", x_range), ("y_range", y_range)] {
            if let Some(value) = [lo, hi].into_iter().find(|v| !v.is_finite()) {
                return Err(Error::InvalidParameter { name, value });
            }
        }

        let sources = self.feature_sources(predictor.feature_names())?;
        let z_idx = predictor
            .target_names()
            .iter()
            .position(|t| *t == self.z_field)
            .ok_or_else(|| Error::missing_field(self.z_field.clone(), "surrogate targets"))?;

        let n = self.resolution;
        let x = linspace(x_range.0, x_range.1, n);
        let y = linspace(y_range.0, y_range.1, n);

        let mut inputs = Vec::with_capacity(n * n * sources.len());
        for &yv in &y {
            for &xv in &x {
                inputs.extend(sources.iter().map(|source| match *source {
                    FeatureSource::X => xv,
                    FeatureSource::Y => yv,
                    FeatureSource::Constant(c) => c,
                }));
            }
        }
        let inputs = Buffer2::new(sources.len(), n * n, inputs);

        tracing::debug!(
            "Sampling surrogate on {}x{} lattice with {} features",
            n,
            n,
            sources.len()
        );

        let outputs = predictor
            .predict(&inputs)
            .map_err(|source| Error::Predictor { source })?;

        if outputs.height() != n * n {
            return Err(Error::DimensionMismatch {
                axis: "prediction rows",
                expected: n * n,
                actual: outputs.height(),
            });
        }
        let target_count = predictor.target_names().len();
        if outputs.width() != target_count {
            return Err(Error::DimensionMismatch {
                axis: "prediction columns",
                expected: target_count,
                actual: outputs.width(),
            });
        }

        let values = Buffer2::new(n, n, outputs.column(z_idx));

        tracing::info!(
            "Sampled '{}' over {} in [{}, {}] x {} in [{}, {}]",
            self.z_field,
            self.x_field,
            x_range.0,
            x_range.1,
            self.y_field,
            y_range.0,
            y_range.1
        );

        Ok(PredictionGrid::new(x, y, values))
    }

    fn feature_sources(&self, features: &[String]) -> Result<Vec<FeatureSource>> {
        features
            .iter()
            .map(|feature| {
                if *feature == self.x_field {
                    Ok(FeatureSource::X)
                } else if *feature == self.y_field {
                    Ok(FeatureSource::Y)
                } else {
                    self.constants
                        .iter()
                        .find(|(name, _)| name == feature)
                        .map(|&(_, value)| FeatureSource::Constant(value))
                        .ok_or_else(|| Error::missing_field(feature.clone(), "sampling inputs"))
                }
            })
            .collect()
    }
}
