//! Inverse-distance-weighted residual correction of a prediction grid.
//!
//! Each grid cell is pulled toward the real measurements within `radius` of
//! it by the weighted mean of their residuals `z_k - v`. Cells with no
//! measurement in range keep their predicted value exactly.

use common::Buffer2;
use common::parallel::ParRowsMutAuto;
use glam::DVec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::axis::AxisVectors;
use crate::error::{Error, Result};
use crate::grid::{GridPlanes, PredictionGrid};
use crate::spatial::{KdTree, Neighbor};
use crate::table::MeasurementTable;


/// Distances below this are clamped, so a measurement sitting on a grid node
/// gets weight `1 / WEIGHT_DISTANCE_FLOOR` instead of dividing by zero.
pub const WEIGHT_DISTANCE_FLOOR: f64 = common::EPSILON;

/// Neighborhood and decay settings for the correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionParams {
    /// Search radius in the shared (x, y) units of grid and measurements.
    pub radius: f64,
    /// Distance decay exponent.
    pub power: f64,
}

impl Default for CorrectionParams {
    fn default() -> Self {
        Self {
            radius: 0.1,
            power: 2.0,
        }
    }
}

impl CorrectionParams {
    pub fn new(radius: f64, power: f64) -> Self {
        Self { radius, power }
    }

    /// Both values must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("radius", self.radius), ("power", self.power)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Weight of a measurement at `distance` from a grid node.
#[inline]
pub fn idw_weight(distance: f64, power: f64) -> f64 {
    if distance < WEIGHT_DISTANCE_FLOOR {
        1.0 / WEIGHT_DISTANCE_FLOOR
    } else {
        1.0 / distance.powf(power)
    }
}

/// Spatial index over one measurement set, reusable across grids.
#[derive(Debug)]
pub struct IdwCorrector {
    tree: KdTree,
    z: Vec<f64>,
    params: CorrectionParams,
}

impl IdwCorrector {
    /// Validates `params`, reads the three named columns and indexes the
    /// measurement coordinates.
    pub fn new(
        measurements: &MeasurementTable,
        x_field: &str,
        y_field: &str,
        z_field: &str,
        params: CorrectionParams,
    ) -> Result<Self> {
        params.validate()?;

        let xs = measurements.column(x_field)?;
        let ys = measurements.column(y_field)?;
        let z = measurements.column(z_field)?.to_vec();

        let points: Vec<DVec2> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| DVec2::new(x, y))
            .collect();
        let tree = KdTree::build(&points)?;

        Ok(Self { tree, z, params })
    }

    pub fn params(&self) -> &CorrectionParams {
        &self.params
    }

    pub fn measurement_count(&self) -> usize {
        self.tree.len()
    }

    /// Returns a corrected copy of `grid`; the input is left untouched.
    ///
    /// Fails with [`Error::DimensionMismatch`] before any cell is visited if the
    /// axes don't match the value matrix.
    pub fn correct(&self, grid: &PredictionGrid) -> Result<PredictionGrid> {
        let axes = grid.axis_vectors()?;
        Ok(self.correct_normalized(grid, &axes))
    }

    /// [`IdwCorrector::correct`] for axes already checked against `grid`.
    fn correct_normalized(&self, grid: &PredictionGrid, axes: &AxisVectors) -> PredictionGrid {
        if self.tree.is_empty() {
            tracing::debug!("No measurements to correct against, grid returned unchanged");
            return grid.clone();
        }

        let mut values = grid.values().clone();
        let corrected_cells = self.correct_values(axes, &mut values);

        tracing::debug!(
            "Corrected {} of {} grid cells from {} measurements",
            corrected_cells,
            values.len(),
            self.tree.len()
        );

        grid.with_values(values)
    }

    /// Corrects every cell in place and returns how many were changed.
    fn correct_values(&self, axes: &AxisVectors, values: &mut Buffer2<f64>) -> usize {
        let width = values.width();
        if values.is_empty() {
            return 0;
        }

        values
            .data_mut()
            .par_rows_mut_auto(width)
            .map(|(chunk_start_row, chunk)| {
                let mut neighbors = Vec::new();
                let mut corrected = 0;
                for (local_row, row) in chunk.chunks_exact_mut(width).enumerate() {
                    let y = axes.y[chunk_start_row + local_row];
                    for (value, &x) in row.iter_mut().zip(&axes.x) {
                        if let Some(new_value) =
                            self.correct_cell(DVec2::new(x, y), *value, &mut neighbors)
                        {
                            *value = new_value;
                            corrected += 1;
                        }
                    }
                }
                corrected
            })
            .sum()
    }

    /// Corrected value for one node, or `None` when no measurement is in range
    /// or every weight underflowed to zero.
    fn correct_cell(&self, node: DVec2, value: f64, neighbors: &mut Vec<Neighbor>) -> Option<f64> {
        self.tree.radius_neighbors_into(node, self.params.radius, neighbors);
        if neighbors.is_empty() {
            return None;
        }

        let mut weighted_residual_sum = 0.0;
        let mut total_weight = 0.0;
        for neighbor in neighbors.iter() {
            let weight = idw_weight(neighbor.dist_sq.sqrt(), self.params.power);
            weighted_residual_sum += weight * (self.z[neighbor.index] - value);
            total_weight += weight;
        }

        // distance^power can overflow to infinity for large powers, leaving zero weights
        if total_weight <= 0.0 {
            return None;
        }

        Some(value + weighted_residual_sum / total_weight)
    }
}

/// Blends `grid` with nearby real measurements and returns the corrected copy.
///
/// Validation happens up front in this order: parameters, measurement columns,
/// grid shape. An empty measurement set is not an error and returns an
/// identical copy of `grid`.
pub fn correct_grid(
    grid: &PredictionGrid,
    measurements: &MeasurementTable,
    x_field: &str,
    y_field: &str,
    z_field: &str,
    params: &CorrectionParams,
) -> Result<PredictionGrid> {
    params.validate()?;
    for field in [x_field, y_field, z_field] {
        measurements.column(field)?;
    }
    let (height, width) = grid.shape();
    let axes = grid.axis_vectors()?;

    tracing::info!(
        "Correcting {}x{} grid with {} measurements (radius {}, power {})",
        height,
        width,
        measurements.len(),
        params.radius,
        params.power
    );

    if measurements.is_empty() {
        tracing::warn!("Measurement set is empty, correction is a no-op");
        return Ok(grid.clone());
    }

    let corrector = IdwCorrector::new(measurements, x_field, y_field, z_field, *params)?;
    Ok(corrector.correct_normalized(grid, &axes))
}

/// [`correct_grid`] over the loose `{X, Y, Z}` form.
///
/// Missing planes are reported as [`Error::MissingField`]. Axes keep the
/// representation they came in with.
pub fn correct_planes(
    planes: GridPlanes,
    measurements: &MeasurementTable,
    x_field: &str,
    y_field: &str,
    z_field: &str,
    params: &CorrectionParams,
) -> Result<GridPlanes> {
    let grid = PredictionGrid::try_from(planes)?;
    let corrected = correct_grid(&grid, measurements, x_field, y_field, z_field, params)?;
    Ok(GridPlanes::from(&corrected))
}
