//! Gridtune - correction of surrogate prediction grids against real measurements.
//!
//! A surrogate model is sampled over a rectangular window into a
//! [`PredictionGrid`]; [`correct_grid`] then pulls every grid cell toward the
//! real measurements within a search radius using inverse-distance-weighted
//! residuals. Cells with no nearby measurement keep the surrogate's value.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gridtune::{CorrectionParams, GridSampler, MeasurementTable, correct_grid};
//!
//! let grid = GridSampler::new("temp", "speed", "yield")
//!     .with_constant("pressure", 101.3)
//!     .sample(&model, table.column_range("temp")?, table.column_range("speed")?)?;
//!
//! let tuned = correct_grid(&grid, &table, "temp", "speed", "yield", &CorrectionParams::default())?;
//! ```

pub mod axis;
pub mod config;
pub mod correction;
pub mod error;
pub mod grid;
pub mod sampling;
pub mod spatial;
pub mod table;

pub use axis::{Axis, AxisData, AxisVectors, normalize_axes};
pub use config::{GridTuneConfig, SamplingConfig};
pub use correction::{
    CorrectionParams, IdwCorrector, WEIGHT_DISTANCE_FLOOR, correct_grid, correct_planes,
    idw_weight,
};
pub use error::{Error, ErrorKind, PredictorError, Result};
pub use grid::{GridPlanes, PredictionGrid};
pub use sampling::{DEFAULT_RESOLUTION, GridSampler, SurrogatePredictor, linspace};
pub use spatial::{KdTree, Neighbor};
pub use table::{CONSTANT_FILTER_TOLERANCE, MeasurementTable};
