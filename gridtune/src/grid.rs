//! Prediction grid container and its serialized plane form.

use common::Buffer2;
use serde::{Deserialize, Serialize};

use crate::axis::{Axis, AxisData, AxisVectors, buffer_from_rows, normalize_axes};
use crate::error::{Error, Result};

/// Rectangular grid of surrogate predictions.
///
/// `values` is `(height, width)`: row `i` lies at `y[i]`, column `j` at `x[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionGrid {
    x: Axis,
    y: Axis,
    values: Buffer2<f64>,
}

impl PredictionGrid {
    /// Shapes are not checked here; see [`PredictionGrid::axis_vectors`].
    pub fn new(x: impl Into<Axis>, y: impl Into<Axis>, values: Buffer2<f64>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            values,
        }
    }

    /// Builds a grid from axis vectors and nested value rows.
    pub fn from_rows(x: Vec<f64>, y: Vec<f64>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let values = buffer_from_rows(rows, "Z")?;
        Ok(Self::new(x, y, values))
    }

    pub fn x(&self) -> &Axis {
        &self.x
    }

    pub fn y(&self) -> &Axis {
        &self.y
    }

    pub fn values(&self) -> &Buffer2<f64> {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.values.width()
    }

    pub fn height(&self) -> usize {
        self.values.height()
    }

    /// `(height, width)` of the value matrix.
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Value at row `row`, column `col`.
    pub fn value(&self, row: usize, col: usize) -> f64 {
        *self.values.get(col, row)
    }

    /// Canonical coordinate vectors, checked against the value matrix.
    pub fn axis_vectors(&self) -> Result<AxisVectors> {
        normalize_axes(&self.x, &self.y, &self.values)
    }

    /// Copy of this grid with the axes kept and the values replaced.
    pub(crate) fn with_values(&self, values: Buffer2<f64>) -> Self {
        debug_assert_eq!(values.shape(), self.values.shape());
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            values,
        }
    }
}

/// Loose `{X, Y, Z}` form of a grid as exchanged with the presentation layer.
///
/// Any plane may be absent; conversion to [`PredictionGrid`] reports which.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPlanes {
    #[serde(rename = "X", default, skip_serializing_if = "Option::is_none")]
    pub x: Option<AxisData>,
    #[serde(rename = "Y", default, skip_serializing_if = "Option::is_none")]
    pub y: Option<AxisData>,
    #[serde(rename = "Z", default, skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<Vec<f64>>>,
}

impl TryFrom<GridPlanes> for PredictionGrid {
    type Error = Error;

    fn try_from(planes: GridPlanes) -> Result<Self> {
        let x = planes.x.ok_or_else(|| Error::missing_field("X", "grid"))?;
        let y = planes.y.ok_or_else(|| Error::missing_field("Y", "grid"))?;
        let z = planes.z.ok_or_else(|| Error::missing_field("Z", "grid"))?;

        Ok(Self {
            x: x.into_axis("X")?,
            y: y.into_axis("Y")?,
            values: buffer_from_rows(z, "Z")?,
        })
    }
}

impl From<&PredictionGrid> for GridPlanes {
    fn from(grid: &PredictionGrid) -> Self {
        Self {
            x: Some(AxisData::from(&grid.x)),
            y: Some(AxisData::from(&grid.y)),
            z: Some(grid.values.to_rows()),
        }
    }
}
