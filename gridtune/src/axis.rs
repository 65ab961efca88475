//! Axis coordinates in either vector or mesh-grid form, and their normalization.

use common::Buffer2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Coordinates of one grid axis.
///
/// A mesh is the 2D `(height, width)` coordinate matrix produced by a mesh-grid
/// expansion: every row of an X mesh is identical, every column of a Y mesh is
/// identical.
#[derive(Debug, Clone, PartialEq)]
pub enum Axis {
    Vector(Vec<f64>),
    Mesh(Buffer2<f64>),
}

impl Axis {
    /// X coordinate per column. Takes row 0 of a mesh.
    pub fn x_vector(&self) -> Vec<f64> {
        match self {
            Axis::Vector(v) => v.clone(),
            Axis::Mesh(mesh) if mesh.height() == 0 => Vec::new(),
            Axis::Mesh(mesh) => mesh.row(0).to_vec(),
        }
    }

    /// Y coordinate per row. Takes column 0 of a mesh.
    pub fn y_vector(&self) -> Vec<f64> {
        match self {
            Axis::Vector(v) => v.clone(),
            Axis::Mesh(mesh) if mesh.width() == 0 => Vec::new(),
            Axis::Mesh(mesh) => mesh.column(0),
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self, Axis::Mesh(_))
    }
}

impl From<Vec<f64>> for Axis {
    fn from(v: Vec<f64>) -> Self {
        Axis::Vector(v)
    }
}

/// Canonical per-axis coordinate vectors of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisVectors {
    /// One entry per column.
    pub x: Vec<f64>,
    /// One entry per row.
    pub y: Vec<f64>,
}

/// Reduces both axes to 1D vectors and checks them against the value matrix.
///
/// Fails with [`Error::DimensionMismatch`] when the X vector length differs from
/// the matrix width or the Y vector length differs from its height.
pub fn normalize_axes(x: &Axis, y: &Axis, values: &Buffer2<f64>) -> Result<AxisVectors> {
    let x = x.x_vector();
    let y = y.y_vector();

    if x.len() != values.width() {
        return Err(Error::DimensionMismatch {
            axis: "X",
            expected: values.width(),
            actual: x.len(),
        });
    }
    if y.len() != values.height() {
        return Err(Error::DimensionMismatch {
            axis: "Y",
            expected: values.height(),
            actual: y.len(),
        });
    }

    Ok(AxisVectors { x, y })
}

/// Builds a row-major buffer from nested rows, rejecting ragged input.
pub(crate) fn buffer_from_rows(rows: Vec<Vec<f64>>, plane: &'static str) -> Result<Buffer2<f64>> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);

    let mut data = Vec::with_capacity(width * height);
    for row in rows {
        if row.len() != width {
            return Err(Error::DimensionMismatch {
                axis: plane,
                expected: width,
                actual: row.len(),
            });
        }
        data.extend(row);
    }

    Ok(Buffer2::new(width, height, data))
}

/// Serialized form of an axis: a flat list or a nested matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisData {
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl AxisData {
    pub(crate) fn into_axis(self, plane: &'static str) -> Result<Axis> {
        match self {
            AxisData::Vector(v) => Ok(Axis::Vector(v)),
            AxisData::Matrix(rows) => Ok(Axis::Mesh(buffer_from_rows(rows, plane)?)),
        }
    }
}

impl From<&Axis> for AxisData {
    fn from(axis: &Axis) -> Self {
        match axis {
            Axis::Vector(v) => AxisData::Vector(v.clone()),
            Axis::Mesh(mesh) => AxisData::Matrix(mesh.to_rows()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn mesh_x(x: &[f64], height: usize) -> Axis {
        let data = (0..height).flat_map(|_| x.iter().copied()).collect();
        Axis::Mesh(Buffer2::new(x.len(), height, data))
    }

    fn mesh_y(y: &[f64], width: usize) -> Axis {
        let data = y
            .iter()
            .flat_map(|&v| std::iter::repeat_n(v, width))
            .collect();
        Axis::Mesh(Buffer2::new(width, y.len(), data))
    }

    #[test]
    fn test_vector_passes_through() {
        let axis = Axis::from(vec![0.0, 0.5, 1.0]);
        assert_eq!(axis.x_vector(), vec![0.0, 0.5, 1.0]);
        assert_eq!(axis.y_vector(), vec![0.0, 0.5, 1.0]);
        assert!(!axis.is_mesh());
    }

    #[test]
    fn test_mesh_x_takes_first_row() {
        let axis = mesh_x(&[1.0, 2.0, 3.0], 4);
        assert_eq!(axis.x_vector(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_mesh_y_takes_first_column() {
        let axis = mesh_y(&[10.0, 20.0], 3);
        assert_eq!(axis.y_vector(), vec![10.0, 20.0]);
    }

    #[test]
    fn test_normalize_mesh_matches_vector() {
        let values = Buffer2::new_filled(3, 2, 0.0);
        let from_vectors = normalize_axes(
            &Axis::from(vec![0.0, 1.0, 2.0]),
            &Axis::from(vec![0.0, 1.0]),
            &values,
        )
        .unwrap();
        let from_mesh = normalize_axes(
            &mesh_x(&[0.0, 1.0, 2.0], 2),
            &mesh_y(&[0.0, 1.0], 3),
            &values,
        )
        .unwrap();
        assert_eq!(from_vectors, from_mesh);
    }

    #[test]
    fn test_normalize_rejects_wrong_x_length() {
        let values = Buffer2::new_filled(3, 2, 0.0);
        let err = normalize_axes(
            &Axis::from(vec![0.0, 1.0, 2.0, 3.0]),
            &Axis::from(vec![0.0, 1.0]),
            &values,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                axis: "X",
                expected: 3,
                actual: 4
            }
        ));
    }

    #[test]
    fn test_normalize_rejects_wrong_y_length() {
        let values = Buffer2::new_filled(3, 2, 0.0);
        let err = normalize_axes(
            &Axis::from(vec![0.0, 1.0, 2.0]),
            &Axis::from(vec![0.0]),
            &values,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { axis: "Y", .. }));
    }

    #[test]
    fn test_transposed_mesh_is_rejected() {
        // X mesh shaped (width, height) instead of (height, width)
        let values = Buffer2::new_filled(3, 2, 0.0);
        let err = normalize_axes(
            &mesh_x(&[0.0, 1.0], 3),
            &Axis::from(vec![0.0, 1.0]),
            &values,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { axis: "X", .. }));
    }

    #[test]
    fn test_buffer_from_rows_rejects_ragged() {
        let err = buffer_from_rows(vec![vec![1.0, 2.0], vec![3.0]], "Z").unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                axis: "Z",
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_axis_data_untagged_shapes() {
        let flat: AxisData = serde_json::from_str("[0.0, 1.0]").unwrap();
        assert_eq!(flat, AxisData::Vector(vec![0.0, 1.0]));

        let nested: AxisData = serde_json::from_str("[[0.0, 1.0], [0.0, 1.0]]").unwrap();
        let axis = nested.into_axis("X").unwrap();
        assert!(axis.is_mesh());
        assert_eq!(axis.x_vector(), vec![0.0, 1.0]);
    }
}
