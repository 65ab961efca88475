//! Column-oriented table of real measurements.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Absolute tolerance used when matching a constant filter value.
pub const CONSTANT_FILTER_TOLERANCE: f64 = 1e-9;

/// Named `f64` columns of equal length. Row order is preserved by every operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl MeasurementTable {
    /// Empty table with the given column names.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let columns = vec![Vec::new(); names.len()];
        Self { names, columns }
    }

    /// Builds a table from `(name, values)` pairs; all columns must have the same length.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Vec<f64>)>,
    ) -> Result<Self> {
        let mut table = Self::default();
        for (name, values) in columns {
            if let Some(first) = table.columns.first()
                && first.len() != values.len()
            {
                return Err(Error::DimensionMismatch {
                    axis: "measurement column",
                    expected: first.len(),
                    actual: values.len(),
                });
            }
            table.names.push(name.into());
            table.columns.push(values);
        }
        Ok(table)
    }

    /// Appends one row, values in column order.
    pub fn push_row(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.names.len() {
            return Err(Error::DimensionMismatch {
                axis: "measurement row",
                expected: self.names.len(),
                actual: values.len(),
            });
        }
        for (column, &value) in self.columns.iter_mut().zip(values) {
            column.push(value);
        }
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.position(name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| Error::missing_field(name, "measurement table"))
    }

    /// Rows whose `name` column equals `value` within [`CONSTANT_FILTER_TOLERANCE`].
    pub fn filter_constant(&self, name: &str, value: f64) -> Result<Self> {
        let keep: Vec<bool> = self
            .column(name)?
            .iter()
            .map(|&v| (v - value).abs() <= CONSTANT_FILTER_TOLERANCE)
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|column| {
                column
                    .iter()
                    .zip(&keep)
                    .filter_map(|(&v, &k)| k.then_some(v))
                    .collect()
            })
            .collect();

        Ok(Self {
            names: self.names.clone(),
            columns,
        })
    }

    /// `(min, max)` over the finite values of a column.
    pub fn column_range(&self, name: &str) -> Result<(f64, f64)> {
        self.column(name)?
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or_else(|| Error::EmptyRange {
                column: name.to_string(),
            })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
