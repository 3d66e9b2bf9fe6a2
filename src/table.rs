//! Column-oriented numeric tables holding the raw inputs of a discrete choice model.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use nalgebra::{DMatrix, DVectorView, DVectorViewMut};
use serde::{Deserialize, Serialize};

use crate::error::{DcmError, Result};

/// A dense table of real-valued points.
///
/// Each entry (point) is stored as one column of the underlying matrix, so the
/// attributes of a single entry are contiguous in memory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    data: DMatrix<f64>,
}

impl Table {
    /// Creates a table of `n_entries` points with `n_attributes` zeros each.
    pub fn zeros(n_attributes: usize, n_entries: usize) -> Self {
        Self {
            data: DMatrix::zeros(n_attributes, n_entries),
        }
    }

    /// Wraps an attribute-by-entry matrix.
    pub fn from_matrix(data: DMatrix<f64>) -> Self {
        Self { data }
    }

    /// Builds a table from a flat slice listing each point's attributes in turn.
    pub fn from_points(n_attributes: usize, values: &[f64]) -> Result<Self> {
        if n_attributes == 0 {
            return Err(DcmError::dimension_mismatch("table attributes", 1, 0));
        }
        if values.len() % n_attributes != 0 {
            let padded = values.len().div_ceil(n_attributes) * n_attributes;
            return Err(DcmError::dimension_mismatch(
                "flattened table values",
                padded,
                values.len(),
            ));
        }
        let n_entries = values.len() / n_attributes;
        Ok(Self {
            data: DMatrix::from_column_slice(n_attributes, n_entries, values),
        })
    }

    /// Builds a single-attribute table, one entry per value.
    pub fn from_column(values: &[f64]) -> Self {
        Self {
            data: DMatrix::from_row_slice(1, values.len(), values),
        }
    }

    /// Number of points in the table.
    pub fn n_entries(&self) -> usize {
        self.data.ncols()
    }

    /// Number of attributes per point.
    pub fn n_attributes(&self) -> usize {
        self.data.nrows()
    }

    /// Returns a read-only view of the `index`-th point.
    pub fn get(&self, index: usize) -> DVectorView<'_, f64> {
        self.data.column(index)
    }

    /// Returns a mutable view of the `index`-th point.
    pub fn get_mut(&mut self, index: usize) -> DVectorViewMut<'_, f64> {
        self.data.column_mut(index)
    }

    /// Returns the underlying attribute-by-entry matrix.
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Writes the table to `path` as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Reads a table previously written by [`Table::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
