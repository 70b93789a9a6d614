//! Decoding flat backend vectors into values shaped by their set.

use serde::{Deserialize, Serialize};
use vela_expr::{ConstraintSet, SetShape};

use crate::error::Error;

/// Small dense matrix, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from nested rows; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(<[f64]>::to_vec)
            .collect()
    }

    pub fn is_symmetric(&self) -> bool {
        self.rows == self.cols
            && (0..self.rows)
                .all(|i| (0..i).all(|j| self.data[i * self.cols + j] == self.data[j * self.cols + i]))
    }
}

/// A primal or dual value attached to a variable or constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultValue {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(DenseMatrix),
}

impl ResultValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            ResultValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            ResultValue::Vector(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&DenseMatrix> {
        match self {
            ResultValue::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }
}

/// Shape `values` according to `set`.
///
/// Scalar sets give a number and vector sets pass the sequence through
/// untouched. `PositiveSemidefiniteConeTriangle(n)` holds the upper triangle
/// column by column and expands to a symmetric matrix;
/// `PositiveSemidefiniteConeSquare(n)` places element `k` at
/// `(k % n, k / n)` without symmetrizing.
pub fn decode(set: &ConstraintSet, values: Vec<f64>) -> Result<ResultValue, Error> {
    let expected = set.dimension();
    if values.len() != expected {
        return Err(Error::Decode {
            set: set.name(),
            expected,
            actual: values.len(),
        });
    }

    let value = match set.shape() {
        SetShape::Scalar => ResultValue::Scalar(values[0]),
        SetShape::Vector(_) => ResultValue::Vector(values),
        SetShape::SymmetricTriangle(n) => {
            let mut matrix = DenseMatrix::zeros(n, n);
            let mut k = 0;
            for col in 0..n {
                for row in 0..=col {
                    matrix.set(row, col, values[k]);
                    matrix.set(col, row, values[k]);
                    k += 1;
                }
            }
            ResultValue::Matrix(matrix)
        }
        SetShape::Square(n) => {
            let mut matrix = DenseMatrix::zeros(n, n);
            for (k, value) in values.into_iter().enumerate() {
                matrix.set(k % n, k / n, value);
            }
            ResultValue::Matrix(matrix)
        }
    };
    Ok(value)
}
