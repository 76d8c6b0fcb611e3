//! Dense row-major matrix over f64.
//!
//! All storage is a flat `Vec<f64>` indexed as `data[row * cols + col]`.
//! Dimensions stay small in this workspace (state sizes of a few dozen),
//! so there is no blocking, no SIMD, and no allocation reuse.

use crate::error::StrandError;
use crate::Result;

/// Dense matrix, row-major storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Identity matrix of size n.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Build from nested row slices. All rows must have the same length.
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(StrandError::ShapeMismatch {
                    expected: vec![n_rows, n_cols],
                    got: vec![n_rows, row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// Build by evaluating `f(row, col)` at every position.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut m = Self::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                m.data[i * cols + j] = f(i, j);
            }
        }
        m
    }

    /// Column vector from a slice.
    pub fn column(v: &[f64]) -> Self {
        Self {
            rows: v.len(),
            cols: 1,
            data: v.to_vec(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.cols + col] = val;
    }

    /// Flat row-major view of the data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Matrix product `self @ other`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(StrandError::MatmulDimMismatch {
                m: self.rows,
                k1: self.cols,
                k2: other.rows,
                n: other.cols,
            });
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.at(i, k) * other.at(k, j);
                }
                out.data[i * other.cols + j] = sum;
            }
        }
        Ok(out)
    }

    /// Matrix-vector product `self @ v`.
    pub fn matvec(&self, v: &[f64]) -> Result<Vec<f64>> {
        if self.cols != v.len() {
            return Err(StrandError::MatmulDimMismatch {
                m: self.rows,
                k1: self.cols,
                k2: v.len(),
                n: 1,
            });
        }
        let mut out = vec![0.0; self.rows];
        for i in 0..self.rows {
            let mut sum = 0.0;
            for k in 0..self.cols {
                sum += self.at(i, k) * v[k];
            }
            out[i] = sum;
        }
        Ok(out)
    }

    /// Element-wise sum `self + other`.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(StrandError::ShapeMismatch {
                expected: vec![self.rows, self.cols],
                got: vec![other.rows, other.cols],
            });
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Scalar multiple `self * s`.
    pub fn scale(&self, s: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * s).collect(),
        }
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.at(i, j);
            }
        }
        out
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
    }

    /// Solve `self @ X = rhs` for X by Gaussian elimination with partial
    /// pivoting. `rhs` may carry multiple columns; X has the same shape.
    ///
    /// Fails with `SingularMatrix` when a pivot collapses below working
    /// precision, instead of letting NaNs propagate into the result.
    pub fn solve(&self, rhs: &Matrix) -> Result<Matrix> {
        let n = self.rows;
        if !self.is_square() {
            return Err(StrandError::ShapeMismatch {
                expected: vec![n, n],
                got: vec![self.rows, self.cols],
            });
        }
        if rhs.rows != n {
            return Err(StrandError::ShapeMismatch {
                expected: vec![n, rhs.cols],
                got: vec![rhs.rows, rhs.cols],
            });
        }

        let mut a = self.data.clone();
        let mut x = rhs.data.clone();
        let k_cols = rhs.cols;
        // Pivot threshold relative to the magnitude of the input matrix.
        let tol = f64::EPSILON * self.max_abs().max(1.0) * n as f64;

        // Forward elimination with row pivoting.
        for col in 0..n {
            let mut pivot_row = col;
            let mut pivot_val = a[col * n + col].abs();
            for r in (col + 1)..n {
                let v = a[r * n + col].abs();
                if v > pivot_val {
                    pivot_val = v;
                    pivot_row = r;
                }
            }
            if pivot_val <= tol {
                return Err(StrandError::SingularMatrix {
                    col,
                    pivot: pivot_val,
                });
            }
            if pivot_row != col {
                for j in 0..n {
                    a.swap(col * n + j, pivot_row * n + j);
                }
                for j in 0..k_cols {
                    x.swap(col * k_cols + j, pivot_row * k_cols + j);
                }
            }

            let pivot = a[col * n + col];
            for r in (col + 1)..n {
                let factor = a[r * n + col] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in col..n {
                    a[r * n + j] -= factor * a[col * n + j];
                }
                for j in 0..k_cols {
                    x[r * k_cols + j] -= factor * x[col * k_cols + j];
                }
            }
        }

        // Back substitution.
        for col in (0..n).rev() {
            let pivot = a[col * n + col];
            for j in 0..k_cols {
                let mut sum = x[col * k_cols + j];
                for k in (col + 1)..n {
                    sum -= a[col * n + k] * x[k * k_cols + j];
                }
                x[col * k_cols + j] = sum / pivot;
            }
        }

        Ok(Matrix {
            rows: n,
            cols: k_cols,
            data: x,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matmul() {
        let i = Matrix::identity(3);
        let a = Matrix::from_fn(3, 3, |r, c| (r * 3 + c) as f64);
        let prod = i.matmul(&a).unwrap();
        assert_eq!(prod, a);
    }

    #[test]
    fn test_matmul_dim_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);
        assert!(matches!(
            a.matmul(&b),
            Err(StrandError::MatmulDimMismatch { .. })
        ));
    }

    #[test]
    fn test_matvec() {
        let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
        let y = a.matvec(&[1.0, 1.0]).unwrap();
        assert_eq!(y, vec![3.0, 7.0]);
    }

    #[test]
    fn test_transpose() {
        let a = Matrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
        let t = a.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.at(0, 1), 4.0);
        assert_eq!(t.at(2, 0), 3.0);
    }

    #[test]
    fn test_solve_2x2() {
        // [[2, 1], [1, 3]] x = [3, 5] → x = [4/5, 7/5]
        let a = Matrix::from_rows(&[&[2.0, 1.0], &[1.0, 3.0]]).unwrap();
        let rhs = Matrix::column(&[3.0, 5.0]);
        let x = a.solve(&rhs).unwrap();
        assert!((x.at(0, 0) - 0.8).abs() < 1e-12, "got {}", x.at(0, 0));
        assert!((x.at(1, 0) - 1.4).abs() < 1e-12, "got {}", x.at(1, 0));
    }

    #[test]
    fn test_solve_needs_pivoting() {
        // Zero on the leading diagonal forces a row swap.
        let a = Matrix::from_rows(&[&[0.0, 1.0], &[1.0, 0.0]]).unwrap();
        let rhs = Matrix::column(&[2.0, 3.0]);
        let x = a.solve(&rhs).unwrap();
        assert!((x.at(0, 0) - 3.0).abs() < 1e-12);
        assert!((x.at(1, 0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_multi_rhs_inverse() {
        let a = Matrix::from_rows(&[&[4.0, 7.0], &[2.0, 6.0]]).unwrap();
        let inv = a.solve(&Matrix::identity(2)).unwrap();
        let prod = a.matmul(&inv).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (prod.at(i, j) - expected).abs() < 1e-12,
                    "A @ A^-1 at ({i},{j}) = {}",
                    prod.at(i, j)
                );
            }
        }
    }

    #[test]
    fn test_solve_singular() {
        let a = Matrix::from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]).unwrap();
        let rhs = Matrix::column(&[1.0, 2.0]);
        assert!(matches!(
            a.solve(&rhs),
            Err(StrandError::SingularMatrix { .. })
        ));
    }
}
