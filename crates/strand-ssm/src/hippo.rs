//! HiPPO (High-order Polynomial Projection Operators) transition matrix.
//!
//! Constructs the HiPPO-LegS state matrix in its normalized basis: the
//! transition under which the hidden state tracks the coefficients of a
//! Legendre-polynomial approximation of the input's history. Used as the
//! initializer for the trainable layer's A.

use strand_core::Matrix;

/// The N×N HiPPO-LegS matrix.
///
/// With `p[i] = sqrt(1 + 2i)`:
///
/// ```text
/// A = -(tril(p pᵀ) - diag(0, 1, ..., N-1))
/// ```
///
/// so entries below the diagonal are `-sqrt((1+2i)(1+2j))`, the diagonal is
/// `-(i+1)`, and everything above is zero. Pure and deterministic.
pub fn make_hippo(n: usize) -> Matrix {
    let p: Vec<f64> = (0..n).map(|i| (1.0 + 2.0 * i as f64).sqrt()).collect();
    Matrix::from_fn(n, n, |i, j| {
        if i > j {
            -p[i] * p[j]
        } else if i == j {
            -(p[i] * p[i] - i as f64)
        } else {
            0.0
        }
    })
}
