//! Continuous and discrete linear systems, and the bilinear transform
//! between them.
//!
//! A `LinearSystem` holds the continuous-time parameters (A, B, C) of
//! `x'(t) = A x(t) + B u(t), y(t) = C x(t)`. `discretize` converts it to a
//! `DiscreteSystem` (Ab, Bb, Cb) at a given step size via the bilinear
//! (Tustin) transform, the same discretization the S4 line of models uses
//! for its recurrent view.

use strand_core::{Matrix, Result, StrandError};

/// Continuous-time linear dynamical system.
///
/// Invariant (checked at construction): A is N×N, B is N×1, C is 1×N.
/// Immutable once built.
#[derive(Clone, Debug)]
pub struct LinearSystem {
    pub a: Matrix,
    pub b: Matrix,
    pub c: Matrix,
}

impl LinearSystem {
    /// Build a system, validating that the three shapes are mutually
    /// consistent.
    pub fn new(a: Matrix, b: Matrix, c: Matrix) -> Result<Self> {
        let n = a.rows();
        if !a.is_square() {
            return Err(StrandError::ShapeMismatch {
                expected: vec![n, n],
                got: vec![a.rows(), a.cols()],
            });
        }
        if b.rows() != n || b.cols() != 1 {
            return Err(StrandError::ShapeMismatch {
                expected: vec![n, 1],
                got: vec![b.rows(), b.cols()],
            });
        }
        if c.rows() != 1 || c.cols() != n {
            return Err(StrandError::ShapeMismatch {
                expected: vec![1, n],
                got: vec![c.rows(), c.cols()],
            });
        }
        Ok(Self { a, b, c })
    }

    /// State dimension N.
    pub fn state_dim(&self) -> usize {
        self.a.rows()
    }
}

/// Discrete-time counterpart of a `LinearSystem` at a fixed step size.
///
/// Derived deterministically by `discretize`; recompute when the system or
/// the step changes.
#[derive(Clone, Debug)]
pub struct DiscreteSystem {
    pub ab: Matrix,
    pub bb: Matrix,
    pub cb: Matrix,
    pub step: f64,
}

impl DiscreteSystem {
    /// State dimension N.
    pub fn state_dim(&self) -> usize {
        self.ab.rows()
    }
}

/// Bilinear (Tustin) discretization.
///
/// With `BL = (I - step/2 · A)^-1`:
///
/// ```text
/// Ab = BL · (I + step/2 · A)
/// Bb = step · BL · B
/// Cb = C
/// ```
///
/// Both products are computed as pivoted solves against `(I - step/2 · A)`
/// rather than through an explicit inverse; a degenerate (A, step)
/// combination surfaces as `SingularMatrix` from the solve, never as NaNs
/// in the output.
///
/// As `step → 0`, `Ab → I` and the recurrence converges to the Euler
/// approximation of the continuous system.
pub fn discretize(sys: &LinearSystem, step: f64) -> Result<DiscreteSystem> {
    if !(step > 0.0) {
        return Err(StrandError::InvalidStep { step });
    }

    let n = sys.state_dim();
    let half = step / 2.0;
    let eye = Matrix::identity(n);

    // lhs = I - step/2 A, rhs = I + step/2 A
    let lhs = eye.add(&sys.a.scale(-half))?;
    let rhs = eye.add(&sys.a.scale(half))?;

    let ab = lhs.solve(&rhs)?;
    let bb = lhs.solve(&sys.b.scale(step))?;

    Ok(DiscreteSystem {
        ab,
        bb,
        cb: sys.c.clone(),
        step,
    })
}
