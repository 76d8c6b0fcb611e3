//! Impulse-response kernel of a discrete system — the "CNN mode" weights.
//!
//! `k[l] = Cb · Ab^l · Bb`: the output the recurrence would produce for a
//! unit impulse. Convolving any input with this kernel reproduces the
//! recurrent evaluation (see [`crate::duality`]).
//!
//! The construction is the naive one: the powers of Ab are materialized by
//! repeated multiplication. For large L, or whenever the spectral radius of
//! Ab reaches 1, the powers overflow or underflow. That is a known
//! limitation of this basis, not something this module tries to repair;
//! non-finite intermediate values surface as `NumericOverflow`.

use strand_core::{Result, StrandError};

use crate::system::DiscreteSystem;

/// Build the length-`len` impulse-response kernel of `sys`.
///
/// Computed by iterating `v ← Ab v` from `v = Bb` and reading off
/// `k[l] = Cb · v`, numerically the same as powering Ab against Bb, one
/// matrix-vector product per tap. `len = 0` yields an empty kernel.
pub fn impulse_kernel(sys: &DiscreteSystem, len: usize) -> Result<Vec<f64>> {
    let n = sys.state_dim();
    let mut kernel = Vec::with_capacity(len);

    // v = Ab^l · Bb, starting at l = 0.
    let mut v: Vec<f64> = (0..n).map(|i| sys.bb.at(i, 0)).collect();

    for l in 0..len {
        let mut tap = 0.0;
        for j in 0..n {
            tap += sys.cb.at(0, j) * v[j];
        }
        if !tap.is_finite() {
            return Err(StrandError::NumericOverflow {
                context: format!("impulse kernel diverged at tap {l} of {len}"),
            });
        }
        kernel.push(tap);

        if l + 1 < len {
            v = sys.ab.matvec(&v)?;
        }
    }

    Ok(kernel)
}
