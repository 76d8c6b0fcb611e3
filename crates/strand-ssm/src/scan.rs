//! Recurrent evaluation of a discrete system — the "RNN mode".
//!
//! The scan is a strict sequential fold: step k depends on step k-1, so
//! nothing here parallelizes across time. That asymmetry is exactly what
//! the convolution mode in [`crate::conv`] resolves for batch evaluation.

use strand_core::{Result, StrandError};

use crate::system::DiscreteSystem;

/// The N-vector recurrence carry.
///
/// Owned by the caller: one evaluation scopes it, or it persists across
/// chunked `scan` calls for streaming decode. Not safe to share between
/// concurrent evaluations without external locking.
#[derive(Clone, Debug)]
pub struct SsmState {
    pub x: Vec<f64>,
}

impl SsmState {
    /// Zero state of dimension n.
    pub fn zeros(n: usize) -> Self {
        Self { x: vec![0.0; n] }
    }

    pub fn dim(&self) -> usize {
        self.x.len()
    }

    /// Reset to zero in place.
    pub fn reset(&mut self) {
        self.x.fill(0.0);
    }
}

fn check_state(sys: &DiscreteSystem, state: &SsmState) -> Result<()> {
    if state.dim() != sys.state_dim() {
        return Err(StrandError::ShapeMismatch {
            expected: vec![sys.state_dim()],
            got: vec![state.dim()],
        });
    }
    Ok(())
}

/// Evaluate the recurrence over a full input sequence.
///
/// For each `u_k` in order: `x = Ab x + Bb u_k`, emit `y_k = Cb x`.
/// The state is mutated in place and left at `x_L` so a subsequent call
/// continues the stream. Output has the same length and order as `u`.
///
/// Deterministic: identical inputs produce bit-identical output.
pub fn scan(sys: &DiscreteSystem, u: &[f64], state: &mut SsmState) -> Result<Vec<f64>> {
    check_state(sys, state)?;
    let n = sys.state_dim();

    let mut y = Vec::with_capacity(u.len());
    let mut next = vec![0.0; n];

    for &u_k in u {
        // x = Ab x + Bb u_k
        for i in 0..n {
            let mut sum = sys.bb.at(i, 0) * u_k;
            for j in 0..n {
                sum += sys.ab.at(i, j) * state.x[j];
            }
            next[i] = sum;
        }
        state.x.copy_from_slice(&next);

        // y_k = Cb x
        let mut out = 0.0;
        for j in 0..n {
            out += sys.cb.at(0, j) * state.x[j];
        }
        y.push(out);
    }

    Ok(y)
}

/// Advance the recurrence by a single input sample: the decode path.
pub fn step_one(sys: &DiscreteSystem, u: f64, state: &mut SsmState) -> Result<f64> {
    check_state(sys, state)?;
    let n = sys.state_dim();

    let mut next = vec![0.0; n];
    for i in 0..n {
        let mut sum = sys.bb.at(i, 0) * u;
        for j in 0..n {
            sum += sys.ab.at(i, j) * state.x[j];
        }
        next[i] = sum;
    }
    state.x.copy_from_slice(&next);

    let mut out = 0.0;
    for j in 0..n {
        out += sys.cb.at(0, j) * state.x[j];
    }
    Ok(out)
}
