//! Recurrence ≡ convolution: the identity the whole layer rests on.
//!
//! Evaluating a discrete SSM as a sequential scan and convolving the input
//! with the system's impulse response are the same linear map. These helpers
//! run both modes against the same system and report how far apart the
//! outputs land, for use by tests and demos.

use strand_core::Result;

use crate::conv::causal_convolve;
use crate::kernel::impulse_kernel;
use crate::scan::{scan, SsmState};
use crate::system::{discretize, LinearSystem};

/// Evaluate `sys` at `step` over `u` in both modes (zero initial state) and
/// return the largest absolute deviation between the two output sequences.
pub fn max_divergence(sys: &LinearSystem, step: f64, u: &[f64]) -> Result<f64> {
    let disc = discretize(sys, step)?;

    let mut state = SsmState::zeros(disc.state_dim());
    let y_recurrent = scan(&disc, u, &mut state)?;

    let kernel = impulse_kernel(&disc, u.len())?;
    let y_convolved = causal_convolve(u, &kernel, true)?;

    let mut worst = 0.0f64;
    for (a, b) in y_recurrent.iter().zip(y_convolved.iter()) {
        worst = worst.max((a - b).abs());
    }
    Ok(worst)
}

/// Whether both execution modes agree within `tol` (absolute).
pub fn modes_agree(sys: &LinearSystem, step: f64, u: &[f64], tol: f64) -> Result<bool> {
    Ok(max_divergence(sys, step, u)? <= tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_core::Matrix;

    #[test]
    fn test_scalar_system_modes_agree() {
        let sys = LinearSystem::new(
            Matrix::from_rows(&[&[-0.5]]).unwrap(),
            Matrix::column(&[1.0]),
            Matrix::from_rows(&[&[2.0]]).unwrap(),
        )
        .unwrap();
        let u: Vec<f64> = (0..16).map(|k| (k as f64 * 0.4).cos()).collect();
        let div = max_divergence(&sys, 1.0 / 16.0, &u).unwrap();
        assert!(div < 1e-10, "divergence {div}");
    }

    #[test]
    fn test_oscillator_modes_agree() {
        let sys = LinearSystem::new(
            Matrix::from_rows(&[&[0.0, 1.0], &[-4.0, -0.4]]).unwrap(),
            Matrix::column(&[0.0, 1.0]),
            Matrix::from_rows(&[&[1.0, 0.0]]).unwrap(),
        )
        .unwrap();
        let u: Vec<f64> = (0..32).map(|k| if k % 5 == 0 { 1.0 } else { 0.0 }).collect();
        assert!(modes_agree(&sys, 1.0 / 32.0, &u, 1e-5).unwrap());
    }

    #[test]
    fn test_empty_input() {
        let sys = LinearSystem::new(
            Matrix::from_rows(&[&[-1.0]]).unwrap(),
            Matrix::column(&[1.0]),
            Matrix::from_rows(&[&[1.0]]).unwrap(),
        )
        .unwrap();
        assert_eq!(max_divergence(&sys, 0.1, &[]).unwrap(), 0.0);
    }
}
