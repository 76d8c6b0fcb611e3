//! Causal convolution of an input sequence with an impulse-response kernel
//! — the "CNN mode" evaluator.
//!
//! Two paths produce the same result: a direct O(L²) sum, and an FFT path
//! that zero-pads both sequences to twice their length before transforming.
//! The padding is the non-circular correction: a length-2L transform keeps
//! the FFT's inherent circular convolution from aliasing into the causal
//! prefix (2L ≥ 2L-1, the linear-convolution support).

use rustfft::{num_complex::Complex, FftPlanner};
use strand_core::{Result, StrandError};

fn check_lengths(u: &[f64], k: &[f64]) -> Result<()> {
    if u.len() != k.len() {
        return Err(StrandError::ShapeMismatch {
            expected: vec![u.len()],
            got: vec![k.len()],
        });
    }
    Ok(())
}

/// Causal convolution, direct summation.
///
/// `y[n] = Σ_{m=0}^{n} k[m] · u[n-m]`: the full discrete convolution
/// truncated to its first `len(u)` outputs.
pub fn convolve_direct(u: &[f64], k: &[f64]) -> Result<Vec<f64>> {
    check_lengths(u, k)?;
    let l = u.len();
    let mut y = vec![0.0; l];
    for n in 0..l {
        let mut acc = 0.0;
        for m in 0..=n {
            acc += k[m] * u[n - m];
        }
        y[n] = acc;
    }
    Ok(y)
}

/// Causal convolution via the Discrete Convolution Theorem.
///
/// Both sequences are zero-padded to length 2L, transformed, multiplied
/// pointwise, inverse-transformed, and the first L real samples taken.
pub fn convolve_fft(u: &[f64], k: &[f64]) -> Result<Vec<f64>> {
    check_lengths(u, k)?;
    let l = u.len();
    if l == 0 {
        return Ok(Vec::new());
    }

    let conv_len = 2 * l; // pad to avoid circular wraparound
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(conv_len);
    let ifft = planner.plan_fft_inverse(conv_len);

    let mut u_buf: Vec<Complex<f64>> = vec![Complex::new(0.0, 0.0); conv_len];
    for (i, &v) in u.iter().enumerate() {
        u_buf[i] = Complex::new(v, 0.0);
    }
    fft.process(&mut u_buf);

    let mut k_buf: Vec<Complex<f64>> = vec![Complex::new(0.0, 0.0); conv_len];
    for (i, &v) in k.iter().enumerate() {
        k_buf[i] = Complex::new(v, 0.0);
    }
    fft.process(&mut k_buf);

    let mut y_buf: Vec<Complex<f64>> = u_buf
        .iter()
        .zip(k_buf.iter())
        .map(|(&ui, &ki)| ui * ki)
        .collect();
    ifft.process(&mut y_buf);

    // rustfft leaves the inverse unnormalized.
    let scale = 1.0 / conv_len as f64;
    Ok(y_buf[..l].iter().map(|c| c.re * scale).collect())
}

/// Causal convolution with mode selection.
///
/// The two paths are numerically equivalent within floating-point
/// tolerance; `use_fft` trades the O(L²) sum for O(L log L).
pub fn causal_convolve(u: &[f64], k: &[f64], use_fft: bool) -> Result<Vec<f64>> {
    if use_fft {
        convolve_fft(u, k)
    } else {
        convolve_direct(u, k)
    }
}
