//! Mass-spring-damper driven through the SSM primitive, both modes.
//!
//! The forced oscillator y'' + (b/m) y' + (k/m) y = u/m becomes the state
//! space system x = [position, velocity]:
//!
//!   A = [[0, 1], [-k/m, -b/m]]   B = [0, 1/m]   C = [1, 0]
//!
//! We discretize at step = 1/100, drive it with a gated sine force, and
//! evaluate the position trace twice (once as a recurrence, once as a
//! causal convolution with the impulse-response kernel) to show the two
//! modes coincide.
//!
//! Run with:
//!   cargo run --example spring_mass

use strand_core::Matrix;
use strand_ssm::{
    causal_convolve, discretize, impulse_kernel, max_divergence, scan, LinearSystem, SsmState,
};

fn main() {
    let (k, b, m) = (40.0, 5.0, 1.0);
    let sys = LinearSystem::new(
        Matrix::from_rows(&[&[0.0, 1.0], &[-k / m, -b / m]]).unwrap(),
        Matrix::column(&[0.0, 1.0 / m]),
        Matrix::from_rows(&[&[1.0, 0.0]]).unwrap(),
    )
    .expect("valid system shapes");

    let len = 100;
    let step = 1.0 / len as f64;

    // Force: sin(10t) wherever it exceeds 0.5, zero elsewhere.
    let u: Vec<f64> = (0..len)
        .map(|i| {
            let s = (10.0 * i as f64 * step).sin();
            if s > 0.5 {
                s
            } else {
                0.0
            }
        })
        .collect();

    let disc = discretize(&sys, step).expect("discretization");

    // RNN mode: sequential state update.
    let mut state = SsmState::zeros(2);
    let y_rnn = scan(&disc, &u, &mut state).expect("scan");

    // CNN mode: impulse kernel + causal FFT convolution.
    let kernel = impulse_kernel(&disc, len).expect("kernel");
    let y_cnn = causal_convolve(&u, &kernel, true).expect("convolution");

    println!("mass-spring-damper  (k={k}, b={b}, m={m}, step={step})");
    println!();
    println!("{:>6} {:>10} {:>14} {:>14}", "t", "force", "y (recurrent)", "y (convolved)");
    for i in (0..len).step_by(10) {
        println!(
            "{:>6.2} {:>10.4} {:>14.6e} {:>14.6e}",
            i as f64 * step,
            u[i],
            y_rnn[i],
            y_cnn[i]
        );
    }

    let div = max_divergence(&sys, step, &u).expect("divergence");
    println!();
    println!("max |recurrent - convolved| over the trace: {div:.3e}");
    println!("final hidden state: position {:+.6e}, velocity {:+.6e}", state.x[0], state.x[1]);
}
