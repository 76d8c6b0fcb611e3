//! # strand-ssm
//!
//! The State Space Model sequence layer, from first principles.
//!
//! A continuous linear system `x' = Ax + Bu, y = Cx` is discretized with the
//! bilinear (Tustin) transform and then evaluated in one of two
//! mathematically-equivalent modes:
//!
//! - **recurrent**: the sequential fold `x_k = Ab x_{k-1} + Bb u_k`,
//!   `y_k = Cb x_k` — O(1) per step, state carried across steps;
//! - **convolutional**: a causal convolution of the input with the system's
//!   impulse-response kernel `k[l] = Cb Ab^l Bb` — precomputable, evaluated
//!   batched via FFT.
//!
//! The [`duality`] module verifies that both modes produce the same output.
//! [`layer`] wires the primitive into a trainable per-channel stack with a
//! HiPPO-initialized transition matrix.
//!
//! ## Quick start
//!
//! ```rust
//! use strand_ssm::{LinearSystem, SsmState, discretize, scan, impulse_kernel, causal_convolve};
//! use strand_core::Matrix;
//!
//! // A damped scalar system.
//! let sys = LinearSystem::new(
//!     Matrix::from_rows(&[&[-0.5]]).unwrap(),
//!     Matrix::column(&[1.0]),
//!     Matrix::from_rows(&[&[1.0]]).unwrap(),
//! ).unwrap();
//!
//! let disc = discretize(&sys, 0.1).unwrap();
//! let u = vec![1.0, 0.0, 0.0, 0.0];
//!
//! let mut state = SsmState::zeros(1);
//! let y_rnn = scan(&disc, &u, &mut state).unwrap();
//!
//! let k = impulse_kernel(&disc, u.len()).unwrap();
//! let y_cnn = causal_convolve(&u, &k, true).unwrap();
//!
//! for (a, b) in y_rnn.iter().zip(y_cnn.iter()) {
//!     assert!((a - b).abs() < 1e-9);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod conv;
pub mod duality;
pub mod hippo;
pub mod kernel;
pub mod layer;
pub mod scan;
pub mod system;

pub use cache::DecodeState;
pub use config::{ConfigError, SsmConfig};
pub use conv::{causal_convolve, convolve_direct, convolve_fft};
pub use duality::{max_divergence, modes_agree};
pub use hippo::make_hippo;
pub use kernel::impulse_kernel;
pub use layer::{SsmLayer, SsmStack};
pub use scan::{scan, step_one, SsmState};
pub use system::{discretize, DiscreteSystem, LinearSystem};

pub use strand_core::{Matrix, Result, StrandError};
