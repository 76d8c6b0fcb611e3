//! # strand-core
//!
//! Minimal dense linear-algebra substrate for strand.
//! CPU-only, no autograd, no broadcasting — just the dense matrix and
//! pivoted solve the SSM layer needs.

pub mod error;
pub mod matrix;

pub use error::StrandError;
pub use matrix::Matrix;

pub type Result<T> = std::result::Result<T, StrandError>;
