use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrandError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Matmul dimension mismatch: [{m}x{k1}] @ [{k2}x{n}]")]
    MatmulDimMismatch {
        m: usize,
        k1: usize,
        k2: usize,
        n: usize,
    },

    #[error("Singular matrix: pivot {pivot:.3e} at column {col}")]
    SingularMatrix { col: usize, pivot: f64 },

    #[error("Numeric overflow: {context}")]
    NumericOverflow { context: String },

    #[error("Invalid step size: {step} (must be > 0)")]
    InvalidStep { step: f64 },
}
