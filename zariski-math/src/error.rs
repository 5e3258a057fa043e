//! Error types for exact arithmetic.

use thiserror::Error;

/// Errors raised by matrix, number-field and polynomial operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Gauss-Jordan elimination found no pivot.
    #[error("matrix is singular")]
    Singular,
    /// Operand shapes do not agree.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        found: usize,
    },
    /// Matrix size is not a multiple of the field degree.
    #[error("matrix size {size} is not a multiple of field degree {degree}")]
    NotBlockMultiple {
        /// Field degree
        degree: usize,
        /// Matrix size
        size: usize,
    },
    /// Minimal polynomial is not monic or has degree 0.
    #[error("invalid minimal polynomial: {0}")]
    InvalidMinimalPolynomial(String),
    /// Element coefficient vector does not match the field degree.
    #[error("field element has {found} coefficients, field degree is {degree}")]
    FieldMismatch {
        /// Field degree
        degree: usize,
        /// Coefficients supplied
        found: usize,
    },
    /// Polynomial text could not be parsed.
    #[error("parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset into the input
        position: usize,
        /// What went wrong
        message: String,
    },
}

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
