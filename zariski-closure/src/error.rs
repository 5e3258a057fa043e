//! Errors that abort a closure computation.
//!
//! Only malformed input is an error. Budget exhaustion, singular
//! generators and Gröbner failures are reported through the result.

use thiserror::Error;
use zariski_math::MathError;

/// Hard failures of [`crate::compute_zariski_closure_with`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClosureError {
    /// Arithmetic precondition violated.
    #[error(transparent)]
    Math(#[from] MathError),
    /// The ambient group is unusable (for instance of size 0).
    #[error("invalid algebraic group: {0}")]
    InvalidGroup(String),
    /// A generator's size differs from the group's matrix size.
    #[error("generator {index} is {found}x{found}, expected {expected}x{expected}")]
    GeneratorSize {
        /// Position in the generator list
        index: usize,
        /// Group matrix size
        expected: usize,
        /// Generator matrix size
        found: usize,
    },
    /// A generator has entries from a field of a different degree.
    #[error("generator {index} does not belong to the given number field")]
    FieldMismatch {
        /// Position in the generator list
        index: usize,
    },
}

/// Result type for closure computations.
pub type Result<T> = std::result::Result<T, ClosureError>;
