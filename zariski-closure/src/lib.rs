//! Zariski closures of finitely generated matrix groups.
//!
//! Given generators of a subgroup of `GL_n(K)` for a number field `K`,
//! this crate approximates the vanishing ideal of the subgroup's Zariski
//! closure by sampling:
//!
//! 1. [`embedding`]: restriction of scalars turns `n x n` matrices over `K`
//!    into `nd x nd` rational matrices
//! 2. [`words`]: breadth-first enumeration of distinct group elements
//! 3. [`vanishing`]: exact null space of the evaluation matrix, giving all
//!    relations of bounded degree among the samples
//! 4. [`closure`]: the degree loop, ambient group equations and Gröbner
//!    refinement
//! 5. [`dimension`]: Jacobian rank at a sample point
//!
//! The result is heuristic: it is the true closure only in the limit of
//! unbounded word length, point count and degree. Budgets in
//! [`ClosureConfig`] bound the work and are reported, not raised.
//!
//! # Examples
//!
//! ```
//! use zariski_closure::{ClosureConfig, MatrixGroup, compute_zariski_closure};
//! use zariski_math::{FieldMatrix, NumberField};
//!
//! let q = NumberField::rationals();
//! let t = FieldMatrix::from_i64_rows(&q, &[&[1, 1], &[0, 1]]).unwrap();
//! let config = ClosureConfig { max_word_length: 4, max_degree: 1, ..Default::default() };
//!
//! let closure = compute_zariski_closure(&q, &[t], &MatrixGroup::general_linear(2), &config).unwrap();
//! // The unipotent upper triangular group: x11 = x22 = 1, x21 = 0.
//! assert_eq!(closure.ideal.len(), 3);
//! assert_eq!(closure.dimension, Some(1));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod closure;
pub mod dimension;
pub mod embedding;
pub mod error;
pub mod group;
pub mod progress;
pub mod vanishing;
pub mod words;

pub use closure::{
    ClosureConfig, ClosureStats, GrobnerLimits, GrobnerOutcome, ZariskiClosure,
    compute_zariski_closure, compute_zariski_closure_with,
};
pub use embedding::{lift_scalars, multiplication_matrix, restrict_scalars};
pub use error::{ClosureError, Result};
pub use group::{AlgebraicGroup, MatrixGroup, determinant_polynomial};
pub use progress::Progress;
pub use vanishing::{MonomialTruncation, VanishingIdeal, vanishing_ideal};
pub use words::{EnumerationStop, WordBudget, WordEnumeration, enumerate_words};
