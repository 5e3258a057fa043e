//! Exact arithmetic for Zariski-closure computations.
//!
//! This crate provides the algebra the closure engine is built on:
//! - Multivariate polynomials over `Q` with lex / grlex / grevlex orders
//! - Square rational matrices with exact Gauss-Jordan inversion, plus
//!   row-echelon form, null space and rank for rectangular systems
//! - Number fields `Q(α)` given by a monic minimal polynomial, with
//!   element and matrix arithmetic
//! - A Buchberger Gröbner engine behind the [`grobner::GrobnerEngine`] trait
//!
//! Everything is exact: coefficients are `BigRational` throughout and no
//! code path converts to floating point.
//!
//! # Examples
//!
//! ```
//! use zariski_math::polynomial::{MonomialOrder, PolynomialRing};
//! use num_bigint::BigInt;
//! use num_rational::BigRational;
//!
//! let ring = PolynomialRing::matrix_entries(2, MonomialOrder::GRevLex);
//! let det = ring.parse("x11*x22 - x12*x21 - 1").unwrap();
//!
//! let r = |n: i64| BigRational::from_integer(BigInt::from(n));
//! // [[2, 3], [1, 2]] has determinant 1
//! assert!(det.vanishes_at(&[r(2), r(3), r(1), r(2)]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod grobner;
pub mod matrix;
pub mod number_field;
pub mod polynomial;

pub use error::{MathError, Result};
pub use grobner::{
    BuchbergerConfig, BuchbergerEngine, GrobnerBasis, GrobnerEngine, GrobnerError, GrobnerStats,
};
pub use matrix::RationalMatrix;
pub use number_field::{FieldElement, FieldMatrix, NumberField};
pub use polynomial::{Monomial, MonomialOrder, Polynomial, PolynomialRing, Term, Var};

/// Re-export of the exact rational type used throughout.
pub use num_rational::BigRational;
