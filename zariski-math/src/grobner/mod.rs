//! Gröbner Basis Computation
//!
//! The closure engine talks to Gröbner machinery only through the
//! [`GrobnerEngine`] trait. [`BuchbergerEngine`] is the in-crate
//! implementation; callers with no engine pass `None` instead.

pub mod buchberger;

pub use buchberger::{BuchbergerConfig, BuchbergerEngine, normal_form};

use crate::error::MathError;
use crate::polynomial::{MonomialOrder, Polynomial, PolynomialRing, Var};
use thiserror::Error;

/// Errors from a Gröbner engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrobnerError {
    /// More critical pairs were needed than the budget allows.
    #[error("iteration budget of {limit} critical pairs exhausted")]
    IterationBudget {
        /// The budget that was hit
        limit: usize,
    },
    /// The engine does not provide this operation.
    #[error("operation not supported by this engine: {0}")]
    Unsupported(&'static str),
    /// Underlying arithmetic or parse failure.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Counters collected while computing a basis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrobnerStats {
    /// Generators handed in (after dropping zeros).
    pub input_generators: usize,
    /// Polynomials in the reduced basis.
    pub output_generators: usize,
    /// Critical pairs taken off the queue.
    pub pairs_processed: u64,
    /// S-polynomials formed.
    pub s_polynomials_computed: u64,
    /// S-polynomials that reduced to zero.
    pub zero_reductions: u64,
    /// Pairs skipped by the product criterion.
    pub pairs_eliminated_product: u64,
    /// New basis elements found.
    pub polynomials_added: u64,
    /// Single-term reduction steps.
    pub reduction_steps: u64,
}

/// A reduced Gröbner basis together with how it was obtained.
#[derive(Debug, Clone)]
pub struct GrobnerBasis {
    /// Monic, inter-reduced basis sorted by descending leading monomial.
    pub basis: Vec<Polynomial>,
    /// Work counters.
    pub stats: GrobnerStats,
}

/// Capability set of a Gröbner/ideal engine.
pub trait GrobnerEngine {
    /// Build a polynomial ring with `num_vars` variables.
    fn build_ring(&self, num_vars: usize, order: MonomialOrder) -> PolynomialRing {
        PolynomialRing::new(num_vars, order)
    }

    /// Parse a polynomial in `ring`.
    fn parse(&self, ring: &PolynomialRing, text: &str) -> Result<Polynomial, GrobnerError> {
        Ok(ring.parse(text)?)
    }

    /// Reduced Gröbner basis of the ideal generated by `polys`.
    ///
    /// `max_iterations` bounds the number of critical pairs processed.
    fn grobner_basis(
        &self,
        polys: &[Polynomial],
        order: MonomialOrder,
        max_iterations: usize,
    ) -> Result<GrobnerBasis, GrobnerError>;

    /// Radical of the ideal generated by `polys`.
    fn radical(&self, polys: &[Polynomial]) -> Result<Vec<Polynomial>, GrobnerError>;

    /// Generators of the elimination ideal `I ∩ Q[remaining vars]`.
    fn eliminate(
        &self,
        polys: &[Polynomial],
        vars: &[Var],
        max_iterations: usize,
    ) -> Result<Vec<Polynomial>, GrobnerError>;
}
