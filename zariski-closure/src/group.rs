//! Ambient algebraic groups.
//!
//! A group contributes its matrix size, an optional dimension, a label
//! used in result descriptions, and defining equations in the entry
//! variables `x{r}{c}` (variable `r * n + c`). The equations are only
//! consulted when the generators are rational.

use crate::error::{ClosureError, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use zariski_math::{Monomial, MonomialOrder, Polynomial, PolynomialRing, Term, Var};

/// The ambient group `G ⊂ GL_n` whose subgroup closure is computed.
pub trait AlgebraicGroup {
    /// Matrix size `n`.
    fn size(&self) -> usize;

    /// Dimension of `G` as a variety, when known.
    fn dim(&self) -> Option<usize>;

    /// Defining equations of `G` in the `n²` entry variables.
    fn equations(&self) -> Vec<Polynomial>;

    /// Short human-readable name, e.g. `SL(2)`.
    fn label(&self) -> String;
}

/// A matrix group given by an explicit list of equations.
#[derive(Debug, Clone)]
pub struct MatrixGroup {
    size: usize,
    dim: Option<usize>,
    label: String,
    equations: Vec<Polynomial>,
}

impl MatrixGroup {
    /// `GL(n)`: no equations, dimension `n²`.
    pub fn general_linear(n: usize) -> Self {
        Self {
            size: n,
            dim: Some(n * n),
            label: format!("GL({n})"),
            equations: Vec::new(),
        }
    }

    /// `SL(n)`: the single equation `det - 1`, dimension `n² - 1`.
    pub fn special_linear(n: usize) -> Self {
        let det_minus_one = determinant_polynomial(n).sub(&Polynomial::one());
        Self {
            size: n,
            dim: Some((n * n).saturating_sub(1)),
            label: format!("SL({n})"),
            equations: vec![det_minus_one],
        }
    }

    /// A group with caller-supplied equations.
    pub fn custom(
        size: usize,
        label: impl Into<String>,
        equations: Vec<Polynomial>,
        dim: Option<usize>,
    ) -> Self {
        Self {
            size,
            dim,
            label: label.into(),
            equations,
        }
    }

    /// A group whose equations are written over the entry names `x11, x12, ...`.
    ///
    /// # Errors
    ///
    /// Fails if any equation does not parse.
    pub fn from_equations(
        size: usize,
        label: impl Into<String>,
        equations: &[&str],
        dim: Option<usize>,
    ) -> Result<Self> {
        if size == 0 {
            return Err(ClosureError::InvalidGroup("matrix size must be positive".into()));
        }
        let ring = PolynomialRing::matrix_entries(size, MonomialOrder::default());
        let equations = equations
            .iter()
            .map(|text| ring.parse(text))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::custom(size, label, equations, dim))
    }
}

impl AlgebraicGroup for MatrixGroup {
    fn size(&self) -> usize {
        self.size
    }

    fn dim(&self) -> Option<usize> {
        self.dim
    }

    fn equations(&self) -> Vec<Polynomial> {
        self.equations.clone()
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// The determinant of the generic `n x n` matrix, by Leibniz expansion.
pub fn determinant_polynomial(n: usize) -> Polynomial {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut terms = Vec::new();
    permute(&mut perm, 0, true, &mut |p, even| {
        let monomial = Monomial::from_powers(
            p.iter()
                .enumerate()
                .map(|(row, &col)| ((row * n + col) as Var, 1)),
        );
        let sign = if even { 1 } else { -1 };
        terms.push(Term::new(BigRational::from_integer(BigInt::from(sign)), monomial));
    });
    if terms.is_empty() {
        return Polynomial::one();
    }
    Polynomial::from_terms(terms, MonomialOrder::default())
}

/// Visit all permutations of `perm[k..]`, tracking parity.
fn permute(perm: &mut [usize], k: usize, even: bool, visit: &mut impl FnMut(&[usize], bool)) {
    if k + 1 >= perm.len() {
        visit(perm, even);
        return;
    }
    for i in k..perm.len() {
        perm.swap(k, i);
        permute(perm, k + 1, if i == k { even } else { !even }, visit);
        perm.swap(k, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use zariski_math::RationalMatrix;

    fn det_at(n: usize, m: &RationalMatrix) -> BigRational {
        determinant_polynomial(n).eval_point(m.flatten())
    }

    #[test]
    fn test_determinant_2x2() {
        let ring = PolynomialRing::matrix_entries(2, MonomialOrder::default());
        let expected = ring.parse("x11*x22 - x12*x21").unwrap();
        assert_eq!(determinant_polynomial(2), expected);
    }

    #[test]
    fn test_determinant_3x3_values() {
        let m = RationalMatrix::from_i64_rows(&[&[2, 0, 1], &[1, 3, 2], &[1, 1, 1]]).unwrap();
        // 2(3 - 2) - 0 + 1(1 - 3) = 0
        assert_eq!(det_at(3, &m), BigRational::from_integer(0.into()));
        let id = RationalMatrix::identity(3);
        assert!(det_at(3, &id).is_one());
        assert_eq!(determinant_polynomial(3).num_terms(), 6);
    }

    #[test]
    fn test_special_linear() {
        let g = MatrixGroup::special_linear(2);
        assert_eq!(g.size(), 2);
        assert_eq!(g.dim(), Some(3));
        assert_eq!(g.label(), "SL(2)");
        let eqs = g.equations();
        assert_eq!(eqs.len(), 1);
        let t = RationalMatrix::from_i64_rows(&[&[1, 1], &[0, 1]]).unwrap();
        assert!(eqs[0].vanishes_at(t.flatten()));
        let d = RationalMatrix::from_i64_rows(&[&[2, 0], &[0, 1]]).unwrap();
        assert!(!eqs[0].vanishes_at(d.flatten()));
    }

    #[test]
    fn test_general_linear() {
        let g = MatrixGroup::general_linear(3);
        assert_eq!(g.dim(), Some(9));
        assert!(g.equations().is_empty());
        assert_eq!(g.label(), "GL(3)");
    }

    #[test]
    fn test_from_equations() {
        let g = MatrixGroup::from_equations(2, "diagonal", &["x12", "x21"], Some(2)).unwrap();
        assert_eq!(g.equations().len(), 2);
        assert!(MatrixGroup::from_equations(2, "bad", &["x12 +"], None).is_err());
        assert!(matches!(
            MatrixGroup::from_equations(0, "empty", &[], None),
            Err(ClosureError::InvalidGroup(_))
        ));
    }
}
