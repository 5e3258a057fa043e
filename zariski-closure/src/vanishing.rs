//! Polynomials of bounded degree vanishing on a finite point set.
//!
//! The coefficient vectors of such polynomials are exactly the null space
//! of the evaluation matrix `E[p][m] = m(p)` (points by monomials), computed
//! here in exact arithmetic.

use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zariski_math::Polynomial;
use zariski_math::matrix::null_space;

/// Monomial-basis truncation for many variables.
///
/// With more than `var_threshold` variables the full degree-`D` basis is
/// replaced by the constant, the linear terms and, when `D >= 2`, all
/// quadratic terms. Higher-degree relations are not searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonomialTruncation {
    /// Largest variable count that still gets the full basis.
    pub var_threshold: usize,
}

impl Default for MonomialTruncation {
    fn default() -> Self {
        Self { var_threshold: 8 }
    }
}

impl MonomialTruncation {
    /// Whether `num_vars` variables trigger truncation.
    #[inline]
    pub fn applies(&self, num_vars: usize) -> bool {
        num_vars > self.var_threshold
    }
}

/// Exponent vectors of the monomial basis, by increasing degree.
///
/// Within a degree, monomials are listed as non-decreasing variable
/// multisets (`x0², x0x1, ..., x1², ...`).
pub fn enumerate_monomials(num_vars: usize, degree: u32, truncation: MonomialTruncation) -> Vec<Vec<u32>> {
    let max_degree = if truncation.applies(num_vars) {
        degree.min(2)
    } else {
        degree
    };
    let mut out = Vec::new();
    let mut exps = vec![0u32; num_vars];
    for d in 0..=max_degree {
        push_multisets(num_vars, d, 0, &mut exps, &mut out);
    }
    out
}

fn push_multisets(num_vars: usize, left: u32, start: usize, exps: &mut [u32], out: &mut Vec<Vec<u32>>) {
    if left == 0 {
        out.push(exps.to_vec());
        return;
    }
    for v in start..num_vars {
        exps[v] += 1;
        push_multisets(num_vars, left - 1, v, exps, out);
        exps[v] -= 1;
    }
}

/// Number of monomials [`enumerate_monomials`] would return.
pub fn count_monomials(num_vars: usize, degree: u32, truncation: MonomialTruncation) -> usize {
    let max_degree = if truncation.applies(num_vars) {
        degree.min(2)
    } else {
        degree
    };
    // Σ_{k ≤ D} C(n + k - 1, k)
    let mut total = 0usize;
    let mut layer = 1usize;
    for k in 0..=max_degree as usize {
        if k > 0 {
            layer = layer * (num_vars + k - 1) / k;
        }
        total += layer;
    }
    total
}

/// The evaluation matrix: one row per point, one column per monomial.
pub fn evaluation_matrix(points: &[&[BigRational]], monomials: &[Vec<u32>]) -> Vec<Vec<BigRational>> {
    let max_exp = monomials
        .iter()
        .flat_map(|m| m.iter().copied())
        .max()
        .unwrap_or(0) as usize;

    points
        .iter()
        .map(|point| {
            // powers[v][e] = point[v]^e
            let powers: Vec<Vec<BigRational>> = point
                .iter()
                .map(|x| {
                    let mut row = Vec::with_capacity(max_exp + 1);
                    let mut acc = BigRational::one();
                    for _ in 0..=max_exp {
                        row.push(acc.clone());
                        acc *= x;
                    }
                    row
                })
                .collect();
            monomials
                .iter()
                .map(|exps| {
                    let mut value = BigRational::one();
                    for (v, &e) in exps.iter().enumerate() {
                        if e == 0 {
                            continue;
                        }
                        match powers.get(v) {
                            Some(p) => value *= &p[e as usize],
                            None => return BigRational::zero(),
                        }
                        if value.is_zero() {
                            break;
                        }
                    }
                    value
                })
                .collect()
        })
        .collect()
}

/// Degree-bounded vanishing ideal of a point set.
#[derive(Debug, Clone)]
pub struct VanishingIdeal {
    /// One polynomial per null-space basis vector.
    pub generators: Vec<Polynomial>,
    /// Size of the monomial basis.
    pub monomials: usize,
    /// Whether the basis was truncated.
    pub truncated: bool,
}

impl VanishingIdeal {
    /// Kernel dimension of the evaluation matrix.
    #[inline]
    pub fn kernel_dim(&self) -> usize {
        self.generators.len()
    }
}

/// All relations of degree at most `degree` among the coordinates of `points`.
///
/// Every point must have `num_vars` coordinates. With no points, or no
/// monomials, the result is empty.
pub fn vanishing_ideal(
    points: &[&[BigRational]],
    num_vars: usize,
    degree: u32,
    truncation: MonomialTruncation,
) -> VanishingIdeal {
    let monomials = enumerate_monomials(num_vars, degree, truncation);
    if points.is_empty() || monomials.is_empty() {
        debug!(degree, points = points.len(), "empty vanishing ideal");
        return VanishingIdeal {
            generators: Vec::new(),
            monomials: monomials.len(),
            truncated: truncation.applies(num_vars),
        };
    }
    let matrix = evaluation_matrix(points, &monomials);
    let kernel = null_space(matrix, monomials.len());

    let generators: Vec<Polynomial> = kernel
        .into_iter()
        .map(|v| {
            Polynomial::from_exponent_map(
                v.into_iter()
                    .zip(&monomials)
                    .filter(|(c, _)| !c.is_zero())
                    .map(|(c, m)| (c, m.as_slice())),
            )
        })
        .filter(|p| !p.is_zero())
        .collect();

    debug!(
        degree,
        points = points.len(),
        monomials = monomials.len(),
        kernel = generators.len(),
        "vanishing ideal"
    );

    VanishingIdeal {
        generators,
        monomials: monomials.len(),
        truncated: truncation.applies(num_vars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use zariski_math::{MonomialOrder, PolynomialRing};

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn pts(rows: &[&[i64]]) -> Vec<Vec<BigRational>> {
        rows.iter().map(|r| r.iter().map(|&x| rat(x)).collect()).collect()
    }

    fn views(points: &[Vec<BigRational>]) -> Vec<&[BigRational]> {
        points.iter().map(|p| p.as_slice()).collect()
    }

    #[test]
    fn test_enumerate_full() {
        let t = MonomialTruncation::default();
        let m = enumerate_monomials(2, 2, t);
        assert_eq!(
            m,
            vec![
                vec![0, 0],
                vec![1, 0],
                vec![0, 1],
                vec![2, 0],
                vec![1, 1],
                vec![0, 2]
            ]
        );
        assert_eq!(count_monomials(2, 2, t), 6);
        assert_eq!(enumerate_monomials(4, 3, t).len(), count_monomials(4, 3, t));
        assert_eq!(count_monomials(4, 3, t), 35);
    }

    #[test]
    fn test_enumerate_truncated() {
        let t = MonomialTruncation::default();
        // 1 + 9 + 45
        assert_eq!(enumerate_monomials(9, 4, t).len(), 55);
        assert_eq!(count_monomials(9, 4, t), 55);
        assert_eq!(enumerate_monomials(9, 1, t).len(), 10);
        let wide = MonomialTruncation { var_threshold: 16 };
        assert_eq!(enumerate_monomials(9, 3, wide).len(), count_monomials(9, 3, wide));
        assert_eq!(count_monomials(9, 3, wide), 220);
    }

    #[test]
    fn test_evaluation_matrix() {
        let p = pts(&[&[2, 3]]);
        let m = enumerate_monomials(2, 2, MonomialTruncation::default());
        let e = evaluation_matrix(&views(&p), &m);
        assert_eq!(e, vec![vec![rat(1), rat(2), rat(3), rat(4), rat(6), rat(9)]]);
    }

    #[test]
    fn test_points_on_a_line() {
        // y = 2x + 1
        let p = pts(&[&[0, 1], &[1, 3], &[2, 5]]);
        let vi = vanishing_ideal(&views(&p), 2, 1, MonomialTruncation::default());
        assert_eq!(vi.kernel_dim(), 1);
        let ring = PolynomialRing::new(2, MonomialOrder::default());
        let line = ring.parse("x1 - 2*x0 - 1").unwrap();
        let g = &vi.generators[0];
        assert_eq!(g.make_monic(), line.make_monic());
    }

    #[test]
    fn test_generators_vanish() {
        let p = pts(&[&[5, 0], &[0, 5], &[-5, 0], &[0, -5], &[3, 4]]);
        let vi = vanishing_ideal(&views(&p), 2, 2, MonomialTruncation::default());
        // The five points lie on exactly one conic.
        assert_eq!(vi.kernel_dim(), 1);
        for g in &vi.generators {
            for point in &p {
                assert!(g.vanishes_at(point));
            }
        }
    }

    #[test]
    fn test_no_points_is_empty() {
        let vi = vanishing_ideal(&[], 4, 2, MonomialTruncation::default());
        assert_eq!(vi.kernel_dim(), 0);
        assert_eq!(vi.monomials, 15);
        assert!(!vi.truncated);
    }
}
