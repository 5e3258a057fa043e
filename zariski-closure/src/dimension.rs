//! Dimension estimate from the Jacobian rank at a sample point.
//!
//! At a smooth point of a variety cut out by `I`, the dimension is
//! `num_vars - rank J(p)`. The estimate is exact when the point is smooth
//! and the generators span `I` locally; at a singular point it overshoots.

use num_rational::BigRational;
use num_traits::{One, Zero};
use tracing::debug;
use zariski_math::matrix::rank;
use zariski_math::{Polynomial, Var};

/// `∂f/∂x_var` evaluated at `point`, term by term.
pub fn partial_at(f: &Polynomial, var: Var, point: &[BigRational]) -> BigRational {
    let mut acc = BigRational::zero();
    for term in f.terms() {
        let e = term.monomial.degree(var);
        if e == 0 {
            continue;
        }
        let mut value = &term.coeff * BigRational::from_integer(e.into());
        for vp in term.monomial.vars() {
            let power = if vp.var == var { vp.power - 1 } else { vp.power };
            if power == 0 {
                continue;
            }
            let x = point
                .get(vp.var as usize)
                .cloned()
                .unwrap_or_else(BigRational::zero);
            value *= pow(&x, power);
            if value.is_zero() {
                break;
            }
        }
        acc += value;
    }
    acc
}

fn pow(x: &BigRational, k: u32) -> BigRational {
    let mut out = BigRational::one();
    for _ in 0..k {
        out *= x;
    }
    out
}

/// The Jacobian `J[i][v] = ∂f_i/∂x_v (point)`.
pub fn jacobian_at(ideal: &[Polynomial], num_vars: usize, point: &[BigRational]) -> Vec<Vec<BigRational>> {
    ideal
        .iter()
        .map(|f| {
            (0..num_vars)
                .map(|v| partial_at(f, v as Var, point))
                .collect()
        })
        .collect()
}

/// Estimate `dim V(ideal)` given sample points of the variety.
///
/// Uses the first sample that differs from `identity` (falling back to the
/// first sample). With no generators the whole space is returned; with no
/// samples the naive `num_vars - #generators`, clamped at zero.
pub fn estimate_dimension(
    ideal: &[Polynomial],
    num_vars: usize,
    samples: &[&[BigRational]],
    identity: &[BigRational],
) -> usize {
    if ideal.is_empty() {
        return num_vars;
    }
    let point = samples
        .iter()
        .find(|p| **p != identity)
        .or_else(|| samples.first());
    let Some(point) = point else {
        return num_vars.saturating_sub(ideal.len());
    };

    let jac = jacobian_at(ideal, num_vars, point);
    let r = rank(&jac);
    debug!(generators = ideal.len(), num_vars, rank = r, "jacobian rank");
    num_vars.saturating_sub(r)
}
