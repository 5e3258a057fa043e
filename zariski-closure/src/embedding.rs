//! Restriction of scalars from `K = Q(α)` to `Q`.
//!
//! Multiplication by a fixed element is `Q`-linear on `K ≅ Q^d`; an
//! `n x n` matrix over `K` becomes an `nd x nd` rational matrix whose
//! `(i, j)` block of size `d` is the multiplication matrix of entry `(i, j)`.
//! The map is an injective ring homomorphism, so it carries the generated
//! group isomorphically onto a group of rational matrices.

use crate::error::Result;
use num_rational::BigRational;
use num_traits::Zero;
use zariski_math::{FieldElement, FieldMatrix, MathError, NumberField, RationalMatrix};

/// The `d x d` matrix of `x ↦ e·x` in the power basis `1, α, ..., α^{d-1}`.
///
/// Column `j` holds the coefficients of `e·α^j`; each column is the
/// previous one multiplied by `α` and reduced by the minimal polynomial.
pub fn multiplication_matrix(field: &NumberField, e: &FieldElement) -> RationalMatrix {
    let d = field.degree();
    let min_poly = field.minimal_poly();
    let mut m = RationalMatrix::zero(d);

    let mut column: Vec<BigRational> = (0..d)
        .map(|i| e.coeffs.get(i).cloned().unwrap_or_else(BigRational::zero))
        .collect();
    for j in 0..d {
        for (i, c) in column.iter().enumerate() {
            m.set(i, j, c.clone());
        }
        if j + 1 == d {
            break;
        }
        // Shift up one power of α; the overflow into α^d is folded back.
        let overflow = column[d - 1].clone();
        let mut next = Vec::with_capacity(d);
        next.push(BigRational::zero());
        next.extend(column[..d - 1].iter().cloned());
        if !overflow.is_zero() {
            for (slot, p) in next.iter_mut().zip(min_poly) {
                *slot -= &overflow * p;
            }
        }
        column = next;
    }
    m
}

/// Embed an `n x n` matrix over `field` as an `nd x nd` rational matrix.
pub fn restrict_scalars(field: &NumberField, matrix: &FieldMatrix) -> RationalMatrix {
    let n = matrix.n();
    let d = field.degree();
    if d == 1 {
        let mut out = RationalMatrix::zero(n);
        for r in 0..n {
            for c in 0..n {
                out.set(r, c, matrix.get(r, c).rational_part());
            }
        }
        return out;
    }

    let mut out = RationalMatrix::zero(n * d);
    for r in 0..n {
        for c in 0..n {
            let block = multiplication_matrix(field, matrix.get(r, c));
            for bi in 0..d {
                for bj in 0..d {
                    let v = block.get(bi, bj);
                    if !v.is_zero() {
                        out.set(r * d + bi, c * d + bj, v.clone());
                    }
                }
            }
        }
    }
    out
}

/// Recover a matrix over `field` from its restriction of scalars.
///
/// Each `d x d` block is read through its first column, which is the image
/// of `1` and hence the coefficient vector of the entry. Blocks that are
/// not multiplication matrices are not detected here; compare against
/// [`restrict_scalars`] of the result when that matters.
///
/// # Errors
///
/// Fails when the size is not a multiple of the field degree.
pub fn lift_scalars(field: &NumberField, matrix: &RationalMatrix) -> Result<FieldMatrix> {
    let d = field.degree();
    let big = matrix.size();
    if big % d != 0 {
        return Err(MathError::NotBlockMultiple {
            degree: d,
            size: big,
        }
        .into());
    }
    let n = big / d;
    let rows = (0..n)
        .map(|r| {
            (0..n)
                .map(|c| {
                    let coeffs = (0..d).map(|i| matrix.get(r * d + i, c * d).clone()).collect();
                    field.element(coeffs)
                })
                .collect::<std::result::Result<Vec<_>, _>>()
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(FieldMatrix::from_rows(field, rows)?)
}

/// True when `matrix` is the restriction of scalars of some matrix over `field`.
pub fn is_restricted(field: &NumberField, matrix: &RationalMatrix) -> bool {
    match lift_scalars(field, matrix) {
        Ok(lifted) => restrict_scalars(field, &lifted) == *matrix,
        Err(_) => false,
    }
}
