//! Exact rational linear algebra.
#![allow(clippy::needless_range_loop)] // Elimination uses explicit indexing
//!
//! [`RationalMatrix`] is a square matrix of `BigRational` used for group
//! elements. The free functions work on dense row-major `Vec<Vec<_>>`
//! matrices of any shape: reduced row-echelon form, null space and rank.
//! Nothing here ever converts to floating point.

use crate::error::{MathError, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;

/// Dense square matrix over the rationals, stored row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RationalMatrix {
    size: usize,
    entries: Vec<BigRational>,
}

impl RationalMatrix {
    /// The `size x size` zero matrix.
    pub fn zero(size: usize) -> Self {
        Self {
            size,
            entries: vec![BigRational::zero(); size * size],
        }
    }

    /// The `size x size` identity matrix.
    pub fn identity(size: usize) -> Self {
        let mut m = Self::zero(size);
        for i in 0..size {
            m.entries[i * size + i] = BigRational::one();
        }
        m
    }

    /// Build from rows; every row must have `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<BigRational>>) -> Result<Self> {
        let size = rows.len();
        let mut entries = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return Err(MathError::DimensionMismatch {
                    expected: size,
                    found: row.len(),
                });
            }
            entries.extend(row);
        }
        Ok(Self { size, entries })
    }

    /// Build from integer rows.
    pub fn from_i64_rows(rows: &[&[i64]]) -> Result<Self> {
        Self::from_rows(
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|&x| BigRational::from_integer(BigInt::from(x)))
                        .collect()
                })
                .collect(),
        )
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &BigRational {
        &self.entries[row * self.size + col]
    }

    /// Overwrite entry `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: BigRational) {
        self.entries[row * self.size + col] = value;
    }

    /// Row-major entries; this is the matrix viewed as a sample point.
    #[inline]
    pub fn flatten(&self) -> &[BigRational] {
        &self.entries
    }

    /// True for the identity matrix.
    pub fn is_identity(&self) -> bool {
        (0..self.size).all(|r| {
            (0..self.size).all(|c| {
                let e = self.get(r, c);
                if r == c { e.is_one() } else { e.is_zero() }
            })
        })
    }

    /// Canonical text key built from the exact entries.
    ///
    /// Two matrices share a key exactly when they are equal, since every
    /// `BigRational` is kept in lowest terms with a positive denominator.
    pub fn canonical_key(&self) -> String {
        let mut key = String::with_capacity(self.entries.len() * 4);
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(&e.to_string());
        }
        key
    }

    /// Matrix product `self * other`.
    pub fn mul(&self, other: &RationalMatrix) -> Result<RationalMatrix> {
        if self.size != other.size {
            return Err(MathError::DimensionMismatch {
                expected: self.size,
                found: other.size,
            });
        }
        let n = self.size;
        let mut out = RationalMatrix::zero(n);
        for i in 0..n {
            for k in 0..n {
                let a = &self.entries[i * n + k];
                if a.is_zero() {
                    continue;
                }
                for j in 0..n {
                    let b = &other.entries[k * n + j];
                    if !b.is_zero() {
                        out.entries[i * n + j] += a * b;
                    }
                }
            }
        }
        Ok(out)
    }

    /// Inverse by Gauss-Jordan elimination on `[A | I]`.
    ///
    /// # Errors
    ///
    /// [`MathError::Singular`] when some column has no pivot.
    pub fn inverse(&self) -> Result<RationalMatrix> {
        let n = self.size;
        let mut a: Vec<Vec<BigRational>> = (0..n)
            .map(|r| self.entries[r * n..(r + 1) * n].to_vec())
            .collect();
        let mut inv = RationalMatrix::identity(n);

        for col in 0..n {
            let pivot = (col..n)
                .find(|&r| !a[r][col].is_zero())
                .ok_or(MathError::Singular)?;
            if pivot != col {
                a.swap(pivot, col);
                for j in 0..n {
                    inv.entries.swap(pivot * n + j, col * n + j);
                }
            }

            let p = a[col][col].clone();
            for j in 0..n {
                a[col][j] = &a[col][j] / &p;
                inv.entries[col * n + j] = &inv.entries[col * n + j] / &p;
            }

            for row in 0..n {
                if row == col || a[row][col].is_zero() {
                    continue;
                }
                let factor = a[row][col].clone();
                for j in 0..n {
                    let sub = &factor * &a[col][j];
                    a[row][j] -= sub;
                    let sub = &factor * &inv.entries[col * n + j];
                    inv.entries[row * n + j] -= sub;
                }
            }
        }

        Ok(inv)
    }
}

impl fmt::Debug for RationalMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.size {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for c in 0..self.size {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.get(r, c))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for RationalMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reduce `matrix` in place to reduced row-echelon form.
///
/// Returns the pivot column of each non-zero row, in row order.
pub fn reduce_row_echelon(matrix: &mut [Vec<BigRational>]) -> Vec<usize> {
    let rows = matrix.len();
    let cols = matrix.first().map(|r| r.len()).unwrap_or(0);
    let mut pivots = Vec::new();
    let mut pivot_row = 0;

    for col in 0..cols {
        if pivot_row == rows {
            break;
        }

        let Some(pivot_idx) = (pivot_row..rows).find(|&r| !matrix[r][col].is_zero()) else {
            continue;
        };

        if pivot_idx != pivot_row {
            matrix.swap(pivot_row, pivot_idx);
        }

        // Normalize pivot row
        let pivot_val = matrix[pivot_row][col].clone();
        if !pivot_val.is_one() {
            for entry in matrix[pivot_row][col..].iter_mut() {
                if !entry.is_zero() {
                    *entry = &*entry / &pivot_val;
                }
            }
        }

        // Eliminate column
        for row in 0..rows {
            if row == pivot_row || matrix[row][col].is_zero() {
                continue;
            }
            let factor = matrix[row][col].clone();
            for j in col..cols {
                if matrix[pivot_row][j].is_zero() {
                    continue;
                }
                let sub = &factor * &matrix[pivot_row][j];
                matrix[row][j] -= sub;
            }
        }

        pivots.push(col);
        pivot_row += 1;
    }

    pivots
}

/// Basis of the right null space `{ v : M v = 0 }` of a `rows x cols` matrix.
///
/// One basis vector per free (non-pivot) column: a 1 in that column and,
/// in each pivot column, the negated reduced-row entry at the free column.
pub fn null_space(mut matrix: Vec<Vec<BigRational>>, cols: usize) -> Vec<Vec<BigRational>> {
    if matrix.is_empty() {
        return (0..cols)
            .map(|j| {
                let mut v = vec![BigRational::zero(); cols];
                v[j] = BigRational::one();
                v
            })
            .collect();
    }

    let pivots = reduce_row_echelon(&mut matrix);
    let mut is_pivot = vec![false; cols];
    for &p in &pivots {
        is_pivot[p] = true;
    }

    (0..cols)
        .filter(|&free| !is_pivot[free])
        .map(|free| {
            let mut v = vec![BigRational::zero(); cols];
            v[free] = BigRational::one();
            for (row, &p) in pivots.iter().enumerate() {
                let entry = &matrix[row][free];
                if !entry.is_zero() {
                    v[p] = -entry.clone();
                }
            }
            v
        })
        .collect()
}

/// Rank by Gaussian elimination with partial pivoting.
///
/// The pivot in each column is the entry of largest absolute value, which
/// over the rationals keeps intermediate growth down without affecting the
/// result.
pub fn rank(matrix: &[Vec<BigRational>]) -> usize {
    let mut m: Vec<Vec<BigRational>> = matrix.to_vec();
    let rows = m.len();
    let cols = m.first().map(|r| r.len()).unwrap_or(0);
    let mut rank = 0;

    for col in 0..cols {
        if rank == rows {
            break;
        }
        let mut best: Option<usize> = None;
        for r in rank..rows {
            if m[r][col].is_zero() {
                continue;
            }
            match best {
                Some(b) if m[b][col].abs() >= m[r][col].abs() => {}
                _ => best = Some(r),
            }
        }
        let Some(p) = best else {
            continue;
        };
        m.swap(rank, p);

        for r in (rank + 1)..rows {
            if m[r][col].is_zero() {
                continue;
            }
            let factor = &m[r][col] / &m[rank][col];
            for j in col..cols {
                if m[rank][j].is_zero() {
                    continue;
                }
                let sub = &factor * &m[rank][j];
                m[r][j] -= sub;
            }
        }
        rank += 1;
    }

    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn mat_mul_vec(m: &[Vec<BigRational>], v: &[BigRational]) -> Vec<BigRational> {
        m.iter()
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    #[test]
    fn test_identity_and_mul() {
        let a = RationalMatrix::from_i64_rows(&[&[1, 2], &[3, 4]]).unwrap();
        let i = RationalMatrix::identity(2);
        assert!(i.is_identity());
        assert_eq!(a.mul(&i).unwrap(), a);
        let sq = a.mul(&a).unwrap();
        assert_eq!(sq, RationalMatrix::from_i64_rows(&[&[7, 10], &[15, 22]]).unwrap());
    }

    #[test]
    fn test_inverse() {
        let a = RationalMatrix::from_i64_rows(&[&[2, 1], &[7, 4]]).unwrap();
        let inv = a.inverse().unwrap();
        assert_eq!(inv, RationalMatrix::from_i64_rows(&[&[4, -1], &[-7, 2]]).unwrap());
        assert!(a.mul(&inv).unwrap().is_identity());
    }

    #[test]
    fn test_inverse_needs_row_swap() {
        let s = RationalMatrix::from_i64_rows(&[&[0, -1], &[1, 0]]).unwrap();
        let inv = s.inverse().unwrap();
        assert_eq!(inv, RationalMatrix::from_i64_rows(&[&[0, 1], &[-1, 0]]).unwrap());
    }

    #[test]
    fn test_singular() {
        let a = RationalMatrix::from_i64_rows(&[&[1, 2], &[2, 4]]).unwrap();
        assert_eq!(a.inverse(), Err(MathError::Singular));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = RationalMatrix::from_rows(vec![vec![rat(1), rat(2)], vec![rat(3)]]);
        assert!(matches!(err, Err(MathError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_canonical_key() {
        let a = RationalMatrix::from_rows(vec![
            vec![BigRational::new(BigInt::from(2), BigInt::from(4)), rat(0)],
            vec![rat(-3), rat(1)],
        ])
        .unwrap();
        assert_eq!(a.canonical_key(), "1/2,0,-3,1");
    }

    #[test]
    fn test_null_space() {
        // x + y + z = 0, y - z = 0  -> kernel spanned by (-2, 1, 1)
        let m = vec![
            vec![rat(1), rat(1), rat(1)],
            vec![rat(0), rat(1), rat(-1)],
        ];
        let ns = null_space(m.clone(), 3);
        assert_eq!(ns.len(), 1);
        assert_eq!(ns[0], vec![rat(-2), rat(1), rat(1)]);
        assert!(mat_mul_vec(&m, &ns[0]).iter().all(|x| x.is_zero()));
    }

    #[test]
    fn test_null_space_of_empty_matrix() {
        let ns = null_space(Vec::new(), 2);
        assert_eq!(ns, vec![vec![rat(1), rat(0)], vec![rat(0), rat(1)]]);
    }

    #[test]
    fn test_rank() {
        let m = vec![
            vec![rat(1), rat(2), rat(3)],
            vec![rat(2), rat(4), rat(6)],
            vec![rat(0), rat(1), rat(1)],
        ];
        assert_eq!(rank(&m), 2);
        assert_eq!(rank(&[]), 0);
    }
}
