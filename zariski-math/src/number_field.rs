//! Number fields `K = Q(α)` given by a monic minimal polynomial.
//!
//! An element is the coefficient vector `[a₀, ..., a_{d-1}]` of
//! `a₀ + a₁α + ... + a_{d-1}α^{d-1}`; the field owns the minimal polynomial
//! and performs all arithmetic. [`FieldMatrix`] is a square matrix over `K`.

use crate::error::{MathError, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;

/// An element of a number field, stored as exactly `degree` coefficients.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldElement {
    /// Coefficients with respect to the power basis `1, α, ..., α^{d-1}`.
    pub coeffs: Vec<BigRational>,
}

impl FieldElement {
    /// The rational part (coefficient of 1).
    pub fn rational_part(&self) -> BigRational {
        self.coeffs.first().cloned().unwrap_or_else(BigRational::zero)
    }

    /// Check if this element is zero.
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }
}

/// A number field `Q[x]/(p(x))` with `p` monic and irreducible.
///
/// Irreducibility is the caller's responsibility; it is not checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberField {
    /// Minimal polynomial coefficients, low degree first, last entry 1.
    minimal_poly: Vec<BigRational>,
}

impl NumberField {
    /// Create a field from a monic minimal polynomial (coefficients low→high).
    ///
    /// # Errors
    ///
    /// Fails when the polynomial has degree 0 or is not monic.
    pub fn new(minimal_poly: Vec<BigRational>) -> Result<Self> {
        if minimal_poly.len() < 2 {
            return Err(MathError::InvalidMinimalPolynomial(
                "degree must be at least 1".to_string(),
            ));
        }
        match minimal_poly.last() {
            Some(lead) if lead.is_one() => Ok(Self { minimal_poly }),
            _ => Err(MathError::InvalidMinimalPolynomial(
                "polynomial must be monic".to_string(),
            )),
        }
    }

    /// Create a field from integer coefficients (low→high).
    pub fn from_i64(coeffs: &[i64]) -> Result<Self> {
        Self::new(
            coeffs
                .iter()
                .map(|&c| BigRational::from_integer(BigInt::from(c)))
                .collect(),
        )
    }

    /// The rationals, as the degree-1 field `Q[x]/(x)`.
    pub fn rationals() -> Self {
        Self {
            minimal_poly: vec![BigRational::zero(), BigRational::one()],
        }
    }

    /// Degree `[K : Q]`.
    #[inline]
    pub fn degree(&self) -> usize {
        self.minimal_poly.len() - 1
    }

    /// Minimal polynomial coefficients, low degree first.
    #[inline]
    pub fn minimal_poly(&self) -> &[BigRational] {
        &self.minimal_poly
    }

    /// Coefficients of `α^d` reduced modulo the minimal polynomial,
    /// i.e. `-p_0, ..., -p_{d-1}`.
    pub fn alpha_power_degree(&self) -> Vec<BigRational> {
        self.minimal_poly[..self.degree()]
            .iter()
            .map(|c| -c.clone())
            .collect()
    }

    /// Build an element, padding or validating to `degree` coefficients.
    pub fn element(&self, coeffs: Vec<BigRational>) -> Result<FieldElement> {
        let d = self.degree();
        if coeffs.len() > d {
            return Err(MathError::FieldMismatch {
                degree: d,
                found: coeffs.len(),
            });
        }
        let mut coeffs = coeffs;
        coeffs.resize(d, BigRational::zero());
        Ok(FieldElement { coeffs })
    }

    /// Build an element from integer coefficients.
    pub fn element_i64(&self, coeffs: &[i64]) -> Result<FieldElement> {
        self.element(
            coeffs
                .iter()
                .map(|&c| BigRational::from_integer(BigInt::from(c)))
                .collect(),
        )
    }

    /// Embed a rational.
    pub fn from_rational(&self, r: BigRational) -> FieldElement {
        let mut coeffs = vec![BigRational::zero(); self.degree()];
        coeffs[0] = r;
        FieldElement { coeffs }
    }

    /// The zero element.
    pub fn zero(&self) -> FieldElement {
        self.from_rational(BigRational::zero())
    }

    /// The unit element.
    pub fn one(&self) -> FieldElement {
        self.from_rational(BigRational::one())
    }

    /// The generator `α` (equal to `-p_0` when the degree is 1).
    pub fn alpha(&self) -> FieldElement {
        if self.degree() == 1 {
            return FieldElement {
                coeffs: self.alpha_power_degree(),
            };
        }
        let mut coeffs = vec![BigRational::zero(); self.degree()];
        coeffs[1] = BigRational::one();
        FieldElement { coeffs }
    }

    /// Check that an element has this field's degree.
    pub fn check(&self, a: &FieldElement) -> Result<()> {
        if a.coeffs.len() == self.degree() {
            Ok(())
        } else {
            Err(MathError::FieldMismatch {
                degree: self.degree(),
                found: a.coeffs.len(),
            })
        }
    }

    /// Reduce an arbitrary-length coefficient vector modulo the minimal
    /// polynomial, returning exactly `degree` coefficients.
    pub fn reduce(&self, coeffs: &[BigRational]) -> Vec<BigRational> {
        let d = self.degree();
        let mut result = coeffs.to_vec();

        // Monic divisor: the quotient coefficient is the leading coefficient.
        while result.len() > d {
            let Some(lead) = result.pop() else {
                break;
            };
            if lead.is_zero() {
                continue;
            }
            let shift = result.len() - d;
            for (i, p) in self.minimal_poly[..d].iter().enumerate() {
                if !p.is_zero() {
                    result[shift + i] -= &lead * p;
                }
            }
        }

        result.resize(d, BigRational::zero());
        result
    }

    /// `a + b`.
    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement {
            coeffs: a.coeffs.iter().zip(&b.coeffs).map(|(x, y)| x + y).collect(),
        }
    }

    /// `a - b`.
    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement {
            coeffs: a.coeffs.iter().zip(&b.coeffs).map(|(x, y)| x - y).collect(),
        }
    }

    /// `-a`.
    pub fn neg(&self, a: &FieldElement) -> FieldElement {
        FieldElement {
            coeffs: a.coeffs.iter().map(|c| -c).collect(),
        }
    }

    /// `a * b` reduced modulo the minimal polynomial.
    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let product = poly_mul(&a.coeffs, &b.coeffs);
        FieldElement {
            coeffs: self.reduce(&product),
        }
    }

    /// Multiplicative inverse via the extended Euclidean algorithm in `Q[x]`.
    ///
    /// # Errors
    ///
    /// [`MathError::Singular`] for the zero element.
    pub fn inverse(&self, a: &FieldElement) -> Result<FieldElement> {
        if a.is_zero() {
            return Err(MathError::Singular);
        }
        let (gcd, s) = extended_gcd(&trim(&a.coeffs), &self.minimal_poly);
        // gcd is a non-zero constant because the minimal polynomial is
        // irreducible and `a` is a non-zero element of smaller degree.
        let g = match gcd.as_slice() {
            [c] if !c.is_zero() => c.clone(),
            _ => return Err(MathError::Singular),
        };
        let scaled: Vec<BigRational> = s.iter().map(|c| c / &g).collect();
        Ok(FieldElement {
            coeffs: self.reduce(&scaled),
        })
    }

    /// Human-readable description, e.g. `Q[a]/(a^2 - 2)`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.degree() == 1 && self.minimal_poly[0].is_zero() {
            return write!(f, "Q");
        }
        write!(f, "Q[a]/(")?;
        let mut first = true;
        for (k, c) in self.minimal_poly.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let mono = match k {
                0 => String::new(),
                1 => "a".to_string(),
                _ => format!("a^{k}"),
            };
            let abs = c.abs();
            let body = if mono.is_empty() {
                abs.to_string()
            } else if abs.is_one() {
                mono
            } else {
                format!("{abs}*{mono}")
            };
            if first {
                if c.is_negative() {
                    write!(f, "-")?;
                }
                write!(f, "{body}")?;
                first = false;
            } else if c.is_negative() {
                write!(f, " - {body}")?;
            } else {
                write!(f, " + {body}")?;
            }
        }
        write!(f, ")")
    }
}

fn trim(a: &[BigRational]) -> Vec<BigRational> {
    let mut v = a.to_vec();
    while v.len() > 1 && v.last().is_some_and(|c| c.is_zero()) {
        v.pop();
    }
    v
}

fn poly_mul(a: &[BigRational], b: &[BigRational]) -> Vec<BigRational> {
    if a.is_empty() || b.is_empty() {
        return vec![BigRational::zero()];
    }
    let mut result = vec![BigRational::zero(); a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        if x.is_zero() {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            if !y.is_zero() {
                result[i + j] += x * y;
            }
        }
    }
    result
}

fn poly_sub(a: &[BigRational], b: &[BigRational]) -> Vec<BigRational> {
    let mut result = vec![BigRational::zero(); a.len().max(b.len())];
    for (i, c) in a.iter().enumerate() {
        result[i] += c;
    }
    for (i, c) in b.iter().enumerate() {
        result[i] -= c;
    }
    trim(&result)
}

/// Polynomial division in `Q[x]`: returns (quotient, remainder).
fn poly_div(a: &[BigRational], b: &[BigRational]) -> (Vec<BigRational>, Vec<BigRational>) {
    let b = trim(b);
    let mut remainder = trim(a);
    let Some(b_lead) = b.last().cloned() else {
        return (vec![BigRational::zero()], remainder);
    };
    if b_lead.is_zero() {
        return (vec![BigRational::zero()], remainder);
    }
    let mut quotient = vec![BigRational::zero(); remainder.len().saturating_sub(b.len()) + 1];

    while remainder.len() >= b.len() && !(remainder.len() == 1 && remainder[0].is_zero()) {
        let Some(r_lead) = remainder.last().cloned() else {
            break;
        };
        let deg_diff = remainder.len() - b.len();
        let q = &r_lead / &b_lead;
        for (i, bc) in b.iter().enumerate() {
            remainder[i + deg_diff] -= &q * bc;
        }
        quotient[deg_diff] = q;
        remainder.pop();
        if remainder.is_empty() {
            remainder.push(BigRational::zero());
            break;
        }
        remainder = trim(&remainder);
    }

    (trim(&quotient), remainder)
}

/// Returns `(g, s)` with `s*a ≡ g (mod b)`, where `g = gcd(a, b)`.
fn extended_gcd(a: &[BigRational], b: &[BigRational]) -> (Vec<BigRational>, Vec<BigRational>) {
    let mut r0 = trim(a);
    let mut r1 = trim(b);
    let mut s0 = vec![BigRational::one()];
    let mut s1 = vec![BigRational::zero()];

    while !(r1.len() == 1 && r1[0].is_zero()) {
        let (q, r) = poly_div(&r0, &r1);
        let s = poly_sub(&s0, &poly_mul(&q, &s1));
        r0 = std::mem::replace(&mut r1, r);
        s0 = std::mem::replace(&mut s1, s);
    }

    (r0, s0)
}

/// An `n x n` matrix over a number field, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMatrix {
    n: usize,
    entries: Vec<FieldElement>,
}

impl FieldMatrix {
    /// Build from rows of field elements.
    pub fn from_rows(field: &NumberField, rows: Vec<Vec<FieldElement>>) -> Result<Self> {
        let n = rows.len();
        let mut entries = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(MathError::DimensionMismatch {
                    expected: n,
                    found: row.len(),
                });
            }
            for e in row {
                field.check(&e)?;
                entries.push(e);
            }
        }
        Ok(Self { n, entries })
    }

    /// Build from rational entries embedded into `field`.
    pub fn from_rationals(field: &NumberField, rows: Vec<Vec<BigRational>>) -> Result<Self> {
        Self::from_rows(
            field,
            rows.into_iter()
                .map(|r| r.into_iter().map(|x| field.from_rational(x)).collect())
                .collect(),
        )
    }

    /// Build from integer entries embedded into `field`.
    pub fn from_i64_rows(field: &NumberField, rows: &[&[i64]]) -> Result<Self> {
        Self::from_rationals(
            field,
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|&x| BigRational::from_integer(BigInt::from(x)))
                        .collect()
                })
                .collect(),
        )
    }

    /// The identity matrix over `field`.
    pub fn identity(field: &NumberField, n: usize) -> Self {
        let mut entries = vec![field.zero(); n * n];
        for i in 0..n {
            entries[i * n + i] = field.one();
        }
        Self { n, entries }
    }

    /// Matrix size.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &FieldElement {
        &self.entries[row * self.n + col]
    }

    /// Row-major entries.
    pub fn entries(&self) -> &[FieldElement] {
        &self.entries
    }

    /// Matrix product over `field`.
    pub fn mul(&self, field: &NumberField, other: &FieldMatrix) -> Result<FieldMatrix> {
        if self.n != other.n {
            return Err(MathError::DimensionMismatch {
                expected: self.n,
                found: other.n,
            });
        }
        let n = self.n;
        let mut entries = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let mut acc = field.zero();
                for k in 0..n {
                    let a = self.get(i, k);
                    if a.is_zero() {
                        continue;
                    }
                    acc = field.add(&acc, &field.mul(a, other.get(k, j)));
                }
                entries.push(acc);
            }
        }
        Ok(FieldMatrix { n, entries })
    }

    /// Inverse by Gauss-Jordan elimination over `field`.
    ///
    /// # Errors
    ///
    /// [`MathError::Singular`] when some column has no pivot.
    pub fn inverse(&self, field: &NumberField) -> Result<FieldMatrix> {
        let n = self.n;
        let mut a: Vec<Vec<FieldElement>> = (0..n)
            .map(|r| self.entries[r * n..(r + 1) * n].to_vec())
            .collect();
        let mut inv: Vec<Vec<FieldElement>> = (0..n)
            .map(|r| {
                (0..n)
                    .map(|c| if r == c { field.one() } else { field.zero() })
                    .collect()
            })
            .collect();

        for col in 0..n {
            let pivot = (col..n)
                .find(|&r| !a[r][col].is_zero())
                .ok_or(MathError::Singular)?;
            a.swap(pivot, col);
            inv.swap(pivot, col);

            let p_inv = field.inverse(&a[col][col])?;
            for j in 0..n {
                a[col][j] = field.mul(&a[col][j], &p_inv);
                inv[col][j] = field.mul(&inv[col][j], &p_inv);
            }

            for row in 0..n {
                if row == col || a[row][col].is_zero() {
                    continue;
                }
                let factor = a[row][col].clone();
                for j in 0..n {
                    let sub = field.mul(&factor, &a[col][j]);
                    a[row][j] = field.sub(&a[row][j], &sub);
                    let sub = field.mul(&factor, &inv[col][j]);
                    inv[row][j] = field.sub(&inv[row][j], &sub);
                }
            }
        }

        Ok(FieldMatrix {
            n,
            entries: inv.into_iter().flatten().collect(),
        })
    }
}
