//! Multivariate polynomials over the rationals.
//!
//! A polynomial is a sum of terms kept sorted (descending) under a chosen
//! monomial order, with like terms combined and zero coefficients dropped.
//! Monomials are sparse products of variables; [`Monomial::from_exponents`]
//! and [`Monomial::exponents`] convert to and from dense exponent vectors of
//! a fixed length, which is how the closure engine enumerates them.
//!
//! [`PolynomialRing`] attaches variable names to a variable count and is the
//! only place polynomials are parsed from or rendered to text.

use crate::error::{MathError, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

/// Variable identifier for polynomials.
pub type Var = u32;

/// Null variable constant (indicates no variable).

/// Power of a variable (variable, exponent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarPower {
    /// The variable identifier.
    pub var: Var,
    /// The exponent (power) of the variable.
    pub power: u32,
}

impl VarPower {
    /// Create a new variable power.
    #[inline]
    pub fn new(var: Var, power: u32) -> Self {
        Self { var, power }
    }
}

/// A monomial is a product of variables with exponents.
/// Represented as a sorted list of (variable, power) pairs.
/// The unit monomial (1) is represented as an empty list.
#[derive(Clone)]
pub struct Monomial {
    /// Variables with their exponents, sorted by variable index.
    vars: SmallVec<[VarPower; 4]>,
    /// Cached total degree.
    total_degree: u32,
    /// Cached hash value.
    hash: u64,
}

impl Monomial {
    fn from_sorted(vars: SmallVec<[VarPower; 4]>) -> Self {
        let total_degree = vars.iter().map(|vp| vp.power).sum();
        let hash = compute_monomial_hash(&vars);
        Self {
            vars,
            total_degree,
            hash,
        }
    }

    /// Create the unit monomial (1).
    #[inline]
    pub fn unit() -> Self {
        Self::from_sorted(SmallVec::new())
    }

    /// Create a monomial from a single variable with power 1.
    #[inline]
    pub fn from_var(var: Var) -> Self {
        Self::from_var_power(var, 1)
    }

    /// Create a monomial from a single variable with a given power.
    pub fn from_var_power(var: Var, power: u32) -> Self {
        if power == 0 {
            return Self::unit();
        }
        let mut vars = SmallVec::new();
        vars.push(VarPower::new(var, power));
        Self::from_sorted(vars)
    }

    /// Create a monomial from a list of (variable, power) pairs.
    /// The input doesn't need to be sorted or normalized.
    pub fn from_powers(powers: impl IntoIterator<Item = (Var, u32)>) -> Self {
        let mut var_powers: FxHashMap<Var, u32> = FxHashMap::default();
        for (var, power) in powers {
            if power > 0 {
                *var_powers.entry(var).or_insert(0) += power;
            }
        }

        let mut vars: SmallVec<[VarPower; 4]> = var_powers
            .into_iter()
            .map(|(v, p)| VarPower::new(v, p))
            .collect();
        vars.sort_by_key(|vp| vp.var);
        Self::from_sorted(vars)
    }

    /// Create a monomial from a dense exponent vector; `exps[i]` is the
    /// exponent of variable `i`.
    pub fn from_exponents(exps: &[u32]) -> Self {
        let vars: SmallVec<[VarPower; 4]> = exps
            .iter()
            .enumerate()
            .filter(|(_, e)| **e > 0)
            .map(|(i, e)| VarPower::new(i as Var, *e))
            .collect();
        Self::from_sorted(vars)
    }

    /// Dense exponent vector of length `num_vars`.
    ///
    /// Variables at or beyond `num_vars` are dropped.
    pub fn exponents(&self, num_vars: usize) -> Vec<u32> {
        let mut exps = vec![0; num_vars];
        for vp in &self.vars {
            if let Some(slot) = exps.get_mut(vp.var as usize) {
                *slot = vp.power;
            }
        }
        exps
    }

    /// Returns true if this is the unit monomial.
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.vars.is_empty()
    }

    /// Returns the total degree of the monomial.
    #[inline]
    pub fn total_degree(&self) -> u32 {
        self.total_degree
    }

    /// Returns the variable-power pairs.
    #[inline]
    pub fn vars(&self) -> &[VarPower] {
        &self.vars
    }

    /// Returns the degree of a specific variable in this monomial.
    pub fn degree(&self, var: Var) -> u32 {
        self.vars
            .iter()
            .find(|vp| vp.var == var)
            .map(|vp| vp.power)
            .unwrap_or(0)
    }

    /// Multiply two monomials.
    pub fn mul(&self, other: &Monomial) -> Monomial {
        if self.is_unit() {
            return other.clone();
        }
        if other.is_unit() {
            return self.clone();
        }

        let mut vars: SmallVec<[VarPower; 4]> = SmallVec::new();
        let mut i = 0;
        let mut j = 0;

        while i < self.vars.len() && j < other.vars.len() {
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => {
                    vars.push(self.vars[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    vars.push(other.vars[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    vars.push(VarPower::new(
                        self.vars[i].var,
                        self.vars[i].power + other.vars[j].power,
                    ));
                    i += 1;
                    j += 1;
                }
            }
        }
        vars.extend_from_slice(&self.vars[i..]);
        vars.extend_from_slice(&other.vars[j..]);

        Self::from_sorted(vars)
    }

    /// Check if other divides self. Returns the quotient if it does.
    pub fn div(&self, other: &Monomial) -> Option<Monomial> {
        if other.is_unit() {
            return Some(self.clone());
        }

        let mut vars: SmallVec<[VarPower; 4]> = SmallVec::new();
        let mut j = 0;

        for vp in &self.vars {
            if j < other.vars.len() && other.vars[j].var == vp.var {
                if vp.power < other.vars[j].power {
                    return None;
                }
                let new_power = vp.power - other.vars[j].power;
                if new_power > 0 {
                    vars.push(VarPower::new(vp.var, new_power));
                }
                j += 1;
            } else if j < other.vars.len() && other.vars[j].var < vp.var {
                return None;
            } else {
                vars.push(*vp);
            }
        }

        if j < other.vars.len() {
            return None;
        }

        Some(Self::from_sorted(vars))
    }

    /// Check whether `self` divides `other`.
    #[inline]
    pub fn divides(&self, other: &Monomial) -> bool {
        other.div(self).is_some()
    }

    /// Least common multiple of two monomials.
    pub fn lcm(&self, other: &Monomial) -> Monomial {
        let mut vars: SmallVec<[VarPower; 4]> = SmallVec::new();
        let mut i = 0;
        let mut j = 0;

        while i < self.vars.len() && j < other.vars.len() {
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => {
                    vars.push(self.vars[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    vars.push(other.vars[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    vars.push(VarPower::new(
                        self.vars[i].var,
                        self.vars[i].power.max(other.vars[j].power),
                    ));
                    i += 1;
                    j += 1;
                }
            }
        }
        vars.extend_from_slice(&self.vars[i..]);
        vars.extend_from_slice(&other.vars[j..]);

        Self::from_sorted(vars)
    }

    /// True when the two monomials share no variable.
    pub fn is_coprime(&self, other: &Monomial) -> bool {
        self.vars
            .iter()
            .all(|vp| other.vars.iter().all(|wp| wp.var != vp.var))
    }

    /// Rename every variable through `f`.
    pub fn rename(&self, f: impl Fn(Var) -> Var) -> Monomial {
        Monomial::from_powers(self.vars.iter().map(|vp| (f(vp.var), vp.power)))
    }

    /// Lexicographic comparison of monomials (x0 > x1 > ...).
    pub fn lex_cmp(&self, other: &Monomial) -> Ordering {
        let mut i = 0;
        let mut j = 0;

        while i < self.vars.len() && j < other.vars.len() {
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => return Ordering::Greater,
                Ordering::Greater => return Ordering::Less,
                Ordering::Equal => match self.vars[i].power.cmp(&other.vars[j].power) {
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                    }
                    ord => return ord,
                },
            }
        }

        if i < self.vars.len() {
            Ordering::Greater
        } else if j < other.vars.len() {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Graded lexicographic comparison (total degree first, then lex).
    pub fn grlex_cmp(&self, other: &Monomial) -> Ordering {
        match self.total_degree.cmp(&other.total_degree) {
            Ordering::Equal => self.lex_cmp(other),
            ord => ord,
        }
    }

    /// Graded reverse lexicographic comparison.
    ///
    /// Ties in total degree are broken at the highest-indexed variable whose
    /// exponents differ: the smaller exponent wins.
    pub fn grevlex_cmp(&self, other: &Monomial) -> Ordering {
        match self.total_degree.cmp(&other.total_degree) {
            Ordering::Equal => {
                let mut i = self.vars.len();
                let mut j = other.vars.len();

                while i > 0 && j > 0 {
                    let a = self.vars[i - 1];
                    let b = other.vars[j - 1];
                    match a.var.cmp(&b.var) {
                        // `self` has a positive exponent where `other` has none.
                        Ordering::Greater => return Ordering::Less,
                        Ordering::Less => return Ordering::Greater,
                        Ordering::Equal => match a.power.cmp(&b.power) {
                            Ordering::Equal => {
                                i -= 1;
                                j -= 1;
                            }
                            ord => return ord.reverse(),
                        },
                    }
                }

                // Equal total degree forces both lists to run out together.
                Ordering::Equal
            }
            ord => ord,
        }
    }
}

impl PartialEq for Monomial {
    fn eq(&self, other: &Self) -> bool {
        self.vars == other.vars
    }
}

impl Eq for Monomial {}

fn compute_monomial_hash(vars: &[VarPower]) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    let mut hasher = DefaultHasher::new();
    for vp in vars {
        vp.hash(&mut hasher);
    }
    hasher.finish()
}

impl Hash for Monomial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unit() {
            write!(f, "1")
        } else {
            for (i, vp) in self.vars.iter().enumerate() {
                if i > 0 {
                    write!(f, "*")?;
                }
                if vp.power == 1 {
                    write!(f, "x{}", vp.var)?;
                } else {
                    write!(f, "x{}^{}", vp.var, vp.power)?;
                }
            }
            Ok(())
        }
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A term is a coefficient multiplied by a monomial.
#[derive(Clone, PartialEq, Eq)]
pub struct Term {
    /// The coefficient of the term.
    pub coeff: BigRational,
    /// The monomial part of the term.
    pub monomial: Monomial,
}

impl Term {
    /// Create a new term.
    #[inline]
    pub fn new(coeff: BigRational, monomial: Monomial) -> Self {
        Self { coeff, monomial }
    }

    /// Create a constant term.
    #[inline]
    pub fn constant(c: BigRational) -> Self {
        Self::new(c, Monomial::unit())
    }

    /// Create a term from a single variable.
    #[inline]
    pub fn from_var(var: Var) -> Self {
        Self::new(BigRational::one(), Monomial::from_var(var))
    }

    /// Check if this term is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.monomial.is_unit() {
            write!(f, "{}", self.coeff)
        } else if self.coeff.is_one() {
            write!(f, "{:?}", self.monomial)
        } else if self.coeff == -BigRational::one() {
            write!(f, "-{:?}", self.monomial)
        } else {
            write!(f, "{}*{:?}", self.coeff, self.monomial)
        }
    }
}

/// Monomial ordering for polynomial canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonomialOrder {
    /// Lexicographic order.
    Lex,
    /// Graded lexicographic order.
    GrLex,
    /// Graded reverse lexicographic order.
    #[default]
    GRevLex,
}

impl MonomialOrder {
    /// Compare two monomials using this ordering.
    pub fn compare(&self, a: &Monomial, b: &Monomial) -> Ordering {
        match self {
            MonomialOrder::Lex => a.lex_cmp(b),
            MonomialOrder::GrLex => a.grlex_cmp(b),
            MonomialOrder::GRevLex => a.grevlex_cmp(b),
        }
    }
}

/// A multivariate polynomial over rationals.
/// Represented as a sum of terms, sorted by monomial order.
#[derive(Clone)]
pub struct Polynomial {
    /// Terms in decreasing order (according to monomial order).
    terms: Vec<Term>,
    /// The monomial ordering used.
    order: MonomialOrder,
}

impl Polynomial {
    /// Create the zero polynomial.
    #[inline]
    pub fn zero() -> Self {
        Self {
            terms: Vec::new(),
            order: MonomialOrder::default(),
        }
    }

    /// Create the one polynomial.
    #[inline]
    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    /// Create a constant polynomial.
    pub fn constant(c: BigRational) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self {
                terms: vec![Term::constant(c)],
                order: MonomialOrder::default(),
            }
        }
    }

    /// Create a polynomial from a single variable.
    pub fn from_var(var: Var) -> Self {
        Self {
            terms: vec![Term::from_var(var)],
            order: MonomialOrder::default(),
        }
    }

    /// Create a polynomial x^k.
    pub fn from_var_power(var: Var, power: u32) -> Self {
        if power == 0 {
            Self::one()
        } else {
            Self {
                terms: vec![Term::new(
                    BigRational::one(),
                    Monomial::from_var_power(var, power),
                )],
                order: MonomialOrder::default(),
            }
        }
    }

    /// Create a polynomial from terms. Normalizes and combines like terms.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>, order: MonomialOrder) -> Self {
        let mut poly = Self {
            terms: terms.into_iter().filter(|t| !t.is_zero()).collect(),
            order,
        };
        poly.normalize();
        poly
    }

    /// Create a polynomial from (coefficient, dense exponent vector) pairs.
    pub fn from_exponent_map<'a>(
        entries: impl IntoIterator<Item = (BigRational, &'a [u32])>,
    ) -> Self {
        let terms = entries
            .into_iter()
            .map(|(c, exps)| Term::new(c, Monomial::from_exponents(exps)));
        Self::from_terms(terms, MonomialOrder::default())
    }

    /// The monomial order the terms are sorted by.
    #[inline]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Re-sort the terms under another monomial order.
    pub fn with_order(&self, order: MonomialOrder) -> Polynomial {
        if order == self.order {
            return self.clone();
        }
        Polynomial::from_terms(self.terms.iter().cloned(), order)
    }

    /// Check if the polynomial is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check if the polynomial is a non-zero constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].monomial.is_unit()
    }

    /// Check if the polynomial is one.
    pub fn is_one(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].monomial.is_unit() && self.terms[0].coeff.is_one()
    }

    /// Get the number of terms.
    #[inline]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Get the terms.
    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Get the total degree of the polynomial.
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| t.monomial.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Get the degree with respect to a specific variable.
    pub fn degree(&self, var: Var) -> u32 {
        self.terms
            .iter()
            .map(|t| t.monomial.degree(var))
            .max()
            .unwrap_or(0)
    }

    /// Get all variables in the polynomial.
    pub fn vars(&self) -> Vec<Var> {
        let mut vars: Vec<Var> = self
            .terms
            .iter()
            .flat_map(|t| t.monomial.vars().iter().map(|vp| vp.var))
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Get the leading term (with respect to monomial order).
    #[inline]
    pub fn leading_term(&self) -> Option<&Term> {
        self.terms.first()
    }

    /// Get the leading coefficient.
    pub fn leading_coeff(&self) -> BigRational {
        self.terms
            .first()
            .map(|t| t.coeff.clone())
            .unwrap_or_else(BigRational::zero)
    }

    /// Get the leading monomial.
    pub fn leading_monomial(&self) -> Option<&Monomial> {
        self.terms.first().map(|t| &t.monomial)
    }

    /// Normalize the polynomial (sort terms and combine like terms).
    fn normalize(&mut self) {
        if self.terms.is_empty() {
            return;
        }

        // Sort by monomial order (descending)
        let order = self.order;
        self.terms
            .sort_by(|a, b| order.compare(&b.monomial, &a.monomial));

        // Combine like terms
        let mut i = 0;
        while i < self.terms.len() {
            let mut j = i + 1;
            while j < self.terms.len() && self.terms[j].monomial == self.terms[i].monomial {
                let coeff = self.terms[j].coeff.clone();
                self.terms[i].coeff += coeff;
                j += 1;
            }
            if j > i + 1 {
                self.terms.drain((i + 1)..j);
            }
            i += 1;
        }

        self.terms.retain(|t| !t.coeff.is_zero());
    }

    /// Negate the polynomial.
    pub fn neg(&self) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(-t.coeff.clone(), t.monomial.clone()))
                .collect(),
            order: self.order,
        }
    }

    /// Add two polynomials.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut terms: Vec<Term> = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Polynomial::from_terms(terms, self.order)
    }

    /// Subtract two polynomials.
    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        self.add(&other.neg())
    }

    /// Multiply by a scalar.
    pub fn scale(&self, c: &BigRational) -> Polynomial {
        if c.is_zero() {
            return Polynomial {
                terms: Vec::new(),
                order: self.order,
            };
        }
        if c.is_one() {
            return self.clone();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(&t.coeff * c, t.monomial.clone()))
                .collect(),
            order: self.order,
        }
    }

    /// Multiply two polynomials.
    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }

        let mut terms: Vec<Term> = Vec::with_capacity(self.terms.len() * other.terms.len());

        for t1 in &self.terms {
            for t2 in &other.terms {
                terms.push(Term::new(
                    &t1.coeff * &t2.coeff,
                    t1.monomial.mul(&t2.monomial),
                ));
            }
        }

        Polynomial::from_terms(terms, self.order)
    }

    /// Multiply by a monomial.
    pub fn mul_monomial(&self, m: &Monomial) -> Polynomial {
        if m.is_unit() {
            return self.clone();
        }
        // Multiplying by a monomial preserves every admissible order.
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(t.coeff.clone(), t.monomial.mul(m)))
                .collect(),
            order: self.order,
        }
    }

    /// Compute p^k.
    pub fn pow(&self, k: u32) -> Polynomial {
        if k == 0 {
            return Polynomial::one();
        }
        if k == 1 {
            return self.clone();
        }
        if self.is_zero() {
            return Polynomial::zero();
        }

        // Binary exponentiation
        let mut result = Polynomial::one();
        let mut base = self.clone();
        let mut exp = k;

        while exp > 0 {
            if exp & 1 == 1 {
                result = Polynomial::mul(&result, &base);
            }
            base = Polynomial::mul(&base, &base);
            exp >>= 1;
        }

        result
    }

    /// Compute the derivative with respect to a variable.
    pub fn derivative(&self, var: Var) -> Polynomial {
        let terms: Vec<Term> = self
            .terms
            .iter()
            .filter_map(|t| {
                let d = t.monomial.degree(var);
                if d == 0 {
                    return None;
                }
                let new_coeff = &t.coeff * BigRational::from_integer(BigInt::from(d));
                let new_mon = t
                    .monomial
                    .div(&Monomial::from_var(var))
                    .unwrap_or_else(Monomial::unit);
                Some(Term::new(new_coeff, new_mon))
            })
            .collect();
        Polynomial::from_terms(terms, self.order)
    }

    /// Evaluate at a dense point; `point[i]` is the value of variable `i`.
    ///
    /// Variables beyond the end of `point` evaluate to zero.
    pub fn eval_point(&self, point: &[BigRational]) -> BigRational {
        let mut result = BigRational::zero();

        'terms: for term in &self.terms {
            let mut val = term.coeff.clone();
            for vp in term.monomial.vars() {
                match point.get(vp.var as usize) {
                    Some(x) if !x.is_zero() => val *= x.pow(vp.power as i32),
                    _ => continue 'terms,
                }
            }
            result += val;
        }

        result
    }

    /// True when the polynomial vanishes exactly at `point`.
    #[inline]
    pub fn vanishes_at(&self, point: &[BigRational]) -> bool {
        self.eval_point(point).is_zero()
    }

    /// Make the polynomial monic (leading coefficient = 1).
    pub fn make_monic(&self) -> Polynomial {
        if self.is_zero() {
            return self.clone();
        }
        let lc = self.leading_coeff();
        if lc.is_one() {
            return self.clone();
        }
        self.scale(&(BigRational::one() / lc))
    }

    /// Rename every variable through `f`.
    pub fn rename_vars(&self, f: impl Fn(Var) -> Var) -> Polynomial {
        let terms = self
            .terms
            .iter()
            .map(|t| Term::new(t.coeff.clone(), t.monomial.rename(&f)));
        Polynomial::from_terms(terms, self.order)
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        if self.terms.len() != other.terms.len() {
            return false;
        }
        if self.order == other.order {
            return self.terms.iter().zip(&other.terms).all(|(a, b)| a == b);
        }
        let other = other.with_order(self.order);
        self.terms.iter().zip(&other.terms).all(|(a, b)| a == b)
    }
}

impl Eq for Polynomial {}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "0")
        } else {
            for (i, term) in self.terms.iter().enumerate() {
                if i == 0 {
                    write!(f, "{:?}", term)?;
                } else if term.coeff.is_negative() {
                    write!(
                        f,
                        " - {:?}",
                        Term::new(-term.coeff.clone(), term.monomial.clone())
                    )?;
                } else {
                    write!(f, " + {:?}", term)?;
                }
            }
            Ok(())
        }
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Self::Output {
        Polynomial::neg(&self)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Self::Output {
        Polynomial::neg(self)
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Self::Output {
        Polynomial::add(&self, &rhs)
    }
}

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Self::Output {
        Polynomial::add(self, rhs)
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Self) -> Self::Output {
        Polynomial::sub(&self, &rhs)
    }
}

impl Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Self::Output {
        Polynomial::sub(self, rhs)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Self::Output {
        Polynomial::mul(&self, &rhs)
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Self::Output {
        Polynomial::mul(self, rhs)
    }
}

/// A polynomial ring `Q[x_0, ..., x_{n-1}]` with named variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialRing {
    names: Vec<String>,
    order: MonomialOrder,
}

impl PolynomialRing {
    /// Ring with variables named `x0, x1, ...`.
    pub fn new(num_vars: usize, order: MonomialOrder) -> Self {
        Self {
            names: (0..num_vars).map(|i| format!("x{i}")).collect(),
            order,
        }
    }

    /// Ring of polynomials in the entries of an `n x n` matrix.
    ///
    /// Entry `(r, c)` is variable `r * n + c` and is named `x{r+1}{c+1}`
    /// (1-based); sizes above 9 insert an underscore, `x{r+1}_{c+1}`.
    pub fn matrix_entries(n: usize, order: MonomialOrder) -> Self {
        let mut names = Vec::with_capacity(n * n);
        for r in 1..=n {
            for c in 1..=n {
                if n > 9 {
                    names.push(format!("x{r}_{c}"));
                } else {
                    names.push(format!("x{r}{c}"));
                }
            }
        }
        Self { names, order }
    }

    /// Number of variables.
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.names.len()
    }

    /// The ring's monomial order.
    #[inline]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Variable names, indexed by variable.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Look up a variable by name.
    pub fn var(&self, name: &str) -> Option<Var> {
        self.names.iter().position(|n| n == name).map(|i| i as Var)
    }

    /// Parse a polynomial such as `x11*x22 - x12*x21 - 1`.
    ///
    /// Accepts `+ - * ^`, parentheses, integer and `p/q` rational literals
    /// and the ring's variable names.
    pub fn parse(&self, text: &str) -> Result<Polynomial> {
        let mut parser = Parser {
            ring: self,
            chars: text.char_indices().collect(),
            pos: 0,
        };
        let poly = parser.expr()?;
        parser.skip_ws();
        if parser.pos < parser.chars.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(poly.with_order(self.order))
    }

    /// Render a polynomial with this ring's variable names.
    pub fn format(&self, poly: &Polynomial) -> String {
        if poly.is_zero() {
            return "0".to_string();
        }
        let mut out = String::new();
        for (i, term) in poly.terms().iter().enumerate() {
            let negative = term.coeff.is_negative();
            let abs = term.coeff.abs();
            if i == 0 {
                if negative {
                    out.push('-');
                }
            } else if negative {
                out.push_str(" - ");
            } else {
                out.push_str(" + ");
            }
            let mono = self.format_monomial(&term.monomial);
            if term.monomial.is_unit() {
                out.push_str(&abs.to_string());
            } else if abs.is_one() {
                out.push_str(&mono);
            } else {
                out.push_str(&format!("{abs}*{mono}"));
            }
        }
        out
    }

    fn format_monomial(&self, m: &Monomial) -> String {
        m.vars()
            .iter()
            .map(|vp| {
                let name = self
                    .names
                    .get(vp.var as usize)
                    .cloned()
                    .unwrap_or_else(|| format!("x{}", vp.var));
                if vp.power == 1 {
                    name
                } else {
                    format!("{name}^{}", vp.power)
                }
            })
            .collect::<Vec<_>>()
            .join("*")
    }
}

struct Parser<'a> {
    ring: &'a PolynomialRing,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> MathError {
        let position = self
            .chars
            .get(self.pos)
            .map(|(i, _)| *i)
            .unwrap_or_else(|| self.chars.last().map(|(i, c)| i + c.len_utf8()).unwrap_or(0));
        MathError::Parse {
            position,
            message: message.to_string(),
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].1.is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn expr(&mut self) -> Result<Polynomial> {
        let mut acc = self.term()?;
        while let Some(c) = self.peek() {
            match c {
                '+' => {
                    self.pos += 1;
                    acc = &acc + &self.term()?;
                }
                '-' => {
                    self.pos += 1;
                    acc = &acc - &self.term()?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Polynomial> {
        let mut acc = self.unary()?;
        while self.peek() == Some('*') {
            self.pos += 1;
            acc = &acc * &self.unary()?;
        }
        Ok(acc)
    }

    fn power(&mut self) -> Result<Polynomial> {
        let base = self.primary()?;
        if self.peek() == Some('^') {
            self.pos += 1;
            self.skip_ws();
            let digits = self.digits();
            let exp: u32 = digits
                .parse()
                .map_err(|_| self.error("expected a non-negative integer exponent"))?;
            return Ok(base.pow(exp));
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<Polynomial> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(self.unary()?.neg())
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn primary(&mut self) -> Result<Polynomial> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let inner = self.expr()?;
                if self.peek() != Some(')') {
                    return Err(self.error("expected ')'"));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(c) if c.is_ascii_digit() => {
                let numer: BigInt = self
                    .digits()
                    .parse()
                    .map_err(|_| self.error("malformed integer"))?;
                if self.peek() == Some('/') {
                    self.pos += 1;
                    self.skip_ws();
                    let denom: BigInt = self
                        .digits()
                        .parse()
                        .map_err(|_| self.error("malformed denominator"))?;
                    if denom.is_zero() {
                        return Err(self.error("zero denominator"));
                    }
                    return Ok(Polynomial::constant(BigRational::new(numer, denom)));
                }
                Ok(Polynomial::constant(BigRational::from_integer(numer)))
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                let start = self.pos;
                while self.pos < self.chars.len() {
                    let c = self.chars[self.pos].1;
                    if c.is_alphanumeric() || c == '_' {
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                let name: String = self.chars[start..self.pos].iter().map(|(_, c)| c).collect();
                match self.ring.var(&name) {
                    Some(v) => Ok(Polynomial::from_var(v)),
                    None => {
                        self.pos = start;
                        Err(self.error(&format!("unknown variable '{name}'")))
                    }
                }
            }
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn digits(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.chars.len() && self.chars[self.pos].1.is_ascii_digit() {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().map(|(_, c)| c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    #[test]
    fn test_monomial_unit() {
        let m = Monomial::unit();
        assert!(m.is_unit());
        assert_eq!(m.total_degree(), 0);
    }

    #[test]
    fn test_monomial_mul() {
        let m1 = Monomial::from_var_power(0, 2); // x^2
        let m2 = Monomial::from_var_power(0, 3); // x^3
        let m3 = m1.mul(&m2);
        assert_eq!(m3.total_degree(), 5);
        assert_eq!(m3.degree(0), 5);
    }

    #[test]
    fn test_monomial_div() {
        let m1 = Monomial::from_var_power(0, 5); // x^5
        let m2 = Monomial::from_var_power(0, 2); // x^2
        let m3 = m1.div(&m2).unwrap();
        assert_eq!(m3.degree(0), 3);

        // Cannot divide x^2 by x^5
        assert!(m2.div(&m1).is_none());
    }

    #[test]
    fn test_monomial_lcm() {
        let a = Monomial::from_powers([(0, 2), (1, 1)]);
        let b = Monomial::from_powers([(1, 3), (2, 1)]);
        let l = a.lcm(&b);
        assert_eq!(l.exponents(3), vec![2, 3, 1]);
        assert!(a.divides(&l));
        assert!(b.divides(&l));
    }

    #[test]
    fn test_exponent_round_trip() {
        let m = Monomial::from_exponents(&[0, 2, 0, 1]);
        assert_eq!(m.total_degree(), 3);
        assert_eq!(m.exponents(4), vec![0, 2, 0, 1]);
        assert!(Monomial::from_exponents(&[0, 0]).is_unit());
    }

    #[test]
    fn test_grevlex_order() {
        // x0*x2 < x1^2 in grevlex (x2 appears, smaller exponent on x2 wins)
        let a = Monomial::from_powers([(0, 1), (2, 1)]);
        let b = Monomial::from_powers([(1, 2)]);
        assert_eq!(a.grevlex_cmp(&b), Ordering::Less);
        assert_eq!(b.grevlex_cmp(&a), Ordering::Greater);
        // x0^2 > x0*x1 > x1^2
        let x0sq = Monomial::from_var_power(0, 2);
        let x0x1 = Monomial::from_powers([(0, 1), (1, 1)]);
        let x1sq = Monomial::from_var_power(1, 2);
        assert_eq!(x0sq.grevlex_cmp(&x0x1), Ordering::Greater);
        assert_eq!(x0x1.grevlex_cmp(&x1sq), Ordering::Greater);
        // degree dominates
        assert_eq!(Monomial::from_var(3).grevlex_cmp(&x1sq), Ordering::Less);
    }

    fn int_poly(entries: &[(i64, &[u32])]) -> Polynomial {
        Polynomial::from_exponent_map(entries.iter().map(|(c, e)| (rat(*c), *e)))
    }

    #[test]
    fn test_unit_has_one_representation() {
        assert_eq!(Monomial::unit(), Monomial::from_exponents(&[0, 0]));
        assert_eq!(Monomial::unit(), Monomial::from_powers([(3, 0)]));
        let x = Monomial::from_var(1);
        assert_eq!(x.div(&x), Some(Monomial::unit()));

        let computed_one = int_poly(&[(1, &[0, 0])]);
        assert_eq!(computed_one, Polynomial::one());
        assert!((&Polynomial::one() - &computed_one).is_zero());
        // x1 - 1 built two ways cancels
        let a = &Polynomial::from_var(1) - &Polynomial::one();
        let b = int_poly(&[(1, &[0, 1]), (-1, &[0, 0])]);
        assert!((&a - &b).is_zero());
    }

    #[test]
    fn test_polynomial_add_cancels() {
        let p = int_poly(&[(1, &[1]), (1, &[0])]);
        let q = int_poly(&[(-1, &[1]), (2, &[0])]);
        let r = &p + &q;
        assert!(r.is_constant());
        assert_eq!(r, Polynomial::constant(rat(3)));
    }

    #[test]
    fn test_polynomial_mul() {
        // (x + 1)(x - 1) = x^2 - 1
        let p = int_poly(&[(1, &[1]), (1, &[0])]);
        let q = int_poly(&[(1, &[1]), (-1, &[0])]);
        let r = &p * &q;
        assert_eq!(r, int_poly(&[(1, &[2]), (-1, &[0])]));
    }

    #[test]
    fn test_derivative() {
        // d/dx0 (x0^2*x1 + 3*x0) = 2*x0*x1 + 3
        let p = int_poly(&[(1, &[2, 1]), (3, &[1, 0])]);
        let d = p.derivative(0);
        assert_eq!(d, int_poly(&[(2, &[1, 1]), (3, &[0, 0])]));
        assert!(p.derivative(5).is_zero());
    }

    #[test]
    fn test_eval_point() {
        // x0*x3 - x1*x2 - 1 at [[2, 3], [1, 2]] = 4 - 3 - 1 = 0
        let det = int_poly(&[(1, &[1, 0, 0, 1]), (-1, &[0, 1, 1, 0]), (-1, &[0, 0, 0, 0])]);
        let point = [rat(2), rat(3), rat(1), rat(2)];
        assert!(det.vanishes_at(&point));
        assert_eq!(det.eval_point(&[rat(1), rat(0), rat(0), rat(3)]), rat(2));
    }

    #[test]
    fn test_make_monic() {
        let p = int_poly(&[(2, &[1]), (4, &[0])]);
        let m = p.make_monic();
        assert!(m.leading_coeff().is_one());
        assert_eq!(m, int_poly(&[(1, &[1]), (2, &[0])]));
    }

    #[test]
    fn test_equality_across_orders() {
        let p = int_poly(&[(1, &[1, 0]), (1, &[0, 2])]);
        assert_eq!(p.with_order(MonomialOrder::Lex), p);
    }

    #[test]
    fn test_ring_parse_and_format() {
        let ring = PolynomialRing::matrix_entries(2, MonomialOrder::GRevLex);
        let det = ring.parse("x11*x22 - x12*x21 - 1").unwrap();
        let expected = int_poly(&[(1, &[1, 0, 0, 1]), (-1, &[0, 1, 1, 0]), (-1, &[0, 0, 0, 0])]);
        assert_eq!(det, expected);
        assert!((&det - &expected).is_zero());
        assert_eq!(ring.parse(&ring.format(&det)).unwrap(), det);
    }

    #[test]
    fn test_ring_parse_powers_and_rationals() {
        let ring = PolynomialRing::new(2, MonomialOrder::GRevLex);
        let p = ring.parse("(x0 + 1)^2 - 1/2*x1").unwrap();
        let half = BigRational::new(BigInt::from(1), BigInt::from(2));
        let expected = Polynomial::from_exponent_map([
            (rat(1), &[2u32, 0][..]),
            (rat(2), &[1, 0][..]),
            (-half, &[0, 1][..]),
            (rat(1), &[0, 0][..]),
        ]);
        assert_eq!(p, expected);
        // Unary minus binds looser than ^.
        let q = ring.parse("-x0^2").unwrap();
        assert_eq!(q, Polynomial::from_var_power(0, 2).neg());
    }

    #[test]
    fn test_ring_parse_errors() {
        let ring = PolynomialRing::new(2, MonomialOrder::GRevLex);
        assert!(matches!(ring.parse("x0 + y"), Err(MathError::Parse { .. })));
        assert!(matches!(ring.parse("(x0"), Err(MathError::Parse { .. })));
        assert!(matches!(ring.parse("x0 1"), Err(MathError::Parse { .. })));
    }
}
