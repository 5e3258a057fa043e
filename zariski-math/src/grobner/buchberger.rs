//! Buchberger's algorithm with the product criterion and sugar selection.
//!
//! Pairs are processed lowest-sugar first. Every processed pair counts
//! against the iteration budget; exceeding it aborts the computation with
//! [`GrobnerError::IterationBudget`] rather than returning a partial basis.

use super::{GrobnerBasis, GrobnerEngine, GrobnerError, GrobnerStats};
use crate::polynomial::{Monomial, MonomialOrder, Polynomial, Term, Var};
use num_rational::BigRational;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Critical pair for S-polynomial computation
#[derive(Debug, Clone)]
struct CriticalPair {
    i: usize,
    j: usize,
    /// Degree of LCM
    degree: u32,
    /// Sugar degree (for selection strategy)
    sugar: u32,
}

impl Ord for CriticalPair {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower sugar is better; ties broken for determinism.
        other
            .sugar
            .cmp(&self.sugar)
            .then_with(|| other.degree.cmp(&self.degree))
            .then_with(|| other.j.cmp(&self.j))
            .then_with(|| other.i.cmp(&self.i))
    }
}

impl PartialOrd for CriticalPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CriticalPair {
    fn eq(&self, other: &Self) -> bool {
        self.i == other.i && self.j == other.j
    }
}

impl Eq for CriticalPair {}

/// Configuration for [`BuchbergerEngine`].
#[derive(Debug, Clone)]
pub struct BuchbergerConfig {
    /// Enable product criterion
    pub use_product_criterion: bool,
    /// Use sugar selection strategy (otherwise plain LCM degree)
    pub use_sugar_strategy: bool,
}

impl Default for BuchbergerConfig {
    fn default() -> Self {
        Self {
            use_product_criterion: true,
            use_sugar_strategy: true,
        }
    }
}

/// Gröbner engine backed by Buchberger's algorithm over `Q`.
#[derive(Debug, Clone, Default)]
pub struct BuchbergerEngine {
    config: BuchbergerConfig,
}

impl BuchbergerEngine {
    /// Engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom configuration.
    pub fn with_config(config: BuchbergerConfig) -> Self {
        Self { config }
    }
}

impl GrobnerEngine for BuchbergerEngine {
    fn grobner_basis(
        &self,
        polys: &[Polynomial],
        order: MonomialOrder,
        max_iterations: usize,
    ) -> Result<GrobnerBasis, GrobnerError> {
        let mut run = Run::new(&self.config, order, max_iterations);
        let basis = run.compute(polys)?;
        let mut stats = run.stats;
        stats.output_generators = basis.len();
        Ok(GrobnerBasis { basis, stats })
    }

    fn radical(&self, _polys: &[Polynomial]) -> Result<Vec<Polynomial>, GrobnerError> {
        Err(GrobnerError::Unsupported("radical"))
    }

    fn eliminate(
        &self,
        polys: &[Polynomial],
        vars: &[Var],
        max_iterations: usize,
    ) -> Result<Vec<Polynomial>, GrobnerError> {
        let mut elim: Vec<Var> = vars.to_vec();
        elim.sort_unstable();
        elim.dedup();

        let mut keep: Vec<Var> = polys
            .iter()
            .flat_map(|p| p.vars())
            .filter(|v| elim.binary_search(v).is_err())
            .collect();
        keep.sort_unstable();
        keep.dedup();

        // Move eliminated variables to the front so that lex makes them largest.
        let k = elim.len() as Var;
        let forward = |v: Var| match elim.binary_search(&v) {
            Ok(i) => i as Var,
            Err(_) => k + keep.binary_search(&v).map(|j| j as Var).unwrap_or(0),
        };
        let renamed: Vec<Polynomial> = polys.iter().map(|p| p.rename_vars(&forward)).collect();

        let gb = self.grobner_basis(&renamed, MonomialOrder::Lex, max_iterations)?;

        let back = |v: Var| keep[(v - k) as usize];
        Ok(gb
            .basis
            .into_iter()
            .filter(|p| p.vars().iter().all(|&v| v >= k))
            .map(|p| p.rename_vars(&back).with_order(MonomialOrder::default()))
            .collect())
    }
}

/// Fully reduce `poly` modulo `basis` (all terms, not just the leading one).
///
/// `basis` should be sorted under the same monomial order as `poly`.
pub fn normal_form(poly: &Polynomial, basis: &[Polynomial]) -> Polynomial {
    let mut steps = 0;
    reduce_full(poly, basis, &mut steps)
}

fn reduce_full(poly: &Polynomial, basis: &[Polynomial], steps: &mut u64) -> Polynomial {
    let order = poly.order();
    let mut p = poly.clone();
    let mut remainder: Vec<Term> = Vec::new();

    while let Some(lt) = p.leading_term().cloned() {
        let reducer = basis.iter().find_map(|g| {
            let lm = g.leading_monomial()?;
            lt.monomial.div(lm).map(|q| (g, q))
        });
        match reducer {
            Some((g, q)) => {
                let c: BigRational = &lt.coeff / g.leading_coeff();
                p = p.sub(&g.mul_monomial(&q).scale(&c));
                *steps += 1;
            }
            None => {
                p = p.sub(&Polynomial::from_terms([lt.clone()], order));
                remainder.push(lt);
            }
        }
    }

    Polynomial::from_terms(remainder, order)
}

struct Run<'a> {
    config: &'a BuchbergerConfig,
    order: MonomialOrder,
    max_iterations: usize,
    basis: Vec<Polynomial>,
    sugar_degrees: Vec<u32>,
    pairs: BinaryHeap<CriticalPair>,
    stats: GrobnerStats,
}

impl<'a> Run<'a> {
    fn new(config: &'a BuchbergerConfig, order: MonomialOrder, max_iterations: usize) -> Self {
        Self {
            config,
            order,
            max_iterations,
            basis: Vec::new(),
            sugar_degrees: Vec::new(),
            pairs: BinaryHeap::new(),
            stats: GrobnerStats::default(),
        }
    }

    fn compute(&mut self, generators: &[Polynomial]) -> Result<Vec<Polynomial>, GrobnerError> {
        for g in generators {
            if g.is_zero() {
                continue;
            }
            self.stats.input_generators += 1;
            let g = g.with_order(self.order).make_monic();
            if g.is_constant() {
                return Ok(vec![Polynomial::one().with_order(self.order)]);
            }
            self.sugar_degrees.push(g.total_degree());
            self.basis.push(g);
        }

        for j in 1..self.basis.len() {
            for i in 0..j {
                self.add_critical_pair(i, j);
            }
        }

        while let Some(pair) = self.pairs.pop() {
            self.stats.pairs_processed += 1;
            if self.stats.pairs_processed > self.max_iterations as u64 {
                return Err(GrobnerError::IterationBudget {
                    limit: self.max_iterations,
                });
            }

            self.stats.s_polynomials_computed += 1;
            let s_poly = self.s_polynomial(pair.i, pair.j);
            let reduced = reduce_full(&s_poly, &self.basis, &mut self.stats.reduction_steps);

            if reduced.is_zero() {
                self.stats.zero_reductions += 1;
                continue;
            }
            let reduced = reduced.make_monic();
            if reduced.is_constant() {
                return Ok(vec![Polynomial::one().with_order(self.order)]);
            }

            let new_idx = self.basis.len();
            self.basis.push(reduced);
            self.sugar_degrees.push(pair.sugar);
            self.stats.polynomials_added += 1;

            for i in 0..new_idx {
                self.add_critical_pair(i, new_idx);
            }
        }

        Ok(self.reduced_basis())
    }

    fn add_critical_pair(&mut self, i: usize, j: usize) {
        let (Some(lm_i), Some(lm_j)) = (
            self.basis[i].leading_monomial(),
            self.basis[j].leading_monomial(),
        ) else {
            return;
        };

        // Product criterion: coprime leading monomials reduce to zero.
        if self.config.use_product_criterion && lm_i.is_coprime(lm_j) {
            self.stats.pairs_eliminated_product += 1;
            return;
        }

        let degree = lm_i.lcm(lm_j).total_degree();
        let sugar = if self.config.use_sugar_strategy {
            let si = self.sugar_degrees[i] + degree - lm_i.total_degree();
            let sj = self.sugar_degrees[j] + degree - lm_j.total_degree();
            si.max(sj)
        } else {
            degree
        };

        self.pairs.push(CriticalPair {
            i,
            j,
            degree,
            sugar,
        });
    }

    /// S(fi, fj) = (lcm/lt_i) * fi - (lcm/lt_j) * fj for monic fi, fj.
    fn s_polynomial(&self, i: usize, j: usize) -> Polynomial {
        let fi = &self.basis[i];
        let fj = &self.basis[j];
        let (Some(lm_i), Some(lm_j)) = (fi.leading_monomial(), fj.leading_monomial()) else {
            return Polynomial::zero().with_order(self.order);
        };
        let lcm = lm_i.lcm(lm_j);
        let ci = lcm.div(lm_i).unwrap_or_else(Monomial::unit);
        let cj = lcm.div(lm_j).unwrap_or_else(Monomial::unit);
        fi.mul_monomial(&ci).sub(&fj.mul_monomial(&cj))
    }

    /// Drop elements whose leading monomial is divisible by another's,
    /// then inter-reduce and sort by descending leading monomial.
    fn reduced_basis(&mut self) -> Vec<Polynomial> {
        let mut minimal: Vec<Polynomial> = Vec::new();
        for (idx, g) in self.basis.iter().enumerate() {
            let Some(lm) = g.leading_monomial() else {
                continue;
            };
            let redundant = self.basis.iter().enumerate().any(|(other_idx, h)| {
                if other_idx == idx {
                    return false;
                }
                match h.leading_monomial() {
                    // Equal leading monomials: keep only the first.
                    Some(hm) if hm == lm => other_idx < idx,
                    Some(hm) => hm.divides(lm),
                    None => false,
                }
            });
            if !redundant {
                minimal.push(g.clone());
            }
        }

        let mut reduced: Vec<Polynomial> = Vec::with_capacity(minimal.len());
        for i in 0..minimal.len() {
            let lt = minimal[i].leading_term().cloned();
            let Some(lt) = lt else {
                continue;
            };
            let others: Vec<Polynomial> = minimal
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, p)| p.clone())
                .collect();
            let tail = minimal[i].sub(&Polynomial::from_terms([lt.clone()], self.order));
            let tail = reduce_full(&tail, &others, &mut self.stats.reduction_steps);
            let head = Polynomial::from_terms([lt], self.order);
            reduced.push(head.add(&tail).make_monic());
        }

        let order = self.order;
        reduced.sort_by(|a, b| match (a.leading_monomial(), b.leading_monomial()) {
            (Some(x), Some(y)) => order.compare(y, x),
            _ => Ordering::Equal,
        });
        reduced
    }
}
