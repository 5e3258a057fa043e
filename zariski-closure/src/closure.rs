//! The closure computation.
//!
//! Generators over `K` are restricted to `Q`, the generated group is
//! sampled by word enumeration, and vanishing ideals of increasing degree
//! are computed on the samples until the kernel dimension stops growing.
//! The last ideal is optionally combined with the ambient group's equations
//! and reduced to a Gröbner basis before the dimension is estimated.

use crate::dimension::estimate_dimension;
use crate::embedding::{is_restricted, lift_scalars, restrict_scalars};
use crate::error::{ClosureError, Result};
use crate::group::AlgebraicGroup;
use crate::progress::Progress;
use crate::vanishing::{MonomialTruncation, count_monomials, vanishing_ideal};
use crate::words::{EnumerationStop, WordBudget, enumerate_words, with_inverses};
use num_rational::BigRational;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zariski_math::{
    BuchbergerEngine, FieldMatrix, GrobnerEngine, GrobnerStats, MonomialOrder, NumberField,
    Polynomial, PolynomialRing, RationalMatrix,
};

/// When and how hard to run Gröbner refinement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrobnerLimits {
    /// Run the engine at all.
    pub enabled: bool,
    /// Skip refinement above this many generators.
    pub max_generators: usize,
    /// Skip refinement above this many variables.
    pub max_vars: usize,
    /// Critical-pair budget handed to the engine.
    pub max_iterations: usize,
}

impl Default for GrobnerLimits {
    fn default() -> Self {
        Self {
            enabled: true,
            max_generators: 50,
            max_vars: 16,
            max_iterations: 2000,
        }
    }
}

/// Budgets and switches for [`compute_zariski_closure`].
///
/// Every limit is a hard ceiling; hitting one ends that phase early and
/// is reported in [`ClosureStats`], never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosureConfig {
    /// Longest word in the generators explored.
    pub max_word_length: usize,
    /// Most sample points collected, identity included.
    pub max_points: usize,
    /// Highest polynomial degree searched.
    pub max_degree: u32,
    /// Monomial basis truncation for many variables.
    pub truncation: MonomialTruncation,
    /// Add the ambient group's equations when the field is `Q`.
    pub merge_group_equations: bool,
    /// Gröbner refinement limits.
    pub grobner: GrobnerLimits,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            max_word_length: 6,
            max_points: 200,
            max_degree: 3,
            truncation: MonomialTruncation::default(),
            merge_group_equations: true,
            grobner: GrobnerLimits::default(),
        }
    }
}

impl ClosureConfig {
    /// The word enumeration budget.
    pub fn word_budget(&self) -> WordBudget {
        WordBudget {
            max_word_length: self.max_word_length,
            max_points: self.max_points,
        }
    }
}

/// What happened to the Gröbner refinement step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrobnerOutcome {
    /// Refinement did not run.
    Skipped {
        /// Why it was skipped
        reason: String,
    },
    /// The ideal was replaced by a reduced Gröbner basis.
    Reduced(GrobnerStats),
    /// The engine failed; the raw generators were kept.
    Failed {
        /// The engine's error message
        error: String,
    },
}

impl GrobnerOutcome {
    /// Whether the ideal is a reduced Gröbner basis.
    pub fn is_reduced(&self) -> bool {
        matches!(self, GrobnerOutcome::Reduced(_))
    }
}

/// Diagnostics of one closure computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureStats {
    /// `(degree, kernel dimension)` for every degree computed.
    pub kernel_dims: Vec<(u32, usize)>,
    /// Why word enumeration stopped.
    pub enumeration: EnumerationStop,
    /// Whether the monomial basis was truncated.
    pub truncated: bool,
    /// Ambient group equations appended to the ideal.
    pub group_equations_added: usize,
    /// Gröbner refinement result.
    pub grobner: GrobnerOutcome,
}

/// The computed closure: an ideal in the entries of an `N x N` rational
/// matrix, `N = n·d`, plus the data it was computed from.
#[derive(Debug, Clone)]
pub struct ZariskiClosure {
    /// Generators of the (approximate) vanishing ideal.
    pub ideal: Vec<Polynomial>,
    /// Estimated dimension; `None` when the ideal has no zeros.
    pub dimension: Option<usize>,
    /// Number of variables, `N²`.
    pub num_vars: usize,
    /// Restricted matrix size `N`.
    pub matrix_size: usize,
    /// Matrix size `n` over the number field.
    pub original_matrix_size: usize,
    /// Field degree `d`.
    pub field_degree: usize,
    /// Number of distinct sample points.
    pub num_points: usize,
    /// Longest word that produced a new sample.
    pub max_word_length: usize,
    /// Degree of the kept ideal.
    pub deg_bound: u32,
    /// One-line summary.
    pub description: String,
    /// Restricted generators.
    pub generators: Vec<RationalMatrix>,
    /// Enumerated group elements, identity first.
    pub sample_points: Vec<RationalMatrix>,
    /// Diagnostics.
    pub stats: ClosureStats,
    field: NumberField,
}

impl ZariskiClosure {
    /// The number field the generators were given over.
    pub fn field(&self) -> &NumberField {
        &self.field
    }

    /// The ring of the ideal, with variables named after matrix entries.
    pub fn ring(&self) -> PolynomialRing {
        PolynomialRing::matrix_entries(self.matrix_size, MonomialOrder::GRevLex)
    }

    /// The ideal generators rendered over [`ZariskiClosure::ring`].
    pub fn equations(&self) -> Vec<String> {
        let ring = self.ring();
        self.ideal.iter().map(|p| ring.format(p)).collect()
    }

    /// Whether a rational `N x N` matrix satisfies every equation.
    ///
    /// Over an extension field the matrix must also be the restriction of
    /// scalars of some matrix over `K`.
    pub fn contains(&self, matrix: &RationalMatrix) -> bool {
        if matrix.size() != self.matrix_size {
            return false;
        }
        if self.field_degree > 1 && !is_restricted(&self.field, matrix) {
            return false;
        }
        let point = matrix.flatten();
        self.ideal.iter().all(|p| p.vanishes_at(point))
    }

    /// Whether an `n x n` matrix over the number field lies in the closure.
    pub fn contains_field_matrix(&self, matrix: &FieldMatrix) -> bool {
        if matrix.n() != self.original_matrix_size
            || matrix.entries().iter().any(|e| self.field.check(e).is_err())
        {
            return false;
        }
        self.contains(&restrict_scalars(&self.field, matrix))
    }

    /// The sample points as matrices over the number field.
    ///
    /// # Errors
    ///
    /// Fails only if a sample point is not a multiple of the field degree
    /// in size, which enumeration never produces.
    pub fn lifted_sample_points(&self) -> Result<Vec<FieldMatrix>> {
        self.sample_points
            .iter()
            .map(|m| lift_scalars(&self.field, m))
            .collect()
    }
}

/// Compute the closure with the built-in Buchberger engine and no progress
/// reporting.
pub fn compute_zariski_closure(
    field: &NumberField,
    generators: &[FieldMatrix],
    group: &dyn AlgebraicGroup,
    config: &ClosureConfig,
) -> Result<ZariskiClosure> {
    let engine = BuchbergerEngine::new();
    compute_zariski_closure_with(field, generators, group, config, Some(&engine), &mut |_| {})
}

/// Compute the Zariski closure of the group generated by `generators`.
///
/// `engine` performs the optional Gröbner refinement; `None` skips it.
/// `progress` is called at each phase and cannot influence the run.
///
/// # Errors
///
/// Only malformed input is rejected: a group of size 0, a generator of
/// the wrong size, or a generator over a field of a different degree.
pub fn compute_zariski_closure_with(
    field: &NumberField,
    generators: &[FieldMatrix],
    group: &dyn AlgebraicGroup,
    config: &ClosureConfig,
    engine: Option<&dyn GrobnerEngine>,
    progress: &mut dyn FnMut(&Progress),
) -> Result<ZariskiClosure> {
    let n = group.size();
    if n == 0 {
        return Err(ClosureError::InvalidGroup(
            "matrix size must be positive".to_string(),
        ));
    }
    for (index, g) in generators.iter().enumerate() {
        if g.n() != n {
            return Err(ClosureError::GeneratorSize {
                index,
                expected: n,
                found: g.n(),
            });
        }
        if g.entries().iter().any(|e| field.check(e).is_err()) {
            return Err(ClosureError::FieldMismatch { index });
        }
    }

    let d = field.degree();
    let size = n * d;
    let num_vars = size * size;
    info!(
        generators = generators.len(),
        n,
        field_degree = d,
        group = %group.label(),
        "computing Zariski closure"
    );

    progress(&Progress::RestrictingScalars {
        generators: generators.len(),
    });
    let restricted: Vec<RationalMatrix> = generators
        .iter()
        .map(|g| restrict_scalars(field, g))
        .collect();

    let alphabet = with_inverses(&restricted);
    let words = enumerate_words(size, &alphabet, config.word_budget(), progress);
    let points: Vec<&[BigRational]> = words.elements.iter().map(|m| m.flatten()).collect();

    let mut ideal = Vec::new();
    let mut kernel_dims: Vec<(u32, usize)> = Vec::new();
    let mut deg_bound = 0;
    let mut truncated = false;
    for degree in 1..=config.max_degree {
        progress(&Progress::ComputingIdeal {
            degree,
            monomials: count_monomials(num_vars, degree, config.truncation),
        });
        let vi = vanishing_ideal(&points, num_vars, degree, config.truncation);
        let kernel = vi.kernel_dim();
        let stable = matches!(kernel_dims.last(), Some(&(_, prev)) if prev == kernel);
        kernel_dims.push((degree, kernel));
        ideal = vi.generators;
        deg_bound = degree;
        truncated = vi.truncated;
        if stable {
            debug!(degree, kernel, "kernel dimension stabilized");
            break;
        }
    }

    let mut group_equations_added = 0;
    if d == 1 && config.merge_group_equations {
        for eq in group.equations() {
            if eq.is_zero() || ideal.contains(&eq) {
                continue;
            }
            ideal.push(eq);
            group_equations_added += 1;
        }
    }

    let limits = &config.grobner;
    let grobner = match engine {
        None => GrobnerOutcome::Skipped {
            reason: "no Gröbner engine".to_string(),
        },
        Some(_) if !limits.enabled => GrobnerOutcome::Skipped {
            reason: "disabled".to_string(),
        },
        Some(_) if ideal.is_empty() => GrobnerOutcome::Skipped {
            reason: "empty ideal".to_string(),
        },
        Some(_) if ideal.len() > limits.max_generators => GrobnerOutcome::Skipped {
            reason: format!(
                "{} generators exceed the limit of {}",
                ideal.len(),
                limits.max_generators
            ),
        },
        Some(_) if num_vars > limits.max_vars => GrobnerOutcome::Skipped {
            reason: format!(
                "{num_vars} variables exceed the limit of {}",
                limits.max_vars
            ),
        },
        Some(engine) => {
            progress(&Progress::ComputingGrobner {
                generators: ideal.len(),
            });
            match engine.grobner_basis(&ideal, MonomialOrder::GRevLex, limits.max_iterations) {
                Ok(gb) => {
                    debug!(
                        before = ideal.len(),
                        after = gb.basis.len(),
                        pairs = gb.stats.pairs_processed,
                        "Gröbner refinement"
                    );
                    ideal = gb.basis;
                    GrobnerOutcome::Reduced(gb.stats)
                }
                Err(e) => {
                    warn!(error = %e, "Gröbner refinement failed, keeping raw generators");
                    GrobnerOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            }
        }
    };

    progress(&Progress::EstimatingDimension);
    let dimension = if ideal.iter().any(|p| p.is_constant()) {
        warn!("ideal contains a nonzero constant, the closure is empty");
        None
    } else {
        let identity = RationalMatrix::identity(size);
        Some(estimate_dimension(
            &ideal,
            num_vars,
            &points,
            identity.flatten(),
        ))
    };

    let description = describe(
        generators.len(),
        group,
        field,
        ideal.len(),
        num_vars,
        dimension,
        words.elements.len(),
        words.max_word_length,
        deg_bound,
    );
    info!(
        equations = ideal.len(),
        points = words.elements.len(),
        deg_bound,
        dimension = ?dimension,
        "Zariski closure computed"
    );

    Ok(ZariskiClosure {
        ideal,
        dimension,
        num_vars,
        matrix_size: size,
        original_matrix_size: n,
        field_degree: d,
        num_points: words.elements.len(),
        max_word_length: words.max_word_length,
        deg_bound,
        description,
        generators: restricted,
        sample_points: words.elements,
        stats: ClosureStats {
            kernel_dims,
            enumeration: words.stop,
            truncated,
            group_equations_added,
            grobner,
        },
        field: field.clone(),
    })
}

#[allow(clippy::too_many_arguments)]
fn describe(
    generators: usize,
    group: &dyn AlgebraicGroup,
    field: &NumberField,
    equations: usize,
    num_vars: usize,
    dimension: Option<usize>,
    points: usize,
    word_length: usize,
    degree: u32,
) -> String {
    let dim = match dimension {
        Some(dim) => format!("dimension {dim}"),
        None => "empty".to_string(),
    };
    let ambient = match group.dim() {
        Some(g) => format!(" (ambient dimension {g})"),
        None => String::new(),
    };
    format!(
        "closure of {generators} generator(s) in {} over {field}: {equations} equation(s) \
         in {num_vars} variables, {dim}{ambient}; {points} points, words up to length \
         {word_length}, degree {degree}",
        group.label()
    )
}
