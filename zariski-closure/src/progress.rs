//! Coarse progress events.

use std::fmt;

/// A checkpoint reached during a closure computation.
///
/// Events are fire-and-forget: the sink cannot influence or cancel the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Generators are being embedded over `Q`.
    RestrictingScalars {
        /// Number of generators
        generators: usize,
    },
    /// Breadth-first search is extending words to `length`.
    EnumeratingWords {
        /// Word length being explored
        length: usize,
        /// Points found so far
        points: usize,
    },
    /// Null space of the degree-`degree` evaluation matrix.
    ComputingIdeal {
        /// Degree bound
        degree: u32,
        /// Number of monomial columns
        monomials: usize,
    },
    /// Handing the generators to the Gröbner engine.
    ComputingGrobner {
        /// Number of input generators
        generators: usize,
    },
    /// Jacobian rank at a sample point.
    EstimatingDimension,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::RestrictingScalars { generators } => {
                write!(f, "restricting scalars ({generators} generators)")
            }
            Progress::EnumeratingWords { length, points } => {
                write!(f, "enumerating words of length {length} ({points} points)")
            }
            Progress::ComputingIdeal { degree, monomials } => {
                write!(f, "computing vanishing ideal (degree {degree}, {monomials} monomials)")
            }
            Progress::ComputingGrobner { generators } => {
                write!(f, "computing Gröbner basis ({generators} generators)")
            }
            Progress::EstimatingDimension => write!(f, "estimating dimension"),
        }
    }
}
