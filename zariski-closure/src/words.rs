//! Breadth-first enumeration of group elements.
//!
//! Words in the generators and their inverses are multiplied out level by
//! level. Elements are deduplicated by their exact entries, so every point
//! handed to the ideal computation is distinct.

use crate::progress::Progress;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zariski_math::RationalMatrix;

/// Why enumeration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationStop {
    /// A level produced no new element: the generated group is finite and
    /// fully listed.
    Saturated,
    /// All words up to the configured length were explored.
    WordLengthBudget,
    /// The configured number of points was reached.
    PointBudget,
}

/// Limits on the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBudget {
    /// Longest word explored.
    pub max_word_length: usize,
    /// Most distinct elements collected (the identity included).
    pub max_points: usize,
}

/// Distinct group elements, identity first.
#[derive(Debug, Clone)]
pub struct WordEnumeration {
    /// Elements in discovery order; `elements[0]` is the identity.
    pub elements: Vec<RationalMatrix>,
    /// Length of the longest word that contributed a new element.
    pub max_word_length: usize,
    /// What ended the search.
    pub stop: EnumerationStop,
}

/// The generators followed by the inverses of those that are invertible.
///
/// Singular generators contribute no inverse and are logged.
pub fn with_inverses(generators: &[RationalMatrix]) -> Vec<RationalMatrix> {
    let mut all = generators.to_vec();
    for (index, g) in generators.iter().enumerate() {
        match g.inverse() {
            Ok(inv) => all.push(inv),
            Err(e) => warn!(index, error = %e, "generator has no inverse, skipping it"),
        }
    }
    all
}

/// Enumerate products of `alphabet` elements breadth-first.
///
/// Level `k` multiplies every element first reached at level `k - 1` on the
/// right by each alphabet letter. Matrices whose size differs from `size`
/// are ignored.
pub fn enumerate_words(
    size: usize,
    alphabet: &[RationalMatrix],
    budget: WordBudget,
    progress: &mut dyn FnMut(&Progress),
) -> WordEnumeration {
    let identity = RationalMatrix::identity(size);
    let mut seen: FxHashSet<String> = FxHashSet::default();
    seen.insert(identity.canonical_key());
    let mut elements = vec![identity];
    let mut frontier = vec![0usize];
    let mut reached = 0;
    let mut stop = EnumerationStop::WordLengthBudget;

    'levels: for length in 1..=budget.max_word_length {
        if elements.len() >= budget.max_points {
            stop = EnumerationStop::PointBudget;
            break;
        }
        progress(&Progress::EnumeratingWords {
            length,
            points: elements.len(),
        });

        let mut next = Vec::new();
        for &idx in &frontier {
            for letter in alphabet {
                let Ok(product) = elements[idx].mul(letter) else {
                    continue;
                };
                if !seen.insert(product.canonical_key()) {
                    continue;
                }
                next.push(elements.len());
                elements.push(product);
                reached = length;
                if elements.len() >= budget.max_points {
                    stop = EnumerationStop::PointBudget;
                    debug!(length, points = elements.len(), "point budget reached");
                    break 'levels;
                }
            }
        }

        debug!(length, new = next.len(), points = elements.len(), "word level done");
        if next.is_empty() {
            stop = EnumerationStop::Saturated;
            break;
        }
        frontier = next;
    }

    WordEnumeration {
        elements,
        max_word_length: reached,
        stop,
    }
}
