//! Property-based tests for the closure pipeline.
//!
//! This module tests:
//! - Multiplication matrices against field arithmetic
//! - Restriction of scalars as a ring homomorphism
//! - Word enumeration determinism, dedup and monotonicity
//! - Soundness of the vanishing-ideal null space

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use proptest::prelude::*;
use zariski_closure::vanishing::MonomialTruncation;
use zariski_closure::words::{WordBudget, enumerate_words, with_inverses};
use zariski_closure::{lift_scalars, multiplication_matrix, restrict_scalars, vanishing_ideal};
use zariski_math::{FieldElement, FieldMatrix, NumberField, RationalMatrix};

/// Helper to create rational
fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Q(α) with α³ = α + 1
fn cubic() -> NumberField {
    NumberField::from_i64(&[-1, -1, 0, 1]).unwrap()
}

fn element_strategy(d: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-5i64..=5, d)
}

fn element(field: &NumberField, coeffs: &[i64]) -> FieldElement {
    field.element_i64(coeffs).unwrap()
}

fn field_matrix(field: &NumberField, n: usize, coeffs: &[Vec<i64>]) -> FieldMatrix {
    let rows = (0..n)
        .map(|r| (0..n).map(|c| element(field, &coeffs[r * n + c])).collect())
        .collect();
    FieldMatrix::from_rows(field, rows).unwrap()
}

/// Invertible integer 2x2 matrices: products of elementary matrices.
fn unimodular_strategy() -> impl Strategy<Value = RationalMatrix> {
    (-3i64..=3, -3i64..=3, prop::bool::ANY).prop_map(|(a, b, swap)| {
        let upper = RationalMatrix::from_i64_rows(&[&[1, a], &[0, 1]]).unwrap();
        let lower = RationalMatrix::from_i64_rows(&[&[1, 0], &[b, 1]]).unwrap();
        let m = upper.mul(&lower).unwrap();
        if swap {
            let s = RationalMatrix::from_i64_rows(&[&[0, -1], &[1, 0]]).unwrap();
            m.mul(&s).unwrap()
        } else {
            m
        }
    })
}

#[cfg(test)]
mod embedding_properties {
    use super::*;

    proptest! {
        /// Column j of the multiplication matrix is e·α^j
        #[test]
        fn multiplication_matrix_columns(coeffs in element_strategy(3)) {
            let k = cubic();
            let e = element(&k, &coeffs);
            let m = multiplication_matrix(&k, &e);
            let mut power = k.one();
            for j in 0..3 {
                let expected = k.mul(&e, &power);
                for i in 0..3 {
                    prop_assert_eq!(m.get(i, j), &expected.coeffs[i]);
                }
                power = k.mul(&power, &k.alpha());
            }
        }

        /// restrict(A)·restrict(B) = restrict(A·B)
        #[test]
        fn restriction_is_multiplicative(
            a in prop::collection::vec(element_strategy(3), 4),
            b in prop::collection::vec(element_strategy(3), 4),
        ) {
            let k = cubic();
            let a = field_matrix(&k, 2, &a);
            let b = field_matrix(&k, 2, &b);
            let lhs = restrict_scalars(&k, &a.mul(&k, &b).unwrap());
            let rhs = restrict_scalars(&k, &a).mul(&restrict_scalars(&k, &b)).unwrap();
            prop_assert_eq!(lhs, rhs);
        }

        /// Lifting inverts restriction
        #[test]
        fn lift_inverts_restriction(a in prop::collection::vec(element_strategy(2), 9)) {
            let k = NumberField::from_i64(&[-5, 0, 1]).unwrap();
            let a = field_matrix(&k, 3, &a);
            let back = lift_scalars(&k, &restrict_scalars(&k, &a)).unwrap();
            prop_assert_eq!(back, a);
        }
    }
}

#[cfg(test)]
mod enumeration_properties {
    use super::*;

    fn run(gens: &[RationalMatrix], max_word_length: usize, max_points: usize) -> Vec<RationalMatrix> {
        let budget = WordBudget { max_word_length, max_points };
        enumerate_words(2, &with_inverses(gens), budget, &mut |_| {}).elements
    }

    proptest! {
        /// Same input, same ordered output
        #[test]
        fn enumeration_is_deterministic(
            gens in prop::collection::vec(unimodular_strategy(), 1..3),
            len in 1usize..4,
        ) {
            prop_assert_eq!(run(&gens, len, 40), run(&gens, len, 40));
        }

        /// Identity first, no duplicates, point budget respected
        #[test]
        fn enumeration_dedups(
            gens in prop::collection::vec(unimodular_strategy(), 1..3),
            len in 1usize..4,
            max_points in 1usize..40,
        ) {
            let points = run(&gens, len, max_points);
            prop_assert!(points[0].is_identity());
            prop_assert!(points.len() <= max_points.max(1));
            let mut keys: Vec<String> = points.iter().map(|m| m.canonical_key()).collect();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), points.len());
        }

        /// Longer words never lose points
        #[test]
        fn enumeration_is_monotone(
            gens in prop::collection::vec(unimodular_strategy(), 1..3),
            len in 1usize..3,
        ) {
            let short = run(&gens, len, 30);
            let long = run(&gens, len + 1, 30);
            prop_assert!(long.len() >= short.len());
            prop_assert_eq!(&long[..short.len()], &short[..]);
        }
    }
}

#[cfg(test)]
mod vanishing_properties {
    use super::*;

    fn point_strategy(vars: usize) -> impl Strategy<Value = Vec<BigRational>> {
        prop::collection::vec((-4i64..=4).prop_map(rat), vars)
    }

    proptest! {
        /// Every generator vanishes exactly at every sample
        #[test]
        fn null_space_is_sound(
            points in prop::collection::vec(point_strategy(3), 1..8),
            degree in 1u32..=3,
        ) {
            let views: Vec<&[BigRational]> = points.iter().map(|p| p.as_slice()).collect();
            let vi = vanishing_ideal(&views, 3, degree, MonomialTruncation::default());
            for g in &vi.generators {
                prop_assert!(!g.is_zero());
                for p in &points {
                    prop_assert!(g.eval_point(p).is_zero());
                }
            }
        }

        /// Untruncated kernels grow with the degree
        #[test]
        fn kernel_dimension_grows_with_degree(
            points in prop::collection::vec(point_strategy(2), 1..10),
        ) {
            let views: Vec<&[BigRational]> = points.iter().map(|p| p.as_slice()).collect();
            let dims: Vec<usize> = (1..=3)
                .map(|d| vanishing_ideal(&views, 2, d, MonomialTruncation::default()).kernel_dim())
                .collect();
            prop_assert!(dims.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
