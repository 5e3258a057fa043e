//! End-to-end closure computations on small groups with known closures.

use zariski_closure::{
    ClosureConfig, EnumerationStop, GrobnerOutcome, MatrixGroup, compute_zariski_closure,
    compute_zariski_closure_with, vanishing_ideal,
};
use zariski_math::{
    BigRational, BuchbergerEngine, FieldMatrix, MonomialOrder, NumberField, Polynomial, PolynomialRing,
    RationalMatrix,
};

fn config(max_word_length: usize, max_degree: u32) -> ClosureConfig {
    ClosureConfig {
        max_word_length,
        max_degree,
        ..ClosureConfig::default()
    }
}

fn sorted(ring: &PolynomialRing, polys: &[Polynomial]) -> Vec<String> {
    let mut out: Vec<String> = polys.iter().map(|p| ring.format(&p.make_monic())).collect();
    out.sort();
    out
}

#[test]
fn sl2_z_closure_is_sl2() {
    let q = NumberField::rationals();
    let t = FieldMatrix::from_i64_rows(&q, &[&[1, 1], &[0, 1]]).unwrap();
    let s = FieldMatrix::from_i64_rows(&q, &[&[0, -1], &[1, 0]]).unwrap();
    let group = MatrixGroup::special_linear(2);

    let closure = compute_zariski_closure(&q, &[t, s], &group, &config(4, 2)).unwrap();

    assert_eq!(closure.num_vars, 4);
    assert_eq!(closure.matrix_size, 2);
    assert_eq!(closure.field_degree, 1);
    assert_eq!(closure.max_word_length, 4);
    assert_eq!(closure.deg_bound, 2);
    assert_eq!(closure.stats.kernel_dims, vec![(1, 0), (2, 1)]);
    assert_eq!(closure.stats.enumeration, EnumerationStop::WordLengthBudget);
    assert_eq!(closure.stats.group_equations_added, 1);
    assert!(closure.stats.grobner.is_reduced());

    let ring = closure.ring();
    let det = ring.parse("x11*x22 - x12*x21 - 1").unwrap();
    assert_eq!(closure.ideal.len(), 1);
    assert_eq!(closure.ideal[0].make_monic(), det.make_monic());
    assert_eq!(closure.dimension, Some(3));
    assert!(closure.description.contains("SL(2)"));
    assert!(closure.description.contains("dimension 3"));

    // T^7 is in the group but was never enumerated.
    let t7 = RationalMatrix::from_i64_rows(&[&[1, 7], &[0, 1]]).unwrap();
    assert!(closure.contains(&t7));
    let diag = RationalMatrix::from_i64_rows(&[&[2, 0], &[0, 1]]).unwrap();
    assert!(!closure.contains(&diag));
}

#[test]
fn sl2_merged_equation_collapses_under_grobner() {
    let q = NumberField::rationals();
    let t = FieldMatrix::from_i64_rows(&q, &[&[1, 1], &[0, 1]]).unwrap();
    let s = FieldMatrix::from_i64_rows(&q, &[&[0, -1], &[1, 0]]).unwrap();
    let gens = [t, s];
    let group = MatrixGroup::special_linear(2);
    let cfg = config(4, 2);

    // Without refinement the merged det - 1 sits next to its kernel multiple.
    let raw = compute_zariski_closure_with(&q, &gens, &group, &cfg, None, &mut |_| {}).unwrap();
    assert_eq!(raw.stats.group_equations_added, 1);
    assert_eq!(raw.ideal.len(), 2);
    assert_eq!(raw.ideal[0].make_monic(), raw.ideal[1].make_monic());
    assert!(!raw.stats.grobner.is_reduced());

    let engine = BuchbergerEngine::new();
    let refined =
        compute_zariski_closure_with(&q, &gens, &group, &cfg, Some(&engine), &mut |_| {}).unwrap();
    match &refined.stats.grobner {
        GrobnerOutcome::Reduced(stats) => {
            assert_eq!(stats.input_generators, 2);
            assert_eq!(stats.output_generators, 1);
            assert_eq!(stats.pairs_processed, 1);
            assert_eq!(stats.zero_reductions, 1);
        }
        other => panic!("expected a reduced basis, got {other:?}"),
    }
    assert_eq!(refined.ideal.len(), 1);
    assert_eq!(refined.ideal[0], raw.ideal[1].make_monic());
    assert_eq!(refined.dimension, Some(3));
}

#[test]
fn sample_points_are_distinct_and_start_at_identity() {
    let q = NumberField::rationals();
    let t = FieldMatrix::from_i64_rows(&q, &[&[1, 1], &[0, 1]]).unwrap();
    let s = FieldMatrix::from_i64_rows(&q, &[&[0, -1], &[1, 0]]).unwrap();
    let group = MatrixGroup::special_linear(2);
    let closure = compute_zariski_closure(&q, &[t, s], &group, &config(4, 1)).unwrap();

    assert!(closure.sample_points[0].is_identity());
    let mut keys: Vec<String> = closure.sample_points.iter().map(|m| m.canonical_key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), closure.num_points);
    assert_eq!(closure.generators.len(), 2);
}

#[test]
fn identity_generator_pins_every_entry() {
    let q = NumberField::rationals();
    let group = MatrixGroup::general_linear(3);
    let id = FieldMatrix::identity(&q, 3);
    let closure = compute_zariski_closure(&q, &[id], &group, &config(10, 3)).unwrap();

    assert_eq!(closure.num_points, 1);
    assert_eq!(closure.max_word_length, 0);
    assert_eq!(closure.stats.enumeration, EnumerationStop::Saturated);

    // Degree one on the single point: x_ii - 1 and x_ij for i != j.
    let point = [closure.sample_points[0].flatten()];
    let linear = vanishing_ideal(&point, 9, 1, Default::default());
    assert_eq!(linear.kernel_dim(), 9);

    let ring = PolynomialRing::matrix_entries(3, MonomialOrder::GRevLex);
    let expected: Vec<Polynomial> = (1..=3)
        .flat_map(|r| (1..=3).map(move |c| (r, c)))
        .map(|(r, c)| {
            let text = if r == c {
                format!("x{r}{c} - 1")
            } else {
                format!("x{r}{c}")
            };
            ring.parse(&text).unwrap()
        })
        .collect();
    assert_eq!(sorted(&ring, &linear.generators), sorted(&ring, &expected));
}

#[test]
fn diagonal_torus() {
    // 2 and 3 are multiplicatively independent: the closure is the full
    // diagonal torus.
    let q = NumberField::rationals();
    let g = FieldMatrix::from_i64_rows(&q, &[&[2, 0], &[0, 3]]).unwrap();
    let group = MatrixGroup::general_linear(2);
    let closure = compute_zariski_closure(&q, &[g], &group, &config(4, 2)).unwrap();

    assert_eq!(closure.num_points, 9);
    assert_eq!(closure.stats.kernel_dims, vec![(1, 2), (2, 9)]);
    assert_eq!(closure.stats.group_equations_added, 0);
    let ring = closure.ring();
    let expected = vec![ring.parse("x12").unwrap(), ring.parse("x21").unwrap()];
    assert_eq!(sorted(&ring, &closure.ideal), sorted(&ring, &expected));
    assert_eq!(closure.dimension, Some(2));

    let other = RationalMatrix::from_i64_rows(&[&[5, 0], &[0, -7]]).unwrap();
    assert!(closure.contains(&other));
}

#[test]
fn quadratic_field_is_truncated() {
    let k = NumberField::from_i64(&[-2, 0, 1]).unwrap();
    let alpha = k.alpha();
    let alpha_inv = k.inverse(&alpha).unwrap();
    let g = FieldMatrix::from_rows(&k, vec![vec![alpha, k.zero()], vec![k.zero(), alpha_inv]])
        .unwrap();
    let group = MatrixGroup::special_linear(2);
    let closure = compute_zariski_closure(&k, &[g.clone()], &group, &config(3, 1)).unwrap();

    assert_eq!(closure.matrix_size, 4);
    assert_eq!(closure.num_vars, 16);
    assert_eq!(closure.original_matrix_size, 2);
    assert!(closure.stats.truncated);
    // Group equations only apply over Q.
    assert_eq!(closure.stats.group_equations_added, 0);
    assert!(closure.contains_field_matrix(&g));
    for p in &closure.sample_points {
        assert!(closure.contains(p));
    }
    assert!(closure.dimension.is_some());
    match &closure.stats.grobner {
        GrobnerOutcome::Reduced(stats) => assert_eq!(stats.output_generators, closure.ideal.len()),
        other => panic!("expected a reduced basis, got {other:?}"),
    }
    let lifted = closure.lifted_sample_points().unwrap();
    assert!(lifted.contains(&g));
}

#[test]
fn point_budget_is_a_hard_ceiling() {
    let q = NumberField::rationals();
    let t = FieldMatrix::from_i64_rows(&q, &[&[1, 1], &[0, 1]]).unwrap();
    let s = FieldMatrix::from_i64_rows(&q, &[&[0, -1], &[1, 0]]).unwrap();
    let group = MatrixGroup::general_linear(2);
    let cfg = ClosureConfig {
        max_word_length: 20,
        max_points: 25,
        max_degree: 1,
        ..ClosureConfig::default()
    };
    let closure = compute_zariski_closure(&q, &[t, s], &group, &cfg).unwrap();
    assert_eq!(closure.num_points, 25);
    assert_eq!(closure.stats.enumeration, EnumerationStop::PointBudget);
    assert!(closure.max_word_length < 20);
}

#[test]
fn no_generators() {
    let q = NumberField::rationals();
    let group = MatrixGroup::general_linear(2);
    let closure = compute_zariski_closure(&q, &[], &group, &config(3, 2)).unwrap();
    assert_eq!(closure.num_points, 1);
    assert!(closure.generators.is_empty());
    let zero = BigRational::from_integer(0.into());
    assert!(closure.ideal.iter().all(|p| p.eval_point(closure.sample_points[0].flatten()) == zero));
}
