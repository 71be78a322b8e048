//! Stationary-distribution properties of the regime chain
//!
//! For any valid row-stochastic matrix the computed stationary distribution
//! must be non-negative, sum to 1, and be a fixed point of the chain.

use nalgebra::DMatrix;
use pricing_simulator_core_rs::markov::{MarkovError, RegimeChain};
use proptest::prelude::*;

/// Arbitrary row-stochastic matrix: rows of positive weights, normalized.
fn stochastic_matrix(n: usize) -> impl Strategy<Value = DMatrix<f64>> {
    prop::collection::vec(prop::collection::vec(0.01f64..1.0, n), n).prop_map(move |rows| {
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            let sum: f64 = row.iter().sum();
            data.extend(row.iter().map(|w| w / sum));
        }
        DMatrix::from_row_slice(n, n, &data)
    })
}

proptest! {
    #[test]
    fn stationary_is_a_probability_fixed_point(pi in (2usize..=5).prop_flat_map(stochastic_matrix)) {
        let chain = RegimeChain::new(pi.clone()).unwrap();
        let s = chain.stationary();

        // Probability vector.
        prop_assert!(s.iter().all(|&x| x >= -1e-12));
        let total: f64 = s.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-10);

        // Fixed point: s ≈ s · Pi.
        let n = pi.nrows();
        for j in 0..n {
            let image: f64 = (0..n).map(|i| s[i] * pi[(i, j)]).sum();
            prop_assert!((image - s[j]).abs() < 1e-8, "component {}: {} vs {}", j, image, s[j]);
        }
    }

    #[test]
    fn cum_rows_are_monotone_unit_ranges(pi in (2usize..=5).prop_flat_map(stochastic_matrix)) {
        let chain = RegimeChain::new(pi).unwrap();
        for row in chain.cum_rows() {
            prop_assert_eq!(row[0], 0.0);
            prop_assert_eq!(*row.last().unwrap(), 1.0);
            prop_assert!(row.windows(2).all(|w| w[0] <= w[1] + 1e-15));
        }
    }
}

#[test]
fn three_state_stationary_matches_direct_solution() {
    // Doubly stochastic matrix: stationary must be uniform.
    let pi = DMatrix::from_row_slice(
        3,
        3,
        &[0.5, 0.3, 0.2, 0.2, 0.5, 0.3, 0.3, 0.2, 0.5],
    );
    let chain = RegimeChain::new(pi).unwrap();
    for &s in chain.stationary() {
        assert!((s - 1.0 / 3.0).abs() < 1e-9);
    }
}

#[test]
fn non_stochastic_matrix_is_rejected() {
    let pi = DMatrix::from_row_slice(2, 2, &[0.6, 0.6, 0.5, 0.5]);
    assert!(matches!(
        RegimeChain::new(pi),
        Err(MarkovError::NotStochastic { row: 0, .. })
    ));
}
