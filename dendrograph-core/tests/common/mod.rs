//! Shared helpers for dendrograph-core integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset of helpers")]

use dendrograph_core::{CoordinateSystem, Dendrogram, LeafMeta, LeafOrder, Point};
use dendrograph_test_support::fixtures::{
    LeafTuple, PAIRS_LEAVES, PAIRS_ROWS, SCENARIO_LEAVES, SCENARIO_ROWS,
};

pub fn leaves(tuples: &[LeafTuple]) -> Vec<LeafMeta<usize>> {
    tuples
        .iter()
        .map(|&(label, order, category)| LeafMeta::new(label, LeafOrder::new(order), category))
        .collect()
}

pub fn scenario() -> Dendrogram<usize> {
    Dendrogram::from_rows(leaves(&SCENARIO_LEAVES), SCENARIO_ROWS)
        .expect("scenario dataset must build")
}

pub fn pairs() -> Dendrogram<usize> {
    Dendrogram::from_rows(leaves(&PAIRS_LEAVES), PAIRS_ROWS).expect("pairs dataset must build")
}

/// Axis with fixed answers: positions are 20px apart starting at 0 and one
/// unit of value is 60px above a baseline at y = 100.
pub struct FixedAxis;

impl CoordinateSystem for FixedAxis {
    fn coord_of(&self, point: Point) -> Point {
        Point::new(point.x * 20.0, 100.0 - point.y * 60.0)
    }

    fn size_of(&self, delta: Point) -> Point {
        Point::new(delta.x * 20.0, delta.y * 60.0)
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_points(actual: &[Point], expected: &[(f64, f64)]) {
    assert_eq!(actual.len(), expected.len());
    for (point, &(x, y)) in actual.iter().zip(expected) {
        assert_close(point.x, x);
        assert_close(point.y, y);
    }
}
