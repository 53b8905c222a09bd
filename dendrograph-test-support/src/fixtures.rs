//! Canned datasets shared by the core and CLI test suites.
//!
//! Fixtures are plain data so this crate does not depend on the library it
//! helps test.

/// Leaf descriptor as `(label, order, category)`.
pub type LeafTuple = (&'static str, u64, Option<usize>);

/// Three leaves where `A` and `B` share category `0` and `C` is in `1`.
pub const SCENARIO_LEAVES: [LeafTuple; 3] =
    [("A", 1, Some(0)), ("B", 2, Some(0)), ("C", 3, Some(1))];

/// Linkage over [`SCENARIO_LEAVES`]: `A` and `B` merge at `0.2`, then `C`
/// joins that cluster at `0.5`. The second row lists the leaf first so the
/// builder has to swap the children.
pub const SCENARIO_ROWS: [[f64; 4]; 2] = [[1.0, -1.0, -2.0, 0.2], [2.0, -3.0, 1.0, 0.5]];

/// Four leaves forming two pure pairs that meet in a mixed root.
pub const PAIRS_LEAVES: [LeafTuple; 4] = [
    ("w", 10, Some(0)),
    ("x", 20, Some(0)),
    ("y", 30, Some(1)),
    ("z", 40, Some(1)),
];

/// Linkage over [`PAIRS_LEAVES`].
pub const PAIRS_ROWS: [[f64; 4]; 3] = [
    [1.0, -20.0, -10.0, 0.3],
    [2.0, -30.0, -40.0, 0.4],
    [3.0, 2.0, 1.0, 1.0],
];

/// The scenario dataset in the JSON shape accepted by the command line.
pub const SCENARIO_JSON: &str = r#"{
  "data": [[1, -1, -2, 0.2], [2, -3, 1, 0.5]],
  "extras": [
    {"label": "A", "order": 1, "clust": 0},
    {"label": "B", "order": 2, "clust": 0},
    {"label": "C", "order": 3, "clust": 1}
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_rows_reference_declared_leaves() {
        let orders: Vec<u64> = SCENARIO_LEAVES.iter().map(|&(_, order, _)| order).collect();
        for row in SCENARIO_ROWS {
            for reference in [row[1], row[2]] {
                if reference < 0.0 {
                    assert!(orders.contains(&(-reference as u64)));
                }
            }
        }
    }
}
