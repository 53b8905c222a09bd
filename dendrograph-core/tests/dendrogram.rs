//! Tests for dataset construction and category-filtered views.

mod common;

use common::{leaves, pairs, scenario};
use dendrograph_core::{
    Dendrogram, DendrogramError, LeafMeta, LeafOrder, MergeId, NodeKind, NodeRef, NodeRow,
};
use dendrograph_test_support::fixtures::SCENARIO_LEAVES;
use rstest::rstest;

#[rstest]
fn unfiltered_view_keeps_everything() {
    let dendrogram = scenario();
    let view = dendrogram.rebuild(None);

    assert_eq!(view.filter(), None);
    assert_eq!(view.labels(), ["A", "B", "C"]);
    assert_eq!(view.index().len(), 3);
    assert_eq!(view.index().position(LeafOrder::new(3)), Some(2));
    assert_eq!(view.merges().count(), 2);
    assert_eq!(
        view.node_rows()[1],
        NodeRow {
            merge_id: MergeId::new(2),
            left: NodeRef::Merge(MergeId::new(1)),
            left_extreme: LeafOrder::new(1),
            right: NodeRef::Leaf(LeafOrder::new(3)),
            right_extreme: LeafOrder::new(3),
            value: 0.5,
        }
    );
}

#[rstest]
fn category_filter_keeps_pure_merges_only() {
    let dendrogram = scenario();
    let view = dendrogram.rebuild(Some(&0));

    assert_eq!(view.filter(), Some(&0));
    assert_eq!(view.labels(), ["A", "B"]);
    assert_eq!(view.node_rows().len(), 1);
    assert_eq!(
        view.node_rows()[0].to_array(),
        [1.0, 1.0, 0.0, 1.0, 2.0, 0.0, 2.0, 0.2]
    );
    assert_eq!(view.index().position(LeafOrder::new(2)), Some(1));
    assert!(!view.index().contains(LeafOrder::new(3)));
    assert!(view.node(MergeId::new(2)).is_none());
}

#[rstest]
fn singleton_category_has_labels_but_no_merges() {
    let dendrogram = scenario();
    let view = dendrogram.rebuild(Some(&1));
    assert_eq!(view.labels(), ["C"]);
    assert!(view.node_rows().is_empty());
}

#[rstest]
fn unmatched_filter_yields_an_empty_view() {
    let dendrogram = scenario();
    let view = dendrogram.rebuild(Some(&7));
    assert!(view.labels().is_empty());
    assert!(view.node_rows().is_empty());
    assert!(view.index().is_empty());
}

#[rstest]
#[case::all(None)]
#[case::first(Some(0))]
#[case::second(Some(1))]
#[case::missing(Some(9))]
fn rebuilding_with_the_same_filter_is_idempotent(#[case] filter: Option<usize>) {
    let dendrogram = pairs();
    let view = dendrogram.rebuild(filter.as_ref());
    assert_eq!(view.rebuild(filter.as_ref()), view);
}

#[rstest]
fn switching_filters_does_not_touch_the_tree() {
    let dendrogram = pairs();
    let before = dendrogram.tree().clone();
    let narrowed = dendrogram.rebuild(Some(&1));
    let widened = narrowed.rebuild(None);
    assert_eq!(widened.node_rows().len(), 3);
    assert_eq!(dendrogram.tree(), &before);
}

#[rstest]
fn categories_are_listed_in_first_seen_order() {
    let dendrogram = pairs();
    assert_eq!(dendrogram.categories(), vec![&0_usize, &1]);
    assert_eq!(dendrogram.distinct_categories(), dendrogram.categories());
}

#[rstest]
fn hashed_and_scanned_categories_agree_on_interleaved_leaves() {
    let tags = [Some(7_usize), None, Some(2), Some(7), Some(5), None, Some(2)];
    let tagged = tags
        .iter()
        .zip(1_u64..)
        .map(|(&tag, order)| LeafMeta::new(format!("L{order}"), LeafOrder::new(order), tag))
        .collect();
    let dendrogram = Dendrogram::new(tagged, []).expect("leaves without merges build");

    assert_eq!(dendrogram.categories(), vec![&7, &2, &5]);
    assert_eq!(dendrogram.distinct_categories(), vec![&7, &2, &5]);
}

#[rstest]
fn pairs_are_swapped_into_rendering_order() {
    let dendrogram = pairs();
    let view = dendrogram.rebuild(None);
    let rows: Vec<[f64; 8]> = view.node_rows().iter().map(NodeRow::to_array).collect();
    assert_eq!(
        rows,
        vec![
            [1.0, 10.0, 0.0, 10.0, 20.0, 0.0, 20.0, 0.3],
            [2.0, 30.0, 0.0, 30.0, 40.0, 0.0, 40.0, 0.4],
            [3.0, 1.0, 1.0, 10.0, 2.0, 1.0, 40.0, 1.0],
        ]
    );
}

#[rstest]
fn node_row_kinds_follow_references() {
    let dendrogram = scenario();
    let view = dendrogram.rebuild(None);
    let row = view.node_rows()[1];
    assert_eq!(row.left.kind(), NodeKind::Merge);
    assert_eq!(row.right.kind(), NodeKind::Leaf);
    assert_eq!(NodeRef::from_parts(row.left.key(), row.left.kind()), row.left);
}

#[rstest]
fn every_construction_error_aborts_the_build() {
    let err = Dendrogram::from_rows(
        leaves(&SCENARIO_LEAVES),
        [[1.0, -1.0, -2.0, 0.2], [2.0, -3.0, 5.0, 0.5]],
    )
    .expect_err("merge 5 does not exist");
    assert_eq!(
        err,
        DendrogramError::DanglingReference {
            merge_id: MergeId::new(2),
            referenced: MergeId::new(5),
        }
    );
}
