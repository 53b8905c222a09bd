//! Property-based checks over randomly generated valid linkages.
//!
//! Fixtures are built as random binary forests: leaves are paired in random
//! order, each pairing is written with a random side swap, and the rendering
//! sequence is the in-order traversal of the forest. Merge values are drawn
//! independently, so non-monotonic heights are covered too.

use std::collections::HashMap;

use proptest::prelude::*;
use proptest::test_runner::{TestCaseError, TestCaseResult};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{
    Dendrogram, IndexedPalette, LayoutConfig, LeafMeta, LeafOrder, LinearAxis, LinkRecord,
    MergeId, NodeRef, Shape, Stroke,
};

/// A generated dataset plus the seed that produced it.
#[derive(Debug, Clone)]
struct LinkageFixture {
    seed: u64,
    leaves: Vec<LeafMeta<usize>>,
    records: Vec<LinkRecord>,
}

/// Generates a forest over `leaf_count` leaves with up to `categories`
/// categories, stopping early with probability `1 / (leaf_count + 1)` per
/// merge so forests with several roots appear.
fn generate_fixture(seed: u64, leaf_count: usize, categories: usize) -> LinkageFixture {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut orders: Vec<u64> = (1..=leaf_count as u64).map(|order| order * 3).collect();
    orders.shuffle(&mut rng);

    let mut pool: Vec<NodeRef> = orders
        .iter()
        .map(|&order| NodeRef::Leaf(LeafOrder::new(order)))
        .collect();
    let mut children: HashMap<MergeId, (NodeRef, NodeRef)> = HashMap::new();
    let mut records = Vec::new();
    let mut next_id = 1_u64;

    while pool.len() > 1 {
        if !records.is_empty() && rng.gen_range(0..=leaf_count) == 0 {
            break;
        }
        let first = pool.swap_remove(rng.gen_range(0..pool.len()));
        let second = pool.swap_remove(rng.gen_range(0..pool.len()));
        let merge_id = MergeId::new(next_id);
        next_id += 1;

        let (left, right) = if rng.gen_bool(0.5) {
            (first, second)
        } else {
            (second, first)
        };
        children.insert(merge_id, (left, right));
        records.push(LinkRecord {
            merge_id,
            left,
            right,
            value: rng.gen_range(0.0..10.0),
        });
        pool.push(NodeRef::Merge(merge_id));
    }

    let mut sequence = Vec::with_capacity(leaf_count);
    pool.shuffle(&mut rng);
    for root in pool {
        in_order(root, &children, &mut rng, &mut sequence);
    }

    let leaves = sequence
        .into_iter()
        .map(|order| {
            let category = if rng.gen_bool(0.1) {
                None
            } else {
                Some(rng.gen_range(0..categories.max(1)))
            };
            LeafMeta::new(format!("leaf-{}", order.get()), order, category)
        })
        .collect();

    LinkageFixture {
        seed,
        leaves,
        records,
    }
}

fn in_order(
    node: NodeRef,
    children: &HashMap<MergeId, (NodeRef, NodeRef)>,
    rng: &mut SmallRng,
    out: &mut Vec<LeafOrder>,
) {
    match node {
        NodeRef::Leaf(order) => out.push(order),
        NodeRef::Merge(id) => {
            let Some(&(left, right)) = children.get(&id) else {
                return;
            };
            let (first, second) = if rng.gen_bool(0.5) {
                (left, right)
            } else {
                (right, left)
            };
            in_order(first, children, rng, out);
            in_order(second, children, rng, out);
        }
    }
}

fn fixture_strategy() -> impl Strategy<Value = LinkageFixture> {
    (any::<u64>(), 1_usize..48, 1_usize..4)
        .prop_map(|(seed, leaf_count, categories)| generate_fixture(seed, leaf_count, categories))
}

fn fail(fixture: &LinkageFixture, message: impl std::fmt::Display) -> TestCaseError {
    TestCaseError::fail(format!(
        "{message} (seed={}, leaves={}, records={})",
        fixture.seed,
        fixture.leaves.len(),
        fixture.records.len()
    ))
}

fn build(fixture: &LinkageFixture) -> Result<Dendrogram<usize>, TestCaseError> {
    Dendrogram::new(fixture.leaves.clone(), fixture.records.iter().copied())
        .map_err(|err| fail(fixture, format!("valid linkage rejected: {err}")))
}

fn run_span_properties(fixture: &LinkageFixture) -> TestCaseResult {
    let dendrogram = build(fixture)?;
    let positions: HashMap<LeafOrder, usize> = fixture
        .leaves
        .iter()
        .enumerate()
        .map(|(position, leaf)| (leaf.order, position))
        .collect();
    let pos = |order: LeafOrder| positions.get(&order).copied().unwrap_or(usize::MAX);

    for node in dendrogram.tree().iter() {
        let (left, right) = (node.left().span(), node.right().span());
        let span = node.current().span();
        if pos(span.min) != pos(left.min).min(pos(right.min))
            || pos(span.max) != pos(left.max).max(pos(right.max))
        {
            return Err(fail(fixture, format!("merge {} span is not a union", node.id())));
        }
        if pos(span.min) > pos(span.max) {
            return Err(fail(fixture, format!("merge {} span is inverted", node.id())));
        }
        if pos(left.max) >= pos(right.min) {
            return Err(fail(fixture, format!("merge {} children interleave", node.id())));
        }
    }
    Ok(())
}

fn run_category_properties(fixture: &LinkageFixture) -> TestCaseResult {
    let dendrogram = build(fixture)?;
    let positions: HashMap<LeafOrder, usize> = fixture
        .leaves
        .iter()
        .enumerate()
        .map(|(position, leaf)| (leaf.order, position))
        .collect();

    for node in dendrogram.tree().iter() {
        let (left, right) = (node.left(), node.right());
        let local = if left.category() == right.category() {
            left.category()
        } else {
            None
        };
        if node.category() != local {
            return Err(fail(fixture, format!("merge {} ignores its children", node.id())));
        }

        let span = node.current().span();
        let (Some(&first), Some(&last)) = (positions.get(&span.min), positions.get(&span.max))
        else {
            return Err(fail(fixture, format!("merge {} spans unknown leaves", node.id())));
        };
        let covered = fixture.leaves.get(first..=last).unwrap_or_default();
        let shared = covered.first().and_then(|leaf| leaf.category.as_ref());
        let expected = shared.filter(|&category| {
            covered
                .iter()
                .all(|leaf| leaf.category.as_ref() == Some(category))
        });
        if node.category() != expected {
            return Err(fail(
                fixture,
                format!("merge {} category disagrees with its leaves", node.id()),
            ));
        }
    }
    Ok(())
}

fn run_view_properties(fixture: &LinkageFixture) -> TestCaseResult {
    let dendrogram = build(fixture)?;
    let axis = LinearAxis::fit(640.0, 480.0, fixture.leaves.len(), 10.0);
    let palette = IndexedPalette::default();
    let config = LayoutConfig::default();

    let filters: Vec<Option<usize>> = std::iter::once(None)
        .chain(dendrogram.categories().into_iter().map(|&c| Some(c)))
        .collect();
    for filter in filters {
        let view = dendrogram.rebuild(filter.as_ref());
        if view.rebuild(filter.as_ref()) != view {
            return Err(fail(fixture, format!("rebuild({filter:?}) is not idempotent")));
        }
        if view.labels().len() != view.index().len() {
            return Err(fail(fixture, "labels and index disagree"));
        }

        let rendered = view
            .render_all(&axis, &palette, &config)
            .map_err(|err| fail(fixture, format!("render({filter:?}) failed: {err}")))?;
        if rendered.len() != view.node_rows().len() {
            return Err(fail(fixture, "one shape per active merge expected"));
        }
        for node in &rendered {
            let pure = dendrogram
                .tree()
                .get(node.merge_id)
                .is_some_and(|merge| merge.category().is_some());
            let solid = matches!(
                &node.shape,
                Shape::Polyline(polyline) if matches!(polyline.stroke, Stroke::Solid { .. })
            );
            if pure != solid {
                return Err(fail(
                    fixture,
                    format!("merge {} stroke disagrees with purity", node.merge_id),
                ));
            }
        }
    }
    Ok(())
}

fn run_row_round_trip(fixture: &LinkageFixture) -> TestCaseResult {
    let dendrogram = build(fixture)?;
    let view = dendrogram.rebuild(None);
    let rebuilt = Dendrogram::new(
        fixture.leaves.clone(),
        view.node_rows().iter().map(|row| row.to_link_record()),
    )
    .map_err(|err| fail(fixture, format!("exported rows rejected: {err}")))?;

    for (original, copy) in dendrogram.tree().iter().zip(rebuilt.tree().iter()) {
        if original != copy {
            return Err(fail(
                fixture,
                format!("merge {} changed after round trip", original.id()),
            ));
        }
    }
    if rebuilt.tree().len() != dendrogram.tree().len() {
        return Err(fail(fixture, "round trip changed the merge count"));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn spans_cover_children_without_interleaving(fixture in fixture_strategy()) {
        run_span_properties(&fixture)?;
    }

    #[test]
    fn categories_propagate_while_children_agree(fixture in fixture_strategy()) {
        run_category_properties(&fixture)?;
    }

    #[test]
    fn views_are_idempotent_and_renderable(fixture in fixture_strategy()) {
        run_view_properties(&fixture)?;
    }

    #[test]
    fn exported_rows_rebuild_the_same_tree(fixture in fixture_strategy()) {
        run_row_round_trip(&fixture)?;
    }
}

#[rstest::rstest]
#[case::single_leaf(7, 1, 1)]
#[case::pair(42, 2, 2)]
#[case::wide(999, 40, 3)]
#[case::monochrome(7777, 24, 1)]
fn seeded_fixtures_satisfy_every_property(
    #[case] seed: u64,
    #[case] leaf_count: usize,
    #[case] categories: usize,
) {
    let fixture = generate_fixture(seed, leaf_count, categories);
    run_span_properties(&fixture).expect("span properties must hold");
    run_category_properties(&fixture).expect("category properties must hold");
    run_view_properties(&fixture).expect("view properties must hold");
    run_row_round_trip(&fixture).expect("round trip must hold");
}
