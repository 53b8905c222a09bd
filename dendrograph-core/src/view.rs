//! Category-filtered views over a [`Dendrogram`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{Span, field, instrument};

use crate::{
    config::LayoutConfig,
    dendrogram::Dendrogram,
    error::LayoutError,
    geometry::CoordinateSystem,
    layout::{LayoutPass, RenderedNode},
    leaf::{LeafMeta, LeafOrderIndex},
    linkage::{LeafOrder, LinkRecord, MergeId, NodeRef},
    shape::CategoryPalette,
    tree::MergeNode,
};

/// Flat export of one active merge, in the column order hosts consume:
/// `[merge_id, left_key, left_kind, left_extreme, right_key, right_kind,
/// right_extreme, value]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeRow {
    /// Identifier of the merge.
    pub merge_id: MergeId,
    /// Left child after ordering.
    pub left: NodeRef,
    /// Leftmost leaf under the left child.
    pub left_extreme: LeafOrder,
    /// Right child after ordering.
    pub right: NodeRef,
    /// Rightmost leaf under the right child.
    pub right_extreme: LeafOrder,
    /// Dissimilarity of the merge.
    pub value: f64,
}

impl NodeRow {
    fn from_node<C>(node: &MergeNode<C>) -> Self {
        Self {
            merge_id: node.id(),
            left: node.left().reference(),
            left_extreme: node.left().span().min,
            right: node.right().reference(),
            right_extreme: node.right().span().max,
            value: node.value(),
        }
    }

    /// The numeric wire form of the row.
    ///
    /// # Examples
    /// ```
    /// use dendrograph_core::{LeafOrder, MergeId, NodeRef, NodeRow};
    ///
    /// let row = NodeRow {
    ///     merge_id: MergeId::new(2),
    ///     left: NodeRef::Merge(MergeId::new(1)),
    ///     left_extreme: LeafOrder::new(1),
    ///     right: NodeRef::Leaf(LeafOrder::new(3)),
    ///     right_extreme: LeafOrder::new(3),
    ///     value: 0.5,
    /// };
    /// assert_eq!(row.to_array(), [2.0, 1.0, 1.0, 1.0, 3.0, 0.0, 3.0, 0.5]);
    /// ```
    #[must_use]
    pub fn to_array(&self) -> [f64; 8] {
        [
            id_to_f64(self.merge_id.get()),
            id_to_f64(self.left.key()),
            f64::from(self.left.kind().flag()),
            id_to_f64(self.left_extreme.get()),
            id_to_f64(self.right.key()),
            f64::from(self.right.kind().flag()),
            id_to_f64(self.right_extreme.get()),
            self.value,
        ]
    }

    /// Re-reads the row as the record that produced it.
    ///
    /// Children keep their ordered positions, so rebuilding a tree from
    /// exported rows reproduces the same spans and categories.
    #[must_use]
    pub const fn to_link_record(&self) -> LinkRecord {
        LinkRecord {
            merge_id: self.merge_id,
            left: self.left,
            right: self.right,
            value: self.value,
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "identifiers are read from f64 rows and never exceed 2^53"
)]
fn id_to_f64(id: u64) -> f64 {
    id as f64
}

/// The active subset of a [`Dendrogram`] for one category filter.
///
/// Holds the labels in rendering order, the exported node rows, and a leaf
/// order index built for exactly this subset. Layout passes borrow the view.
#[derive(Debug, Clone)]
pub struct View<'a, C> {
    dendrogram: &'a Dendrogram<C>,
    filter: Option<C>,
    labels: Vec<String>,
    rows: Vec<NodeRow>,
    index: LeafOrderIndex,
}

impl<'a, C: Clone + PartialEq> View<'a, C> {
    #[instrument(
        name = "core.rebuild",
        skip_all,
        fields(filtered = filter.is_some(), leaves = field::Empty, merges = field::Empty),
    )]
    pub(crate) fn new(dendrogram: &'a Dendrogram<C>, filter: Option<&C>) -> Self {
        let active: Vec<&LeafMeta<C>> = dendrogram
            .leaves()
            .iter()
            .filter(|leaf| matches_filter(filter, leaf.category.as_ref()))
            .collect();
        let index = LeafOrderIndex::from_leaves(active.iter().copied());
        let labels = active.iter().map(|leaf| leaf.label.clone()).collect();
        let rows: Vec<NodeRow> = dendrogram
            .tree()
            .iter()
            .filter(|node| matches_node(filter, node))
            .map(NodeRow::from_node)
            .collect();

        let span = Span::current();
        span.record("leaves", index.len());
        span.record("merges", rows.len());

        Self {
            dendrogram,
            filter: filter.cloned(),
            labels,
            rows,
            index,
        }
    }

    /// Derives the view for another filter from the same dataset.
    ///
    /// Rebuilding with this view's own filter yields an equal view.
    #[must_use]
    pub fn rebuild(&self, filter: Option<&C>) -> Self {
        self.dendrogram.rebuild(filter)
    }

    /// The category this view is restricted to, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<&C> {
        self.filter.as_ref()
    }

    /// Labels of the active leaves in rendering order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// One exported row per active merge, in input order.
    #[must_use]
    pub fn node_rows(&self) -> &[NodeRow] {
        &self.rows
    }

    /// Rendering positions of the active leaves.
    #[must_use]
    pub const fn index(&self) -> &LeafOrderIndex {
        &self.index
    }

    /// The dataset this view was derived from.
    #[must_use]
    pub const fn dendrogram(&self) -> &'a Dendrogram<C> {
        self.dendrogram
    }

    /// Looks up an active merge.
    #[must_use]
    pub fn node(&self, id: MergeId) -> Option<&'a MergeNode<C>> {
        let dendrogram: &'a Dendrogram<C> = self.dendrogram;
        dendrogram
            .tree()
            .get(id)
            .filter(|node| matches_node(self.filter.as_ref(), node))
    }

    /// Iterates active merges in input order.
    pub fn merges(&self) -> impl Iterator<Item = &'a MergeNode<C>> + '_ {
        let dendrogram: &'a Dendrogram<C> = self.dendrogram;
        dendrogram
            .tree()
            .iter()
            .filter(|node| matches_node(self.filter.as_ref(), node))
    }

    /// Rendering position of an active leaf.
    pub(crate) fn leaf_position(&self, order: LeafOrder) -> Result<usize, LayoutError> {
        self.index
            .position(order)
            .ok_or(LayoutError::LeafOutsideView { order })
    }

    /// Starts a layout pass with an empty join-point cache.
    ///
    /// The returned pass is the host's per-node render callback; it must be
    /// fed children before parents.
    pub fn pass<'p, A, P>(
        &'p self,
        axis: &'p A,
        palette: &'p P,
        config: &'p LayoutConfig,
    ) -> LayoutPass<'p, 'a, C, A, P>
    where
        A: CoordinateSystem,
        P: CategoryPalette<C> + ?Sized,
    {
        LayoutPass::new(self, axis, palette, config)
    }

    /// Renders every active merge in input order, which always places
    /// children before parents.
    ///
    /// # Errors
    /// Returns [`LayoutError`] when a merge cannot be positioned; with a
    /// validated dataset this indicates an internal inconsistency.
    pub fn render_all<A, P>(
        &self,
        axis: &A,
        palette: &P,
        config: &LayoutConfig,
    ) -> Result<Vec<RenderedNode>, LayoutError>
    where
        A: CoordinateSystem,
        P: CategoryPalette<C> + ?Sized,
    {
        self.pass(axis, palette, config).render_all()
    }
}

impl<C: PartialEq> PartialEq for View<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        self.filter == other.filter
            && self.labels == other.labels
            && self.rows == other.rows
            && self.index == other.index
    }
}

fn matches_filter<C: PartialEq>(filter: Option<&C>, category: Option<&C>) -> bool {
    filter.is_none_or(|wanted| category == Some(wanted))
}

fn matches_node<C: PartialEq>(filter: Option<&C>, node: &MergeNode<C>) -> bool {
    matches_filter(filter, node.category())
}
