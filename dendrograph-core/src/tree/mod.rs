//! The persistent binary merge tree reconstructed from linkage records.
//!
//! Records arrive in merge order: every merge reference points at a record
//! that appeared earlier. The builder resolves both references of each record,
//! orders the two children so the one starting earlier on the horizontal axis
//! is on the left, and derives the merged span and category. Once every node
//! has been ordered this way, sibling subtrees never interleave along the
//! horizontal axis.
//!
//! The tree is immutable after construction. Views and layout passes only
//! borrow it.

mod builder;

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::linkage::{LeafOrder, MergeId, NodeKind, NodeRef};

pub(crate) use self::builder::TreeBuilder;

/// Inclusive range of leaves covered by a node, named by the leftmost and
/// rightmost leaf in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Leftmost covered leaf.
    pub min: LeafOrder,
    /// Rightmost covered leaf.
    pub max: LeafOrder,
}

impl Span {
    /// Span of a single leaf.
    #[must_use]
    pub const fn leaf(order: LeafOrder) -> Self {
        Self {
            min: order,
            max: order,
        }
    }
}

/// One side of a merge: either a leaf or an earlier merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemNode<C> {
    reference: NodeRef,
    span: Span,
    category: Option<C>,
}

impl<C> ItemNode<C> {
    pub(crate) const fn new(reference: NodeRef, span: Span, category: Option<C>) -> Self {
        Self {
            reference,
            span,
            category,
        }
    }

    /// The leaf or merge this item stands for.
    #[must_use]
    pub const fn reference(&self) -> NodeRef {
        self.reference
    }

    /// Whether this item is a leaf or a merge.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.reference.kind()
    }

    /// Leaves covered by this item.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Shared category of every leaf under this item, or `None` when mixed.
    #[must_use]
    pub const fn category(&self) -> Option<&C> {
        self.category.as_ref()
    }

    /// Returns `true` for a merge whose leaves all share one category.
    #[must_use]
    pub const fn is_pure_merge(&self) -> bool {
        matches!(self.reference, NodeRef::Merge(_)) && self.category.is_some()
    }
}

/// A merge of exactly two children at a dissimilarity value.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeNode<C> {
    id: MergeId,
    left: ItemNode<C>,
    right: ItemNode<C>,
    current: ItemNode<C>,
    value: f64,
    parent: Option<MergeId>,
}

impl<C> MergeNode<C> {
    /// Identifier assigned by the data source.
    #[must_use]
    pub const fn id(&self) -> MergeId {
        self.id
    }

    /// Child drawn on the left.
    #[must_use]
    pub const fn left(&self) -> &ItemNode<C> {
        &self.left
    }

    /// Child drawn on the right.
    #[must_use]
    pub const fn right(&self) -> &ItemNode<C> {
        &self.right
    }

    /// The merge itself, as seen by its parent.
    #[must_use]
    pub const fn current(&self) -> &ItemNode<C> {
        &self.current
    }

    /// Dissimilarity at which the children merge.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Last merge that consumed this one, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<MergeId> {
        self.parent
    }

    /// Shorthand for `self.current().category()`.
    #[must_use]
    pub const fn category(&self) -> Option<&C> {
        self.current.category()
    }
}

/// Table of merge nodes indexed by merge id, iterable in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeTree<C> {
    nodes: Vec<MergeNode<C>>,
    by_id: HashMap<MergeId, usize>,
    leaves: HashMap<LeafOrder, ItemNode<C>>,
}

impl<C> MergeTree<C> {
    /// Looks up a merge by identifier.
    #[must_use]
    pub fn get(&self, id: MergeId) -> Option<&MergeNode<C>> {
        self.by_id.get(&id).and_then(|&slot| self.nodes.get(slot))
    }

    /// Iterates merges in input order, which is always children-before-parent.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MergeNode<C>> + '_ {
        self.nodes.iter()
    }

    /// Iterates merges that no later record consumed.
    pub fn roots(&self) -> impl Iterator<Item = &MergeNode<C>> + '_ {
        self.nodes.iter().filter(|node| node.parent.is_none())
    }

    /// Returns the memoised item for a leaf referenced by any record.
    #[must_use]
    pub fn leaf(&self, order: LeafOrder) -> Option<&ItemNode<C>> {
        self.leaves.get(&order)
    }

    /// Resolves a reference to the item a parent sees.
    #[must_use]
    pub fn item(&self, reference: NodeRef) -> Option<&ItemNode<C>> {
        match reference {
            NodeRef::Leaf(order) => self.leaf(order),
            NodeRef::Merge(id) => self.get(id).map(MergeNode::current),
        }
    }

    /// Number of merges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the linkage held no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod property;
