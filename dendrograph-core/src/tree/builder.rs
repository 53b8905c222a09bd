//! Incremental construction of the merge tree from decoded records.

use std::collections::HashMap;

use crate::{
    error::{DendrogramError, Result},
    leaf::{LeafMeta, LeafOrderIndex},
    linkage::{LeafOrder, LinkRecord, MergeId, NodeRef},
};

use super::{ItemNode, MergeNode, MergeTree, Span};

/// Consumes records in input order and accumulates merge nodes.
///
/// Leaf items are created on first reference through `index`, which must be
/// built over `leaves` itself so a position doubles as a slice offset.
pub(crate) struct TreeBuilder<'a, C> {
    leaves: &'a [LeafMeta<C>],
    index: &'a LeafOrderIndex,
    nodes: Vec<MergeNode<C>>,
    by_id: HashMap<MergeId, usize>,
    leaf_items: HashMap<LeafOrder, ItemNode<C>>,
    inversions: usize,
    reused: usize,
}

impl<'a, C: Clone + PartialEq> TreeBuilder<'a, C> {
    pub(crate) fn new(leaves: &'a [LeafMeta<C>], index: &'a LeafOrderIndex) -> Self {
        Self {
            leaves,
            index,
            nodes: Vec::new(),
            by_id: HashMap::new(),
            leaf_items: HashMap::new(),
            inversions: 0,
            reused: 0,
        }
    }

    /// Number of merges placed below at least one of their children.
    pub(crate) const fn inversions(&self) -> usize {
        self.inversions
    }

    /// Number of references to a node some earlier merge already consumed.
    pub(crate) const fn reused(&self) -> usize {
        self.reused
    }

    pub(crate) fn push(&mut self, record: LinkRecord) -> Result<()> {
        let LinkRecord {
            merge_id,
            left,
            right,
            value,
        } = record;
        if self.by_id.contains_key(&merge_id) {
            return Err(DendrogramError::DuplicateMergeId { merge_id });
        }

        let first = self.resolve(merge_id, left)?;
        let second = self.resolve(merge_id, right)?;

        let (left, right) = if self.position(merge_id, first.span.min)?
            > self.position(merge_id, second.span.max)?
        {
            (second, first)
        } else {
            (first, second)
        };

        let span = self.union(merge_id, left.span, right.span)?;
        let category = if left.category == right.category {
            left.category.clone()
        } else {
            None
        };

        self.count_inversion(&left, value);
        self.count_inversion(&right, value);
        tracing::debug!(
            merge_id = merge_id.get(),
            left = %left.reference,
            right = %right.reference,
            value,
            pure = category.is_some(),
            "merge registered"
        );

        let slot = self.nodes.len();
        self.nodes.push(MergeNode {
            id: merge_id,
            current: ItemNode::new(NodeRef::Merge(merge_id), span, category),
            left,
            right,
            value,
            parent: None,
        });
        self.by_id.insert(merge_id, slot);
        Ok(())
    }

    pub(crate) fn finish(self) -> MergeTree<C> {
        MergeTree {
            nodes: self.nodes,
            by_id: self.by_id,
            leaves: self.leaf_items,
        }
    }

    /// Resolves one reference and records `merge_id` as its latest consumer.
    ///
    /// A node may be consumed more than once; the leaf item stays memoised and
    /// a merge's `parent` is overwritten by the last merge to reference it.
    fn resolve(&mut self, merge_id: MergeId, reference: NodeRef) -> Result<ItemNode<C>> {
        match reference {
            NodeRef::Leaf(order) => {
                if self.leaf_items.contains_key(&order) {
                    self.note_reuse(merge_id, reference);
                }
                self.leaf_item(merge_id, order)
            }
            NodeRef::Merge(referenced) => {
                let node = self
                    .by_id
                    .get(&referenced)
                    .and_then(|&slot| self.nodes.get_mut(slot))
                    .ok_or(DendrogramError::DanglingReference {
                        merge_id,
                        referenced,
                    })?;
                let previous = node.parent.replace(merge_id);
                let item = node.current.clone();
                if previous.is_some() {
                    self.note_reuse(merge_id, reference);
                }
                Ok(item)
            }
        }
    }

    fn note_reuse(&mut self, merge_id: MergeId, reference: NodeRef) {
        self.reused += 1;
        tracing::debug!(
            merge_id = merge_id.get(),
            child = %reference,
            "child consumed again"
        );
    }

    fn leaf_item(&mut self, merge_id: MergeId, order: LeafOrder) -> Result<ItemNode<C>> {
        if let Some(item) = self.leaf_items.get(&order) {
            return Ok(item.clone());
        }
        let meta = self
            .index
            .position(order)
            .and_then(|position| self.leaves.get(position))
            .ok_or(DendrogramError::UnknownLeaf { merge_id, order })?;
        let item = ItemNode::new(
            NodeRef::Leaf(order),
            Span::leaf(order),
            meta.category.clone(),
        );
        self.leaf_items.insert(order, item.clone());
        Ok(item)
    }

    fn position(&self, merge_id: MergeId, order: LeafOrder) -> Result<usize> {
        self.index
            .position(order)
            .ok_or(DendrogramError::UnknownLeaf { merge_id, order })
    }

    /// Combines two spans by rendering position.
    ///
    /// For a consistent leaf order this is `[left.min, right.max]`; taking the
    /// extremes keeps `min <= max` even when the supplied order interleaves.
    fn union(&self, merge_id: MergeId, left: Span, right: Span) -> Result<Span> {
        let min = if self.position(merge_id, right.min)? < self.position(merge_id, left.min)? {
            right.min
        } else {
            left.min
        };
        let max = if self.position(merge_id, left.max)? > self.position(merge_id, right.max)? {
            left.max
        } else {
            right.max
        };
        Ok(Span { min, max })
    }

    fn count_inversion(&mut self, child: &ItemNode<C>, value: f64) {
        if let NodeRef::Merge(id) = child.reference {
            let below = self
                .by_id
                .get(&id)
                .and_then(|&slot| self.nodes.get(slot))
                .is_some_and(|node| node.value > value);
            if below {
                self.inversions += 1;
            }
        }
    }
}
