//! Leaf descriptors and the dense rendering-order index built over them.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::linkage::LeafOrder;

/// External description of one original item.
///
/// # Examples
/// ```
/// use dendrograph_core::{LeafMeta, LeafOrder};
///
/// let leaf = LeafMeta::new("A", LeafOrder::new(1), Some(0_usize));
/// assert_eq!(leaf.label, "A");
/// assert_eq!(leaf.category, Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeafMeta<C> {
    /// Display name shown on the horizontal axis.
    pub label: String,
    /// Stable identifier used by linkage references.
    pub order: LeafOrder,
    /// Optional grouping tag.
    pub category: Option<C>,
}

impl<C> LeafMeta<C> {
    /// Creates a leaf descriptor.
    #[must_use]
    pub fn new(label: impl Into<String>, order: LeafOrder, category: Option<C>) -> Self {
        Self {
            label: label.into(),
            order,
            category,
        }
    }
}

/// Maps each leaf's external `order` to its zero-based rendering position.
///
/// The index is never patched: a new one is built from the active leaf subset
/// whenever that subset changes, so positions are always dense and follow the
/// subset's sequence order.
///
/// # Examples
/// ```
/// use dendrograph_core::{LeafOrder, LeafOrderIndex};
///
/// let index = LeafOrderIndex::from_orders([LeafOrder::new(7), LeafOrder::new(3)]);
/// assert_eq!(index.position(LeafOrder::new(7)), Some(0));
/// assert_eq!(index.position(LeafOrder::new(3)), Some(1));
/// assert_eq!(index.position(LeafOrder::new(1)), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafOrderIndex {
    positions: HashMap<LeafOrder, usize>,
}

impl LeafOrderIndex {
    /// Builds an index from identifiers in rendering order.
    ///
    /// Identifiers are expected to be distinct; [`crate::Dendrogram::new`]
    /// rejects duplicates before any index is built.
    #[must_use]
    pub fn from_orders(orders: impl IntoIterator<Item = LeafOrder>) -> Self {
        let positions = orders
            .into_iter()
            .enumerate()
            .map(|(position, order)| (order, position))
            .collect();
        Self { positions }
    }

    /// Builds an index over a sequence of leaf descriptors.
    #[must_use]
    pub fn from_leaves<'a, C: 'a>(leaves: impl IntoIterator<Item = &'a LeafMeta<C>>) -> Self {
        Self::from_orders(leaves.into_iter().map(|leaf| leaf.order))
    }

    /// Returns the rendering position of `order`, if it is in the subset.
    #[must_use]
    pub fn position(&self, order: LeafOrder) -> Option<usize> {
        self.positions.get(&order).copied()
    }

    /// Returns `true` when `order` is part of the indexed subset.
    #[must_use]
    pub fn contains(&self, order: LeafOrder) -> bool {
        self.positions.contains_key(&order)
    }

    /// Number of indexed leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` when no leaf is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
