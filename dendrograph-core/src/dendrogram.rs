//! Dataset-level entry point: leaves plus the merge tree built over them.

use std::{collections::HashSet, hash::Hash};

use tracing::{Span, field, instrument, warn};

use crate::{
    error::{DendrogramError, Result},
    leaf::{LeafMeta, LeafOrderIndex},
    linkage::LinkRecord,
    tree::{MergeTree, TreeBuilder},
    view::View,
};

/// A validated linkage dataset.
///
/// The merge tree is built once on construction and never changes; each
/// [`Dendrogram::rebuild`] derives a fresh [`View`] for a category filter.
///
/// # Examples
/// ```
/// use dendrograph_core::{Dendrogram, LeafMeta, LeafOrder};
///
/// let leaves = vec![
///     LeafMeta::new("A", LeafOrder::new(1), Some(0_usize)),
///     LeafMeta::new("B", LeafOrder::new(2), Some(0)),
///     LeafMeta::new("C", LeafOrder::new(3), Some(1)),
/// ];
/// let rows = [[1.0, -1.0, -2.0, 0.2], [2.0, -3.0, 1.0, 0.5]];
/// let dendrogram = Dendrogram::from_rows(leaves, rows)?;
///
/// let view = dendrogram.rebuild(Some(&0));
/// assert_eq!(view.labels(), ["A", "B"]);
/// assert_eq!(view.node_rows().len(), 1);
/// # Ok::<(), dendrograph_core::DendrogramError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Dendrogram<C> {
    leaves: Vec<LeafMeta<C>>,
    tree: MergeTree<C>,
}

impl<C: Clone + PartialEq> Dendrogram<C> {
    /// Builds the merge tree from decoded records, in input order.
    ///
    /// # Errors
    /// Returns [`DendrogramError`] when two leaves share an `order`, or when a
    /// record repeats a merge id, references an unknown leaf, or references a
    /// merge that has not been defined yet. No partial tree is returned.
    ///
    /// A node consumed by several merges is accepted: its `parent` ends up
    /// as the last merge that referenced it.
    #[instrument(
        name = "core.build_tree",
        err,
        skip_all,
        fields(
            leaves = leaves.len(),
            records = field::Empty,
            inversions = field::Empty,
            reused = field::Empty,
        ),
    )]
    pub fn new(
        leaves: Vec<LeafMeta<C>>,
        records: impl IntoIterator<Item = LinkRecord>,
    ) -> Result<Self> {
        ensure_unique_orders(&leaves)?;
        let index = LeafOrderIndex::from_leaves(&leaves);

        let mut builder = TreeBuilder::new(&leaves, &index);
        for record in records {
            builder.push(record)?;
        }
        let inversions = builder.inversions();
        let reused = builder.reused();
        let tree = builder.finish();

        let span = Span::current();
        span.record("records", tree.len());
        span.record("inversions", inversions);
        span.record("reused", reused);
        if inversions > 0 {
            warn!(
                inversions,
                "merge values are not monotonic; some brackets sit below their children"
            );
        }
        if reused > 0 {
            warn!(
                reused,
                "some nodes are consumed by more than one merge; parents point at the last"
            );
        }

        Ok(Self { leaves, tree })
    }

    /// Decodes raw `[merge_id, left, right, value]` rows and builds the tree.
    ///
    /// # Errors
    /// Returns [`DendrogramError::MalformedRow`] for the first row that fails
    /// to decode, and otherwise the same errors as [`Dendrogram::new`].
    pub fn from_rows<R: AsRef<[f64]>>(
        leaves: Vec<LeafMeta<C>>,
        rows: impl IntoIterator<Item = R>,
    ) -> Result<Self> {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| {
                LinkRecord::from_row(raw.as_ref())
                    .map_err(|error| DendrogramError::MalformedRow { row, error })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(leaves, records)
    }

    /// Leaf descriptors in rendering order.
    #[must_use]
    pub fn leaves(&self) -> &[LeafMeta<C>] {
        &self.leaves
    }

    /// The immutable merge tree.
    #[must_use]
    pub const fn tree(&self) -> &MergeTree<C> {
        &self.tree
    }

    /// Distinct leaf categories in first-seen order.
    ///
    /// `C` is only `PartialEq`, so deduplication is a linear scan per leaf.
    /// Use [`Dendrogram::distinct_categories`] when `C: Hash + Eq`.
    #[must_use]
    pub fn categories(&self) -> Vec<&C> {
        let mut seen: Vec<&C> = Vec::new();
        for category in self.leaves.iter().filter_map(|leaf| leaf.category.as_ref()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Derives the view for `filter`; `None` selects everything.
    ///
    /// With `Some(c)` only leaves tagged `c` and merges whose leaves are all
    /// tagged `c` are kept. Mixed merges never belong to a filtered view. A
    /// filter that matches nothing yields an empty view.
    #[must_use]
    pub fn rebuild(&self, filter: Option<&C>) -> View<'_, C> {
        View::new(self, filter)
    }
}

impl<C: Clone + Eq + Hash> Dendrogram<C> {
    /// Same result as [`Dendrogram::categories`], deduplicated through a hash
    /// set instead of a scan.
    #[must_use]
    pub fn distinct_categories(&self) -> Vec<&C> {
        let mut seen = HashSet::new();
        self.leaves
            .iter()
            .filter_map(|leaf| leaf.category.as_ref())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}

fn ensure_unique_orders<C>(leaves: &[LeafMeta<C>]) -> Result<()> {
    let mut seen = HashSet::with_capacity(leaves.len());
    for leaf in leaves {
        if !seen.insert(leaf.order) {
            return Err(DendrogramError::DuplicateLeafOrder { order: leaf.order });
        }
    }
    Ok(())
}
