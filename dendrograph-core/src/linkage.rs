//! Decoding of raw linkage rows.
//!
//! A linkage row is the compact wire form `[merge_id, left, right, value]`.
//! Each reference is a signed integer: positive values name an earlier merge,
//! zero and negative values name a leaf by the absolute value of its `order`.
//! The sign never leaves this module; everything downstream works with
//! [`NodeRef`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::LinkageError;

/// Largest integer an `f64` row field can carry without losing precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Identifier assigned to a merge by the data source.
///
/// # Examples
/// ```
/// use dendrograph_core::MergeId;
///
/// let id = MergeId::new(4);
/// assert_eq!(id.get(), 4);
/// assert_eq!(id.to_string(), "4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct MergeId(u64);

impl MergeId {
    /// Creates a merge identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for MergeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External identifier of a leaf, used by linkage references.
///
/// # Examples
/// ```
/// use dendrograph_core::LeafOrder;
///
/// let order = LeafOrder::new(7);
/// assert_eq!(order.get(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct LeafOrder(u64);

impl LeafOrder {
    /// Creates a leaf identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(order: u64) -> Self { Self(order) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for LeafOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a reference names a leaf or an earlier merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum NodeKind {
    /// An original, unmerged item.
    Leaf,
    /// A node formed by an earlier record.
    Merge,
}

impl NodeKind {
    /// Numeric flag used in exported node rows: `0` for leaves, `1` for merges.
    #[must_use]
    pub const fn flag(self) -> u8 {
        match self {
            Self::Leaf => 0,
            Self::Merge => 1,
        }
    }
}

/// A decoded reference to one side of a merge.
///
/// # Examples
/// ```
/// use dendrograph_core::{LeafOrder, MergeId, NodeRef};
///
/// assert_eq!(NodeRef::decode(-3), NodeRef::Leaf(LeafOrder::new(3)));
/// assert_eq!(NodeRef::decode(0), NodeRef::Leaf(LeafOrder::new(0)));
/// assert_eq!(NodeRef::decode(2), NodeRef::Merge(MergeId::new(2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "kind", content = "id", rename_all = "lowercase"))]
pub enum NodeRef {
    /// Reference to a leaf by its external `order`.
    Leaf(LeafOrder),
    /// Reference to a merge produced by an earlier record.
    Merge(MergeId),
}

impl NodeRef {
    /// Decodes the signed wire encoding of a reference.
    #[must_use]
    pub const fn decode(encoded: i64) -> Self {
        if encoded > 0 {
            Self::Merge(MergeId(encoded.unsigned_abs()))
        } else {
            Self::Leaf(LeafOrder(encoded.unsigned_abs()))
        }
    }

    /// Rebuilds a reference from the `(key, flag)` pair of an exported node row.
    #[must_use]
    pub const fn from_parts(key: u64, kind: NodeKind) -> Self {
        match kind {
            NodeKind::Leaf => Self::Leaf(LeafOrder(key)),
            NodeKind::Merge => Self::Merge(MergeId(key)),
        }
    }

    /// Returns the kind of node referenced.
    #[must_use]
    pub const fn kind(self) -> NodeKind {
        match self {
            Self::Leaf(_) => NodeKind::Leaf,
            Self::Merge(_) => NodeKind::Merge,
        }
    }

    /// Returns the raw identifier without its kind.
    #[must_use]
    pub const fn key(self) -> u64 {
        match self {
            Self::Leaf(order) => order.0,
            Self::Merge(id) => id.0,
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(order) => write!(f, "leaf {order}"),
            Self::Merge(id) => write!(f, "merge {id}"),
        }
    }
}

/// One decoded merge record.
///
/// Records are consumed by [`crate::MergeTree::build`] in input order and
/// discarded once their merge node exists.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkRecord {
    /// Identifier of the merge produced by this record.
    pub merge_id: MergeId,
    /// First referenced child, as written in the input.
    pub left: NodeRef,
    /// Second referenced child, as written in the input.
    pub right: NodeRef,
    /// Dissimilarity at which the two children merge.
    pub value: f64,
}

impl LinkRecord {
    /// Decodes a record from integer fields.
    ///
    /// # Errors
    /// Returns [`LinkageError::InvalidMergeId`] when `merge_id` is not
    /// strictly positive.
    ///
    /// # Examples
    /// ```
    /// use dendrograph_core::{LeafOrder, LinkRecord, MergeId, NodeRef};
    ///
    /// let record = LinkRecord::from_encoded(3, 1, -4, 0.9)?;
    /// assert_eq!(record.merge_id, MergeId::new(3));
    /// assert_eq!(record.left, NodeRef::Merge(MergeId::new(1)));
    /// assert_eq!(record.right, NodeRef::Leaf(LeafOrder::new(4)));
    /// # Ok::<(), dendrograph_core::LinkageError>(())
    /// ```
    pub const fn from_encoded(
        merge_id: i64,
        left: i64,
        right: i64,
        value: f64,
    ) -> Result<Self, LinkageError> {
        if merge_id <= 0 {
            return Err(LinkageError::InvalidMergeId { got: merge_id });
        }
        Ok(Self {
            merge_id: MergeId(merge_id.unsigned_abs()),
            left: NodeRef::decode(left),
            right: NodeRef::decode(right),
            value,
        })
    }

    /// Decodes a record from a raw numeric row.
    ///
    /// Only the structural shape is checked: four finite numbers with integral
    /// identifiers. Whether references resolve is decided by the tree builder.
    ///
    /// # Errors
    /// Returns [`LinkageError`] when the row is not exactly four finite
    /// numbers, an identifier is fractional, or the merge id is not positive.
    ///
    /// # Examples
    /// ```
    /// use dendrograph_core::{LeafOrder, LinkRecord, NodeRef};
    ///
    /// let record = LinkRecord::from_row(&[1.0, -1.0, -2.0, 0.2])?;
    /// assert_eq!(record.left, NodeRef::Leaf(LeafOrder::new(1)));
    /// assert!(LinkRecord::from_row(&[1.0, -1.0]).is_err());
    /// # Ok::<(), dendrograph_core::LinkageError>(())
    /// ```
    pub fn from_row(row: &[f64]) -> Result<Self, LinkageError> {
        let &[merge_id, left, right, value] = row else {
            return Err(LinkageError::WrongArity { len: row.len() });
        };
        let merge_id = integral_field("merge_id", merge_id)?;
        let left = integral_field("left", left)?;
        let right = integral_field("right", right)?;
        if !value.is_finite() {
            return Err(LinkageError::NonFinite { field: "value" });
        }
        Self::from_encoded(merge_id, left, right, value)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is checked to be an integer within the exact f64 range"
)]
fn integral_field(field: &'static str, value: f64) -> Result<i64, LinkageError> {
    if !value.is_finite() {
        return Err(LinkageError::NonFinite { field });
    }
    if value.fract() != 0.0 || value.abs() > MAX_EXACT_INTEGER {
        return Err(LinkageError::NonIntegral { field, value });
    }
    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(-1, NodeRef::Leaf(LeafOrder::new(1)))]
    #[case(0, NodeRef::Leaf(LeafOrder::new(0)))]
    #[case(5, NodeRef::Merge(MergeId::new(5)))]
    #[case(i64::MIN, NodeRef::Leaf(LeafOrder::new(1 << 63)))]
    fn decode_uses_sign_for_kind(#[case] encoded: i64, #[case] expected: NodeRef) {
        assert_eq!(NodeRef::decode(encoded), expected);
    }

    #[test]
    fn from_row_decodes_both_references() {
        let record = LinkRecord::from_row(&[2.0, -3.0, 1.0, 0.5]).expect("row must decode");
        assert_eq!(record.merge_id, MergeId::new(2));
        assert_eq!(record.left, NodeRef::Leaf(LeafOrder::new(3)));
        assert_eq!(record.right, NodeRef::Merge(MergeId::new(1)));
        assert!((record.value - 0.5).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case::short(vec![1.0, -1.0, -2.0], LinkageError::WrongArity { len: 3 })]
    #[case::long(vec![1.0, -1.0, -2.0, 0.1, 9.0], LinkageError::WrongArity { len: 5 })]
    #[case::fractional_id(
        vec![1.5, -1.0, -2.0, 0.1],
        LinkageError::NonIntegral { field: "merge_id", value: 1.5 },
    )]
    #[case::nan_reference(vec![1.0, f64::NAN, -2.0, 0.1], LinkageError::NonFinite { field: "left" })]
    #[case::infinite_value(
        vec![1.0, -1.0, -2.0, f64::INFINITY],
        LinkageError::NonFinite { field: "value" },
    )]
    #[case::zero_merge_id(vec![0.0, -1.0, -2.0, 0.1], LinkageError::InvalidMergeId { got: 0 })]
    #[case::negative_merge_id(vec![-4.0, -1.0, -2.0, 0.1], LinkageError::InvalidMergeId { got: -4 })]
    fn from_row_rejects_malformed_rows(#[case] row: Vec<f64>, #[case] expected: LinkageError) {
        let err = LinkRecord::from_row(&row).expect_err("row must be rejected");
        assert_eq!(err, expected);
    }

    #[test]
    fn from_row_accepts_negative_values() {
        // Heights are not validated beyond finiteness.
        let record = LinkRecord::from_row(&[1.0, -1.0, -2.0, -0.25]).expect("row must decode");
        assert!(record.value < 0.0);
    }

    #[test]
    fn node_ref_round_trips_through_parts() {
        for reference in [
            NodeRef::Leaf(LeafOrder::new(9)),
            NodeRef::Merge(MergeId::new(9)),
        ] {
            assert_eq!(
                NodeRef::from_parts(reference.key(), reference.kind()),
                reference
            );
        }
    }
}
