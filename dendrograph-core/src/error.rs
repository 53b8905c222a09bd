//! Error types for the dendrograph core library.
//!
//! Build-time failures reject a dataset wholesale and surface as
//! [`DendrogramError`]. Render-time failures indicate that the host broke the
//! children-before-parent contract or asked for a node outside the active view,
//! and surface as [`LayoutError`]. Every variant carries a stable code for
//! logging surfaces.

use std::fmt;

use thiserror::Error;

use crate::linkage::{LeafOrder, MergeId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A raw linkage row could not be decoded into a [`crate::LinkRecord`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LinkageError {
    /// The row did not contain exactly four fields.
    #[error("linkage row has {len} fields; expected 4")]
    WrongArity {
        /// Number of fields present in the row.
        len: usize,
    },
    /// A field held NaN or an infinity.
    #[error("linkage field `{field}` is not finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// An identifier field held a fractional or out-of-range number.
    #[error("linkage field `{field}` must be an integer identifier (got {value})")]
    NonIntegral {
        /// Name of the offending field.
        field: &'static str,
        /// Raw value found in the row.
        value: f64,
    },
    /// Merge identifiers must be strictly positive.
    #[error("merge id must be positive (got {got})")]
    InvalidMergeId {
        /// The rejected identifier.
        got: i64,
    },
}

define_error_codes! {
    /// Stable codes describing [`LinkageError`] variants.
    enum LinkageErrorCode for LinkageError {
        /// The row did not contain exactly four fields.
        WrongArity => WrongArity { .. } => "LINKAGE_WRONG_ARITY",
        /// A field held NaN or an infinity.
        NonFinite => NonFinite { .. } => "LINKAGE_NON_FINITE",
        /// An identifier field held a fractional or out-of-range number.
        NonIntegral => NonIntegral { .. } => "LINKAGE_NON_INTEGRAL",
        /// Merge identifiers must be strictly positive.
        InvalidMergeId => InvalidMergeId { .. } => "LINKAGE_INVALID_MERGE_ID",
    }
}

/// Error type produced while constructing a [`crate::Dendrogram`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DendrogramError {
    /// A raw row failed to decode.
    #[error("linkage row {row} is malformed: {error}")]
    MalformedRow {
        /// Zero-based position of the row in the input.
        row: usize,
        #[source]
        /// Underlying decoding failure.
        error: LinkageError,
    },
    /// A merge referenced another merge that has not been constructed yet.
    #[error("merge {merge_id} references merge {referenced} before it was defined")]
    DanglingReference {
        /// Merge whose record holds the reference.
        merge_id: MergeId,
        /// Merge identifier that could not be resolved.
        referenced: MergeId,
    },
    /// A merge referenced a leaf absent from the leaf descriptors.
    #[error("merge {merge_id} references unknown leaf {order}")]
    UnknownLeaf {
        /// Merge whose record holds the reference.
        merge_id: MergeId,
        /// Leaf identifier that could not be resolved.
        order: LeafOrder,
    },
    /// Two records share the same merge identifier.
    #[error("merge id {merge_id} is defined more than once")]
    DuplicateMergeId {
        /// The repeated identifier.
        merge_id: MergeId,
    },
    /// Two leaf descriptors share the same `order`.
    #[error("leaf order {order} is declared more than once")]
    DuplicateLeafOrder {
        /// The repeated identifier.
        order: LeafOrder,
    },
}

define_error_codes! {
    /// Stable codes describing [`DendrogramError`] variants.
    enum DendrogramErrorCode for DendrogramError {
        /// A raw row failed to decode.
        MalformedRow => MalformedRow { .. } => "DENDROGRAM_MALFORMED_ROW",
        /// A merge referenced another merge that has not been constructed yet.
        DanglingReference => DanglingReference { .. } => "DENDROGRAM_DANGLING_REFERENCE",
        /// A merge referenced a leaf absent from the leaf descriptors.
        UnknownLeaf => UnknownLeaf { .. } => "DENDROGRAM_UNKNOWN_LEAF",
        /// Two records share the same merge identifier.
        DuplicateMergeId => DuplicateMergeId { .. } => "DENDROGRAM_DUPLICATE_MERGE_ID",
        /// Two leaf descriptors share the same `order`.
        DuplicateLeafOrder => DuplicateLeafOrder { .. } => "DENDROGRAM_DUPLICATE_LEAF_ORDER",
    }
}

impl DendrogramError {
    /// Retrieve the inner [`LinkageErrorCode`] when a raw row failed to decode.
    pub const fn linkage_code(&self) -> Option<LinkageErrorCode> {
        match self {
            Self::MalformedRow { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Error type produced while rendering a layout pass.
///
/// These are contract violations by the caller rather than data errors: the
/// same input fails identically on retry.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A merge child was rendered before its join point was cached.
    #[error("join point for merge {merge_id} requested before it was rendered in this pass")]
    MissingJoinPoint {
        /// Child merge whose join point was missing.
        merge_id: MergeId,
    },
    /// The requested merge is not part of the active view.
    #[error("merge {merge_id} is not part of the active view")]
    UnknownMerge {
        /// Identifier passed by the host.
        merge_id: MergeId,
    },
    /// A leaf outside the active leaf subset was positioned.
    #[error("leaf {order} is not part of the active view")]
    LeafOutsideView {
        /// Identifier of the leaf.
        order: LeafOrder,
    },
    /// Rectangle padding must be finite and non-negative.
    #[error("rectangle padding must be finite and non-negative (got {padding})")]
    InvalidPadding {
        /// The rejected padding.
        padding: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`LayoutError`] variants.
    enum LayoutErrorCode for LayoutError {
        /// A merge child was rendered before its join point was cached.
        MissingJoinPoint => MissingJoinPoint { .. } => "LAYOUT_MISSING_JOIN_POINT",
        /// The requested merge is not part of the active view.
        UnknownMerge => UnknownMerge { .. } => "LAYOUT_UNKNOWN_MERGE",
        /// A leaf outside the active leaf subset was positioned.
        LeafOutsideView => LeafOutsideView { .. } => "LAYOUT_LEAF_OUTSIDE_VIEW",
        /// Rectangle padding must be finite and non-negative.
        InvalidPadding => InvalidPadding { .. } => "LAYOUT_INVALID_PADDING",
    }
}

/// Convenient alias for results returned while building a dendrogram.
pub type Result<T> = core::result::Result<T, DendrogramError>;
