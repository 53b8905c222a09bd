//! Dendrograph core library.
//!
//! Lays out a hierarchical-clustering dendrogram from a linkage matrix. The
//! pipeline runs one way:
//!
//! - raw `[merge_id, left, right, value]` rows decode into [`LinkRecord`]s;
//! - [`Dendrogram`] builds the immutable [`MergeTree`] once, ordering the two
//!   children of every merge so sibling subtrees never interleave and
//!   propagating leaf categories upward while both children agree;
//! - [`Dendrogram::rebuild`] derives a [`View`] for an optional category
//!   filter, with labels, exported [`NodeRow`]s and a fresh [`LeafOrderIndex`];
//! - a [`LayoutPass`] resolves coordinates through the host's
//!   [`CoordinateSystem`] and returns declarative [`Shape`]s.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod config;
mod dendrogram;
mod error;
mod geometry;
mod layout;
mod leaf;
mod linkage;
mod shape;
mod tree;
mod view;

pub use crate::{
    cache::{JoinPoint, JoinPointCache},
    config::{LayoutConfig, LayoutConfigBuilder},
    dendrogram::Dendrogram,
    error::{
        DendrogramError, DendrogramErrorCode, LayoutError, LayoutErrorCode, LinkageError,
        LinkageErrorCode, Result,
    },
    geometry::{
        CoordinateSystem, LinearAxis, Point, Rect, bounding_rect, height_y, leaf_anchor, origin_y,
    },
    layout::{LayoutPass, RenderedNode},
    leaf::{LeafMeta, LeafOrderIndex},
    linkage::{LeafOrder, LinkRecord, MergeId, NodeKind, NodeRef},
    shape::{CategoryPalette, FrameRect, IndexedPalette, Polyline, Shape, Stroke},
    tree::{ItemNode, MergeNode, MergeTree, Span},
    view::{NodeRow, View},
};
