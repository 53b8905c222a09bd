//! Layout passes: turning active merges into positioned shapes.
//!
//! A pass is the render callback handed to the host. The host calls
//! [`LayoutPass::render_node`] once per active merge and promises to render
//! both children of a merge before the merge itself. Each rendered merge
//! leaves its join point in the pass-owned cache so its parent can attach to
//! it without revisiting the subtree.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{Span, field, instrument};

use crate::{
    cache::{JoinPoint, JoinPointCache},
    config::LayoutConfig,
    error::LayoutError,
    geometry::{self, CoordinateSystem, Point},
    linkage::{MergeId, NodeRef},
    shape::{self, CategoryPalette, Shape},
    tree::ItemNode,
    view::View,
};

/// Shape produced for one merge during [`LayoutPass::render_all`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderedNode {
    /// The rendered merge.
    pub merge_id: MergeId,
    /// Its declarative shape.
    pub shape: Shape,
}

/// One render pass over a [`View`].
///
/// The pass owns its join-point cache and is the only writer to it. Dropping
/// a pass abandons it; a new pass always starts from an empty cache.
pub struct LayoutPass<'p, 'a, C, A, P: ?Sized> {
    view: &'p View<'a, C>,
    axis: &'p A,
    palette: &'p P,
    config: &'p LayoutConfig,
    cache: JoinPointCache,
    origin_y: Option<f64>,
}

impl<'p, 'a, C, A, P> LayoutPass<'p, 'a, C, A, P>
where
    C: Clone + PartialEq,
    A: CoordinateSystem,
    P: CategoryPalette<C> + ?Sized,
{
    pub(crate) fn new(
        view: &'p View<'a, C>,
        axis: &'p A,
        palette: &'p P,
        config: &'p LayoutConfig,
    ) -> Self {
        Self {
            view,
            axis,
            palette,
            config,
            cache: JoinPointCache::new(),
            origin_y: None,
        }
    }

    /// Positions merge `id` and returns its shape.
    ///
    /// # Errors
    /// Returns [`LayoutError::UnknownMerge`] when `id` is not active in the
    /// view, and [`LayoutError::MissingJoinPoint`] when a merge child has not
    /// been rendered yet in this pass.
    pub fn render_node(&mut self, id: MergeId) -> Result<Shape, LayoutError> {
        let node = self
            .view
            .node(id)
            .ok_or(LayoutError::UnknownMerge { merge_id: id })?;
        let top_y = geometry::height_y(self.axis, self.origin_y(), node.value());

        let (left_top, left_bottom) = self.anchor(node.left(), top_y)?;
        let (right_top, right_bottom) = self.anchor(node.right(), top_y)?;
        let points = [left_bottom, left_top, right_top, right_bottom];

        let span = node.current().span();
        let first = self.view.leaf_position(span.min)?;
        let last = self.view.leaf_position(span.max)?;
        self.cache.insert(
            id,
            JoinPoint {
                coord: left_top.midpoint(right_top),
                rect: geometry::bounding_rect(self.axis, top_y, node.value(), first, last),
            },
        );

        shape::emit(node, points, &self.cache, self.palette, self.config)
    }

    /// Renders every active merge of the view in input order.
    ///
    /// # Errors
    /// Propagates the first [`LayoutError`] raised by
    /// [`LayoutPass::render_node`].
    #[instrument(name = "core.render_all", err, skip_all, fields(merges = field::Empty))]
    pub fn render_all(&mut self) -> Result<Vec<RenderedNode>, LayoutError> {
        let view = self.view;
        let mut rendered = Vec::with_capacity(view.node_rows().len());
        for node in view.merges() {
            let shape = self.render_node(node.id())?;
            rendered.push(RenderedNode {
                merge_id: node.id(),
                shape,
            });
        }
        Span::current().record("merges", rendered.len());
        Ok(rendered)
    }

    /// Discards every cached join point so the pass can restart from scratch.
    pub fn reset(&mut self) {
        self.cache.reset();
        self.origin_y = None;
    }

    /// Join points recorded so far in this pass.
    #[must_use]
    pub const fn cache(&self) -> &JoinPointCache {
        &self.cache
    }

    fn origin_y(&mut self) -> f64 {
        let axis = self.axis;
        *self
            .origin_y
            .get_or_insert_with(|| geometry::origin_y(axis))
    }

    /// Returns the `(top, bottom)` points of the vertical segment for a child.
    ///
    /// Leaves hang from the axis; merges hang from their own crossbar.
    fn anchor(&self, item: &ItemNode<C>, top_y: f64) -> Result<(Point, Point), LayoutError> {
        let bottom = match item.reference() {
            NodeRef::Leaf(order) => {
                geometry::leaf_anchor(self.axis, self.view.leaf_position(order)?)
            }
            NodeRef::Merge(id) => self.cache.require(id)?.coord,
        };
        Ok((Point::new(bottom.x, top_y), bottom))
    }
}
