//! Declarative shapes handed back to the host for drawing.
//!
//! A category-pure merge becomes one solid polyline in its category colour. A
//! mixed merge becomes a dashed polyline and, for each direct child that is a
//! pure merge, a rectangle framing that child's subtree: the sub-cluster that
//! lost its colour at this merge.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    cache::JoinPointCache,
    config::LayoutConfig,
    error::LayoutError,
    geometry::{Point, Rect},
    linkage::{MergeId, NodeRef},
    tree::MergeNode,
};

/// Default colour cycle, matching the usual charting-host palette.
const DEFAULT_COLORS: [&str; 11] = [
    "#c23531", "#2f4554", "#61a0a8", "#d48265", "#91c7ae", "#749f83", "#ca8622", "#bda29a",
    "#6e7074", "#546570", "#c4ccd3",
];

/// Injected lookup from a category to its stroke colour.
pub trait CategoryPalette<C: ?Sized> {
    /// Stroke colour for merges whose leaves all belong to `category`.
    fn stroke_for(&self, category: &C) -> String;
}

impl<C: ?Sized, F> CategoryPalette<C> for F
where
    F: Fn(&C) -> String,
{
    fn stroke_for(&self, category: &C) -> String {
        self(category)
    }
}

/// Cyclic colour list indexed by numeric category.
///
/// # Examples
/// ```
/// use dendrograph_core::{CategoryPalette, IndexedPalette};
///
/// let palette = IndexedPalette::new(vec!["red".into(), "blue".into()]);
/// assert_eq!(palette.stroke_for(&0), "red");
/// assert_eq!(palette.stroke_for(&3), "blue");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPalette {
    colors: Vec<String>,
}

impl IndexedPalette {
    /// Creates a palette cycling through `colors`; an empty list falls back to
    /// the default cycle.
    #[must_use]
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }
}

impl Default for IndexedPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|&color| color.to_owned()).collect(),
        }
    }
}

impl CategoryPalette<usize> for IndexedPalette {
    fn stroke_for(&self, category: &usize) -> String {
        let slot = category % self.colors.len().max(1);
        self.colors.get(slot).cloned().unwrap_or_default()
    }
}

/// How a polyline is stroked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "style", rename_all = "lowercase"))]
pub enum Stroke {
    /// Category-pure merge.
    Solid {
        /// Category colour.
        color: String,
    },
    /// Mixed merge.
    Dashed {
        /// Neutral colour for mixed merges.
        color: String,
        /// Dash pattern in pixels.
        dash: Vec<f64>,
    },
}

/// The bracket drawn for one merge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polyline {
    /// `[left_bottom, left_top, right_top, right_bottom]`.
    pub points: [Point; 4],
    /// Stroke style.
    pub stroke: Stroke,
}

/// Rectangle framing a pure sub-cluster beneath a mixed merge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameRect {
    /// Merge whose subtree is framed.
    pub merge_id: MergeId,
    /// Padded pixel rectangle.
    pub rect: Rect,
    /// Colour of the framed sub-cluster.
    pub stroke: String,
}

/// Declarative description of one rendered merge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "kind", rename_all = "lowercase"))]
pub enum Shape {
    /// A single bracket.
    Polyline(Polyline),
    /// A dashed bracket plus frames around pure children.
    Group {
        /// The dashed bracket.
        polyline: Polyline,
        /// One frame per pure merge child.
        rects: Vec<FrameRect>,
    },
}

impl Shape {
    /// The bracket of this shape, grouped or not.
    #[must_use]
    pub const fn polyline(&self) -> &Polyline {
        match self {
            Self::Polyline(polyline) | Self::Group { polyline, .. } => polyline,
        }
    }

    /// Frames attached to this shape; empty for a bare polyline.
    #[must_use]
    pub fn rects(&self) -> &[FrameRect] {
        match self {
            Self::Polyline(_) => &[],
            Self::Group { rects, .. } => rects,
        }
    }
}

/// Builds the shape of `node` from its corners.
///
/// Frames read the bounding rectangles of pure merge children from `cache`,
/// so the children must have been rendered earlier in the same pass.
pub(crate) fn emit<C, P>(
    node: &MergeNode<C>,
    points: [Point; 4],
    cache: &JoinPointCache,
    palette: &P,
    config: &LayoutConfig,
) -> Result<Shape, LayoutError>
where
    P: CategoryPalette<C> + ?Sized,
{
    if let Some(category) = node.category() {
        return Ok(Shape::Polyline(Polyline {
            points,
            stroke: Stroke::Solid {
                color: palette.stroke_for(category),
            },
        }));
    }

    let polyline = Polyline {
        points,
        stroke: Stroke::Dashed {
            color: config.mixed_stroke().to_owned(),
            dash: config.dash().to_vec(),
        },
    };

    let mut rects = Vec::new();
    for child in [node.left(), node.right()] {
        let (NodeRef::Merge(id), Some(category)) = (child.reference(), child.category()) else {
            continue;
        };
        let join = cache.require(id)?;
        rects.push(FrameRect {
            merge_id: id,
            rect: join.rect.padded(config.rect_padding()),
            stroke: palette.stroke_for(category),
        });
    }

    if rects.is_empty() {
        Ok(Shape::Polyline(polyline))
    } else {
        Ok(Shape::Group { polyline, rects })
    }
}
