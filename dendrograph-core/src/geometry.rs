//! Coordinate resolution against the host's axis transform.
//!
//! Data space puts leaf rendering positions on the x axis and dissimilarity on
//! the y axis. The host converts data points to pixels through
//! [`CoordinateSystem`]; everything here is a pure function of that transform.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point or a delta, in data or pixel space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Grows the rectangle by `padding` on the left, top and right edges.
    ///
    /// The bottom edge stays on the axis.
    #[must_use]
    pub fn padded(self, padding: f64) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + padding * 2.0,
            height: self.height + padding,
        }
    }
}

/// Axis transform supplied by the charting host for one render pass.
pub trait CoordinateSystem {
    /// Converts a data point to a pixel point.
    fn coord_of(&self, point: Point) -> Point;

    /// Converts a data-space delta to a pixel-space delta.
    fn size_of(&self, delta: Point) -> Point;
}

impl<T: CoordinateSystem + ?Sized> CoordinateSystem for &T {
    fn coord_of(&self, point: Point) -> Point {
        (**self).coord_of(point)
    }

    fn size_of(&self, delta: Point) -> Point {
        (**self).size_of(delta)
    }
}

/// Category-band x axis and linear value y axis over a plot area.
///
/// Leaf position `i` is centred in the `i`-th band; value `0` sits on the
/// bottom edge of the plot area and larger values go up.
///
/// # Examples
/// ```
/// use dendrograph_core::{CoordinateSystem, LinearAxis, Point};
///
/// let axis = LinearAxis::new(Point::new(0.0, 100.0), 10.0, 50.0);
/// assert_eq!(axis.coord_of(Point::new(0.0, 0.0)), Point::new(5.0, 100.0));
/// assert_eq!(axis.size_of(Point::new(1.0, 0.5)), Point::new(10.0, 25.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearAxis {
    origin: Point,
    band_width: f64,
    value_scale: f64,
}

impl LinearAxis {
    /// Creates an axis whose bottom-left plot corner is `origin`.
    #[must_use]
    pub const fn new(origin: Point, band_width: f64, value_scale: f64) -> Self {
        Self {
            origin,
            band_width,
            value_scale,
        }
    }

    /// Fits `leaf_count` bands and values up to `max_value` into a
    /// `width` x `height` plot area anchored at the top-left pixel `(0, 0)`.
    #[must_use]
    pub fn fit(width: f64, height: f64, leaf_count: usize, max_value: f64) -> Self {
        let band_width = width / to_f64(leaf_count.max(1));
        let value_scale = if max_value > 0.0 && max_value.is_finite() {
            height / max_value
        } else {
            height
        };
        Self::new(Point::new(0.0, height), band_width, value_scale)
    }
}

impl CoordinateSystem for LinearAxis {
    fn coord_of(&self, point: Point) -> Point {
        Point::new(
            self.origin.x + (point.x + 0.5) * self.band_width,
            self.origin.y - point.y * self.value_scale,
        )
    }

    fn size_of(&self, delta: Point) -> Point {
        Point::new(delta.x * self.band_width, delta.y * self.value_scale)
    }
}

/// Pixel y of the value-axis origin.
pub fn origin_y(axis: &impl CoordinateSystem) -> f64 {
    axis.coord_of(Point::new(0.0, 0.0)).y
}

/// Pixel y at which a merge of dissimilarity `value` is drawn.
pub fn height_y(axis: &impl CoordinateSystem, origin_y: f64, value: f64) -> f64 {
    origin_y - axis.size_of(Point::new(0.0, value)).y
}

/// Pixel point on the axis beneath the leaf at rendering `position`.
pub fn leaf_anchor(axis: &impl CoordinateSystem, position: usize) -> Point {
    axis.coord_of(Point::new(to_f64(position), 0.0))
}

/// Bounding rectangle of a merge spanning rendering positions
/// `first..=last`, topped at `height_y`.
pub fn bounding_rect(
    axis: &impl CoordinateSystem,
    height_y: f64,
    value: f64,
    first: usize,
    last: usize,
) -> Rect {
    let x = leaf_anchor(axis, first).x;
    let unit = axis.size_of(Point::new(1.0, value));
    Rect {
        x,
        y: height_y,
        width: unit.x * to_f64(last.saturating_sub(first)),
        height: unit.y,
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "leaf positions stay far below 2^52"
)]
pub(crate) fn to_f64(value: usize) -> f64 {
    value as f64
}
