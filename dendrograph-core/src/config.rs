//! Styling knobs for the shape emitter.

use crate::error::LayoutError;

const DEFAULT_RECT_PADDING: f64 = 4.0;
const DEFAULT_MIXED_STROKE: &str = "#999999";
const DEFAULT_DASH: [f64; 2] = [4.0, 4.0];

/// Validated layout settings shared by every pass over a view.
///
/// # Examples
/// ```
/// use dendrograph_core::LayoutConfig;
///
/// let config = LayoutConfig::default();
/// assert_eq!(config.rect_padding(), 4.0);
/// assert_eq!(config.mixed_stroke(), "#999999");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    rect_padding: f64,
    mixed_stroke: String,
    dash: Vec<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rect_padding: DEFAULT_RECT_PADDING,
            mixed_stroke: DEFAULT_MIXED_STROKE.to_owned(),
            dash: DEFAULT_DASH.to_vec(),
        }
    }
}

impl LayoutConfig {
    /// Starts a builder populated with the defaults.
    #[must_use]
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::default()
    }

    /// Padding added around the rectangles that frame pure sub-clusters.
    #[must_use]
    pub const fn rect_padding(&self) -> f64 {
        self.rect_padding
    }

    /// Stroke colour of mixed-category merges.
    #[must_use]
    pub fn mixed_stroke(&self) -> &str {
        &self.mixed_stroke
    }

    /// Dash pattern of mixed-category merges.
    #[must_use]
    pub fn dash(&self) -> &[f64] {
        &self.dash
    }
}

/// Configures and validates [`LayoutConfig`] instances.
///
/// # Examples
/// ```
/// use dendrograph_core::LayoutConfig;
///
/// let config = LayoutConfig::builder()
///     .with_rect_padding(2.0)
///     .with_mixed_stroke("black")
///     .with_dash(vec![2.0, 1.0])
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.rect_padding(), 2.0);
/// assert_eq!(config.dash(), &[2.0, 1.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutConfigBuilder {
    config: LayoutConfig,
}

impl LayoutConfigBuilder {
    /// Overrides the rectangle padding.
    #[must_use]
    pub fn with_rect_padding(mut self, padding: f64) -> Self {
        self.config.rect_padding = padding;
        self
    }

    /// Overrides the stroke colour of mixed merges.
    #[must_use]
    pub fn with_mixed_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.config.mixed_stroke = stroke.into();
        self
    }

    /// Overrides the dash pattern of mixed merges.
    #[must_use]
    pub fn with_dash(mut self, dash: Vec<f64>) -> Self {
        self.config.dash = dash;
        self
    }

    /// Validates the settings.
    ///
    /// # Errors
    /// Returns [`LayoutError::InvalidPadding`] when the padding is negative or
    /// not finite.
    pub fn build(self) -> Result<LayoutConfig, LayoutError> {
        let padding = self.config.rect_padding;
        if !padding.is_finite() || padding < 0.0 {
            return Err(LayoutError::InvalidPadding { padding });
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn build_rejects_bad_padding(#[case] padding: f64) {
        let err = LayoutConfig::builder()
            .with_rect_padding(padding)
            .build()
            .expect_err("padding must be rejected");
        assert!(matches!(err, LayoutError::InvalidPadding { .. }));
    }

    #[test]
    fn build_accepts_zero_padding() {
        let config = LayoutConfig::builder()
            .with_rect_padding(0.0)
            .build()
            .expect("zero padding is valid");
        assert_eq!(config.rect_padding(), 0.0);
        assert_eq!(config.dash(), &DEFAULT_DASH);
    }
}
