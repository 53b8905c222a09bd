//! Pass-scoped join points of already rendered merges.

use std::collections::HashMap;

use crate::{
    error::LayoutError,
    geometry::{Point, Rect},
    linkage::MergeId,
};

/// Where a rendered merge connects to its parent, plus its bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinPoint {
    /// Midpoint of the merge's crossbar.
    pub coord: Point,
    /// Pixel box covering the merge's leaves from its height down to the axis.
    pub rect: Rect,
}

/// Join points recorded during one layout pass, keyed by merge id.
///
/// Entries are only valid within the pass that wrote them: a filter change
/// moves leaves to different positions, so a new pass always starts empty.
#[derive(Debug, Clone, Default)]
pub struct JoinPointCache {
    entries: HashMap<MergeId, JoinPoint>,
}

impl JoinPointCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry so the cache can serve a fresh pass.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Records the join point of a freshly rendered merge.
    pub fn insert(&mut self, id: MergeId, join: JoinPoint) {
        self.entries.insert(id, join);
    }

    /// Returns the join point of `id`, if it was rendered in this pass.
    #[must_use]
    pub fn get(&self, id: MergeId) -> Option<&JoinPoint> {
        self.entries.get(&id)
    }

    /// Returns the join point of `id` or the ordering violation it implies.
    ///
    /// # Errors
    /// Returns [`LayoutError::MissingJoinPoint`] when `id` has not been
    /// rendered yet in this pass.
    pub fn require(&self, id: MergeId) -> Result<&JoinPoint, LayoutError> {
        self.get(id)
            .ok_or(LayoutError::MissingJoinPoint { merge_id: id })
    }

    /// Number of merges rendered so far in this pass.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` before the first merge of a pass is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(x: f64) -> JoinPoint {
        JoinPoint {
            coord: Point::new(x, 10.0),
            rect: Rect::default(),
        }
    }

    #[test]
    fn require_reports_missing_entries() {
        let cache = JoinPointCache::new();
        let err = cache
            .require(MergeId::new(3))
            .expect_err("empty cache has no join points");
        assert_eq!(
            err,
            LayoutError::MissingJoinPoint {
                merge_id: MergeId::new(3)
            }
        );
    }

    #[test]
    fn reset_discards_previous_pass() {
        let mut cache = JoinPointCache::new();
        cache.insert(MergeId::new(1), join(5.0));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.require(MergeId::new(1)).map(|entry| entry.coord.x),
            Ok(5.0)
        );

        cache.reset();
        assert!(cache.is_empty());
        assert!(cache.get(MergeId::new(1)).is_none());
    }
}
